/// Level grids: the integer code table, a plain-text parser and the levels
/// bundled with the game.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// What a single grid code places into the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileCode {
    Ground,
    Grass,
    WaterSurface,
    DeepWater,
    /// Deep water drawn behind the player; hurts while swimming.
    UnderWater,
    Hazard,
    Flower,
    PlatformX,
    PlatformY,
    FlyerX,
    Door,
    FlyerY,
}

impl TileCode {
    /// Unknown codes map to `None` and are treated as empty cells.
    pub fn from_code(code: i32) -> Option<TileCode> {
        let tile = match code {
            0 => TileCode::Ground,
            1 => TileCode::Grass,
            2 => TileCode::WaterSurface,
            3 => TileCode::DeepWater,
            4 => TileCode::UnderWater,
            5 => TileCode::Hazard,
            6 => TileCode::Flower,
            7 => TileCode::PlatformX,
            8 => TileCode::PlatformY,
            9 => TileCode::FlyerX,
            10 => TileCode::Door,
            11 => TileCode::FlyerY,
            _ => return None,
        };
        Some(tile)
    }
}

/// Code written for an empty cell when a level is stored as text.
pub const EMPTY_CODE: i32 = -1;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {col}: `{token}` is not a tile code")]
    BadToken {
        row: usize,
        col: usize,
        token: String,
    },
    #[error("no level files found in {0}")]
    NoLevels(PathBuf),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rectangular grid of tile codes, rows top-to-bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    cells: Vec<Vec<i32>>,
}

impl LevelGrid {
    pub fn new(cells: Vec<Vec<i32>>) -> Result<Self, LevelError> {
        let expected = cells.first().map(Vec::len).ok_or(LevelError::Empty)?;
        if expected == 0 {
            return Err(LevelError::Empty);
        }
        if let Some((row, found)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(LevelError::Ragged { row, expected, found });
        }
        Ok(LevelGrid { cells })
    }

    /// Parse one row per line.  Codes are separated by whitespace or commas,
    /// `.` is shorthand for an empty cell, and `#` starts a comment.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut cells = Vec::new();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let row = cells.len();
            let parsed = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .enumerate()
                .map(|(col, token)| parse_token(token, row, col))
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(parsed);
        }
        LevelGrid::new(cells)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Cells in row-major order as (col, row, code).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, codes)| {
            codes
                .iter()
                .enumerate()
                .map(move |(col, &code)| (col, row, code))
        })
    }
}

fn parse_token(token: &str, row: usize, col: usize) -> Result<i32, LevelError> {
    if token == "." {
        return Ok(EMPTY_CODE);
    }
    token.parse().map_err(|_| LevelError::BadToken {
        row,
        col,
        token: token.to_string(),
    })
}

// ── Level sources ─────────────────────────────────────────────────────────────

/// Read `level1.txt`, `level2.txt`, … from `dir` until the first gap.
pub fn load_dir(dir: &Path) -> Result<Vec<LevelGrid>, LevelError> {
    let mut levels = Vec::new();
    for index in 1.. {
        let path = dir.join(format!("level{index}.txt"));
        if !path.is_file() {
            break;
        }
        let text = fs::read_to_string(&path).map_err(|source| LevelError::Io {
            path: path.clone(),
            source,
        })?;
        levels.push(LevelGrid::parse(&text)?);
        debug!(path = %path.display(), "loaded level file");
    }
    if levels.is_empty() {
        return Err(LevelError::NoLevels(dir.to_path_buf()));
    }
    Ok(levels)
}

/// The levels bundled with the game, in play order.
pub fn builtin() -> Result<Vec<LevelGrid>, LevelError> {
    BUILTIN_LEVELS.iter().map(|text| LevelGrid::parse(text)).collect()
}

const BUILTIN_LEVELS: [&str; 3] = [LEVEL_1, LEVEL_2, LEVEL_3];

const LEVEL_1: &str = "
# Meadow: a pond, a worm and two lifts up to the door.
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  10 .
.  .  .  .  .  .  .  .  .  .  .  .  1  1  1  1
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  8  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  6  .  .  .  .  .  .  .  .  .  .  .  .
.  .  1  1  1  .  .  .  .  .  .  9  .  .  .  .
.  .  .  .  .  .  .  .  .  7  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  6  .
.  .  .  .  .  .  .  .  .  .  .  .  1  1  1  1
.  .  .  .  .  1  1  2  2  2  1  1  .  .  .  .
.  .  .  .  1  0  0  4  4  4  0  0  .  5  .  .
0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0
";

const LEVEL_2: &str = "
# Canyon: a deep lake and a swarm over the ledges.
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
10 .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
1  1  1  .  .  .  .  11 .  .  .  .  .  .  .  .
.  .  .  .  7  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  8  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  1  1  1
.  .  .  .  .  .  6  .  .  9  .  .  .  .  .  .
.  .  .  .  .  1  1  1  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  1  .  .  .  .  .  .  .  .  1  .  .  .
.  .  .  0  2  2  2  2  2  2  2  2  0  .  5  .
.  .  .  0  3  3  4  4  4  4  3  3  0  1  1  1
0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0
";

const LEVEL_3: &str = "
# Summit: the last door sits above the hive.
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  10 .  .  .  .  .  .  .
.  .  .  .  .  .  .  1  1  1  .  .  .  .  .  .
.  .  .  .  .  9  .  .  .  .  .  .  9  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  8  .  .  .  .
.  .  .  8  .  .  .  .  6  .  .  .  .  .  .  .
.  .  .  .  .  .  .  1  1  1  .  .  .  .  .  .
.  .  .  .  .  .  11 .  .  .  11 .  .  .  .  .
.  .  .  .  .  .  .  .  .  .  .  .  .  .  1  1
.  .  .  .  .  .  .  .  .  .  .  .  .  1  0  0
.  .  .  .  .  .  5  .  .  5  .  .  1  0  0  0
0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0
";
