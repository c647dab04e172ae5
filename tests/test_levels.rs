use std::fs;

use snowline::levels::*;

// ── parse ─────────────────────────────────────────────────────────────────────

#[test]
fn parse_rows_and_columns() {
    let grid = LevelGrid::parse("0 1 2\n3 4 5\n").unwrap();
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.cols(), 3);
    let cells: Vec<_> = grid.iter().collect();
    assert_eq!(cells[0], (0, 0, 0));
    assert_eq!(cells[4], (1, 1, 4));
    assert_eq!(cells[5], (2, 1, 5));
}

#[test]
fn parse_accepts_commas_comments_and_dots() {
    let text = "
        # header comment
        0, 1, .   # trailing comment

        10,11,-1
    ";
    let grid = LevelGrid::parse(text).unwrap();
    assert_eq!(grid.rows(), 2);
    let codes: Vec<i32> = grid.iter().map(|(_, _, c)| c).collect();
    assert_eq!(codes, vec![0, 1, EMPTY_CODE, 10, 11, -1]);
}

#[test]
fn parse_rejects_ragged_rows() {
    let err = LevelGrid::parse("0 0 0\n0 0\n").unwrap_err();
    assert!(matches!(
        err,
        LevelError::Ragged { row: 1, expected: 3, found: 2 }
    ));
}

#[test]
fn parse_rejects_bad_tokens() {
    let err = LevelGrid::parse("0 0\n0 x\n").unwrap_err();
    match err {
        LevelError::BadToken { row, col, token } => {
            assert_eq!((row, col), (1, 1));
            assert_eq!(token, "x");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parse_rejects_empty_input() {
    assert!(matches!(LevelGrid::parse(""), Err(LevelError::Empty)));
    assert!(matches!(LevelGrid::parse("# only a comment"), Err(LevelError::Empty)));
    assert!(matches!(LevelGrid::new(vec![vec![]]), Err(LevelError::Empty)));
}

// ── code table ────────────────────────────────────────────────────────────────

#[test]
fn code_table_matches_level_format() {
    assert_eq!(TileCode::from_code(0), Some(TileCode::Ground));
    assert_eq!(TileCode::from_code(4), Some(TileCode::UnderWater));
    assert_eq!(TileCode::from_code(10), Some(TileCode::Door));
    assert_eq!(TileCode::from_code(11), Some(TileCode::FlyerY));
    assert_eq!(TileCode::from_code(12), None);
    assert_eq!(TileCode::from_code(EMPTY_CODE), None);
}

// ── sources ───────────────────────────────────────────────────────────────────

#[test]
fn builtin_levels_are_well_formed() {
    let levels = builtin().unwrap();
    assert_eq!(levels.len(), 3);
    for grid in &levels {
        assert_eq!((grid.cols(), grid.rows()), (16, 16));
        // Every level has an exit.
        assert!(grid.iter().any(|(_, _, c)| c == 10));
    }
}

#[test]
fn load_dir_stops_at_first_gap() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("level1.txt"), "0 0\n").unwrap();
    fs::write(dir.path().join("level2.txt"), "1 1\n").unwrap();
    fs::write(dir.path().join("level4.txt"), "2 2\n").unwrap();

    let levels = load_dir(dir.path()).unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[1].iter().next(), Some((0, 0, 1)));
}

#[test]
fn load_dir_without_levels_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(load_dir(dir.path()), Err(LevelError::NoLevels(_))));
}

#[test]
fn load_dir_reports_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("level1.txt"), "0 0\n0\n").unwrap();
    assert!(matches!(load_dir(dir.path()), Err(LevelError::Ragged { .. })));
}
