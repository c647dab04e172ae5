/// Rendering layer: all terminal I/O lives here.
///
/// The session hands us a list of draw commands in pixel space; each one is
/// rasterised into a character buffer (one 50 px tile = two columns by one
/// row) that is then flushed line by line.  No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use snowline::assets::AssetRegistry;
use snowline::entities::GameStatus;
use snowline::render::{DrawCommand, Hud, Layer};
use snowline::session::GameSession;

/// Pixels per terminal column / row.
const CELL_W: i32 = 25;
const CELL_H: i32 = 50;
/// Rows above the play field (HUD).
const TOP: u16 = 1;
const HEALTH_BAR_WIDTH: i32 = 20;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::DarkYellow;
const C_GRASS: Color = Color::Green;
const C_WATER: Color = Color::Blue;
const C_DEEP_WATER: Color = Color::DarkBlue;
const C_HAZARD: Color = Color::Red;
const C_FLOWER: Color = Color::Magenta;
const C_PLATFORM: Color = Color::Grey;
const C_DOOR: Color = Color::DarkMagenta;
const C_PLAYER: Color = Color::White;
const C_HUD: Color = Color::Yellow;
const C_HEALTH: Color = Color::Green;
const C_HEALTH_LOST: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_OVERLAY: Color = Color::Rgb { r: 255, g: 102, b: 0 };

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell { glyph: ' ', color: Color::Reset };

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &GameSession) -> std::io::Result<()> {
    let (width_px, height_px) = session.current().world().pixel_size();
    let cols = (width_px / CELL_W).max(1) as usize;
    let rows = (height_px / CELL_H).max(1) as usize;

    let mut buffer = vec![vec![BLANK; cols]; rows];
    let assets = session.assets();
    for command in session.draw_list() {
        let cell = cell_for(&command, assets);
        stamp(&mut buffer, &command, cell);
    }

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_hud(out, &session.hud(), cols as u16)?;

    for (r, line) in buffer.iter().enumerate() {
        out.queue(cursor::MoveTo(0, TOP + r as u16))?;
        for cell in line {
            out.queue(style::SetForegroundColor(cell.color))?;
            out.queue(Print(cell.glyph))?;
        }
    }

    let bottom = TOP + rows as u16;
    draw_controls_hint(out, bottom)?;

    match session.status() {
        GameStatus::Restart => draw_overlay(out, cols as u16, rows as u16, &["GAME  OVER"])?,
        GameStatus::Finished => draw_overlay(
            out,
            cols as u16,
            rows as u16,
            &["Congratulations!", "You finished the game."],
        )?,
        GameStatus::Playing => {}
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, bottom + 1))?;
    out.flush()?;
    Ok(())
}

// ── Rasterising ───────────────────────────────────────────────────────────────

fn stamp(buffer: &mut [Vec<Cell>], command: &DrawCommand, cell: Cell) {
    let r = command.rect;
    if r.w <= 0 || r.h <= 0 {
        return;
    }
    let c0 = r.left().div_euclid(CELL_W);
    let c1 = (r.right() - 1).div_euclid(CELL_W);
    let r0 = r.top().div_euclid(CELL_H);
    let r1 = (r.bottom() - 1).div_euclid(CELL_H);
    for row in r0.max(0)..=r1 {
        let Some(line) = buffer.get_mut(row as usize) else {
            break;
        };
        for col in c0.max(0)..=c1 {
            if let Some(slot) = line.get_mut(col as usize) {
                *slot = cell;
            }
        }
    }
}

fn cell_for(command: &DrawCommand, assets: &AssetRegistry) -> Cell {
    let name = assets.sprite_name(command.sprite);
    let (glyph, color) = match command.layer {
        Layer::Tile if name == "grass" => ('▀', C_GRASS),
        Layer::Tile => ('█', C_GROUND),
        Layer::Water if name == "deep_water" => ('≈', C_DEEP_WATER),
        Layer::Water => ('~', C_WATER),
        Layer::Hazard => {
            // First letter of the creature, upper-case while facing right.
            let letter = name.chars().next().unwrap_or('?');
            let glyph = if command.flip_x {
                letter.to_ascii_uppercase()
            } else {
                letter
            };
            (glyph, C_HAZARD)
        }
        Layer::Pickup => ('*', C_FLOWER),
        Layer::Platform => ('=', C_PLATFORM),
        Layer::Door => ('▯', C_DOOR),
        Layer::Player => (player_glyph(name, command), C_PLAYER),
    };
    Cell { glyph, color }
}

fn player_glyph(name: &str, command: &DrawCommand) -> char {
    match name {
        "jump" => '^',
        "duck" => '_',
        "angel" => '+',
        "dive" => match command.rotation {
            90 => '>',
            180 => '^',
            270 => '<',
            _ => 'v',
        },
        n if n.starts_with("walk") && command.flip_x => '<',
        n if n.starts_with("walk") => '>',
        _ => '@',
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print("HEALTH "))?;

    let filled = if hud.max_health > 0 {
        (HEALTH_BAR_WIDTH * hud.health / hud.max_health).clamp(0, HEALTH_BAR_WIDTH)
    } else {
        0
    };
    out.queue(style::SetForegroundColor(C_HEALTH))?;
    out.queue(Print("█".repeat(filled as usize)))?;
    out.queue(style::SetForegroundColor(C_HEALTH_LOST))?;
    out.queue(Print("█".repeat((HEALTH_BAR_WIDTH - filled) as usize)))?;

    let right = format!("LEVEL {}   * X {}", hud.level, hud.score);
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(right))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, row: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → : Move   ↑ : Jump/Swim   ↓ : Duck/Collect   Q : Quit"))?;
    Ok(())
}

// ── Restart / finish overlay ──────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[&str],
) -> std::io::Result<()> {
    let hint = "R - Play Again  Q - Quit";
    let cx = width / 2;
    let start_row = TOP + (height / 2).saturating_sub(lines.len() as u16);

    for (i, msg) in lines.iter().chain(std::iter::once(&hint)).enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(C_OVERLAY))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
