/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only translates state
/// into terminal commands.  Sprites are fixed glyph grids blitted into a
/// destination rectangle and clipped against the play field, which is
/// centred in the terminal.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use geometry_jumper::compute::{field_origin, player_bounds, shape_bounds};
use geometry_jumper::config::{
    GROUND_Y, LOWER_TRACK_Y, SCREEN_HEIGHT, SCREEN_WIDTH, UPPER_TRACK_Y,
};
use geometry_jumper::entities::{
    Bounds, Coord, GameSession, GameStatus, Menu, PlayerCharacter, Screen, Shape, ShapeKind,
};
use geometry_jumper::session::option_label;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::DarkBlue;
const C_TRACK: Color = Color::DarkGrey;
const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_SQUARE: Color = Color::Green;
const C_TRIANGLE: Color = Color::Red;
const C_CIRCLE: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;

// ── Sprites ───────────────────────────────────────────────────────────────────

type Sprite = &'static [&'static str];

const PLAYER_STANDING: Sprite = &[" O ", "/|\\", "/ \\"];
const PLAYER_JUMPING: Sprite = &["\\O/", " | ", "/ \\"];
const SQUARE: Sprite = &["┌─┐", "│ │", "└─┘"];
const TRIANGLE: Sprite = &["  ^  ", " / \\ ", "/___\\"];
const CIRCLE: Sprite = &["╭─╮", "│●│", "╰─╯"];

const LOGO: Sprite = &[
    "╔══════════════════════╗",
    "║    R A N C H B L T   ║",
    "╚══════════════════════╝",
];

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame into a `cols` × `rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    session: &GameSession,
    (cols, rows): (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let Some(origin) = field_origin(cols, rows) else {
        draw_too_small(out, cols, rows)?;
        out.queue(style::ResetColor)?;
        out.flush()?;
        return Ok(());
    };

    match session.screen {
        Screen::Logo => draw_logo(out, origin)?,
        Screen::Menu => draw_menu(out, origin, &session.menu)?,
        Screen::Playing => draw_play_field(out, origin, session)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(at(origin, 0, SCREEN_HEIGHT - 1))?;
    out.flush()?;
    Ok(())
}

/// Field-relative cell → terminal cursor position.
fn at(origin: Coord, x: i32, y: i32) -> cursor::MoveTo {
    cursor::MoveTo((origin.x + x).max(0) as u16, (origin.y + y).max(0) as u16)
}

fn draw_too_small<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines = [
        "Terminal too small".to_string(),
        format!("need {}x{}, have {}x{}", SCREEN_WIDTH, SCREEN_HEIGHT, cols, rows),
    ];
    out.queue(style::SetForegroundColor(Color::Red))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(0, i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Blitting ──────────────────────────────────────────────────────────────────

/// Copy `sprite` into `dst`, skipping cells outside the play field.
/// Spaces are transparent.
fn blit<W: Write>(
    out: &mut W,
    origin: Coord,
    sprite: Sprite,
    dst: &Bounds,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    for (row, line) in sprite.iter().enumerate() {
        let y = dst.y0 + row as i32;
        if y < 0 || y >= SCREEN_HEIGHT || y > dst.y1 {
            continue;
        }
        for (col, ch) in line.chars().enumerate() {
            let x = dst.x0 + col as i32;
            if ch == ' ' || x < 0 || x >= SCREEN_WIDTH || x > dst.x1 {
                continue;
            }
            out.queue(at(origin, x, y))?;
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

/// Print `text` horizontally centred on `row`.
fn centered<W: Write>(
    out: &mut W,
    origin: Coord,
    text: &str,
    row: i32,
    color: Color,
) -> std::io::Result<()> {
    let col = (SCREEN_WIDTH / 2 - text.chars().count() as i32 / 2).max(0);
    out.queue(at(origin, col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Logo & menu ───────────────────────────────────────────────────────────────

fn draw_logo<W: Write>(out: &mut W, origin: Coord) -> std::io::Result<()> {
    let start = SCREEN_HEIGHT / 2 - LOGO.len() as i32 / 2;
    for (i, line) in LOGO.iter().enumerate() {
        centered(out, origin, line, start + i as i32, C_TITLE)?;
    }
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, origin: Coord, menu: &Menu) -> std::io::Result<()> {
    let cy = SCREEN_HEIGHT / 2;
    centered(out, origin, "◆  GEOMETRY  JUMPER  ◆", cy - 5, C_TITLE)?;

    for (i, option) in menu.options.iter().enumerate() {
        let label = option_label(option);
        let (text, color) = if i == menu.selected {
            (format!("> {} <", label), Color::Yellow)
        } else {
            (format!("  {}  ", label), Color::White)
        };
        centered(out, origin, &text, cy - 1 + i as i32, color)?;
    }

    let hint = "↑ ↓ / W S : Select   ENTER : Confirm   ESC : Quit";
    centered(out, origin, hint, cy + 4, C_HINT)?;
    Ok(())
}

// ── Play field ────────────────────────────────────────────────────────────────

fn draw_play_field<W: Write>(
    out: &mut W,
    origin: Coord,
    session: &GameSession,
) -> std::io::Result<()> {
    draw_hud(out, origin, session)?;
    draw_ground(out, origin)?;
    if session.debug {
        draw_track_lines(out, origin)?;
    }

    for shape in &session.shapes.shapes {
        draw_shape(out, origin, shape)?;
    }
    draw_player(out, origin, &session.player)?;

    match session.status {
        GameStatus::Playing => {}
        GameStatus::GameOver => draw_banner(out, origin, "GAME  OVER", Color::Red)?,
        GameStatus::Cleared => draw_banner(out, origin, " CLEARED! ", Color::Green)?,
    }

    draw_controls_hint(out, origin)?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, origin: Coord, session: &GameSession) -> std::io::Result<()> {
    out.queue(at(origin, 1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("[ {:?} ]", session.difficulty).to_uppercase()))?;

    if session.debug {
        let info = format!(
            "frame {}  shapes {}  patterns {}",
            session.frame,
            session.shapes.shapes.len(),
            session.shapes.active_patterns.len()
        );
        out.queue(at(origin, 20, 0))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(info))?;
    }
    Ok(())
}

fn draw_ground<W: Write>(out: &mut W, origin: Coord) -> std::io::Result<()> {
    out.queue(at(origin, 0, GROUND_Y))?;
    out.queue(style::SetForegroundColor(C_GROUND))?;
    out.queue(Print("▀".repeat(SCREEN_WIDTH as usize)))?;
    Ok(())
}

fn draw_track_lines<W: Write>(out: &mut W, origin: Coord) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_TRACK))?;
    for y in [UPPER_TRACK_Y, LOWER_TRACK_Y] {
        out.queue(at(origin, 0, y))?;
        out.queue(Print("┄".repeat(SCREEN_WIDTH as usize)))?;
    }
    Ok(())
}

fn draw_shape<W: Write>(out: &mut W, origin: Coord, shape: &Shape) -> std::io::Result<()> {
    let (sprite, color) = match shape.kind {
        ShapeKind::Square => (SQUARE, C_SQUARE),
        ShapeKind::Triangle => (TRIANGLE, C_TRIANGLE),
        ShapeKind::Circle => (CIRCLE, C_CIRCLE),
    };
    blit(out, origin, sprite, &shape_bounds(shape), color)
}

fn draw_player<W: Write>(
    out: &mut W,
    origin: Coord,
    player: &PlayerCharacter,
) -> std::io::Result<()> {
    let sprite = if player.jumping {
        PLAYER_JUMPING
    } else {
        PLAYER_STANDING
    };
    blit(out, origin, sprite, &player_bounds(player), C_PLAYER)
}

fn draw_banner<W: Write>(
    out: &mut W,
    origin: Coord,
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let middle = format!("║    {}    ║", title);
    let edge = "═".repeat(middle.chars().count() - 2);
    let lines = [
        format!("╔{}╗", edge),
        middle,
        format!("╚{}╝", edge),
    ];

    let start = SCREEN_HEIGHT / 2 - 4;
    for (i, line) in lines.iter().enumerate() {
        centered(out, origin, line, start + i as i32, color)?;
    }
    centered(out, origin, "R / ENTER - Menu   ESC - Quit", start + 3, Color::White)?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, origin: Coord) -> std::io::Result<()> {
    out.queue(at(origin, 1, SCREEN_HEIGHT - 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE / ↑ : Jump   ESC : Quit"))?;
    Ok(())
}
