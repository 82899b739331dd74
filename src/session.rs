/// Session lifecycle and the per-frame callback.
///
/// `frame` is the single entry point the frame loop calls.  It reads the
/// keyboard snapshot, advances whichever screen is showing and returns either
/// the next session or a `Termination` signal.

use std::error::Error;
use std::fmt;

use crossterm::event::KeyCode;
use log::{info, warn};
use rand::Rng;

use crate::compute::{
    apply_collision, is_cleared, new_player, new_shape_collection, select_pattern, stop_shapes,
    update_player, update_shapes,
};
use crate::config::LOGO_DURATION_MS;
use crate::entities::{
    Difficulty, GameSession, GameStatus, Menu, MenuOption, Millis, PatternCollection, Screen,
};
use crate::input::KeyboardWrapper;

const JUMP_KEYS: &[KeyCode] = &[
    KeyCode::Char(' '),
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
];
const MENU_UP_KEYS: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const MENU_DOWN_KEYS: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const RESTART_KEYS: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char('r'), KeyCode::Char('R')];

/// Why the frame loop should stop.  Not a fault: the caller exits cleanly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    UserQuit(&'static str),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::UserQuit(reason) => write!(f, "user wanted to quit ({})", reason),
        }
    }
}

impl Error for Termination {}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn new_menu() -> Menu {
    Menu {
        options: vec![MenuOption::Start, MenuOption::Exit],
        selected: 0,
    }
}

pub fn option_label(option: &MenuOption) -> &'static str {
    match option {
        MenuOption::Start => "Start",
        MenuOption::Exit => "Exit",
    }
}

/// Move the cursor; wraps at both ends.
pub fn update_menu(menu: &Menu, keys: &KeyboardWrapper) -> Menu {
    let len = menu.options.len();
    if len == 0 {
        return menu.clone();
    }
    let selected = if keys.any_pushed(MENU_UP_KEYS) {
        (menu.selected + len - 1) % len
    } else if keys.any_pushed(MENU_DOWN_KEYS) {
        (menu.selected + 1) % len
    } else {
        menu.selected
    };
    Menu {
        selected,
        ..menu.clone()
    }
}

pub fn selected_option(menu: &Menu) -> Option<MenuOption> {
    menu.options.get(menu.selected).copied()
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A session sitting on the logo screen (or the menu in debug mode).
pub fn new_session(
    pattern_table: PatternCollection,
    difficulty: Difficulty,
    debug: bool,
    now: Millis,
) -> GameSession {
    GameSession {
        screen: if debug { Screen::Menu } else { Screen::Logo },
        menu: new_menu(),
        player: new_player(),
        shapes: new_shape_collection(Vec::new()),
        status: GameStatus::Playing,
        difficulty,
        pattern_table,
        started_at: now,
        debug,
        frame: 0,
    }
}

/// Fresh player and obstacle field for a new run.  Falls back to the low
/// bucket when the configured difficulty has no patterns.
pub fn start_play(session: &GameSession, rng: &mut impl Rng) -> GameSession {
    let pattern = match select_pattern(&session.pattern_table, session.difficulty, rng) {
        Some(pattern) => Some(pattern),
        None => {
            warn!(
                "no patterns for {:?}, falling back to {:?}",
                session.difficulty,
                Difficulty::Low
            );
            select_pattern(&session.pattern_table, Difficulty::Low, rng)
        }
    };

    info!("starting run at {:?} difficulty", session.difficulty);
    GameSession {
        screen: Screen::Playing,
        player: new_player(),
        shapes: new_shape_collection(pattern.into_iter().collect()),
        status: GameStatus::Playing,
        ..session.clone()
    }
}

// ── Per-frame callback ───────────────────────────────────────────────────────

/// Advance the session by one frame.
pub fn frame(
    session: &GameSession,
    keys: &KeyboardWrapper,
    now: Millis,
    rng: &mut impl Rng,
) -> Result<GameSession, Termination> {
    if keys.key_pushed(&KeyCode::Esc) {
        return Err(Termination::UserQuit("escape pressed"));
    }

    let session = GameSession {
        frame: session.frame + 1,
        ..session.clone()
    };

    match session.screen {
        Screen::Logo => Ok(logo_frame(&session, now)),
        Screen::Menu => menu_frame(&session, keys, rng),
        Screen::Playing => Ok(play_frame(&session, keys, now)),
    }
}

fn logo_frame(session: &GameSession, now: Millis) -> GameSession {
    if session.debug || now.saturating_sub(session.started_at) >= LOGO_DURATION_MS {
        return GameSession {
            screen: Screen::Menu,
            ..session.clone()
        };
    }
    session.clone()
}

fn menu_frame(
    session: &GameSession,
    keys: &KeyboardWrapper,
    rng: &mut impl Rng,
) -> Result<GameSession, Termination> {
    let menu = update_menu(&session.menu, keys);
    let session = GameSession {
        menu,
        ..session.clone()
    };

    if !keys.key_pushed(&KeyCode::Enter) {
        return Ok(session);
    }
    match selected_option(&session.menu) {
        Some(MenuOption::Start) => Ok(start_play(&session, rng)),
        Some(MenuOption::Exit) => Err(Termination::UserQuit("exit selected")),
        None => Ok(session),
    }
}

/// Shapes move, then the player, then the collision check, so the check
/// always sees this frame's positions.
fn play_frame(session: &GameSession, keys: &KeyboardWrapper, now: Millis) -> GameSession {
    if session.status != GameStatus::Playing {
        if keys.any_pushed(RESTART_KEYS) {
            info!("back to menu");
            return GameSession {
                screen: Screen::Menu,
                status: GameStatus::Playing,
                ..session.clone()
            };
        }
        return session.clone();
    }

    let shapes = update_shapes(&session.shapes, now);
    let player = update_player(&session.player, keys.any_pushed(JUMP_KEYS));
    let player = apply_collision(&player, &shapes.shapes);

    if player.collided {
        info!("player collided at frame {}", session.frame);
        return GameSession {
            shapes: stop_shapes(&shapes),
            player,
            status: GameStatus::GameOver,
            ..session.clone()
        };
    }

    let status = if is_cleared(&shapes) {
        info!("pattern cleared at frame {}", session.frame);
        GameStatus::Cleared
    } else {
        GameStatus::Playing
    };

    GameSession {
        shapes,
        player,
        status,
        ..session.clone()
    }
}
