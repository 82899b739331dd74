/// All game entity types — pure data, no logic.

use std::collections::HashMap;

/// Milliseconds on the game clock.
pub type Millis = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// Inclusive axis-aligned bounding box in screen cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Square,
    Triangle,
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Upper,
    Lower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
    /// Every pattern fired and the last shape scrolled away.
    Cleared,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Logo,
    Menu,
    Playing,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub track: Track,
    pub center: Coord,
    /// Columns moved leftward per tick.
    pub speed: i32,
}

/// Template for a shape; cloned into every group that releases it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawn {
    pub kind: ShapeKind,
    pub track: Track,
    pub speed: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnGroup {
    pub spawns: Vec<Spawn>,
    /// Delay after pattern activation before the group is released.
    pub delay_ms: Millis,
    pub fired: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub groups: Vec<SpawnGroup>,
    /// Set on first activation; `None` means the pattern has not started.
    pub start_time: Option<Millis>,
}

#[derive(Clone, Debug, Default)]
pub struct PatternCollection {
    pub patterns: HashMap<Difficulty, Vec<Pattern>>,
}

#[derive(Clone, Debug, Default)]
pub struct ShapeCollection {
    /// Live shapes in spawn order.
    pub shapes: Vec<Shape>,
    pub active_patterns: Vec<Pattern>,
    pub stopped: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JumpPhase {
    Grounded,
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerCharacter {
    pub center: Coord,
    pub jumping: bool,
    pub reached_apex: bool,
    /// Only meaningful while `jumping`.
    pub jump_origin_y: i32,
    pub collided: bool,
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuOption {
    Start,
    Exit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    pub options: Vec<MenuOption>,
    pub selected: usize,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything one run of the game owns.  Cloneable so the per-frame update
/// can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub screen: Screen,
    pub menu: Menu,
    pub player: PlayerCharacter,
    pub shapes: ShapeCollection,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    /// Pristine pattern table; each play clones its pattern out of here.
    pub pattern_table: PatternCollection,
    /// Game-clock time the session was created (drives the logo splash).
    pub started_at: Millis,
    pub debug: bool,
    pub frame: u64,
}
