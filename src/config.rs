/// Fixed game geometry and timing.
///
/// Everything is measured in terminal cells (one cell = one "pixel" of the
/// play field) and milliseconds.

use std::time::Duration;

// ── Play field ────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: i32 = 80;
pub const SCREEN_HEIGHT: i32 = 24;

/// Row of the ground line drawn under the lower track.
pub const GROUND_Y: i32 = 20;

pub const UPPER_TRACK_Y: i32 = 9;
pub const LOWER_TRACK_Y: i32 = 18;

/// Shapes appear here, fully past the right edge.
pub const SPAWN_X: i32 = SCREEN_WIDTH + 3;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_X: i32 = 10;
pub const PLAYER_WIDTH: i32 = 3;
pub const PLAYER_HEIGHT: i32 = 3;

/// Rows risen between the jump origin and the apex.
pub const JUMP_HEIGHT: i32 = 7;
pub const JUMP_UP_SPEED: i32 = 1;
pub const JUMP_DOWN_SPEED: i32 = 1;

// ── Shapes ────────────────────────────────────────────────────────────────────

pub const SQUARE_SIZE: (i32, i32) = (3, 3);
pub const TRIANGLE_SIZE: (i32, i32) = (5, 3);
pub const CIRCLE_SIZE: (i32, i32) = (3, 3);

pub const SQUARE_SPEED: i32 = 1;
pub const TRIANGLE_SPEED: i32 = 2;
pub const CIRCLE_SPEED: i32 = 1;

/// Upper bound on concurrently live shapes; further spawns are dropped.
pub const MAX_LIVE_SHAPES: usize = 64;

// ── Timing ────────────────────────────────────────────────────────────────────

pub const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

pub const LOGO_DURATION_MS: u64 = 2_000;

/// A key counts as held if its last press/repeat arrived within this many
/// frames.  OS key-repeat runs at ≥ 15 Hz, so a held key refreshes well
/// before expiry.
pub const HOLD_WINDOW: u64 = 4;

/// Grace period right after a fresh push, wide enough to bridge the OS
/// key-repeat start delay (≈500 ms) on terminals that never report
/// releases.
pub const REPEAT_DELAY_WINDOW: u64 = 15;
