/// Pure game-logic functions.
///
/// Every public function takes immutable references to the current entities
/// (plus the game-clock time where timing matters) and returns brand-new
/// values.  The only side effect is logging.

use std::collections::HashMap;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{
    CIRCLE_SIZE, CIRCLE_SPEED, JUMP_DOWN_SPEED, JUMP_HEIGHT, JUMP_UP_SPEED, LOWER_TRACK_Y,
    MAX_LIVE_SHAPES, PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_X, SCREEN_HEIGHT, SCREEN_WIDTH,
    SPAWN_X, SQUARE_SIZE, SQUARE_SPEED, TRIANGLE_SIZE, TRIANGLE_SPEED, UPPER_TRACK_Y,
};
use crate::entities::{
    Bounds, Coord, Difficulty, JumpPhase, Millis, Pattern, PatternCollection, PlayerCharacter,
    Shape, ShapeCollection, ShapeKind, Spawn, SpawnGroup, Track,
};

// ── Lookup tables ────────────────────────────────────────────────────────────

/// Fixed Y of each lane.
pub fn track_y(track: &Track) -> i32 {
    match track {
        Track::Upper => UPPER_TRACK_Y,
        Track::Lower => LOWER_TRACK_Y,
    }
}

pub fn default_speed(kind: &ShapeKind) -> i32 {
    match kind {
        ShapeKind::Square => SQUARE_SPEED,
        ShapeKind::Triangle => TRIANGLE_SPEED,
        ShapeKind::Circle => CIRCLE_SPEED,
    }
}

/// Sprite `(width, height)` of a shape kind.
pub fn shape_size(kind: &ShapeKind) -> (i32, i32) {
    match kind {
        ShapeKind::Square => SQUARE_SIZE,
        ShapeKind::Triangle => TRIANGLE_SIZE,
        ShapeKind::Circle => CIRCLE_SIZE,
    }
}

/// Top-left cell of the play field centred in a `cols` × `rows` terminal.
/// `None` if the terminal cannot hold the whole field.
pub fn field_origin(cols: u16, rows: u16) -> Option<Coord> {
    let (cols, rows) = (i32::from(cols), i32::from(rows));
    if cols < SCREEN_WIDTH || rows < SCREEN_HEIGHT {
        return None;
    }
    Some(Coord {
        x: (cols - SCREEN_WIDTH) / 2,
        y: (rows - SCREEN_HEIGHT) / 2,
    })
}

/// Box of a `width` × `height` sprite centred on `center`.
fn centered_bounds(center: Coord, width: i32, height: i32) -> Bounds {
    let half_w = width / 2;
    let half_h = height / 2;
    Bounds {
        x0: center.x - half_w,
        y0: center.y - half_h,
        x1: center.x + half_w,
        y1: center.y + half_h,
    }
}

// ── Spawn templates & patterns ───────────────────────────────────────────────

pub fn new_spawn_default_speed(kind: ShapeKind, track: Track) -> Spawn {
    Spawn {
        kind,
        track,
        speed: default_speed(&kind),
    }
}

pub fn new_spawn_group(spawns: Vec<Spawn>, delay_ms: Millis) -> SpawnGroup {
    SpawnGroup {
        spawns,
        delay_ms,
        fired: false,
    }
}

pub fn new_pattern(groups: Vec<SpawnGroup>) -> Pattern {
    Pattern {
        groups,
        start_time: None,
    }
}

/// The built-in pattern table.  Only the low difficulty is populated.
pub fn default_patterns() -> PatternCollection {
    let square = new_spawn_default_speed(ShapeKind::Square, Track::Lower);
    let triangle = new_spawn_default_speed(ShapeKind::Triangle, Track::Upper);
    let circle = new_spawn_default_speed(ShapeKind::Circle, Track::Upper);

    let pattern = new_pattern(vec![
        new_spawn_group(vec![square], 2_500),
        new_spawn_group(vec![triangle, square], 5_000),
        new_spawn_group(vec![circle], 7_500),
    ]);

    let mut patterns = HashMap::new();
    patterns.insert(Difficulty::Low, vec![pattern]);
    PatternCollection { patterns }
}

/// Pick one pattern from the difficulty bucket.  `None` if the bucket is
/// missing or empty.
pub fn select_pattern(
    collection: &PatternCollection,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Option<Pattern> {
    collection
        .patterns
        .get(&difficulty)
        .and_then(|bucket| bucket.choose(rng))
        .cloned()
}

pub fn is_active(pattern: &Pattern) -> bool {
    pattern.start_time.is_some()
}

pub fn is_exhausted(pattern: &Pattern) -> bool {
    pattern.groups.iter().all(|g| g.fired)
}

/// Start the pattern clock.  Re-activating a running pattern is a no-op.
pub fn activate_pattern(pattern: &Pattern, now: Millis) -> Pattern {
    Pattern {
        start_time: pattern.start_time.or(Some(now)),
        ..pattern.clone()
    }
}

/// Release every group whose delay has elapsed.  Returns the updated pattern
/// and the shapes spawned this tick, in group order.
pub fn tick_pattern(pattern: &Pattern, now: Millis) -> (Pattern, Vec<Shape>) {
    let Some(start) = pattern.start_time else {
        return (pattern.clone(), Vec::new());
    };
    let elapsed = now.saturating_sub(start);

    let mut spawned = Vec::new();
    let groups = pattern
        .groups
        .iter()
        .map(|g| {
            if g.fired || elapsed < g.delay_ms {
                return g.clone();
            }
            debug!("spawn group released at {}ms (delay {}ms)", elapsed, g.delay_ms);
            spawned.extend(g.spawns.iter().map(instantiate));
            SpawnGroup {
                fired: true,
                ..g.clone()
            }
        })
        .collect();

    (
        Pattern {
            groups,
            ..pattern.clone()
        },
        spawned,
    )
}

// ── Shapes ───────────────────────────────────────────────────────────────────

/// A fresh shape just past the right edge on the spawn's track.
pub fn instantiate(spawn: &Spawn) -> Shape {
    Shape {
        kind: spawn.kind,
        track: spawn.track,
        center: Coord {
            x: SPAWN_X,
            y: track_y(&spawn.track),
        },
        speed: spawn.speed,
    }
}

pub fn shape_bounds(shape: &Shape) -> Bounds {
    let (w, h) = shape_size(&shape.kind);
    centered_bounds(shape.center, w, h)
}

pub fn advance_shape(shape: &Shape) -> Shape {
    Shape {
        center: Coord {
            x: shape.center.x - shape.speed,
            ..shape.center
        },
        ..shape.clone()
    }
}

/// Motion is leftward only, so only the left edge matters.
pub fn is_off_screen(shape: &Shape) -> bool {
    shape_bounds(shape).x1 < 0
}

pub fn new_shape_collection(patterns: Vec<Pattern>) -> ShapeCollection {
    ShapeCollection {
        shapes: Vec::new(),
        active_patterns: patterns,
        stopped: false,
    }
}

/// Advance the obstacle field by one tick.
///
/// Activates and ticks every pattern, appends newly spawned shapes (up to
/// `MAX_LIVE_SHAPES`), moves every shape and drops those that left the
/// screen.  Exhausted patterns are retired.  A stopped collection is
/// returned unchanged.
pub fn update_shapes(collection: &ShapeCollection, now: Millis) -> ShapeCollection {
    if collection.stopped {
        return collection.clone();
    }

    // ── 1. Pattern timers ────────────────────────────────────────────────────
    let mut shapes = collection.shapes.clone();
    let mut patterns = Vec::with_capacity(collection.active_patterns.len());
    for pattern in &collection.active_patterns {
        let (pattern, spawned) = tick_pattern(&activate_pattern(pattern, now), now);
        for shape in spawned {
            if shapes.len() >= MAX_LIVE_SHAPES {
                warn!("live shape cap ({}) reached, dropping {:?}", MAX_LIVE_SHAPES, shape.kind);
                continue;
            }
            shapes.push(shape);
        }
        if is_exhausted(&pattern) {
            debug!("pattern exhausted");
        } else {
            patterns.push(pattern);
        }
    }

    // ── 2. Movement & culling ────────────────────────────────────────────────
    let shapes = shapes
        .iter()
        .map(advance_shape)
        .filter(|s| !is_off_screen(s))
        .collect();

    ShapeCollection {
        shapes,
        active_patterns: patterns,
        stopped: false,
    }
}

/// Freeze the collection; later updates are no-ops.
pub fn stop_shapes(collection: &ShapeCollection) -> ShapeCollection {
    ShapeCollection {
        stopped: true,
        ..collection.clone()
    }
}

/// Nothing left to spawn and nothing left on screen.
pub fn is_cleared(collection: &ShapeCollection) -> bool {
    collection.active_patterns.is_empty() && collection.shapes.is_empty()
}

// ── Player ───────────────────────────────────────────────────────────────────

pub fn new_player() -> PlayerCharacter {
    PlayerCharacter {
        center: Coord {
            x: PLAYER_X,
            y: track_y(&Track::Lower),
        },
        jumping: false,
        reached_apex: false,
        jump_origin_y: 0,
        collided: false,
    }
}

pub fn jump_phase(player: &PlayerCharacter) -> JumpPhase {
    match (player.jumping, player.reached_apex) {
        (false, _) => JumpPhase::Grounded,
        (true, false) => JumpPhase::Ascending,
        (true, true) => JumpPhase::Descending,
    }
}

/// One step of the jump state machine.  `jump_pushed` must be the
/// edge-triggered press, so a held key cannot restart a jump mid-air.
pub fn update_player(player: &PlayerCharacter, jump_pushed: bool) -> PlayerCharacter {
    let mut next = player.clone();

    if jump_pushed && !next.jumping {
        next.jumping = true;
        next.reached_apex = false;
        next.jump_origin_y = next.center.y;
    }

    if !next.jumping {
        return next;
    }

    if !next.reached_apex {
        let apex = next.jump_origin_y - JUMP_HEIGHT;
        next.center.y = (next.center.y - JUMP_UP_SPEED).max(apex);
        if next.center.y == apex {
            next.reached_apex = true;
        }
    } else {
        next.center.y = (next.center.y + JUMP_DOWN_SPEED).min(next.jump_origin_y);
        if next.center.y == next.jump_origin_y {
            next.jumping = false;
        }
    }

    next
}

/// Width along X and height along Y, both from the sprite's true size.
pub fn player_bounds(player: &PlayerCharacter) -> Bounds {
    centered_bounds(player.center, PLAYER_WIDTH, PLAYER_HEIGHT)
}

// ── Collision ────────────────────────────────────────────────────────────────

pub fn overlaps(a: &Bounds, b: &Bounds) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

pub fn check_collision(player_box: &Bounds, shapes: &[Shape]) -> bool {
    shapes.iter().any(|s| overlaps(player_box, &shape_bounds(s)))
}

/// Latch `collided` if the player touches any shape.  Never clears it.
pub fn apply_collision(player: &PlayerCharacter, shapes: &[Shape]) -> PlayerCharacter {
    PlayerCharacter {
        collided: player.collided || check_collision(&player_bounds(player), shapes),
        ..player.clone()
    }
}
