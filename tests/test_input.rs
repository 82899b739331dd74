use crossterm::event::{KeyCode, KeyEventKind};
use geometry_jumper::compute::{new_player, update_player};
use geometry_jumper::config::{HOLD_WINDOW, REPEAT_DELAY_WINDOW};
use geometry_jumper::input::KeyboardWrapper;

const SPACE: KeyCode = KeyCode::Char(' ');

#[test]
fn press_is_pushed_and_down() {
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    assert!(keys.key_pushed(&SPACE));
    assert!(keys.is_key_down(&SPACE));
    assert!(!keys.key_pushed(&KeyCode::Enter));
}

#[test]
fn push_lasts_one_frame() {
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    keys.begin_frame();
    assert!(!keys.key_pushed(&SPACE));
    assert!(keys.is_key_down(&SPACE));
}

#[test]
fn held_key_pushes_only_on_first_frame() {
    let mut keys = KeyboardWrapper::new();
    let mut pushes = 0;
    for frame in 1..=10 {
        keys.begin_frame();
        let kind = if frame == 1 { KeyEventKind::Press } else { KeyEventKind::Repeat };
        keys.record(SPACE, kind);
        assert!(keys.is_key_down(&SPACE));
        if keys.key_pushed(&SPACE) {
            pushes += 1;
        }
    }
    assert_eq!(pushes, 1);
}

#[test]
fn classic_terminal_repeat_press_is_not_fresh() {
    // Terminals without repeat reporting send repeated Press events
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    for _ in 0..5 {
        keys.begin_frame();
        keys.record(SPACE, KeyEventKind::Press);
        assert!(!keys.key_pushed(&SPACE));
    }
}

#[test]
fn release_then_press_is_fresh() {
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Release);
    assert!(!keys.is_key_down(&SPACE));
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    assert!(keys.key_pushed(&SPACE));
}

#[test]
fn fresh_push_bridges_repeat_delay() {
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    for _ in 0..REPEAT_DELAY_WINDOW {
        keys.begin_frame();
    }
    assert!(keys.is_key_down(&SPACE));
    keys.begin_frame();
    assert!(!keys.is_key_down(&SPACE));

    keys.record(SPACE, KeyEventKind::Press);
    assert!(keys.key_pushed(&SPACE));
}

#[test]
fn repeating_key_expires_after_hold_window() {
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Press);
    keys.begin_frame();
    keys.record(SPACE, KeyEventKind::Repeat);
    for _ in 0..HOLD_WINDOW {
        keys.begin_frame();
    }
    assert!(keys.is_key_down(&SPACE));
    keys.begin_frame();
    assert!(!keys.is_key_down(&SPACE));
}

#[test]
fn classic_terminal_hold_after_repeat_delay_is_one_push() {
    // Press, OS repeat delay, then steady repeated Press events
    let mut keys = KeyboardWrapper::new();
    let mut pushes = 0;
    for frame in 1..=60u64 {
        keys.begin_frame();
        if frame == 1 || frame >= 1 + REPEAT_DELAY_WINDOW {
            keys.record(SPACE, KeyEventKind::Press);
        }
        if keys.key_pushed(&SPACE) {
            pushes += 1;
        }
    }
    assert_eq!(pushes, 1);
}

#[test]
fn sparse_taps_each_start_a_jump() {
    // Press-only terminal, one tap every REPEAT_DELAY_WINDOW frames: only the
    // first ambiguous tap may be taken for a repeat
    let mut keys = KeyboardWrapper::new();
    let mut player = new_player();
    let mut taps = 0;
    let mut jumps = 0;
    for frame in 0..150u64 {
        keys.begin_frame();
        if frame % REPEAT_DELAY_WINDOW == 0 {
            keys.record(SPACE, KeyEventKind::Press);
            taps += 1;
        }
        let pushed = keys.key_pushed(&SPACE);
        if pushed && !player.jumping {
            jumps += 1;
        }
        player = update_player(&player, pushed);
    }
    assert_eq!(taps, 10);
    assert!(jumps >= taps - 1, "taps={} jumps={}", taps, jumps);
}

#[test]
fn quick_double_tap_then_taps_are_fresh() {
    let mut keys = KeyboardWrapper::new();
    let mut pushed_frames = Vec::new();
    for frame in 1..=40u64 {
        keys.begin_frame();
        if frame % 8 == 1 {
            keys.record(SPACE, KeyEventKind::Press);
        }
        if keys.key_pushed(&SPACE) {
            pushed_frames.push(frame);
        }
    }
    // taps at 1, 9, 17, 25, 33: the second is ambiguous
    assert_eq!(pushed_frames, vec![1, 17, 25, 33]);
}

#[test]
fn any_pushed_checks_every_code() {
    let mut keys = KeyboardWrapper::new();
    keys.begin_frame();
    keys.record(KeyCode::Char('w'), KeyEventKind::Press);
    assert!(keys.any_pushed(&[KeyCode::Up, KeyCode::Char('w')]));
    assert!(!keys.any_pushed(&[KeyCode::Down]));
}
