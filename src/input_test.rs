use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Key
// =============================================================

#[test]
fn arrow_keys_scrub() {
    assert_eq!(Key("ArrowRight".into()).scrub_direction(), 1);
    assert_eq!(Key("ArrowLeft".into()).scrub_direction(), -1);
}

#[test]
fn other_keys_do_not_scrub() {
    assert_eq!(Key("ArrowUp".into()).scrub_direction(), 0);
    assert_eq!(Key("a".into()).scrub_direction(), 0);
}

// =============================================================
// WheelDelta
// =============================================================

#[test]
fn wheel_up_zooms_in() {
    assert!(WheelDelta { dx: 0.0, dy: -3.0 }.zooms_in());
    assert!(!WheelDelta { dx: 0.0, dy: 3.0 }.zooms_in());
    assert!(!WheelDelta { dx: 5.0, dy: 0.0 }.zooms_in());
}

// =============================================================
// InteractionState
// =============================================================

#[test]
fn default_is_idle() {
    let state = InteractionState::default();
    assert!(!state.is_dragging());
    assert!(!state.just_dragged);
}

#[test]
fn begin_records_start_points() {
    let mut state = InteractionState::default();
    state.begin(pt(10.0, 20.0), pt(5.0, 10.0));
    assert!(state.is_dragging());
    assert_eq!(state.drag, Some(DragGesture { start_logical: pt(5.0, 10.0), start_device: pt(10.0, 20.0) }));
}

#[test]
fn small_move_is_a_click() {
    let mut state = InteractionState::default();
    state.begin(pt(10.0, 10.0), pt(10.0, 10.0));
    assert!(!state.finish(pt(15.0, 5.0), 5.0));
    assert!(!state.is_dragging());
    assert!(state.accept_click());
}

#[test]
fn large_move_on_either_axis_is_a_drag() {
    let mut state = InteractionState::default();
    state.begin(pt(10.0, 10.0), pt(10.0, 10.0));
    assert!(state.finish(pt(10.0, 16.0), 5.0));
    assert!(state.just_dragged);
    assert!(!state.is_dragging());
}

#[test]
fn click_after_drag_is_swallowed_once() {
    let mut state = InteractionState::default();
    state.begin(pt(0.0, 0.0), pt(0.0, 0.0));
    state.finish(pt(50.0, 0.0), 5.0);
    assert!(!state.accept_click());
    assert!(state.accept_click());
}

#[test]
fn new_press_clears_stale_drag_flag() {
    let mut state = InteractionState::default();
    state.begin(pt(0.0, 0.0), pt(0.0, 0.0));
    state.finish(pt(50.0, 0.0), 5.0);
    // The browser never delivered the click; the next gesture must not be suppressed.
    state.begin(pt(3.0, 3.0), pt(3.0, 3.0));
    state.finish(pt(3.0, 3.0), 5.0);
    assert!(state.accept_click());
}

#[test]
fn release_without_press_is_not_a_drag() {
    let mut state = InteractionState::default();
    assert!(!state.finish(pt(100.0, 100.0), 5.0));
    assert!(state.accept_click());
}
