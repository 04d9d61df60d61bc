use ai_nav::{Locomotion, NavGrid, PathFollower, Vec2};

fn corridor() -> NavGrid {
    NavGrid::from_rows(&[".....", "####."], 1.0).expect("grid")
}

#[test]
fn follower_resolves_lazily_and_advances_at_speed() {
    let grid = corridor();
    let mut follower = PathFollower::new(Vec2::new(0.5, 0.5), 2.0);
    assert!(!follower.has_path());
    assert_eq!(follower.remaining_distance(), f32::INFINITY);

    follower.request_move(Vec2::new(4.5, 0.5));
    assert!(follower.path_pending());
    assert!(!follower.has_path());
    assert_eq!(follower.destination(), Some(Vec2::new(4.5, 0.5)));

    let position = follower.step(&grid, 0.5);
    assert!(!follower.path_pending());
    assert!(follower.has_path());
    assert_eq!(position, Vec2::new(1.5, 0.5));
    assert!((follower.remaining_distance() - 3.0).abs() < 1e-5);

    for _ in 0..3 {
        follower.step(&grid, 0.5);
    }
    assert_eq!(follower.position(), Vec2::new(4.5, 0.5));
    assert_eq!(follower.remaining_distance(), 0.0);
    assert!(!follower.is_moving());
    assert!(follower.has_path());
}

#[test]
fn partial_segment_progress_is_interpolated() {
    let grid = corridor();
    let mut follower = PathFollower::new(Vec2::new(0.5, 0.5), 1.0);
    follower.request_move(Vec2::new(2.5, 0.5));
    follower.step(&grid, 0.25);
    assert_eq!(follower.position(), Vec2::new(0.75, 0.5));
    assert!(follower.is_moving());
}

#[test]
fn unreachable_destination_marks_failure() {
    let grid = corridor();
    let mut follower = PathFollower::new(Vec2::new(0.5, 0.5), 1.0);
    follower.request_move(Vec2::new(1.5, 1.5));

    follower.step(&grid, 0.1);
    assert!(follower.path_failed());
    assert!(!follower.has_path());
    assert!(!follower.path_pending());
    assert_eq!(follower.remaining_distance(), f32::INFINITY);
    assert_eq!(follower.position(), Vec2::new(0.5, 0.5));

    // A fresh request clears the failure.
    follower.request_move(Vec2::new(3.5, 0.5));
    assert!(!follower.path_failed());
}

#[test]
fn reset_path_drops_destination() {
    let grid = corridor();
    let mut follower = PathFollower::new(Vec2::new(0.5, 0.5), 1.0);
    follower.request_move(Vec2::new(4.5, 0.5));
    follower.step(&grid, 1.0);

    follower.reset_path();
    assert_eq!(follower.destination(), None);
    assert!(!follower.has_path());
    assert_eq!(follower.remaining_distance(), f32::INFINITY);

    let before = follower.position();
    follower.step(&grid, 1.0);
    assert_eq!(follower.position(), before);
}

#[test]
fn teleport_re_resolves_active_path() {
    let grid = corridor();
    let mut follower = PathFollower::new(Vec2::new(0.5, 0.5), 1.0);
    follower.request_move(Vec2::new(4.5, 1.5));
    follower.step(&grid, 1.0);

    follower.set_position(Vec2::new(4.5, 0.5));
    assert!(follower.path_pending());
    follower.step(&grid, 1.0);
    assert_eq!(follower.position(), Vec2::new(4.5, 1.5));
}
