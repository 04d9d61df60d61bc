use ai_nav::{NavGrid, Navigator, Vec2};

#[test]
fn nav_grid_finds_path_around_blockers() {
    let mut grid = NavGrid::new(5, 5, 1.0);

    // Block a vertical wall with a single gap.
    for y in 0..5 {
        if y == 2 {
            continue;
        }
        grid.set_blocked(2, y, true);
    }

    let start = Vec2::new(0.5, 0.5);
    let goal = Vec2::new(4.5, 4.5);
    let path = grid.find_path(start, goal).expect("path should exist");

    assert_eq!(path.points.first().copied(), Some(start));
    assert_eq!(path.points.last().copied(), Some(goal));
    assert!(path.points.contains(&grid.cell_center(2, 2)));
}

#[test]
fn nav_grid_is_deterministic_for_same_input() {
    let mut grid = NavGrid::new(10, 10, 1.0);
    for y in 0..10 {
        grid.set_blocked(5, y, true);
    }
    grid.set_blocked(5, 5, false);

    let start = Vec2::new(1.5, 1.5);
    let goal = Vec2::new(8.5, 8.5);

    let a = grid.find_path(start, goal).expect("path should exist");
    let b = grid.find_path(start, goal).expect("path should exist");

    assert_eq!(a.points, b.points);
}

#[test]
fn open_field_paths_go_diagonal() {
    let grid = NavGrid::new(6, 6, 1.0);
    let path = grid
        .find_path(Vec2::new(0.5, 0.5), Vec2::new(5.5, 5.5))
        .expect("path");
    // Straight diagonal: start, four interior centers, goal.
    assert_eq!(path.points.len(), 6);
    assert!((path.length() - 5.0 * 2f32.sqrt()).abs() < 1e-4);
}

#[test]
fn diagonal_steps_do_not_cut_corners() {
    let grid = NavGrid::from_rows(&["..", "#."], 1.0).expect("grid");
    // (0,0) -> (1,1) would clip the blocked (0,1) corner.
    let path = grid
        .find_path(Vec2::new(0.5, 0.5), Vec2::new(1.5, 1.5))
        .expect("path");
    assert_eq!(
        path.points,
        vec![Vec2::new(0.5, 0.5), Vec2::new(1.5, 0.5), Vec2::new(1.5, 1.5)]
    );
}

#[test]
fn unreachable_or_blocked_goals_have_no_path() {
    let grid = NavGrid::from_rows(&["..#..", "..#..", "..#.."], 1.0).expect("grid");
    assert!(grid
        .find_path(Vec2::new(0.5, 0.5), Vec2::new(4.5, 0.5))
        .is_none());
    assert!(grid
        .find_path(Vec2::new(0.5, 0.5), Vec2::new(2.5, 1.5))
        .is_none());
    assert!(grid
        .find_path(Vec2::new(0.5, 0.5), Vec2::new(40.0, 0.5))
        .is_none());
}

#[test]
fn from_rows_rejects_ragged_input() {
    assert!(NavGrid::from_rows(&["...", ".."], 1.0).is_none());
    assert!(NavGrid::from_rows::<&str>(&[], 1.0).is_none());

    let grid = NavGrid::from_rows(&[".#", ".."], 2.0).expect("grid");
    assert_eq!((grid.width(), grid.height()), (2, 2));
    assert!(grid.is_blocked(1, 0));
    assert!(!grid.is_blocked(1, 1));
    assert_eq!(grid.extent(), Vec2::new(4.0, 4.0));
}

#[test]
fn nearest_point_projects_onto_open_cells() {
    let grid = NavGrid::from_rows(&["...", ".##", ".##"], 1.0).expect("grid");

    let open = Vec2::new(0.25, 2.75);
    assert_eq!(grid.nearest_point(open), Some(open));
    assert!(grid.is_walkable(open));

    let inside_wall = Vec2::new(1.4, 1.6);
    assert!(!grid.is_walkable(inside_wall));
    assert_eq!(grid.nearest_point(inside_wall), Some(Vec2::new(0.5, 1.5)));

    // Outside the grid clamps to the border first.
    assert_eq!(
        grid.nearest_point(Vec2::new(10.0, -3.0)),
        Some(Vec2::new(2.5, 0.5))
    );
}

#[test]
fn fully_blocked_grid_has_no_nearest_point() {
    let grid = NavGrid::from_rows(&["##", "##"], 1.0).expect("grid");
    assert_eq!(grid.nearest_point(Vec2::new(0.5, 0.5)), None);
}
