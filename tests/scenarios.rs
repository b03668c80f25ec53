/// End-to-end runs of the stepped search on small hand-built maps.
use grid_string_pulling::{
    path_length, visibility_blocked, OccupancyGrid, PathFinder, Position, SearchStatus,
};
use std::time::Duration;

fn run(grid: &OccupancyGrid, start: Position, goal: Position) -> PathFinder {
    let mut finder = PathFinder::new();
    finder.start(grid, start, goal, Duration::ZERO);
    finder.run_to_end();
    finder
}

fn is_subsequence(sub: &[Position], of: &[Position]) -> bool {
    let mut rest = of.iter();
    sub.iter().all(|p| rest.any(|q| q == p))
}

/// Distance from a fine point to the axis-aligned square `[lo, hi]²`.
fn distance_to_square(p: &Position, lo: f64, hi: f64) -> f64 {
    let dx = (lo - p.x).max(p.x - hi).max(0.0);
    let dy = (lo - p.y).max(p.y - hi).max(0.0);
    dx.hypot(dy)
}

#[test]
fn straight_line_in_open_space() {
    let grid = OccupancyGrid::new(10, 10);
    let finder = run(&grid, Position::new(0.0, 0.0), Position::new(1.5, 0.0));
    assert_eq!(finder.status(), SearchStatus::Found);
    assert_eq!(finder.path_cost(), Some(3.0));
    assert_eq!(
        finder.pulled_path().unwrap(),
        &[Position::new(0.0, 0.0), Position::new(3.0, 0.0)]
    );

    let finder = run(&grid, Position::new(0.0, 0.0), Position::new(3.0, 0.0));
    assert_eq!(finder.path_cost(), Some(6.0));
    assert_eq!(finder.raw_path().unwrap().len(), 7);
    assert_eq!(finder.pulled_path().unwrap().len(), 2);
}

#[test]
fn detour_around_single_wall() {
    //  .....
    //  .....
    //  S.#.G
    //  .....
    //  .....
    let mut grid = OccupancyGrid::new(5, 5);
    grid.add_wall(2, 2);
    let start = Position::tile_center(0, 2);
    let goal = Position::tile_center(4, 2);
    let finder = run(&grid, start, goal);
    assert_eq!(finder.status(), SearchStatus::Found);

    let raw = finder.raw_path().unwrap();
    let pulled = finder.pulled_path().unwrap();
    assert!(raw.iter().any(|p| p.y != 5.0));
    assert_eq!(pulled.first(), Some(&start.to_fine()));
    assert_eq!(pulled.last(), Some(&goal.to_fine()));
    assert!(pulled.len() < raw.len());
    assert!(is_subsequence(pulled, raw));
    assert!(path_length(pulled) <= path_length(raw));
    for w in pulled.windows(2) {
        assert!(!visibility_blocked(&grid, w[0], w[1]));
    }
    // The path hugs the left face and the top edge of the wall block, which spans fine 4..6.
    assert_eq!(
        pulled,
        &[
            Position::new(1.0, 5.0),
            Position::new(4.0, 5.0),
            Position::new(4.0, 4.0),
            Position::new(7.0, 4.0),
            Position::new(9.0, 5.0),
        ]
    );
    for bend in &pulled[1..pulled.len() - 1] {
        assert!(distance_to_square(bend, 4.0, 6.0) <= 1.5, "{bend}");
    }
    let cost = finder.path_cost().unwrap();
    assert!((cost - (8.0 + std::f64::consts::SQRT_2)).abs() < 1e-9);
}

#[test]
fn pulled_path_avoids_the_pinch_between_touching_walls() {
    //  ....
    //  .#..
    //  ..#.
    //  ....
    // Start and goal sit on the left and right border, level with the corner both walls share.
    let mut grid = OccupancyGrid::new(4, 4);
    grid.add_wall(1, 1);
    grid.add_wall(2, 2);
    let pinch = Position::new(4.0, 4.0);
    let finder = run(&grid, Position::new(0.0, 2.0), Position::new(4.0, 2.0));
    assert_eq!(finder.status(), SearchStatus::Found);

    let raw = finder.raw_path().unwrap();
    assert!(!raw.contains(&pinch));
    let pulled = finder.pulled_path().unwrap();
    assert_eq!(
        pulled,
        &[
            Position::new(0.0, 4.0),
            Position::new(2.0, 4.0),
            Position::new(2.0, 2.0),
            Position::new(5.0, 2.0),
            Position::new(7.0, 3.0),
            Position::new(8.0, 4.0),
        ]
    );
    for w in pulled.windows(2) {
        assert!(!visibility_blocked(&grid, w[0], w[1]));
    }
    assert!(visibility_blocked(&grid, Position::new(0.0, 4.0), Position::new(8.0, 4.0)));
}

#[test]
fn start_equals_goal() {
    let grid = OccupancyGrid::new(5, 5);
    for p in [Position::new(2.5, 2.5), Position::new(2.0, 2.0)] {
        let mut finder = PathFinder::new();
        finder.start(&grid, p, p, Duration::ZERO);
        assert_eq!(finder.tick(), SearchStatus::Found);
        assert_eq!(finder.steps(), 1);
        assert_eq!(finder.raw_path().unwrap(), &[p.to_fine()]);
        assert_eq!(finder.pulled_path().unwrap(), &[p.to_fine()]);
    }
}

#[test]
fn enclosed_goal_is_unreachable() {
    //  .......
    //  .......
    //  ..###..
    //  ..#G#..
    //  ..###..
    //  .......
    //  .......
    let mut grid = OccupancyGrid::new(7, 7);
    for x in 2..5 {
        for y in 2..5 {
            if (x, y) != (3, 3) {
                grid.add_wall(x, y);
            }
        }
    }
    let finder = run(&grid, Position::new(0.5, 0.5), Position::new(3.5, 3.5));
    assert_eq!(finder.status(), SearchStatus::Exhausted);
    assert!(finder.raw_path().is_none());
    assert!(finder.pulled_path().is_none());
    assert!(finder.path_cost().is_none());
    assert!(finder.visited_count() <= 15 * 15);
    assert_eq!(finder.frontier_len(), 0);
}

#[test]
fn tick_is_inert_after_termination() {
    let grid = OccupancyGrid::new(4, 4);
    let mut finder = run(&grid, Position::new(0.0, 0.0), Position::new(3.0, 3.0));
    assert_eq!(finder.status(), SearchStatus::Found);
    let steps = finder.steps();
    let pulled = finder.pulled_path().unwrap().to_vec();
    assert_eq!(finder.tick(), SearchStatus::Found);
    assert_eq!(finder.steps(), steps);
    assert_eq!(finder.pulled_path().unwrap(), pulled.as_slice());
}
