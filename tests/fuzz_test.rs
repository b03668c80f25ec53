/// Fuzzes the stepped search on many random maps. A run must find a path exactly when the goal is
/// reachable under the octile step rule, and the pulled path must be a taut, visible subsequence
/// of the raw path.
use fxhash::FxHashSet;
use grid_string_pulling::{
    path_length, visibility_blocked, OccupancyGrid, PathFinder, Position, SearchStatus,
};
use grid_util::point::Point;
use rand::prelude::*;
use std::collections::VecDeque;
use std::time::Duration;

fn random_grid(rng: &mut StdRng) -> OccupancyGrid {
    let (w, h) = (rng.gen_range(2..8), rng.gen_range(2..8));
    let mut grid = OccupancyGrid::new(w, h);
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            if rng.gen_bool(0.3) {
                grid.add_wall(x, y);
            }
        }
    }
    grid
}

fn random_position(grid: &OccupancyGrid, rng: &mut StdRng) -> Position {
    let offsets = [0.0, 0.5, 0.3, 0.7];
    Position::new(
        rng.gen_range(0..grid.width()) as f64 + offsets[rng.gen_range(0..offsets.len())],
        rng.gen_range(0..grid.height()) as f64 + offsets[rng.gen_range(0..offsets.len())],
    )
}

fn reachable(grid: &OccupancyGrid, start: Point, goal: Point) -> bool {
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(p) = queue.pop_front() {
        if p == goal {
            return true;
        }
        for n in p.moore_neighborhood() {
            if !seen.contains(&n) && grid.can_step(&p, &n) {
                seen.insert(n);
                queue.push_back(n);
            }
        }
    }
    false
}

fn visualize(grid: &OccupancyGrid, start: Position, goal: Position) {
    println!("start {start}, goal {goal}");
    print!("{grid}");
}

fn is_subsequence(sub: &[Position], of: &[Position]) -> bool {
    let mut rest = of.iter();
    sub.iter().all(|p| rest.any(|q| q == p))
}

#[test]
fn fuzz() {
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let mut finder = PathFinder::new();
    for _ in 0..N_GRIDS {
        let grid = random_grid(&mut rng);
        let start = random_position(&grid, &mut rng);
        let goal = random_position(&grid, &mut rng);
        finder.start(&grid, start, goal, Duration::ZERO);
        let status = finder.run_to_end();

        let (fine_start, fine_goal) = (start.to_fine(), goal.to_fine());
        let expected = fine_start.approx_eq(&fine_goal)
            || reachable(&grid, fine_start.snap(), fine_goal.snap());
        // Show the map if the search disagrees with reachability
        if (status == SearchStatus::Found) != expected {
            visualize(&grid, start, goal);
        }
        assert_eq!(status == SearchStatus::Found, expected);
        if status != SearchStatus::Found {
            continue;
        }

        let raw = finder.raw_path().unwrap();
        let pulled = finder.pulled_path().unwrap();
        assert_eq!(pulled.first(), raw.first());
        assert_eq!(pulled.last(), raw.last());
        assert!(is_subsequence(pulled, raw));
        assert!(path_length(pulled) <= path_length(raw) + 1e-9);
        for w in raw.windows(2) {
            if w[0].is_lattice() && w[1].is_lattice() {
                assert!(!visibility_blocked(&grid, w[0], w[1]), "{} -> {}", w[0], w[1]);
            }
        }
        let n = raw.len();
        for w in pulled.windows(2) {
            let hop_on = n >= 2 && w[0] == raw[0] && w[1] == raw[1];
            let hop_off = n >= 2 && w[0] == raw[n - 2] && w[1] == raw[n - 1];
            if !hop_on && !hop_off && visibility_blocked(&grid, w[0], w[1]) {
                visualize(&grid, start, goal);
                panic!("pulled segment {} -> {} is blocked", w[0], w[1]);
            }
        }
        for w in pulled.windows(3) {
            assert!(visibility_blocked(&grid, w[0], w[2]));
        }
    }
}

#[test]
fn legal_steps_are_visible() {
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let grid = random_grid(&mut rng);
        for x in 0..=grid.fine_width() as i32 {
            for y in 0..=grid.fine_height() as i32 {
                let p = Point::new(x, y);
                for n in p.moore_neighborhood() {
                    if grid.can_step(&p, &n) {
                        assert!(!visibility_blocked(
                            &grid,
                            Position::from(p),
                            Position::from(n)
                        ));
                    }
                }
            }
        }
    }
}
