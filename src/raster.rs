//! Exact grid traversal of line segments.
//!
//! Two traversals are provided. [SupercoverLine] walks every fine cell whose interior a segment
//! passes through, in order from start to end, using the incremental voxel traversal of
//! [Amanatides and Woo](http://www.cse.yorku.ca/~amana/research/grid.pdf). Crossing a lattice
//! corner exactly moves diagonally without touching the two side cells, so the result does not
//! depend on the direction of travel.
//!
//! A segment lying on a lattice line touches no cell interior at all. [StraightScan] handles
//! those by yielding the pair of cells straddling the line at every step.
//!
//! ```text
//! (0.5,0.5) -> (2.5,1.5)
//!
//!     1 │    ░░░░░░●
//!     0 │●░░░░░░
//!       └──────────────
//!        0     1     2
//! cells: (0,0) (1,0) (1,1) (2,1)
//! ```

use grid_util::point::Point;

use crate::{OccupancyGrid, Position, EPSILON};

/// Incremental traversal of the cells whose interior a segment crosses.
#[derive(Clone, Debug)]
pub struct SupercoverLine {
    origin: Position,
    delta: Position,
    t: f64,
    t_max_x: f64,
    t_max_y: f64,
    t_delta_x: f64,
    t_delta_y: f64,
}

/// Parameter of the first lattice line crossed along one axis and the parameter distance between
/// consecutive crossings.
fn axis_crossings(origin: f64, delta: f64) -> (f64, f64) {
    if delta > EPSILON {
        ((origin.floor() + 1.0 - origin) / delta, 1.0 / delta)
    } else if delta < -EPSILON {
        ((origin.ceil() - 1.0 - origin) / delta, -1.0 / delta)
    } else {
        (f64::INFINITY, f64::INFINITY)
    }
}

impl SupercoverLine {
    pub fn new(start: Position, end: Position) -> SupercoverLine {
        let delta = end - start;
        let (t_max_x, t_delta_x) = axis_crossings(start.x, delta.x);
        let (t_max_y, t_delta_y) = axis_crossings(start.y, delta.y);
        SupercoverLine {
            origin: start,
            delta,
            // A zero length segment starts out finished.
            t: if start.approx_eq(&end) { 1.0 } else { 0.0 },
            t_max_x,
            t_max_y,
            t_delta_x,
            t_delta_y,
        }
    }
}

impl Iterator for SupercoverLine {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while self.t < 1.0 - EPSILON {
            let t0 = self.t;
            let t1 = self.t_max_x.min(self.t_max_y).min(1.0);
            if self.t_max_x <= t1 + EPSILON {
                self.t_max_x += self.t_delta_x;
            }
            if self.t_max_y <= t1 + EPSILON {
                self.t_max_y += self.t_delta_y;
            }
            self.t = t1;
            // Between two consecutive crossings the segment stays inside a single cell.
            if t1 - t0 > EPSILON {
                let mid = self.origin + self.delta * ((t0 + t1) * 0.5);
                return Some(Point::new(mid.x.floor() as i32, mid.y.floor() as i32));
            }
        }
        None
    }
}

/// Walk along a horizontal or vertical lattice line, yielding the two cells on either side of
/// the line at every step.
#[derive(Clone, Debug)]
pub struct StraightScan {
    line: i32,
    horizontal: bool,
    next: i32,
    last: i32,
    step: i32,
}

impl StraightScan {
    /// Returns [None] unless the segment is axis aligned and lies on a lattice line.
    pub fn new(start: Position, end: Position) -> Option<StraightScan> {
        let on_line = |a: f64, b: f64| (a - b).abs() < EPSILON && (a - a.round()).abs() < EPSILON;
        let (line, from, to, horizontal) = if on_line(start.y, end.y) {
            (start.y.round() as i32, start.x, end.x, true)
        } else if on_line(start.x, end.x) {
            (start.x.round() as i32, start.y, end.y, false)
        } else {
            return None;
        };
        let (next, last, step) = if from <= to {
            (from.floor() as i32, to.ceil() as i32 - 1, 1)
        } else {
            (from.ceil() as i32 - 1, to.floor() as i32, -1)
        };
        Some(StraightScan {
            line,
            horizontal,
            next,
            last,
            step,
        })
    }
}

impl Iterator for StraightScan {
    type Item = (Point, Point);

    fn next(&mut self) -> Option<(Point, Point)> {
        if (self.next - self.last) * self.step > 0 {
            return None;
        }
        let i = self.next;
        self.next += self.step;
        Some(if self.horizontal {
            (Point::new(i, self.line - 1), Point::new(i, self.line))
        } else {
            (Point::new(self.line - 1, i), Point::new(self.line, i))
        })
    }
}

/// Every fine cell the segment from `start` to `end` passes through, in order. Segments on a
/// lattice line report both straddling cells per step.
pub fn cells_crossed(start: Position, end: Position) -> Vec<Point> {
    if start.approx_eq(&end) {
        return Vec::new();
    }
    match StraightScan::new(start, end) {
        Some(scan) => scan.flat_map(|(a, b)| [a, b]).collect(),
        None => SupercoverLine::new(start, end).collect(),
    }
}

/// Whether a segment on a lattice line runs through a lattice point where two walls touch only
/// by their corners. The endpoints themselves are not checked.
fn passes_diagonal_corner(grid: &OccupancyGrid, start: Position, end: Position) -> bool {
    let horizontal = (start.y - end.y).abs() < EPSILON;
    let (line, a, b) = if horizontal {
        (start.y.round() as i32, start.x, end.x)
    } else {
        (start.x.round() as i32, start.y, end.y)
    };
    let (lo, hi) = (a.min(b), a.max(b));
    ((lo + EPSILON).floor() as i32 + 1..=(hi - EPSILON).ceil() as i32 - 1)
        .map(|i| if horizontal { Point::new(i, line) } else { Point::new(line, i) })
        .any(|p| grid.is_diagonal_corner(&p))
}

/// Line of sight test used for string pulling. Along a lattice line barriers are transparent:
/// the segment is blocked where walls lie on both sides, or where it squeezes through the corner
/// shared by two diagonally touching walls. Any other segment is blocked by every wall or
/// barrier cell it enters.
pub fn visibility_blocked(grid: &OccupancyGrid, start: Position, end: Position) -> bool {
    if start.approx_eq(&end) {
        return false;
    }
    match StraightScan::new(start, end) {
        Some(mut scan) => {
            scan.any(|(a, b)| grid.is_blocked(a.x, a.y, true) && grid.is_blocked(b.x, b.y, true))
                || passes_diagonal_corner(grid, start, end)
        }
        None => SupercoverLine::new(start, end).any(|c| grid.is_blocked(c.x, c.y, false)),
    }
}
