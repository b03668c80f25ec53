//! # grid_string_pulling
//!
//! A stepped pathfinding kernel for grid editors. Walls are painted on a coarse tile grid and
//! expanded into an [OccupancyGrid] of twice the resolution, where every wall gets a soft
//! barrier margin. A [PathFinder] then runs a best-first search over the 8-connected fine
//! lattice one step per tick, so a renderer can show the frontier as it grows. Once the goal is
//! reached, the raw lattice path is
//! [string pulled](https://en.wikipedia.org/wiki/Any-angle_path_planning) into a taut polyline
//! using exact grid traversal for line-of-sight checks.
pub mod editor;
pub mod error;
pub mod heap;
pub mod interchange;
pub mod occupancy;
pub mod path_finder;
pub mod raster;
pub mod search_node;
pub mod string_pull;

pub use editor::MapEditor;
pub use error::{MapError, Result};
pub use heap::BinaryHeap;
pub use interchange::MapData;
pub use occupancy::{CellState, OccupancyGrid};
pub use path_finder::{PathFinder, SearchStatus};
pub use raster::{cells_crossed, visibility_blocked};
pub use string_pull::pull_string;

use core::fmt;
use core::ops::{Add, Mul, Sub};
use grid_util::point::Point;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of fine cells per coarse tile along each axis.
pub const FINE_SCALE: i32 = 2;
/// Cost of a straight (axis) step on the fine lattice.
pub const AXIS_COST: f64 = 1.0;
/// Cost of a diagonal step on the fine lattice.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;
/// Coarse width and height of a fresh map.
pub const DEFAULT_MAP_SIZE: usize = 25;
/// Delay between two search steps when nothing else is requested.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

const EPSILON: f64 = 1e-9;

/// A real valued position. Depending on context this is measured in coarse tiles (editor input,
/// interchange files) or in fine cells (search and rendering output).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Position {
        Position { x, y }
    }

    /// The center of coarse tile `(cx, cy)`, in coarse units.
    pub fn tile_center(cx: i32, cy: i32) -> Position {
        Position::new(cx as f64 + 0.5, cy as f64 + 0.5)
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Converts coarse tile units to fine cell units.
    pub fn to_fine(self) -> Position {
        self * FINE_SCALE as f64
    }

    /// Converts fine cell units back to coarse tile units.
    pub fn to_coarse(self) -> Position {
        self * (1.0 / FINE_SCALE as f64)
    }

    /// Whether both coordinates sit on integer lattice lines.
    pub fn is_lattice(&self) -> bool {
        self.x.fract() == 0.0 && self.y.fract() == 0.0
    }

    /// Nearest lattice point.
    pub fn snap(&self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn approx_eq(&self, other: &Position) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Position {
        Position::new(p.x as f64, p.y as f64)
    }
}

impl Add for Position {
    type Output = Position;
    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;
    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Total Euclidean length of a polyline.
pub fn path_length(path: &[Position]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(b))
        .sum()
}
