use core::fmt;
use grid_util::grid::{BoolGrid, Grid, SimpleGrid};
use grid_util::point::Point;
use log::debug;

use crate::FINE_SCALE;

/// State of a single fine cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    /// Part of a painted tile. Always blocks.
    Wall,
    /// Soft margin around walls. Blocks diagonal moves and line of sight, but straight moves and
    /// straight scans along lattice lines may pass through it.
    Barrier,
}

/// Fine cells covered by a tile, relative to its fine origin.
const BLOCK: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// [OccupancyGrid] keeps the coarse tiles painted by the editor together with the derived fine
/// grid of twice the resolution. Coarse tile `(cx, cy)` covers fine cells `2cx..=2cx+1` by
/// `2cy..=2cy+1`; the twelve fine cells around that block become [CellState::Barrier].
///
/// Search nodes live on the corners of fine cells: lattice point `(x, y)` is shared by the cells
/// `(x-1, y-1)`, `(x, y-1)`, `(x-1, y)` and `(x, y)`. Cells outside the grid read as empty.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    tiles: BoolGrid,
    cells: SimpleGrid<CellState>,
}

impl PartialEq for OccupancyGrid {
    fn eq(&self, other: &OccupancyGrid) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.tiles.values == other.tiles.values
            && self.cells.values == other.cells.values
    }
}

impl Eq for OccupancyGrid {}

impl Default for OccupancyGrid {
    fn default() -> OccupancyGrid {
        OccupancyGrid::new(crate::DEFAULT_MAP_SIZE, crate::DEFAULT_MAP_SIZE)
    }
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> OccupancyGrid {
        let scale = FINE_SCALE as usize;
        OccupancyGrid {
            tiles: BoolGrid::new(width, height, false),
            cells: SimpleGrid::new(width * scale, height * scale, CellState::Empty),
        }
    }

    /// Coarse width in tiles.
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    /// Coarse height in tiles.
    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn fine_width(&self) -> usize {
        self.cells.width()
    }

    pub fn fine_height(&self) -> usize {
        self.cells.height()
    }

    pub fn tile_in_bounds(&self, cx: i32, cy: i32) -> bool {
        self.tiles.point_in_bounds(Point::new(cx, cy))
    }

    /// Whether a lattice point lies on or inside the border of the fine grid.
    pub fn lattice_in_bounds(&self, p: &Point) -> bool {
        let (w, h) = (self.fine_width() as i32, self.fine_height() as i32);
        p.x >= 0 && p.y >= 0 && p.x <= w && p.y <= h
    }

    pub fn has_wall(&self, cx: i32, cy: i32) -> bool {
        let tile = Point::new(cx, cy);
        self.tiles.point_in_bounds(tile) && self.tiles.get_point(tile)
    }

    /// Painted tiles in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width() as i32;
        (0..self.height() as i32)
            .flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
            .filter(|&p| self.tiles.get_point(p))
    }

    pub fn wall_count(&self) -> usize {
        self.walls().count()
    }

    pub fn cell(&self, fx: i32, fy: i32) -> CellState {
        let p = Point::new(fx, fy);
        if self.cells.point_in_bounds(p) {
            self.cells.get_point(p)
        } else {
            CellState::Empty
        }
    }

    fn set_cell(&mut self, fx: i32, fy: i32, state: CellState) {
        let p = Point::new(fx, fy);
        if self.cells.point_in_bounds(p) {
            self.cells.set_point(p, state);
        }
    }

    pub fn is_wall(&self, fx: i32, fy: i32) -> bool {
        self.cell(fx, fy) == CellState::Wall
    }

    /// Walls always block, barriers only when `ignore_barrier` is [false].
    pub fn is_blocked(&self, fx: i32, fy: i32, ignore_barrier: bool) -> bool {
        match self.cell(fx, fy) {
            CellState::Empty => false,
            CellState::Wall => true,
            CellState::Barrier => !ignore_barrier,
        }
    }

    /// A lattice point where two walls touch only by their corners. An octile move through such
    /// a point would slip between them, so it never becomes a search node.
    pub fn is_diagonal_corner(&self, p: &Point) -> bool {
        let (x, y) = (p.x, p.y);
        (self.is_wall(x - 1, y - 1) && self.is_wall(x, y))
            || (self.is_wall(x, y - 1) && self.is_wall(x - 1, y))
    }

    fn needs_barrier(&self, fx: i32, fy: i32) -> bool {
        Point::new(fx, fy)
            .moore_neighborhood()
            .iter()
            .any(|n| self.is_wall(n.x, n.y))
    }

    /// Fine cells surrounding the block of a tile, clipped to the grid.
    fn ring(&self, cx: i32, cy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (ox, oy) = (cx * FINE_SCALE, cy * FINE_SCALE);
        (-1..=2)
            .flat_map(move |dx| (-1..=2).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| !BLOCK.contains(&(dx, dy)))
            .map(move |(dx, dy)| (ox + dx, oy + dy))
            .filter(|&(fx, fy)| self.cells.point_in_bounds(Point::new(fx, fy)))
    }

    /// Paints a wall tile. Returns [false] if the tile was already a wall or lies outside the map.
    pub fn add_wall(&mut self, cx: i32, cy: i32) -> bool {
        let tile = Point::new(cx, cy);
        if !self.tiles.point_in_bounds(tile) {
            debug!("Ignoring wall at {tile} outside the map");
            return false;
        }
        if self.tiles.get_point(tile) {
            return false;
        }
        self.tiles.set_point(tile, true);
        let (ox, oy) = (cx * FINE_SCALE, cy * FINE_SCALE);
        for (dx, dy) in BLOCK {
            self.set_cell(ox + dx, oy + dy, CellState::Wall);
        }
        let ring: Vec<(i32, i32)> = self.ring(cx, cy).collect();
        for (fx, fy) in ring {
            if !self.is_wall(fx, fy) {
                self.set_cell(fx, fy, CellState::Barrier);
            }
        }
        true
    }

    /// Erases a wall tile. Barrier cells it introduced are cleared unless a neighbouring wall
    /// still requires them. Returns [false] if there was no wall to remove.
    pub fn remove_wall(&mut self, cx: i32, cy: i32) -> bool {
        if !self.has_wall(cx, cy) {
            return false;
        }
        self.tiles.set_point(Point::new(cx, cy), false);
        let (ox, oy) = (cx * FINE_SCALE, cy * FINE_SCALE);
        for (dx, dy) in BLOCK {
            self.set_cell(ox + dx, oy + dy, CellState::Empty);
        }
        for (dx, dy) in BLOCK {
            let (fx, fy) = (ox + dx, oy + dy);
            if self.needs_barrier(fx, fy) {
                self.set_cell(fx, fy, CellState::Barrier);
            }
        }
        let ring: Vec<(i32, i32)> = self.ring(cx, cy).collect();
        for (fx, fy) in ring {
            if self.cell(fx, fy) == CellState::Barrier && !self.needs_barrier(fx, fy) {
                self.set_cell(fx, fy, CellState::Empty);
            }
        }
        true
    }

    /// Octile transition rule of the search. Straight moves run along a lattice line and need at
    /// least one of the two cells flanking it to be free of walls. Diagonal moves cross exactly
    /// one cell, which must be neither wall nor barrier.
    pub fn can_step(&self, from: &Point, to: &Point) -> bool {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        debug_assert!(dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0));
        if !self.lattice_in_bounds(to) || self.is_diagonal_corner(to) {
            return false;
        }
        let (x, y) = (from.x.min(to.x), from.y.min(to.y));
        match (dx, dy) {
            (_, 0) => !self.is_blocked(x, from.y - 1, true) || !self.is_blocked(x, from.y, true),
            (0, _) => !self.is_blocked(from.x - 1, y, true) || !self.is_blocked(from.x, y, true),
            _ => !self.is_blocked(x, y, false),
        }
    }

    /// Removes every wall.
    pub fn clear(&mut self) {
        let (tiles, cells) = (self.tiles.rect(), self.cells.rect());
        self.tiles.set_rectangle(&tiles, false);
        self.cells.set_rectangle(&cells, CellState::Empty);
    }

    /// Changes the coarse dimensions, dropping walls that no longer fit and rebuilding the fine
    /// grid from the remaining ones.
    pub fn resize(&mut self, width: usize, height: usize) {
        let kept: Vec<Point> = self
            .walls()
            .filter(|p| (p.x as usize) < width && (p.y as usize) < height)
            .collect();
        debug!(
            "Resizing map to {}x{}, keeping {} of {} walls",
            width,
            height,
            kept.len(),
            self.wall_count()
        );
        *self = OccupancyGrid::new(width, height);
        for p in kept {
            self.add_wall(p.x, p.y);
        }
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for fy in 0..self.fine_height() as i32 {
            let row: String = (0..self.fine_width() as i32)
                .map(|fx| match self.cell(fx, fy) {
                    CellState::Empty => '.',
                    CellState::Wall => '#',
                    CellState::Barrier => '+',
                })
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
