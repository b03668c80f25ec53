use core::fmt;
use grid_util::point::Point;
use log::{debug, info, warn};
use smallvec::SmallVec;
use std::time::Duration;

use crate::heap::BinaryHeap;
use crate::search_node::{SearchNode, SearchTree};
use crate::string_pull::pull_string;
use crate::{OccupancyGrid, Position, AXIS_COST, DEFAULT_TICK_INTERVAL, DIAGONAL_COST};

/// Lifecycle of a search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// No search was started yet.
    Idle,
    Searching,
    /// The goal was reached; raw and pulled paths are available.
    Found,
    /// The frontier ran dry before the goal was reached.
    Exhausted,
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchStatus::Found | SearchStatus::Exhausted)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Searching => "searching",
            SearchStatus::Found => "found",
            SearchStatus::Exhausted => "exhausted",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    index: usize,
    position: Point,
    f: f64,
}

/// Non-strict on purpose: entries with equal f leave the heap in unspecified order.
fn higher_priority(a: &FrontierEntry, b: &FrontierEntry) -> bool {
    a.f <= b.f
}

type Frontier = BinaryHeap<FrontierEntry, fn(&FrontierEntry, &FrontierEntry) -> bool>;

/// Stepped best-first search over the fine lattice of an [OccupancyGrid].
///
/// A run is started with [start](Self::start) and then advanced one node expansion per
/// [tick](Self::tick), so the frontier can be rendered while it grows. Neighbours are marked
/// visited as soon as they are generated, which keeps the first cost found for every lattice
/// point: paths are short but not guaranteed optimal. When the goal is reached the raw path is
/// string pulled with [pull_string].
///
/// Positions passed to [start](Self::start) are in coarse tile units; everything the finder
/// reports is in fine units.
pub struct PathFinder {
    grid: OccupancyGrid,
    status: SearchStatus,
    active: bool,
    tick_interval: Duration,
    tree: SearchTree,
    frontier: Frontier,
    start: Position,
    goal: Position,
    goal_point: Point,
    goal_index: Option<usize>,
    steps: usize,
    raw_path: Vec<Position>,
    pulled_path: Vec<Position>,
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder {
            grid: OccupancyGrid::new(0, 0),
            status: SearchStatus::Idle,
            active: false,
            tick_interval: DEFAULT_TICK_INTERVAL,
            tree: SearchTree::new(),
            frontier: BinaryHeap::new(higher_priority),
            start: Position::default(),
            goal: Position::default(),
            goal_point: Point::new(0, 0),
            goal_index: None,
            steps: 0,
            raw_path: Vec::new(),
            pulled_path: Vec::new(),
        }
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder::default()
    }

    /// Starts a new run on a snapshot of `grid`, discarding everything left from a previous run.
    /// The root is the lattice point nearest to the start; an off-lattice start is kept as the
    /// first point of the raw path.
    pub fn start(
        &mut self,
        grid: &OccupancyGrid,
        start: Position,
        goal: Position,
        tick_interval: Duration,
    ) {
        self.grid = grid.clone();
        self.tree.clear();
        self.frontier.clear();
        self.raw_path.clear();
        self.pulled_path.clear();
        self.goal_index = None;
        self.steps = 0;
        self.tick_interval = tick_interval;
        self.start = start.to_fine();
        self.goal = goal.to_fine();
        self.goal_point = self.goal.snap();
        if !self.grid.lattice_in_bounds(&self.start.snap())
            || !self.grid.lattice_in_bounds(&self.goal_point)
        {
            warn!("Search endpoints {} and {} are not both on the map", self.start, self.goal);
        }

        let root = if self.start.approx_eq(&self.goal) {
            self.goal_point
        } else {
            self.start.snap()
        };
        let node = SearchNode::new(None, 0.0, Position::from(root).distance(&self.goal));
        if let Some(index) = self.tree.insert(root, node) {
            self.frontier.insert(FrontierEntry {
                index,
                position: root,
                f: node.f(),
            });
        }
        self.status = SearchStatus::Searching;
        self.active = true;
        info!(
            "Searching from {} to {} on a {}x{} fine grid",
            self.start,
            self.goal,
            self.grid.fine_width(),
            self.grid.fine_height()
        );
    }

    /// Stops scheduling further ticks. The run keeps its state but no longer progresses.
    pub fn cancel(&mut self) {
        if self.active {
            debug!("Search cancelled after {} steps", self.steps);
        }
        self.active = false;
    }

    /// Runs one step if the search is active.
    pub fn tick(&mut self) -> SearchStatus {
        if self.active {
            self.step()
        } else {
            self.status
        }
    }

    /// Pops the most promising frontier node and either finishes the run or expands it.
    pub fn step(&mut self) -> SearchStatus {
        if self.status != SearchStatus::Searching {
            return self.status;
        }
        self.steps += 1;
        let Some(entry) = self.frontier.extract_min() else {
            info!(
                "Frontier exhausted after {} steps, {} does not reach {}",
                self.steps, self.start, self.goal
            );
            self.finish(SearchStatus::Exhausted);
            return self.status;
        };
        if entry.position == self.goal_point {
            self.goal_index = Some(entry.index);
            self.raw_path = self.reconstruct(entry.index);
            self.pulled_path = pull_string(&self.grid, &self.raw_path);
            info!(
                "Goal reached after {} steps: {} raw points pulled to {}",
                self.steps,
                self.raw_path.len(),
                self.pulled_path.len()
            );
            self.finish(SearchStatus::Found);
            return self.status;
        }
        self.expand(&entry);
        self.status
    }

    fn finish(&mut self, status: SearchStatus) {
        self.status = status;
        self.active = false;
    }

    fn expand(&mut self, entry: &FrontierEntry) {
        let Some((_, parent)) = self.tree.get(entry.index) else {
            return;
        };
        let g = parent.g;
        let p = entry.position;
        let successors = p
            .moore_neighborhood()
            .into_iter()
            .map(|n| {
                let cost = if p.dir_obj(&n).diagonal() {
                    DIAGONAL_COST
                } else {
                    AXIS_COST
                };
                (n, cost)
            })
            .filter(|(n, _)| !self.tree.contains(n) && self.grid.can_step(&p, n))
            .collect::<SmallVec<[(Point, f64); 8]>>();
        for (n, cost) in successors {
            let node = SearchNode::new(
                Some(entry.index),
                g + cost,
                Position::from(n).distance(&self.goal),
            );
            if let Some(index) = self.tree.insert(n, node) {
                self.frontier.insert(FrontierEntry {
                    index,
                    position: n,
                    f: node.f(),
                });
            }
        }
    }

    fn reconstruct(&self, index: usize) -> Vec<Position> {
        if self.start.approx_eq(&self.goal) {
            return vec![self.start];
        }
        let lattice = self.tree.path(index);
        let mut path = Vec::with_capacity(lattice.len() + 2);
        if !self.start.is_lattice() {
            path.push(self.start);
        }
        path.extend(lattice.into_iter().map(Position::from));
        if !self.goal.is_lattice() {
            path.push(self.goal);
        }
        path
    }

    /// Ticks until the run stops, without waiting between ticks.
    pub fn run_to_end(&mut self) -> SearchStatus {
        while self.active {
            self.tick();
        }
        self.status
    }

    /// Ticks until the run stops, sleeping the tick interval between ticks and handing the finder
    /// to `observer` after every tick.
    pub fn run_blocking<F>(&mut self, mut observer: F) -> SearchStatus
    where
        F: FnMut(&PathFinder),
    {
        while self.active {
            self.tick();
            observer(self);
            if self.active {
                std::thread::sleep(self.tick_interval);
            }
        }
        self.status
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Whether further ticks will make progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// The grid snapshot of the current run.
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Fine start position of the current run.
    pub fn start_position(&self) -> Position {
        self.start
    }

    /// Fine goal position of the current run.
    pub fn goal_position(&self) -> Position {
        self.goal
    }

    /// Positions currently waiting in the frontier, in no particular order.
    pub fn frontier(&self) -> Vec<Position> {
        self.frontier
            .iter()
            .map(|e| Position::from(e.position))
            .collect()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Number of lattice points generated so far.
    pub fn visited_count(&self) -> usize {
        self.tree.len()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn raw_path(&self) -> Option<&[Position]> {
        (self.status == SearchStatus::Found).then_some(self.raw_path.as_slice())
    }

    pub fn pulled_path(&self) -> Option<&[Position]> {
        (self.status == SearchStatus::Found).then_some(self.pulled_path.as_slice())
    }

    /// Accumulated cost g of the goal node, in fine units.
    pub fn path_cost(&self) -> Option<f64> {
        self.goal_index
            .and_then(|ix| self.tree.get(ix))
            .map(|(_, node)| node.g)
    }
}
