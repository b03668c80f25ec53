use log::debug;
use std::time::Duration;

use crate::error::{MapError, Result};
use crate::interchange::{within, MapData};
use crate::{OccupancyGrid, PathFinder, Position};

/// Editing state of a map: painted walls plus optional start and goal positions, all in coarse
/// tile units. The editor pushes snapshots of its grid into a [PathFinder]; it must not be edited
/// while that finder is searching if the rendered walls are to match the search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapEditor {
    grid: OccupancyGrid,
    start: Option<Position>,
    goal: Option<Position>,
}

impl MapEditor {
    pub fn new(width: usize, height: usize) -> MapEditor {
        MapEditor {
            grid: OccupancyGrid::new(width, height),
            start: None,
            goal: None,
        }
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn goal(&self) -> Option<Position> {
        self.goal
    }

    pub fn add_wall(&mut self, cx: i32, cy: i32) -> bool {
        self.grid.add_wall(cx, cy)
    }

    pub fn remove_wall(&mut self, cx: i32, cy: i32) -> bool {
        self.grid.remove_wall(cx, cy)
    }

    pub fn set_start(&mut self, position: Position) -> Result<()> {
        self.start = Some(self.checked(position)?);
        Ok(())
    }

    pub fn set_goal(&mut self, position: Position) -> Result<()> {
        self.goal = Some(self.checked(position)?);
        Ok(())
    }

    fn checked(&self, position: Position) -> Result<Position> {
        if within(&position, self.grid.width(), self.grid.height()) {
            Ok(position)
        } else {
            Err(MapError::PositionOutOfBounds(position))
        }
    }

    /// Removes every wall together with start and goal.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.start = None;
        self.goal = None;
    }

    /// Changes the map size. Walls, start and goal outside the new bounds are dropped.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width, height);
        for endpoint in [&mut self.start, &mut self.goal] {
            if endpoint.is_some_and(|p| !within(&p, width, height)) {
                debug!("Dropping endpoint {:?} outside the resized map", endpoint);
                *endpoint = None;
            }
        }
    }

    /// Starts `finder` on a snapshot of the current map. Fails if start or goal is missing.
    pub fn start_search(&self, finder: &mut PathFinder, tick_interval: Duration) -> Result<()> {
        let start = self.start.ok_or(MapError::MissingStart)?;
        let goal = self.goal.ok_or(MapError::MissingGoal)?;
        finder.start(&self.grid, start, goal, tick_interval);
        Ok(())
    }

    pub fn to_map_data(&self) -> MapData {
        MapData::capture(&self.grid, self.start, self.goal)
    }

    pub fn from_map_data(data: &MapData) -> Result<MapEditor> {
        Ok(MapEditor {
            grid: data.to_grid()?,
            start: data.start,
            goal: data.goal,
        })
    }
}
