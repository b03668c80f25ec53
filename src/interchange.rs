//! JSON map files.
//!
//! ```json
//! {
//!   "width": 25,
//!   "height": 25,
//!   "tileData": { "3": { "4": "wall", "5": "wall" } },
//!   "start": { "x": 1.5, "y": 2.0 },
//!   "goal": null
//! }
//! ```
//!
//! `tileData` maps a column to the rows of that column holding a wall. Only tiles are stored; the
//! fine occupancy grid is rebuilt from them on load. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{MapError, Result};
use crate::{OccupancyGrid, Position};

/// Marker stored for a painted tile.
pub const WALL_MARKER: &str = "wall";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub width: usize,
    pub height: usize,
    pub tile_data: BTreeMap<u32, BTreeMap<u32, String>>,
    pub start: Option<Position>,
    pub goal: Option<Position>,
}

impl MapData {
    /// Captures the walls of `grid` together with the endpoints.
    pub fn capture(
        grid: &OccupancyGrid,
        start: Option<Position>,
        goal: Option<Position>,
    ) -> MapData {
        let mut tile_data: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();
        for p in grid.walls() {
            tile_data
                .entry(p.x as u32)
                .or_default()
                .insert(p.y as u32, WALL_MARKER.to_owned());
        }
        MapData {
            width: grid.width(),
            height: grid.height(),
            tile_data,
            start,
            goal,
        }
    }

    /// Parses and validates a map file.
    pub fn from_json(json: &str) -> Result<MapData> {
        let data: MapData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<MapData> {
        MapData::from_json(&fs::read_to_string(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Checks dimensions, tile coordinates, markers and endpoints.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        for (&x, column) in &self.tile_data {
            for (&y, marker) in column {
                if x as usize >= self.width || y as usize >= self.height {
                    return Err(MapError::TileOutOfBounds {
                        x,
                        y,
                        width: self.width,
                        height: self.height,
                    });
                }
                if marker != WALL_MARKER {
                    return Err(MapError::UnknownMarker {
                        x,
                        y,
                        marker: marker.clone(),
                    });
                }
            }
        }
        for p in self.start.iter().chain(self.goal.iter()) {
            if !within(p, self.width, self.height) {
                return Err(MapError::PositionOutOfBounds(*p));
            }
        }
        Ok(())
    }

    /// Rebuilds the occupancy grid from the stored tiles.
    pub fn to_grid(&self) -> Result<OccupancyGrid> {
        self.validate()?;
        let mut grid = OccupancyGrid::new(self.width, self.height);
        for (&x, column) in &self.tile_data {
            for &y in column.keys() {
                grid.add_wall(x as i32, y as i32);
            }
        }
        Ok(grid)
    }
}

/// Whether a coarse position lies on the map, its far border included.
pub(crate) fn within(p: &Position, width: usize, height: usize) -> bool {
    p.x >= 0.0 && p.y >= 0.0 && p.x <= width as f64 && p.y <= height as f64
}
