//! Errors raised at the edges of the kernel: map loading and search requests.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Could not access map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed map file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Tile ({x}, {y}) lies outside the {width}x{height} map")]
    TileOutOfBounds {
        x: u32,
        y: u32,
        width: usize,
        height: usize,
    },

    #[error("Unknown tile marker {marker:?} at ({x}, {y})")]
    UnknownMarker { x: u32, y: u32, marker: String },

    #[error("Position {0} lies outside the map")]
    PositionOutOfBounds(crate::Position),

    #[error("Must have starting tile for search!")]
    MissingStart,

    #[error("Must have a goal tile for search!")]
    MissingGoal,
}

pub type Result<T> = std::result::Result<T, MapError>;
