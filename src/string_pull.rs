use crate::raster::visibility_blocked;
use crate::{OccupancyGrid, Position};

/// Pulls a raw search path taut. Starting from the goal, the earliest raw point with a clear line
/// of sight to the current anchor becomes the next anchor, until the start is reached. The result
/// keeps both endpoints and is a subsequence of `raw`.
///
/// Neighbouring raw points are always accepted as a last resort: the search already validated the
/// move between them, which matters for the unchecked hop onto and off the lattice.
pub fn pull_string(grid: &OccupancyGrid, raw: &[Position]) -> Vec<Position> {
    if raw.len() <= 2 {
        return raw.to_vec();
    }
    let mut anchor = raw.len() - 1;
    let mut pulled = vec![raw[anchor]];
    while anchor > 0 {
        let next = (0..anchor - 1)
            .find(|&l| !visibility_blocked(grid, raw[l], raw[anchor]))
            .unwrap_or(anchor - 1);
        pulled.push(raw[next]);
        anchor = next;
    }
    pulled.reverse();
    pulled
}
