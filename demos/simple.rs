use grid_string_pulling::{MapEditor, PathFinder, Position};
use std::time::Duration;

// In this example a path is found on a map with shape
// .......
// .S.#...
// ...#...
// ...#.G.
// .......
// S marks the start
// G marks the goal
fn main() -> grid_string_pulling::Result<()> {
    let mut editor = MapEditor::new(7, 5);
    for y in 1..4 {
        editor.add_wall(3, y);
    }
    editor.set_start(Position::tile_center(1, 1))?;
    editor.set_goal(Position::tile_center(5, 3))?;

    let mut finder = PathFinder::new();
    editor.start_search(&mut finder, Duration::from_millis(1))?;
    let status = finder.run_blocking(|f| {
        if f.steps() % 25 == 0 {
            println!("step {}: {} nodes in frontier", f.steps(), f.frontier_len());
        }
    });
    print!("{}", finder.grid());
    println!("Search {status} after {} steps", finder.steps());
    if let Some(path) = finder.pulled_path() {
        println!("A path has been found:");
        for p in path {
            println!("{p}");
        }
    }
    Ok(())
}
