use grid_string_pulling::{path_length, MapData, MapEditor, PathFinder, DEFAULT_TICK_INTERVAL};
use std::env;

// Loads a map file given on the command line, searches between its start and goal and prints
// both the raw and the pulled path.
fn main() -> grid_string_pulling::Result<()> {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: load_map <map.json>");
        return Ok(());
    };
    let editor = MapEditor::from_map_data(&MapData::load(path)?)?;
    let mut finder = PathFinder::new();
    editor.start_search(&mut finder, DEFAULT_TICK_INTERVAL)?;
    let status = finder.run_to_end();
    print!("{}", finder.grid());
    println!(
        "Search {status} after {} steps, {} lattice points visited",
        finder.steps(),
        finder.visited_count()
    );
    if let (Some(raw), Some(pulled)) = (finder.raw_path(), finder.pulled_path()) {
        println!("raw: {} points, length {:.3}", raw.len(), path_length(raw));
        println!("pulled: {} points, length {:.3}", pulled.len(), path_length(pulled));
        for p in pulled {
            println!("{p}");
        }
    }
    Ok(())
}
