//! Loads `<key> <value>` lines from a text file into an `AvlTreeMap`
//! and prints the entries in key order followed by the tree shape.
//!
//! ```text
//! cargo run --example names -- demos/names.txt
//! ```

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};

use avl_map::AvlTreeMap;

const DEFAULT_PATH: &str = "demos/names.txt";

fn read_file_entries(map: &mut AvlTreeMap<i32, String>, path: &str) -> Result<(), Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let key = match tokens.next().map(str::parse::<i32>) {
            Some(Ok(key)) => key,
            _ => {
                eprintln!("{}:{}: skipping line without a numeric key", path, line_no + 1);
                continue;
            }
        };
        let value = tokens.next().unwrap_or_default();
        map.insert(key, value.to_owned());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_owned());

    let mut map = AvlTreeMap::new();
    read_file_entries(&mut map, &path).map_err(|err| format!("unable to read {}: {}", path, err))?;

    println!("{}", map);
    print!("{}", map.render_structure());
    Ok(())
}
