//! Lists the directory table of a romdisk image.

use archive_builder::reader::list_entries;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "List the contents of a romdisk image", long_about = None)]
struct Args {
    /// The image to inspect.
    image: PathBuf,

    /// Print the entries as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let file = File::open(&args.image)?;
    let entries = list_entries(file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Image Directory ({} files):", entries.len());
    for entry in &entries {
        println!(
            "- {:<16} {:>7} bytes @ {:#06x}  {}",
            entry.name, entry.size, entry.offset, entry.modified
        );
    }
    Ok(())
}
