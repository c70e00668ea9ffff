// CLI entry point for the cave generator.
//
// Builds a `CaveConfig` (defaults, optionally a JSON file, then individual
// flag overrides), runs `generate()`, prints a summary and optionally writes
// the meshes as OBJ and the whole cave as JSON.
//
// Usage:
//   cavegen [OPTIONS]
//     --config <PATH>        Load a CaveConfig JSON file first
//     --width <N>            Cells along X (default: 50)
//     --depth <N>            Cells along Z (default: 50)
//     --seed <TEXT>          Seed string (default: cavern)
//     --random-seed          Derive the seed from the clock
//     --smooth <N>           Smoothing passes (default: 5)
//     --scatter <N>          Dust scatter passes (default: 2)
//     --cell-size <F>        Cell edge length (default: 1.0)
//     --wall-height <F>      Wall extrusion depth (default: 5.0)
//     --obj <PATH>           Write floor and walls as Wavefront OBJ
//     --json <PATH>          Write the full cave as JSON
//
// Set RUST_LOG=debug for per-stage logging.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use cavern_gen::export::write_obj;
use cavern_gen::grid::CellState;
use cavern_gen::{CaveConfig, generate};

struct Args {
    config: CaveConfig,
    obj_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("cavegen: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let cave = generate(&args.config)?;

    println!("=== Cavern ===");
    println!("Seed: {}", cave.seed);
    println!("Grid: {} x {}", cave.grid.width(), cave.grid.depth());
    println!(
        "Cells: {} filled, {} dust, {} empty",
        cave.grid.count(CellState::Filled),
        cave.grid.count(CellState::Dust),
        cave.grid.count(CellState::Empty)
    );
    println!(
        "Floor: {} vertices, {} triangles",
        cave.floor.vertex_count(),
        cave.floor.triangle_count()
    );
    println!("Outlines: {}", cave.outlines.len());
    println!(
        "Walls: {} vertices, {} triangles",
        cave.walls.vertex_count(),
        cave.walls.triangle_count()
    );

    if let Some(path) = &args.obj_path {
        let mut out = BufWriter::new(File::create(path)?);
        write_obj(&mut out, &cave.floor, &cave.walls)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.json_path {
        let out = BufWriter::new(File::create(path)?);
        serde_json::to_writer(out, &cave)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Parse `std::env::args()`. A `--config` file is applied before the other
/// flags regardless of its position, so flags always override the file.
fn parse_args() -> Result<Args, Box<dyn Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut config = match flag_value(&argv, "--config") {
        Some(path) => CaveConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => CaveConfig::default(),
    };
    let mut obj_path = None;
    let mut json_path = None;

    let mut i = 0;
    while i < argv.len() {
        let flag = argv[i].as_str();
        match flag {
            "--random-seed" => config.use_random_seed = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                i += 1;
                let value = argv
                    .get(i)
                    .ok_or_else(|| format!("{flag} requires a value"))?;
                match flag {
                    "--config" => {}
                    "--width" => config.width = parse_value(flag, value)?,
                    "--depth" => config.depth = parse_value(flag, value)?,
                    "--seed" => config.seed = value.clone(),
                    "--smooth" => config.smooth_iterations = parse_value(flag, value)?,
                    "--scatter" => config.scatter_iterations = parse_value(flag, value)?,
                    "--cell-size" => config.cell_size = parse_value(flag, value)?,
                    "--wall-height" => config.wall_height = parse_value(flag, value)?,
                    "--obj" => obj_path = Some(PathBuf::from(value)),
                    "--json" => json_path = Some(PathBuf::from(value)),
                    other => {
                        print_usage();
                        return Err(format!("unknown argument: {other}").into());
                    }
                }
            }
        }
        i += 1;
    }

    Ok(Args {
        config,
        obj_path,
        json_path,
    })
}

fn flag_value<'a>(argv: &'a [String], flag: &str) -> Option<&'a str> {
    argv.iter()
        .position(|a| a == flag)
        .and_then(|i| argv.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{flag} requires a valid number, got {value:?}"))
}

fn print_usage() {
    println!("Usage: cavegen [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>        Load a CaveConfig JSON file first");
    println!("  --width <N>            Cells along X (default: 50)");
    println!("  --depth <N>            Cells along Z (default: 50)");
    println!("  --seed <TEXT>          Seed string (default: cavern)");
    println!("  --random-seed          Derive the seed from the clock");
    println!("  --smooth <N>           Smoothing passes (default: 5)");
    println!("  --scatter <N>          Dust scatter passes (default: 2)");
    println!("  --cell-size <F>        Cell edge length (default: 1.0)");
    println!("  --wall-height <F>      Wall extrusion depth (default: 5.0)");
    println!("  --obj <PATH>           Write floor and walls as Wavefront OBJ");
    println!("  --json <PATH>          Write the full cave as JSON");
    println!("  --help, -h             Show this help");
}
