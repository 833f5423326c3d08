//! Trinav CLI - plan paths over navigation meshes.
//!
//! Usage: trinav <COMMAND> [OPTIONS]
//!
//! Run `trinav --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Point3;

use trinav::algo::navigate::{navigate, NavigateOptions, SamplingMode, DEFAULT_SURFACE_TOLERANCE};
use trinav::error::NavError;
use trinav::io;
use trinav::mesh::{build_from_triangles, TriMesh};

#[derive(Parser)]
#[command(name = "trinav")]
#[command(author, version, about = "Navigation mesh path planning CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a path between two surface points
    Path {
        /// Navigation mesh file (default: built-in two-triangle demo)
        #[arg(short, long)]
        mesh: Option<PathBuf>,

        /// Start location as x,y,z
        #[arg(short, long, value_parser = parse_point, allow_hyphen_values = true)]
        start: Option<Point3<f64>>,

        /// Target location as x,y,z
        #[arg(short, long, value_parser = parse_point, allow_hyphen_values = true)]
        target: Option<Point3<f64>>,

        /// Waypoint sampling mode
        #[arg(long, value_enum, default_value = "random")]
        mode: Mode,

        /// Seed for random sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum distance from the surface for start and target
        #[arg(long, default_value_t = DEFAULT_SURFACE_TOLERANCE)]
        tolerance: f64,

        /// Write the path as a PLY polyline
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display navigation mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Uniformly random point in each face
    Random,
    /// Midpoint of the entry and target projections on each shared edge
    OnEdge,
}

impl From<Mode> for SamplingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Random => SamplingMode::Random,
            Mode::OnEdge => SamplingMode::OnEdge,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        let code = match e.downcast_ref::<NavError>() {
            Some(NavError::OffSurface { .. }) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Path {
            mesh,
            start,
            target,
            mode,
            seed,
            tolerance,
            output,
        } => {
            let mut options = NavigateOptions::default()
                .with_sampling(mode.into())
                .with_surface_tolerance(tolerance);
            if let Some(seed) = seed {
                options = options.with_seed(seed);
            }
            cmd_path(mesh, start, target, &options, output)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

fn parse_point(s: &str) -> Result<Point3<f64>, String> {
    let coords = s
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{}': {}", s, e))?;

    match coords[..] {
        [x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(format!("expected x,y,z but got {} values", coords.len())),
    }
}

fn demo_mesh() -> Result<TriMesh, NavError> {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ];
    build_from_triangles(&vertices, &[[0, 1, 2], [1, 2, 3]])
}

fn cmd_path(
    mesh_path: Option<PathBuf>,
    start: Option<Point3<f64>>,
    target: Option<Point3<f64>>,
    options: &NavigateOptions,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriMesh = match &mesh_path {
        Some(path) => io::load(path)?,
        None => demo_mesh()?,
    };

    let start = start.unwrap_or_else(Point3::origin);
    let target = target.unwrap_or_else(|| Point3::new(1.0, 1.0, 0.0));

    let timer = Instant::now();
    let path = navigate(&mesh, start, target, options)?;
    let elapsed = timer.elapsed();

    let Some(path) = path else {
        println!("search failed");
        return Ok(());
    };

    for p in path.waypoints() {
        println!("{} {} {}", p.x, p.y, p.z);
    }
    log::info!(
        "{} waypoints, length {:.6} ({:.2?})",
        path.len(),
        path.length(),
        elapsed
    );

    if let Some(output) = output {
        io::ply::save_path(&path, &output)?;
        eprintln!("Saved: {}", output.display());
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Adjacent face pairs: {}", mesh.num_adjacencies());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for fid in mesh.face_ids() {
        let area = mesh.face_area(fid);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let components = mesh.num_components();
    if components == 1 {
        println!("Connectivity: Connected");
    } else {
        println!("Connectivity: {} components (paths cannot cross between them)", components);
    }

    Ok(())
}
