//! Tessera CLI - inspect and convert polygon meshes.
//!
//! Usage: tessera <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `tessera --help` for available commands. Set `RUST_LOG=debug` for
//! construction details.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use tessera::algo::curvature;
use tessera::io;
use tessera::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(author, version, about = "Half-edge mesh inspection CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file (.off or .ply)
        input: PathBuf,

        /// Show curvature statistics
        #[arg(long)]
        curvature: bool,

        /// Use single-threaded execution for curvature
        #[arg(long)]
        sequential: bool,
    },

    /// Convert a mesh between file formats
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file; the format follows the extension
        output: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            curvature: show_curvature,
            sequential,
        } => cmd_info(&input, show_curvature, sequential)?,

        Commands::Convert { input, output } => cmd_convert(&input, &output)?,
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    show_curvature: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mesh: HalfEdgeMesh = io::load(input)?;
    log::info!("loaded in {:.2?}", start.elapsed());

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Polygon mesh");
    }

    let loops = mesh.num_boundary_loops();
    if loops == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        let boundary_verts = mesh
            .vertex_ids()
            .filter(|&v| mesh.is_boundary_vertex(v))
            .count();
        println!(
            "Topology: Open ({} boundary loops, {} boundary vertices)",
            loops, boundary_verts
        );
    }

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for f in mesh.face_ids() {
        let area = mesh.face_area(f);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }
    println!("Surface area: {:.6}", mesh.total_area());
    if mesh.num_faces() > 0 {
        println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);
    }
    println!("Average edge length: {:.6}", mesh.mean_edge_length());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if show_curvature && mesh.num_vertices() > 0 {
        println!("\nCurvature:");
        let start = Instant::now();
        let curv = if sequential {
            curvature::compute_curvature_sequential(&mesh)
        } else {
            curvature::compute_curvature(&mesh)
        };
        log::info!("curvature computed in {:.2?}", start.elapsed());

        let (g_min, g_max, g_avg) = stats(curv.gaussian_values());
        let (m_min, m_max, m_avg) = stats(curv.mean_values());
        println!("  Gaussian: min={:.4}, max={:.4}, avg={:.4}", g_min, g_max, g_avg);
        println!("  Mean:     min={:.4}, max={:.4}, avg={:.4}", m_min, m_max, m_avg);

        let total_defect = curvature::total_angle_defect(&mesh);
        println!(
            "  Gauss-Bonnet Euler characteristic: {:.2}",
            total_defect / (2.0 * PI)
        );
    }

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    io::save(&mesh, output)?;
    println!(
        "Converted {} -> {} ({} vertices, {} faces)",
        input.display(),
        output.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}

fn stats(values: &[f64]) -> (f64, f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    (min, max, avg)
}
