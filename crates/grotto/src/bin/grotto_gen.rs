//! # Grotto Generator
//!
//! Runs one full regeneration and reports what it built.
//!
//! ```bash
//! # Built-in defaults
//! grotto_gen
//!
//! # From a config file, with stage timings
//! RUST_LOG=grotto=debug grotto_gen world.toml
//! ```

use std::process::ExitCode;

use grotto::{GeneratorConfig, TerrainPipeline};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match GeneratorConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%path, "{err}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            tracing::info!("no config given, using defaults");
            GeneratorConfig::default()
        }
    };

    let generation = TerrainPipeline::default().generate(&config);
    let stats = generation.stats;
    let extent = generation.grid.extent();

    println!("grid            {} x {} x {}", extent.width, extent.height, extent.depth);
    println!("starting points {}", stats.starting_points);
    println!(
        "worms           {} kept, {} out of range, {} too short",
        stats.worms_kept, stats.worms_out_of_range, stats.worms_too_short
    );
    println!("carved cells    {}", stats.carved_cells);
    println!("active voxels   {}", stats.active_voxels);
    println!(
        "mesh            {} chunks, {} faces, {} triangles, {} vertices",
        stats.chunks, stats.faces, stats.triangles, stats.vertices
    );

    for mesh in &generation.meshes {
        println!(
            "  chunk ({:>2}, {:>2})  {:>6} vertices  {:>6} triangles  {:>8} bytes",
            mesh.coord.x,
            mesh.coord.z,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.vertex_bytes().len() + mesh.color_bytes().len() + mesh.index_bytes().len()
        );
    }

    ExitCode::SUCCESS
}
