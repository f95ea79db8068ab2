//! # Grotto
//!
//! Voxel terrain with worm-carved caves, regenerated in one deterministic
//! batch.
//!
//! ## Crates
//!
//! - `grotto_shared`: math, colors, chunk coordinates
//! - `grotto_procedural`: noise, worms, carving, composition, configuration
//! - `grotto_meshing`: per-chunk face-culled triangle buffers
//! - `grotto` (this crate): the pipeline that runs them in order
//!
//! ## Example
//!
//! ```rust,ignore
//! use grotto::{GeneratorConfig, TerrainPipeline};
//!
//! let config = GeneratorConfig::load("world.toml")?;
//! let generation = TerrainPipeline::default().generate(&config);
//! println!("{} triangles", generation.stats.triangles);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod pipeline;

pub use grotto_meshing::{ChunkMesh, VoxelMesher};
pub use grotto_procedural::{ConfigError, ConfigResult, GeneratorConfig, VoxelGrid, WorldSeed};
pub use grotto_shared::{ChunkCoord, Rgba8, Vec3};
pub use pipeline::{generate, Generation, GenerationStats, TerrainPipeline};
