//! # Grotto Procedural Generation
//!
//! Deterministic voxel terrain with worm-carved caves.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same configuration and seed always produce the same voxels
//! 2. **Forward-only**: Every stage consumes the previous stage's output and nothing else
//! 3. **Full regeneration**: Each call builds a fresh grid; nothing is patched in place
//! 4. **Infallible core**: Out-of-range inputs are clamped; only config loading can fail
//!
//! ## Core Components
//!
//! - `noise`: Seeded multi-octave Perlin planes in `[0, 1]`
//! - `worm`: Starting points and stochastic cave walks
//! - `carve`: Sphere carving along worm trajectories
//! - `terrain`: Height field + caves -> voxel grid
//! - `config`: TOML-loadable generator settings
//!
//! ## Example
//!
//! ```rust,ignore
//! use grotto_procedural::{carve, compose, find_starting_points, noise_plane, plan_worms};
//! use grotto_procedural::{GeneratorConfig, PerlinNoise};
//!
//! let config = GeneratorConfig::default();
//! let noise = PerlinNoise::default();
//! let extent = config.cave_extent();
//!
//! let points = find_starting_points(&noise, extent.width, extent.depth,
//!     config.cave_offset(), config.caves.scale, config.seed);
//! let worms = plan_worms(&noise, &points, &config.worm_params(), config.seed);
//! let caves = carve(&noise, &worms, extent, &config.carve_params());
//! let heights = noise_plane(&noise, &config.terrain_plane(), config.seed);
//! let grid = compose(&heights, &caves, &config.compose_params(), &config.terrain.adjustment_curve);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod carve;
pub mod config;
pub mod curve;
pub mod error;
pub mod noise;
pub mod rng;
pub mod terrain;
pub mod volume;
pub mod worm;

pub use carve::{carve, carve_radius, CarveParams, CaveCarver};
pub use config::{CaveConfig, GeneratorConfig, TerrainNoiseConfig};
pub use curve::{AdjustmentCurve, KeyframeCurve, LinearCurve};
pub use error::{ConfigError, ConfigResult};
pub use noise::{noise_plane, noise_plane_with, NoisePlane, PerlinNoise, PlaneParams, WorldSeed};
pub use rng::{ChaChaStream, DeterministicRng};
pub use terrain::{compose, ComposeParams, Voxel, VoxelGrid};
pub use volume::{Extent3, SolidVolume};
pub use worm::{
    find_starting_points, find_starting_points_with, local_maxima, plan_worms, WalkOutcome, Worm, WormParams, WormPlan,
    WormPlanner, WormPrelude,
};
