//! # Grotto Shared
//!
//! Plain data types used by every generation stage.
//!
//! ## Rule
//!
//! This crate holds no generation logic. Noise, caves, terrain and meshing
//! live in `grotto_procedural` and `grotto_meshing`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod constants;
pub mod coord;
pub mod math;

pub use color::Rgba8;
pub use constants::{CHUNK_SIZE, FACES_PER_VOXEL, INDICES_PER_FACE, VERTICES_PER_FACE};
pub use coord::ChunkCoord;
pub use math::{inverse_lerp, lerp, IVec2, Vec3};
