//! # Grotto Meshing
//!
//! Converts a composed [`VoxelGrid`](grotto_procedural::VoxelGrid) into
//! per-chunk triangle buffers.
//!
//! ## Output Format
//!
//! Each [`ChunkMesh`] holds three parallel-friendly buffers:
//!
//! | Buffer     | Per face | Layout                         |
//! |------------|----------|--------------------------------|
//! | `vertices` | 4        | `[f32; 3]` world positions     |
//! | `colors`   | 4        | `[u8; 4]` RGBA, one per vertex |
//! | `indices`  | 6        | `u32`, two triangles per quad  |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grotto_meshing::mesh;
//!
//! for chunk in mesh(&grid, 16) {
//!     upload(chunk.vertex_bytes(), chunk.color_bytes(), &chunk.indices);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod face;
pub mod mesher;

pub use face::Face;
pub use mesher::{mesh, ChunkMesh, VoxelMesher};
