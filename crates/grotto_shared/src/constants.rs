//! # Generation Constants
//!
//! Values baked into the generator. Anything a user may tune lives in the
//! configuration instead.

/// Default chunk width/depth in voxels.
pub const CHUNK_SIZE: usize = 16;

/// Vertices emitted per visible voxel face.
pub const VERTICES_PER_FACE: usize = 4;

/// Triangle indices emitted per visible voxel face (two triangles).
pub const INDICES_PER_FACE: usize = 6;

/// Faces on a cube.
pub const FACES_PER_VOXEL: usize = 6;
