//! Chunk coordinates on the horizontal plane of a finite voxel grid.

use serde::{Deserialize, Serialize};

/// Chunk coordinate (identifies a chunk in the grid's horizontal partition).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not voxels).
    pub x: usize,
    /// Z coordinate (in chunks, not voxels).
    pub z: usize,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Returns the voxel X coordinate of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub const fn voxel_x(self, chunk_size: usize) -> usize {
        self.x * chunk_size
    }

    /// Returns the voxel Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn voxel_z(self, chunk_size: usize) -> usize {
        self.z * chunk_size
    }
}
