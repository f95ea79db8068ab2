//! Chunked Face-Culling Mesher
//!
//! Splits the grid into square horizontal chunks (full height) and emits one
//! quad per visible voxel face.
//!
//! KEY RULES:
//! - Neighbours are read from the FULL grid, so faces on a chunk border are
//!   culled exactly like interior faces. No seams, no duplicates.
//! - Out of bounds counts as empty: the grid's outer shell is always drawn.
//! - Each chunk gets fresh buffers.
//! - Grid sides that are not multiples of the chunk size get a narrower last
//!   chunk; no voxel is dropped.

use bytemuck::cast_slice;
use grotto_procedural::{Voxel, VoxelGrid};
use grotto_shared::{ChunkCoord, Rgba8, Vec3, CHUNK_SIZE, INDICES_PER_FACE, VERTICES_PER_FACE};

use crate::face::Face;

/// Quad split into two triangles sharing the 1-3 diagonal.
const QUAD_INDICES: [u32; INDICES_PER_FACE] = [0, 1, 3, 3, 1, 2];

// =============================================================================
// MESH OUTPUT
// =============================================================================

/// Triangle buffers for one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Which chunk these buffers cover.
    pub coord: ChunkCoord,
    /// Vertex positions, four per face.
    pub vertices: Vec<Vec3>,
    /// Triangle list, six per face, indexing `vertices`.
    pub indices: Vec<u32>,
    /// One color per vertex.
    pub colors: Vec<Rgba8>,
}

impl ChunkMesh {
    /// Creates empty buffers for `coord`.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            ..Self::default()
        }
    }

    /// Check if mesh is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get triangle count
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex count
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get visible face count
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Vertex positions as raw bytes (`3 x f32` per vertex).
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        cast_slice(&self.vertices)
    }

    /// Vertex colors as raw bytes (`4 x u8` per vertex).
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        cast_slice(&self.colors)
    }

    /// Index buffer as raw bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        cast_slice(&self.indices)
    }

    /// Appends one face of `voxel`.
    fn push_face(&mut self, voxel: &Voxel, corners: &[Vec3; 8], face: Face) {
        let base = self.vertices.len() as u32;
        for index in face.corner_indices() {
            self.vertices.push(corners[index]);
            self.colors.push(voxel.color);
        }
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }
}

// =============================================================================
// MESHER
// =============================================================================

/// Turns a [`VoxelGrid`] into per-chunk [`ChunkMesh`] buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelMesher {
    chunk_size: usize,
}

impl Default for VoxelMesher {
    fn default() -> Self {
        Self::new(CHUNK_SIZE)
    }
}

impl VoxelMesher {
    /// Creates a mesher with square chunks of `chunk_size` voxels.
    ///
    /// A `chunk_size` of zero is treated as one.
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Chunk side in voxels.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks along X and Z.
    #[must_use]
    pub fn chunk_counts(&self, grid: &VoxelGrid) -> (usize, usize) {
        let extent = grid.extent();
        (
            extent.width.div_ceil(self.chunk_size),
            extent.depth.div_ceil(self.chunk_size),
        )
    }

    /// Meshes every chunk, X-major then Z.
    #[must_use]
    pub fn mesh(&self, grid: &VoxelGrid) -> Vec<ChunkMesh> {
        let (chunks_x, chunks_z) = self.chunk_counts(grid);
        let mut meshes = Vec::with_capacity(chunks_x * chunks_z);
        for cx in 0..chunks_x {
            for cz in 0..chunks_z {
                meshes.push(self.mesh_chunk(grid, ChunkCoord::new(cx, cz)));
            }
        }

        let faces: usize = meshes.iter().map(ChunkMesh::face_count).sum();
        tracing::debug!(chunks = meshes.len(), faces, "grid meshed");
        meshes
    }

    /// Meshes a single chunk. Chunks past the grid come back empty.
    #[must_use]
    pub fn mesh_chunk(&self, grid: &VoxelGrid, coord: ChunkCoord) -> ChunkMesh {
        let extent = grid.extent();
        let cube_size = grid.cube_size();
        let x_start = coord.voxel_x(self.chunk_size);
        let z_start = coord.voxel_z(self.chunk_size);
        let x_end = (x_start + self.chunk_size).min(extent.width);
        let z_end = (z_start + self.chunk_size).min(extent.depth);

        let mut mesh = ChunkMesh::new(coord);
        for x in x_start..x_end {
            for z in z_start..z_end {
                for y in 0..extent.height {
                    let Some(voxel) = grid.get(x, y, z) else {
                        continue;
                    };
                    if !voxel.active {
                        continue;
                    }

                    let corners = voxel.corners(cube_size);
                    for face in Face::ALL {
                        let (dx, dy, dz) = face.neighbour_offset();
                        let hidden = grid.is_active(x as isize + dx, y as isize + dy, z as isize + dz);
                        if !hidden {
                            mesh.push_face(voxel, &corners, face);
                        }
                    }
                }
            }
        }
        mesh
    }
}

/// Meshes `grid` in square chunks of `chunk_size`.
#[must_use]
pub fn mesh(grid: &VoxelGrid, chunk_size: usize) -> Vec<ChunkMesh> {
    VoxelMesher::new(chunk_size).mesh(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grotto_procedural::Extent3;

    const RED: Rgba8 = Rgba8::opaque(255, 0, 0);

    fn grid_of(extent: Extent3, active: impl Fn(usize, usize, usize) -> bool) -> VoxelGrid {
        VoxelGrid::from_fn(extent, 1.0, |x, y, z| active(x, y, z).then_some(RED))
    }

    #[test]
    fn test_single_voxel() {
        let grid = grid_of(Extent3::new(1, 1, 1), |_, _, _| true);
        let meshes = mesh(&grid, 16);
        assert_eq!(meshes.len(), 1);

        let m = &meshes[0];
        assert_eq!(m.face_count(), 6);
        assert_eq!(m.vertex_count(), 24);
        assert_eq!(m.triangle_count(), 12);
        assert_eq!(m.colors.len(), 24);
        assert!(m.colors.iter().all(|c| *c == RED));
    }

    #[test]
    fn test_quad_index_pattern() {
        let grid = grid_of(Extent3::new(1, 1, 1), |_, _, _| true);
        let m = &mesh(&grid, 16)[0];
        for (face, chunk) in m.indices.chunks(6).enumerate() {
            let base = (face * 4) as u32;
            assert_eq!(chunk, &[base, base + 1, base + 3, base + 3, base + 1, base + 2]);
        }
    }

    #[test]
    fn test_first_face_is_front() {
        let grid = grid_of(Extent3::new(1, 1, 1), |_, _, _| true);
        let m = &mesh(&grid, 16)[0];
        let corners = grid.get(0, 0, 0).unwrap().corners(1.0);
        assert_eq!(&m.vertices[..4], &[corners[0], corners[1], corners[2], corners[3]]);
        // Top comes last
        assert_eq!(&m.vertices[20..], &[corners[1], corners[5], corners[6], corners[2]]);
    }

    #[test]
    fn test_two_voxels_share_hidden_face() {
        let grid = grid_of(Extent3::new(2, 1, 1), |_, _, _| true);
        let m = &mesh(&grid, 16)[0];
        assert_eq!(m.face_count(), 10);
        assert_eq!(m.triangle_count(), 20);
    }

    #[test]
    fn test_all_inactive_is_empty() {
        let grid = grid_of(Extent3::new(8, 5, 8), |_, _, _| false);
        let meshes = mesh(&grid, 4);
        assert_eq!(meshes.len(), 4);
        for m in &meshes {
            assert!(m.is_empty());
            assert_eq!(m.triangle_count(), 0);
            assert!(m.colors.is_empty());
        }
    }

    #[test]
    fn test_enclosed_voxel_emits_nothing() {
        let grid = grid_of(Extent3::new(3, 3, 3), |_, _, _| true);
        // Only the outer shell is visible: 6 sides of 3x3 faces
        let m = &mesh(&grid, 16)[0];
        assert_eq!(m.face_count(), 6 * 9);

        // Mesh just the centre voxel's chunk in a 1-wide partition
        let single = VoxelMesher::new(1).mesh_chunk(&grid, ChunkCoord::new(1, 1));
        // Column (1, 1): top and bottom of the column are exposed, the middle is not
        assert_eq!(single.face_count(), 2);
    }

    #[test]
    fn test_chunk_seam_has_no_duplicate_faces() {
        let extent = Extent3::new(4, 2, 2);
        let grid = grid_of(extent, |_, _, _| true);
        let whole = mesh(&grid, 4);
        let split = mesh(&grid, 2);

        assert_eq!(whole.len(), 1);
        assert_eq!(split.len(), 2);
        let split_faces: usize = split.iter().map(ChunkMesh::face_count).sum();
        assert_eq!(split_faces, whole[0].face_count());

        // No +x face at x = 2 in the first chunk, no -x face at x = 2 in the second
        let seam_x = -(extent.width as f32) / 2.0 + 2.0;
        for m in &split {
            for quad in m.vertices.chunks(4) {
                assert!(
                    !quad.iter().all(|v| (v.x - seam_x).abs() < 1e-6),
                    "seam face emitted in chunk {:?}",
                    m.coord
                );
            }
        }
    }

    #[test]
    fn test_remainder_chunks_cover_the_grid() {
        let grid = grid_of(Extent3::new(5, 1, 3), |_, _, _| true);
        let mesher = VoxelMesher::new(2);
        assert_eq!(mesher.chunk_counts(&grid), (3, 2));

        let meshes = mesher.mesh(&grid);
        assert_eq!(meshes.len(), 6);
        assert_eq!(meshes[0].coord, ChunkCoord::new(0, 0));
        assert_eq!(meshes[1].coord, ChunkCoord::new(0, 1));
        // Top and bottom of all 15 voxels plus the 2 * (5 + 3) border sides
        let faces: usize = meshes.iter().map(ChunkMesh::face_count).sum();
        assert_eq!(faces, 2 * 15 + 2 * (5 + 3));
    }

    #[test]
    fn test_buffers_do_not_leak_between_chunks() {
        let grid = grid_of(Extent3::new(4, 1, 2), |x, _, _| x < 2);
        let meshes = mesh(&grid, 2);
        assert_eq!(meshes.len(), 2);
        assert!(!meshes[0].is_empty());
        assert!(meshes[1].is_empty());
        assert_eq!(*meshes[0].indices.iter().max().unwrap() as usize, meshes[0].vertex_count() - 1);
    }

    #[test]
    fn test_byte_views() {
        let grid = grid_of(Extent3::new(1, 1, 1), |_, _, _| true);
        let m = &mesh(&grid, 1)[0];
        assert_eq!(m.vertex_bytes().len(), 24 * 12);
        assert_eq!(m.color_bytes().len(), 24 * 4);
        assert_eq!(m.index_bytes().len(), 36 * 4);
        assert_eq!(&m.color_bytes()[..4], &[255, 0, 0, 255]);
    }
}
