//! # Face Culling Tests
//!
//! Checks the mesher against a brute-force count of exposed faces.

use grotto_meshing::{mesh, ChunkMesh, VoxelMesher};
use grotto_procedural::{Extent3, VoxelGrid};
use grotto_shared::Rgba8;

/// Scrambled but reproducible occupancy pattern.
fn scrambled(extent: Extent3, keep_one_in: usize) -> VoxelGrid {
    VoxelGrid::from_fn(extent, 0.5, |x, y, z| {
        let h = (x * 73_856_093) ^ (y * 19_349_663) ^ (z * 83_492_791);
        (h % keep_one_in != 0).then(|| Rgba8::opaque((x * 16) as u8, (y * 16) as u8, (z * 16) as u8))
    })
}

/// Counts exposed faces by checking all six neighbours of every active voxel.
fn brute_force_faces(grid: &VoxelGrid) -> usize {
    let extent = grid.extent();
    let mut faces = 0;
    for y in 0..extent.height as isize {
        for z in 0..extent.depth as isize {
            for x in 0..extent.width as isize {
                if !grid.is_active(x, y, z) {
                    continue;
                }
                for (dx, dy, dz) in [(0, 0, -1), (0, 0, 1), (-1, 0, 0), (1, 0, 0), (0, -1, 0), (0, 1, 0)] {
                    if !grid.is_active(x + dx, y + dy, z + dz) {
                        faces += 1;
                    }
                }
            }
        }
    }
    faces
}

/// Test: Total faces match the brute-force count for any chunk size.
#[test]
fn test_face_count_matches_brute_force() {
    let grid = scrambled(Extent3::new(12, 9, 10), 3);
    let expected = brute_force_faces(&grid);
    assert!(expected > 0);

    for chunk_size in [1, 3, 4, 5, 12, 16] {
        let meshes = mesh(&grid, chunk_size);
        let faces: usize = meshes.iter().map(ChunkMesh::face_count).sum();
        assert_eq!(faces, expected, "chunk size {chunk_size}");
    }
}

/// Test: Every face is two triangles, four vertices, one color.
#[test]
fn test_faces_are_uniform_quads() {
    let grid = scrambled(Extent3::new(8, 6, 8), 2);
    for m in mesh(&grid, 4) {
        assert_eq!(m.vertices.len(), m.colors.len());
        assert_eq!(m.indices.len(), m.face_count() * 6);
        assert_eq!(m.triangle_count(), m.face_count() * 2);
        for quad in m.colors.chunks(4) {
            assert!(quad.iter().all(|c| *c == quad[0]), "face with mixed colors");
        }
        for (face, tri) in m.indices.chunks(6).enumerate() {
            let base = (face * 4) as u32;
            assert_eq!(tri, &[base, base + 1, base + 3, base + 3, base + 1, base + 2]);
        }
    }
}

/// Test: Same grid, same buffers.
#[test]
fn test_meshing_is_deterministic() {
    let grid = scrambled(Extent3::new(10, 7, 10), 4);
    let mesher = VoxelMesher::new(5);
    assert_eq!(mesher.mesh(&grid), mesher.mesh(&grid));
}

/// Test: Vertices of every chunk stay inside that chunk's footprint.
#[test]
fn test_vertices_stay_in_their_chunk() {
    let extent = Extent3::new(8, 4, 8);
    let grid = scrambled(extent, 2);
    let cube = grid.cube_size();
    let half_w = extent.width as f32 * cube / 2.0;
    let half_d = extent.depth as f32 * cube / 2.0;

    for m in mesh(&grid, 4) {
        let min_x = -half_w + (m.coord.x * 4) as f32 * cube;
        let min_z = -half_d + (m.coord.z * 4) as f32 * cube;
        for v in &m.vertices {
            assert!(v.x >= min_x - 1e-5 && v.x <= min_x + 4.0 * cube + 1e-5);
            assert!(v.z >= min_z - 1e-5 && v.z <= min_z + 4.0 * cube + 1e-5);
        }
    }
}
