//! # Terrain Composition
//!
//! Merges the surface height field with the carved cave volume into the final
//! voxel grid.
//!
//! For every `(x, z)` column the adjusted noise value picks a surface height
//! between `base_cube_height` and `max_cube_height`. Cells at or below the
//! surface are active unless a cave carved them. In caves-only mode the height
//! field is ignored and every uncarved cell is active.

use grotto_shared::{Rgba8, Vec3};

use crate::curve::AdjustmentCurve;
use crate::noise::NoisePlane;
use crate::volume::{Extent3, SolidVolume};

/// One cell of the final terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Voxel {
    /// Whether this cell is filled.
    pub active: bool,
    /// World-space center of the cube.
    pub position: Vec3,
    /// Flat color of every face of the cube.
    pub color: Rgba8,
}

impl Voxel {
    /// The eight cube corners for a cube of side `cube_size`.
    ///
    /// Front face (`-z`) clockwise from bottom-left, then the same four at `+z`:
    ///
    /// ```text
    ///     5-------6
    ///    /|      /|
    ///   1-------2 |
    ///   | 4-----|-7
    ///   |/      |/
    ///   0-------3
    /// ```
    #[must_use]
    pub fn corners(&self, cube_size: f32) -> [Vec3; 8] {
        let h = cube_size * 0.5;
        let p = self.position;
        [
            Vec3::new(p.x - h, p.y - h, p.z - h),
            Vec3::new(p.x - h, p.y + h, p.z - h),
            Vec3::new(p.x + h, p.y + h, p.z - h),
            Vec3::new(p.x + h, p.y - h, p.z - h),
            Vec3::new(p.x - h, p.y - h, p.z + h),
            Vec3::new(p.x - h, p.y + h, p.z + h),
            Vec3::new(p.x + h, p.y + h, p.z + h),
            Vec3::new(p.x + h, p.y - h, p.z + h),
        ]
    }
}

/// World-space center of grid cell `(x, y, z)`.
///
/// The grid is centered on the origin horizontally and rests on `y = 0`.
#[must_use]
pub fn voxel_center(extent: Extent3, cube_size: f32, x: usize, y: usize, z: usize) -> Vec3 {
    Vec3::new(
        -(extent.width as f32) * cube_size / 2.0 + (x as f32 + 0.5) * cube_size,
        (y as f32 + 0.5) * cube_size,
        -(extent.depth as f32) * cube_size / 2.0 + (z as f32 + 0.5) * cube_size,
    )
}

/// Dense `W x H x D` grid of voxels, laid out like [`Extent3::index`].
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    extent: Extent3,
    cube_size: f32,
    voxels: Vec<Voxel>,
}

impl VoxelGrid {
    /// Builds a grid by asking `fill` for the color of each active cell.
    ///
    /// `fill` returns `None` for inactive cells. Positions are derived from
    /// the cell coordinates and `cube_size`.
    pub fn from_fn<F>(extent: Extent3, cube_size: f32, mut fill: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Option<Rgba8>,
    {
        let mut voxels = Vec::with_capacity(extent.volume());
        for y in 0..extent.height {
            for z in 0..extent.depth {
                for x in 0..extent.width {
                    let position = voxel_center(extent, cube_size, x, y, z);
                    let voxel = match fill(x, y, z) {
                        Some(color) => Voxel {
                            active: true,
                            position,
                            color,
                        },
                        None => Voxel {
                            active: false,
                            position,
                            color: Rgba8::TRANSPARENT,
                        },
                    };
                    voxels.push(voxel);
                }
            }
        }
        Self {
            extent,
            cube_size,
            voxels,
        }
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Side length of every cube.
    #[inline]
    #[must_use]
    pub const fn cube_size(&self) -> f32 {
        self.cube_size
    }

    /// Voxel at `(x, y, z)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&Voxel> {
        self.extent.index(x, y, z).map(|idx| &self.voxels[idx])
    }

    /// Returns true if the cell exists and is active. Out of bounds is inactive.
    #[inline]
    #[must_use]
    pub fn is_active(&self, x: isize, y: isize, z: isize) -> bool {
        if x < 0 || y < 0 || z < 0 {
            return false;
        }
        self.get(x as usize, y as usize, z as usize)
            .is_some_and(|voxel| voxel.active)
    }

    /// All voxels in storage order.
    #[must_use]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Number of active voxels.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.voxels.iter().filter(|voxel| voxel.active).count()
    }
}

/// Inputs of [`compose`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComposeParams {
    /// Lowest possible surface height.
    pub base_cube_height: usize,
    /// Highest possible surface height; the grid is one taller than this.
    pub max_cube_height: usize,
    /// Side length of every cube.
    pub cube_size: f32,
    /// Horizontal offset of the visible grid inside the cave volume.
    pub cave_padding: usize,
    /// Ignore the surface and fill every uncarved cell.
    pub only_caves: bool,
    /// Color of the top cell of each column.
    pub surface_color: Rgba8,
    /// Color of every cell under the surface.
    pub below_surface_color: Rgba8,
    /// Color used in caves-only mode.
    pub cave_color: Rgba8,
}

impl ComposeParams {
    /// Surface height above `base_cube_height` for adjusted noise `value`,
    /// rounded and clamped into `[0, max - base]`.
    #[must_use]
    pub fn relative_height(&self, value: f32) -> usize {
        let range = self.max_cube_height.saturating_sub(self.base_cube_height);
        let scaled = (value * range as f32).round();
        scaled.clamp(0.0, range as f32) as usize
    }
}

/// Combines the height field and the cave volume into a voxel grid.
///
/// The grid covers `heights.width() x (max_cube_height + 1) x heights.depth()`.
/// Cave cells are read at `(x + cave_padding, y, z + cave_padding)`; cells the
/// cave volume does not cover count as solid.
#[must_use]
pub fn compose(
    heights: &NoisePlane,
    caves: &SolidVolume,
    params: &ComposeParams,
    curve: &dyn AdjustmentCurve,
) -> VoxelGrid {
    let extent = Extent3::new(heights.width(), params.max_cube_height + 1, heights.depth());
    let pad = params.cave_padding;

    let surface: Vec<usize> = heights
        .values()
        .iter()
        .map(|&value| params.base_cube_height + params.relative_height(curve.evaluate(value)))
        .collect();

    let grid = VoxelGrid::from_fn(extent, params.cube_size, |x, y, z| {
        if caves.is_carved(x + pad, y, z + pad) {
            return None;
        }
        if params.only_caves {
            return Some(params.cave_color);
        }
        let top = surface[x * extent.depth + z];
        match y.cmp(&top) {
            std::cmp::Ordering::Less => Some(params.below_surface_color),
            std::cmp::Ordering::Equal => Some(params.surface_color),
            std::cmp::Ordering::Greater => None,
        }
    });

    tracing::debug!(
        width = extent.width,
        height = extent.height,
        depth = extent.depth,
        active = grid.active_count(),
        "terrain composed"
    );
    grid
}
