//! # Dense Volumes
//!
//! Flat buffers over a 3D lattice with an explicit row-major index.
//!
//! Cells are stored as `[y][z][x]`: `x` varies fastest, then `z`, then `y`.
//! Every accessor is bounds-checked; out-of-range reads return `None` or the
//! documented default instead of wrapping into a neighbouring row.

use std::ops::RangeInclusive;

/// Dimensions of a 3D lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent3 {
    /// Cells along X.
    pub width: usize,
    /// Cells along Y (vertical).
    pub height: usize,
    /// Cells along Z.
    pub depth: usize,
}

impl Extent3 {
    /// Creates a new extent.
    #[inline]
    #[must_use]
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self { width, height, depth }
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> usize {
        self.width * self.height * self.depth
    }

    /// Returns true if `(x, y, z)` lies inside the lattice.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: usize, y: usize, z: usize) -> bool {
        x < self.width && y < self.height && z < self.depth
    }

    /// Cells within `reach` of `center` along an axis of `len` cells,
    /// clipped to `[0, len)`. Empty when the window misses the axis.
    #[inline]
    #[must_use]
    pub fn axis_span(center: i64, reach: i64, len: usize) -> RangeInclusive<i64> {
        let last = i64::try_from(len).unwrap_or(i64::MAX) - 1;
        center.saturating_sub(reach).max(0)..=center.saturating_add(reach).min(last)
    }

    /// Row-major index of `(x, y, z)`, or `None` outside the lattice.
    #[inline]
    #[must_use]
    pub const fn index(self, x: usize, y: usize, z: usize) -> Option<usize> {
        if self.contains(x, y, z) {
            Some((y * self.depth + z) * self.width + x)
        } else {
            None
        }
    }
}

/// 3D solid/carved field.
///
/// `true` means solid (not carved), `false` means carved out by a cave.
/// Cells start solid and can only ever be carved: there is no way to make a
/// carved cell solid again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolidVolume {
    extent: Extent3,
    solid: Vec<bool>,
}

impl SolidVolume {
    /// Creates an entirely solid volume.
    #[must_use]
    pub fn new(extent: Extent3) -> Self {
        Self {
            extent,
            solid: vec![true; extent.volume()],
        }
    }

    /// Dimensions of the volume.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Solid flag at `(x, y, z)`, or `None` outside the volume.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<bool> {
        self.extent.index(x, y, z).map(|idx| self.solid[idx])
    }

    /// Returns true if `(x, y, z)` is inside the volume and solid.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).unwrap_or(false)
    }

    /// Returns true if `(x, y, z)` is inside the volume and carved.
    #[inline]
    #[must_use]
    pub fn is_carved(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z) == Some(false)
    }

    /// Carves `(x, y, z)`. Out-of-range cells are ignored.
    ///
    /// Returns true if the cell was solid before this call.
    #[inline]
    pub fn carve(&mut self, x: usize, y: usize, z: usize) -> bool {
        match self.extent.index(x, y, z) {
            Some(idx) => std::mem::replace(&mut self.solid[idx], false),
            None => false,
        }
    }

    /// Number of carved cells.
    #[must_use]
    pub fn carved_count(&self) -> usize {
        self.solid.iter().filter(|solid| !**solid).count()
    }
}
