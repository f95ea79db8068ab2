//! Cube faces: which neighbour hides them and which corners draw them.

use grotto_shared::FACES_PER_VOXEL;

/// One side of a voxel cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Facing `-z`.
    Front,
    /// Facing `+z`.
    Back,
    /// Facing `-x`.
    Left,
    /// Facing `+x`.
    Right,
    /// Facing `-y`.
    Bottom,
    /// Facing `+y`.
    Top,
}

impl Face {
    /// All faces, in the order neighbours are tested and quads are emitted.
    pub const ALL: [Self; FACES_PER_VOXEL] = [
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
        Self::Bottom,
        Self::Top,
    ];

    /// Step from a voxel to the neighbour that hides this face.
    #[inline]
    #[must_use]
    pub const fn neighbour_offset(self) -> (isize, isize, isize) {
        match self {
            Self::Front => (0, 0, -1),
            Self::Back => (0, 0, 1),
            Self::Left => (-1, 0, 0),
            Self::Right => (1, 0, 0),
            Self::Bottom => (0, -1, 0),
            Self::Top => (0, 1, 0),
        }
    }

    /// Indices into [`Voxel::corners`](grotto_procedural::Voxel::corners)
    /// forming this face's quad, wound so the face points outward.
    #[inline]
    #[must_use]
    pub const fn corner_indices(self) -> [usize; 4] {
        match self {
            Self::Front => [0, 1, 2, 3],
            Self::Back => [7, 6, 5, 4],
            Self::Left => [4, 5, 1, 0],
            Self::Right => [3, 2, 6, 7],
            Self::Bottom => [0, 3, 7, 4],
            Self::Top => [1, 5, 6, 2],
        }
    }
}
