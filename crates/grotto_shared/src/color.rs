//! 8-bit RGBA color used for voxels and per-vertex mesh colors.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit-per-channel RGBA color.
///
/// Serialized as `[r, g, b, a]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black, the color of inactive voxels.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a color from all four channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(value: [u8; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(value: Rgba8) -> Self {
        [value.r, value.g, value.b, value.a]
    }
}
