//! Mathematical types shared between generation stages.
//!
//! These are the canonical representations used by the noise, cave, terrain
//! and meshing code.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - trajectory points, voxel centers, mesh vertices
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit Z vector, the "forward" axis
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit forward vector rotated by `pitch` around X, then `yaw` around Y.
    ///
    /// Angles are in degrees. Positive pitch tilts forward downward, so a
    /// negative pitch climbs.
    #[must_use]
    pub fn forward_from_euler(pitch_degrees: f32, yaw_degrees: f32) -> Self {
        let (sin_pitch, cos_pitch) = pitch_degrees.to_radians().sin_cos();
        let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
        Self::new(cos_pitch * sin_yaw, -sin_pitch, cos_pitch * cos_yaw)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Integer 2D vector - noise offsets and plane coordinates
///
/// Serialized as a two-element array so config files read `offset = [10, -4]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct IVec2 {
    /// X component
    pub x: i32,
    /// Y component (the Z axis when used on the horizontal plane)
    pub y: i32,
}

impl IVec2 {
    /// Creates a new IVec2
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0, 0);
}

impl std::ops::Add for IVec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl From<[i32; 2]> for IVec2 {
    fn from(value: [i32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<IVec2> for [i32; 2] {
    fn from(value: IVec2) -> Self {
        [value.x, value.y]
    }
}

/// Linear interpolation with `t` clamped to [0, 1].
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`, clamped to [0, 1].
///
/// Returns 0 when `a == b`.
#[inline]
#[must_use]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}
