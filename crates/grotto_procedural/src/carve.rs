//! # Cave Carving
//!
//! Turns planned worms into empty space. Every trajectory sample carves a
//! sphere whose radius blends two shapes:
//!
//! - **noise**: bumpy walls sampled from the sample's own position
//! - **taper**: a parabola that is widest halfway along the worm and narrows
//!   to the minimum radius at both ends
//!
//! `radius_noise_ratio` picks the blend. Carving only ever clears cells, so
//! the result does not depend on worm or sample order.

use grotto_shared::{lerp, Vec3};

use crate::noise::PerlinNoise;
use crate::volume::{Extent3, SolidVolume};
use crate::worm::Worm;

/// Inputs shared by every carved sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarveParams {
    /// Smallest sphere radius.
    pub min_radius: f32,
    /// Blend between noise (1.0) and taper (0.0); clamped to `[0, 1]`.
    pub radius_noise_ratio: f32,
}

/// Parabolic taper over worm progress: `0` at both ends, `1` halfway.
#[inline]
#[must_use]
pub fn taper(progress: f32) -> f32 {
    let centered = progress - 0.5;
    -4.0 * centered * centered + 1.0
}

/// Sphere radius of sample `index` of a `count`-sample worm at `position`.
///
/// Always within `[params.min_radius, worm_max_radius]` when
/// `min_radius <= worm_max_radius`.
#[must_use]
pub fn carve_radius(
    noise: &PerlinNoise,
    position: Vec3,
    index: usize,
    count: usize,
    worm_max_radius: f32,
    params: &CarveParams,
) -> f32 {
    let wall_noise = noise.sample(
        position.x / 13.0 + position.y * 0.127_85,
        position.z / 7.0 + position.y * 0.078_93,
    );
    let progress = if count > 1 {
        index as f32 / (count - 1) as f32
    } else {
        0.0
    };
    let ratio = params.radius_noise_ratio.clamp(0.0, 1.0);
    let blend = ratio * wall_noise + (1.0 - ratio) * taper(progress);
    lerp(params.min_radius, worm_max_radius, blend)
}

/// Clears spheres along worm trajectories.
pub struct CaveCarver<'a> {
    noise: &'a PerlinNoise,
    params: CarveParams,
}

impl<'a> CaveCarver<'a> {
    /// Creates a carver sampling wall noise from `noise`.
    #[must_use]
    pub const fn new(noise: &'a PerlinNoise, params: CarveParams) -> Self {
        Self { noise, params }
    }

    /// Carves one worm into `volume`. Returns the number of newly cleared cells.
    pub fn carve_worm(&self, volume: &mut SolidVolume, worm: &Worm) -> usize {
        let extent = volume.extent();
        let count = worm.len();
        let mut cleared = 0;

        for (index, &point) in worm.trajectory().iter().enumerate() {
            let radius = carve_radius(self.noise, point, index, count, worm.max_radius(), &self.params);
            // Saturating cast: an infinite radius reaches the whole volume, NaN reaches nothing
            let reach = radius.ceil() as i64;
            let center = (point.x as i64, point.y as i64, point.z as i64);

            for x in Extent3::axis_span(center.0, reach, extent.width) {
                for y in Extent3::axis_span(center.1, reach, extent.height) {
                    for z in Extent3::axis_span(center.2, reach, extent.depth) {
                        let (dx, dy, dz) = (x - center.0, y - center.1, z - center.2);
                        let distance = ((dx * dx + dy * dy + dz * dz) as f32).sqrt();
                        if distance <= radius && volume.carve(x as usize, y as usize, z as usize) {
                            cleared += 1;
                        }
                    }
                }
            }
        }
        cleared
    }

    /// Carves every worm into a fresh, fully solid volume.
    #[must_use]
    pub fn carve_all(&self, worms: &[Worm], extent: Extent3) -> SolidVolume {
        let mut volume = SolidVolume::new(extent);
        let cleared: usize = worms.iter().map(|worm| self.carve_worm(&mut volume, worm)).sum();
        tracing::debug!(worms = worms.len(), cleared, "caves carved");
        volume
    }
}

/// Carves `worms` into a fresh volume of `extent`.
#[must_use]
pub fn carve(noise: &PerlinNoise, worms: &[Worm], extent: Extent3, params: &CarveParams) -> SolidVolume {
    CaveCarver::new(noise, *params).carve_all(worms, extent)
}
