//! # Perlin Noise Planes
//!
//! Deterministic fractal noise over a finite 2D lattice.
//!
//! Perlin noise here is only a smooth pseudo-random scalar field: it is
//! sampled at offset, scaled coordinates and summed over octaves, then
//! normalized into `[0, 1]`.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`PlaneParams`] and [`WorldSeed`], [`noise_plane`] returns
//! bit-identical values on any platform, any time.

use grotto_shared::{inverse_lerp, IVec2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::rng::{ChaChaStream, DeterministicRng};

/// Coordinates are divided by this prime so lattice samples never land on
/// integer noise coordinates, where Perlin noise is always flat.
pub const LATTICE_DIVISOR: f32 = 29.0;

/// Scale used when a non-positive scale is requested.
pub const MIN_SCALE: f32 = 0.01;

/// Octave offsets are drawn from `[-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE)`.
pub const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// Sub-seed multiplier for the worm starting-point plane.
const STARTING_POINTS_MULTIPLIER: i32 = 169_259;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(i32);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Sub-seed for the auxiliary plane whose local maxima start worms.
    #[inline]
    #[must_use]
    pub const fn starting_points(self) -> Self {
        Self(self.0.wrapping_mul(STARTING_POINTS_MULTIPLIER))
    }

    /// Sub-seed for the worm starting at plane cell `point`.
    ///
    /// Mixes the point, the global noise offset and this seed through a fixed
    /// multiply/shift/xor sequence. All arithmetic wraps at 32 bits and right
    /// shifts are arithmetic. Changing any step changes every cave.
    #[must_use]
    pub const fn worm(self, point: IVec2, offset: IVec2) -> Self {
        let mut hash = point.x.wrapping_add(offset.x).wrapping_mul(148_867);
        hash ^= hash >> 8;
        hash = hash.wrapping_mul(4_895_351);
        hash = hash.wrapping_add(self.0);
        hash ^= hash << 8;
        hash = hash.wrapping_mul(878_023);
        hash = hash.wrapping_add(point.y.wrapping_add(offset.y));
        hash ^= hash >> 8;
        Self(hash)
    }
}

/// Table seed used by [`PerlinNoise::default`].
const DEFAULT_TABLE_SEED: u64 = 0x5DEE_CE66_D1CE_F00D;

/// Lattice hash: a shuffled `0..256`, stored twice so `perm[perm[i] + j]`
/// stays in range without masking the inner lookup.
#[derive(Clone)]
struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    fn new(table_seed: u64) -> Self {
        let mut shuffled: [u8; 256] = std::array::from_fn(|i| i as u8);
        shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(table_seed));

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&shuffled);
        perm[256..].copy_from_slice(&shuffled);
        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }
}

/// 2D gradient noise generator.
///
/// Produces smooth, continuous values in `[0, 1]`, exactly `0.5` at every
/// integer lattice point.
#[derive(Clone)]
pub struct PerlinNoise {
    perm_table: PermutationTable,
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_SEED)
    }
}

impl PerlinNoise {
    /// Creates a generator whose gradient table is a ChaCha8 shuffle keyed by `table_seed`.
    #[must_use]
    pub fn new(table_seed: u64) -> Self {
        Self {
            perm_table: PermutationTable::new(table_seed),
        }
    }

    /// Samples the field at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let x = f64::from(x);
        let y = f64::from(y);

        let xi = x.floor() as i32;
        let yi = y.floor() as i32;
        let xf = x - f64::from(xi);
        let yf = y - f64::from(yi);

        let u = fade(xf);
        let v = fade(yf);

        let ii = (xi & 255) as usize;
        let jj = (yi & 255) as usize;
        let table = &self.perm_table;

        let aa = table.get(table.get(ii) + jj);
        let ab = table.get(table.get(ii) + jj + 1);
        let ba = table.get(table.get(ii + 1) + jj);
        let bb = table.get(table.get(ii + 1) + jj + 1);

        let bottom = lerp64(u, gradient(aa, xf, yf), gradient(ba, xf - 1.0, yf));
        let top = lerp64(u, gradient(ab, xf, yf - 1.0), gradient(bb, xf - 1.0, yf - 1.0));
        let raw = lerp64(v, bottom, top);

        (((raw + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp64(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of eight lattice gradients.
#[inline]
fn gradient(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Inputs of one fractal noise plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneParams {
    /// Cells along the first axis.
    pub width: usize,
    /// Cells along the second axis.
    pub depth: usize,
    /// Global offset added to every octave's offset.
    pub offset: IVec2,
    /// Zoom factor; non-positive values are floored to [`MIN_SCALE`].
    pub scale: f32,
    /// Number of layers summed.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave.
    pub persistence: f32,
}

/// A `width x depth` field of values in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoisePlane {
    width: usize,
    depth: usize,
    /// Values indexed as `[i * depth + j]`.
    values: Vec<f32>,
}

impl NoisePlane {
    /// Wraps precomputed values indexed as `[i * depth + j]`.
    ///
    /// Returns `None` if `values` does not hold exactly `width * depth` cells.
    #[must_use]
    pub fn from_values(width: usize, depth: usize, values: Vec<f32>) -> Option<Self> {
        (values.len() == width * depth).then_some(Self { width, depth, values })
    }

    /// Cells along the first axis.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Cells along the second axis.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Value at `(i, j)`, or `None` outside the plane.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.width && j < self.depth {
            Some(self.values[i * self.depth + j])
        } else {
            None
        }
    }

    /// All values, row-major with `j` varying fastest.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl std::ops::Index<(usize, usize)> for NoisePlane {
    type Output = f32;

    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        assert!(
            i < self.width && j < self.depth,
            "noise plane index ({i}, {j}) out of bounds {}x{}",
            self.width,
            self.depth
        );
        &self.values[i * self.depth + j]
    }
}

/// Generates a fractal noise plane with the default stream.
#[must_use]
pub fn noise_plane(noise: &PerlinNoise, params: &PlaneParams, seed: WorldSeed) -> NoisePlane {
    noise_plane_with::<ChaChaStream>(noise, params, seed)
}

/// Generates a fractal noise plane, drawing octave offsets from `R`.
///
/// Each octave gets its own offset drawn from the seeded stream. Octave
/// amplitudes sum to a known maximum that normalizes the result into `[0, 1]`.
#[must_use]
pub fn noise_plane_with<R: DeterministicRng>(
    noise: &PerlinNoise,
    params: &PlaneParams,
    seed: WorldSeed,
) -> NoisePlane {
    let mut rng = R::from_seed(seed.value());

    let mut max_amplitude = 0.0f32;
    let mut octave_amplitude = 1.0f32;
    let mut octave_offsets = Vec::with_capacity(params.octaves as usize);
    for _ in 0..params.octaves {
        max_amplitude += octave_amplitude;
        let x = rng.next_range(-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE) as f32 + params.offset.x as f32;
        let y = rng.next_range(-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE) as f32 + params.offset.y as f32;
        octave_offsets.push((x, y));
        octave_amplitude *= params.persistence;
    }

    let scale = if params.scale <= 0.0 { MIN_SCALE } else { params.scale };
    let half_width = params.width as f32 / 2.0;
    let half_depth = params.depth as f32 / 2.0;

    let mut values = Vec::with_capacity(params.width * params.depth);
    for i in 0..params.width {
        for j in 0..params.depth {
            let mut amplitude = 1.0f32;
            let mut frequency = 1.0f32;
            let mut total = 0.0f32;

            for &(offset_x, offset_y) in &octave_offsets {
                let x = (i as f32 - half_width + offset_x) / LATTICE_DIVISOR * scale * frequency;
                let y = (j as f32 - half_depth + offset_y) / LATTICE_DIVISOR * scale * frequency;
                total += noise.sample(x, y) * amplitude;

                amplitude *= params.persistence;
                frequency *= params.lacunarity;
            }

            values.push(inverse_lerp(0.0, max_amplitude, total));
        }
    }

    NoisePlane {
        width: params.width,
        depth: params.depth,
        values,
    }
}
