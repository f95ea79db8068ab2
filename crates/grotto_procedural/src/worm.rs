//! # Worm Planning
//!
//! Caves are carved along "worms": stochastic 3D walks that start below the
//! surface and wander until they run out of luck, climb out of the ground or
//! stray too far from where they started.
//!
//! Planning happens in two passes:
//!
//! 1. [`find_starting_points`]: strict local maxima of a single-octave noise
//!    plane mark where worms begin.
//! 2. [`WormPlanner::plan`]: one seeded walk per starting point.
//!
//! ## Draw Order
//!
//! A worm's random stream is consumed in a fixed order, captured by
//! [`WormPrelude`] followed by the walk loop:
//!
//! | # | Draw                     | Kind                         |
//! |---|--------------------------|------------------------------|
//! | 1 | radius roll              | `f64` in `[0, 1)`            |
//! | 2 | start height roll        | `f64` in `[0, 1)`            |
//! | 3 | pitch lane, offset A     | int in `[-100000, 100000)`   |
//! | 4 | yaw lane, offset A       | int in `[-100000, 100000)`   |
//! | 5 | pitch lane, offset B     | int in `[-100000, 100000)`   |
//! | 6 | yaw lane, offset B       | int in `[-100000, 100000)`   |
//! | … | survival roll per step   | `f64`, only while above y=0  |
//!
//! Reordering any of these changes every cave for a given seed.

use grotto_shared::{lerp, IVec2, Vec3};

use crate::noise::{noise_plane_with, NoisePlane, PerlinNoise, PlaneParams, WorldSeed, OCTAVE_OFFSET_RANGE};
use crate::rng::{ChaChaStream, DeterministicRng};

/// Steepest allowed pitch in degrees (negative climbs).
pub const MIN_PITCH: f32 = -80.0;
/// Shallowest allowed pitch in degrees.
pub const MAX_PITCH: f32 = -10.0;
/// Distance travelled per walk step.
pub const STEP_LENGTH: f32 = 1.375;
/// Largest pitch change per step, in degrees.
pub const MAX_PITCH_CHANGE: f32 = 12.0;
/// Largest yaw change per step, in degrees.
pub const MAX_YAW_CHANGE: f32 = 36.0;

const LANE_A_MULTIPLIER: f32 = 0.987_431_5;
const LANE_B_MULTIPLIER: f32 = 0.845_458_5;

/// Per-step advance of the angle noise inputs. Not integers, so consecutive
/// samples stay correlated without landing on flat lattice points.
const PITCH_A_STEP: f32 = 0.1219;
const YAW_A_STEP: f32 = 0.0737;
const PITCH_B_STEP: f32 = 0.087_23;
const YAW_B_STEP: f32 = 0.093_541;

/// Finds worm starting cells with the default stream.
#[must_use]
pub fn find_starting_points(
    noise: &PerlinNoise,
    width: usize,
    depth: usize,
    offset: IVec2,
    scale: f32,
    seed: WorldSeed,
) -> Vec<(usize, usize)> {
    find_starting_points_with::<ChaChaStream>(noise, width, depth, offset, scale, seed)
}

/// Finds worm starting cells: strict local maxima of a single-octave plane.
///
/// The plane is sampled over `(width + 2) x (depth + 2)` so every returned
/// cell `(i, j)` in `[0, width) x [0, depth)` is compared against all eight
/// neighbours. A cell equal to any neighbour is not a maximum, so plateaus
/// never start a worm. Points come back in scan order (`i` outer).
#[must_use]
pub fn find_starting_points_with<R: DeterministicRng>(
    noise: &PerlinNoise,
    width: usize,
    depth: usize,
    offset: IVec2,
    scale: f32,
    seed: WorldSeed,
) -> Vec<(usize, usize)> {
    let params = PlaneParams {
        width: width + 2,
        depth: depth + 2,
        offset,
        scale,
        octaves: 1,
        lacunarity: 1.0,
        persistence: 1.0,
    };
    let plane = noise_plane_with::<R>(noise, &params, seed.starting_points());
    let points = local_maxima(&plane);

    tracing::debug!(width, depth, count = points.len(), "worm starting points found");
    points
}

/// Interior cells of `plane` strictly greater than all eight neighbours.
///
/// The one-cell border is only compared against, so results are shifted by
/// one: cell `(i, j)` of the plane comes back as `(i - 1, j - 1)`. Ties with
/// any neighbour disqualify a cell.
#[must_use]
pub fn local_maxima(plane: &NoisePlane) -> Vec<(usize, usize)> {
    let mut points = Vec::new();
    for i in 1..plane.width().saturating_sub(1) {
        for j in 1..plane.depth().saturating_sub(1) {
            let center = plane[(i, j)];
            let is_peak = (i - 1..=i + 1)
                .flat_map(|ni| (j - 1..=j + 1).map(move |nj| (ni, nj)))
                .filter(|&cell| cell != (i, j))
                .all(|(ni, nj)| center > plane[(ni, nj)]);
            if is_peak {
                points.push((i - 1, j - 1));
            }
        }
    }
    points
}

/// A planned cave path: an ordered trajectory and the widest radius it may carve.
///
/// Built once by [`WormPlanner`] and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Worm {
    trajectory: Vec<Vec3>,
    max_radius: f32,
}

impl Worm {
    /// Creates a worm from an explicit trajectory.
    #[must_use]
    pub fn new(trajectory: Vec<Vec3>, max_radius: f32) -> Self {
        Self { trajectory, max_radius }
    }

    /// Points visited, in walk order.
    #[inline]
    #[must_use]
    pub fn trajectory(&self) -> &[Vec3] {
        &self.trajectory
    }

    /// This worm's own maximum carve radius.
    #[inline]
    #[must_use]
    pub const fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Number of trajectory samples.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    /// Returns true if the trajectory has no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }
}

/// Inputs shared by every worm of one generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WormParams {
    /// Height of the volume the worms live in.
    pub height: usize,
    /// Global noise offset, mixed into every worm seed.
    pub offset: IVec2,
    /// Upper bound for any worm's maximum radius.
    pub max_radius: f32,
    /// A worm must have strictly more samples than this to be kept.
    pub min_worm_length: usize,
    /// Largest horizontal bounding-box diagonal a kept worm may cover.
    pub max_worm_range: f32,
}

/// The draws every worm takes before it starts walking, in stream order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WormPrelude {
    /// Scales the global max radius into this worm's radius.
    pub radius_roll: f64,
    /// Picks the start height, biased toward the bottom.
    pub height_roll: f64,
    /// Angle noise offsets: pitch A, yaw A, pitch B, yaw B.
    pub angle_offsets: [i32; 4],
}

impl WormPrelude {
    /// Draws the prelude from a fresh worm stream.
    pub fn draw<R: DeterministicRng>(rng: &mut R) -> Self {
        let radius_roll = rng.next_f64();
        let height_roll = rng.next_f64();
        let mut angle_offsets = [0; 4];
        for offset in &mut angle_offsets {
            *offset = rng.next_range(-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE);
        }
        Self {
            radius_roll,
            height_roll,
            angle_offsets,
        }
    }

    /// This worm's maximum radius: between 40% and 100% of `global_max`.
    #[must_use]
    pub fn max_radius(&self, global_max: f32) -> f32 {
        global_max * (0.4 + self.radius_roll * 0.6) as f32
    }

    /// Start height in `[0, height]`, squared toward zero.
    ///
    /// The roll is shifted down before squaring, so rolls under `0.05` bounce
    /// back up slightly rather than clamping.
    #[must_use]
    pub fn start_height(&self, height: usize) -> f32 {
        let shifted = self.height_roll - 0.05;
        ((shifted * shifted) * (height + 1) as f64) as i32 as f32
    }
}

/// Two correlated noise inputs per angle; each step nudges them forward.
#[derive(Clone, Copy, Debug)]
struct AngleNoise {
    pitch: (f32, f32),
    yaw: (f32, f32),
}

impl AngleNoise {
    fn from_prelude(prelude: &WormPrelude) -> Self {
        let [pitch_a, yaw_a, pitch_b, yaw_b] = prelude.angle_offsets;
        Self {
            pitch: (pitch_a as f32 * LANE_A_MULTIPLIER, pitch_b as f32 * LANE_B_MULTIPLIER),
            yaw: (yaw_a as f32 * LANE_A_MULTIPLIER, yaw_b as f32 * LANE_B_MULTIPLIER),
        }
    }

    fn sample(&self, noise: &PerlinNoise) -> (f32, f32) {
        (
            noise.sample(self.pitch.0, self.pitch.1),
            noise.sample(self.yaw.0, self.yaw.1),
        )
    }

    fn advance(&mut self) {
        self.pitch.0 += PITCH_A_STEP;
        self.yaw.0 += YAW_A_STEP;
        self.pitch.1 += PITCH_B_STEP;
        self.yaw.1 += YAW_B_STEP;
    }
}

/// Running horizontal bounding box of a walk.
#[derive(Clone, Copy, Debug)]
struct PlanarSpan {
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
}

impl PlanarSpan {
    fn at(point: Vec3) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_z: point.z,
            max_z: point.z,
        }
    }

    fn include(&mut self, point: Vec3) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_z = self.min_z.min(point.z);
        self.max_z = self.max_z.max(point.z);
    }

    fn diagonal_squared(&self) -> f32 {
        let dx = self.max_x - self.min_x;
        let dz = self.max_z - self.min_z;
        dx * dx + dz * dz
    }
}

/// Why a walk did or did not become a cave.
#[derive(Clone, Debug, PartialEq)]
pub enum WalkOutcome {
    /// The walk passed both filters.
    Kept(Worm),
    /// The walk's bounding box reached the range limit.
    OutOfRange,
    /// The walk had too few samples.
    TooShort,
}

/// Result of planning every worm of one generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WormPlan {
    /// Worms that passed both filters, in starting-point order.
    pub worms: Vec<Worm>,
    /// Walks dropped for covering too wide a range.
    pub discarded_out_of_range: usize,
    /// Walks dropped for being too short.
    pub discarded_too_short: usize,
}

/// Simulates one walk per starting point.
pub struct WormPlanner<'a> {
    noise: &'a PerlinNoise,
    params: WormParams,
}

impl<'a> WormPlanner<'a> {
    /// Creates a planner sampling angle noise from `noise`.
    #[must_use]
    pub const fn new(noise: &'a PerlinNoise, params: WormParams) -> Self {
        Self { noise, params }
    }

    /// Plans every worm with the default stream.
    #[must_use]
    pub fn plan(&self, points: &[(usize, usize)], seed: WorldSeed) -> WormPlan {
        self.plan_with::<ChaChaStream>(points, seed)
    }

    /// Plans every worm, one independent `R` stream per starting point.
    #[must_use]
    pub fn plan_with<R: DeterministicRng>(&self, points: &[(usize, usize)], seed: WorldSeed) -> WormPlan {
        let mut plan = WormPlan::default();
        for &point in points {
            match self.walk::<R>(point, seed) {
                WalkOutcome::Kept(worm) => plan.worms.push(worm),
                WalkOutcome::OutOfRange => plan.discarded_out_of_range += 1,
                WalkOutcome::TooShort => plan.discarded_too_short += 1,
            }
        }

        tracing::debug!(
            kept = plan.worms.len(),
            out_of_range = plan.discarded_out_of_range,
            too_short = plan.discarded_too_short,
            "worms planned"
        );
        plan
    }

    /// Walks the worm starting at plane cell `point`.
    #[must_use]
    pub fn walk<R: DeterministicRng>(&self, point: (usize, usize), seed: WorldSeed) -> WalkOutcome {
        let params = &self.params;
        let cell = IVec2::new(point.0 as i32, point.1 as i32);
        let mut rng = R::from_seed(seed.worm(cell, params.offset).value());

        let prelude = WormPrelude::draw(&mut rng);
        let max_radius = prelude.max_radius(params.max_radius);
        let start = Vec3::new(point.0 as f32, prelude.start_height(params.height), point.1 as f32);

        let mut angles = AngleNoise::from_prelude(&prelude);
        let (pitch_noise, yaw_noise) = angles.sample(self.noise);
        let mut pitch = lerp(MIN_PITCH, MAX_PITCH, pitch_noise);
        let mut yaw = lerp(-180.0, 180.0, yaw_noise);

        let mut trajectory = vec![start];
        let mut current = start;
        let mut survival = 1.0f32;
        let mut span = PlanarSpan::at(start);
        let max_range_squared = params.max_worm_range * params.max_worm_range;
        let height = params.height.max(1) as f32;

        while current.y > 0.0
            && f64::from(survival) > rng.next_f64()
            && span.diagonal_squared() < max_range_squared
        {
            current += Vec3::forward_from_euler(pitch, yaw) * STEP_LENGTH;
            trajectory.push(current);

            let (pitch_noise, yaw_noise) = angles.sample(self.noise);
            pitch = (pitch + lerp(-MAX_PITCH_CHANGE, MAX_PITCH_CHANGE, pitch_noise)).clamp(MIN_PITCH, MAX_PITCH);
            yaw += lerp(-MAX_YAW_CHANGE, MAX_YAW_CHANGE, yaw_noise);
            angles.advance();

            // Low worms die sooner
            survival *= 0.999_25 + 0.000_75 * current.y / height;

            span.include(current);
        }

        if span.diagonal_squared() >= max_range_squared {
            return WalkOutcome::OutOfRange;
        }
        if trajectory.len() <= params.min_worm_length {
            return WalkOutcome::TooShort;
        }
        WalkOutcome::Kept(Worm::new(trajectory, max_radius))
    }
}

/// Plans every worm with the default stream.
#[must_use]
pub fn plan_worms(
    noise: &PerlinNoise,
    points: &[(usize, usize)],
    params: &WormParams,
    seed: WorldSeed,
) -> Vec<Worm> {
    WormPlanner::new(noise, *params).plan(points, seed).worms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(rows: &[&[f32]]) -> NoisePlane {
        let values: Vec<f32> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        NoisePlane::from_values(rows.len(), rows[0].len(), values).unwrap()
    }

    #[test]
    fn test_plateaus_are_not_maxima() {
        let field = plane(&[
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.9, 0.9, 0.1, 0.0, 0.0, 0.0],
            &[0.0, 0.9, 0.9, 0.1, 0.0, 0.0, 0.0],
            &[0.0, 0.1, 0.1, 0.1, 0.2, 0.2, 0.0],
            &[0.0, 0.0, 0.0, 0.2, 0.7, 0.2, 0.0],
            &[0.0, 0.0, 0.0, 0.2, 0.2, 0.2, 0.0],
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ]);
        assert_eq!(local_maxima(&field), vec![(3, 3)]);
    }

    #[test]
    fn test_flat_and_tiny_planes_have_no_maxima() {
        let flat = [0.5; 4];
        assert!(local_maxima(&plane(&[&flat, &flat, &flat, &flat])).is_empty());
        assert!(local_maxima(&plane(&[&[1.0, 0.0], &[0.0, 0.0]])).is_empty());
        assert!(NoisePlane::from_values(3, 3, vec![0.0; 8]).is_none());
    }

    fn params() -> WormParams {
        WormParams {
            height: 48,
            offset: IVec2::new(3, -8),
            max_radius: 4.0,
            min_worm_length: 5,
            max_worm_range: 32.0,
        }
    }

    /// Scripted stream: replays fixed draws and counts how many were taken.
    struct Scripted {
        floats: Vec<f64>,
        ints: Vec<i32>,
        float_draws: usize,
        int_draws: usize,
    }

    impl DeterministicRng for Scripted {
        fn from_seed(_seed: i32) -> Self {
            Self {
                floats: vec![0.5, 0.55],
                ints: vec![10, 20, 30, 40],
                float_draws: 0,
                int_draws: 0,
            }
        }

        fn next_f64(&mut self) -> f64 {
            // Past the prelude every survival roll is 1.0, which always kills
            let value = self.floats.get(self.float_draws).copied().unwrap_or(1.0);
            self.float_draws += 1;
            value
        }

        fn next_range(&mut self, _low: i32, _high: i32) -> i32 {
            let value = self.ints[self.int_draws];
            self.int_draws += 1;
            value
        }
    }

    #[test]
    fn test_prelude_draw_order() {
        let mut rng = Scripted::from_seed(0);
        let prelude = WormPrelude::draw(&mut rng);
        assert_eq!(prelude.radius_roll, 0.5);
        assert_eq!(prelude.height_roll, 0.55);
        assert_eq!(prelude.angle_offsets, [10, 20, 30, 40]);
        assert_eq!(rng.float_draws, 2);
        assert_eq!(rng.int_draws, 4);
    }

    #[test]
    fn test_prelude_radius_and_height() {
        let prelude = WormPrelude {
            radius_roll: 0.5,
            height_roll: 0.55,
            angle_offsets: [0; 4],
        };
        assert!((prelude.max_radius(10.0) - 7.0).abs() < 1e-5);
        // (0.55 - 0.05)^2 * 49 = 12.25 -> 12
        assert_eq!(prelude.start_height(48), 12.0);

        let low = WormPrelude {
            radius_roll: 0.0,
            height_roll: 0.0,
            angle_offsets: [0; 4],
        };
        assert!((low.max_radius(10.0) - 4.0).abs() < 1e-5);
        // Rolls under 0.05 still square to a non-negative height
        assert_eq!(low.start_height(48), 0.0);
    }

    #[test]
    fn test_failed_first_survival_roll_keeps_only_start() {
        let noise = PerlinNoise::default();
        let mut p = params();
        p.min_worm_length = 0;
        let outcome = WormPlanner::new(&noise, p).walk::<Scripted>((10, 4), WorldSeed::new(1));
        let WalkOutcome::Kept(worm) = outcome else {
            panic!("expected a kept worm, got {outcome:?}");
        };
        assert_eq!(worm.trajectory(), &[Vec3::new(10.0, 12.0, 4.0)]);
        assert!((worm.max_radius() - 2.8).abs() < 1e-5);

        // Same single-sample walk fails a length filter of one
        p.min_worm_length = 1;
        let outcome = WormPlanner::new(&noise, p).walk::<Scripted>((10, 4), WorldSeed::new(1));
        assert_eq!(outcome, WalkOutcome::TooShort);
    }

    #[test]
    fn test_worm_starting_at_ground_level_never_walks() {
        // A height roll of 0.05 lands the start at y = 0, which ends the loop
        // before any survival roll is drawn.
        let prelude = WormPrelude {
            radius_roll: 0.0,
            height_roll: 0.05,
            angle_offsets: [0; 4],
        };
        assert_eq!(prelude.start_height(100), 0.0);
    }

    #[test]
    fn test_zero_range_discards_everything() {
        let noise = PerlinNoise::default();
        let mut none = params();
        none.max_worm_range = 0.0;
        let plan = WormPlanner::new(&noise, none).plan(&[(1, 1), (5, 9), (20, 3)], WorldSeed::new(9));
        assert!(plan.worms.is_empty());
        assert_eq!(plan.discarded_out_of_range, 3);
    }

    #[test]
    fn test_walk_is_deterministic() {
        let noise = PerlinNoise::default();
        let planner = WormPlanner::new(&noise, params());
        let a = planner.walk::<ChaChaStream>((12, 7), WorldSeed::new(2024));
        let b = planner.walk::<ChaChaStream>((12, 7), WorldSeed::new(2024));
        assert_eq!(a, b);
    }

    #[test]
    fn test_kept_worms_respect_filters() {
        let noise = PerlinNoise::default();
        let p = params();
        let points: Vec<(usize, usize)> = (0..40).map(|i| (i * 3 % 64, i * 7 % 64)).collect();
        let plan = WormPlanner::new(&noise, p).plan(&points, WorldSeed::new(31337));

        assert_eq!(
            plan.worms.len() + plan.discarded_out_of_range + plan.discarded_too_short,
            points.len()
        );
        for worm in &plan.worms {
            assert!(worm.len() > p.min_worm_length);
            assert!(worm.max_radius() >= p.max_radius * 0.4 - 1e-5);
            assert!(worm.max_radius() <= p.max_radius + 1e-5);

            let mut span = PlanarSpan::at(worm.trajectory()[0]);
            for point in worm.trajectory() {
                span.include(*point);
            }
            assert!(span.diagonal_squared() < p.max_worm_range * p.max_worm_range);
        }
    }

    #[test]
    fn test_steps_have_fixed_length_and_climb() {
        let noise = PerlinNoise::default();
        let mut p = params();
        p.min_worm_length = 1;
        let points: Vec<(usize, usize)> = (0..20).map(|i| (i * 5, i * 11 % 50)).collect();
        let plan = WormPlanner::new(&noise, p).plan(&points, WorldSeed::new(77));

        for worm in &plan.worms {
            for pair in worm.trajectory().windows(2) {
                let step = pair[1] - pair[0];
                assert!((step.length() - STEP_LENGTH).abs() < 1e-3, "step {step:?}");
                // Pitch stays within [-80, -10], so every step climbs
                assert!(step.y > 0.0, "step {step:?} does not climb");
            }
        }
    }

    #[test]
    fn test_starting_points_are_strict_local_maxima() {
        let noise = PerlinNoise::default();
        let seed = WorldSeed::new(5);
        let offset = IVec2::new(7, 7);
        let (width, depth) = (48, 40);
        let points = find_starting_points(&noise, width, depth, offset, 1.0, seed);

        let plane = noise_plane_with::<ChaChaStream>(
            &noise,
            &PlaneParams {
                width: width + 2,
                depth: depth + 2,
                offset,
                scale: 1.0,
                octaves: 1,
                lacunarity: 1.0,
                persistence: 1.0,
            },
            seed.starting_points(),
        );

        for &(i, j) in &points {
            assert!(i < width && j < depth);
            let center = plane[(i + 1, j + 1)];
            for di in 0..3 {
                for dj in 0..3 {
                    if (di, dj) != (1, 1) {
                        assert!(center > plane[(i + di, j + dj)], "({i}, {j}) is not a strict maximum");
                    }
                }
            }
        }
    }

    #[test]
    fn test_starting_points_are_deterministic_and_sparse() {
        let noise = PerlinNoise::default();
        let a = find_starting_points(&noise, 64, 64, IVec2::new(1, 2), 1.0, WorldSeed::new(11));
        let b = find_starting_points(&noise, 64, 64, IVec2::new(1, 2), 1.0, WorldSeed::new(11));
        assert_eq!(a, b);
        // No two maxima can be neighbours
        for (n, &(i, j)) in a.iter().enumerate() {
            for &(k, l) in &a[n + 1..] {
                assert!(i.abs_diff(k) > 1 || j.abs_diff(l) > 1);
            }
        }
    }

    #[test]
    fn test_empty_window_has_no_starting_points() {
        let noise = PerlinNoise::default();
        assert!(find_starting_points(&noise, 0, 10, IVec2::ZERO, 1.0, WorldSeed::new(0)).is_empty());
    }
}
