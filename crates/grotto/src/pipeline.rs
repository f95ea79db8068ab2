//! # Terrain Pipeline
//!
//! One call, one complete world. Stages run in a fixed order and each only
//! starts once its inputs are finished:
//!
//! 1. `starting_points`: local maxima over the padded cave window
//! 2. `plan_worms`: one seeded walk per starting point
//! 3. `carve`: spheres along every kept worm
//! 4. `height_field`: multi-octave surface noise
//! 5. `compose`: surface + caves -> voxel grid
//! 6. `mesh`: per-chunk face-culled buffers
//!
//! Nothing is cached between calls. A new [`Generation`] fully replaces the
//! previous one.

use grotto_meshing::{ChunkMesh, VoxelMesher};
use grotto_procedural::{
    compose, find_starting_points, noise_plane, CaveCarver, GeneratorConfig, PerlinNoise, VoxelGrid,
    WormPlanner,
};

/// Counters collected while generating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Local maxima found in the cave window.
    pub starting_points: usize,
    /// Worms that passed both filters.
    pub worms_kept: usize,
    /// Worms dropped for covering too wide a range.
    pub worms_out_of_range: usize,
    /// Worms dropped for being too short.
    pub worms_too_short: usize,
    /// Cells cleared in the padded cave volume.
    pub carved_cells: usize,
    /// Active voxels in the visible grid.
    pub active_voxels: usize,
    /// Chunk meshes produced.
    pub chunks: usize,
    /// Visible faces over all chunks.
    pub faces: usize,
    /// Triangles over all chunks.
    pub triangles: usize,
    /// Vertices over all chunks.
    pub vertices: usize,
}

/// Output of one full regeneration.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    /// The composed voxel grid.
    pub grid: VoxelGrid,
    /// One mesh per horizontal chunk, X-major.
    pub meshes: Vec<ChunkMesh>,
    /// What happened along the way.
    pub stats: GenerationStats,
}

/// Runs every stage for a configuration.
#[derive(Clone, Default)]
pub struct TerrainPipeline {
    noise: PerlinNoise,
}

impl TerrainPipeline {
    /// Creates a pipeline sampling from `noise`.
    #[must_use]
    pub const fn new(noise: PerlinNoise) -> Self {
        Self { noise }
    }

    /// Regenerates the whole world described by `config`.
    ///
    /// Expects a configuration that passed
    /// [`GeneratorConfig::validate`]; numeric inputs generation can clamp are
    /// clamped rather than rejected.
    #[must_use]
    pub fn generate(&self, config: &GeneratorConfig) -> Generation {
        let _span = tracing::info_span!("generate", seed = config.seed.value()).entered();
        let mut stats = GenerationStats::default();
        let cave_extent = config.cave_extent();

        let points = {
            let _stage = tracing::info_span!("starting_points").entered();
            find_starting_points(
                &self.noise,
                cave_extent.width,
                cave_extent.depth,
                config.cave_offset(),
                config.caves.scale,
                config.seed,
            )
        };
        stats.starting_points = points.len();

        let plan = {
            let _stage = tracing::info_span!("plan_worms").entered();
            WormPlanner::new(&self.noise, config.worm_params()).plan(&points, config.seed)
        };
        stats.worms_kept = plan.worms.len();
        stats.worms_out_of_range = plan.discarded_out_of_range;
        stats.worms_too_short = plan.discarded_too_short;

        let caves = {
            let _stage = tracing::info_span!("carve").entered();
            CaveCarver::new(&self.noise, config.carve_params()).carve_all(&plan.worms, cave_extent)
        };
        stats.carved_cells = caves.carved_count();

        let heights = {
            let _stage = tracing::info_span!("height_field").entered();
            noise_plane(&self.noise, &config.terrain_plane(), config.seed)
        };

        let grid = {
            let _stage = tracing::info_span!("compose").entered();
            compose(
                &heights,
                &caves,
                &config.compose_params(),
                &config.terrain.adjustment_curve,
            )
        };
        stats.active_voxels = grid.active_count();

        let meshes = {
            let _stage = tracing::info_span!("mesh").entered();
            VoxelMesher::new(config.chunk_size).mesh(&grid)
        };
        stats.chunks = meshes.len();
        for m in &meshes {
            stats.faces += m.face_count();
            stats.triangles += m.triangle_count();
            stats.vertices += m.vertex_count();
        }

        tracing::info!(
            starting_points = stats.starting_points,
            worms = stats.worms_kept,
            carved = stats.carved_cells,
            active = stats.active_voxels,
            chunks = stats.chunks,
            triangles = stats.triangles,
            "generation complete"
        );

        Generation { grid, meshes, stats }
    }
}

/// Regenerates `config` with the default noise table.
#[must_use]
pub fn generate(config: &GeneratorConfig) -> Generation {
    TerrainPipeline::default().generate(config)
}
