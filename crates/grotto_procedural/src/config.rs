//! # Generator Configuration
//!
//! Every knob of a regeneration, loadable from TOML. All fields have
//! defaults, so a file only needs the values it changes:
//!
//! ```toml
//! side_length_in_chunks = 8
//! seed = 1337
//!
//! [terrain]
//! octaves = 5
//! adjustment_curve = [[0.0, 0.0], [0.6, 0.2], [1.0, 1.0]]
//!
//! [caves]
//! max_radius = 5.0
//! cave_color = [90, 90, 90, 255]
//! ```

use std::path::Path;

use grotto_shared::{IVec2, Rgba8, CHUNK_SIZE};
use serde::{Deserialize, Serialize};

use crate::carve::CarveParams;
use crate::curve::KeyframeCurve;
use crate::error::{ConfigError, ConfigResult};
use crate::noise::{PlaneParams, WorldSeed};
use crate::terrain::ComposeParams;
use crate::volume::Extent3;
use crate::worm::WormParams;

/// Complete input of one regeneration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Visible grid side, in chunks.
    pub side_length_in_chunks: usize,
    /// Chunk side, in voxels.
    pub chunk_size: usize,
    /// Highest surface height; the grid is one voxel taller.
    pub max_cube_height: usize,
    /// Lowest surface height.
    pub base_cube_height: usize,
    /// World-space side of one voxel.
    pub cube_size: f32,
    /// Global seed.
    pub seed: WorldSeed,
    /// Offset shared by the terrain and cave noise.
    pub base_noise_offset: IVec2,
    /// Surface height field.
    pub terrain: TerrainNoiseConfig,
    /// Worm caves.
    pub caves: CaveConfig,
}

/// Surface height field settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainNoiseConfig {
    /// Added to the base noise offset.
    pub noise_offset: IVec2,
    /// Number of octaves, at least one.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave, in `[0, 1]`.
    pub persistence: f32,
    /// Zoom factor.
    pub scale: f32,
    /// Remaps noise before it becomes a height.
    pub adjustment_curve: KeyframeCurve,
    /// Color of the top voxel of each column.
    pub surface_color: Rgba8,
    /// Color of the voxels under it.
    pub below_surface_color: Rgba8,
}

/// Worm cave settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Show only the cave-carved solid, ignoring the surface.
    pub only_caves: bool,
    /// Extra chunks planned around the visible grid on every side.
    pub padding_in_chunks: usize,
    /// Added to the base noise offset.
    pub noise_offset: IVec2,
    /// Zoom factor of the starting-point plane.
    pub scale: f32,
    /// Smallest carve radius.
    pub min_radius: f32,
    /// Largest carve radius.
    pub max_radius: f32,
    /// Noise versus taper blend, clamped to `[0, 1]` when used.
    pub radius_noise_ratio: f32,
    /// Worms must have more samples than this.
    pub min_worm_length: usize,
    /// Color used in caves-only mode.
    pub cave_color: Rgba8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            side_length_in_chunks: 4,
            chunk_size: CHUNK_SIZE,
            max_cube_height: 48,
            base_cube_height: 16,
            cube_size: 1.0,
            seed: WorldSeed::default(),
            base_noise_offset: IVec2::ZERO,
            terrain: TerrainNoiseConfig::default(),
            caves: CaveConfig::default(),
        }
    }
}

impl Default for TerrainNoiseConfig {
    fn default() -> Self {
        Self {
            noise_offset: IVec2::ZERO,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            scale: 1.0,
            adjustment_curve: KeyframeCurve::default(),
            surface_color: Rgba8::opaque(86, 168, 62),
            below_surface_color: Rgba8::opaque(121, 85, 58),
        }
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            only_caves: false,
            padding_in_chunks: 2,
            noise_offset: IVec2::new(1000, 1000),
            scale: 2.0,
            min_radius: 1.0,
            max_radius: 4.0,
            radius_noise_ratio: 0.5,
            min_worm_length: 8,
            cave_color: Rgba8::opaque(96, 96, 104),
        }
    }
}

impl GeneratorConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Self::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Checks every value generation cannot clamp on its own.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.side_length_in_chunks == 0 {
            return Err(ConfigError::invalid("side_length_in_chunks", "must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::invalid("chunk_size", "must be at least 1"));
        }
        if self.base_cube_height > self.max_cube_height {
            return Err(ConfigError::invalid(
                "base_cube_height",
                format!(
                    "{} exceeds max_cube_height {}",
                    self.base_cube_height, self.max_cube_height
                ),
            ));
        }
        if !(self.cube_size > 0.0 && self.cube_size.is_finite()) {
            return Err(ConfigError::invalid(
                "cube_size",
                format!("must be positive and finite, got {}", self.cube_size),
            ));
        }

        let terrain = &self.terrain;
        let caves = &self.caves;
        for (field, value) in [
            ("terrain.lacunarity", terrain.lacunarity),
            ("terrain.persistence", terrain.persistence),
            ("terrain.scale", terrain.scale),
            ("caves.scale", caves.scale),
            ("caves.min_radius", caves.min_radius),
            ("caves.max_radius", caves.max_radius),
            ("caves.radius_noise_ratio", caves.radius_noise_ratio),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        if terrain.octaves == 0 {
            return Err(ConfigError::invalid("terrain.octaves", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&terrain.persistence) {
            return Err(ConfigError::invalid(
                "terrain.persistence",
                format!("must be in [0, 1], got {}", terrain.persistence),
            ));
        }
        let keys = terrain.adjustment_curve.keys();
        if keys.is_empty() {
            return Err(ConfigError::invalid("terrain.adjustment_curve", "needs at least one keyframe"));
        }
        if keys.iter().any(|(t, v)| !t.is_finite() || !v.is_finite()) {
            return Err(ConfigError::invalid("terrain.adjustment_curve", "keyframes must be finite"));
        }

        if caves.min_radius < 0.0 {
            return Err(ConfigError::invalid(
                "caves.min_radius",
                format!("must not be negative, got {}", caves.min_radius),
            ));
        }
        if caves.min_radius > caves.max_radius {
            return Err(ConfigError::invalid(
                "caves.min_radius",
                format!("{} exceeds caves.max_radius {}", caves.min_radius, caves.max_radius),
            ));
        }
        Ok(())
    }

    /// Visible grid side, in voxels.
    #[must_use]
    pub const fn side_length(&self) -> usize {
        self.side_length_in_chunks * self.chunk_size
    }

    /// Cave padding on each horizontal side, in voxels.
    #[must_use]
    pub const fn cave_padding(&self) -> usize {
        self.caves.padding_in_chunks * self.chunk_size
    }

    /// Extent of the padded cave volume.
    #[must_use]
    pub const fn cave_extent(&self) -> Extent3 {
        let side = self.side_length() + 2 * self.cave_padding();
        Extent3::new(side, self.max_cube_height + 1, side)
    }

    /// Surface height field parameters.
    #[must_use]
    pub fn terrain_plane(&self) -> PlaneParams {
        let side = self.side_length();
        PlaneParams {
            width: side,
            depth: side,
            offset: self.base_noise_offset + self.terrain.noise_offset,
            scale: self.terrain.scale,
            octaves: self.terrain.octaves,
            lacunarity: self.terrain.lacunarity,
            persistence: self.terrain.persistence,
        }
    }

    /// Combined offset of the cave noise.
    #[must_use]
    pub fn cave_offset(&self) -> IVec2 {
        self.base_noise_offset + self.caves.noise_offset
    }

    /// Worm planning parameters over the padded cave window.
    #[must_use]
    pub fn worm_params(&self) -> WormParams {
        WormParams {
            height: self.max_cube_height + 1,
            offset: self.cave_offset(),
            max_radius: self.caves.max_radius,
            min_worm_length: self.caves.min_worm_length,
            max_worm_range: self.cave_padding() as f32,
        }
    }

    /// Sphere carving parameters.
    #[must_use]
    pub const fn carve_params(&self) -> CarveParams {
        CarveParams {
            min_radius: self.caves.min_radius,
            radius_noise_ratio: self.caves.radius_noise_ratio,
        }
    }

    /// Terrain composition parameters.
    #[must_use]
    pub const fn compose_params(&self) -> ComposeParams {
        ComposeParams {
            base_cube_height: self.base_cube_height,
            max_cube_height: self.max_cube_height,
            cube_size: self.cube_size,
            cave_padding: self.cave_padding(),
            only_caves: self.caves.only_caves,
            surface_color: self.terrain.surface_color,
            below_surface_color: self.terrain.below_surface_color,
            cave_color: self.caves.cave_color,
        }
    }
}
