use crate::gpu::{BiasCorrection, LightTileLayout};
use crate::{Error, Result};

/// Selects which of the optional resampling passes are run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    NoResampling,
    SpatialResampling,
    TemporalResampling,
    #[default]
    SpatiotemporalResampling,
}

impl Mode {
    pub fn has_temporal_resampling(self) -> bool {
        matches!(
            self,
            Mode::TemporalResampling | Mode::SpatiotemporalResampling
        )
    }

    pub fn has_spatial_resampling(self) -> bool {
        matches!(
            self,
            Mode::SpatialResampling | Mode::SpatiotemporalResampling
        )
    }
}

/// Configuration of a single frame.
///
/// See [`RestirParams::validate()`] for the accepted ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct RestirParams {
    pub mode: Mode,

    /// Size (in pixels) of the square screen blocks that share a light tile.
    pub light_tile_screen_size: u32,

    /// Number of light samples per tile.
    pub light_tile_size: u32,
    pub light_tile_count: u32,

    /// Whether to check visibility of the sample chosen by the initial
    /// resampling.
    pub test_initial_sample_visibility: bool,

    pub emissive_light_candidate_count: u32,
    pub env_light_candidate_count: u32,
    pub analytic_light_candidate_count: u32,

    pub bias_correction: BiasCorrection,

    /// Minimum cosine between normals of pixels that can share samples.
    pub normal_threshold: f32,

    /// Maximum relative depth difference between pixels that can share
    /// samples.
    pub depth_threshold: f32,

    pub emissive_intensity_multiplier: f32,
    pub spatial_iteration_count: u32,
    pub spatial_reuse_sample_count: u32,
    pub spatial_reuse_sample_radius: f32,

    /// Upper bound of reservoirs' confidence, in frames.
    pub temporal_history_length: u32,

    pub use_checkerboarding: bool,

    /// Neighbours further away than this (in pixels) must see the sample
    /// they contribute; zero disables the check.
    pub spatial_visibility_threshold: f32,
}

impl Default for RestirParams {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            light_tile_screen_size: 8,
            light_tile_size: 1024,
            light_tile_count: 128,
            test_initial_sample_visibility: true,
            emissive_light_candidate_count: 24,
            env_light_candidate_count: 8,
            analytic_light_candidate_count: 1,
            bias_correction: BiasCorrection::default(),
            normal_threshold: 0.9,
            depth_threshold: 0.1,
            emissive_intensity_multiplier: 30.0,
            spatial_iteration_count: 1,
            spatial_reuse_sample_count: 5,
            spatial_reuse_sample_radius: 50.0,
            temporal_history_length: 20,
            use_checkerboarding: false,
            spatial_visibility_threshold: 0.0,
        }
    }
}

impl RestirParams {
    pub fn validate(&self) -> Result<()> {
        fn check(is_valid: bool, what: &str, range: &str) -> Result<()> {
            if is_valid {
                Ok(())
            } else {
                Err(Error::configuration(format!(
                    "{what} must be within {range}"
                )))
            }
        }

        check(
            self.light_tile_screen_size.is_power_of_two()
                && self.light_tile_screen_size <= 128,
            "light_tile_screen_size",
            "a power of two in 1..=128",
        )?;

        check(
            (1..=1024).contains(&self.light_tile_count),
            "light_tile_count",
            "1..=1024",
        )?;

        check(
            (128..=8096).contains(&self.light_tile_size),
            "light_tile_size",
            "128..=8096",
        )?;

        for (what, count) in [
            (
                "emissive_light_candidate_count",
                self.emissive_light_candidate_count,
            ),
            ("env_light_candidate_count", self.env_light_candidate_count),
            (
                "analytic_light_candidate_count",
                self.analytic_light_candidate_count,
            ),
        ] {
            check(count <= 256, what, "0..=256")?;
        }

        check(
            self.candidate_counts().iter().sum::<u32>() > 0,
            "total candidate count",
            "1..",
        )?;

        check(
            (0.0..=1.0).contains(&self.normal_threshold),
            "normal_threshold",
            "0..=1",
        )?;

        check(
            (0.0..=1.0).contains(&self.depth_threshold),
            "depth_threshold",
            "0..=1",
        )?;

        check(
            self.emissive_intensity_multiplier >= 0.0
                && self.emissive_intensity_multiplier.is_finite(),
            "emissive_intensity_multiplier",
            "0..",
        )?;

        check(
            (1..=5).contains(&self.spatial_iteration_count),
            "spatial_iteration_count",
            "1..=5",
        )?;

        check(
            (1..=20).contains(&self.spatial_reuse_sample_count),
            "spatial_reuse_sample_count",
            "1..=20",
        )?;

        check(
            (0.0..=60.0).contains(&self.spatial_reuse_sample_radius),
            "spatial_reuse_sample_radius",
            "0..=60",
        )?;

        check(
            (1..=40).contains(&self.temporal_history_length),
            "temporal_history_length",
            "1..=40",
        )?;

        check(
            (0.0..=self.spatial_reuse_sample_radius)
                .contains(&self.spatial_visibility_threshold),
            "spatial_visibility_threshold",
            "0..=spatial_reuse_sample_radius",
        )?;

        Ok(())
    }

    /// Returns candidate counts of emissive, environment and analytic lights.
    pub fn candidate_counts(&self) -> [u32; 3] {
        [
            self.emissive_light_candidate_count,
            self.env_light_candidate_count,
            self.analytic_light_candidate_count,
        ]
    }

    /// Returns how light tiles are split between light types.
    ///
    /// Light types that aren't `enabled` (i.e. there are no lights of given
    /// type in the scene) don't get any slots.
    pub fn light_tile_layout(&self, enabled: [bool; 3]) -> LightTileLayout {
        let counts = self.candidate_counts();

        LightTileLayout::new(
            self.light_tile_screen_size,
            self.light_tile_size,
            self.light_tile_count,
            [0, 1, 2].map(|idx| if enabled[idx] { counts[idx] } else { 0 }),
        )
    }

    pub(crate) fn max_history(&self) -> f32 {
        self.temporal_history_length as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Ok(()), RestirParams::default().validate());
    }

    #[test]
    fn invalid() {
        let cases = [
            RestirParams {
                light_tile_screen_size: 6,
                ..Default::default()
            },
            RestirParams {
                light_tile_size: 64,
                ..Default::default()
            },
            RestirParams {
                emissive_light_candidate_count: 0,
                env_light_candidate_count: 0,
                analytic_light_candidate_count: 0,
                ..Default::default()
            },
            RestirParams {
                spatial_reuse_sample_count: 21,
                ..Default::default()
            },
            RestirParams {
                temporal_history_length: 0,
                ..Default::default()
            },
            RestirParams {
                spatial_visibility_threshold: 51.0,
                ..Default::default()
            },
            RestirParams {
                normal_threshold: f32::NAN,
                ..Default::default()
            },
        ];

        for params in cases {
            assert!(
                matches!(params.validate(), Err(Error::Configuration(_))),
                "{params:?}"
            );
        }
    }

    #[test]
    fn light_tile_layout() {
        let params = RestirParams::default();
        let layout = params.light_tile_layout([true, true, true]);

        assert_eq!(744, layout.emissive_count);
        assert_eq!(248, layout.environment_count);
        assert_eq!(32, layout.analytic_count);

        let layout = params.light_tile_layout([true, false, false]);

        assert_eq!(1024, layout.emissive_count);
        assert_eq!(0, layout.environment_count);
        assert_eq!(0, layout.analytic_count);
    }

    #[test]
    fn modes() {
        assert!(!Mode::NoResampling.has_temporal_resampling());
        assert!(!Mode::NoResampling.has_spatial_resampling());
        assert!(Mode::TemporalResampling.has_temporal_resampling());
        assert!(!Mode::TemporalResampling.has_spatial_resampling());
        assert!(Mode::SpatiotemporalResampling.has_temporal_resampling());
        assert!(Mode::SpatiotemporalResampling.has_spatial_resampling());
    }
}
