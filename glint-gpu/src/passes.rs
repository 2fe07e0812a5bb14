use bytemuck::{Pod, Zeroable};

use crate::{Frame, LightTileLayout};

/// Determines how the effective confidence of a combined reservoir is
/// computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BiasCorrection {
    /// Neighbours are merged using their stored weights, without evaluating
    /// their samples at the current pixel.
    #[default]
    Off,

    /// Neighbours' samples are re-weighted by the current pixel's target
    /// function and every merged candidate is assumed to be valid.
    Naive,

    /// As `Naive`, but only contributors that could have produced the chosen
    /// sample count towards the confidence.
    Mis,

    /// As `Mis`, additionally requiring the chosen sample to be visible from
    /// each contributor.
    RayTraced,
}

impl BiasCorrection {
    pub fn serialize(self) -> u32 {
        match self {
            BiasCorrection::Off => 0,
            BiasCorrection::Naive => 1,
            BiasCorrection::Mis => 2,
            BiasCorrection::RayTraced => 3,
        }
    }

    pub fn deserialize(val: u32) -> Self {
        match val {
            1 => BiasCorrection::Naive,
            2 => BiasCorrection::Mis,
            3 => BiasCorrection::RayTraced,
            _ => BiasCorrection::Off,
        }
    }

    /// Returns whether neighbours' samples get re-weighted by the current
    /// pixel's target function when merging.
    pub fn is_resampling(self) -> bool {
        self != BiasCorrection::Off
    }
}

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug)]
pub struct LightTilingPassParams {
    pub seed: u32,
    pub emissive_intensity_multiplier: f32,
    pub layout: LightTileLayout,
}

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug)]
pub struct DiSamplingPassParams {
    pub seed: u32,
    pub frame: Frame,
    pub layout: LightTileLayout,
    pub emissive_candidate_count: u32,
    pub environment_candidate_count: u32,
    pub analytic_candidate_count: u32,
    pub test_visibility: u32,
    pub checkerboard: u32,
    pub max_history: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug)]
pub struct DiTemporalResamplingPassParams {
    pub seed: u32,
    pub bias_correction: u32,
    pub normal_threshold: f32,
    pub depth_threshold: f32,
    pub max_history: f32,
}

impl DiTemporalResamplingPassParams {
    pub fn bias_correction(&self) -> BiasCorrection {
        BiasCorrection::deserialize(self.bias_correction)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug)]
pub struct DiSpatialResamplingPassParams {
    pub seed: u32,
    pub bias_correction: u32,
    pub normal_threshold: f32,
    pub depth_threshold: f32,
    pub max_history: f32,
    pub sample_count: u32,
    pub sample_radius: f32,
    pub visibility_threshold: f32,
}

impl DiSpatialResamplingPassParams {
    pub fn bias_correction(&self) -> BiasCorrection {
        BiasCorrection::deserialize(self.bias_correction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_correction_serialization() {
        for mode in [
            BiasCorrection::Off,
            BiasCorrection::Naive,
            BiasCorrection::Mis,
            BiasCorrection::RayTraced,
        ] {
            assert_eq!(mode, BiasCorrection::deserialize(mode.serialize()));
        }
    }
}
