use crate::{BiasCorrection, LightSample, Surface, Visibility};

/// Accumulates the effective confidence `M_eff` of a reservoir that's been
/// combined out of several pixels' reservoirs.
#[derive(Clone, Copy, Default, Debug)]
pub struct Confidence {
    all: f32,
    valid: f32,
}

impl Confidence {
    /// Registers a contributing reservoir with confidence `m`; `is_valid`
    /// tells whether the chosen sample could have been produced by that
    /// contributor (see [`Self::is_valid()`]).
    pub fn add(&mut self, m: f32, is_valid: bool) {
        self.all += m;

        if is_valid {
            self.valid += m;
        }
    }

    pub fn get(self, bias_correction: BiasCorrection) -> f32 {
        match bias_correction {
            BiasCorrection::Off | BiasCorrection::Naive => self.all,
            BiasCorrection::Mis | BiasCorrection::RayTraced => self.valid,
        }
    }

    /// Checks whether `sample` could have been produced by a contributor
    /// located at `surface`, i.e. whether its target function there is
    /// non-zero (and, for [`BiasCorrection::RayTraced`], whether the sample is
    /// visible from there).
    ///
    /// Modes that don't need this information skip the evaluation.
    pub fn is_valid(
        bias_correction: BiasCorrection,
        surface: &Surface,
        sample: &LightSample,
        visibility: &impl Visibility,
    ) -> bool {
        match bias_correction {
            BiasCorrection::Off | BiasCorrection::Naive => true,

            BiasCorrection::Mis => surface.target_pdf(sample) > 0.0,

            BiasCorrection::RayTraced => {
                surface.target_pdf(sample) > 0.0
                    && visibility.trace_visibility(
                        surface.position,
                        sample.visibility_target(surface.position),
                    )
            }
        }
    }
}
