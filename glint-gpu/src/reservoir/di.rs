use core::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};

use crate::{BiasCorrection, LightSample, Reservoir, Surface, WhiteNoise};

/// Reservoir for direct illumination.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct DiReservoir {
    pub reservoir: Reservoir<DiSample>,
}

#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct DiReservoirData {
    pub light: LightSample,
    pub w_sum: f32,
    pub m: f32,
    pub w: f32,
    pub pdf: f32,
}

impl DiReservoir {
    pub fn read(buffer: &[DiReservoirData], id: usize) -> Self {
        Self::from(buffer[id])
    }

    pub fn write(self, out: &mut DiReservoirData) {
        *out = self.into();
    }

    /// Finishes a resampling stage: computes the contribution weight out of
    /// the effective confidence `m_eff`, clamps the confidence to `max_m` and
    /// rescales `w_sum`, so that the stored reservoir satisfies
    /// `w_sum = w * pdf * m` and can be merged as-is by the next stage.
    pub fn finalize(&mut self, m_eff: f32, max_m: f32) {
        let pdf = self.sample.pdf;

        self.normalize(pdf, m_eff);
        self.clamp_m(max_m);
        self.w_sum = self.w * pdf * self.m;
    }

    /// Merges another pixel's reservoir into this one, which belongs to a
    /// pixel at `surface`.
    ///
    /// With bias correction enabled, the other reservoir's sample gets
    /// re-weighted by this pixel's target function; otherwise its stored
    /// weight is used as-is and the chosen sample's `pdf` must be refreshed
    /// (see [`Self::refresh_pdf()`]) before finalizing.
    pub fn merge_from(
        &mut self,
        wnoise: &mut WhiteNoise,
        rhs: &Self,
        surface: &Surface,
        bias_correction: BiasCorrection,
        max_m: f32,
    ) -> bool {
        if rhs.is_empty() {
            return false;
        }

        if bias_correction.is_resampling() {
            let pdf = surface.target_pdf(&rhs.sample.light);

            let rhs = Reservoir {
                sample: DiSample {
                    light: rhs.sample.light,
                    pdf,
                },
                ..rhs.reservoir
            };

            self.merge_resampled(wnoise, &rhs, pdf, max_m)
        } else {
            self.merge(wnoise, rhs, max_m)
        }
    }

    /// Re-evaluates the chosen sample's target function at `surface`.
    pub fn refresh_pdf(&mut self, surface: &Surface) {
        self.sample.pdf = surface.target_pdf(&self.sample.light);
    }

    /// Drops the chosen sample's contribution, keeping the confidence; used
    /// when the sample turns out to be occluded.
    pub fn mask(&mut self) {
        self.w = 0.0;
        self.w_sum = 0.0;
    }
}

impl From<DiReservoirData> for DiReservoir {
    fn from(data: DiReservoirData) -> Self {
        Self {
            reservoir: Reservoir {
                sample: DiSample {
                    light: data.light,
                    pdf: data.pdf,
                },
                w_sum: data.w_sum,
                m: data.m,
                w: data.w,
            },
        }
    }
}

impl From<DiReservoir> for DiReservoirData {
    fn from(res: DiReservoir) -> Self {
        Self {
            light: res.sample.light,
            w_sum: res.w_sum,
            m: res.m,
            w: res.w,
            pdf: res.sample.pdf,
        }
    }
}

impl Deref for DiReservoir {
    type Target = Reservoir<DiSample>;

    fn deref(&self) -> &Self::Target {
        &self.reservoir
    }
}

impl DerefMut for DiReservoir {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reservoir
    }
}

#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct DiSample {
    pub light: LightSample,

    /// Target function of `light`, as seen from the pixel owning the
    /// reservoir.
    pub pdf: f32,
}

impl DiSample {
    pub fn new(light: LightSample, surface: &Surface) -> Self {
        Self {
            light,
            pdf: surface.target_pdf(&light),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use core::f32::consts::PI;

    use glam::{vec3, Vec3};

    use super::*;
    use crate::LightId;

    #[test]
    fn serialization() {
        fn target(idx: usize) -> DiReservoir {
            DiReservoir {
                reservoir: Reservoir {
                    sample: DiSample {
                        light: LightSample::emissive(
                            LightId::new(3 * idx as u32),
                            vec3(1.0, 2.0, 3.0 + (idx as f32)),
                            vec3(0.0, 1.0, 0.0),
                            vec3(4.0, 5.0, 6.0),
                            0.25,
                        ),
                        pdf: 123.0,
                    },
                    w_sum: 10.0 + (idx as f32),
                    m: 11.0,
                    w: 12.0 + (idx as f32),
                },
            }
        }

        let mut buffer = vec![DiReservoirData::default(); 10];

        for (idx, item) in buffer.iter_mut().enumerate() {
            target(idx).write(item);
        }

        for idx in 0..10 {
            assert_eq!(target(idx), DiReservoir::read(&buffer, idx));
        }
    }

    #[test]
    fn merge_from() {
        let surface = Surface {
            depth: 1.0,
            normal: Vec3::Z,
            view: Vec3::Z,
            base_color: Vec3::ONE,
            ..Default::default()
        };

        // Sample as seen from a neighbour, for which it was four times as
        // important as it is for `surface`
        let light = LightSample::emissive(
            LightId::new(0),
            vec3(0.0, 0.0, 1.0),
            -Vec3::Z,
            Vec3::splat(PI),
            1.0,
        );

        let rhs = DiReservoir {
            reservoir: Reservoir {
                sample: DiSample { light, pdf: 4.0 },
                w_sum: 4.0 * 0.5 * 3.0,
                m: 3.0,
                w: 0.5,
            },
        };

        let mut wnoise = WhiteNoise::new(0, glam::uvec2(0, 0));

        let mut res = DiReservoir::default();
        res.merge_from(
            &mut wnoise,
            &rhs,
            &surface,
            BiasCorrection::Off,
            20.0,
        );

        assert_relative_eq!(6.0, res.w_sum);
        assert_relative_eq!(4.0, res.sample.pdf);

        res.refresh_pdf(&surface);
        assert_relative_eq!(1.0, res.sample.pdf, epsilon = 1e-6);

        let mut res = DiReservoir::default();
        res.merge_from(
            &mut wnoise,
            &rhs,
            &surface,
            BiasCorrection::Mis,
            20.0,
        );

        assert_relative_eq!(1.5, res.w_sum, epsilon = 1e-6);
        assert_relative_eq!(1.0, res.sample.pdf, epsilon = 1e-6);
        assert_relative_eq!(3.0, res.m);
    }

    #[test]
    fn finalize() {
        let mut res = DiReservoir {
            reservoir: Reservoir {
                sample: DiSample {
                    light: LightSample::default(),
                    pdf: 2.0,
                },
                w_sum: 12.0,
                m: 30.0,
                w: 0.0,
            },
        };

        res.finalize(3.0, 20.0);

        assert_relative_eq!(2.0, res.w);
        assert_relative_eq!(20.0, res.m);
        assert_relative_eq!(80.0, res.w_sum);
    }

    #[test]
    fn finalize_without_target() {
        let mut res = DiReservoir::default();

        res.m = 1.0;
        res.w_sum = 5.0;
        res.finalize(1.0, 20.0);

        assert_eq!(0.0, res.w);
        assert_eq!(0.0, res.w_sum);
    }
}
