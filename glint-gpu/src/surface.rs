use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{Brdf, LightSample, Vec3Ext};

/// Per-pixel surface, as decoded from the geometry buffer.
///
/// `depth` is the linear depth from the camera; zero means there's no surface
/// at this pixel (background).
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct Surface {
    pub position: Vec3,
    pub depth: f32,
    pub normal: Vec3,
    pub roughness: f32,

    /// Normalized direction from the surface towards the camera.
    pub view: Vec3,
    pub metallic: f32,
    pub base_color: Vec3,
    pub reflectance: f32,
}

impl Surface {
    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn normal_depth(&self) -> NormalDepth {
        NormalDepth {
            normal: self.normal,
            depth: self.depth,
        }
    }

    pub fn clamped_roughness(&self) -> f32 {
        self.roughness.clamp(0.089, 1.0).powi(2)
    }

    /// Returns light reflected towards the camera from given sample, i.e.
    /// BRDF × cosine × incident radiance, without visibility.
    pub fn eval(&self, sample: &LightSample) -> Vec3 {
        let Some(incidence) = sample.incident(self.position) else {
            return Vec3::ZERO;
        };

        let n_o_l = self.normal.dot(incidence.dir);

        if n_o_l <= 0.0 {
            return Vec3::ZERO;
        }

        Brdf::new(self).eval(incidence.dir) * n_o_l * incidence.radiance
    }

    /// Returns the target function `p̂` of given sample, as seen from this
    /// surface.
    pub fn target_pdf(&self, sample: &LightSample) -> f32 {
        if self.is_none() {
            return 0.0;
        }

        self.eval(sample).luma()
    }
}

/// Condensed form of [`Surface`], used to check whether two pixels can share
/// their reservoirs.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct NormalDepth {
    pub normal: Vec3,
    pub depth: f32,
}

impl NormalDepth {
    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    /// Returns whether `other` is close enough to this surface to reuse its
    /// samples: relative depth difference must not exceed `depth_threshold`
    /// and normals must not diverge past `normal_threshold` (a cosine).
    pub fn is_similar_to(
        &self,
        other: &Self,
        normal_threshold: f32,
        depth_threshold: f32,
    ) -> bool {
        if !self.is_some() || !other.is_some() {
            return false;
        }

        let depth_diff = (self.depth - other.depth).abs() / self.depth;

        depth_diff <= depth_threshold
            && self.normal.dot(other.normal) >= normal_threshold
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use core::f32::consts::PI;
    use glam::vec3;

    use super::*;
    use crate::LightId;

    fn lambertian() -> Surface {
        Surface {
            position: Vec3::ZERO,
            depth: 1.0,
            normal: Vec3::Z,
            roughness: 1.0,
            view: Vec3::Z,
            metallic: 0.0,
            base_color: Vec3::ONE,
            reflectance: 0.0,
        }
    }

    #[test]
    fn eval() {
        let surface = lambertian();

        let sample = LightSample::emissive(
            LightId::new(0),
            vec3(0.0, 0.0, 2.0),
            -Vec3::Z,
            Vec3::splat(4.0),
            1.0,
        );

        assert_relative_eq!(
            Vec3::splat(1.0 / PI),
            surface.eval(&sample),
            epsilon = 1e-6
        );

        assert_relative_eq!(
            1.0 / PI,
            surface.target_pdf(&sample),
            epsilon = 1e-6
        );
    }

    #[test]
    fn eval_below_horizon() {
        let surface = lambertian();

        let sample = LightSample::emissive(
            LightId::new(0),
            vec3(0.0, 0.0, -2.0),
            Vec3::Z,
            Vec3::splat(4.0),
            1.0,
        );

        assert_eq!(Vec3::ZERO, surface.eval(&sample));
        assert_eq!(0.0, surface.target_pdf(&sample));
    }

    #[test]
    fn background_has_no_target() {
        let surface = Surface {
            depth: 0.0,
            ..lambertian()
        };

        let sample = LightSample::environment(
            LightId::new(0),
            Vec3::Z,
            Vec3::ONE,
            1.0,
        );

        assert_eq!(0.0, surface.target_pdf(&sample));
    }

    #[test]
    fn similarity() {
        let a = NormalDepth {
            normal: Vec3::Z,
            depth: 10.0,
        };

        let close = NormalDepth {
            normal: Vec3::Z,
            depth: 10.9,
        };

        let far = NormalDepth {
            normal: Vec3::Z,
            depth: 11.1,
        };

        let tilted = NormalDepth {
            normal: vec3(0.0, 1.0, 1.0).normalize(),
            depth: 10.0,
        };

        assert!(a.is_similar_to(&close, 0.9, 0.1));
        assert!(!a.is_similar_to(&far, 0.9, 0.1));
        assert!(!a.is_similar_to(&tilted, 0.9, 0.1));
        assert!(a.is_similar_to(&tilted, 0.7, 0.1));
        assert!(!a.is_similar_to(&NormalDepth::default(), 0.0, 1.0));
    }
}
