use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{LightSample, Surface};

/// Final per-pixel output: the chosen light sample together with its
/// contribution weight.
///
/// Shading multiplies `weight` by its own evaluation of the sample
/// (BRDF × cosine × radiance × visibility); background pixels and pixels
/// without any usable sample have `weight == 0`.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct DirectSample {
    pub light: LightSample,
    pub weight: f32,
}

impl DirectSample {
    /// Returns the unshadowed direct lighting estimate for given surface.
    pub fn radiance(&self, surface: &Surface) -> Vec3 {
        if self.weight > 0.0 {
            surface.eval(&self.light) * self.weight
        } else {
            Vec3::ZERO
        }
    }
}
