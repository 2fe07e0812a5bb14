use core::f32::consts::PI;

use glam::Vec3;

use crate::{F32Ext, Surface};

/// Lambertian diffuse lobe plus GGX specular lobe.
#[derive(Clone, Copy)]
pub struct Brdf<'a> {
    surface: &'a Surface,
}

impl<'a> Brdf<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    /// Evaluates the BRDF for light arriving from direction `l` (pointing
    /// away from the surface).
    pub fn eval(self, l: Vec3) -> Vec3 {
        DiffuseBrdf::new(self.surface).eval()
            + SpecularBrdf::new(self.surface).eval(l)
    }
}

#[derive(Clone, Copy)]
pub struct DiffuseBrdf<'a> {
    surface: &'a Surface,
}

impl<'a> DiffuseBrdf<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    pub fn eval(self) -> Vec3 {
        self.surface.base_color * (1.0 - self.surface.metallic) / PI
    }
}

#[derive(Clone, Copy)]
pub struct SpecularBrdf<'a> {
    surface: &'a Surface,
}

impl<'a> SpecularBrdf<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    pub fn eval(self, l: Vec3) -> Vec3 {
        let n = self.surface.normal;
        let v = self.surface.view;
        let h = (l + v).normalize_or_zero();
        let n_o_l = n.dot(l).saturate();
        let n_o_v = n.dot(v).max(0.0001);
        let n_o_h = n.dot(h).saturate();
        let l_o_h = l.dot(h).saturate();

        let f0 = 0.16
            * self.surface.reflectance
            * self.surface.reflectance
            * (1.0 - self.surface.metallic)
            + self.surface.base_color * self.surface.metallic;

        if f0 == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let roughness = self.surface.clamped_roughness();
        let d = d_ggx(roughness, n_o_h);
        let v = v_smith_ggx_correlated(roughness, n_o_v, n_o_l);
        let f = fresnel(f0, l_o_h);

        d * v * f
    }
}

fn d_ggx(roughness: f32, n_o_h: f32) -> f32 {
    let one_minus_noh_squared = 1.0 - n_o_h * n_o_h;
    let a = n_o_h * roughness;
    let k = roughness / (one_minus_noh_squared + a * a);

    k * k * (1.0 / PI)
}

fn v_smith_ggx_correlated(roughness: f32, n_o_v: f32, n_o_l: f32) -> f32 {
    let a2 = roughness * roughness;
    let lambda_v = n_o_l * ((n_o_v - a2 * n_o_v) * n_o_v + a2).sqrt();
    let lambda_l = n_o_v * ((n_o_l - a2 * n_o_l) * n_o_l + a2).sqrt();

    0.5 / (lambda_v + lambda_l).max(0.0001)
}

fn fresnel(f0: Vec3, l_o_h: f32) -> Vec3 {
    let f90 = f0.dot(Vec3::splat(50.0 * 0.33)).saturate();

    f0 + (f90 - f0) * (1.0 - l_o_h).max(0.001).powf(5.0)
}
