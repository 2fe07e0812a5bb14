use core::f32::consts::PI;

use glam::{vec3, UVec2, Vec3};

use crate::{
    AliasTableView, AnalyticLight, EmissiveTriangle, LightId, LightSample,
    WhiteNoise,
};

/// Everything the light-tiling pass needs to draw light samples.
///
/// Light types without an alias table (e.g. because there are no lights of
/// given type) cannot be sampled and yield [`LightSample::default()`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LightsView<'a> {
    pub emissive: &'a [EmissiveTriangle],
    pub emissive_table: Option<AliasTableView<'a>>,
    pub analytic: &'a [AnalyticLight],
    pub analytic_table: Option<AliasTableView<'a>>,
    pub environment: Option<EnvironmentView<'a>>,
}

impl<'a> LightsView<'a> {
    pub fn sample_emissive(
        &self,
        wnoise: &mut WhiteNoise,
        intensity_multiplier: f32,
    ) -> LightSample {
        let Some(table) = self.emissive_table else {
            return Default::default();
        };

        let (idx, pdf) = table.sample_noise(wnoise);
        let triangle = self.emissive[idx];
        let area = triangle.area();

        if area <= 0.0 {
            return Default::default();
        }

        LightSample::emissive(
            LightId::new(idx as u32),
            triangle.sample(wnoise),
            triangle.normal(),
            triangle.radiance * intensity_multiplier,
            pdf / area,
        )
    }

    pub fn sample_analytic(&self, wnoise: &mut WhiteNoise) -> LightSample {
        let Some(table) = self.analytic_table else {
            return Default::default();
        };

        let (idx, pdf) = table.sample_noise(wnoise);

        LightSample::analytic(
            LightId::new(idx as u32),
            &self.analytic[idx],
            pdf,
        )
    }

    pub fn sample_environment(&self, wnoise: &mut WhiteNoise) -> LightSample {
        match self.environment {
            Some(environment) => environment.sample(wnoise),
            None => Default::default(),
        }
    }
}

/// Equirectangular environment map, with `+Y` being up.
///
/// Texel `(x, y)` spans azimuths `φ ∈ <2π·x/w, 2π·(x+1)/w)` and polar
/// angles `θ ∈ <π·y/h, π·(y+1)/h)`.
#[derive(Clone, Copy, Debug)]
pub struct EnvironmentView<'a> {
    size: UVec2,
    radiance: &'a [Vec3],
    table: AliasTableView<'a>,
}

impl<'a> EnvironmentView<'a> {
    pub fn new(
        size: UVec2,
        radiance: &'a [Vec3],
        table: AliasTableView<'a>,
    ) -> Self {
        Self {
            size,
            radiance,
            table,
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Returns the direction that corresponds to given angles.
    pub fn direction(phi: f32, theta: f32) -> Vec3 {
        vec3(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
    }

    /// Returns solid angle covered by texels in row `y`, approximated at the
    /// row's center.
    pub fn texel_solid_angle(size: UVec2, y: u32) -> f32 {
        let d_phi = 2.0 * PI / (size.x as f32);
        let d_theta = PI / (size.y as f32);
        let theta = ((y as f32) + 0.5) * d_theta;

        d_phi * d_theta * theta.sin()
    }

    pub fn sample(&self, wnoise: &mut WhiteNoise) -> LightSample {
        let (idx, pdf) = self.table.sample_noise(wnoise);
        let width = self.size.x as usize;
        let x = (idx % width) as f32;
        let y = (idx / width) as f32;

        let d_phi = 2.0 * PI / (self.size.x as f32);
        let d_theta = PI / (self.size.y as f32);
        let phi = (x + wnoise.sample()) * d_phi;
        let theta = (y + wnoise.sample()) * d_theta;
        let sin_theta = theta.sin();

        if pdf <= 0.0 || sin_theta <= 0.0 {
            return Default::default();
        }

        LightSample::environment(
            LightId::new(idx as u32),
            Self::direction(phi, theta),
            self.radiance[idx],
            pdf / (d_phi * d_theta * sin_theta),
        )
    }
}
