use std::fmt::Debug;
use std::hash::Hash;

use derivative::Derivative;
use glam::{UVec2, Vec3};
use log::{info, warn};

use crate::gpu::{
    AnalyticLight, EmissiveTriangle, EnvironmentView, LightsView, Vec3Ext,
};
use crate::{AliasTable, EnvMap, LightSet, Result};

/// Sampling-ready snapshot of a [`LightSet`]: lights of each type together
/// with their alias tables.
///
/// Immutable once built; rebuilt whenever the light set changes.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct Lighting {
    #[derivative(Debug = "ignore")]
    emissive: Vec<EmissiveTriangle>,
    emissive_table: Option<AliasTable>,
    #[derivative(Debug = "ignore")]
    analytic: Vec<AnalyticLight>,
    analytic_table: Option<AliasTable>,
    environment: Option<Environment>,
}

impl Lighting {
    /// Builds alias tables for all of the lights.
    ///
    /// Light types without any lights (or with all-zero weights) are
    /// disabled; an environment map that can't be built is disabled with a
    /// warning, without affecting other light types.
    pub fn build<H>(lights: &LightSet<H>) -> Result<Self>
    where
        H: Clone + Debug + Eq + Hash,
    {
        let emissive = lights.emissive().to_vec();
        let emissive_table =
            Self::build_table(emissive.iter().map(|t| t.weight()).collect())?;

        let analytic = lights.analytic().to_vec();
        let analytic_table =
            Self::build_table(analytic.iter().map(|l| l.weight()).collect())?;

        let environment = match lights.environment().map(Environment::build) {
            Some(Ok(environment)) => environment,
            Some(Err(err)) => {
                warn!("Environment map disabled: {}", err);
                None
            }
            None => None,
        };

        info!(
            "Lighting rebuilt; emissive triangles = {}, analytic lights = {}, \
             environment = {}",
            if emissive_table.is_some() { emissive.len() } else { 0 },
            if analytic_table.is_some() { analytic.len() } else { 0 },
            environment.is_some(),
        );

        Ok(Self {
            emissive,
            emissive_table,
            analytic,
            analytic_table,
            environment,
        })
    }

    fn build_table(weights: Vec<f32>) -> Result<Option<AliasTable>> {
        if weights.iter().all(|&weight| weight == 0.0) {
            Ok(None)
        } else {
            AliasTable::new(&weights).map(Some)
        }
    }

    /// Returns which light types can be sampled: emissive, environment and
    /// analytic.
    pub fn enabled(&self) -> [bool; 3] {
        [
            self.emissive_table.is_some(),
            self.environment.is_some(),
            self.analytic_table.is_some(),
        ]
    }

    pub fn view(&self) -> LightsView<'_> {
        LightsView {
            emissive: &self.emissive,
            emissive_table: self.emissive_table.as_ref().map(|t| t.view()),
            analytic: &self.analytic,
            analytic_table: self.analytic_table.as_ref().map(|t| t.view()),
            environment: self.environment.as_ref().map(|env| env.view()),
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
struct Environment {
    size: UVec2,
    #[derivative(Debug = "ignore")]
    radiance: Vec<Vec3>,
    table: AliasTable,
}

impl Environment {
    fn build(env: &EnvMap) -> Result<Option<Self>> {
        let size = env.size();
        let radiance = env.radiance()?;

        let weights: Vec<_> = radiance
            .iter()
            .enumerate()
            .map(|(idx, radiance)| {
                let y = (idx as u32) / size.x;

                radiance.luma() * EnvironmentView::texel_solid_angle(size, y)
            })
            .collect();

        Ok(Lighting::build_table(weights)?.map(|table| Self {
            size,
            radiance,
            table,
        }))
    }

    fn view(&self) -> EnvironmentView<'_> {
        EnvironmentView::new(self.size, &self.radiance, self.table.view())
    }
}
