//! Glint: reservoir-based spatiotemporal resampling of direct lighting
//! (ReSTIR DI).
//!
//! The [`Engine`] owns the scene's lights and the per-pixel state persisted
//! across frames; every frame it consumes the host's surfaces (plus optional
//! motion vectors and a visibility oracle) and produces one
//! [`DirectSample`] per pixel.

#![allow(clippy::too_many_arguments)]

mod alias_table;
mod buffers;
mod env_map;
mod error;
mod lighting;
mod lights;
mod params;
mod passes;
mod utils;

use std::fmt::Debug;
use std::hash::Hash;

use derivative::Derivative;
pub use glam::{uvec2, UVec2, Vec2, Vec3};
pub use glint_gpu as gpu;
use glint_shaders as shaders;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use self::alias_table::*;
pub(crate) use self::buffers::*;
pub use self::env_map::*;
pub use self::error::*;
pub use self::lighting::*;
pub use self::lights::*;
pub use self::params::*;
use self::passes::*;
pub use crate::gpu::{
    AnalyticLight, BiasCorrection, DiReservoir, DiReservoirData, DirectSample,
    EmissiveTriangle, Frame, LightId, LightKind, LightSample, NormalDepth,
    Surface, Unoccluded, Viewport, Visibility,
};

/// Everything the host provides for a single frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a, V> {
    /// Per-pixel surfaces, laid out row-by-row; pixels with `depth == 0` are
    /// treated as background.
    pub surfaces: &'a [Surface],

    /// Per-pixel offsets (in pixels) from the current position to where the
    /// same surface was in the previous frame.
    ///
    /// When missing, temporal resampling is skipped for this frame.
    pub motion_vectors: Option<&'a [Vec2]>,

    pub visibility: &'a V,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Engine<H>
where
    H: Clone + Debug + Eq + Hash,
{
    lights: LightSet<H>,
    lighting: Lighting,
    #[derivative(Debug = "ignore")]
    buffers: EngineBuffers,
    frame: Frame,
    #[derivative(Debug = "ignore")]
    rng: StdRng,
    has_invalid_history: bool,
}

impl<H> Engine<H>
where
    H: Clone + Debug + Eq + Hash,
{
    pub fn new(size: UVec2) -> Self {
        Self::with_rng(size, StdRng::from_entropy())
    }

    /// Creates an engine whose frames are reproducible: given the same
    /// inputs, it produces the same samples.
    pub fn with_seed(size: UVec2, seed: u64) -> Self {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(size: UVec2, rng: StdRng) -> Self {
        info!("Initializing; size = {}x{}", size.x, size.y);

        Self {
            lights: Default::default(),
            lighting: Default::default(),
            buffers: EngineBuffers::new(Viewport::new(size)),
            frame: Default::default(),
            rng,
            has_invalid_history: false,
        }
    }

    pub fn lights(&self) -> &LightSet<H> {
        &self.lights
    }

    /// Provides access to the scene's lights.
    ///
    /// Any modification causes the alias tables to get rebuilt and the
    /// history to get discarded when rendering the next frame.
    pub fn lights_mut(&mut self) -> &mut LightSet<H> {
        &mut self.lights
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Discards the history, so that the next frame doesn't reuse samples
    /// evaluated against outdated materials.
    pub fn invalidate_materials(&mut self) {
        debug!("Materials invalidated");

        self.has_invalid_history = true;
    }

    /// Changes the size of the viewport, dropping all per-pixel state.
    pub fn resize(&mut self, size: UVec2) {
        if self.buffers.viewport.size() == size {
            return;
        }

        info!("Resizing; size = {}x{}", size.x, size.y);

        self.buffers = EngineBuffers::new(Viewport::new(size));
    }

    pub fn viewport(&self) -> Viewport {
        self.buffers.viewport
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Returns samples produced by the most recent frame.
    ///
    /// After a frame that failed to render, all samples are empty.
    pub fn direct_samples(&self) -> &[DirectSample] {
        &self.buffers.direct_samples
    }

    /// Returns reservoirs the next frame's temporal resampling is going to
    /// read (i.e. the most recent frame's final reservoirs).
    pub fn history(&self) -> &[DiReservoirData] {
        self.buffers.reservoirs.prev()
    }

    /// Renders a single frame.
    ///
    /// If the frame can't be rendered (e.g. because of invalid parameters or
    /// mismatched buffers), the output gets cleared, the error is returned,
    /// and the engine's state stays as it was before the call.
    pub fn render<V>(
        &mut self,
        params: &RestirParams,
        input: FrameInput<'_, V>,
    ) -> Result<()>
    where
        V: Visibility,
    {
        if let Err(err) = self.begin_frame(params, &input) {
            error!("Frame {} disabled: {}", self.frame.get(), err);

            self.buffers.clear_output();

            return Err(err);
        }

        self.run_passes(params, &input);
        self.end_frame();

        Ok(())
    }

    fn begin_frame<V>(
        &mut self,
        params: &RestirParams,
        input: &FrameInput<'_, V>,
    ) -> Result<()> {
        params.validate()?;

        let len = self.buffers.viewport.len();

        if input.surfaces.len() != len {
            return Err(Error::configuration(format!(
                "expected {} surfaces, got {}",
                len,
                input.surfaces.len()
            )));
        }

        if let Some(motion_vectors) = input.motion_vectors {
            if motion_vectors.len() != len {
                return Err(Error::configuration(format!(
                    "expected {} motion vectors, got {}",
                    len,
                    motion_vectors.len()
                )));
            }
        }

        if self.lights.is_dirty() {
            self.lighting = Lighting::build(&self.lights)?;
            self.lights.mark_clean();
            self.has_invalid_history = true;
        }

        if self.has_invalid_history {
            debug!("Clearing history");

            self.buffers.clear_history();
            self.has_invalid_history = false;
        }

        debug!("Rendering frame {}", self.frame.get());

        Ok(())
    }

    fn run_passes<V>(
        &mut self,
        params: &RestirParams,
        input: &FrameInput<'_, V>,
    ) where
        V: Visibility,
    {
        let frame = self.frame;
        let visibility = input.visibility;
        let buffers = &mut self.buffers;

        utils::measure("surface_loading", || {
            SurfaceLoadingPass::run(buffers, input.surfaces);
        });

        let seed = self.rng.gen();

        let layout = utils::measure("light_tiling", || {
            LightTilingPass::run(buffers, params, &self.lighting, seed)
        });

        let seed = self.rng.gen();

        utils::measure("di_sampling", || {
            DiSamplingPass::run(
                buffers, params, layout, frame, seed, visibility,
            );
        });

        if params.mode.has_temporal_resampling() {
            let seed = self.rng.gen();

            utils::measure("di_temporal_resampling", || {
                DiTemporalResamplingPass::run(
                    buffers,
                    params,
                    seed,
                    input.motion_vectors,
                    visibility,
                );
            });
        }

        if params.mode.has_spatial_resampling() {
            for _ in 0..params.spatial_iteration_count {
                let seed = self.rng.gen();

                utils::measure("di_spatial_resampling", || {
                    DiSpatialResamplingPass::run(
                        buffers, params, seed, visibility,
                    );
                });
            }
        }

        utils::measure("di_resolving", || {
            DiResolvingPass::run(buffers);
        });
    }

    fn end_frame(&mut self) {
        self.buffers.swap();
        self.frame = self.frame.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(len: usize) -> Vec<Surface> {
        vec![
            Surface {
                depth: 1.0,
                normal: Vec3::Z,
                view: Vec3::Z,
                base_color: Vec3::ONE,
                roughness: 1.0,
                ..Default::default()
            };
            len
        ]
    }

    fn engine() -> Engine<u32> {
        let mut engine = Engine::with_seed(uvec2(4, 4), 1234);

        engine
            .lights_mut()
            .add_analytic(0, AnalyticLight::point(Vec3::Z, Vec3::ONE));

        engine
    }

    #[test]
    fn render() {
        let mut engine = engine();
        let surfaces = surfaces(16);

        engine
            .render(
                &RestirParams::default(),
                FrameInput {
                    surfaces: &surfaces,
                    motion_vectors: None,
                    visibility: &Unoccluded,
                },
            )
            .unwrap();

        assert_eq!(Frame::new(1), engine.frame());
        assert!(engine.direct_samples().iter().all(|s| s.weight > 0.0));
        assert!(engine.history().iter().all(|res| res.m > 0.0));
    }

    #[test]
    fn mismatched_surfaces() {
        let mut engine = engine();
        let surfaces = surfaces(15);

        let result = engine.render(
            &RestirParams::default(),
            FrameInput {
                surfaces: &surfaces,
                motion_vectors: None,
                visibility: &Unoccluded,
            },
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
        assert_eq!(Frame::new(0), engine.frame());
        assert!(engine.direct_samples().iter().all(|s| s.weight == 0.0));
    }
}
