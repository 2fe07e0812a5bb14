use crate::gpu::{DiSpatialResamplingPassParams, Visibility};
use crate::shaders::di_spatial_resampling;
use crate::{EngineBuffers, RestirParams};

#[derive(Debug)]
pub struct DiSpatialResamplingPass;

impl DiSpatialResamplingPass {
    /// Runs a single spatial iteration.
    ///
    /// Reservoirs produced by the preceding pass are moved into the previous
    /// buffer and read from there, while the results land in the current
    /// buffer; this clobbers the previous frame's reservoirs, so temporal
    /// resampling must've already happened by now.
    pub fn run(
        buffers: &mut EngineBuffers,
        params: &RestirParams,
        seed: u32,
        visibility: &impl Visibility,
    ) {
        let pass_params = DiSpatialResamplingPassParams {
            seed,
            bias_correction: params.bias_correction.serialize(),
            normal_threshold: params.normal_threshold,
            depth_threshold: params.depth_threshold,
            max_history: params.max_history(),
            sample_count: params.spatial_reuse_sample_count,
            sample_radius: params.spatial_reuse_sample_radius,
            visibility_threshold: params.spatial_visibility_threshold,
        };

        buffers.reservoirs.swap();

        let viewport = buffers.viewport;
        let surfaces = buffers.surfaces.curr();
        let normal_depth = buffers.normal_depth.curr();
        let (out, input) = buffers.reservoirs.split_mut();

        super::dispatch(viewport, out, |pos, out| {
            di_spatial_resampling::main(
                pos,
                &pass_params,
                &viewport,
                surfaces,
                normal_depth,
                input,
                visibility,
                out,
            );
        });
    }
}
