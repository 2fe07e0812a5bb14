use glam::Vec2;

use crate::gpu::{DiTemporalResamplingPassParams, Visibility};
use crate::shaders::di_temporal_resampling;
use crate::{EngineBuffers, RestirParams};

#[derive(Debug)]
pub struct DiTemporalResamplingPass;

impl DiTemporalResamplingPass {
    /// Merges current reservoirs (in place) with the reprojected reservoirs
    /// of the previous frame.
    pub fn run(
        buffers: &mut EngineBuffers,
        params: &RestirParams,
        seed: u32,
        motion_vectors: Option<&[Vec2]>,
        visibility: &impl Visibility,
    ) {
        let pass_params = DiTemporalResamplingPassParams {
            seed,
            bias_correction: params.bias_correction.serialize(),
            normal_threshold: params.normal_threshold,
            depth_threshold: params.depth_threshold,
            max_history: params.max_history(),
        };

        let viewport = buffers.viewport;
        let surfaces = &buffers.surfaces;
        let normal_depth = &buffers.normal_depth;
        let (reservoirs, prev_reservoirs) = buffers.reservoirs.split_mut();

        super::dispatch(viewport, reservoirs, |pos, reservoir| {
            di_temporal_resampling::main(
                pos,
                &pass_params,
                &viewport,
                motion_vectors,
                surfaces.curr(),
                normal_depth.curr(),
                surfaces.prev(),
                normal_depth.prev(),
                prev_reservoirs,
                visibility,
                reservoir,
            );
        });
    }
}
