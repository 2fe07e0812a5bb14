use crate::gpu::{
    DiSamplingPassParams, Frame, LightTileLayout, LightTilesView, Visibility,
};
use crate::shaders::di_sampling;
use crate::{EngineBuffers, RestirParams};

#[derive(Debug)]
pub struct DiSamplingPass;

impl DiSamplingPass {
    pub fn run(
        buffers: &mut EngineBuffers,
        params: &RestirParams,
        layout: LightTileLayout,
        frame: Frame,
        seed: u32,
        visibility: &impl Visibility,
    ) {
        let [emissive, environment, analytic] = params.candidate_counts();

        let pass_params = DiSamplingPassParams {
            seed,
            frame,
            layout,
            emissive_candidate_count: emissive,
            environment_candidate_count: environment,
            analytic_candidate_count: analytic,
            test_visibility: params.test_initial_sample_visibility as u32,
            checkerboard: params.use_checkerboarding as u32,
            max_history: params.max_history(),
        };

        let viewport = buffers.viewport;
        let light_tiles = LightTilesView::new(&buffers.light_tiles, layout);
        let surfaces = buffers.surfaces.curr();

        super::dispatch(viewport, buffers.reservoirs.curr_mut(), |pos, out| {
            di_sampling::main(
                pos,
                &pass_params,
                &viewport,
                &light_tiles,
                surfaces,
                visibility,
                out,
            );
        });
    }
}
