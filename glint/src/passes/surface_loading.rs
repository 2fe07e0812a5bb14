use rayon::prelude::*;

use crate::gpu::Surface;
use crate::shaders::surface_loading;
use crate::EngineBuffers;

#[derive(Debug)]
pub struct SurfaceLoadingPass;

impl SurfaceLoadingPass {
    pub fn run(buffers: &mut EngineBuffers, surfaces: &[Surface]) {
        let viewport = buffers.viewport;

        buffers
            .surfaces
            .curr_mut()
            .par_iter_mut()
            .zip(buffers.normal_depth.curr_mut().par_iter_mut())
            .enumerate()
            .for_each(|(idx, (out_surface, out_normal_depth))| {
                surface_loading::main(
                    viewport.idx_to_screen(idx),
                    &viewport,
                    surfaces,
                    out_surface,
                    out_normal_depth,
                );
            });
    }
}
