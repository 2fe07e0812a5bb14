use crate::shaders::di_resolving;
use crate::EngineBuffers;

#[derive(Debug)]
pub struct DiResolvingPass;

impl DiResolvingPass {
    pub fn run(buffers: &mut EngineBuffers) {
        let viewport = buffers.viewport;
        let surfaces = buffers.surfaces.curr();
        let reservoirs = buffers.reservoirs.curr();

        super::dispatch(viewport, &mut buffers.direct_samples, |pos, out| {
            di_resolving::main(pos, &viewport, surfaces, reservoirs, out);
        });
    }
}
