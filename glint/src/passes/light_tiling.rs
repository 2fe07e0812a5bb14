use glam::uvec2;
use rayon::prelude::*;

use crate::gpu::{LightSample, LightTileLayout, LightTilingPassParams};
use crate::shaders::light_tiling;
use crate::{EngineBuffers, Lighting, RestirParams};

#[derive(Debug)]
pub struct LightTilingPass;

impl LightTilingPass {
    /// Fills all of the light tiles with fresh samples and returns the layout
    /// later passes should use to read them.
    pub fn run(
        buffers: &mut EngineBuffers,
        params: &RestirParams,
        lighting: &Lighting,
        seed: u32,
    ) -> LightTileLayout {
        let layout = params.light_tile_layout(lighting.enabled());

        let pass_params = LightTilingPassParams {
            seed,
            emissive_intensity_multiplier: params.emissive_intensity_multiplier,
            layout,
        };

        let lights = lighting.view();

        buffers
            .light_tiles
            .resize(layout.len(), LightSample::default());

        buffers
            .light_tiles
            .par_chunks_mut(layout.tile_size.max(1) as usize)
            .enumerate()
            .for_each(|(tile, items)| {
                for (slot, item) in items.iter_mut().enumerate() {
                    light_tiling::main(
                        uvec2(slot as u32, tile as u32),
                        &pass_params,
                        &lights,
                        item,
                    );
                }
            });

        layout
    }
}
