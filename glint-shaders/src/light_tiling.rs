use glint_gpu::prelude::*;

/// Fills a single light-tile slot; `global_id.x` is the slot within the tile
/// and `global_id.y` is the tile.
pub fn main(
    global_id: UVec2,
    params: &LightTilingPassParams,
    lights: &LightsView,
    out: &mut LightSample,
) {
    let mut wnoise = WhiteNoise::new(params.seed, global_id);
    let slot = global_id.x as usize;

    *out = if params.layout.emissive_range().contains(&slot) {
        lights
            .sample_emissive(&mut wnoise, params.emissive_intensity_multiplier)
    } else if params.layout.environment_range().contains(&slot) {
        lights.sample_environment(&mut wnoise)
    } else if params.layout.analytic_range().contains(&slot) {
        lights.sample_analytic(&mut wnoise)
    } else {
        LightSample::default()
    };
}
