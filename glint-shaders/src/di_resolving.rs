use glint_gpu::prelude::*;

pub fn main(
    global_id: UVec2,
    viewport: &Viewport,
    surfaces: &[Surface],
    reservoirs: &[DiReservoirData],
    out: &mut DirectSample,
) {
    let screen_idx = viewport.screen_to_idx(global_id);

    if surfaces[screen_idx].is_none() {
        *out = DirectSample::default();
        return;
    }

    let res = DiReservoir::read(reservoirs, screen_idx);

    *out = if res.is_empty() || res.sample.light.is_none() {
        DirectSample::default()
    } else {
        DirectSample {
            light: res.sample.light,
            weight: res.w,
        }
    };
}
