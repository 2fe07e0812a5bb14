use glint_gpu::prelude::*;

pub fn main(
    global_id: UVec2,
    viewport: &Viewport,
    surfaces: &[Surface],
    out_surface: &mut Surface,
    out_normal_depth: &mut NormalDepth,
) {
    let surface = surfaces[viewport.screen_to_idx(global_id)];

    if surface.is_some() {
        *out_surface = surface;
        *out_normal_depth = surface.normal_depth();
    } else {
        *out_surface = Surface::default();
        *out_normal_depth = NormalDepth::default();
    }
}
