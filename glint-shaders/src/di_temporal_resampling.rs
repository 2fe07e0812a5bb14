use glint_gpu::prelude::*;

/// Merges pixel's reservoir with its reprojected reservoir from the previous
/// frame.
///
/// `motion_vectors` are in pixels and point from the current position
/// towards the previous one; without them (or when reprojection fails) the
/// current reservoir is kept as-is.
pub fn main(
    global_id: UVec2,
    params: &DiTemporalResamplingPassParams,
    viewport: &Viewport,
    motion_vectors: Option<&[Vec2]>,
    curr_surfaces: &[Surface],
    curr_normal_depth: &[NormalDepth],
    prev_surfaces: &[Surface],
    prev_normal_depth: &[NormalDepth],
    prev_reservoirs: &[DiReservoirData],
    visibility: &impl Visibility,
    reservoir: &mut DiReservoirData,
) {
    let screen_pos = global_id;
    let screen_idx = viewport.screen_to_idx(screen_pos);
    let surface = curr_surfaces[screen_idx];

    if surface.is_none() {
        return;
    }

    let Some(motion_vectors) = motion_vectors else {
        return;
    };

    let prev_pos = (screen_pos.as_vec2() + 0.5 + motion_vectors[screen_idx])
        .floor()
        .as_ivec2();

    if !viewport.contains(prev_pos) {
        return;
    }

    let prev_idx = viewport.screen_to_idx(prev_pos.as_uvec2());

    if !curr_normal_depth[screen_idx].is_similar_to(
        &prev_normal_depth[prev_idx],
        params.normal_threshold,
        params.depth_threshold,
    ) {
        return;
    }

    let prev = DiReservoir::read(prev_reservoirs, prev_idx);

    if prev.is_empty() {
        return;
    }

    // -------------------------------------------------------------------------

    let bias_correction = params.bias_correction();
    let mut wnoise = WhiteNoise::new(params.seed, screen_pos);
    let curr = DiReservoir::from(*reservoir);
    let mut main = DiReservoir::default();

    // Current reservoir's weight is already expressed in this pixel's target
    // function, so it can be merged directly in every mode
    main.merge(&mut wnoise, &curr, params.max_history);

    main.merge_from(
        &mut wnoise,
        &prev,
        &surface,
        bias_correction,
        params.max_history,
    );

    if !bias_correction.is_resampling() {
        main.refresh_pdf(&surface);
    }

    let mut confidence = Confidence::default();

    confidence.add(curr.m, true);

    confidence.add(
        prev.m,
        Confidence::is_valid(
            bias_correction,
            &prev_surfaces[prev_idx],
            &main.sample.light,
            visibility,
        ),
    );

    main.finalize(confidence.get(bias_correction), params.max_history);
    main.write(reservoir);
}
