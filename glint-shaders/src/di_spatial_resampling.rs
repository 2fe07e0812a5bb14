use glint_gpu::prelude::*;

/// Merges pixel's reservoir with reservoirs of randomly chosen neighbours.
///
/// Reads the previous iteration's reservoirs from `in_reservoirs` and writes
/// this pixel's output into `out`, so iterations can be chained through
/// ping-pong buffers.
pub fn main(
    global_id: UVec2,
    params: &DiSpatialResamplingPassParams,
    viewport: &Viewport,
    surfaces: &[Surface],
    normal_depth: &[NormalDepth],
    in_reservoirs: &[DiReservoirData],
    visibility: &impl Visibility,
    out: &mut DiReservoirData,
) {
    let lhs_pos = global_id;
    let lhs_idx = viewport.screen_to_idx(lhs_pos);
    let lhs_surface = surfaces[lhs_idx];
    let lhs = DiReservoir::read(in_reservoirs, lhs_idx);

    if lhs_surface.is_none() {
        lhs.write(out);
        return;
    }

    // -------------------------------------------------------------------------

    let bias_correction = params.bias_correction();
    let mut wnoise = WhiteNoise::new(params.seed, lhs_pos);
    let mut main = DiReservoir::default();

    main.merge(&mut wnoise, &lhs, params.max_history);

    // (index, confidence) of each merged neighbour, for computing `M_eff`
    let mut rhs_merged = [(0usize, 0.0f32); MAX_SPATIAL_SAMPLES];
    let mut rhs_merged_len = 0;

    let sample_count = (params.sample_count as usize).min(MAX_SPATIAL_SAMPLES);

    for _ in 0..sample_count {
        let offset = wnoise.sample_disk() * params.sample_radius;
        let rhs_pos = (lhs_pos.as_vec2() + 0.5 + offset).floor().as_ivec2();

        if !viewport.contains(rhs_pos) || rhs_pos == lhs_pos.as_ivec2() {
            continue;
        }

        let rhs_idx = viewport.screen_to_idx(rhs_pos.as_uvec2());

        if !normal_depth[lhs_idx].is_similar_to(
            &normal_depth[rhs_idx],
            params.normal_threshold,
            params.depth_threshold,
        ) {
            continue;
        }

        let rhs = DiReservoir::read(in_reservoirs, rhs_idx);

        if rhs.is_empty() {
            continue;
        }

        if params.visibility_threshold > 0.0
            && offset.length() > params.visibility_threshold
            && !visibility.trace_visibility(
                lhs_surface.position,
                rhs.sample.light.visibility_target(lhs_surface.position),
            )
        {
            continue;
        }

        main.merge_from(
            &mut wnoise,
            &rhs,
            &lhs_surface,
            bias_correction,
            params.max_history,
        );

        rhs_merged[rhs_merged_len] = (rhs_idx, rhs.m);
        rhs_merged_len += 1;
    }

    if !bias_correction.is_resampling() {
        main.refresh_pdf(&lhs_surface);
    }

    // -------------------------------------------------------------------------

    let mut confidence = Confidence::default();

    confidence.add(lhs.m, true);

    for &(rhs_idx, rhs_m) in &rhs_merged[..rhs_merged_len] {
        confidence.add(
            rhs_m,
            Confidence::is_valid(
                bias_correction,
                &surfaces[rhs_idx],
                &main.sample.light,
                visibility,
            ),
        );
    }

    main.finalize(confidence.get(bias_correction), params.max_history);
    main.write(out);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SIZE: u32 = 5;

    fn surface(depth: f32) -> Surface {
        Surface {
            position: Vec3::ZERO,
            depth,
            normal: Vec3::Z,
            view: Vec3::Z,
            base_color: Vec3::ONE,
            roughness: 1.0,
            ..Default::default()
        }
    }

    fn reservoir(light_id: u32, m: f32) -> DiReservoirData {
        let light = LightSample::emissive(
            LightId::new(light_id),
            vec3(0.0, 0.0, 1.0),
            -Vec3::Z,
            Vec3::splat(PI),
            1.0,
        );

        DiReservoirData {
            light,
            w_sum: m,
            m,
            w: 1.0,
            pdf: 1.0,
        }
    }

    fn params(
        bias_correction: BiasCorrection,
    ) -> DiSpatialResamplingPassParams {
        DiSpatialResamplingPassParams {
            seed: 0,
            bias_correction: bias_correction.serialize(),
            normal_threshold: 0.9,
            depth_threshold: 0.1,
            max_history: 20.0,
            sample_count: 5,
            sample_radius: 2.0,
            visibility_threshold: 0.0,
        }
    }

    /// Runs the pass for the center pixel of a 5x5 screen; each pixel's
    /// reservoir points at light with id equal to the pixel's index.
    fn run(
        params: &DiSpatialResamplingPassParams,
        surfaces: &[Surface],
        visibility: &impl Visibility,
    ) -> DiReservoirData {
        let viewport = Viewport::new(uvec2(SIZE, SIZE));
        let normal_depth: Vec<_> =
            surfaces.iter().map(|s| s.normal_depth()).collect();

        let reservoirs: Vec<_> =
            (0..viewport.len()).map(|idx| reservoir(idx as u32, 1.0)).collect();

        let mut out = DiReservoirData::default();

        main(
            uvec2(2, 2),
            params,
            &viewport,
            surfaces,
            &normal_depth,
            &reservoirs,
            visibility,
            &mut out,
        );

        out
    }

    #[test]
    fn merge() {
        let surfaces = vec![surface(1.0); (SIZE * SIZE) as usize];

        for mode in [
            BiasCorrection::Off,
            BiasCorrection::Naive,
            BiasCorrection::Mis,
            BiasCorrection::RayTraced,
        ] {
            let out = run(&params(mode), &surfaces, &Unoccluded);

            assert!(out.m > 1.0);
            assert!(out.m <= 6.0);
            assert_relative_eq!(1.0, out.w, epsilon = 1e-5);
        }
    }

    #[test]
    fn neighbours_with_different_depth_are_rejected() {
        // Everything but the center pixel is 50% further away
        let mut surfaces = vec![surface(1.5); (SIZE * SIZE) as usize];
        surfaces[12] = surface(1.0);

        for seed in 0..64 {
            let params = DiSpatialResamplingPassParams {
                seed,
                ..params(BiasCorrection::Naive)
            };

            let out = run(&params, &surfaces, &Unoccluded);

            assert_relative_eq!(1.0, out.m);
            assert_eq!(12, out.light.light_id.get());
        }
    }

    #[test]
    fn distant_neighbours_require_visibility() {
        struct Occluded;

        impl Visibility for Occluded {
            fn trace_visibility(&self, _: Vec3, _: Vec3) -> bool {
                false
            }
        }

        let surfaces = vec![surface(1.0); (SIZE * SIZE) as usize];

        let params = DiSpatialResamplingPassParams {
            sample_radius: 2.0,
            visibility_threshold: 0.01,
            ..params(BiasCorrection::Off)
        };

        let out = run(&params, &surfaces, &Occluded);

        assert_relative_eq!(1.0, out.m);
        assert_eq!(12, out.light.light_id.get());
    }

    #[test]
    fn ray_traced_skips_occluded_contributors() {
        struct Occluded;

        impl Visibility for Occluded {
            fn trace_visibility(&self, _: Vec3, _: Vec3) -> bool {
                false
            }
        }

        let surfaces = vec![surface(1.0); (SIZE * SIZE) as usize];
        let params = params(BiasCorrection::RayTraced);
        let out = run(&params, &surfaces, &Occluded);

        // All of the neighbours get merged, but none of them can see the
        // chosen sample, so only the canonical pixel counts towards `M_eff`
        assert!(out.m > 1.0);
        assert_relative_eq!(out.m, out.w, epsilon = 1e-5);
    }
}
