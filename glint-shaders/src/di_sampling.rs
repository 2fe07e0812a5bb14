use glint_gpu::prelude::*;

pub fn main(
    global_id: UVec2,
    params: &DiSamplingPassParams,
    viewport: &Viewport,
    light_tiles: &LightTilesView,
    surfaces: &[Surface],
    visibility: &impl Visibility,
    out: &mut DiReservoirData,
) {
    let screen_pos = global_id;
    let surface = surfaces[viewport.screen_to_idx(screen_pos)];

    if surface.is_none()
        || (params.checkerboard != 0
            && !params.frame.is_checkerboard_turn(screen_pos))
    {
        DiReservoir::default().write(out);
        return;
    }

    let mut wnoise = WhiteNoise::new(params.seed, screen_pos);

    let tile = light_tiles
        .get(light_tiles.layout().tile_of(screen_pos, params.frame));

    let sections = [
        (tile.emissive(), params.emissive_candidate_count),
        (tile.environment(), params.environment_candidate_count),
        (tile.analytic(), params.analytic_candidate_count),
    ];

    // Light types without any lights get no slots in the layout; individual
    // slots can still hold `LightSample::default()`, which just contributes a
    // zero weight
    let is_enabled =
        |items: &[LightSample], count: u32| count > 0 && !items.is_empty();

    let total_count: u32 = sections
        .iter()
        .filter(|(items, count)| is_enabled(*items, *count))
        .map(|(_, count)| count)
        .sum();

    if total_count == 0 {
        DiReservoir::default().write(out);
        return;
    }

    // -------------------------------------------------------------------------

    let mut res = DiReservoir::default();
    let m = 1.0 / (total_count as f32);

    for (items, count) in sections {
        if !is_enabled(items, count) {
            continue;
        }

        for _ in 0..count {
            let light = items[wnoise.sample_index(items.len())];
            let sample = DiSample::new(light, &surface);

            let weight = if light.pdf > 0.0 {
                sample.pdf / ((count as f32) * light.pdf)
            } else {
                0.0
            };

            res.update(&mut wnoise, sample, weight, m, params.max_history);
        }
    }

    res.finalize(res.m, params.max_history);

    if params.test_visibility != 0
        && res.w > 0.0
        && !visibility.trace_visibility(
            surface.position,
            res.sample.light.visibility_target(surface.position),
        )
    {
        res.mask();
    }

    res.write(out);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    struct Occluded;

    impl Visibility for Occluded {
        fn trace_visibility(&self, _: Vec3, _: Vec3) -> bool {
            false
        }
    }

    fn surface() -> Surface {
        Surface {
            position: Vec3::ZERO,
            depth: 1.0,
            normal: Vec3::Z,
            view: Vec3::Z,
            base_color: Vec3::ONE,
            roughness: 1.0,
            ..Default::default()
        }
    }

    fn light_tiles() -> (Vec<LightSample>, LightTileLayout) {
        let layout = LightTileLayout::new(8, 4, 1, [1, 0, 0]);

        let items = vec![
            LightSample::emissive(
                LightId::new(0),
                vec3(0.0, 0.0, 1.0),
                -Vec3::Z,
                Vec3::ONE,
                1.0,
            );
            4
        ];

        (items, layout)
    }

    fn params(layout: LightTileLayout) -> DiSamplingPassParams {
        DiSamplingPassParams {
            seed: 1,
            frame: Frame::new(0),
            layout,
            emissive_candidate_count: 8,
            environment_candidate_count: 4,
            analytic_candidate_count: 0,
            test_visibility: 1,
            checkerboard: 0,
            max_history: 20.0,
        }
    }

    #[test]
    fn smoke() {
        let (items, layout) = light_tiles();
        let light_tiles = LightTilesView::new(&items, layout);
        let viewport = Viewport::new(uvec2(1, 1));
        let mut out = DiReservoirData::default();

        main(
            uvec2(0, 0),
            &params(layout),
            &viewport,
            &light_tiles,
            &[surface()],
            &Unoccluded,
            &mut out,
        );

        // Environment map has no slots, so only emissive candidates count
        // and the reservoir represents exactly one pixel-frame
        assert_relative_eq!(1.0, out.m, epsilon = 1e-5);

        // With a single light, `w` is the inverse of the source pdf
        assert_relative_eq!(1.0, out.w, epsilon = 1e-5);
        assert_relative_eq!(1.0 / PI, out.pdf, epsilon = 1e-6);
        assert_relative_eq!(
            out.w * out.pdf * out.m,
            out.w_sum,
            epsilon = 1e-6
        );
    }

    #[test]
    fn occluded() {
        let (items, layout) = light_tiles();
        let light_tiles = LightTilesView::new(&items, layout);
        let viewport = Viewport::new(uvec2(1, 1));
        let mut out = DiReservoirData::default();

        main(
            uvec2(0, 0),
            &params(layout),
            &viewport,
            &light_tiles,
            &[surface()],
            &Occluded,
            &mut out,
        );

        assert!(out.light.is_some());
        assert_relative_eq!(1.0, out.m, epsilon = 1e-5);
        assert_eq!(0.0, out.w);
    }

    #[test]
    fn empty_slots_dont_disable_section() {
        let (mut items, layout) = light_tiles();

        items[0] = LightSample::default();

        let light_tiles = LightTilesView::new(&items, layout);
        let viewport = Viewport::new(uvec2(1, 1));
        let mut out = DiReservoirData::default();

        main(
            uvec2(0, 0),
            &params(layout),
            &viewport,
            &light_tiles,
            &[surface()],
            &Unoccluded,
            &mut out,
        );

        assert!(out.light.is_some());
        assert_relative_eq!(1.0, out.m, epsilon = 1e-5);
        assert!(out.w > 0.0);
    }

    #[test]
    fn background() {
        let (items, layout) = light_tiles();
        let light_tiles = LightTilesView::new(&items, layout);
        let viewport = Viewport::new(uvec2(1, 1));
        let mut out = DiReservoirData::default();

        main(
            uvec2(0, 0),
            &params(layout),
            &viewport,
            &light_tiles,
            &[Surface::default()],
            &Unoccluded,
            &mut out,
        );

        assert!(DiReservoir::from(out).is_empty());
    }

    #[test]
    fn checkerboard() {
        let (items, layout) = light_tiles();
        let light_tiles = LightTilesView::new(&items, layout);
        let viewport = Viewport::new(uvec2(2, 1));
        let surfaces = [surface(), surface()];

        let params = DiSamplingPassParams {
            checkerboard: 1,
            ..params(layout)
        };

        let mut out = [DiReservoirData::default(); 2];

        for (x, out) in out.iter_mut().enumerate() {
            main(
                uvec2(x as u32, 0),
                &params,
                &viewport,
                &light_tiles,
                &surfaces,
                &Unoccluded,
                out,
            );
        }

        assert!(!DiReservoir::from(out[0]).is_empty());
        assert!(DiReservoir::from(out[1]).is_empty());
    }
}
