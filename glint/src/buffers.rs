mod double_buffered;

use bytemuck::Zeroable;

pub use self::double_buffered::*;
use crate::gpu::{
    DiReservoirData, DirectSample, LightSample, NormalDepth, Surface, Viewport,
};

/// Per-pixel arenas used by the passes.
#[derive(Debug)]
pub struct EngineBuffers {
    pub viewport: Viewport,
    pub surfaces: DoubleBuffered<Vec<Surface>>,
    pub normal_depth: DoubleBuffered<Vec<NormalDepth>>,
    pub reservoirs: DoubleBuffered<Vec<DiReservoirData>>,
    pub light_tiles: Vec<LightSample>,
    pub direct_samples: Vec<DirectSample>,
}

impl EngineBuffers {
    pub fn new(viewport: Viewport) -> Self {
        let len = viewport.len();

        Self {
            viewport,
            surfaces: DoubleBuffered::zeroed(len),
            normal_depth: DoubleBuffered::zeroed(len),
            reservoirs: DoubleBuffered::zeroed(len),
            light_tiles: Vec::new(),
            direct_samples: vec![DirectSample::zeroed(); len],
        }
    }

    /// Drops everything that's been carried over from the previous frame.
    pub fn clear_history(&mut self) {
        self.surfaces.prev_mut().fill(Zeroable::zeroed());
        self.normal_depth.prev_mut().fill(Zeroable::zeroed());
        self.reservoirs.prev_mut().fill(Zeroable::zeroed());
    }

    /// Makes current frame's state available as the previous frame's state
    /// for the next frame.
    pub fn swap(&mut self) {
        self.surfaces.swap();
        self.normal_depth.swap();
        self.reservoirs.swap();
    }

    pub fn clear_output(&mut self) {
        self.direct_samples.fill(Zeroable::zeroed());
    }
}
