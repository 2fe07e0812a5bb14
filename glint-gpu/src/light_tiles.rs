use core::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::UVec2;

use crate::{Frame, LightSample, WhiteNoise};

/// Describes how light tiles are laid out and shared between pixels.
///
/// Each tile consists of `tile_size` slots, split into three consecutive
/// sections - emissive, environment and analytic samples.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable, Debug)]
pub struct LightTileLayout {
    pub screen_size: u32,
    pub tile_size: u32,
    pub tile_count: u32,
    pub emissive_count: u32,
    pub environment_count: u32,
    pub analytic_count: u32,
}

impl LightTileLayout {
    /// Splits `tile_size` slots between light types, proportionally to how
    /// many candidates of each type are drawn per pixel.
    ///
    /// Analytic lights receive whatever remains after rounding down the other
    /// two sections; a light type with a non-zero candidate count always gets
    /// at least one slot, taken from the largest section.
    pub fn new(
        screen_size: u32,
        tile_size: u32,
        tile_count: u32,
        candidates: [u32; 3],
    ) -> Self {
        let total: u64 = candidates.iter().map(|&count| count as u64).sum();
        let mut counts = [0; 3];

        if total > 0 {
            counts = candidates.map(|count| {
                ((tile_size as u64) * (count as u64) / total) as u32
            });

            if candidates[2] > 0 {
                counts[2] = tile_size - counts[0] - counts[1];
            }

            for idx in 0..3 {
                if candidates[idx] == 0 || counts[idx] > 0 {
                    continue;
                }

                let largest = (0..3).fold(0, |largest, idx| {
                    if counts[idx] > counts[largest] {
                        idx
                    } else {
                        largest
                    }
                });

                if counts[largest] > 1 {
                    counts[largest] -= 1;
                    counts[idx] += 1;
                }
            }
        }

        let [emissive_count, environment_count, analytic_count] = counts;

        Self {
            screen_size,
            tile_size,
            tile_count,
            emissive_count,
            environment_count,
            analytic_count,
        }
    }

    /// Returns the number of slots across all tiles.
    pub fn len(&self) -> usize {
        (self.tile_size as usize) * (self.tile_count as usize)
    }

    pub fn emissive_range(&self) -> Range<usize> {
        0..(self.emissive_count as usize)
    }

    pub fn environment_range(&self) -> Range<usize> {
        let start = self.emissive_count as usize;

        start..(start + self.environment_count as usize)
    }

    pub fn analytic_range(&self) -> Range<usize> {
        let start = (self.emissive_count + self.environment_count) as usize;

        start..(start + self.analytic_count as usize)
    }

    /// Returns the tile assigned to the block containing given pixel.
    ///
    /// Blocks get shuffled between tiles every frame, so that the same block
    /// doesn't keep reusing the same (possibly unlucky) pool of candidates.
    pub fn tile_of(&self, screen_pos: UVec2, frame: Frame) -> usize {
        if self.tile_count == 0 {
            return 0;
        }

        let block = screen_pos / self.screen_size.max(1);
        let hash = WhiteNoise::new(frame.get(), block).sample_int();

        (hash % self.tile_count) as usize
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LightTilesView<'a> {
    items: &'a [LightSample],
    layout: LightTileLayout,
}

impl<'a> LightTilesView<'a> {
    pub fn new(items: &'a [LightSample], layout: LightTileLayout) -> Self {
        Self { items, layout }
    }

    pub fn layout(&self) -> LightTileLayout {
        self.layout
    }

    pub fn get(&self, tile: usize) -> LightTile<'a> {
        let size = self.layout.tile_size as usize;
        let start = (tile * size).min(self.items.len());
        let end = (start + size).min(self.items.len());

        LightTile {
            items: &self.items[start..end],
            layout: self.layout,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LightTile<'a> {
    items: &'a [LightSample],
    layout: LightTileLayout,
}

impl<'a> LightTile<'a> {
    pub fn emissive(&self) -> &'a [LightSample] {
        self.section(self.layout.emissive_range())
    }

    pub fn environment(&self) -> &'a [LightSample] {
        self.section(self.layout.environment_range())
    }

    pub fn analytic(&self) -> &'a [LightSample] {
        self.section(self.layout.analytic_range())
    }

    fn section(&self, range: Range<usize>) -> &'a [LightSample] {
        self.items.get(range).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn partition() {
        let layout = LightTileLayout::new(8, 1024, 128, [24, 8, 1]);

        assert_eq!(744, layout.emissive_count);
        assert_eq!(248, layout.environment_count);
        assert_eq!(32, layout.analytic_count);
        assert_eq!(0..744, layout.emissive_range());
        assert_eq!(744..992, layout.environment_range());
        assert_eq!(992..1024, layout.analytic_range());
        assert_eq!(1024 * 128, layout.len());
    }

    #[test]
    fn partition_without_analytic_lights() {
        let layout = LightTileLayout::new(8, 1000, 1, [1, 2, 0]);

        assert_eq!(333, layout.emissive_count);
        assert_eq!(666, layout.environment_count);
        assert_eq!(0, layout.analytic_count);
    }

    #[test]
    fn partition_keeps_rare_light_types() {
        let layout = LightTileLayout::new(8, 128, 1, [0, 1, 256]);

        assert_eq!(0, layout.emissive_count);
        assert_eq!(1, layout.environment_count);
        assert_eq!(127, layout.analytic_count);

        let layout = LightTileLayout::new(8, 128, 1, [256, 1, 1]);

        assert_eq!(126, layout.emissive_count);
        assert_eq!(1, layout.environment_count);
        assert_eq!(1, layout.analytic_count);
    }

    #[test]
    fn pixels_in_block_share_tile() {
        let layout = LightTileLayout::new(8, 128, 64, [1, 0, 0]);
        let frame = Frame::new(3);
        let tile = layout.tile_of(uvec2(16, 24), frame);

        for x in 16..24 {
            for y in 24..32 {
                assert_eq!(tile, layout.tile_of(uvec2(x, y), frame));
            }
        }

        assert!(tile < 64);
    }

    #[test]
    fn sections() {
        let items: Vec<_> = (0..8)
            .map(|idx| LightSample {
                ty: LightSample::TYPE_EMISSIVE,
                pdf: idx as f32,
                ..Default::default()
            })
            .collect();

        let layout = LightTileLayout::new(1, 4, 2, [2, 1, 1]);
        let tile = LightTilesView::new(&items, layout).get(1);

        assert_eq!(2, tile.emissive().len());
        assert_eq!(4.0, tile.emissive()[0].pdf);
        assert_eq!(6.0, tile.environment()[0].pdf);
        assert_eq!(7.0, tile.analytic()[0].pdf);
    }
}
