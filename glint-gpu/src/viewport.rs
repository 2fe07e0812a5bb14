use bytemuck::{Pod, Zeroable};
use glam::{uvec2, IVec2, UVec2};

/// Size of the screen that's being rendered; all per-pixel buffers are laid
/// out row-by-row according to it.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable, Debug)]
pub struct Viewport {
    size: UVec2,
}

impl Viewport {
    pub fn new(size: UVec2) -> Self {
        Self { size }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Returns the number of pixels.
    pub fn len(&self) -> usize {
        (self.size.x as usize) * (self.size.y as usize)
    }

    pub fn contains(&self, screen_pos: IVec2) -> bool {
        screen_pos.x >= 0
            && screen_pos.y >= 0
            && (screen_pos.x as u32) < self.size.x
            && (screen_pos.y as u32) < self.size.y
    }

    pub fn screen_to_idx(&self, screen_pos: UVec2) -> usize {
        (screen_pos.y as usize) * (self.size.x as usize)
            + (screen_pos.x as usize)
    }

    pub fn idx_to_screen(&self, idx: usize) -> UVec2 {
        let width = self.size.x.max(1) as usize;

        uvec2((idx % width) as u32, (idx / width) as u32)
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;

    use super::*;

    #[test]
    fn indexing() {
        let viewport = Viewport::new(uvec2(4, 3));

        assert_eq!(12, viewport.len());
        assert_eq!(6, viewport.screen_to_idx(uvec2(2, 1)));
        assert_eq!(uvec2(2, 1), viewport.idx_to_screen(6));
        assert_eq!(uvec2(3, 2), viewport.idx_to_screen(11));
    }

    #[test]
    fn contains() {
        let viewport = Viewport::new(uvec2(4, 3));

        assert!(viewport.contains(ivec2(0, 0)));
        assert!(viewport.contains(ivec2(3, 2)));
        assert!(!viewport.contains(ivec2(4, 2)));
        assert!(!viewport.contains(ivec2(3, 3)));
        assert!(!viewport.contains(ivec2(-1, 0)));
    }
}
