use bytemuck::{Pod, Zeroable};
use glam::UVec2;

#[repr(C)]
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable, Debug,
)]
pub struct Frame(u32);

impl Frame {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Returns whether given pixel gets fresh candidates in this frame when
    /// checkerboarding is enabled; pixels alternate in a checkerboard pattern
    /// that flips every frame.
    pub fn is_checkerboard_turn(self, screen_pos: UVec2) -> bool {
        (screen_pos.x % 2 + screen_pos.y % 2 + self.0 % 2) % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn is_checkerboard_turn() {
        let frame = Frame::new(0);

        assert!(frame.is_checkerboard_turn(uvec2(0, 0)));
        assert!(!frame.is_checkerboard_turn(uvec2(1, 0)));
        assert!(frame.is_checkerboard_turn(uvec2(1, 1)));

        let frame = frame.next();

        assert!(!frame.is_checkerboard_turn(uvec2(0, 0)));
        assert!(frame.is_checkerboard_turn(uvec2(1, 0)));
    }

    #[test]
    fn is_checkerboard_turn_near_wraparound() {
        let frame = Frame::new(u32::MAX);

        assert!(!frame.is_checkerboard_turn(uvec2(u32::MAX, u32::MAX)));
        assert!(frame.is_checkerboard_turn(uvec2(u32::MAX, 0)));

        let frame = frame.next();

        assert_eq!(Frame::new(0), frame);
        assert!(frame.is_checkerboard_turn(uvec2(u32::MAX, u32::MAX)));
    }
}
