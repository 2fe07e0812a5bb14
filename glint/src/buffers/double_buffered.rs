use std::mem;

use bytemuck::Zeroable;

/// Pair of buffers, one for the current frame and one for the previous
/// frame.
#[derive(Debug, Default)]
pub struct DoubleBuffered<T> {
    curr: T,
    prev: T,
}

impl<T> DoubleBuffered<Vec<T>>
where
    T: Zeroable + Clone,
{
    /// Creates a pair of zeroed buffers with `len` elements each.
    pub fn zeroed(len: usize) -> Self {
        Self {
            curr: vec![T::zeroed(); len],
            prev: vec![T::zeroed(); len],
        }
    }
}

impl<T> DoubleBuffered<T> {
    pub fn curr(&self) -> &T {
        &self.curr
    }

    pub fn curr_mut(&mut self) -> &mut T {
        &mut self.curr
    }

    pub fn prev(&self) -> &T {
        &self.prev
    }

    pub fn prev_mut(&mut self) -> &mut T {
        &mut self.prev
    }

    /// Returns the current buffer for writing together with the previous
    /// buffer for reading.
    pub fn split_mut(&mut self) -> (&mut T, &T) {
        (&mut self.curr, &self.prev)
    }

    pub fn swap(&mut self) {
        mem::swap(&mut self.curr, &mut self.prev);
    }
}
