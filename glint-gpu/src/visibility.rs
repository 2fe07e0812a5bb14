use glam::Vec3;

/// Visibility oracle; answers whether the segment between two points is
/// unoccluded.
///
/// Resampling passes run in parallel, so implementations must be `Sync`.
pub trait Visibility: Sync {
    fn trace_visibility(&self, from: Vec3, to: Vec3) -> bool;
}

impl<T> Visibility for &T
where
    T: Visibility + ?Sized,
{
    fn trace_visibility(&self, from: Vec3, to: Vec3) -> bool {
        (**self).trace_visibility(from, to)
    }
}

/// Visibility oracle for scenes without occluders.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unoccluded;

impl Visibility for Unoccluded {
    fn trace_visibility(&self, _: Vec3, _: Vec3) -> bool {
        true
    }
}
