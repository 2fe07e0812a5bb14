//! Host-side dispatch of the per-pixel kernels.
//!
//! Every pass writes into its own destination buffer exactly once per
//! invocation; reads only ever go through buffers that aren't being written
//! by the same pass, so the invocations can run in any order.

mod di_resolving;
mod di_sampling;
mod di_spatial_resampling;
mod di_temporal_resampling;
mod light_tiling;
mod surface_loading;

use glam::UVec2;
use rayon::prelude::*;

pub use self::di_resolving::*;
pub use self::di_sampling::*;
pub use self::di_spatial_resampling::*;
pub use self::di_temporal_resampling::*;
pub use self::light_tiling::*;
pub use self::surface_loading::*;
use crate::gpu::Viewport;

/// Runs `kernel` for every pixel of the viewport, in parallel.
///
/// Returning from this function acts as a barrier: all of the invocations
/// have finished writing into `out`.
fn dispatch<T, F>(viewport: Viewport, out: &mut [T], kernel: F)
where
    T: Send,
    F: Fn(UVec2, &mut T) + Send + Sync,
{
    out.par_iter_mut()
        .enumerate()
        .for_each(|(idx, out)| kernel(viewport.idx_to_screen(idx), out));
}
