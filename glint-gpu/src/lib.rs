//! Common structs, algorithms etc. used by Glint's shaders and engine.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

mod alias_table;
mod brdf;
mod direct_sample;
mod frame;
mod light;
mod light_tiles;
mod lights;
mod noise;
mod passes;
mod reservoir;
mod surface;
mod utils;
mod viewport;
mod visibility;

pub use self::alias_table::*;
pub use self::brdf::*;
pub use self::direct_sample::*;
pub use self::frame::*;
pub use self::light::*;
pub use self::light_tiles::*;
pub use self::lights::*;
pub use self::noise::*;
pub use self::passes::*;
pub use self::reservoir::*;
pub use self::surface::*;
pub use self::utils::*;
pub use self::viewport::*;
pub use self::visibility::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Maximum number of neighbours visited by a single spatial-resampling pass.
pub const MAX_SPATIAL_SAMPLES: usize = 20;

/// Distance at which visibility rays towards distant lights (environment map,
/// directional lights) are terminated.
pub const DISTANT_LIGHT_DISTANCE: f32 = 1.0e5;
