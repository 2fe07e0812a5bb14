//! Per-invocation entry points of Glint's passes.
//!
//! Each module exposes a `main()` that computes a single element of its
//! pass' output (a pixel or a light-tile slot); the engine dispatches them in
//! parallel over the destination buffer.

#![allow(clippy::too_many_arguments)]

pub mod di_resolving;
pub mod di_sampling;
pub mod di_spatial_resampling;
pub mod di_temporal_resampling;
pub mod light_tiling;
pub mod surface_loading;
