//! Fixed-point scanline rasterizer
//!
//! Takes screen-space triangles and particles and writes depth-tested,
//! optionally blended ARGB pixels into a caller-owned `RenderTarget`.
//!
//! Features:
//! - Incremental fixed-point interpolation of depth, texture and color
//! - Perspective-correct texturing (u*z and v*z divided per pixel)
//! - Nine render modes selected once per primitive from material flags
//! - Integer source-over compositing for primitive and texel alpha
//! - Alpha-mask particle splats with screen clipping

pub mod blend;
pub mod depth;
pub mod edge;
pub mod fixed;
pub mod mode;
mod particle;
mod polygon;
pub mod span;
mod target;
mod types;

pub use mode::RenderMode;
pub use particle::{rasterize_particle, SplatBounds};
pub use polygon::rasterize_polygon;
pub use target::RenderTarget;
pub use types::*;

/// Default target dimensions (PS1 resolution)
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
