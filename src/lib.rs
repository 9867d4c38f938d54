//! Fixedraster: fixed-point software rasterizer
//!
//! PS1-era style triangle and particle rendering in pure integer math:
//! - Edge walking with 20 fractional bits, colors with 16
//! - Perspective-correct texturing, Gouraud shading, alpha compositing
//! - Reversed depth buffer (larger is nearer, 0 is cleared)
//! - Alpha-mask particle splats
//!
//! The `scene` module loads RON scene files and submits them in a fixed
//! pass order; the `fixedraster-view` binary shows them in a window.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rasterizer;
pub mod scene;
