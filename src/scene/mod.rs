//! Scene files for the viewer
//!
//! A scene is a RON file listing screen-space polygons and particles plus the
//! textures they reference. It exists to drive the rasterizer without a full
//! engine upstream; the rasterizer itself never sees these types.

mod file;
mod render;

pub use file::*;
pub use render::*;
