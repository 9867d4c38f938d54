//! Render target: the color and depth buffers written by the rasterizer

use super::types::{unpack_argb, OPAQUE};

/// Color buffer plus reciprocal-depth buffer.
///
/// The caller owns the lifetime: allocate once, `resize` on window changes,
/// `clear` once per frame before submitting primitives.
pub struct RenderTarget {
    /// Packed ARGB, row-major
    pub color: Vec<u32>,
    /// Reciprocal depth; larger is nearer, 0 is untouched
    pub depth: Vec<i32>,
    pub width: usize,
    pub height: usize,
}

impl RenderTarget {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            color: vec![OPAQUE; width * height],
            depth: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            log::debug!("resizing render target {}x{} -> {}x{}", self.width, self.height, width, height);
            self.width = width;
            self.height = height;
            self.color = vec![OPAQUE; width * height];
            self.depth = vec![0; width * height];
        }
    }

    /// Fill the color buffer and reset depth to "infinitely far"
    pub fn clear(&mut self, color: u32) {
        self.color.fill(color);
        self.clear_depth();
    }

    pub fn clear_depth(&mut self) {
        self.depth.fill(0);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.color[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> i32 {
        self.depth[y * self.width + x]
    }

    /// Color buffer as RGBA bytes (for texture upload and image export)
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.color.len() * 4);
        for &c in &self.color {
            let (a, r, g, b) = unpack_argb(c);
            bytes.extend_from_slice(&[r as u8, g as u8, b as u8, a as u8]);
        }
        bytes
    }

    /// Write the color buffer to an image file (format from the extension)
    pub fn save_image<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.to_rgba_bytes(),
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )
    }
}
