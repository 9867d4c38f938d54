//! Core types for the rasterizer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alpha byte of a fully opaque ARGB pixel
pub const OPAQUE: u32 = 0xFF00_0000;

/// Side length of every particle alpha mask
pub const MASK_SIZE: usize = 64;
/// log2(MASK_SIZE)
pub const MASK_SHIFT: u32 = 6;

/// Pack channels into a 32-bit A:R:G:B pixel
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Split a 32-bit A:R:G:B pixel into (a, r, g, b)
#[inline]
pub fn unpack_argb(c: u32) -> (u32, u32, u32, u32) {
    (c >> 24, (c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
}

/// Screen-space vertex, produced upstream by projection.
///
/// `z` is reciprocal depth in the depth buffer's fixed-point scale: larger is
/// nearer and 0 is infinitely far. `u`/`v` are texel coordinates; they are
/// interpolated as `u * z` and divided back per pixel, so `|u * z|` and
/// `|v * z|` must stay within `MAX_TEXEL_DEPTH` (larger products saturate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// RGB vertex color, or the light color for lit materials
    pub color: (u8, u8, u8),
    pub u: i32,
    pub v: i32,
}

impl ScreenVertex {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self {
            x,
            y,
            z,
            color: (255, 255, 255),
            u: 0,
            v: 0,
        }
    }

    pub fn with_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = (r, g, b);
        self
    }

    pub fn with_uv(mut self, u: i32, v: i32) -> Self {
        self.u = u;
        self.v = v;
        self
    }
}

/// Material state that selects the render mode of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub textured: bool,
    /// Modulate texels by interpolated vertex (light) color
    pub lit: bool,
    /// Use the texel's top byte as per-pixel alpha
    pub pixel_alpha: bool,
    /// Blend the whole primitive with `alpha`
    pub blended: bool,
    /// Skip back-face rejection
    pub double_sided: bool,
    /// Draw only where nothing has been drawn yet (sky, backdrops)
    pub background: bool,
    /// Whole-primitive alpha, used when `blended` is set
    pub alpha: u8,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            textured: false,
            lit: false,
            pixel_alpha: false,
            blended: false,
            double_sided: false,
            background: false,
            alpha: 255,
        }
    }
}

impl Material {
    pub fn textured() -> Self {
        Self { textured: true, ..Self::default() }
    }
}

/// Error type for texture and mask construction
#[derive(Debug)]
pub enum TextureError {
    NotPowerOfTwo { width: usize, height: usize },
    SizeMismatch { expected: usize, actual: usize },
    ImageError(image::ImageError),
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageError(e)
    }
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::NotPowerOfTwo { width, height } => {
                write!(f, "texture size {}x{} is not a power of two", width, height)
            }
            TextureError::SizeMismatch { expected, actual } => {
                write!(f, "expected {} pixels, got {}", expected, actual)
            }
            TextureError::ImageError(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for TextureError {}

/// Texture with power-of-two dimensions, addressed by bitmask wrap
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    /// Packed ARGB texels, row-major
    pub pixels: Vec<u32>,
    pub name: String,
    width_mask: i32,
    height_mask: i32,
    width_shift: u32,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self, TextureError> {
        if !width.is_power_of_two() || !height.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo { width, height });
        }
        if pixels.len() != width * height {
            return Err(TextureError::SizeMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            name: String::new(),
            width_mask: width as i32 - 1,
            height_mask: height as i32 - 1,
            width_shift: width.trailing_zeros(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load texture from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::from_image(img)?.with_name(name))
    }

    fn from_image(img: image::DynamicImage) -> Result<Self, TextureError> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| pack_argb(p[3], p[0], p[1], p[2]))
            .collect();
        Self::new(width as usize, height as usize, pixels)
    }

    /// Create a checkerboard test texture with 4x4 texel cells
    pub fn checkerboard(width: usize, height: usize, color1: u32, color2: u32) -> Result<Self, TextureError> {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Ok(Self::new(width, height, pixels)?.with_name("checkerboard"))
    }

    /// Sample with wraparound; any integer coordinate is valid
    #[inline]
    pub fn sample(&self, u: i32, v: i32) -> u32 {
        let idx = (((v & self.height_mask) as usize) << self.width_shift) | (u & self.width_mask) as usize;
        self.pixels[idx]
    }
}

/// Shape of a generated particle alpha mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskShape {
    /// Hard-edged disc, 255 inside and 0 outside
    Disc,
    /// Radial falloff from 255 at the center to 0 at the rim
    #[default]
    Soft,
}

/// Square table of 8-bit opacity values shared by particles
#[derive(Debug, Clone)]
pub struct AlphaMask {
    values: Vec<u8>,
}

impl AlphaMask {
    pub fn from_values(values: Vec<u8>) -> Result<Self, TextureError> {
        if values.len() != MASK_SIZE * MASK_SIZE {
            return Err(TextureError::SizeMismatch {
                expected: MASK_SIZE * MASK_SIZE,
                actual: values.len(),
            });
        }
        Ok(Self { values })
    }

    pub fn from_shape(shape: MaskShape) -> Self {
        let half = MASK_SIZE as f32 * 0.5;
        let mut values = Vec::with_capacity(MASK_SIZE * MASK_SIZE);
        for y in 0..MASK_SIZE {
            for x in 0..MASK_SIZE {
                let dx = x as f32 + 0.5 - half;
                let dy = y as f32 + 0.5 - half;
                let d = (dx * dx + dy * dy).sqrt() / half;
                let a = match shape {
                    MaskShape::Disc => {
                        if d <= 1.0 { 255 } else { 0 }
                    }
                    MaskShape::Soft => ((1.0 - d).max(0.0) * 255.0) as u8,
                };
                values.push(a);
            }
        }
        Self { values }
    }

    pub fn disc() -> Self {
        Self::from_shape(MaskShape::Disc)
    }

    pub fn soft() -> Self {
        Self::from_shape(MaskShape::Soft)
    }

    /// Sample at integer mask coordinates, both in `0..MASK_SIZE`
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.values[(y << MASK_SHIFT) | x]
    }
}

/// A triangle ready for rasterization
#[derive(Debug, Clone, Copy)]
pub struct PolygonRaster<'a> {
    pub vertices: [ScreenVertex; 3],
    pub material: Material,
    pub texture: Option<&'a Texture>,
}

impl<'a> PolygonRaster<'a> {
    pub fn new(vertices: [ScreenVertex; 3], material: Material) -> Self {
        Self { vertices, material, texture: None }
    }

    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// A finished particle ready to splat
#[derive(Debug, Clone, Copy)]
pub struct ParticleRaster<'a> {
    pub x: i32,
    pub y: i32,
    /// Reciprocal depth, tested but never written
    pub z: i32,
    pub radius: i32,
    /// Packed ARGB; the alpha byte scales the mask
    pub color: u32,
    pub mask: &'a AlphaMask,
}

/// Why a primitive was dropped before touching any pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reject {
    /// Zero height, zero area or collinear vertices; negative particle radius
    Degenerate,
    /// Negative screen area on a single-sided material
    BackFacing,
    /// Bounds entirely outside the render target
    OffScreen,
    /// Particle whose color alpha is zero
    Transparent,
}

/// Result of submitting one primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOutcome {
    /// Scanlines walked inside the target (pixels may still fail the depth test)
    Drawn { rows: u32 },
    Rejected(Reject),
}

impl RasterOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, RasterOutcome::Drawn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let c = pack_argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c, 0x1234_5678);
        assert_eq!(unpack_argb(c), (0x12, 0x34, 0x56, 0x78));
    }

    #[test]
    fn test_texture_rejects_non_power_of_two() {
        let result = Texture::new(6, 4, vec![0; 24]);
        assert!(matches!(result, Err(TextureError::NotPowerOfTwo { .. })));
        let result = Texture::new(4, 4, vec![0; 15]);
        assert!(matches!(result, Err(TextureError::SizeMismatch { expected: 16, actual: 15 })));
    }

    #[test]
    fn test_texture_wraparound() {
        let pixels: Vec<u32> = (0..32).collect();
        let tex = Texture::new(8, 4, pixels).unwrap();
        assert_eq!(tex.sample(8, 0), tex.sample(0, 0));
        assert_eq!(tex.sample(8 + 3, 4 + 2), tex.sample(3, 2));
        assert_eq!(tex.sample(-1, 0), tex.sample(7, 0));
        assert_eq!(tex.sample(5, 1), 13);
    }

    #[test]
    fn test_texture_names() {
        let tex = Texture::checkerboard(8, 8, 0xFFFF_FFFF, 0xFF00_0000).unwrap();
        assert_eq!(tex.name, "checkerboard");
        assert_eq!(tex.with_name("floor").name, "floor");
    }

    #[test]
    fn test_mask_shapes() {
        let disc = AlphaMask::disc();
        let soft = AlphaMask::soft();
        let c = MASK_SIZE / 2;
        assert_eq!(disc.sample(c, c), 255);
        assert_eq!(disc.sample(0, 0), 0);
        assert!(soft.sample(c, c) > 240);
        assert_eq!(soft.sample(0, 0), 0);
        assert!(soft.sample(c, c) > soft.sample(c + 16, c));
    }

    #[test]
    fn test_mask_from_values_checks_size() {
        assert!(AlphaMask::from_values(vec![0; 10]).is_err());
        assert!(AlphaMask::from_values(vec![7; MASK_SIZE * MASK_SIZE]).is_ok());
    }
}
