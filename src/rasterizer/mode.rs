//! Render mode selection
//!
//! Material flags are resolved into exactly one `RenderMode` per primitive.
//! Each mode owns a dedicated span filler, so no flag is tested per pixel.

use super::types::Material;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Interpolated vertex color, depth tested and written
    Solid,
    /// Perspective-correct texels, depth tested and written
    Textured,
    /// Texels blended with the primitive alpha, depth tested only
    TexturedBlend,
    /// Texel alpha: 0 skips, 255 writes with depth, else blends
    TexturedPixelAlpha,
    /// Texel alpha multiplied by primitive alpha
    TexturedPixelAlphaBlend,
    /// Texels modulated by interpolated light color
    Lit,
    /// Lit texels blended with the primitive alpha
    LitBlend,
    /// Lit texels with texel alpha, optionally times primitive alpha
    LitPixelAlpha,
    /// Draws only where depth is still cleared, never writes depth
    Behind,
}

impl RenderMode {
    /// Pick the mode for a primitive. `has_texture` is whether a texture is
    /// actually bound; a textured material without one falls back to `Solid`.
    pub fn select(material: &Material, has_texture: bool) -> Self {
        if material.background {
            return RenderMode::Behind;
        }
        if !(material.textured && has_texture) {
            return RenderMode::Solid;
        }
        match (material.lit, material.pixel_alpha, material.blended) {
            (false, false, false) => RenderMode::Textured,
            (false, false, true) => RenderMode::TexturedBlend,
            (false, true, false) => RenderMode::TexturedPixelAlpha,
            (false, true, true) => RenderMode::TexturedPixelAlphaBlend,
            (true, false, false) => RenderMode::Lit,
            (true, false, true) => RenderMode::LitBlend,
            (true, true, _) => RenderMode::LitPixelAlpha,
        }
    }

    pub fn samples_texture(self) -> bool {
        !matches!(self, RenderMode::Solid)
    }

    /// Alpha applied across the whole primitive for this mode
    pub fn primitive_alpha(self, material: &Material) -> u32 {
        match self {
            RenderMode::TexturedBlend
            | RenderMode::TexturedPixelAlphaBlend
            | RenderMode::LitBlend => material.alpha as u32,
            RenderMode::LitPixelAlpha if material.blended => material.alpha as u32,
            _ => 255,
        }
    }
}
