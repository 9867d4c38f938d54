//! Built scenes: decoded textures and submission order

use std::path::Path;

use super::file::{ParticleDesc, PolygonDesc, SceneError, SceneFile, TextureSource, ViewerConfig};
use crate::rasterizer::{
    rasterize_particle, rasterize_polygon, AlphaMask, Material, ParticleRaster, PolygonRaster,
    RasterOutcome, RenderTarget, Texture,
};

/// Per-frame submission counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: u32,
    pub rejected: u32,
}

impl FrameStats {
    fn record(&mut self, outcome: RasterOutcome) {
        if outcome.is_drawn() {
            self.drawn += 1;
        } else {
            self.rejected += 1;
        }
    }
}

/// Submission pass a polygon belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Pass {
    Opaque,
    Background,
    Translucent,
}

fn pass_of(material: &Material) -> Pass {
    if material.background {
        Pass::Background
    } else if material.blended || material.pixel_alpha {
        Pass::Translucent
    } else {
        Pass::Opaque
    }
}

/// A scene ready to render every frame
pub struct Scene {
    pub config: ViewerConfig,
    pub textures: Vec<Texture>,
    pub mask: AlphaMask,
    polygons: Vec<PolygonDesc>,
    particles: Vec<ParticleDesc>,
}

impl Scene {
    /// Decode textures and sort polygons into submission passes.
    ///
    /// `base_dir` resolves relative texture paths.
    pub fn build(file: SceneFile, base_dir: &Path) -> Result<Self, SceneError> {
        let mut textures = Vec::with_capacity(file.textures.len());
        for (index, source) in file.textures.iter().enumerate() {
            let texture = match source {
                TextureSource::File(path) => Texture::from_file(base_dir.join(path)),
                TextureSource::Checker { size, a, b } => Texture::checkerboard(*size, *size, *a, *b),
            }
            .map_err(|error| SceneError::TextureError { index, error })?;
            log::debug!("texture {} '{}' {}x{}", index, texture.name, texture.width, texture.height);
            textures.push(texture);
        }

        for (i, poly) in file.polygons.iter().enumerate() {
            if let Some(t) = poly.texture {
                if t >= textures.len() {
                    log::warn!("polygon {} references missing texture {}, drawing untextured", i, t);
                }
            }
        }

        // Stable sort keeps file order within each pass
        let mut polygons = file.polygons;
        polygons.sort_by_key(|p| pass_of(&p.material));

        log::debug!(
            "built scene: {} textures, {} polygons, {} particles",
            textures.len(),
            polygons.len(),
            file.particles.len()
        );

        Ok(Self {
            mask: AlphaMask::from_shape(file.config.mask),
            config: file.config,
            textures,
            polygons,
            particles: file.particles,
        })
    }

    /// Clear `target` and submit everything: opaque polygons, background
    /// polygons, translucent polygons, then particles, each in file order.
    pub fn render(&self, target: &mut RenderTarget) -> FrameStats {
        target.clear(self.config.clear_color);
        let mut stats = FrameStats::default();

        for desc in &self.polygons {
            let mut poly = PolygonRaster::new(desc.vertices, desc.material);
            if let Some(texture) = desc.texture.and_then(|t| self.textures.get(t)) {
                poly = poly.with_texture(texture);
            }
            stats.record(rasterize_polygon(target, &poly));
        }

        for p in &self.particles {
            let particle = ParticleRaster {
                x: p.x,
                y: p.y,
                z: p.z,
                radius: p.radius,
                color: p.color,
                mask: &self.mask,
            };
            stats.record(rasterize_particle(target, &particle));
        }

        stats
    }
}
