//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::rasterizer::{Material, MaskShape, ScreenVertex, TextureError, HEIGHT, WIDTH};

/// Render target and presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: usize,
    pub height: usize,
    /// Window pixels per target pixel
    pub scale: u32,
    /// ARGB color the target is cleared to each frame
    pub clear_color: u32,
    pub mask: MaskShape,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            scale: 3,
            clear_color: 0xFF10_1018,
            mask: MaskShape::Soft,
        }
    }
}

/// Where a scene texture comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextureSource {
    /// Image file, relative to the scene file
    File(String),
    /// Generated checkerboard with 4x4 texel cells
    Checker { size: usize, a: u32, b: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonDesc {
    pub vertices: [ScreenVertex; 3],
    #[serde(default)]
    pub material: Material,
    /// Index into the scene's texture list
    #[serde(default)]
    pub texture: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDesc {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub radius: i32,
    /// Packed ARGB
    pub color: u32,
}

/// On-disk scene description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub config: ViewerConfig,
    pub textures: Vec<TextureSource>,
    pub polygons: Vec<PolygonDesc>,
    pub particles: Vec<ParticleDesc>,
}

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    TextureError { index: usize, error: TextureError },
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            SceneError::TextureError { index, error } => write!(f, "Texture {}: {}", index, error),
        }
    }
}

impl std::error::Error for SceneError {}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneFile, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Load a scene from a RON string (for the built-in demo or testing)
pub fn load_scene_from_str(s: &str) -> Result<SceneFile, SceneError> {
    Ok(ron::from_str(s)?)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &SceneFile, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}
