//! Fixedraster viewer
//!
//! Renders a RON scene through the software rasterizer every frame and
//! shows the result scaled up with nearest filtering.
//!
//! Usage: `fixedraster-view [scene.ron]` (built-in demo when omitted)
//!
//! Keys: P saves a PNG screenshot, R reloads the scene file, Escape quits.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fixedraster::rasterizer::{RenderTarget, HEIGHT, WIDTH};
use fixedraster::scene::{load_scene, load_scene_from_str, Scene, SceneError};
use fixedraster::VERSION;
use log::{LevelFilter, Metadata, Record};
use macroquad::prelude::*;

const DEMO_SCENE: &str = include_str!("../assets/scenes/demo.ron");

/// Prints library log records to stdout
struct StdoutLogger;

impl log::Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StdoutLogger = StdoutLogger;

/// Level comes from FIXEDRASTER_LOG (error..trace), info otherwise
fn init_logging() {
    let level = std::env::var("FIXEDRASTER_LOG")
        .ok()
        .and_then(|s| LevelFilter::from_str(&s).ok())
        .unwrap_or(LevelFilter::Info);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Load the scene at `path`, or the built-in demo
fn load(path: Option<&Path>) -> Result<Scene, SceneError> {
    match path {
        Some(path) => {
            let file = load_scene(path)?;
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            Scene::build(file, base_dir)
        }
        None => Scene::build(load_scene_from_str(DEMO_SCENE)?, Path::new(".")),
    }
}

/// Next free `screenshot_NNN.png` in the working directory
fn screenshot_path() -> PathBuf {
    (0..1000)
        .map(|i| PathBuf::from(format!("screenshot_{:03}.png", i)))
        .find(|p| !p.exists())
        .unwrap_or_else(|| PathBuf::from("screenshot.png"))
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Fixedraster v{}", VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging();
    println!("=== Fixedraster v{} ===", VERSION);

    let scene_path = std::env::args().nth(1).map(PathBuf::from);
    let mut scene = match load(scene_path.as_deref()) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Failed to load scene: {}", e);
            return;
        }
    };
    match &scene_path {
        Some(path) => println!("Loaded scene {}", path.display()),
        None => println!("Loaded built-in demo scene"),
    }

    let mut target = RenderTarget::new(scene.config.width, scene.config.height);
    let scale = scene.config.scale.max(1) as f32;
    request_new_screen_size(target.width as f32 * scale, target.height as f32 * scale);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if is_key_pressed(KeyCode::R) {
            match load(scene_path.as_deref()) {
                Ok(reloaded) => {
                    scene = reloaded;
                    target.resize(scene.config.width, scene.config.height);
                    println!("Reloaded scene");
                }
                Err(e) => eprintln!("Reload failed, keeping previous scene: {}", e),
            }
        }

        let stats = scene.render(&mut target);

        if is_key_pressed(KeyCode::P) {
            let path = screenshot_path();
            match target.save_image(&path) {
                Ok(()) => println!("Saved screenshot to {}", path.display()),
                Err(e) => eprintln!("Screenshot failed: {}", e),
            }
        }

        clear_background(Color::from_rgba(30, 30, 35, 255));

        // Integer scale that fits the window, centered
        let fit = (screen_width() / target.width as f32)
            .min(screen_height() / target.height as f32)
            .floor()
            .max(1.0);
        let draw_w = target.width as f32 * fit;
        let draw_h = target.height as f32 * fit;
        let draw_x = ((screen_width() - draw_w) / 2.0).floor();
        let draw_y = ((screen_height() - draw_h) / 2.0).floor();

        let texture = Texture2D::from_rgba8(target.width as u16, target.height as u16, &target.to_rgba_bytes());
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_w, draw_h)),
                ..Default::default()
            },
        );

        draw_text(
            &format!("drawn {} | rejected {} | {} fps", stats.drawn, stats.rejected, get_fps()),
            8.0,
            screen_height() - 8.0,
            16.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        next_frame().await;
    }
}
