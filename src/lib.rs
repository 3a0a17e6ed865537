pub mod canvas;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod overlay;
pub mod raster;
pub mod state;

use std::path::Path;
use std::rc::Rc;

pub use canvas::CanvasController;
pub use config::EngineConfig;
pub use editor::manager::{DrawingToolsManager, GlobalSettings};
pub use editor::tools::{TextPrompt, Tool, ToolRegistry};
pub use error::{PaintError, PaintResult};
pub use overlay::OverlayCanvas;
pub use raster::{RasterSurface, RgbaRaster};

/// Builds the interaction engine for a host canvas.
///
/// Installs logging, reads the user config, registers the stock tools, and
/// wires manager and controller to the shared registry. An unreadable or
/// malformed config file is logged and returned; a missing one yields defaults.
pub fn start<C: OverlayCanvas>(
    canvas: C,
    prompt: Box<dyn TextPrompt>,
) -> PaintResult<CanvasController<C>> {
    let (xdg_config_home, home) = config::config_env_dirs();
    start_with(canvas, prompt, xdg_config_home.as_deref(), home.as_deref())
}

pub fn start_with<C: OverlayCanvas>(
    canvas: C,
    prompt: Box<dyn TextPrompt>,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> PaintResult<CanvasController<C>> {
    let loaded = config::try_load_engine_config_with(xdg_config_home, home);
    logging::init(loaded.as_ref().is_ok_and(|config| config.debug_logging));
    let config = loaded.map_err(|err| {
        tracing::warn!(%err, "engine config rejected");
        err
    })?;
    tracing::info!("starting paintcore");
    Ok(build_controller(canvas, prompt, &config))
}

pub fn build_controller<C: OverlayCanvas>(
    canvas: C,
    prompt: Box<dyn TextPrompt>,
    config: &EngineConfig,
) -> CanvasController<C> {
    let registry = Rc::new(ToolRegistry::with_default_tools(prompt));
    let manager = DrawingToolsManager::from_config(Rc::clone(&registry), config);
    tracing::info!(
        tools = registry.len(),
        tool = manager.current_tool().unwrap_or("none"),
        "engine ready"
    );
    CanvasController::new(canvas, manager, config.canvas_inset)
}

/// Blank `width` x `height` raster carrying the fonts named in `config`.
pub fn open_raster(config: &EngineConfig, width: u32, height: u32) -> PaintResult<RgbaRaster> {
    let fonts = config.fonts.load_book()?;
    Ok(RgbaRaster::new(width, height).with_fonts(fonts))
}
