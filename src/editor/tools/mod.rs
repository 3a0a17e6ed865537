mod brush;
mod circle;
mod eraser;
mod fill;
mod line;
mod pencil;
mod rectangle;
mod registry;
pub mod settings;
mod spray;
mod stroke;
mod text;

use std::collections::VecDeque;

pub use crate::geometry::{Color, DisplayPoint, ImagePoint, ToolBounds};
pub use brush::BrushTool;
pub use circle::{square_bounds, CircleTool};
pub use eraser::EraserTool;
pub use fill::FillTool;
pub use line::LineTool;
pub use pencil::PencilTool;
pub use rectangle::RectangleTool;
pub use registry::ToolRegistry;
pub use settings::{
    validate_against, SettingKind, SettingSpec, SettingValue, ToolSettings,
};
pub use spray::SprayTool;
pub use stroke::is_pixel_perfect;
pub use text::TextTool;

use crate::overlay::{OverlayCanvas, OverlayHandle};
use crate::raster::RasterSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolFlag {
    Click,
    Drag,
    Release,
    Preview,
    TextInput,
}

/// Interaction capabilities of a tool. Release support is only kept when the
/// tool also previews, since release is how preview tools commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolCapabilities {
    click: bool,
    drag: bool,
    release: bool,
    preview: bool,
    text_input: bool,
}

impl ToolCapabilities {
    pub const fn new(click: bool, drag: bool, release: bool, preview: bool, text_input: bool) -> Self {
        Self {
            click,
            drag,
            release: release && preview,
            preview,
            text_input,
        }
    }

    /// Tools that paint on every press and pointer move.
    pub const fn immediate() -> Self {
        Self::new(true, true, false, false, false)
    }

    pub const fn click_only() -> Self {
        Self::new(true, false, false, false, false)
    }

    /// Tools that preview while dragging and commit on release.
    pub const fn shape() -> Self {
        Self::new(false, false, true, true, false)
    }

    pub const fn text_input() -> Self {
        Self::new(true, false, false, false, true)
    }

    pub const fn supports(self, flag: ToolFlag) -> bool {
        match flag {
            ToolFlag::Click => self.click,
            ToolFlag::Drag => self.drag,
            ToolFlag::Release => self.release,
            ToolFlag::Preview => self.preview,
            ToolFlag::TextInput => self.text_input,
        }
    }

    pub const fn supports_click(self) -> bool {
        self.click
    }

    pub const fn supports_drag(self) -> bool {
        self.drag
    }

    pub const fn supports_release(self) -> bool {
        self.release
    }

    pub const fn supports_preview(self) -> bool {
        self.preview
    }

    pub const fn requires_text_input(self) -> bool {
        self.text_input
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Arrow,
    Crosshair,
    Pencil,
    Circle,
    Bucket,
    Text,
    Spray,
}

impl CursorHint {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Crosshair => "crosshair",
            Self::Pencil => "pencil",
            Self::Circle => "circle",
            Self::Bucket => "bucket",
            Self::Text => "xterm",
            Self::Spray => "spraycan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub display_name: String,
    pub capabilities: ToolCapabilities,
    pub cursor: CursorHint,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        capabilities: ToolCapabilities,
        cursor: CursorHint,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            capabilities,
            cursor,
        }
    }
}

/// Uniform event contract every drawing tool implements.
///
/// Coordinates passed to `on_click`/`on_drag`/`on_release` are in image space;
/// `create_preview` receives display-space corners. Operations a tool does not
/// support keep the no-op defaults.
pub trait Tool {
    fn descriptor(&self) -> &ToolDescriptor;

    fn settings_schema(&self) -> &[SettingSpec];

    fn on_click(&self, _image: &mut dyn RasterSurface, _at: ImagePoint, _settings: &ToolSettings) {}

    fn on_drag(
        &self,
        _image: &mut dyn RasterSurface,
        _from: ImagePoint,
        _to: ImagePoint,
        _settings: &ToolSettings,
    ) {
    }

    fn on_release(
        &self,
        _image: &mut dyn RasterSurface,
        _start: ImagePoint,
        _end: ImagePoint,
        _settings: &ToolSettings,
    ) {
    }

    fn create_preview(
        &self,
        _canvas: &mut dyn OverlayCanvas,
        _start: DisplayPoint,
        _end: DisplayPoint,
        _zoom: f64,
        _settings: &ToolSettings,
    ) -> Option<OverlayHandle> {
        None
    }

    fn validate_settings(&self, settings: &ToolSettings) -> ToolSettings {
        validate_against(self.settings_schema(), settings)
    }
}

/// Modal source of text for the text tool. Blocks until the user answers;
/// `None` means the prompt was dismissed.
pub trait TextPrompt {
    fn request_text(&mut self, at: ImagePoint) -> Option<String>;
}

/// Prompt that answers from a queue of prepared responses, then cancels.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    responses: VecDeque<Option<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.responses.push_back(Some(text.into()));
    }

    pub fn push_cancel(&mut self) {
        self.responses.push_back(None);
    }
}

impl TextPrompt for ScriptedPrompt {
    fn request_text(&mut self, _at: ImagePoint) -> Option<String> {
        self.responses.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_without_preview_is_dropped() {
        let caps = ToolCapabilities::new(true, true, true, false, false);
        assert!(!caps.supports_release());
        assert!(!caps.supports(ToolFlag::Release));
    }

    #[test]
    fn capability_presets_describe_their_groups() {
        let immediate = ToolCapabilities::immediate();
        assert!(immediate.supports_click() && immediate.supports_drag());
        assert!(!immediate.supports_preview());

        let shape = ToolCapabilities::shape();
        assert!(shape.supports_preview() && shape.supports_release());
        assert!(!shape.supports_click());

        let text = ToolCapabilities::text_input();
        assert!(text.requires_text_input() && text.supports_click());
        assert!(!text.supports_drag());
    }

    #[test]
    fn scripted_prompt_answers_in_order_then_cancels() {
        let mut prompt = ScriptedPrompt::new();
        prompt.push_text("hello");
        prompt.push_cancel();
        let at = ImagePoint::new(0, 0);
        assert_eq!(prompt.request_text(at).as_deref(), Some("hello"));
        assert_eq!(prompt.request_text(at), None);
        assert_eq!(prompt.request_text(at), None);
    }
}
