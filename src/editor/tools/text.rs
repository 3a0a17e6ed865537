use std::cell::RefCell;
use std::fmt;

use tracing::debug;

use super::settings::{SettingSpec, ToolSettings, COLOR};
use super::{CursorHint, TextPrompt, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{ImagePoint, DEFAULT_COLOR};
use crate::raster::{FontFamily, FontSpec, RasterSurface};

const FONT: &str = "font";
const FONT_SIZE: &str = "font_size";
const FONT_CHOICES: &[&str] = &["sans", "serif", "mono"];
const DEFAULT_FONT_SIZE: i64 = 16;

/// Places a line of text at the clicked point after asking the host for it.
pub struct TextTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
    prompt: RefCell<Box<dyn TextPrompt>>,
}

impl fmt::Debug for TextTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl TextTool {
    pub fn new(prompt: Box<dyn TextPrompt>) -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "text",
                "Text",
                ToolCapabilities::text_input(),
                CursorHint::Text,
            ),
            schema: vec![
                SettingSpec::dropdown(FONT, "Font", FONT_CHOICES, "sans"),
                SettingSpec::slider(FONT_SIZE, "Font size", 6, 144, DEFAULT_FONT_SIZE),
                SettingSpec::color(COLOR, "Color", DEFAULT_COLOR),
            ],
            prompt: RefCell::new(prompt),
        }
    }

    fn font(settings: &ToolSettings) -> FontSpec {
        let family = FontFamily::parse(settings.text_or(FONT, "sans")).unwrap_or(FontFamily::Sans);
        let size = settings.int_or(FONT_SIZE, DEFAULT_FONT_SIZE).clamp(1, i64::from(u32::MAX));
        FontSpec::new(family, size as u32)
    }
}

impl Tool for TextTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn settings_schema(&self) -> &[SettingSpec] {
        &self.schema
    }

    fn on_click(&self, image: &mut dyn RasterSurface, at: ImagePoint, settings: &ToolSettings) {
        let answer = self.prompt.borrow_mut().request_text(at);
        let Some(text) = answer.filter(|text| !text.trim().is_empty()) else {
            debug!(x = at.x, y = at.y, "text prompt dismissed");
            return;
        };
        image.text(
            at,
            &text,
            settings.color_or(COLOR, DEFAULT_COLOR),
            &Self::font(settings),
        );
    }
}
