use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use super::tools::settings::{schema_defaults, COLOR, GRID, SIZE, ZOOM};
use super::tools::{
    SettingSpec, SettingValue, Tool, ToolCapabilities, ToolDescriptor, ToolRegistry, ToolSettings,
};
use super::viewport::{clamp_zoom_percent, PIXEL_PERFECT_MIN_ZOOM};
use crate::config::EngineConfig;
use crate::geometry::{Color, DisplayPoint, ImagePoint, DEFAULT_COLOR};
use crate::overlay::{OverlayCanvas, OverlayHandle};
use crate::raster::RasterSurface;

const DEFAULT_TOOL: &str = "brush";

/// Settings shared by every tool. `size` stays unset until the user picks one so
/// that each tool's own default size applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalSettings {
    pub color: Color,
    pub size: Option<u32>,
    pub zoom_percent: u16,
    pub grid_visible: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            size: None,
            zoom_percent: 100,
            grid_visible: false,
        }
    }
}

impl GlobalSettings {
    pub fn zoom(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    pub fn is_pixel_perfect(&self) -> bool {
        self.grid_visible && self.zoom() >= PIXEL_PERFECT_MIN_ZOOM
    }

    fn apply_to(&self, settings: &mut ToolSettings) {
        if let Some(size) = self.size {
            settings.set(SIZE, i64::from(size));
        }
        settings.set(COLOR, self.color);
        settings.set(ZOOM, self.zoom());
        settings.set(GRID, self.grid_visible);
    }
}

/// Owns the active tool selection and settings, and routes events to the active tool.
#[derive(Debug)]
pub struct DrawingToolsManager {
    registry: Rc<ToolRegistry>,
    current_tool: Option<String>,
    globals: GlobalSettings,
    stored: HashMap<String, ToolSettings>,
}

impl DrawingToolsManager {
    pub fn new(registry: Rc<ToolRegistry>) -> Self {
        let current_tool = if registry.contains(DEFAULT_TOOL) {
            Some(DEFAULT_TOOL.to_string())
        } else {
            registry.list_names().first().map(|name| (*name).to_string())
        };
        Self {
            registry,
            current_tool,
            globals: GlobalSettings::default(),
            stored: HashMap::new(),
        }
    }

    pub fn from_config(registry: Rc<ToolRegistry>, config: &EngineConfig) -> Self {
        let mut manager = Self::new(registry);
        manager.set_color_str(&config.color);
        if let Some(size) = config.size {
            manager.set_size(size);
        }
        manager.set_zoom_percent(config.zoom_percent);
        manager.set_grid_visible(config.grid_visible);

        for (tool, values) in &config.tool_settings {
            for (key, value) in values {
                let applied = SettingValue::from_json(value)
                    .is_some_and(|value| manager.set_tool_setting(tool, key, value));
                if !applied {
                    warn!(tool = %tool, setting = %key, "ignoring configured tool setting");
                }
            }
        }

        if let Some(name) = config.default_tool.as_deref() {
            if !manager.select(name) {
                warn!(tool = %name, "configured default tool is not registered");
            }
        }
        manager
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn current_tool(&self) -> Option<&str> {
        self.current_tool.as_deref()
    }

    pub fn current_descriptor(&self) -> Option<&ToolDescriptor> {
        self.current_tool
            .as_deref()
            .and_then(|name| self.registry.descriptor(name))
    }

    pub fn current_capabilities(&self) -> Option<ToolCapabilities> {
        self.current_tool
            .as_deref()
            .and_then(|name| self.registry.capabilities(name))
    }

    /// Makes `name` the active tool. Unknown names leave the selection unchanged.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.registry.contains(name) {
            debug!(tool = %name, "select ignored for unknown tool");
            return false;
        }
        debug!(tool = %name, "tool selected");
        self.current_tool = Some(name.to_string());
        true
    }

    pub fn globals(&self) -> &GlobalSettings {
        &self.globals
    }

    pub fn set_color(&mut self, color: Color) {
        self.globals.color = color;
    }

    /// Malformed strings fall back to the default color.
    pub fn set_color_str(&mut self, value: &str) {
        self.globals.color = Color::parse_or_default(value);
    }

    pub fn set_size(&mut self, size: u32) {
        self.globals.size = Some(size.max(1));
    }

    pub fn set_zoom_percent(&mut self, zoom_percent: u16) {
        self.globals.zoom_percent = clamp_zoom_percent(zoom_percent);
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.globals.grid_visible = visible;
    }

    pub fn is_pixel_perfect(&self) -> bool {
        self.globals.is_pixel_perfect()
    }

    /// Remembers a per-tool setting, sanitized against the tool's schema.
    /// Returns `false` for unknown tools or undeclared settings.
    pub fn set_tool_setting(&mut self, tool: &str, key: &str, value: SettingValue) -> bool {
        let Some(spec) = self
            .settings_panel(tool)
            .and_then(|schema| schema.iter().find(|spec| spec.name == key))
        else {
            return false;
        };
        let sanitized = spec.sanitize(&value);
        self.stored
            .entry(tool.to_string())
            .or_default()
            .set(key, sanitized);
        true
    }

    pub fn tool_settings(&self, tool: &str) -> Option<&ToolSettings> {
        self.stored.get(tool)
    }

    pub fn settings_panel(&self, tool: &str) -> Option<&[SettingSpec]> {
        self.registry.get(tool).map(|tool| tool.settings_schema())
    }

    /// Merged and validated settings for `tool`. Precedence from lowest:
    /// schema defaults, stored per-tool values (color excluded), globals, `overrides`.
    pub fn effective_settings(&self, tool: &str, overrides: &ToolSettings) -> Option<ToolSettings> {
        let tool_impl = self.registry.get(tool)?;
        Some(self.merge(tool, tool_impl, overrides))
    }

    fn merge(&self, name: &str, tool: &dyn Tool, overrides: &ToolSettings) -> ToolSettings {
        let mut merged = schema_defaults(tool.settings_schema());
        if let Some(stored) = self.stored.get(name) {
            for (key, value) in stored.iter().filter(|(key, _)| *key != COLOR) {
                merged.set(key, value.clone());
            }
        }
        self.globals.apply_to(&mut merged);
        merged.merge_from(overrides);
        tool.validate_settings(&merged)
    }

    fn active(&self) -> Option<(&str, &dyn Tool, ToolCapabilities)> {
        let name = self.current_tool.as_deref()?;
        let tool = self.registry.get(name)?;
        let capabilities = self.registry.capabilities(name)?;
        Some((name, tool, capabilities))
    }

    pub fn dispatch_click(
        &self,
        image: &mut dyn RasterSurface,
        at: ImagePoint,
        overrides: &ToolSettings,
    ) -> bool {
        let Some((name, tool, capabilities)) = self.active() else {
            return false;
        };
        if !capabilities.supports_click() {
            return false;
        }
        debug!(tool = %name, x = at.x, y = at.y, "dispatch click");
        tool.on_click(image, at, &self.merge(name, tool, overrides));
        true
    }

    pub fn dispatch_drag(
        &self,
        image: &mut dyn RasterSurface,
        from: ImagePoint,
        to: ImagePoint,
        overrides: &ToolSettings,
    ) -> bool {
        let Some((name, tool, capabilities)) = self.active() else {
            return false;
        };
        if !capabilities.supports_drag() {
            return false;
        }
        tracing::trace!(tool = %name, x = to.x, y = to.y, "dispatch drag");
        tool.on_drag(image, from, to, &self.merge(name, tool, overrides));
        true
    }

    pub fn dispatch_release(
        &self,
        image: &mut dyn RasterSurface,
        start: ImagePoint,
        end: ImagePoint,
        overrides: &ToolSettings,
    ) -> bool {
        let Some((name, tool, capabilities)) = self.active() else {
            return false;
        };
        if !capabilities.supports_release() {
            return false;
        }
        debug!(tool = %name, x = end.x, y = end.y, "dispatch release");
        tool.on_release(image, start, end, &self.merge(name, tool, overrides));
        true
    }

    /// `None` means the active tool draws no preview; there is nothing to manage.
    pub fn create_preview(
        &self,
        canvas: &mut dyn OverlayCanvas,
        start: DisplayPoint,
        end: DisplayPoint,
    ) -> Option<OverlayHandle> {
        let (name, tool, capabilities) = self.active()?;
        if !capabilities.supports_preview() {
            return None;
        }
        let settings = self.merge(name, tool, &ToolSettings::new());
        tool.create_preview(canvas, start, end, self.globals.zoom(), &settings)
    }
}
