//! Pointer-event routing between the host canvas widget and the drawing tools.

mod session;

use std::collections::HashSet;

use tracing::{debug, trace};

pub use session::{InteractionSession, PixelHighlight};

use crate::editor::manager::DrawingToolsManager;
use crate::editor::tools::{ToolFlag, ToolSettings};
use crate::editor::viewport::{next_zoom_in_level, next_zoom_out_level, CoordinateFrame};
use crate::geometry::{Color, ImagePoint};
use crate::overlay::{OverlayCanvas, OverlayHandle, OverlayStyle};
use crate::raster::RasterSurface;
use crate::state::{InteractionEvent, InteractionMachine, InteractionState};

const HIGHLIGHT_COLOR: Color = Color::new(255, 140, 0);
const GRID_COLOR: Color = Color::rgba(128, 128, 128, 160);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolGroup {
    Immediate,
    Preview,
    Modal,
}

/// Drives one canvas: converts pointer positions, runs the interaction state
/// machine, and owns every overlay it creates (preview, highlight, grid).
#[derive(Debug)]
pub struct CanvasController<C: OverlayCanvas> {
    canvas: C,
    manager: DrawingToolsManager,
    inset: f64,
    scroll: (f64, f64),
    machine: InteractionMachine,
    session: Option<InteractionSession>,
    highlight: Option<PixelHighlight>,
    grid: Vec<OverlayHandle>,
    preview_tools: HashSet<String>,
    modal_tools: HashSet<String>,
}

impl<C: OverlayCanvas> CanvasController<C> {
    pub fn new(canvas: C, manager: DrawingToolsManager, inset: f64) -> Self {
        let registry = manager.registry();
        let preview_tools = names(registry.capabilities_with(ToolFlag::Preview));
        let modal_tools = names(registry.capabilities_with(ToolFlag::TextInput));
        Self {
            canvas,
            manager,
            inset,
            scroll: (0.0, 0.0),
            machine: InteractionMachine::new(),
            session: None,
            highlight: None,
            grid: Vec::new(),
            preview_tools,
            modal_tools,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn manager(&self) -> &DrawingToolsManager {
        &self.manager
    }

    /// Color, size and per-tool settings. Tool selection, zoom and grid changes
    /// go through the controller so overlays stay consistent.
    pub fn manager_mut(&mut self) -> &mut DrawingToolsManager {
        &mut self.manager
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn highlight(&self) -> Option<ImagePoint> {
        self.highlight.map(|highlight| highlight.at)
    }

    pub fn grid_line_count(&self) -> usize {
        self.grid.len()
    }

    /// Frame for the current zoom and scroll.
    pub fn frame(&self) -> CoordinateFrame {
        CoordinateFrame::new(self.manager.globals().zoom_percent, self.inset)
            .with_scroll(self.scroll.0, self.scroll.1)
    }

    fn current_group(&self) -> Option<ToolGroup> {
        let name = self.manager.current_tool()?;
        Some(if self.preview_tools.contains(name) {
            ToolGroup::Preview
        } else if self.modal_tools.contains(name) {
            ToolGroup::Modal
        } else {
            ToolGroup::Immediate
        })
    }

    /// Zoom and inset stay pinned to the session; scroll always follows the host.
    fn pointer_frame(&self) -> CoordinateFrame {
        match self.session {
            Some(session) => session.frame.with_scroll(self.scroll.0, self.scroll.1),
            None => self.frame(),
        }
    }

    fn fire(&mut self, event: InteractionEvent) -> bool {
        self.machine.transition(event).is_ok()
    }

    /// Button press at widget-relative (`x`, `y`).
    pub fn press(&mut self, image: &mut dyn RasterSurface, x: f64, y: f64) {
        let Some(group) = self.current_group() else {
            return;
        };
        let frame = self.frame();
        let at = frame.pointer_to_image(x, y);
        let none = ToolSettings::new();

        match group {
            ToolGroup::Immediate => {
                if !self.fire(InteractionEvent::PressImmediate) {
                    return;
                }
                self.manager.dispatch_click(image, at, &none);
                self.session = Some(InteractionSession::new(at, frame));
            }
            ToolGroup::Preview => {
                if !self.fire(InteractionEvent::PressPreview) {
                    return;
                }
                self.session = Some(InteractionSession::new(at, frame));
            }
            ToolGroup::Modal => {
                if !self.fire(InteractionEvent::PressModal) {
                    return;
                }
                self.clear_highlight();
                self.manager.dispatch_click(image, at, &none);
            }
        }
    }

    /// Pointer motion, with or without a button held.
    pub fn motion(&mut self, image: &mut dyn RasterSurface, x: f64, y: f64) {
        let at = self.pointer_frame().pointer_to_image(x, y);
        self.update_highlight(image, at);

        let Some(mut session) = self.session else {
            return;
        };
        if session.current == at || !self.fire(InteractionEvent::Move) {
            return;
        }
        trace!(x = at.x, y = at.y, state = ?self.machine.state(), "pointer moved");

        match self.machine.state() {
            InteractionState::Pressed => {
                self.manager
                    .dispatch_drag(image, session.current, at, &ToolSettings::new());
            }
            InteractionState::DraggingPreview => {
                if let Some(handle) = session.preview.take() {
                    self.canvas.delete(handle);
                }
                session.preview = self.manager.create_preview(
                    &mut self.canvas,
                    session.frame.image_to_display(session.start),
                    session.frame.image_to_display(at),
                );
            }
            InteractionState::Idle => {}
        }
        session.current = at;
        self.session = Some(session);
    }

    pub fn release(&mut self, image: &mut dyn RasterSurface, x: f64, y: f64) {
        let state = self.machine.state();
        let end = self.pointer_frame().pointer_to_image(x, y);
        if !self.fire(InteractionEvent::Release) {
            return;
        }
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(handle) = session.preview {
            self.canvas.delete(handle);
        }
        if state == InteractionState::DraggingPreview {
            self.manager
                .dispatch_release(image, session.start, end, &ToolSettings::new());
        }
    }

    /// Switches tools, abandoning any in-progress interaction. Unknown names are ignored.
    pub fn select_tool(&mut self, name: &str) -> bool {
        if !self.manager.select(name) {
            return false;
        }
        self.abandon(InteractionEvent::ToolChange);
        true
    }

    /// Drops the current interaction without committing anything (e.g. pointer capture lost).
    pub fn cancel(&mut self) {
        self.abandon(InteractionEvent::Cancel);
    }

    fn abandon(&mut self, event: InteractionEvent) {
        if let Some(handle) = self.session.take().and_then(|session| session.preview) {
            self.canvas.delete(handle);
        }
        self.clear_highlight();
        self.fire(event);
    }

    pub fn set_zoom_percent(&mut self, image: &dyn RasterSurface, zoom_percent: u16) {
        self.cancel();
        self.manager.set_zoom_percent(zoom_percent);
        debug!(zoom_percent = self.manager.globals().zoom_percent, "zoom changed");
        self.refresh_grid(image);
    }

    pub fn zoom_in(&mut self, image: &dyn RasterSurface) {
        let next = next_zoom_in_level(self.manager.globals().zoom_percent);
        self.set_zoom_percent(image, next);
    }

    pub fn zoom_out(&mut self, image: &dyn RasterSurface) {
        let next = next_zoom_out_level(self.manager.globals().zoom_percent);
        self.set_zoom_percent(image, next);
    }

    pub fn set_grid_visible(&mut self, image: &dyn RasterSurface, visible: bool) {
        self.manager.set_grid_visible(visible);
        self.clear_highlight();
        self.refresh_grid(image);
    }

    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.scroll = (scroll_x, scroll_y);
    }

    /// Rebuilds the pixel grid: one line per pixel boundary while pixel-perfect mode is on.
    pub fn refresh_grid(&mut self, image: &dyn RasterSurface) {
        for handle in self.grid.drain(..) {
            self.canvas.delete(handle);
        }
        if !self.manager.is_pixel_perfect() {
            return;
        }

        let frame = self.frame();
        let width = i32::try_from(image.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(image.height()).unwrap_or(i32::MAX);
        let style = OverlayStyle::solid(GRID_COLOR, 1.0);
        for x in 0..=width {
            let from = frame.image_to_display(ImagePoint::new(x, 0));
            let to = frame.image_to_display(ImagePoint::new(x, height));
            self.grid.push(self.canvas.create_line(from, to, &style));
        }
        for y in 0..=height {
            let from = frame.image_to_display(ImagePoint::new(0, y));
            let to = frame.image_to_display(ImagePoint::new(width, y));
            self.grid.push(self.canvas.create_line(from, to, &style));
        }
        debug!(lines = self.grid.len(), "grid refreshed");
    }

    fn highlight_allowed(&self, image: &dyn RasterSurface, at: ImagePoint) -> bool {
        self.manager.is_pixel_perfect()
            && self.current_group() == Some(ToolGroup::Immediate)
            && image.contains(at)
    }

    fn update_highlight(&mut self, image: &dyn RasterSurface, at: ImagePoint) {
        if !self.highlight_allowed(image, at) {
            self.clear_highlight();
            return;
        }
        if self.highlight.is_some_and(|highlight| highlight.at == at) {
            return;
        }
        self.clear_highlight();
        let (corner, opposite) = self.frame().pixel_display_box(at);
        let handle = self.canvas.create_rectangle(
            corner,
            opposite,
            &OverlayStyle::solid(HIGHLIGHT_COLOR, 1.0),
        );
        self.highlight = Some(PixelHighlight { at, handle });
    }

    fn clear_highlight(&mut self) {
        if let Some(highlight) = self.highlight.take() {
            self.canvas.delete(highlight.handle);
        }
    }
}

fn names(list: Vec<&str>) -> HashSet<String> {
    list.into_iter().map(str::to_string).collect()
}
