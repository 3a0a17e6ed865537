use std::collections::BTreeMap;

use super::{OverlayCanvas, OverlayHandle, OverlayStyle};
use crate::geometry::DisplayPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayShape {
    Line,
    Rectangle,
    Oval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    pub shape: OverlayShape,
    pub from: DisplayPoint,
    pub to: DisplayPoint,
    pub style: OverlayStyle,
}

/// In-memory overlay canvas that keeps every live item. Hosts without a native
/// widget (headless sessions, tests) render from `items()`.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    items: BTreeMap<OverlayHandle, OverlayItem>,
    next_id: u64,
    created: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, item: OverlayItem) -> OverlayHandle {
        self.next_id = self.next_id.saturating_add(1);
        let handle = OverlayHandle(self.next_id);
        self.items.insert(handle, item);
        self.created += 1;
        handle
    }

    pub fn items(&self) -> impl Iterator<Item = (&OverlayHandle, &OverlayItem)> {
        self.items.iter()
    }

    pub fn get(&self, handle: OverlayHandle) -> Option<&OverlayItem> {
        self.items.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.items.len()
    }

    pub fn count_shape(&self, shape: OverlayShape) -> usize {
        self.items.values().filter(|item| item.shape == shape).count()
    }

    /// Total items ever created, including deleted ones.
    pub fn created_count(&self) -> usize {
        self.created
    }
}

impl OverlayCanvas for RecordingCanvas {
    fn create_line(
        &mut self,
        from: DisplayPoint,
        to: DisplayPoint,
        style: &OverlayStyle,
    ) -> OverlayHandle {
        self.allocate(OverlayItem {
            shape: OverlayShape::Line,
            from,
            to,
            style: *style,
        })
    }

    fn create_rectangle(
        &mut self,
        corner: DisplayPoint,
        opposite: DisplayPoint,
        style: &OverlayStyle,
    ) -> OverlayHandle {
        self.allocate(OverlayItem {
            shape: OverlayShape::Rectangle,
            from: corner,
            to: opposite,
            style: *style,
        })
    }

    fn create_oval(
        &mut self,
        corner: DisplayPoint,
        opposite: DisplayPoint,
        style: &OverlayStyle,
    ) -> OverlayHandle {
        self.allocate(OverlayItem {
            shape: OverlayShape::Oval,
            from: corner,
            to: opposite,
            style: *style,
        })
    }

    fn delete(&mut self, handle: OverlayHandle) {
        self.items.remove(&handle);
    }
}
