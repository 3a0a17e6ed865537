//! Tool contract and registry, settings merging, and the viewport transform.

pub mod manager;
pub mod tools;
pub mod viewport;

pub use manager::{DrawingToolsManager, GlobalSettings};
pub use tools::{Tool, ToolCapabilities, ToolDescriptor, ToolFlag, ToolRegistry};
pub use viewport::CoordinateFrame;
