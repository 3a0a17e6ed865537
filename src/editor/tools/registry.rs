use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::{
    BrushTool, CircleTool, EraserTool, FillTool, LineTool, PencilTool, RectangleTool, SprayTool,
    TextPrompt, TextTool, Tool, ToolCapabilities, ToolDescriptor, ToolFlag,
};

struct RegisteredTool {
    tool: Box<dyn Tool>,
    capabilities: ToolCapabilities,
}

/// Name-indexed table of every drawing tool, built once at startup and shared by reference.
///
/// Capabilities are read once at registration and cached, so routing decisions
/// never re-query the tool.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the stock tool set in toolbar order.
    pub fn with_default_tools(prompt: Box<dyn TextPrompt>) -> Self {
        let mut registry = Self::new();
        registry.register(BrushTool::new());
        registry.register(PencilTool::new());
        registry.register(EraserTool::new());
        registry.register(LineTool::new());
        registry.register(RectangleTool::new());
        registry.register(CircleTool::new());
        registry.register(FillTool::new());
        registry.register(TextTool::new(prompt));
        registry.register(SprayTool::new());
        registry
    }

    /// Adds `tool` under its descriptor name. A tool registered under an existing
    /// name replaces the previous one and keeps its position.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let capabilities = tool.descriptor().capabilities;
        let name = tool.descriptor().name.clone();
        let entry = RegisteredTool {
            tool: Box::new(tool),
            capabilities,
        };

        if let Some(&slot) = self.index.get(&name) {
            warn!(tool = %name, "tool registered twice; replacing previous entry");
            self.entries[slot] = entry;
            return;
        }
        debug!(tool = %name, "tool registered");
        self.index.insert(name, self.entries.len());
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index
            .get(name)
            .map(|&slot| self.entries[slot].tool.as_ref())
    }

    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.get(name).map(|tool| tool.descriptor())
    }

    pub fn capabilities(&self, name: &str) -> Option<ToolCapabilities> {
        self.index
            .get(name)
            .map(|&slot| self.entries[slot].capabilities)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.tool.descriptor().name.as_str())
            .collect()
    }

    pub fn capabilities_with(&self, flag: ToolFlag) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.capabilities.supports(flag))
            .map(|entry| entry.tool.descriptor().name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::{CursorHint, ScriptedPrompt, SettingSpec, ToolSettings};
    use proptest::prelude::*;

    fn registry() -> ToolRegistry {
        ToolRegistry::with_default_tools(Box::new(ScriptedPrompt::new()))
    }

    struct Stub(ToolDescriptor);

    impl Tool for Stub {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.0
        }

        fn settings_schema(&self) -> &[SettingSpec] {
            &[]
        }
    }

    #[test]
    fn default_tools_are_listed_in_registration_order() {
        assert_eq!(
            registry().list_names(),
            vec!["brush", "pencil", "eraser", "line", "rectangle", "circle", "fill", "text", "spray"]
        );
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let registry = registry();
        assert!(registry.get("lasso").is_none());
        assert!(registry.capabilities("lasso").is_none());
        assert!(!registry.contains(""));
    }

    #[test]
    fn capability_groups_partition_the_stock_tools() {
        let registry = registry();
        assert_eq!(
            registry.capabilities_with(ToolFlag::Preview),
            vec!["line", "rectangle", "circle"]
        );
        assert_eq!(registry.capabilities_with(ToolFlag::TextInput), vec!["text"]);
        assert_eq!(
            registry.capabilities_with(ToolFlag::Drag),
            vec!["brush", "pencil", "eraser", "spray"]
        );
    }

    #[test]
    fn every_release_tool_also_previews() {
        let registry = registry();
        for name in registry.list_names() {
            let caps = registry.capabilities(name).expect("listed tool should resolve");
            assert!(!caps.supports_release() || caps.supports_preview(), "{name}");
        }
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = registry();
        registry.register(Stub(ToolDescriptor::new(
            "pencil",
            "Custom pencil",
            ToolCapabilities::click_only(),
            CursorHint::Arrow,
        )));
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.list_names()[1], "pencil");
        assert_eq!(
            registry.descriptor("pencil").map(|d| d.display_name.as_str()),
            Some("Custom pencil")
        );
        assert!(!registry
            .capabilities("pencil")
            .expect("pencil should stay registered")
            .supports_drag());
    }

    #[test]
    fn validate_settings_is_idempotent_for_defaults() {
        let registry = registry();
        for name in registry.list_names() {
            let tool = registry.get(name).expect("listed tool should resolve");
            let once = tool.validate_settings(&ToolSettings::new());
            assert_eq!(tool.validate_settings(&once), once, "{name}");
        }
    }

    proptest! {
        #[test]
        fn arbitrary_capability_flags_keep_release_implies_preview(
            click: bool, drag: bool, release: bool, preview: bool, text: bool,
        ) {
            let mut registry = ToolRegistry::new();
            registry.register(Stub(ToolDescriptor::new(
                "stub",
                "Stub",
                ToolCapabilities::new(click, drag, release, preview, text),
                CursorHint::Arrow,
            )));
            let caps = registry.capabilities("stub").expect("stub should resolve");
            prop_assert!(!caps.supports_release() || caps.supports_preview());
        }
    }
}
