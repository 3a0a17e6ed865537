use std::collections::BTreeMap;

use crate::geometry::Color;

/// Keys the manager merges into every tool's settings at dispatch time.
pub const SIZE: &str = "size";
pub const COLOR: &str = "color";
pub const ZOOM: &str = "zoom";
pub const GRID: &str = "grid";

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Color(Color),
}

impl SettingValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) if value.is_finite() => Some(value.round() as i64),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value).filter(|value| value.is_finite()),
            Self::Int(value) => Some(*value as f64),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|value| value.is_finite()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(value) => Some(*value != 0),
            Self::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Strings are parsed as colors; malformed strings yield `None`.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Text(text) => Color::parse(text),
            _ => None,
        }
    }

    /// Converts a config value. Arrays, objects and nulls have no setting equivalent.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(flag) => Some(Self::Bool(*flag)),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float)),
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Color> for SettingValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// Widget a generic settings panel renders for a declared setting.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingKind {
    Slider { min: i64, max: i64 },
    FloatSlider { min: f64, max: f64 },
    Checkbox,
    Dropdown { choices: &'static [&'static str] },
    Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: SettingKind,
    pub default: SettingValue,
}

impl SettingSpec {
    pub fn slider(name: &'static str, label: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            label,
            kind: SettingKind::Slider { min, max },
            default: SettingValue::Int(default.clamp(min, max)),
        }
    }

    pub fn float_slider(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            label,
            kind: SettingKind::FloatSlider { min, max },
            default: SettingValue::Float(default.clamp(min, max)),
        }
    }

    pub fn checkbox(name: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            name,
            label,
            kind: SettingKind::Checkbox,
            default: SettingValue::Bool(default),
        }
    }

    pub fn dropdown(
        name: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: SettingKind::Dropdown { choices },
            default: SettingValue::Text(default.to_string()),
        }
    }

    pub fn color(name: &'static str, label: &'static str, default: Color) -> Self {
        Self {
            name,
            label,
            kind: SettingKind::Color,
            default: SettingValue::Color(default),
        }
    }

    /// Coerces `value` into this setting's type and range, falling back to the default.
    pub fn sanitize(&self, value: &SettingValue) -> SettingValue {
        let sanitized = match &self.kind {
            SettingKind::Slider { min, max } => value
                .as_int()
                .map(|value| SettingValue::Int(value.clamp(*min, *max))),
            SettingKind::FloatSlider { min, max } => value
                .as_float()
                .map(|value| SettingValue::Float(value.clamp(*min, *max))),
            SettingKind::Checkbox => value.as_bool().map(SettingValue::Bool),
            SettingKind::Dropdown { choices } => value.as_text().and_then(|text| {
                choices
                    .iter()
                    .find(|choice| choice.eq_ignore_ascii_case(text.trim()))
                    .map(|choice| SettingValue::Text((*choice).to_string()))
            }),
            SettingKind::Color => value.as_color().map(SettingValue::Color),
        };
        sanitized.unwrap_or_else(|| self.default.clone())
    }
}

/// Named setting values for one tool invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSettings {
    values: BTreeMap<String, SettingValue>,
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<SettingValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<SettingValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<SettingValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Copies every entry of `other` over this map.
    pub fn merge_from(&mut self, other: &ToolSettings) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.get(name).and_then(SettingValue::as_int).unwrap_or(default)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).and_then(SettingValue::as_float).unwrap_or(default)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(SettingValue::as_bool).unwrap_or(default)
    }

    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).and_then(SettingValue::as_text).unwrap_or(default)
    }

    pub fn color_or(&self, name: &str, default: Color) -> Color {
        self.get(name).and_then(SettingValue::as_color).unwrap_or(default)
    }

    /// Size settings are at least one pixel wide.
    pub fn size_or(&self, default: u32) -> u32 {
        let size = self.int_or(SIZE, i64::from(default)).max(1);
        u32::try_from(size).unwrap_or(u32::MAX)
    }
}

impl<'a> FromIterator<(&'a str, SettingValue)> for ToolSettings {
    fn from_iter<T: IntoIterator<Item = (&'a str, SettingValue)>>(iter: T) -> Self {
        let mut settings = ToolSettings::new();
        for (name, value) in iter {
            settings.set(name, value);
        }
        settings
    }
}

/// Sanitizes every declared setting and supplies defaults for missing ones.
/// Undeclared keys (global zoom/grid, for instance) pass through untouched.
pub fn validate_against(schema: &[SettingSpec], settings: &ToolSettings) -> ToolSettings {
    let mut sanitized = settings.clone();
    for spec in schema {
        let value = settings
            .get(spec.name)
            .map(|value| spec.sanitize(value))
            .unwrap_or_else(|| spec.default.clone());
        sanitized.values.insert(spec.name.to_string(), value);
    }
    sanitized
}

/// Settings map holding only the declared defaults.
pub fn schema_defaults(schema: &[SettingSpec]) -> ToolSettings {
    schema
        .iter()
        .map(|spec| (spec.name, spec.default.clone()))
        .collect()
}
