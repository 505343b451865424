use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(v) => write!(f, "{v}"),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        StyleValue::Number(v)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

/// Flat set of presentation attributes (`fill`, `stroke-width`, `r`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, StyleValue>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: &str, value: impl Into<StyleValue>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: &str, value: impl Into<StyleValue>) {
        self.0.insert(property.to_string(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.0.get(property)
    }

    /// Overlays `other` on top of `self`.
    pub fn merge(&mut self, other: &Style) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Styles per interaction state, layered in the order
/// initial → selected → hover → selected-hover.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateStyles {
    pub initial: Style,
    pub hover: Style,
    pub selected: Style,
    pub selected_hover: Style,
}

impl StateStyles {
    pub fn region_defaults() -> Self {
        Self {
            initial: Style::new()
                .with("fill", "white")
                .with("fill-opacity", 1.0)
                .with("stroke", "none")
                .with("stroke-width", 0.0)
                .with("stroke-opacity", 1.0),
            hover: Style::new().with("fill-opacity", 0.8),
            selected: Style::new().with("fill", "yellow"),
            selected_hover: Style::new(),
        }
    }

    pub fn marker_defaults() -> Self {
        Self {
            initial: Style::new()
                .with("fill", "grey")
                .with("stroke", "#505050")
                .with("fill-opacity", 1.0)
                .with("stroke-width", 1.0)
                .with("stroke-opacity", 1.0)
                .with("r", 5.0),
            hover: Style::new()
                .with("stroke", "black")
                .with("stroke-width", 2.0),
            selected: Style::new().with("fill", "blue"),
            selected_hover: Style::new(),
        }
    }

    /// Overlays each state of `overrides` onto the matching state of `self`.
    pub fn merged(&self, overrides: &StateStyles) -> StateStyles {
        let mut out = self.clone();
        out.initial.merge(&overrides.initial);
        out.hover.merge(&overrides.hover);
        out.selected.merge(&overrides.selected);
        out.selected_hover.merge(&overrides.selected_hover);
        out
    }

    pub fn computed(&self, hovered: bool, selected: bool) -> Style {
        let mut style = self.initial.clone();
        if selected {
            style.merge(&self.selected);
        }
        if hovered {
            style.merge(&self.hover);
        }
        if hovered && selected {
            style.merge(&self.selected_hover);
        }
        style
    }
}
