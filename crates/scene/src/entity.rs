use foundation::handles::Handle;
use serde::{Deserialize, Serialize};

use crate::components::{StateStyles, Style, StyleValue};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Region,
    Marker,
}

/// Interaction target, resolved when the host creates the hit target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    /// Region code, e.g. `"US"`.
    Region(String),
    /// Index into the marker list.
    Marker(usize),
}

impl EntityRef {
    pub fn region(code: impl Into<String>) -> Self {
        EntityRef::Region(code.into())
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Region(_) => EntityKind::Region,
            EntityRef::Marker(_) => EntityKind::Marker,
        }
    }
}

/// Hover/selection bookkeeping shared by every map entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub handle: Handle,
    pub styles: StateStyles,
    pub hovered: bool,
    pub selected: bool,
}

impl EntityState {
    pub fn new(handle: Handle, styles: StateStyles) -> Self {
        Self {
            handle,
            styles,
            hovered: false,
            selected: false,
        }
    }
}

/// Capability set the map core relies on; it never looks at concrete shapes.
///
/// Mutators report whether anything changed so callers only re-sync the
/// backend when needed.
pub trait Interactive {
    fn state(&self) -> &EntityState;
    fn state_mut(&mut self) -> &mut EntityState;

    fn handle(&self) -> Handle {
        self.state().handle
    }

    fn is_hovered(&self) -> bool {
        self.state().hovered
    }

    fn is_selected(&self) -> bool {
        self.state().selected
    }

    fn set_hovered(&mut self, hovered: bool) -> bool {
        let s = self.state_mut();
        let changed = s.hovered != hovered;
        s.hovered = hovered;
        changed
    }

    fn set_selected(&mut self, selected: bool) -> bool {
        let s = self.state_mut();
        let changed = s.selected != selected;
        s.selected = selected;
        changed
    }

    /// Sets a base (initial-state) property, e.g. a fill override.
    fn set_style(&mut self, property: &str, value: StyleValue) {
        self.state_mut().styles.initial.set(property, value);
    }

    fn computed_style(&self) -> Style {
        let s = self.state();
        s.styles.computed(s.hovered, s.selected)
    }
}
