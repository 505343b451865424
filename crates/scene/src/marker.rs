use foundation::handles::Handle;

use crate::components::StateStyles;
use crate::entity::{EntityState, Interactive};

/// A point marker positioned from `[lat, lng]` on every re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntity {
    pub index: usize,
    pub lat_lng: [f64; 2],
    pub name: Option<String>,
    state: EntityState,
}

impl MarkerEntity {
    pub fn new(
        index: usize,
        lat_lng: [f64; 2],
        name: Option<String>,
        handle: Handle,
        styles: StateStyles,
    ) -> Self {
        Self {
            index,
            lat_lng,
            name,
            state: EntityState::new(handle, styles),
        }
    }

    pub fn label_text(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Interactive for MarkerEntity {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}
