use foundation::handles::Handle;

use crate::components::StateStyles;
use crate::entity::{EntityState, Interactive};

/// A drawn region path keyed by its dataset code.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntity {
    pub code: String,
    pub name: String,
    state: EntityState,
}

impl RegionEntity {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        handle: Handle,
        styles: StateStyles,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            state: EntityState::new(handle, styles),
        }
    }
}

impl Interactive for RegionEntity {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}
