//! Pointer interaction for [`VectorMap`].
//!
//! The host forwards container pointer events (`pointer_*`) and, for events
//! that hit a region or marker, the matching `entity_*` call. Pressing on a
//! region therefore produces `pointer_down` followed by `entity_down`.

use foundation::math::Vec2;
use render::RenderBackend;
use runtime::{EventBus, Flow, HandlerId};
use scene::{EntityKind, EntityRef};
use tracing::{debug, warn};
use viewport::TransformParams;

use crate::VectorMap;

/// Distance kept between the pointer and the label's bottom-right corner.
pub const LABEL_OFFSET: f64 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Over(EntityRef),
    Out(EntityRef),
    Click(EntityRef),
    /// Fired before the label is shown; preventing it keeps the label hidden.
    LabelShow { entity: EntityRef, text: String },
    /// Selection toggled by a click; `selection` lists every selected entity
    /// of the same kind afterwards.
    Select {
        entity: EntityRef,
        selected: bool,
        selection: Vec<EntityRef>,
    },
}

/// Hover label; the host measures it and draws it at `position`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    pub text: String,
    pub visible: bool,
    pub width: f64,
    pub height: f64,
    pub position: Vec2,
}

impl Label {
    fn follow(&mut self, pointer: Vec2) {
        let extent = Vec2::new(LABEL_OFFSET + self.width, LABEL_OFFSET + self.height);
        self.position = pointer - extent;
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct InteractionState {
    dragging: bool,
    last_pointer: Option<Vec2>,
    /// Set by any pointer movement, cleared on `entity_down`.
    moved: bool,
    pressed: Option<EntityRef>,
}

impl<B: RenderBackend> VectorMap<B> {
    pub fn subscribe(&mut self, handler: impl FnMut(&MapEvent) -> Flow + 'static) -> HandlerId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn events(&self) -> &EventBus<MapEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<MapEvent> {
        &mut self.events
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Measured label size, reported back by the host after showing it.
    pub fn set_label_size(&mut self, width: f64, height: f64) {
        self.label.width = width;
        self.label.height = height;
        if let Some(pointer) = self.interaction.last_pointer {
            self.label.follow(pointer);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.dragging
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.interaction.dragging = true;
        self.interaction.last_pointer = Some(Vec2::new(x, y));
    }

    /// Tracks the pointer; while dragging, pans by the movement delta.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<TransformParams> {
        let pos = Vec2::new(x, y);
        let prev = self.interaction.last_pointer.replace(pos);
        if prev.is_none_or(|p| p != pos) {
            self.interaction.moved = true;
        }
        if self.label.visible {
            self.label.follow(pos);
        }
        if !self.interaction.dragging {
            return None;
        }
        let delta = pos - prev?;
        Some(self.pan_by(delta.x, delta.y))
    }

    pub fn pointer_up(&mut self) {
        self.interaction.dragging = false;
    }

    pub fn entity_over(&mut self, target: EntityRef) {
        if !self.known(&target) {
            return;
        }
        let over = self.events.emit(MapEvent::Over(target.clone()));
        if !over.default_prevented {
            self.with_entity(&target, |e| e.set_hovered(true));
        }

        let text = self.label_text(&target);
        self.label.text = text.clone();
        let shown = self.events.emit(MapEvent::LabelShow {
            entity: target,
            text,
        });
        if !shown.default_prevented {
            self.label.visible = true;
            if let Some(pointer) = self.interaction.last_pointer {
                self.label.follow(pointer);
            }
        }
    }

    pub fn entity_out(&mut self, target: EntityRef) {
        if !self.known(&target) {
            return;
        }
        self.with_entity(&target, |e| e.set_hovered(false));
        self.label.visible = false;
        self.events.emit(MapEvent::Out(target));
    }

    pub fn entity_down(&mut self, target: EntityRef) {
        if !self.known(&target) {
            return;
        }
        self.interaction.moved = false;
        self.interaction.pressed = Some(target);
    }

    /// Completes a click when the pointer has not moved since `entity_down`
    /// on the same entity, then toggles selection if allowed.
    pub fn entity_up(&mut self, target: EntityRef) {
        let pressed = self.interaction.pressed.take();
        if self.interaction.moved || pressed.as_ref() != Some(&target) {
            debug!(?target, moved = self.interaction.moved, "click dropped");
            return;
        }
        let click = self.events.emit(MapEvent::Click(target.clone()));
        if click.default_prevented || !self.is_selectable(target.kind()) {
            return;
        }
        let Some(selected) = self.with_entity(&target, |e| {
            let next = !e.is_selected();
            e.set_selected(next);
            next
        }) else {
            return;
        };
        let selection = match target.kind() {
            EntityKind::Region => self
                .selected_regions()
                .into_iter()
                .map(EntityRef::Region)
                .collect(),
            EntityKind::Marker => self
                .selected_markers()
                .into_iter()
                .map(EntityRef::Marker)
                .collect(),
        };
        self.events.emit(MapEvent::Select {
            entity: target,
            selected,
            selection,
        });
    }

    fn label_text(&self, target: &EntityRef) -> String {
        match target {
            EntityRef::Region(code) => self.region_name(code).unwrap_or_default().to_string(),
            EntityRef::Marker(index) => self
                .markers
                .get(*index)
                .map(|m| m.label_text().to_string())
                .unwrap_or_default(),
        }
    }

    fn known(&self, target: &EntityRef) -> bool {
        let known = self.contains_entity(target);
        if !known {
            warn!(?target, "pointer event for unknown entity ignored");
        }
        known
    }
}
