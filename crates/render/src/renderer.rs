use foundation::handles::{Handle, HandleAllocator};
use foundation::math::Vec2;
use scene::components::Style;
use serde::Serialize;
use viewport::TransformParams;

/// Geometry attributes of a marker circle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CircleAttrs {
    pub center: Vec2,
}

/// External 2D vector drawing surface.
///
/// The map core never draws; it computes parameters and delegates here.
pub trait RenderBackend {
    fn add_path(&mut self, geometry: &str, style: &Style) -> Handle;
    fn add_circle(&mut self, attrs: CircleAttrs, style: &Style, group: Option<Handle>) -> Handle;
    fn add_group(&mut self) -> Handle;
    fn set_style(&mut self, handle: Handle, props: &Style);
    fn set_size(&mut self, width: f64, height: f64);
    fn apply_transform_params(&mut self, params: TransformParams);
    fn set_background_color(&mut self, color: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RenderCommand {
    AddPath {
        handle: Handle,
        geometry: String,
        style: Style,
    },
    AddCircle {
        handle: Handle,
        attrs: CircleAttrs,
        style: Style,
        group: Option<Handle>,
    },
    AddGroup {
        handle: Handle,
    },
    SetStyle {
        handle: Handle,
        style: Style,
    },
    SetSize {
        width: f64,
        height: f64,
    },
    ApplyTransform(TransformParams),
    SetBackground {
        color: String,
    },
}

/// Backend that records every call, for tests and headless rendering.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    handles: HandleAllocator,
    pub commands: Vec<RenderCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Most recent transform pushed to the backend.
    pub fn last_transform(&self) -> Option<TransformParams> {
        self.commands.iter().rev().find_map(|c| match c {
            RenderCommand::ApplyTransform(p) => Some(*p),
            _ => None,
        })
    }

    /// Most recent style set on `handle`, including the creation style.
    pub fn last_style(&self, handle: Handle) -> Option<&Style> {
        self.commands.iter().rev().find_map(|c| match c {
            RenderCommand::SetStyle { handle: h, style } if *h == handle => Some(style),
            RenderCommand::AddPath { handle: h, style, .. } if *h == handle => Some(style),
            RenderCommand::AddCircle { handle: h, style, .. } if *h == handle => Some(style),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn add_path(&mut self, geometry: &str, style: &Style) -> Handle {
        let handle = self.handles.alloc();
        self.commands.push(RenderCommand::AddPath {
            handle,
            geometry: geometry.to_string(),
            style: style.clone(),
        });
        handle
    }

    fn add_circle(&mut self, attrs: CircleAttrs, style: &Style, group: Option<Handle>) -> Handle {
        let handle = self.handles.alloc();
        self.commands.push(RenderCommand::AddCircle {
            handle,
            attrs,
            style: style.clone(),
            group,
        });
        handle
    }

    fn add_group(&mut self) -> Handle {
        let handle = self.handles.alloc();
        self.commands.push(RenderCommand::AddGroup { handle });
        handle
    }

    fn set_style(&mut self, handle: Handle, props: &Style) {
        self.commands.push(RenderCommand::SetStyle {
            handle,
            style: props.clone(),
        });
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.commands.push(RenderCommand::SetSize { width, height });
    }

    fn apply_transform_params(&mut self, params: TransformParams) {
        self.commands.push(RenderCommand::ApplyTransform(params));
    }

    fn set_background_color(&mut self, color: &str) {
        self.commands.push(RenderCommand::SetBackground {
            color: color.to_string(),
        });
    }
}
