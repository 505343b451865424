//! Interactive vector map instance.
//!
//! [`VectorMap`] owns the viewport, color scale, region and marker entities,
//! and the event bus for one map, and drives a [`render::RenderBackend`].
//! Every operation is synchronous and takes `&mut self`.

pub mod error;
pub mod interaction;
pub mod map;
pub mod options;

pub use error::*;
pub use interaction::*;
pub use map::*;
pub use options::*;
