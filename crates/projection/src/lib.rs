//! Latitude/longitude to canvas pixel pipeline.
//!
//! `forward` takes geographic coordinates into projected units (Miller
//! cylindrical), `inset_for_point` picks the map panel, and `project` maps the
//! result through the panel placement and the live viewport transform.

pub mod miller;
pub mod project;

pub use miller::*;
pub use project::*;
