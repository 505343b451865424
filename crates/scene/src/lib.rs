pub mod components;
pub mod entity;
pub mod marker;
pub mod region;

pub use components::*;
pub use entity::*;
pub use marker::*;
pub use region::*;
