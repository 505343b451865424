pub mod choropleth;
pub mod color_scale;

pub use choropleth::*;
pub use color_scale::*;
