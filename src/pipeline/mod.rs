pub mod align;
pub mod export;
pub mod overlay;
pub mod parse;
pub mod rasterize;
pub mod render;
pub mod tabular;
pub mod timestamp;
