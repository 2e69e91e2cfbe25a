pub mod palette;
pub mod scene;
pub mod track;
