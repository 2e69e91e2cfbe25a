//! GPX track extraction, CSV conversion and 3D trail rendering.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;
