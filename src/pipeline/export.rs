use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::pipeline::{rasterize, render};
use crate::types::scene::{OutputConfig, OutputFormat, RenderOptions, Scene};

/// Renders `scene` and writes it to `path`, as PNG for a `.png` path and as
/// SVG otherwise.
pub fn export_scene(
    scene: &Scene,
    options: &RenderOptions,
    path: &Path,
) -> Result<OutputFormat, AppError> {
    let format = OutputFormat::from_path(path).unwrap_or_else(|| {
        tracing::warn!(
            "Unrecognised output extension for {}, writing SVG",
            path.display()
        );
        OutputFormat::Svg
    });

    let svg = render::render_svg(scene, options)?;
    let bytes = match format {
        OutputFormat::Svg => svg.into_bytes(),
        OutputFormat::Png => rasterize::rasterize(&svg, &OutputConfig::from(options))?,
    };

    fs::write(path, &bytes).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "Rendered {} trace(s) to {} ({} bytes)",
        scene.traces.len(),
        path.display(),
        bytes.len()
    );
    Ok(format)
}
