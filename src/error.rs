use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid GPX: {0}")]
    MalformedDocument(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("Invalid ISO-8601 timestamp: {0:?}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TabularError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Nothing to render: no trace has any points")]
    NothingToRender,
    #[error("SVG generation failed: {0}")]
    Svg(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Rendered scene is not valid SVG: {0}")]
    InvalidSvg(String),
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Invalid epoch (expected RFC 3339): {0}")]
    InvalidEpoch(String),
    #[error("Invalid background colour: {0}")]
    InvalidBackground(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
