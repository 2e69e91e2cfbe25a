mod gpx;

use std::fs;
use std::io;
use std::path::Path;

use crate::error::ParseError;
use crate::types::track::Extraction;

pub use gpx::{extract, GPX_NAMESPACE};

/// Reads and extracts a GPX file. Only a missing/unreadable file or a
/// document that is not well-formed XML fails; bad points are skipped.
pub fn parse_file(path: &Path) -> Result<Extraction, ParseError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ParseError::FileNotFound(path.to_path_buf()),
        _ => ParseError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    extract(&bytes)
}
