use std::fmt;
use std::path::Path;

/// One `trkpt` as extracted from a GPX document.
///
/// Elevation and time stay `None` when the source omits them; they are
/// never defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    /// Raw ISO-8601 text of the `<time>` element.
    pub time: Option<String>,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            time: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(name: impl Into<String>, points: Vec<TrackPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Names the track after the file name component of `path`.
    pub fn from_path(path: &Path, points: Vec<TrackPoint>) -> Self {
        Self::new(display_name(path), points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the track keeping only points that carry an elevation.
    pub fn with_elevation_only(&self) -> Track {
        Track {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.elevation.is_some())
                .cloned()
                .collect(),
        }
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A point expressed relative to its track's first point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTrack {
    pub name: String,
    pub points: Vec<AlignedPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingAttribute(&'static str),
    InvalidAttribute { attribute: &'static str, value: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAttribute(attribute) => write!(f, "missing '{attribute}' attribute"),
            Self::InvalidAttribute { attribute, value } => {
                write!(f, "non-numeric '{attribute}' attribute {value:?}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    /// Zero-based position among all `trkpt` elements of the document.
    pub index: usize,
    pub reason: SkipReason,
}

/// Result of extracting one GPX document: the valid points in document
/// order plus a record of every `trkpt` that was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub points: Vec<TrackPoint>,
    pub skipped: Vec<SkippedPoint>,
}
