use std::path::Path;

use crate::types::track::{AlignedTrack, Track};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One labelled line-plus-marker series of the 3D scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub vertices: Vec<Vertex>,
}

impl Trace {
    /// Longitude on x, latitude on y, elevation on z. Points without
    /// elevation have no place on the z axis and are left out.
    pub fn from_track(track: &Track) -> Self {
        Self::from_samples(
            &track.name,
            track
                .points
                .iter()
                .map(|p| (p.longitude, p.latitude, p.elevation)),
        )
    }

    pub fn from_aligned(track: &AlignedTrack) -> Self {
        Self::from_samples(
            &track.name,
            track
                .points
                .iter()
                .map(|p| (p.longitude, p.latitude, p.elevation)),
        )
    }

    fn from_samples(name: &str, samples: impl Iterator<Item = (f64, f64, Option<f64>)>) -> Self {
        Self {
            name: name.to_string(),
            vertices: samples
                .filter_map(|(x, y, z)| z.map(|z| Vertex { x, y, z }))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    pub traces: Vec<Trace>,
    /// Only changes the horizontal axis labels.
    pub aligned: bool,
}

impl Scene {
    pub fn new(title: impl Into<String>, traces: Vec<Trace>, aligned: bool) -> Self {
        Self {
            title: title.into(),
            traces,
            aligned,
        }
    }

    pub fn axis_titles(&self) -> [&'static str; 3] {
        if self.aligned {
            ["Relative X", "Relative Y", "Elevation (m)"]
        } else {
            ["Longitude", "Latitude", "Elevation (m)"]
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub line_width: f32,
    pub marker_radius: f32,
    /// Vertical extent of the elevation axis relative to the ground plane.
    pub elevation_ratio: f64,
    pub background: Option<(u8, u8, u8, u8)>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            padding: 48,
            line_width: 3.0,
            marker_radius: 3.0,
            elevation_ratio: 0.6,
            background: Some((255, 255, 255, 255)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub background: Option<(u8, u8, u8, u8)>,
}

impl From<&RenderOptions> for OutputConfig {
    fn from(options: &RenderOptions) -> Self {
        Self {
            width: options.width,
            height: options.height,
            background: options.background,
        }
    }
}
