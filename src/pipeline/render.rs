use quick_xml::escape::escape;

use crate::error::RenderError;
use crate::types::palette::trace_color;
use crate::types::scene::{RenderOptions, Scene, Trace, Vertex};

const ISOMETRIC_ANGLE_DEG: f64 = 30.0;
const TITLE_HEIGHT: f64 = 40.0;
const LEGEND_WIDTH: f64 = 220.0;
const LEGEND_ROW_HEIGHT: f64 = 22.0;
const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";
const AXIS_COLOR: &str = "#555555";
const GRID_COLOR: &str = "#CCCCCC";

#[derive(Clone, Copy, Debug)]
struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc: Option<Bounds>, v| {
            Some(match acc {
                None => Bounds { min: v, max: v },
                Some(b) => Bounds {
                    min: b.min.min(v),
                    max: b.max.max(v),
                },
            })
        })
    }

    /// Maps into [0, 1]; a degenerate range maps everything to the middle.
    fn normalize(&self, v: f64) -> f64 {
        let range = self.max - self.min;
        if range <= f64::EPSILON {
            0.5
        } else {
            (v - self.min) / range
        }
    }
}

struct SceneBounds {
    x: Bounds,
    y: Bounds,
    z: Bounds,
}

impl SceneBounds {
    fn of(traces: &[Trace]) -> Option<Self> {
        let vertices = || traces.iter().flat_map(|t| t.vertices.iter());
        Some(Self {
            x: Bounds::of(vertices().map(|v| v.x))?,
            y: Bounds::of(vertices().map(|v| v.y))?,
            z: Bounds::of(vertices().map(|v| v.z))?,
        })
    }

    fn normalize(&self, v: &Vertex) -> [f64; 3] {
        [
            self.x.normalize(v.x),
            self.y.normalize(v.y),
            self.z.normalize(v.z),
        ]
    }
}

struct Viewport {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

struct Fit {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    min_x: f64,
    min_y: f64,
}

impl Fit {
    fn apply(&self, p: (f64, f64)) -> (f64, f64) {
        (
            self.offset_x + (p.0 - self.min_x) * self.scale,
            self.offset_y + (p.1 - self.min_y) * self.scale,
        )
    }
}

/// Renders the scene as a standalone SVG document: one coloured
/// line-plus-marker series per trace over a shared isometric box, a legend
/// with the trace names, and labelled axes.
pub fn render_svg(scene: &Scene, options: &RenderOptions) -> Result<String, RenderError> {
    let bounds = SceneBounds::of(&scene.traces).ok_or(RenderError::NothingToRender)?;

    let width = options.width as f64;
    let height = options.height as f64;
    let padding = options.padding as f64;
    let viewport = Viewport {
        left: padding,
        top: padding + TITLE_HEIGHT,
        width: width - 2.0 * padding - LEGEND_WIDTH,
        height: height - 2.0 * padding - TITLE_HEIGHT,
    };
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Err(RenderError::Svg("Invalid viewport size".to_string()));
    }

    let ratio = options.elevation_ratio;
    let projected: Vec<Vec<(f64, f64)>> = scene
        .traces
        .iter()
        .map(|trace| {
            trace
                .vertices
                .iter()
                .map(|v| project_to_isometric(bounds.normalize(v), ratio))
                .collect()
        })
        .collect();

    let corners: Vec<(f64, f64)> = box_corners()
        .iter()
        .map(|c| project_to_isometric(*c, ratio))
        .collect();
    let all_points: Vec<(f64, f64)> = projected
        .iter()
        .flatten()
        .copied()
        .chain(corners.iter().copied())
        .collect();
    let fit = fit_to_viewport(&all_points, &viewport)?;

    let axes = build_axes(scene, &bounds, &fit, ratio);
    let traces: String = projected
        .iter()
        .enumerate()
        .map(|(idx, points)| {
            let screen: Vec<(f64, f64)> = points.iter().map(|p| fit.apply(*p)).collect();
            build_trace(&screen, trace_color(idx).hex, options)
        })
        .collect();
    let legend = build_legend(scene, width - padding - LEGEND_WIDTH, viewport.top, options);
    let background = options
        .background
        .map(|(r, g, b, a)| {
            format!(
                r#"<rect width="100%" height="100%" fill="rgb({r},{g},{b})" fill-opacity="{:.3}"/>"#,
                a as f64 / 255.0
            )
        })
        .unwrap_or_default();

    Ok(format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  {background}
  <text x="{tx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="20" fill="#222222" text-anchor="middle">{title}</text>
  {axes}
  {traces}
  {legend}
</svg>"##,
        w = width,
        h = height,
        tx = width / 2.0,
        ty = padding + 24.0,
        title = escape(scene.title.as_str()),
    ))
}

/// Unit cube corners used for the axis box, ground face first.
fn box_corners() -> [[f64; 3]; 8] {
    [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ]
}

/// Screen-space position of a normalised point. Screen y grows downward,
/// so height is subtracted.
fn project_to_isometric(p: [f64; 3], elevation_ratio: f64) -> (f64, f64) {
    let angle = ISOMETRIC_ANGLE_DEG.to_radians();
    let x = (p[0] - p[1]) * angle.cos();
    let y = -(p[0] + p[1]) * angle.sin() - p[2] * elevation_ratio;
    (x, y)
}

fn fit_to_viewport(points: &[(f64, f64)], viewport: &Viewport) -> Result<Fit, RenderError> {
    if points.is_empty() {
        return Err(RenderError::Svg("No projected points".to_string()));
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in points {
        min_x = min_x.min(point.0);
        max_x = max_x.max(point.0);
        min_y = min_y.min(point.1);
        max_y = max_y.max(point.1);
    }

    let content_width = (max_x - min_x).max(f64::EPSILON);
    let content_height = (max_y - min_y).max(f64::EPSILON);
    let scale = (viewport.width / content_width).min(viewport.height / content_height);
    Ok(Fit {
        scale,
        offset_x: viewport.left + (viewport.width - content_width * scale) * 0.5,
        offset_y: viewport.top + (viewport.height - content_height * scale) * 0.5,
        min_x,
        min_y,
    })
}

fn build_axes(scene: &Scene, bounds: &SceneBounds, fit: &Fit, ratio: f64) -> String {
    let corner = |c: [f64; 3]| fit.apply(project_to_isometric(c, ratio));
    let [x_title, y_title, z_title] = scene.axis_titles();

    let mut svg = String::new();
    let ground = [
        corner([0.0, 0.0, 0.0]),
        corner([1.0, 0.0, 0.0]),
        corner([1.0, 1.0, 0.0]),
        corner([0.0, 1.0, 0.0]),
        corner([0.0, 0.0, 0.0]),
    ];
    svg.push_str(&format!(
        r#"<path d="{}" fill="none" stroke="{GRID_COLOR}" stroke-width="1"/>"#,
        build_polyline_path(&ground)
    ));
    for far in [[1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        let top = [far[0], far[1], 1.0];
        svg.push_str(&line(corner(far), corner(top), GRID_COLOR, 1.0));
    }

    let origin = corner([0.0, 0.0, 0.0]);
    let x_end = corner([1.0, 0.0, 0.0]);
    let y_end = corner([0.0, 1.0, 0.0]);
    let z_end = corner([0.0, 0.0, 1.0]);
    for end in [x_end, y_end, z_end] {
        svg.push_str(&line(origin, end, AXIS_COLOR, 1.5));
    }

    svg.push_str(&label(x_end, (12.0, 18.0), "start", 13, x_title));
    svg.push_str(&label(y_end, (-12.0, 18.0), "end", 13, y_title));
    svg.push_str(&label(z_end, (0.0, -10.0), "middle", 13, z_title));

    svg.push_str(&label(origin, (8.0, 16.0), "start", 11, &format!("{:.5}", bounds.x.min)));
    svg.push_str(&label(x_end, (8.0, 4.0), "start", 11, &format!("{:.5}", bounds.x.max)));
    svg.push_str(&label(origin, (-8.0, 16.0), "end", 11, &format!("{:.5}", bounds.y.min)));
    svg.push_str(&label(y_end, (-8.0, 4.0), "end", 11, &format!("{:.5}", bounds.y.max)));
    svg.push_str(&label(origin, (-8.0, 0.0), "end", 11, &format!("{:.1}", bounds.z.min)));
    svg.push_str(&label(z_end, (-8.0, 4.0), "end", 11, &format!("{:.1}", bounds.z.max)));
    svg
}

fn line(a: (f64, f64), b: (f64, f64), color: &str, width: f64) -> String {
    format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.1}"/>"#,
        a.0, a.1, b.0, b.1, color, width
    )
}

fn label(at: (f64, f64), offset: (f64, f64), anchor: &str, size: u32, text: &str) -> String {
    format!(
        r##"<text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="{size}" fill="#333333" text-anchor="{anchor}">{}</text>"##,
        at.0 + offset.0,
        at.1 + offset.1,
        escape(text)
    )
}

fn build_trace(points: &[(f64, f64)], color: &str, options: &RenderOptions) -> String {
    let mut svg = String::from("<g>");
    if points.len() > 1 {
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            build_polyline_path(points),
            color,
            options.line_width
        ));
    }
    svg.push_str(&format!(r#"<g fill="{color}">"#));
    for (x, y) in points {
        svg.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.1}"/>"#,
            x, y, options.marker_radius
        ));
    }
    svg.push_str("</g></g>");
    svg
}

fn build_legend(scene: &Scene, left: f64, top: f64, options: &RenderOptions) -> String {
    let x = left + 16.0;
    scene
        .traces
        .iter()
        .enumerate()
        .map(|(idx, trace)| {
            let color = trace_color(idx).hex;
            let y = top + idx as f64 * LEGEND_ROW_HEIGHT;
            format!(
                r##"<g>{}<circle cx="{:.2}" cy="{:.2}" r="{:.1}" fill="{color}"/><text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="13" fill="#222222">{}</text></g>"##,
                line((x, y), (x + 24.0, y), color, options.line_width as f64),
                x + 12.0,
                y,
                options.marker_radius,
                x + 32.0,
                y + 4.5,
                escape(trace.name.as_str())
            )
        })
        .collect()
}

fn build_polyline_path(points: &[(f64, f64)]) -> String {
    points.iter().enumerate().fold(String::new(), |mut s, (i, (x, y))| {
        if i == 0 {
            s.push_str(&format!("M {:.2} {:.2}", x, y));
        } else {
            s.push_str(&format!(" L {:.2} {:.2}", x, y));
        }
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_below_the_far_corner() {
        let origin = project_to_isometric([0.0, 0.0, 0.0], 0.6);
        let far = project_to_isometric([1.0, 1.0, 0.0], 0.6);
        let top = project_to_isometric([0.0, 0.0, 1.0], 0.6);
        assert!(origin.1 > far.1);
        assert!(origin.1 > top.1);
        assert!((origin.0 - top.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_bounds_map_to_middle() {
        let b = Bounds { min: 3.0, max: 3.0 };
        assert_eq!(b.normalize(3.0), 0.5);
    }

    #[test]
    fn polyline_path_moves_then_lines() {
        assert_eq!(
            build_polyline_path(&[(0.0, 1.0), (2.0, 3.0)]),
            "M 0.00 1.00 L 2.00 3.00"
        );
    }
}
