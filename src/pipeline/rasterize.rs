use std::cell::RefCell;

use usvg::fontdb::Database;

use crate::error::RasterError;
use crate::types::scene::OutputConfig;

/// Fonts tried before the system scan so axis labels render the same on
/// hosts with a sparse font directory.
const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

thread_local! {
    static FONTS: RefCell<Database> = RefCell::new(font_database());
}

/// Rasterises a rendered trail scene into PNG bytes at the configured size.
pub fn rasterize(svg: &str, config: &OutputConfig) -> Result<Vec<u8>, RasterError> {
    FONTS.with(|fonts| draw_png(svg, config, &fonts.borrow()))
}

fn font_database() -> Database {
    let mut fonts = Database::new();
    for path in FONT_CANDIDATES {
        if fonts.load_font_file(path).is_ok() {
            tracing::debug!("Loaded font {}", path);
        }
    }
    fonts.load_system_fonts();
    fonts
}

fn draw_png(svg: &str, config: &OutputConfig, fonts: &Database) -> Result<Vec<u8>, RasterError> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default(), fonts)
        .map_err(|e| RasterError::InvalidSvg(e.to_string()))?;

    let mut canvas =
        tiny_skia::Pixmap::new(config.width, config.height).ok_or(RasterError::Canvas {
            width: config.width,
            height: config.height,
        })?;

    // Under the scene's own background rect; only visible when that is omitted.
    if let Some((r, g, b, a)) = config.background {
        canvas.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let size = tree.size();
    let scale = tiny_skia::Transform::from_scale(
        config.width as f32 / size.width(),
        config.height as f32 / size.height(),
    );
    resvg::render(&tree, scale, &mut canvas.as_mut());

    canvas
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn config(width: u32, height: u32) -> OutputConfig {
        OutputConfig {
            width,
            height,
            background: None,
        }
    }

    #[test]
    fn scales_scene_to_requested_size() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><path d="M0 0 L100 50" stroke="#FF0000"/></svg>"##;
        let png = rasterize(svg, &config(200, 100)).expect("png");
        assert!(png.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn rejects_unparseable_svg() {
        assert!(matches!(
            rasterize("not svg", &config(10, 10)),
            Err(RasterError::InvalidSvg(_))
        ));
    }

    #[test]
    fn rejects_empty_canvas() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
        assert!(matches!(
            rasterize(svg, &config(0, 10)),
            Err(RasterError::Canvas { width: 0, height: 10 })
        ));
    }
}
