/// Trace colours, assigned by position and repeating after the last one.
pub const TRACE_COLORS: [TraceColor; 7] = [
    TraceColor { name: "red", hex: "#FF0000" },
    TraceColor { name: "blue", hex: "#0000FF" },
    TraceColor { name: "green", hex: "#008000" },
    TraceColor { name: "purple", hex: "#800080" },
    TraceColor { name: "orange", hex: "#FFA500" },
    TraceColor { name: "cyan", hex: "#00FFFF" },
    TraceColor { name: "magenta", hex: "#FF00FF" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceColor {
    pub name: &'static str,
    pub hex: &'static str,
}

pub fn trace_color(index: usize) -> TraceColor {
    TRACE_COLORS[index % TRACE_COLORS.len()]
}

/// Parses `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8, u8)> {
    let value = hex.trim_start_matches('#');
    if value.len() != 6 && value.len() != 8 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        value
            .get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;
    let a = if value.len() == 8 { channel(6..8)? } else { 255 };
    Some((r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_after_seven() {
        assert_eq!(trace_color(0).name, "red");
        assert_eq!(trace_color(6).name, "magenta");
        assert_eq!(trace_color(7).name, "red");
        assert_eq!(trace_color(15).name, "blue");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#FFA500"), Some((255, 165, 0, 255)));
        assert_eq!(parse_hex_color("00000080"), Some((0, 0, 0, 128)));
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }
}
