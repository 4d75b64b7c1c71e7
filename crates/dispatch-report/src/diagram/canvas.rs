//! A small SVG scene builder.
//!
//! Coordinates follow raster conventions: the origin is the top-left corner
//! and text is positioned by its top-left corner, not by its baseline.

use std::fmt::Write as _;

/// Stroke and fill color.
pub type Color = &'static str;

/// Default outline color.
pub const BLACK: Color = "#000000";

/// Builds an SVG document out of simple shapes.
pub struct SvgCanvas {
    width: u32,
    height: u32,
    family: String,
    body: String,
}

impl SvgCanvas {
    /// Creates a canvas with a white background.
    pub fn new(width: u32, height: u32, family: &str) -> Self {
        let mut canvas = Self {
            width,
            height,
            family: html_escape::encode_double_quoted_attribute(family).into_owned(),
            body: String::new(),
        };
        canvas.filled_rect(0.0, 0.0, width as f64, height as f64, "#ffffff");
        canvas
    }

    /// Width in user units.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in user units.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// An outlined box.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="{BLACK}" stroke-width="2"/>"#
        );
        self
    }

    /// A filled box without outline.
    pub fn filled_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#
        );
        self
    }

    /// A box with a dashed outline, used for grouping.
    pub fn dashed_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let _ = writeln!(
            self.body,
            r##"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="#555555" stroke-width="1.5" stroke-dasharray="8 5"/>"##
        );
        self
    }

    /// A straight line.
    pub fn line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), width: f64) -> &mut Self {
        self.stroke_line((x1, y1), (x2, y2), width, BLACK, None)
    }

    /// A colored line, optionally dashed.
    pub fn stroke_line(
        &mut self,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        width: f64,
        color: &str,
        dash: Option<&str>,
    ) -> &mut Self {
        let dash = dash
            .map(|pattern| format!(r#" stroke-dasharray="{pattern}""#))
            .unwrap_or_default();
        let _ = writeln!(
            self.body,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="{width}" stroke-linecap="round"{dash}/>"#
        );
        self
    }

    /// A line ending in a filled triangular head at `(x2, y2)`.
    pub fn arrow(&mut self, from: (f64, f64), to: (f64, f64), head: f64) -> &mut Self {
        self.line(from, to, 3.0);
        let head = arrow_head(from, to, head);
        self.polygon(&head, BLACK)
    }

    /// A filled polygon.
    pub fn polygon(&mut self, points: &[(f64, f64)], fill: &str) -> &mut Self {
        let points = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(self.body, r#"<polygon points="{points}" fill="{fill}"/>"#);
        self
    }

    /// An outlined polygon.
    pub fn outlined_polygon(&mut self, points: &[(f64, f64)]) -> &mut Self {
        let points = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.body,
            r#"<polygon points="{points}" fill="none" stroke="{BLACK}" stroke-width="2"/>"#
        );
        self
    }

    /// A filled circle with a thin outline.
    pub fn circle(&mut self, (cx, cy): (f64, f64), r: f64, fill: &str) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" stroke="{BLACK}" stroke-width="1"/>"#
        );
        self
    }

    /// Single-line text with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: f64, y: f64, size: f64, content: &str) -> &mut Self {
        self.colored_text(x, y, size, content, BLACK)
    }

    /// Single-line colored text with its top-left corner at `(x, y)`.
    pub fn colored_text(
        &mut self,
        x: f64,
        y: f64,
        size: f64,
        content: &str,
        color: &str,
    ) -> &mut Self {
        let baseline = y + size;
        let content = html_escape::encode_text(content);
        let _ = writeln!(
            self.body,
            r#"<text x="{x}" y="{baseline}" font-family="{}" font-size="{size}" fill="{color}">{content}</text>"#,
            self.family
        );
        self
    }

    /// Multi-line text; lines are separated by `\n` and `spacing` extra units.
    pub fn multiline_text(
        &mut self,
        x: f64,
        y: f64,
        size: f64,
        content: &str,
        spacing: f64,
    ) -> &mut Self {
        for (idx, line) in content.lines().enumerate() {
            let top = y + idx as f64 * (size + spacing);
            self.text(x, top, size, line);
        }
        self
    }

    /// Text horizontally centered on `cx` with its top at `y`.
    pub fn centered_text(&mut self, cx: f64, y: f64, size: f64, content: &str) -> &mut Self {
        let baseline = y + size;
        let content = html_escape::encode_text(content);
        let _ = writeln!(
            self.body,
            r#"<text x="{cx}" y="{baseline}" text-anchor="middle" font-family="{}" font-size="{size}" fill="{BLACK}">{content}</text>"#,
            self.family
        );
        self
    }

    /// An outlined box with multi-line text inside.
    pub fn labeled_box(&mut self, x: f64, y: f64, w: f64, h: f64, label: &str) -> &mut Self {
        self.rect(x, y, w, h);
        self.multiline_text(x + 12.0, y + 16.0, 16.0, label, 4.0)
    }

    /// Serializes the scene.
    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// The triangle of an arrow head pointing at `to`.
pub fn arrow_head(from: (f64, f64), to: (f64, f64), len: f64) -> [(f64, f64); 3] {
    let (x1, y1) = from;
    let (x2, y2) = to;
    let ang = (y2 - y1).atan2(x2 - x1);
    [
        (x2, y2),
        (x2 - len * (ang - 0.28).cos(), y2 - len * (ang - 0.28).sin()),
        (x2 - len * (ang + 0.28).cos(), y2 - len * (ang + 0.28).sin()),
    ]
}

/// Maps `t` in `[0, 1]` onto a white-yellow-red ramp.
pub fn heat_color(t: f64) -> String {
    const STOPS: [(f64, [f64; 3]); 4] = [
        (0.0, [255.0, 255.0, 204.0]),
        (0.35, [254.0, 217.0, 118.0]),
        (0.7, [253.0, 141.0, 60.0]),
        (1.0, [189.0, 0.0, 38.0]),
    ];

    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let upper = STOPS
        .iter()
        .position(|(stop, _)| *stop >= t)
        .unwrap_or(STOPS.len() - 1)
        .max(1);
    let (t0, c0) = STOPS[upper - 1];
    let (t1, c1) = STOPS[upper];
    let k = (t - t0) / (t1 - t0);

    let channel = |i: usize| (c0[i] + (c1[i] - c0[i]) * k).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_head_points_at_target() {
        let [tip, left, right] = arrow_head((0.0, 0.0), (10.0, 0.0), 12.0);
        assert_eq!(tip, (10.0, 0.0));
        assert!(left.0 < 10.0 && right.0 < 10.0);
        assert!((left.1 + right.1).abs() < 1e-9);
    }

    #[test]
    fn test_heat_color_ends() {
        assert_eq!(heat_color(0.0), "#ffffcc");
        assert_eq!(heat_color(1.0), "#bd0026");
        assert_eq!(heat_color(f64::NAN), "#ffffcc");
        assert_eq!(heat_color(7.0), "#bd0026");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = SvgCanvas::new(10, 10, "Sans");
        canvas.text(0.0, 0.0, 10.0, "A & B <C>");
        let svg = canvas.finish();
        assert!(svg.contains("A &amp; B &lt;C&gt;"));
        assert!(svg.starts_with("<svg"));
    }
}
