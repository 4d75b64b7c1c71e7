//! Placeholder images substituted for failed renders.

use std::io::Cursor;

use log::warn;

use crate::raster::svg_to_png;
use crate::{FontCatalog, Result};

/// Width of a placeholder image in pixels.
pub const PLACEHOLDER_WIDTH: u32 = 900;
/// Height of a placeholder image in pixels.
pub const PLACEHOLDER_HEIGHT: u32 = 140;

/// The message drawn onto formula placeholders.
pub const FORMULA_PLACEHOLDER_TEXT: &str = "公式渲染失败，请查看 CI 日志";

/// Produces a white placeholder image with `message` drawn in black.
///
/// Falls back to a blank white image when the message cannot be
/// rasterized, so the result is always a decodable PNG.
pub fn placeholder_png(message: &str, fonts: &FontCatalog) -> Vec<u8> {
    let svg = placeholder_svg(message, fonts.family());
    match svg_to_png(&svg, fonts, 1.0) {
        Ok(png) => png,
        Err(err) => {
            warn!("placeholder rasterizing failed, writing a blank image: {err}");
            blank_png()
        }
    }
}

fn placeholder_svg(message: &str, family: &str) -> String {
    let family = html_escape::encode_double_quoted_attribute(family);
    let message = html_escape::encode_text(message);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PLACEHOLDER_WIDTH}" height="{PLACEHOLDER_HEIGHT}" viewBox="0 0 {PLACEHOLDER_WIDTH} {PLACEHOLDER_HEIGHT}">
<rect width="{PLACEHOLDER_WIDTH}" height="{PLACEHOLDER_HEIGHT}" fill="white"/>
<text x="20" y="64" font-family="{family}" font-size="14" fill="black">{message}</text>
</svg>"#
    )
}

/// A plain white image of placeholder size.
pub fn blank_png() -> Vec<u8> {
    match encode_blank() {
        Ok(png) => png,
        // A bare PNG signature is still recognized as a PNG by format sniffers.
        Err(err) => {
            warn!("failed to encode blank placeholder: {err}");
            b"\x89PNG\r\n\x1a\n".to_vec()
        }
    }
}

fn encode_blank() -> Result<Vec<u8>> {
    let img = image::RgbImage::from_pixel(
        PLACEHOLDER_WIDTH,
        PLACEHOLDER_HEIGHT,
        image::Rgb([255, 255, 255]),
    );
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .map_err(|e| format!("PNG encoding error: {e}"))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_size() {
        let fonts = FontCatalog::default();
        let png = placeholder_png(FORMULA_PLACEHOLDER_TEXT, &fonts);
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(
            (img.width(), img.height()),
            (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
        );
    }

    #[test]
    fn test_placeholder_escapes_markup() {
        let svg = placeholder_svg("a < b & c", "Noto \"Sans\"");
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(!svg.contains("\"Sans\""));
    }

    #[test]
    fn test_blank_is_decodable() {
        let img = image::load_from_memory(&blank_png()).unwrap();
        assert_eq!(img.width(), PLACEHOLDER_WIDTH);
    }
}
