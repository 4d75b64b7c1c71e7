//! SVG rasterizing through resvg.

use crate::{FontCatalog, Result};

/// The longest side of any rasterized image, in pixels.
pub const MAX_RASTER_SIDE: f64 = 16_384.0;
/// The largest area of any rasterized image, in pixels.
pub const MAX_RASTER_PIXELS: f64 = 32_000_000.0;

/// Fails unless a `width`×`height` pixel buffer fits the raster limits.
pub fn check_raster_size(width: f64, height: f64) -> Result<()> {
    let fits = width.is_finite()
        && height.is_finite()
        && width <= MAX_RASTER_SIDE
        && height <= MAX_RASTER_SIDE
        && width * height <= MAX_RASTER_PIXELS;
    if !fits {
        return Err(format!("image of {width:.0}x{height:.0} pixels is too large").into());
    }
    Ok(())
}

/// Rasterizes an SVG document into PNG bytes.
///
/// `scale` multiplies the SVG's intrinsic size, so a scene authored at
/// 1000×600 user units with `scale = 1.5` yields a 1500×900 image.
pub fn svg_to_png(svg: &str, fonts: &FontCatalog, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("invalid raster scale: {scale}").into());
    }

    let opt = resvg::usvg::Options {
        font_family: fonts.family().to_owned(),
        fontdb: fonts.svg_fontdb(),
        ..resvg::usvg::Options::default()
    };

    let rtree = resvg::usvg::Tree::from_str(svg, &opt)
        .map_err(|e| format!("SVG parsing error: {e:?}"))?;

    let size = rtree.size().to_int_size();
    let width = (f64::from(size.width()) * f64::from(scale)).ceil();
    let height = (f64::from(size.height()) * f64::from(scale)).ceil();
    check_raster_size(width, height)?;
    let (width, height) = (width as u32, height as u32);

    let Some(mut pixmap) = resvg::tiny_skia::Pixmap::new(width, height) else {
        return Err(format!("unable to create a {width}x{height} pixel buffer").into());
    };

    resvg::render(
        &rtree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| format!("PNG encoding error: {e:?}").into())
}
