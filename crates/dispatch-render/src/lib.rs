//! # dispatch-render
//!
//! Rendering for the emergency-dispatch report: math formulas typeset with
//! Typst, SVG scenes rasterized with resvg, placeholder images for whatever
//! fails, and the font discovery all of them share.

mod error;
pub mod fonts;
pub mod formula;
pub mod placeholder;
pub mod raster;
pub mod tex;
mod world;

pub use error::*;
pub use fonts::FontCatalog;
pub use formula::{
    FormulaImage, FormulaRenderer, FormulaSyntax, RenderRequest, RenderStatus, render_formula,
};
pub use raster::svg_to_png;

/// The result type for dispatch-render.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;
