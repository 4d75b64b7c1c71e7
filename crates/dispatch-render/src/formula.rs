//! Formula rendering with a placeholder fallback.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use ecow::EcoString;
use log::{info, warn};
use typst::layout::PagedDocument;

use crate::placeholder::{FORMULA_PLACEHOLDER_TEXT, placeholder_png};
use crate::raster::check_raster_size;
use crate::tex::tex_to_typst;
use crate::world::{FormulaBase, FormulaWorld};
use crate::{FontCatalog, Result};

/// The largest accepted text size, in points.
pub const MAX_FONT_SIZE: f32 = 1_000.0;

/// The markup language of a formula expression.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaSyntax {
    /// The LaTeX math subset understood by [`tex_to_typst`].
    #[default]
    Tex,
    /// Native Typst math, passed through untouched.
    Typst,
}

/// A request to render one formula into one image file.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// The math expression, without surrounding `$`.
    pub expression: EcoString,
    /// Where the image is written.
    pub output: PathBuf,
    /// Text size in points.
    pub font_size: f32,
    /// Output resolution in dots per inch.
    pub dpi: f32,
    /// Markup language of `expression`.
    pub syntax: FormulaSyntax,
    /// The text of the fallback image.
    pub placeholder: EcoString,
}

impl RenderRequest {
    /// Creates a request with the default 18pt size at 200 dpi.
    pub fn new(expression: impl Into<EcoString>, output: impl Into<PathBuf>) -> Self {
        Self {
            expression: expression.into(),
            output: output.into(),
            font_size: 18.0,
            dpi: 200.0,
            syntax: FormulaSyntax::default(),
            placeholder: FORMULA_PLACEHOLDER_TEXT.into(),
        }
    }

    /// Sets the text size in points.
    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the resolution in dots per inch.
    pub fn dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Sets the expression syntax.
    pub fn syntax(mut self, syntax: FormulaSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Sets the text of the fallback image.
    pub fn placeholder(mut self, placeholder: impl Into<EcoString>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// How the image at [`FormulaImage::path`] came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    /// The typeset formula.
    Rendered,
    /// The fallback image, with the reason the formula was not rendered.
    Placeholder {
        /// The error that triggered the fallback.
        reason: EcoString,
    },
}

/// The image produced for a [`RenderRequest`].
#[derive(Debug, Clone)]
pub struct FormulaImage {
    /// The image file.
    pub path: PathBuf,
    /// Whether the formula or the placeholder was written.
    pub status: RenderStatus,
}

impl FormulaImage {
    /// Whether the fallback image was written instead of the formula.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.status, RenderStatus::Placeholder { .. })
    }
}

/// Renders formulas to transparent PNG images.
pub struct FormulaRenderer {
    base: Arc<FormulaBase>,
    fonts: Arc<FontCatalog>,
}

impl FormulaRenderer {
    /// Creates a renderer typesetting with the given fonts.
    pub fn new(fonts: Arc<FontCatalog>) -> Self {
        let base = FormulaBase::new(fonts.typst_fonts());
        info!("formula renderer ready with {} fonts", base.font_count());
        Self {
            base: Arc::new(base),
            fonts,
        }
    }

    /// Renders the request, writing a placeholder image when anything fails.
    ///
    /// This never fails: the output path holds an image afterwards unless the
    /// file system refuses the write, which is logged.
    pub fn render(&self, req: &RenderRequest) -> FormulaImage {
        let status = match self.render_png(req) {
            Ok(png) => match write_image(&req.output, &png) {
                Ok(()) => RenderStatus::Rendered,
                Err(err) => self.fall_back(req, err),
            },
            Err(err) => self.fall_back(req, err),
        };

        FormulaImage {
            path: req.output.clone(),
            status,
        }
    }

    /// Typesets the request into PNG bytes.
    pub fn render_png(&self, req: &RenderRequest) -> Result<Vec<u8>> {
        if !req.dpi.is_finite() || req.dpi <= 1e-6 {
            return Err(format!("invalid dpi: {}", req.dpi).into());
        }
        if !req.font_size.is_finite() || req.font_size <= 0.0 || req.font_size > MAX_FONT_SIZE {
            return Err(format!("invalid font size: {}", req.font_size).into());
        }

        let body = match req.syntax {
            FormulaSyntax::Tex => tex_to_typst(&req.expression)?,
            FormulaSyntax::Typst => req.expression.clone(),
        };

        let world = FormulaWorld::new(formula_source(&body, req.font_size)?, self.base.clone());
        let doc = typst::compile::<PagedDocument>(&world).output?;
        let Some(page) = doc.pages.first() else {
            return Err("the formula produced no pages".into());
        };

        let pixel_per_pt = req.dpi / 72.0;
        let size = page.frame.size();
        check_raster_size(
            (size.x.to_pt() * f64::from(pixel_per_pt)).ceil(),
            (size.y.to_pt() * f64::from(pixel_per_pt)).ceil(),
        )?;

        let pixmap = typst_render::render(page, pixel_per_pt);
        pixmap
            .encode_png()
            .map_err(|e| format!("PNG encoding error: {e}").into())
    }

    fn fall_back(&self, req: &RenderRequest, err: crate::Error) -> RenderStatus {
        warn!("render_formula failed for '{}': {err}", req.expression);

        let png = placeholder_png(&req.placeholder, &self.fonts);
        if let Err(write_err) = write_image(&req.output, &png) {
            warn!(
                "failed to write placeholder {}: {write_err}",
                req.output.display()
            );
        }

        RenderStatus::Placeholder {
            reason: err.to_string().into(),
        }
    }
}

/// Renders with a process-wide renderer built from the default fonts.
pub fn render_formula(req: &RenderRequest) -> FormulaImage {
    static RENDERER: OnceLock<FormulaRenderer> = OnceLock::new();
    RENDERER
        .get_or_init(|| FormulaRenderer::new(Arc::new(FontCatalog::default())))
        .render(req)
}

/// Wraps a math body into a page sized to its content with no background.
fn formula_source(body: &str, font_size: f32) -> Result<String> {
    let mut source = String::new();
    writeln!(
        source,
        "#set page(width: auto, height: auto, margin: 4pt, fill: none)"
    )?;
    writeln!(source, "#set text(size: {font_size}pt)")?;
    writeln!(source, "$ {body} $")?;
    Ok(source)
}

fn write_image(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
