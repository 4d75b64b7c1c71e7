//! Assembles the report: diagrams, formulas, text and the final document.
//!
//! Failures of single figures or formulas never abort the run. They are
//! logged and the figure is replaced by placeholder text. Only creating the
//! image directory and writing the document are fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dispatch_render::{FontCatalog, FormulaRenderer, RenderRequest};
use log::{info, warn};

use crate::Result;
use crate::config::ReportConfig;
use crate::content::{
    FIGURES_HEADING, REPORT_TITLE, REQUIREMENTS, REQUIREMENTS_HEADING, USER_ANALYSIS,
    USER_ANALYSIS_HEADING, byline,
};
use crate::diagram::{DiagramContext, FigureEntry, standard_figures};
use crate::docx::DocxWriter;
use crate::ir::{Block, ParagraphStyle, Picture, ReportDocument};

/// A formula of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaEntry {
    /// The expression in TeX math syntax.
    pub expression: String,
    /// File name of the image inside the image directory.
    pub file_name: String,
    /// The caption under the image.
    pub caption: String,
}

impl FormulaEntry {
    /// Creates an entry.
    pub fn new(expression: &str, file_name: &str, caption: &str) -> Self {
        Self {
            expression: expression.to_owned(),
            file_name: file_name.to_owned(),
            caption: caption.to_owned(),
        }
    }
}

/// The formulas of the report, in document order.
pub fn standard_formulas() -> Vec<FormulaEntry> {
    vec![
        FormulaEntry::new(
            r"\min \sum_{v\in V}\sum_{(i,j)\in A} c_{ij} x_{v,ij} + \beta \sum_{r\in R}\sum_{h\in H_r} P_{r,h} y_{r,h}",
            "formula_obj.png",
            "式 1：调度目标函数示例（行驶成本 + 医院偏好惩罚）",
        ),
        FormulaEntry::new(
            r"u_{v,j} \geq u_{v,i} + s_i + t_{ij} - M(1-x_{v,ij})",
            "formula_time.png",
            "式 2：时间窗与 Big-M 线性化约束示例",
        ),
    ]
}

/// The outcome of a finished run.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    /// The written document.
    pub output: PathBuf,
    /// The directory holding the generated images.
    pub image_dir: PathBuf,
    /// Images that were replaced by placeholder text.
    pub missing: Vec<PathBuf>,
    /// Formulas that were rendered as placeholder images.
    pub placeholder_formulas: Vec<PathBuf>,
}

/// A built document with the images that did not make it in.
struct Assembled {
    doc: ReportDocument,
    missing: Vec<PathBuf>,
    placeholder_formulas: Vec<PathBuf>,
}

/// Builds the report from a configuration.
pub struct ReportAssembler {
    config: ReportConfig,
    fonts: Arc<FontCatalog>,
    figures: Vec<FigureEntry>,
    formulas: Vec<FormulaEntry>,
}

impl ReportAssembler {
    /// Creates an assembler with the standard figures and formulas.
    pub fn new(config: ReportConfig) -> Self {
        let fonts = Arc::new(FontCatalog::discover(&config.fonts));
        Self {
            config,
            fonts,
            figures: standard_figures(),
            formulas: standard_formulas(),
        }
    }

    /// Uses the given fonts instead of discovering them.
    pub fn with_fonts(mut self, fonts: Arc<FontCatalog>) -> Self {
        self.fonts = fonts;
        self
    }

    /// Replaces the figure list.
    pub fn with_figures(mut self, figures: Vec<FigureEntry>) -> Self {
        self.figures = figures;
        self
    }

    /// Replaces the formula list.
    pub fn with_formulas(mut self, formulas: Vec<FormulaEntry>) -> Self {
        self.formulas = formulas;
        self
    }

    /// The configuration of this run.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generates all images and returns the document describing the report.
    ///
    /// Fails only when the image directory cannot be created.
    pub fn build_document(&self) -> Result<ReportDocument> {
        Ok(self.build()?.doc)
    }

    fn build(&self) -> Result<Assembled> {
        let image_dir = &self.config.image_dir;
        std::fs::create_dir_all(image_dir).map_err(|err| {
            format!(
                "failed to create image directory {}: {err}",
                image_dir.display()
            )
        })?;

        let mut out = Assembled {
            doc: ReportDocument::new(),
            missing: Vec::new(),
            placeholder_formulas: Vec::new(),
        };
        let doc = &mut out.doc;
        doc.title(REPORT_TITLE);
        doc.paragraph(
            byline(&self.config.author, self.config.report_date()),
            ParagraphStyle::Byline,
        );

        doc.heading(1, REQUIREMENTS_HEADING);
        for text in REQUIREMENTS {
            doc.paragraph(*text, ParagraphStyle::Body);
        }

        doc.heading(1, USER_ANALYSIS_HEADING);
        for text in USER_ANALYSIS {
            doc.paragraph(*text, ParagraphStyle::Body);
        }

        doc.push(Block::PageBreak);
        doc.heading(1, FIGURES_HEADING);
        self.add_figures(&mut out);
        self.add_formulas(&mut out);

        Ok(out)
    }

    fn add_figures(&self, out: &mut Assembled) {
        let ctx = DiagramContext {
            fonts: &self.fonts,
            image_dir: &self.config.image_dir,
            scale: self.config.diagram_scale,
        };

        for figure in &self.figures {
            let label = &figure.label;
            out.doc.heading(3, label.heading());

            match figure.generator.generate(&ctx, label) {
                Ok(path) => out.push_picture(&path),
                Err(err) => {
                    warn!("failed to generate figure {}: {err}", label.number);
                    out.push_missing(ctx.path_for(&label.file_name));
                }
            }
            out.doc.paragraph(label.caption(), ParagraphStyle::Caption);
        }
    }

    fn add_formulas(&self, out: &mut Assembled) {
        let renderer = FormulaRenderer::new(self.fonts.clone());
        for formula in &self.formulas {
            let req = RenderRequest::new(
                formula.expression.as_str(),
                self.config.image_dir.join(&formula.file_name),
            )
            .font_size(self.config.formula.font_size)
            .dpi(self.config.formula.dpi);

            let image = renderer.render(&req);
            if image.is_placeholder() {
                out.placeholder_formulas.push(image.path.clone());
            }
            out.push_picture(&image.path);
            out.doc.paragraph(formula.caption.as_str(), ParagraphStyle::Caption);
        }
    }

    /// Builds the document, writes it and reports what was produced.
    pub fn assemble(&self) -> Result<ReportSummary> {
        let Assembled {
            doc,
            missing,
            placeholder_formulas,
        } = self.build()?;
        let writer = DocxWriter::new(self.fonts.family(), self.config.picture_width);
        let bytes = writer.generate_docx(&doc)?;

        let output = &self.config.output;
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, bytes)
            .map_err(|err| format!("failed to write {}: {err}", output.display()))?;
        info!("wrote {}", output.display());

        Ok(ReportSummary {
            output: output.clone(),
            image_dir: self.config.image_dir.clone(),
            missing,
            placeholder_formulas,
        })
    }
}

/// The placeholder text for an image that could not be inserted.
pub fn missing_image_text(path: &Path) -> String {
    format!("[无法插入图片：{}]", path.display())
}

impl Assembled {
    fn push_picture(&mut self, path: &Path) {
        match Picture::load(path) {
            Ok(picture) => self.doc.push(Block::Picture(picture)),
            Err(err) => {
                warn!("failed to insert image {}: {err}", path.display());
                self.push_missing(path.to_owned());
            }
        }
    }

    fn push_missing(&mut self, path: PathBuf) {
        self.doc.push(Block::Placeholder(missing_image_text(&path)));
        self.missing.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_text() {
        let text = missing_image_text(Path::new("report_images/fig2-2.png"));
        assert_eq!(text, "[无法插入图片：report_images/fig2-2.png]");
    }

    #[test]
    fn test_standard_formulas() {
        let names: Vec<_> = standard_formulas()
            .into_iter()
            .map(|formula| formula.file_name)
            .collect();
        assert_eq!(names, ["formula_obj.png", "formula_time.png"]);
    }
}
