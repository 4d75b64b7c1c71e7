//! Diagram generation for the figure chapter.
//!
//! This module is organized into:
//! - Canvas: a minimal SVG scene builder
//! - Figures: the report's built-in diagrams
//! - The [`DiagramGenerator`] seam the assembler calls for every figure

mod canvas;
mod figures;

use std::path::{Path, PathBuf};

use dispatch_render::{FontCatalog, svg_to_png};
use log::info;

use crate::Result;

pub use canvas::{SvgCanvas, arrow_head, heat_color};
pub use figures::{Diagram, standard_figures};

/// What a generator needs to produce its image.
pub struct DiagramContext<'a> {
    /// Fonts for text in the scene.
    pub fonts: &'a FontCatalog,
    /// Directory receiving the image.
    pub image_dir: &'a Path,
    /// Raster scale relative to the scene size.
    pub scale: f32,
}

impl DiagramContext<'_> {
    /// The deterministic output path of a file in the image directory.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.image_dir.join(file_name)
    }

    /// Rasterizes `canvas` and writes it to `file_name` in the image directory.
    pub fn write_scene(&self, canvas: &SvgCanvas, file_name: &str) -> Result<PathBuf> {
        let png = svg_to_png(&canvas.finish(), self.fonts, self.scale)?;
        let path = self.path_for(file_name);
        std::fs::write(&path, png)
            .map_err(|err| format!("failed to write {}: {err}", path.display()))?;
        info!("generated {}", path.display());
        Ok(path)
    }
}

/// Produces the image of one figure.
pub trait DiagramGenerator {
    /// Writes the figure's image and returns its path.
    fn generate(&self, ctx: &DiagramContext<'_>, figure: &FigureLabel) -> Result<PathBuf>;
}

impl<F> DiagramGenerator for F
where
    F: Fn(&DiagramContext<'_>, &FigureLabel) -> Result<PathBuf>,
{
    fn generate(&self, ctx: &DiagramContext<'_>, figure: &FigureLabel) -> Result<PathBuf> {
        self(ctx, figure)
    }
}

/// Numbering and titles of a figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureLabel {
    /// The figure number, such as `2-2`.
    pub number: String,
    /// The Chinese title.
    pub title: String,
    /// The English title.
    pub title_en: String,
    /// File name of the image inside the image directory.
    pub file_name: String,
}

impl FigureLabel {
    /// Creates a label.
    pub fn new(number: &str, title: &str, title_en: &str, file_name: &str) -> Self {
        Self {
            number: number.to_owned(),
            title: title.to_owned(),
            title_en: title_en.to_owned(),
            file_name: file_name.to_owned(),
        }
    }

    /// The full bilingual caption.
    pub fn caption(&self) -> String {
        format!(
            "图{n} {} / Figure {n}: {}",
            self.title,
            self.title_en,
            n = self.number
        )
    }

    /// The section heading: the Chinese half of the caption.
    pub fn heading(&self) -> String {
        format!("图{} {}", self.number, self.title)
    }
}

/// A figure of the report together with the routine drawing it.
pub struct FigureEntry {
    /// Numbering and titles.
    pub label: FigureLabel,
    /// The drawing routine.
    pub generator: Box<dyn DiagramGenerator>,
}

impl FigureEntry {
    /// Creates an entry.
    pub fn new(label: FigureLabel, generator: impl DiagramGenerator + 'static) -> Self {
        Self {
            label,
            generator: Box::new(generator),
        }
    }
}

impl std::fmt::Debug for FigureEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigureEntry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_and_heading() {
        let label = FigureLabel::new("2-2", "系统总体架构图", "System Architecture", "a.png");
        assert_eq!(
            label.caption(),
            "图2-2 系统总体架构图 / Figure 2-2: System Architecture"
        );
        assert_eq!(label.heading(), "图2-2 系统总体架构图");
        assert_eq!(label.caption().split(" / ").next(), Some(label.heading().as_str()));
    }
}
