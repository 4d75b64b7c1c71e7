//! Paragraph styles of the report document.

use docx_rs::*;

/// Style ids used by the writer.
pub const TITLE: &str = "Title";
/// The author and date line.
pub const BYLINE: &str = "Byline";
/// Figure and formula captions.
pub const CAPTION: &str = "IntenseQuote";
/// Text standing in for missing content.
pub const PLACEHOLDER: &str = "Placeholder";

/// Document style management
#[derive(Clone, Debug)]
pub struct DocxStyles {
    fonts: RunFonts,
}

impl DocxStyles {
    /// Creates styles typesetting text in `family`.
    pub fn new(family: &str) -> Self {
        let fonts = RunFonts::new()
            .ascii(family)
            .hi_ansi(family)
            .east_asia(family)
            .cs(family);
        Self { fonts }
    }

    /// The style id of a heading level, clamped to the levels the report uses.
    pub fn heading_id(level: usize) -> String {
        format!("Heading{}", level.clamp(1, 3))
    }

    fn create_heading_style(&self, level: usize, size: usize) -> Style {
        Style::new(&Self::heading_id(level), StyleType::Paragraph)
            .name(format!("Heading {level}"))
            .fonts(self.fonts.clone())
            .size(size)
            .bold()
    }

    /// Registers all styles on `docx`.
    pub fn initialize_styles(&self, docx: Docx) -> Docx {
        let title = Style::new(TITLE, StyleType::Paragraph)
            .name("Title")
            .fonts(self.fonts.clone())
            .size(40)
            .bold()
            .align(AlignmentType::Center);

        let byline = Style::new(BYLINE, StyleType::Paragraph)
            .name("Byline")
            .fonts(self.fonts.clone())
            .size(21)
            .align(AlignmentType::Center);

        let caption = Style::new(CAPTION, StyleType::Paragraph)
            .name("Intense Quote")
            .fonts(self.fonts.clone())
            .italic()
            .size(20)
            .color("1F4E79")
            .align(AlignmentType::Center);

        let placeholder = Style::new(PLACEHOLDER, StyleType::Paragraph)
            .name("Placeholder")
            .fonts(self.fonts.clone())
            .italic()
            .color("808080");

        docx.add_style(title)
            .add_style(byline)
            .add_style(self.create_heading_style(1, 32))
            .add_style(self.create_heading_style(2, 28))
            .add_style(self.create_heading_style(3, 26))
            .add_style(caption)
            .add_style(placeholder)
    }
}
