//! DOCX document writer implementation

use std::io::Cursor;

use docx_rs::*;

use super::image_processor::DocxImageProcessor;
use super::styles::{self, DocxStyles};
use crate::Result;
use crate::ir::{Block, ParagraphStyle, ReportDocument};

/// Space after body paragraphs, in twips (6pt).
const BODY_SPACE_AFTER: u32 = 120;

/// Renders a [`ReportDocument`] into DOCX bytes.
pub struct DocxWriter {
    styles: DocxStyles,
    image_processor: DocxImageProcessor,
}

impl DocxWriter {
    /// Creates a writer using `family` for text and placing pictures
    /// `picture_width` inches wide.
    pub fn new(family: &str, picture_width: f32) -> Self {
        Self {
            styles: DocxStyles::new(family),
            image_processor: DocxImageProcessor::new(picture_width),
        }
    }

    /// Splits `text` into a run with line breaks between its lines.
    fn text_run(text: &str) -> Run {
        let mut run = Run::new();
        for (idx, line) in text.lines().enumerate() {
            if idx > 0 {
                run = run.add_break(BreakType::TextWrapping);
            }
            run = run.add_text(line);
        }
        run
    }

    fn process_paragraph(&self, docx: Docx, text: &str, style: ParagraphStyle) -> Docx {
        let para = Paragraph::new().add_run(Self::text_run(text));
        let para = match style {
            ParagraphStyle::Body => {
                para.line_spacing(LineSpacing::new().after(BODY_SPACE_AFTER))
            }
            ParagraphStyle::Byline => para.style(styles::BYLINE),
            ParagraphStyle::Caption => para.style(styles::CAPTION),
        };
        docx.add_paragraph(para)
    }

    fn process_block(&self, docx: Docx, block: &Block) -> Docx {
        match block {
            Block::Title(text) => docx.add_paragraph(
                Paragraph::new()
                    .style(styles::TITLE)
                    .add_run(Self::text_run(text)),
            ),
            Block::Heading { level, text } => docx.add_paragraph(
                Paragraph::new()
                    .style(&DocxStyles::heading_id(*level))
                    .add_run(Self::text_run(text)),
            ),
            Block::Paragraph { text, style } => self.process_paragraph(docx, text, *style),
            Block::PageBreak => {
                docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
            }
            Block::Picture(picture) => self.image_processor.process_picture(docx, picture),
            Block::Placeholder(text) => docx.add_paragraph(
                Paragraph::new()
                    .style(styles::PLACEHOLDER)
                    .add_run(Self::text_run(text)),
            ),
        }
    }

    /// Builds the document tree.
    pub fn build(&self, doc: &ReportDocument) -> Docx {
        doc.blocks()
            .iter()
            .fold(self.styles.initialize_styles(Docx::new()), |docx, block| {
                self.process_block(docx, block)
            })
    }

    /// Generates the DOCX package.
    pub fn generate_docx(&self, doc: &ReportDocument) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.build(doc)
            .build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|e| format!("Failed to pack DOCX: {e}"))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_docx() {
        let mut doc = ReportDocument::new();
        doc.title("城市级急救指挥平台");
        doc.paragraph("作者：A", ParagraphStyle::Byline);
        doc.heading(1, "需求分析（扩展）");
        doc.paragraph("第一行\n第二行", ParagraphStyle::Body);
        doc.push(Block::PageBreak);
        doc.push(Block::Placeholder("[无法插入图片：x.png]".into()));
        doc.paragraph("图2-2 说明", ParagraphStyle::Caption);

        let writer = DocxWriter::new("Noto Sans CJK SC", 6.0);
        let bytes = writer.generate_docx(&doc).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let xml = String::from_utf8(writer.build(&doc).build().document).unwrap();
        for needle in [
            "城市级急救指挥平台",
            "需求分析（扩展）",
            "第一行",
            "第二行",
            "[无法插入图片：x.png]",
            r#"w:val="Heading1""#,
            r#"w:val="IntenseQuote""#,
            r#"w:type="page""#,
        ] {
            assert!(xml.contains(needle), "missing {needle}");
        }
    }
}
