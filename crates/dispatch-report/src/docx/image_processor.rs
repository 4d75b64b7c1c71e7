//! Picture sizing and embedding.

use docx_rs::*;

use crate::ir::Picture;

/// EMU per inch.
pub const EMU_PER_INCH: f32 = 914_400.0;

/// Embeds pictures at a fixed width.
pub struct DocxImageProcessor {
    width_inches: f32,
}

impl DocxImageProcessor {
    /// Creates a processor placing pictures `width_inches` wide.
    pub fn new(width_inches: f32) -> Self {
        let width_inches = if width_inches.is_finite() && width_inches > 0.0 {
            width_inches
        } else {
            6.0
        };
        Self { width_inches }
    }

    /// The picture extent in EMU, keeping its aspect ratio.
    pub fn calculate_image_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let emu_width = self.width_inches * EMU_PER_INCH;
        let ratio = height.max(1) as f32 / width.max(1) as f32;
        (emu_width.round() as u32, (emu_width * ratio).round() as u32)
    }

    /// Adds `picture` as a centered paragraph, or a placeholder when its data
    /// no longer decodes.
    pub fn process_picture(&self, docx: Docx, picture: &Picture) -> Docx {
        if image::guess_format(&picture.png).is_err() {
            let text = format!("[无法插入图片：{}]", picture.source.display());
            let para = Paragraph::new()
                .style(super::styles::PLACEHOLDER)
                .add_run(Run::new().add_text(text));
            return docx.add_paragraph(para);
        }

        let (width, height) = self.calculate_image_dimensions(picture.width, picture.height);
        let pic = Pic::new(&picture.png).size(width, height);
        let para = Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_image(pic));
        docx.add_paragraph(para)
    }
}
