//! DOCX output for the report document.

mod image_processor;
pub mod styles;
mod writer;

pub use image_processor::{DocxImageProcessor, EMU_PER_INCH};
pub use styles::DocxStyles;
pub use writer::DocxWriter;
