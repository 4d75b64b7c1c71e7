//! The in-memory document rendered by the DOCX writer.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::Result;

/// Paragraph flavors of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    /// Running text.
    Body,
    /// The author and date line under the title.
    Byline,
    /// A figure or formula caption.
    Caption,
}

/// A validated raster image ready for embedding.
#[derive(Clone)]
pub struct Picture {
    /// Where the image was loaded from.
    pub source: PathBuf,
    /// PNG-encoded image data.
    pub png: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for Picture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picture")
            .field("source", &self.source)
            .field("bytes", &self.png.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Picture {
    /// Loads and decodes an image file, re-encoding it as PNG when needed.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|err| format!("failed to read image {}: {err}", path.display()))?;
        Self::from_bytes(path, data)
    }

    /// Decodes image data that claims to come from `source`.
    pub fn from_bytes(source: &Path, data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data)
            .map_err(|err| format!("unknown image format in {}: {err}", source.display()))?;
        let img = image::load_from_memory_with_format(&data, format)
            .map_err(|err| format!("failed to decode image {}: {err}", source.display()))?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(format!("image {} is empty", source.display()).into());
        }

        let png = if format == image::ImageFormat::Png {
            data
        } else {
            let mut buffer = Vec::new();
            img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
                .map_err(|err| format!("failed to re-encode {}: {err}", source.display()))?;
            buffer
        };

        Ok(Self {
            source: source.to_owned(),
            png,
            width,
            height,
        })
    }
}

/// One block of the document.
#[derive(Debug, Clone)]
pub enum Block {
    /// The document title.
    Title(String),
    /// A heading of the given level, starting at 1.
    Heading {
        /// Nesting level.
        level: usize,
        /// Heading text.
        text: String,
    },
    /// A paragraph of text.
    Paragraph {
        /// Paragraph text; newlines become line breaks.
        text: String,
        /// Paragraph flavor.
        style: ParagraphStyle,
    },
    /// A hard page break.
    PageBreak,
    /// An embedded image.
    Picture(Picture),
    /// Text standing in for content that could not be produced.
    Placeholder(String),
}

/// An ordered list of blocks; insertion order is the visible order.
#[derive(Debug, Clone, Default)]
pub struct ReportDocument {
    blocks: Vec<Block>,
}

impl ReportDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Appends a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Appends the title.
    pub fn title(&mut self, text: impl Into<String>) {
        self.push(Block::Title(text.into()));
    }

    /// Appends a heading.
    pub fn heading(&mut self, level: usize, text: impl Into<String>) {
        self.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    /// Appends a paragraph.
    pub fn paragraph(&mut self, text: impl Into<String>, style: ParagraphStyle) {
        self.push(Block::Paragraph {
            text: text.into(),
            style,
        });
    }

    /// Iterates over `(level, text)` of all headings.
    pub fn headings(&self) -> impl Iterator<Item = (usize, &str)> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Heading { level, text } => Some((*level, text.as_str())),
            _ => None,
        })
    }

    /// Texts of all placeholder blocks.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Placeholder(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// A one-line-per-block summary of the structure, without text bodies.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let line = match block {
                Block::Title(text) => format!("title: {text}"),
                Block::Heading { level, text } => format!("h{level}: {text}"),
                Block::Paragraph { style, .. } => format!("paragraph ({style:?})"),
                Block::PageBreak => "page break".to_owned(),
                Block::Picture(picture) => {
                    let name = picture.source.file_name().unwrap_or_default();
                    format!("picture: {}", name.to_string_lossy())
                }
                Block::Placeholder(_) => "placeholder".to_owned(),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
