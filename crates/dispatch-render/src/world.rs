use std::sync::Arc;

use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook, FontInfo};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};

use crate::fonts::FontSlot;

/// A world holding a single formula source.
pub(crate) struct FormulaWorld {
    main: Source,
    base: Arc<FormulaBase>,
}

impl FormulaWorld {
    /// Create a new world for one formula.
    ///
    /// This is cheap because the shared base is built once per renderer.
    pub fn new(text: String, base: Arc<FormulaBase>) -> Self {
        let id = FileId::new(None, VirtualPath::new("/formula.typ"));
        Self {
            main: Source::new(id, text),
            base,
        }
    }
}

impl World for FormulaWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.base.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.base.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.base.fonts.get(index)?.get_or_init()
    }

    fn today(&self, _: Option<i64>) -> Option<Datetime> {
        None
    }
}

/// Shared foundation of all formula worlds.
pub(crate) struct FormulaBase {
    library: LazyHash<Library>,
    book: LazyHash<FontBook>,
    fonts: Vec<FontSlot>,
}

impl FormulaBase {
    pub fn new(fonts: Vec<(FontInfo, FontSlot)>) -> Self {
        let mut book = FontBook::new();
        let mut slots = Vec::with_capacity(fonts.len());
        for (info, slot) in fonts {
            book.push(info);
            slots.push(slot);
        }

        Self {
            library: LazyHash::new(Library::default()),
            book: LazyHash::new(book),
            fonts: slots,
        }
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}
