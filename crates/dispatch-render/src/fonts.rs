//! Font discovery shared by the formula renderer and the SVG rasterizer.
//!
//! The report is written in Chinese, so the discovery first looks for a
//! CJK-capable font at a few well-known locations. Whatever is found there
//! becomes the sans-serif family of the SVG font database. The embedded
//! `typst-assets` fonts are always loaded as well, so Latin text and math
//! still render on a bare system.
//!
//! Typst sees the same faces as the SVG database. Faces backed by a file are
//! only read once Typst asks for them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use fontdb::Database;
use log::{debug, info, warn};
use typst::foundations::Bytes;
use typst::text::{Font, FontInfo};

/// Well-known locations of CJK fonts on Linux runners, Windows hosts and the
/// repository itself.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansCJK.otf",
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
    "/usr/share/fonts/truetype/arphic/ukai.ttc",
    "/usr/share/fonts/truetype/arphic/uming.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "./fonts/NotoSansCJK-Regular.ttc",
];

/// The family used when no candidate font is present. It ships with
/// `typst-assets`, so it is always available.
pub const FALLBACK_FAMILY: &str = "Libertinus Serif";

/// Returns the first existing font among `extra` and [`FONT_CANDIDATES`].
pub fn find_font_path(extra: &[PathBuf]) -> Option<PathBuf> {
    extra
        .iter()
        .cloned()
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from))
        .find(|path| path.is_file())
}

/// The fonts available to the renderers of one run.
pub struct FontCatalog {
    primary: Option<PathBuf>,
    family: String,
    svg_db: Arc<Database>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::discover(&[])
    }
}

impl FontCatalog {
    /// Discovers fonts, preferring the given extra font files over the
    /// built-in candidates.
    pub fn discover(extra: &[PathBuf]) -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        for data in typst_assets::fonts() {
            db.load_font_data(data.to_vec());
        }

        let primary = find_font_path(extra);
        let mut family = None;
        if let Some(path) = &primary {
            match db.load_font_file(path) {
                Ok(()) => family = family_of(path),
                Err(err) => warn!("failed to load font {}: {err}", path.display()),
            }
        }

        let family = family.unwrap_or_else(|| FALLBACK_FAMILY.to_owned());
        db.set_sans_serif_family(family.clone());
        info!(
            "font discovery: primary={:?}, family={family}, faces={}",
            primary,
            db.len()
        );

        Self {
            primary,
            family,
            svg_db: Arc::new(db),
        }
    }

    /// Path of the preferred (CJK) font, if one was found.
    pub fn primary_path(&self) -> Option<&Path> {
        self.primary.as_deref()
    }

    /// The family name SVG scenes should reference.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The font database handed to `usvg`.
    pub fn svg_fontdb(&self) -> Arc<Database> {
        self.svg_db.clone()
    }

    /// Fonts for the Typst world: the embedded set, then every file-backed
    /// face of the font database (system fonts and the preferred font).
    pub(crate) fn typst_fonts(&self) -> Vec<(FontInfo, FontSlot)> {
        let mut fonts: Vec<_> = typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data)))
            .map(|font| (font.info().clone(), FontSlot::with_value(font)))
            .collect();

        for face in self.svg_db.faces() {
            // Embedded faces were added above.
            let fontdb::Source::File(path) = &face.source else {
                continue;
            };

            let info = self.svg_db.with_face_data(face.id, FontInfo::new).flatten();
            match info {
                Some(info) => fonts.push((info, FontSlot::new(path.clone(), face.index))),
                None => debug!("skipping font {} for typst", path.display()),
            }
        }

        fonts
    }
}

/// A Typst font, loaded from its file on first use.
pub(crate) struct FontSlot {
    file: Option<(PathBuf, u32)>,
    font: OnceLock<Option<Font>>,
}

impl FontSlot {
    /// A slot for face `index` of the font file at `path`.
    pub fn new(path: PathBuf, index: u32) -> Self {
        Self {
            file: Some((path, index)),
            font: OnceLock::new(),
        }
    }

    /// A slot holding an already loaded font.
    pub fn with_value(font: Font) -> Self {
        Self {
            file: None,
            font: OnceLock::from(Some(font)),
        }
    }

    /// Gets or loads the font.
    pub fn get_or_init(&self) -> Option<Font> {
        self.font
            .get_or_init(|| {
                let (path, index) = self.file.as_ref()?;
                match std::fs::read(path) {
                    Ok(data) => Font::new(Bytes::new(data), *index),
                    Err(err) => {
                        warn!("failed to load font {}: {err}", path.display());
                        None
                    }
                }
            })
            .clone()
    }
}

fn family_of(path: &Path) -> Option<String> {
    let mut probe = Database::new();
    probe.load_font_file(path).ok()?;
    let face = probe.faces().next()?;
    face.families.first().map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typst_fonts_include_font_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.otf");
        let data = typst_assets::fonts().next().unwrap();
        std::fs::write(&path, data).unwrap();

        let catalog = FontCatalog::discover(std::slice::from_ref(&path));
        assert_eq!(catalog.primary_path(), Some(path.as_path()));

        let fonts = catalog.typst_fonts();
        let embedded = typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data)))
            .count();
        assert!(fonts.len() > embedded);

        let (info, slot) = fonts
            .iter()
            .find(|(_, slot)| slot.file.as_ref().is_some_and(|(file, _)| *file == path))
            .unwrap();
        let font = slot.get_or_init().unwrap();
        assert_eq!(font.info(), info);
    }

    #[test]
    fn test_unreadable_slot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FontSlot::new(dir.path().join("gone.ttf"), 0);
        assert!(slot.get_or_init().is_none());
    }
}
