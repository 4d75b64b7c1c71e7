//! Report configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) yields
//! the standard report.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Result;

/// The default output document.
pub const DEFAULT_OUTPUT: &str = "Mixed_Integer_Emergency_Dispatch_Report.docx";
/// The default directory receiving generated images.
pub const DEFAULT_IMAGE_DIR: &str = "report_images";

/// Settings of one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Path of the generated document.
    pub output: PathBuf,
    /// Directory receiving the diagram and formula images.
    pub image_dir: PathBuf,
    /// Formula rendering parameters.
    pub formula: FormulaConfig,
    /// Scale applied when rasterizing diagrams.
    pub diagram_scale: f32,
    /// Width of inserted pictures in inches.
    pub picture_width: f32,
    /// The author line under the title.
    pub author: String,
    /// The report date, today when unset.
    pub date: Option<NaiveDate>,
    /// Extra font files tried before the built-in candidates.
    pub fonts: Vec<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            formula: FormulaConfig::default(),
            diagram_scale: 1.0,
            picture_width: 6.0,
            author: "系统设计组".to_owned(),
            date: None,
            fonts: Vec::new(),
        }
    }
}

/// Formula rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormulaConfig {
    /// Text size in points.
    pub font_size: f32,
    /// Resolution in dots per inch.
    pub dpi: f32,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            dpi: 200.0,
        }
    }
}

impl ReportConfig {
    /// Parses a configuration from TOML.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
        Self::from_toml(&text)
    }

    /// The date printed under the title.
    pub fn report_date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ReportConfig::from_toml("").unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ReportConfig::from_toml(
            r#"
output = "out/report.docx"
date = "2024-05-01"

[formula]
dpi = 300
"#,
        )
        .unwrap();

        assert_eq!(config.output, PathBuf::from("out/report.docx"));
        assert_eq!(config.image_dir, PathBuf::from(DEFAULT_IMAGE_DIR));
        assert_eq!(config.formula.dpi, 300.0);
        assert_eq!(config.formula.font_size, 18.0);
        assert_eq!(config.report_date().to_string(), "2024-05-01");
    }

    #[test]
    fn test_unknown_types_are_rejected() {
        assert!(ReportConfig::from_toml("picture-width = \"wide\"").is_err());
    }
}
