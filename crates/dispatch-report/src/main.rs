#![doc = include_str!("../README.md")]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dispatch_report::{ReportAssembler, ReportConfig};

/// Generates the emergency dispatch requirements report.
#[derive(Debug, Clone, Parser, Default)]
#[clap(name = "dispatch-report", version)]
pub struct Args {
    /// Path of the generated document
    #[clap(long, env = "DISPATCH_REPORT_OUTPUT", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Directory receiving the generated images
    #[clap(long, env = "DISPATCH_REPORT_IMAGE_DIR", value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// TOML file with report settings
    #[clap(long, env = "DISPATCH_REPORT_CONFIG", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Resolution of the formula images
    #[clap(long, env = "DISPATCH_REPORT_DPI", value_name = "N")]
    pub dpi: Option<f32>,
}

impl Args {
    /// Resolves the configuration: flags over the config file over defaults.
    fn resolve(self) -> anyhow::Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(image_dir) = self.image_dir {
            config.image_dir = image_dir;
        }
        if let Some(dpi) = self.dpi {
            config.formula.dpi = dpi;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("dispatch_report", log::LevelFilter::Info)
        .filter_module("dispatch_render", log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let config = Args::parse().resolve()?;
    let summary = ReportAssembler::new(config)
        .assemble()
        .context("failed to generate the report")?;

    for path in &summary.missing {
        log::warn!("image not inserted: {}", path.display());
    }
    println!("已生成 Word 报告：{}", summary.output.display());
    println!("图像文件位于：{}", summary.image_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        std::fs::write(&path, "output = \"a.docx\"\nimage-dir = \"imgs\"\n").unwrap();

        let config_arg = path.to_str().unwrap();
        let args = Args::parse_from(["dispatch-report", "--config", config_arg, "--dpi", "300"]);
        let config = args.resolve().unwrap();
        assert_eq!(config.output, PathBuf::from("a.docx"));
        assert_eq!(config.image_dir, PathBuf::from("imgs"));
        assert_eq!(config.formula.dpi, 300.0);

        let args = Args::parse_from(["dispatch-report", "--output", "b.docx"]);
        assert_eq!(args.resolve().unwrap().output, PathBuf::from("b.docx"));
    }
}
