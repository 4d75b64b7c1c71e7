use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use dispatch_render::FontCatalog;
use dispatch_report::content::{FIGURES_HEADING, REQUIREMENTS_HEADING, USER_ANALYSIS_HEADING};
use dispatch_report::diagram::{DiagramContext, FigureEntry, FigureLabel, standard_figures};
use dispatch_report::{Block, ReportAssembler, ReportConfig, Result};

fn fonts() -> Arc<FontCatalog> {
    static FONTS: OnceLock<Arc<FontCatalog>> = OnceLock::new();
    FONTS.get_or_init(|| Arc::new(FontCatalog::default())).clone()
}

fn config(dir: &Path) -> ReportConfig {
    ReportConfig {
        output: dir.join("report.docx"),
        image_dir: dir.join("images"),
        date: NaiveDate::from_ymd_opt(2024, 5, 1),
        ..ReportConfig::default()
    }
}

fn assembler(dir: &Path) -> ReportAssembler {
    ReportAssembler::new(config(dir)).with_fonts(fonts())
}

fn failing(_: &DiagramContext<'_>, figure: &FigureLabel) -> Result<PathBuf> {
    Err(format!("cannot draw {}", figure.number).into())
}

fn dangling(ctx: &DiagramContext<'_>, figure: &FigureLabel) -> Result<PathBuf> {
    Ok(ctx.path_for(&figure.file_name))
}

#[test]
fn document_structure() {
    let dir = tempfile::tempdir().unwrap();
    let doc = assembler(dir.path()).build_document().unwrap();

    let titles = doc
        .blocks()
        .iter()
        .filter(|block| matches!(block, Block::Title(_)))
        .count();
    assert_eq!(titles, 1);

    let h1: Vec<_> = doc
        .headings()
        .filter(|(level, _)| *level == 1)
        .map(|(_, text)| text)
        .collect();
    assert_eq!(h1, [REQUIREMENTS_HEADING, USER_ANALYSIS_HEADING, FIGURES_HEADING]);

    let h3: Vec<_> = doc
        .headings()
        .filter(|(level, _)| *level == 3)
        .map(|(_, text)| text.to_owned())
        .collect();
    let expected: Vec<_> = standard_figures()
        .iter()
        .map(|figure| figure.label.heading())
        .collect();
    assert_eq!(h3, expected);

    assert_eq!(doc.placeholders().count(), 0);
    let pictures = doc
        .blocks()
        .iter()
        .filter(|block| matches!(block, Block::Picture(_)))
        .count();
    assert_eq!(pictures, expected.len() + 2);
}

#[test]
fn assemble_writes_document_and_images() {
    let dir = tempfile::tempdir().unwrap();
    let summary = assembler(dir.path()).assemble().unwrap();

    let bytes = std::fs::read(&summary.output).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(summary.missing.is_empty());
    assert!(summary.placeholder_formulas.is_empty());

    for figure in standard_figures() {
        assert!(summary.image_dir.join(&figure.label.file_name).is_file());
    }
    assert!(summary.image_dir.join("formula_obj.png").is_file());
    assert!(summary.image_dir.join("formula_time.png").is_file());
}

#[test]
fn failing_generators_degrade_to_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let figures = vec![
        FigureEntry::new(
            FigureLabel::new("9-1", "失败图", "Failing", "fig9-1_failing.png"),
            failing,
        ),
        FigureEntry::new(
            FigureLabel::new("9-2", "缺失图", "Dangling", "fig9-2_dangling.png"),
            dangling,
        ),
    ];

    let summary = assembler(dir.path())
        .with_figures(figures)
        .with_formulas(Vec::new())
        .assemble()
        .unwrap();

    assert!(std::fs::read(&summary.output).unwrap().starts_with(b"PK"));
    let images = dir.path().join("images");
    assert_eq!(
        summary.missing,
        [
            images.join("fig9-1_failing.png"),
            images.join("fig9-2_dangling.png"),
        ]
    );
}

#[test]
fn placeholder_text_names_the_image() {
    let dir = tempfile::tempdir().unwrap();
    let figures = vec![FigureEntry::new(
        FigureLabel::new("9-1", "失败图", "Failing", "fig9-1_failing.png"),
        failing,
    )];

    let doc = assembler(dir.path())
        .with_figures(figures)
        .with_formulas(Vec::new())
        .build_document()
        .unwrap();

    let path = dir.path().join("images").join("fig9-1_failing.png");
    assert_eq!(
        doc.placeholders().collect::<Vec<_>>(),
        [format!("[无法插入图片：{}]", path.display())]
    );
}

#[test]
fn broken_formula_still_yields_a_picture() {
    let dir = tempfile::tempdir().unwrap();
    let formulas = vec![dispatch_report::FormulaEntry::new(
        r"\badcmd{x",
        "formula_bad.png",
        "式 9：错误示例",
    )];

    let summary = assembler(dir.path())
        .with_figures(Vec::new())
        .with_formulas(formulas)
        .assemble()
        .unwrap();

    assert!(summary.missing.is_empty());
    assert_eq!(
        summary.placeholder_formulas,
        [dir.path().join("images").join("formula_bad.png")]
    );
}

#[test]
fn runs_are_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let a = assembler(first.path()).build_document().unwrap();
    let b = assembler(second.path()).build_document().unwrap();
    assert_eq!(a.outline(), b.outline());

    let name = "fig2-5_gis_heatmap.png";
    assert_eq!(
        std::fs::read(first.path().join("images").join(name)).unwrap(),
        std::fs::read(second.path().join("images").join(name)).unwrap()
    );
}

#[test]
fn missing_images_are_recorded_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let figures = vec![
        FigureEntry::new(
            FigureLabel::new("9-1", "失败图", "Failing", "fig[9-1]].png"),
            failing,
        ),
        FigureEntry::new(
            FigureLabel::new("9-2", "缺失图", "Dangling", "无法插入图片：9-2]"),
            dangling,
        ),
    ];

    let summary = assembler(dir.path())
        .with_figures(figures)
        .with_formulas(Vec::new())
        .assemble()
        .unwrap();

    let images = dir.path().join("images");
    assert_eq!(
        summary.missing,
        [images.join("fig[9-1]].png"), images.join("无法插入图片：9-2]")]
    );
}

#[test]
fn oversized_images_degrade_to_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.diagram_scale = 1e6;
    config.formula.dpi = 1e9;

    let summary = ReportAssembler::new(config)
        .with_fonts(fonts())
        .assemble()
        .unwrap();

    assert!(std::fs::read(&summary.output).unwrap().starts_with(b"PK"));
    assert_eq!(summary.missing.len(), standard_figures().len());
    assert_eq!(summary.placeholder_formulas.len(), 2);
}

#[test]
fn unwritable_image_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let config = ReportConfig {
        image_dir: blocker.join("images"),
        ..config(dir.path())
    };
    let result = ReportAssembler::new(config)
        .with_fonts(fonts())
        .with_figures(Vec::new())
        .with_formulas(Vec::new())
        .assemble();
    assert!(result.is_err());
    assert!(!dir.path().join("report.docx").exists());
}

#[test]
fn unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let config = ReportConfig {
        output: blocker.join("report.docx"),
        ..config(dir.path())
    };
    let result = ReportAssembler::new(config)
        .with_fonts(fonts())
        .with_figures(Vec::new())
        .with_formulas(Vec::new())
        .assemble();
    assert!(result.is_err());
    assert!(dir.path().join("images").is_dir());
    assert!(std::fs::read(&blocker).unwrap().is_empty());
}
