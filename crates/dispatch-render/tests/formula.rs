use std::sync::{Arc, OnceLock};

use dispatch_render::placeholder::{PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
use dispatch_render::{FontCatalog, FormulaRenderer, FormulaSyntax, RenderRequest, RenderStatus};

fn renderer() -> &'static FormulaRenderer {
    static RENDERER: OnceLock<FormulaRenderer> = OnceLock::new();
    RENDERER.get_or_init(|| FormulaRenderer::new(Arc::new(FontCatalog::default())))
}

fn decode(path: &std::path::Path) -> image::DynamicImage {
    let data = std::fs::read(path).unwrap();
    assert!(!data.is_empty());
    image::load_from_memory(&data).unwrap()
}

#[test]
fn renders_simple_power() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("power.png");

    let image = renderer().render(&RenderRequest::new("x^2", &out));

    assert_eq!(image.status, RenderStatus::Rendered);
    assert_eq!(image.path, out);
    let img = decode(&out);
    assert!(img.width() > 0 && img.height() > 0);
}

#[test]
fn renders_report_formulas() {
    let dir = tempfile::tempdir().unwrap();
    let formulas = [
        r"\min \sum_{v\in V}\sum_{(i,j)\in A} c_{ij} x_{v,ij} + \beta \sum_{r\in R}\sum_{h\in H_r} P_{r,h} y_{r,h}",
        r"u_{v,j} \geq u_{v,i} + s_i + t_{ij} - M(1-x_{v,ij})",
    ];

    for (idx, formula) in formulas.into_iter().enumerate() {
        let out = dir.path().join(format!("formula_{idx}.png"));
        let image = renderer().render(&RenderRequest::new(formula, &out));
        assert!(!image.is_placeholder(), "{formula}: {:?}", image.status);
        decode(&out);
    }
}

#[test]
fn malformed_tex_writes_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("bad.png");

    let image = renderer().render(&RenderRequest::new(r"\badcmd{x", &out));

    assert!(image.is_placeholder());
    let img = decode(&out);
    assert_eq!(
        (img.width(), img.height()),
        (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
    );
}

#[test]
fn typst_errors_write_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("unknown.png");

    let req = RenderRequest::new("#undefined-function(x)", &out).syntax(FormulaSyntax::Typst);
    let image = renderer().render(&req);

    let RenderStatus::Placeholder { reason } = &image.status else {
        panic!("expected a placeholder, got {:?}", image.status);
    };
    assert!(reason.contains("unknown variable"), "{reason}");
    decode(&out);
}

#[test]
fn invalid_parameters_write_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("zero-dpi.png");

    let image = renderer().render(&RenderRequest::new("x", &out).dpi(0.0));

    assert!(image.is_placeholder());
    decode(&out);
}

#[test]
fn larger_font_yields_larger_image() {
    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small.png");
    let large = dir.path().join("large.png");

    renderer().render(&RenderRequest::new(r"\frac{a}{b}", &small).font_size(10.0));
    renderer().render(&RenderRequest::new(r"\frac{a}{b}", &large).font_size(30.0));

    assert!(decode(&large).height() > decode(&small).height());
}

#[test]
fn greek_letters_after_letters_render() {
    let dir = tempfile::tempdir().unwrap();

    for (idx, formula) in [r"x\alpha", r"\alpha\beta", r"2\pi r"].into_iter().enumerate() {
        let out = dir.path().join(format!("greek_{idx}.png"));
        let image = renderer().render(&RenderRequest::new(formula, &out));
        assert_eq!(image.status, RenderStatus::Rendered, "{formula}");
        decode(&out);
    }
}

#[test]
fn oversized_output_writes_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("huge-dpi", RenderRequest::new("x^2", "").dpi(1e9)),
        ("max-dpi", RenderRequest::new("x^2", "").dpi(f32::MAX)),
        ("huge-size", RenderRequest::new("x^2", "").font_size(1e5)),
        ("absurd-size", RenderRequest::new("x^2", "").font_size(1e12)),
    ];

    for (name, req) in cases {
        let out = dir.path().join(format!("{name}.png"));
        let req = RenderRequest {
            output: out.clone(),
            ..req
        };
        let image = renderer().render(&req);
        assert!(image.is_placeholder(), "{name}: {:?}", image.status);
        let img = decode(&out);
        assert_eq!(
            (img.width(), img.height()),
            (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
        );
    }
}

#[test]
fn placeholder_text_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let default = dir.path().join("default.png");
    let custom = dir.path().join("custom.png");

    renderer().render(&RenderRequest::new(r"\badcmd", &default));
    let req = RenderRequest::new(r"\badcmd", &custom).placeholder("formula unavailable");
    let image = renderer().render(&req);

    assert!(image.is_placeholder());
    let img = decode(&custom);
    assert_eq!(
        (img.width(), img.height()),
        (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
    );
    assert_ne!(
        std::fs::read(&default).unwrap(),
        std::fs::read(&custom).unwrap()
    );
}

#[test]
fn hostile_expressions_leave_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let long = format!("{}y", "x_{i}+".repeat(2_000));
    let cases: Vec<(&str, RenderRequest)> = vec![
        ("empty", RenderRequest::new("", "")),
        ("backslash", RenderRequest::new("\\", "")),
        ("closing-brace", RenderRequest::new("}", "")),
        ("bare-superscript", RenderRequest::new("x^", "")),
        ("bare-subscript", RenderRequest::new("_", "")),
        ("open-braces", RenderRequest::new("{{{", "")),
        ("non-ascii", RenderRequest::new("成本 + α²", "")),
        ("long", RenderRequest::new(long.as_str(), "")),
        ("letter-greek", RenderRequest::new(r"x\alpha", "")),
        ("greek-greek", RenderRequest::new(r"\alpha\beta", "")),
        ("huge-dpi", RenderRequest::new("x", "").dpi(1e9)),
        ("huge-size", RenderRequest::new("x", "").font_size(1e12)),
        ("nan-dpi", RenderRequest::new("x", "").dpi(f32::NAN)),
    ];

    for (name, req) in cases {
        let out = dir.path().join(format!("{name}.png"));
        let req = RenderRequest {
            output: out.clone(),
            ..req
        };
        let image = renderer().render(&req);
        assert_eq!(image.path, out, "{name}");
        let img = decode(&out);
        assert!(img.width() > 0 && img.height() > 0, "{name}");
    }
}
