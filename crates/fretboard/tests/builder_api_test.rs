//! Integration tests for the DiagramBuilder API

use std::fs;

use tempfile::tempdir;

use fretboard::{
    DiagramBuilder, FretboardError,
    config::{AppConfig, OutputConfig},
    export::ImageFormat,
    request::DiagramRequest,
    string::GuitarString,
};

fn builder_in(dir: &std::path::Path, format: ImageFormat) -> DiagramBuilder {
    let output = OutputConfig::default()
        .with_format(format)
        .with_save_dir(dir.join("saves"))
        .with_snapshot_dir(dir.join("serialized"));
    DiagramBuilder::new(AppConfig::default().with_output(output))
}

fn c_major() -> DiagramRequest {
    DiagramRequest::new()
        .with_title("C major")
        .with_frets(5)
        .with_position("A", [3])
        .with_position("D", [2])
        .with_position("G", [0])
        .with_position("B", [1])
        .with_position("e", [0])
}

#[test]
fn test_render_svg_contains_markers() {
    let builder = DiagramBuilder::default();
    let diagram = builder.diagram(&c_major()).expect("Failed to validate");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert_eq!(svg.matches("<circle").count(), 5);
    assert!(svg.contains("\nC major\n"));
}

#[test]
fn test_render_is_deterministic() {
    let builder = DiagramBuilder::default();
    let diagram = builder.diagram(&c_major()).unwrap();

    let first = builder.render_image(&diagram).expect("Failed to render");
    let second = builder.render_image(&diagram).expect("Failed to render");
    assert_eq!(first, second);
}

#[test]
fn test_raster_output_draws_text() {
    let temp_dir = tempdir().unwrap();
    let builder = builder_in(temp_dir.path(), ImageFormat::Png);
    let render = |request: DiagramRequest| {
        let diagram = builder.diagram(&request).unwrap();
        builder.render_image(&diagram).unwrap()
    };

    let short_title = render(DiagramRequest::new().with_title("A").with_frets(2));
    let long_title = render(DiagramRequest::new().with_title("WWWWWWWW").with_frets(2));
    assert_ne!(short_title, long_title, "Title should be drawn");

    let marker = |mode: &str| {
        DiagramRequest::new()
            .with_title("A string")
            .with_frets(2)
            .with_mode(mode)
            .with_position("A", [1])
    };
    let sharp = render(marker("sharp"));
    let flat = render(marker("flat"));
    assert_ne!(sharp, flat, "Note names should be drawn");
}

#[test]
fn test_zero_frets_renders_minimal_canvas() {
    let builder = DiagramBuilder::default();
    let diagram = builder.diagram(&DiagramRequest::new().with_frets(0)).unwrap();
    let image = builder.render_image(&diagram).unwrap();

    assert_eq!((image.width(), image.height()), (550, 150));
    assert_eq!(image.content_type(), "image/jpeg");
}

#[test]
fn test_default_request_size() {
    let builder = DiagramBuilder::default();
    let diagram = builder.diagram(&DiagramRequest::new()).unwrap();
    let image = builder.render_image(&diagram).unwrap();
    assert_eq!((image.width(), image.height()), (550, 1350));
}

#[test]
fn test_empty_mapping_draws_only_grid() {
    let builder = DiagramBuilder::default();
    let diagram = builder
        .diagram(&DiagramRequest::new().with_frets(3))
        .unwrap();
    let svg = builder.render_svg(&diagram).unwrap();

    assert!(!svg.contains("<circle"));
    assert_eq!(svg.matches("<line").count(), 6 + 4);
}

#[test]
fn test_validation_errors_render_nothing() {
    let dir = tempdir().unwrap();
    let builder = builder_in(dir.path(), ImageFormat::Png);

    let bad = [
        DiagramRequest::new().with_position("x", [1]),
        DiagramRequest::new().with_mode("diatonic"),
        DiagramRequest::new().with_frets(-3),
        DiagramRequest::new().with_frets(100),
        DiagramRequest::new().with_position("E", [-1]),
        DiagramRequest::new().with_frets(2).with_position("E", [3]),
    ];

    for request in &bad {
        let err = builder.diagram(request).unwrap_err();
        assert!(
            matches!(err, FretboardError::Validation(_)),
            "Expected a validation error for {request:?}, got {err:?}"
        );
        assert!(err.is_client_error());
    }

    assert!(!dir.path().join("saves").exists());
}

#[test]
fn test_save_image_to_save_dir() {
    let dir = tempdir().unwrap();
    let builder = builder_in(dir.path(), ImageFormat::Png);

    let diagram = builder.diagram(&c_major()).unwrap();
    let image = builder.render_image(&diagram).unwrap();
    let path = builder.save_image(&diagram, &image, None).unwrap();

    assert_eq!(path, dir.path().join("saves").join("C major.png"));
    assert_eq!(fs::read(&path).unwrap(), image.bytes());
}

#[test]
fn test_save_image_to_explicit_path() {
    let dir = tempdir().unwrap();
    let builder = builder_in(dir.path(), ImageFormat::Jpeg);
    let target = dir.path().join("nested").join("out.jpg");

    let diagram = builder.diagram(&c_major()).unwrap();
    let image = builder.render_image(&diagram).unwrap();
    let path = builder.save_image(&diagram, &image, Some(&target)).unwrap();

    assert_eq!(path, target);
    assert!(fs::read(&target).unwrap().starts_with(&[0xFF, 0xD8]));
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempdir().unwrap();
    let builder = builder_in(dir.path(), ImageFormat::Png);

    let diagram = builder.diagram(&c_major().with_mode("flat")).unwrap();
    let path = builder.save_snapshot(&diagram).unwrap();
    assert_eq!(path, dir.path().join("serialized").join("C major.json"));

    let loaded = builder.load_snapshot("C major").unwrap();
    assert_eq!(loaded, diagram);
    assert_eq!(loaded.positions().frets(GuitarString::A), &[3]);
    assert_eq!(
        builder.render_svg(&loaded).unwrap(),
        builder.render_svg(&diagram).unwrap()
    );
}

#[test]
fn test_missing_snapshot_is_io_error() {
    let dir = tempdir().unwrap();
    let builder = builder_in(dir.path(), ImageFormat::Png);

    let err = builder.load_snapshot("never saved").unwrap_err();
    assert!(matches!(err, FretboardError::Io(_)));
    assert!(!err.is_client_error());
}
