//! Fretboard CLI library
//!
//! This module contains the core CLI logic for the fretboard tool: one-shot
//! rendering to disk and the HTTP endpoint.

pub mod error_adapter;
pub mod serve;

mod args;
mod config;

pub use args::{Args, Command, RenderArgs, ServeArgs};
pub use error_adapter::ErrorAdapter;

use std::{fs, path::PathBuf};

use log::info;

use fretboard::{DiagramBuilder, FretboardError, diagram::Diagram, request::DiagramRequest};

/// Run the fretboard CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `FretboardError` for:
/// - Configuration loading errors
/// - Invalid diagram requests
/// - Rendering errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), FretboardError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Render(render_args) => {
            let builder = DiagramBuilder::new(app_config);
            let path = render(&builder, render_args)?;
            info!(output_file:? = path; "Diagram exported successfully");
            Ok(())
        }
        Command::Serve(serve_args) => serve::run(serve_args, app_config),
    }
}

/// Render one diagram as described by `args` and return the image path.
///
/// # Errors
///
/// See [`run`].
pub fn render(builder: &DiagramBuilder, args: &RenderArgs) -> Result<PathBuf, FretboardError> {
    let diagram = resolve_diagram(builder, args)?;

    let image = builder.render_image(&diagram)?;
    let path = builder.save_image(&diagram, &image, args.output.as_deref())?;

    if args.save_snapshot {
        builder.save_snapshot(&diagram)?;
    }

    Ok(path)
}

/// Build the diagram from a snapshot, or from a request file merged with flags.
fn resolve_diagram(builder: &DiagramBuilder, args: &RenderArgs) -> Result<Diagram, FretboardError> {
    if let Some(title) = &args.from_snapshot {
        info!(title; "Rendering from snapshot");
        return builder.load_snapshot(title);
    }

    let base = match &args.request {
        Some(path) => {
            info!(request_path:? = path; "Reading request file");
            DiagramRequest::from_json(&fs::read(path)?)?
        }
        None => DiagramRequest::new(),
    };

    let mut flags = DiagramRequest::new();
    if let Some(title) = &args.title {
        flags = flags.with_title(title.as_str());
    }
    if let Some(frets) = args.frets {
        flags = flags.with_frets(frets);
    }
    if let Some(mode) = &args.mode {
        flags = flags.with_mode(mode.as_str());
    }
    for (key, frets) in &args.positions {
        flags = flags.with_position(key.as_str(), frets.iter().copied());
    }

    builder.diagram(&base.merge(flags))
}
