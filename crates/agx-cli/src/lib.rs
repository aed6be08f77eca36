//! CLI logic for the agx architecture graph tool.
//!
//! Reads an agx document, builds its graph, and writes it out as XML or as a
//! text outline.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io::Write};

use log::{debug, info};

use agx::{AgxError, GraphReader, export};

/// Run the agx CLI application
///
/// Loads the configuration, applies command-line overrides, parses the
/// input file, and writes the rendered graph to the output file or to
/// standard output.
///
/// # Errors
///
/// Returns `AgxError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parse and validation errors
pub fn run(args: &Args) -> Result<(), AgxError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let mut reader_config = app_config.reader();
    if args.no_validate {
        reader_config = reader_config.with_validate(false);
    }

    let format = match &args.format {
        Some(format) => format.parse::<export::Format>().map_err(AgxError::Config)?,
        None => app_config.output().format(),
    };
    debug!(format:?, validate = reader_config.validate(); "Resolved options");

    let reader = GraphReader::new(reader_config);
    let graph = reader.parse_file(&args.input)?;

    let rendered = export::render(&graph, format, app_config.output().indent());

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path.as_str(); "Graph exported successfully");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
