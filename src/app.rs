//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the overload curves
//! - applies the curve selection
//! - prints reports or writes exports

use clap::Parser;

use crate::chart::{Axis, SeriesDocument, build_series};
use crate::cli::{Command, ExportArgs, QueryArgs, SeriesArgs, SourceArgs, SummaryArgs};
use crate::error::AppError;
use crate::select::Facets;

pub mod pipeline;

/// Entry point for the `overload` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::List(args) => handle_list(args),
        Command::Summary(args) => handle_summary(args),
        Command::Facets(args) => handle_facets(args),
        Command::Series(args) => handle_series(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_list(args: QueryArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_curves(&args.source.to_config())?;
    let selected = args.filter.to_filter().apply(&loaded.records);
    print!("{}", crate::report::format_list(&selected));
    Ok(())
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    if let Some(window) = args.window() {
        if window.start > window.end {
            return Err(AppError::new(2, "`--from` must not be greater than `--to`."));
        }
    }

    let loaded = pipeline::load_curves(&args.query.source.to_config())?;
    let selected = args.query.filter.to_filter().apply(&loaded.records);
    print!("{}", crate::report::format_summary(&selected, args.window()));
    Ok(())
}

fn handle_facets(args: SourceArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_curves(&args.to_config())?;
    print!("{}", crate::report::format_facets(&Facets::collect(&loaded.records)));
    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_curves(&args.query.source.to_config())?;
    let series = build_series(&loaded.records, &args.query.filter.to_filter());

    let x_axis = Axis::time()
        .with_scale(args.x_scale.into())
        .with_range(args.x_range());
    let y_axis = Axis::current()
        .with_scale(args.y_scale.into())
        .with_range(args.y_range());
    let document = SeriesDocument::new(loaded.source, x_axis, y_axis, series);

    let out = crate::io::export::open_output(args.out.as_deref())?;
    crate::io::export::write_series_json(out, &document)
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_curves(&args.query.source.to_config())?;
    let selected = args.query.filter.to_filter().apply(&loaded.records);

    let out = crate::io::export::open_output(args.out.as_deref())?;
    crate::io::export::write_samples_csv(out, &selected)
}
