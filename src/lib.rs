pub mod catalog;
pub mod cli;
pub mod coords;
pub mod engine;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod layers;
pub mod record;
pub mod table;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use crate::{
    catalog::{GroupColumn, LabelCatalog, ValueColumn},
    cli::{Cli, Commands},
    record::{WaterUseTable, WellTable},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("well_explorer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => handle_columns(&args),
        Commands::Stats(args) => handle_stats(&args),
        Commands::Export(args) => handle_export(&args),
        Commands::Profile(args) => handle_profile(&args),
        Commands::Layer(args) => handle_layer(&args),
    }
}

fn load_catalog(descriptor: Option<&Path>) -> Result<LabelCatalog> {
    match descriptor {
        Some(path) => LabelCatalog::from_descriptor_path(path),
        None => Ok(LabelCatalog::empty()),
    }
}

fn load_wells(path: &Path, delimiter: Option<u8>) -> Result<WellTable> {
    let table = WellTable::from_csv_path(path, delimiter)
        .with_context(|| format!("Loading well table from {path:?}"))?;
    Ok(coords::normalize(table))
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let catalog = load_catalog(args.descriptor.as_deref())?;

    let mut rows = Vec::new();
    for column in ValueColumn::ALL {
        rows.push(vec![
            column.as_str().to_string(),
            "value".to_string(),
            catalog.label(column.as_str()),
        ]);
    }
    for column in GroupColumn::ALL {
        rows.push(vec![
            column.as_str().to_string(),
            "group-by".to_string(),
            catalog.label(column.as_str()),
        ]);
    }

    let headers = vec![
        "column".to_string(),
        "role".to_string(),
        "label".to_string(),
    ];
    table::print_table(&headers, &rows);
    info!(
        "{} value column(s), {} group-by column(s)",
        ValueColumn::ALL.len(),
        GroupColumn::ALL.len()
    );
    Ok(())
}

fn handle_stats(args: &cli::StatsArgs) -> Result<()> {
    let catalog = load_catalog(args.descriptor.as_deref())?;
    let wells = load_wells(&args.input, args.delimiter)?;

    let records = engine::filter_by_group(wells.records(), &args.group_by, args.group.as_deref())?;
    if records.is_empty()
        && let Ok(options) = engine::group_options(wells.records(), &args.group_by)
    {
        warn!(
            "No records matched; available groups for '{}': {}",
            args.group_by,
            options.join(", ")
        );
    }
    let narrowed = WellTable::new(records, wells.columns().to_vec());
    let summaries = engine::summary_stats(&narrowed, &args.value, &args.group_by)?;

    let headers = vec![
        catalog.label(&args.group_by),
        "count".to_string(),
        "mean".to_string(),
        "std_dev".to_string(),
        "min".to_string(),
        "q1".to_string(),
        "median".to_string(),
        "q3".to_string(),
        "max".to_string(),
    ];
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.group.clone(),
                s.count.to_string(),
                format_stat(s.mean),
                format_stat(s.std_dev),
                format_stat(s.min),
                format_stat(s.q1),
                format_stat(s.median),
                format_stat(s.q3),
                format_stat(s.max),
            ]
        })
        .collect();
    table::print_table(&headers, &rows);
    info!(
        "Summary statistics for '{}' across {} group(s) of '{}'",
        args.value,
        summaries.len(),
        args.group_by
    );
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let wells = load_wells(&args.input, args.delimiter)?;
    let records = engine::filter_by_group(wells.records(), &args.group_by, args.group.as_deref())?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| export::export_file_name(args.group.as_deref()).into());
    let delimiter = args
        .delimiter
        .unwrap_or(io_utils::DEFAULT_CSV_DELIMITER);
    let mut writer = io_utils::open_csv_writer(Some(&output), delimiter)?;
    export::write_filtered_csv(&mut writer, wells.columns(), &records)?;
    info!(
        "Exported {} of {} well record(s) to {:?}",
        records.len(),
        wells.len(),
        output
    );
    Ok(())
}

fn handle_profile(args: &cli::ProfileArgs) -> Result<()> {
    let wells = load_wells(&args.input, args.delimiter)?;

    let joined = match &args.metadata {
        Some(path) => {
            let metadata = WaterUseTable::from_csv_path(path, args.delimiter)
                .with_context(|| format!("Loading water-use metadata from {path:?}"))?;
            if !metadata.has_water_use() {
                warn!("Metadata {path:?} has no water_use column; profile will be unclassified");
            }
            engine::join_water_use(&wells, &metadata)?
        }
        None => wells,
    };

    let records = match &args.group_by {
        Some(group_by) => engine::filter_by_group(joined.records(), group_by, args.group.as_deref())?,
        None => joined.records().to_vec(),
    };
    let spans = engine::derive_vertical_interval(&records, &args.mode)?;
    let dropped = records.len() - spans.len();
    let grouped = engine::group_spans_by_water_use(spans);

    let headers = vec![
        "water_use".to_string(),
        "site_id".to_string(),
        "x".to_string(),
        "y".to_string(),
        "top".to_string(),
        "bottom".to_string(),
    ];
    let mut rows = Vec::new();
    for (water_use, spans) in &grouped {
        for span in spans {
            rows.push(vec![
                water_use.clone(),
                span.site_id.clone().unwrap_or_default(),
                format_stat(Some(span.x)),
                format_stat(Some(span.y)),
                format_stat(Some(span.top)),
                format_stat(Some(span.bottom)),
            ]);
        }
    }
    table::print_table(&headers, &rows);
    info!(
        "Derived {} vertical interval(s) in {} water-use group(s); {} record(s) lacked required fields",
        rows.len(),
        grouped.len(),
        dropped
    );
    Ok(())
}

fn handle_layer(args: &cli::LayerArgs) -> Result<()> {
    let kind = args.kind.kind();
    let features = layers::load_layer(&args.input, kind, args.name_property.as_deref())?;

    let headers = vec!["feature".to_string(), "polygons".to_string()];
    let rows: Vec<Vec<String>> = features
        .iter()
        .map(|f| vec![f.name.clone(), f.polygon_count().to_string()])
        .collect();
    table::print_table(&headers, &rows);
    info!(
        "Loaded {} feature(s) from the {} layer",
        features.len(),
        kind.as_str()
    );
    Ok(())
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.4}"),
        None => String::new(),
    }
}
