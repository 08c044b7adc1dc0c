use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

use bdg_report::config::CsvReadConfig;
use bdg_report::dataset::{Dataset, columns};
use bdg_report::error::Result;
use bdg_report::filter::{DateRange, date_column_bounds};
use bdg_report::geo::BoundaryLayer;
use bdg_report::loader::{LoadedTable, load_csv_dir};
use bdg_report::report::{GlobalReport, RechazoReport, RecuperoReport};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

const USAGE: &str =
    "Usage: bdg-report <data-dir> [start end, as YYYY-MM-DD] [--boundaries <file.geojson>] [--json <out.json>]";

struct Args {
    data_dir: PathBuf,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    boundaries: Option<PathBuf>,
    json_out: Option<PathBuf>,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut boundaries = None;
    let mut json_out = None;

    let mut raw = env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--boundaries" => {
                let value = raw
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--boundaries needs a file path\n{USAGE}"))?;
                boundaries = Some(PathBuf::from(value));
            }
            "--json" => {
                let value = raw
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--json needs a file path\n{USAGE}"))?;
                json_out = Some(PathBuf::from(value));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let data_dir = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("missing data directory\n{USAGE}"))?;
    let (start, end) = match positional.next() {
        Some(first) => {
            let second = positional
                .next()
                .ok_or_else(|| anyhow::anyhow!("start date given without an end date\n{USAGE}"))?;
            (Some(parse_date_arg(&first)?), Some(parse_date_arg(&second)?))
        }
        None => (None, None),
    };

    Ok(Args {
        data_dir,
        start,
        end,
        boundaries,
        json_out,
    })
}

/// All views built in one run, in the shape the JSON export writes.
#[derive(Default, Serialize)]
struct ReportBundle {
    global: Vec<GlobalReport>,
    recupero: Vec<RecuperoReport>,
    rechazo: Vec<RechazoReport>,
}

/// Builds one view over `table`, defaulting the range to the span of the
/// view's own date column when none was requested. A failed view is
/// logged and dropped; the remaining views still run.
fn build_view<T>(
    view: &str,
    table: &LoadedTable,
    date_column: &str,
    requested: Option<DateRange>,
    build: impl FnOnce(&LoadedTable, DateRange) -> Result<T>,
) -> Option<T> {
    let range = match requested {
        Some(range) => range,
        None => match date_column_bounds(&table.batches, date_column) {
            Ok(Some(bounds)) => bounds,
            Ok(None) => {
                warn!(
                    "{}: no usable dates in {date_column}, skipping {view} view",
                    table.name
                );
                return None;
            }
            Err(err) => {
                warn!("{}: {view} view failed: {err:#}", table.name);
                return None;
            }
        },
    };

    match build(table, range) {
        Ok(report) => {
            info!("{}: built {view} view for {range}", table.name);
            Some(report)
        }
        Err(err) => {
            warn!("{}: {view} view failed: {err:#}", table.name);
            None
        }
    }
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    if !args.data_dir.exists() {
        warn!("Data directory not found: {}", args.data_dir.display());
        return Ok(());
    }

    let requested = match (args.start, args.end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        _ => None,
    };

    info!("Loading loan tables from: {}", args.data_dir.display());
    let started = Instant::now();
    let tables = load_csv_dir(&args.data_dir, &CsvReadConfig::default())?;
    info!(
        "Loaded {} tables in {:?}",
        tables.len(),
        started.elapsed()
    );

    let mut bundle = ReportBundle::default();
    for table in &tables {
        match table.dataset {
            Dataset::Nomina => {
                if let Some(report) = build_view(
                    "global",
                    table,
                    columns::FEC_FORM,
                    requested,
                    GlobalReport::build,
                ) {
                    bundle.global.push(report);
                }
            }
            Dataset::Recupero => {
                if let Some(report) = build_view(
                    "recupero",
                    table,
                    columns::FECHA_INGRESO,
                    requested,
                    RecuperoReport::build,
                ) {
                    bundle.recupero.push(report);
                }
            }
            Dataset::Unknown => {
                warn!("{}: unrecognized table layout, skipping", table.name);
            }
        }

        // The rejection view runs wherever its date column was delivered,
        // which has moved between files over the years.
        let has_rechazo = table
            .schema()
            .is_some_and(|schema| schema.column_with_name(columns::FEC_RECHAZO).is_some());
        if has_rechazo {
            if let Some(report) = build_view(
                "rechazo",
                table,
                columns::FEC_RECHAZO,
                requested,
                RechazoReport::build,
            ) {
                bundle.rechazo.push(report);
            }
        }
    }

    if let Some(path) = &args.boundaries {
        match BoundaryLayer::load(path) {
            Ok(layer) => info!(
                "Boundary layer: {} features in {}",
                layer.len(),
                layer.crs()
            ),
            Err(err) => warn!("Failed to load boundary layer: {err:#}"),
        }
    }

    if let Some(path) = &args.json_out {
        let json = serde_json::to_string_pretty(&bundle)
            .context("Failed to serialize report bundle")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Wrote report bundle to {}", path.display());
    }

    info!(
        "Built {} global, {} recupero and {} rechazo views in {:?}",
        bundle.global.len(),
        bundle.recupero.len(),
        bundle.rechazo.len(),
        started.elapsed()
    );
    Ok(())
}
