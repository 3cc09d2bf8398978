//! Subsurface conditions summary from a geology CSV
//!
//! Usage:
//!   cargo run --bin summarize -- --input GEOLOGY.csv --summary-out summary.csv
//!   cargo run --bin summarize -- --input GEOLOGY.csv --format markdown --boreholes BH01,BH02
//!
//! Logging: RUST_LOG=subsurface_summary_rust=debug

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use subsurface_summary_rust::{
    BoreholeData, ClassificationGrouper, JsonFormatter, MarkdownFormatter, SummaryConfig,
    SummaryTableBuilder, TabularFormatter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Markdown,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "summarize", about = "Subsurface conditions summary from borehole geology CSV")]
struct Args {
    /// Geology CSV (PROJ_ID, POINT_ID, TOP, BASE, Legend, ...)
    #[arg(short, long)]
    input: PathBuf,

    /// Only summarise these boreholes (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    boreholes: Vec<String>,

    /// Summary configuration JSON (tolerances, tie-break, depth policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Classification grouping table JSON
    #[arg(long)]
    classification: Option<PathBuf>,

    /// Format printed to stdout
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Write the summary table as CSV
    #[arg(long)]
    summary_out: Option<PathBuf>,

    /// Write the enriched per-layer dataset (.csv or .parquet)
    #[arg(long)]
    layers_out: Option<PathBuf>,

    /// One summary per project id
    #[arg(long)]
    by_project: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subsurface_summary_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SummaryConfig::load(path)?,
        None => SummaryConfig::default(),
    };
    let grouper = match &args.classification {
        Some(path) => ClassificationGrouper::load(path)?,
        None => ClassificationGrouper::default(),
    };
    tracing::info!("Configuration: {:?}", config);

    let mut data = BoreholeData::load(&args.input)?;
    if !args.boreholes.is_empty() {
        data = data.select_boreholes(&args.boreholes);
        tracing::info!("Selected {} boreholes", data.borehole_ids().len());
    }
    if data.is_empty() {
        tracing::warn!("No soil layers to summarise");
    }

    let builder = SummaryTableBuilder::new(config, grouper);

    if args.by_project {
        let projects = builder.build_by_project(data.layers());
        match args.format {
            OutputFormat::Json => println!("{}", JsonFormatter::format_projects(&projects)?),
            OutputFormat::Markdown => print!("{}", MarkdownFormatter::format_projects(&projects)),
            OutputFormat::Csv => {
                for project in &projects {
                    let mut df = TabularFormatter::summary_frame(&project.rows)?;
                    println!("# {}", project.project_id);
                    print!("{}", TabularFormatter::to_csv_string(&mut df)?);
                }
            }
        }
        return Ok(());
    }

    let report = builder.build_report(data.layers());

    match args.format {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&report.rows)?),
        OutputFormat::Markdown => {
            print!("{}", MarkdownFormatter::format_with_stats(&data.stats(), &report.rows))
        }
        OutputFormat::Csv => {
            let mut df = TabularFormatter::summary_frame(&report.rows)?;
            print!("{}", TabularFormatter::to_csv_string(&mut df)?);
        }
    }

    if let Some(path) = &args.summary_out {
        let mut df = TabularFormatter::summary_frame(&report.rows)?;
        TabularFormatter::write_csv(&mut df, path)?;
    }

    if let Some(path) = &args.layers_out {
        let mut df = TabularFormatter::layers_frame(data.layers(), &report.assignment)?;
        let is_parquet = path.extension().is_some_and(|ext| ext == "parquet");
        if is_parquet {
            TabularFormatter::write_parquet(&mut df, path)?;
        } else {
            TabularFormatter::write_csv(&mut df, path)?;
        }
    }

    Ok(())
}
