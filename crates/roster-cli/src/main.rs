//! Roster Merge CLI
//!
//! Command-line tool for merging an NFL depth chart with player analysis
//! results and cleaning up the scraped bio fields.

use clap::{Parser, Subcommand};
use roster_core::{
    dedupe_table, ensure_distinct, parse_csv, reorder_columns, run_merge, split_bio_fields,
    write_csv, DuplicatePolicy, MergeConfig,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(about = "Merge NFL depth charts with player analysis results", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug detail (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Left-join the depth chart with analysis results and write the merged CSV
    Merge {
        /// JSON config file providing defaults for the options below
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the inputs and the output
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Depth chart file name
        #[arg(long)]
        depth_chart: Option<String>,

        /// Analysis results file name
        #[arg(long)]
        analysis: Option<String>,

        /// Merged output file name
        #[arg(short, long)]
        output: Option<String>,

        /// Keep every analysis row for a repeated id instead of collapsing
        #[arg(long)]
        keep_duplicates: bool,

        /// Also write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Collapse analysis rows that share a PlayerUID
    Dedupe {
        /// Analysis results CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the de-duplicated CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split combined height/weight and draft info columns in one CSV
    SplitBio {
        /// CSV with PlayerHeightWeight and/or PlayerDraftInfo columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the processed CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Parse and display a single CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Write a merge config template with the default paths
    CreateConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(command: Commands) -> roster_core::Result<()> {
    match command {
        Commands::Merge {
            config,
            input_dir,
            depth_chart,
            analysis,
            output,
            keep_duplicates,
            report,
        } => {
            let mut merge_config = match config {
                Some(path) => MergeConfig::load(path)?,
                None => MergeConfig::default(),
            };
            if let Some(dir) = input_dir {
                merge_config.input_dir = dir;
            }
            if let Some(name) = depth_chart {
                merge_config.depth_chart_file = name;
            }
            if let Some(name) = analysis {
                merge_config.analysis_file = name;
            }
            if let Some(name) = output {
                merge_config.output_file = name;
            }
            if keep_duplicates {
                merge_config.duplicates = DuplicatePolicy::KeepAll;
            }
            debug!(config = ?merge_config, "resolved merge config");
            cmd_merge(&merge_config, report.as_deref())
        }
        Commands::Dedupe { input, output } => cmd_dedupe(&input, &output),
        Commands::SplitBio { input, output } => cmd_split_bio(&input, &output),
        Commands::Parse { file, limit } => cmd_parse(&file, limit),
        Commands::CreateConfig { output } => cmd_create_config(&output),
    }
}

fn cmd_merge(config: &MergeConfig, report_path: Option<&Path>) -> roster_core::Result<()> {
    println!("Depth chart: {}", config.depth_chart_path().display());
    println!("Analysis results: {}", config.analysis_path().display());

    let report = run_merge(config)?;
    let stats = &report.stats;

    println!();
    println!("Merged data saved to: {}", report.output_path.display());
    println!("Total players in merged file: {}", stats.output_rows);
    println!(
        "  {} matched, {} without analysis data",
        stats.matched_rows, stats.unmatched_rows
    );
    if stats.duplicates_collapsed > 0 {
        println!("  {} duplicate analysis rows collapsed", stats.duplicates_collapsed);
    }
    if stats.unparsed_heights + stats.unparsed_weights + stats.unparsed_draft_info > 0 {
        println!(
            "  unparsed: {} heights, {} weights, {} draft entries",
            stats.unparsed_heights, stats.unparsed_weights, stats.unparsed_draft_info
        );
    }

    // The merged file is already persisted; a report failure must not fail the run
    if let Some(path) = report_path {
        match report.save(path) {
            Ok(()) => println!("Report written to: {}", path.display()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not write report");
                eprintln!("Warning: could not write report {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}

fn cmd_dedupe(input: &Path, output: &Path) -> roster_core::Result<()> {
    ensure_distinct(output, &[input])?;
    let table = parse_csv(input)?;
    println!("Read {} rows from {}", table.row_count(), input.display());

    let result = dedupe_table(&table)?;
    write_csv(&result.table, output)?;

    println!(
        "Unique players after merging: {} ({} duplicates collapsed, {} rows without id)",
        result.table.row_count(),
        result.collapsed,
        result.dropped_without_id
    );
    println!("Saved to: {}", output.display());

    Ok(())
}

fn cmd_split_bio(input: &Path, output: &Path) -> roster_core::Result<()> {
    ensure_distinct(output, &[input])?;
    let table = parse_csv(input)?;

    let (split, stats) = split_bio_fields(&table);
    let ordered = reorder_columns(&split);
    write_csv(&ordered, output)?;

    println!("Processed {} player records", ordered.row_count());
    println!(
        "  unparsed: {} heights, {} weights, {} draft entries",
        stats.unparsed_heights, stats.unparsed_weights, stats.unparsed_draft_info
    );
    println!("Processed data saved to: {}", output.display());

    Ok(())
}

fn cmd_parse(file: &Path, limit: usize) -> roster_core::Result<()> {
    let table = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    // Print header
    let header = table.column_names();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.cells.iter().map(|c| c.to_string_value()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }

    Ok(())
}

fn cmd_create_config(output: &Path) -> roster_core::Result<()> {
    MergeConfig::default().save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to point at your data, then run:");
    println!("  roster-cli merge --config {}", output.display());

    Ok(())
}
