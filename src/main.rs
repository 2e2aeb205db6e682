use crate::core::memory::try_estimate;
use crate::core::params::SizingParams;
use crate::ingest::csv::ingest_scenarios;
use crate::report::{OutputFormat, ReportEntry, write_json, write_text};
use anyhow::Context;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

pub mod core;
pub mod ingest;
pub mod report;

#[derive(Parser)]
#[command(
    name = "graphmem",
    version,
    about = "Estimate page cache and heap memory for a graph database"
)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Also print node and relationship byte totals
    #[arg(long, global = true)]
    breakdown: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    sizing: SizingArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a single deployment (default)
    Estimate(SizingArgs),
    /// Estimate every scenario listed in a CSV file
    Batch {
        /// CSV with name,num_nodes,props_per_node,rels_per_node,props_per_rel[,...]
        file: PathBuf,
    },
}

#[derive(Args, Clone)]
struct SizingArgs {
    /// Number of nodes
    #[arg(long, default_value_t = 53_000)]
    nodes: u64,
    /// Average properties per node
    #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
    props_per_node: f64,
    /// Average outgoing relationships per node
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    rels_per_node: f64,
    /// Average properties per relationship
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    props_per_rel: f64,
    /// Average bytes per node property
    #[arg(long, default_value_t = 32.0, allow_negative_numbers = true)]
    node_prop_size: f64,
    /// Average bytes per relationship property
    #[arg(long, default_value_t = 32.0, allow_negative_numbers = true)]
    rel_prop_size: f64,
    /// Bytes of bookkeeping per node
    #[arg(long, default_value_t = 64.0, allow_negative_numbers = true)]
    node_overhead: f64,
    /// Bytes of bookkeeping per relationship
    #[arg(long, default_value_t = 64.0, allow_negative_numbers = true)]
    rel_overhead: f64,
    /// Megabytes reserved for query and transaction state
    #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
    query_overhead_mb: f64,
}

impl From<&SizingArgs> for SizingParams {
    fn from(args: &SizingArgs) -> Self {
        SizingParams::new(
            args.nodes,
            args.props_per_node,
            args.rels_per_node,
            args.props_per_rel,
        )
        .with_prop_sizes(args.node_prop_size, args.rel_prop_size)
        .with_overheads(args.node_overhead, args.rel_overhead)
        .with_query_overhead_mb(args.query_overhead_mb)
    }
}

/// Sizing flags at the top level only apply when no subcommand is given.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = Cli::command();
    let matches = command.try_get_matches_from_mut(args)?;

    if let Some((subcommand, _)) = matches.subcommand() {
        let misplaced = command
            .get_arguments()
            .find(|arg| {
                !arg.is_global_set()
                    && matches.value_source(arg.get_id().as_str()) == Some(ValueSource::CommandLine)
            })
            .map(|arg| arg.get_long().unwrap_or(arg.get_id().as_str()).to_string());
        if let Some(flag) = misplaced {
            return Err(command.error(
                ErrorKind::ArgumentConflict,
                format!("--{flag} cannot be used before the '{subcommand}' subcommand"),
            ));
        }
    }

    Cli::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
}

fn main() {
    let cli = parse_cli(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    if let Err(e) = run(&cli, &mut std::io::stdout().lock()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    match &cli.command {
        None => run_estimate(cli, &cli.sizing, out),
        Some(Commands::Estimate(sizing)) => run_estimate(cli, sizing, out),
        Some(Commands::Batch { file }) => run_batch(cli, file, out),
    }
}

fn run_estimate<W: Write>(cli: &Cli, sizing: &SizingArgs, out: &mut W) -> anyhow::Result<()> {
    let params = SizingParams::from(sizing);
    let estimate = try_estimate(&params).context("invalid sizing parameters")?;

    let entries = [ReportEntry {
        name: None,
        params: &params,
        estimate: &estimate,
    }];
    render(cli, &entries, out)
}

fn run_batch<W: Write>(cli: &Cli, file: &Path, out: &mut W) -> anyhow::Result<()> {
    let reader = File::open(file).with_context(|| format!("cannot open {}", file.display()))?;
    let (scenarios, stats) = ingest_scenarios(reader)?;
    info!(
        parsed = stats.parsed,
        skipped = stats.skipped,
        "loaded scenarios from {}",
        file.display()
    );

    let estimates = scenarios
        .iter()
        .map(|s| try_estimate(&s.params))
        .collect::<Result<Vec<_>, _>>()?;
    let entries = scenarios
        .iter()
        .zip(&estimates)
        .map(|(s, estimate)| ReportEntry {
            name: Some(s.name.as_str()),
            params: &s.params,
            estimate,
        })
        .collect::<Vec<_>>();
    render(cli, &entries, out)
}

fn render<W: Write>(cli: &Cli, entries: &[ReportEntry<'_>], out: &mut W) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Text => write_text(out, entries, cli.breakdown)?,
        OutputFormat::Json => write_json(out, entries)?,
    }
    out.flush()?;
    Ok(())
}
