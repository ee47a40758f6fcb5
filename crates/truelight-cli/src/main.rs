//! tlx - Truelight transform tool
//!
//! Inspects serialized transform blocks and builds Truelight ops through
//! the configured engine.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tlx")]
#[command(author, version, about = "Truelight transform tool")]
#[command(long_about = "
Inspect and build Truelight transforms.

Examples:
  tlx inspect '!<TruelightTransform> {print: internal-LowContrast, display: sRGB}'
  tlx inspect -f blocks.yaml --check
  tlx build --print internal-LowContrast --display sRGB --ambient inverse
  tlx build --engine ./tlcube --display sRGB --apply 0.18,0.18,0.18

The engine defaults to $TRUELIGHT_ENGINE; see also $TRUELIGHT_TIMEOUT_MS
and $TRUELIGHT_CUBE_SIZE.
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode serialized transform blocks and print them
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Build the ops for a Truelight transform
    #[command(visible_alias = "b")]
    Build(BuildArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// Serialized blocks, e.g. '!<TruelightTransform> {display: sRGB}'
    blocks: Vec<String>,

    /// Read blocks from a file (one block per `!<...>` line)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Fail unless every block re-encodes to the same text
    #[arg(long)]
    check: bool,
}

#[derive(Args)]
struct BuildArgs {
    /// Start from a serialized TruelightTransform block
    #[arg(long)]
    from: Option<String>,

    /// Truelight install root
    #[arg(long)]
    config_root: Option<String>,

    /// Profile name
    #[arg(long)]
    profile: Option<String>,

    /// Camera stage
    #[arg(long)]
    camera: Option<String>,

    /// Input display stage
    #[arg(long)]
    input_display: Option<String>,

    /// Recorder stage
    #[arg(long)]
    recorder: Option<String>,

    /// Print stock
    #[arg(long)]
    print: Option<String>,

    /// Lamp stage
    #[arg(long)]
    lamp: Option<String>,

    /// Output camera stage
    #[arg(long)]
    output_camera: Option<String>,

    /// Display stage
    #[arg(long)]
    display: Option<String>,

    /// Cube input mode (log, linear, video)
    #[arg(long)]
    cube_input: Option<String>,

    /// Mark the descriptor itself as inverse
    #[arg(long)]
    inverse: bool,

    /// Direction of the surrounding pipeline (forward, inverse)
    #[arg(long, default_value = "forward")]
    ambient: String,

    /// Cube-baking program (overrides $TRUELIGHT_ENGINE)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Engine timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Baked cube edge length
    #[arg(long)]
    cube_size: Option<usize>,

    /// Run an RGB triple through the built ops, e.g. 0.18,0.18,0.18
    #[arg(long)]
    apply: Option<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 2)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, cli.verbose),
        Commands::Build(args) => commands::build::run(args, cli.verbose),
    }
}
