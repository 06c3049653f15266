//! ZFT CLI, the command-line front end of the ZFT placer.
//!
//! Provides `zft place` for placing one netlist and `zft batch` for placing
//! several netlists in parallel.

#![warn(missing_docs)]

mod batch;
mod pipeline;
mod place;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// ZFT, a zero-force-target FPGA placer.
#[derive(Parser, Debug)]
#[command(name = "zft", version, about = "Zero-force-target FPGA placement")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output, including every block move.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `zft.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place a single netlist.
    Place(PlaceArgs),
    /// Place several netlists concurrently.
    Batch(BatchArgs),
}

/// Placement settings shared by `place` and `batch`.
///
/// Every flag left unset falls back to `zft.toml`, then to the built-in default.
#[derive(Args, Debug, Default)]
pub struct PlacementFlags {
    /// Architecture file (`.arch`).
    #[arg(short, long)]
    pub arch: String,

    /// Maximum number of optimization passes.
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Radius searched for a free cell around an occupied target.
    #[arg(long)]
    pub area_swap_size: Option<u32>,

    /// Initial placement of logic blocks.
    #[arg(long, value_enum)]
    pub init: Option<InitArg>,

    /// Swap acceptance rule.
    #[arg(long, value_enum)]
    pub swap_policy: Option<SwapArg>,

    /// Random seed for reproducible placements.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report format.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Arguments for the `zft place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Netlist file (`.net`).
    pub netlist: String,

    /// Output file (default: netlist name with the report extension).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Give up after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Placement settings.
    #[command(flatten)]
    pub placement: PlacementFlags,
}

/// Arguments for the `zft batch` subcommand.
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Netlist files (`.net`).
    #[arg(required = true)]
    pub netlists: Vec<String>,

    /// Number of worker threads (default: one per CPU).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Directory for the reports (default: `[output] directory` from `zft.toml`).
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Placement settings.
    #[command(flatten)]
    pub placement: PlacementFlags,
}

/// Initial placement mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InitArg {
    /// Random interior cells.
    Random,
    /// Net by net, smallest nets first.
    NetOrder,
}

/// Swap acceptance rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SwapArg {
    /// Keep a swap only if it lowers the cost.
    Verified,
    /// Swap when the moving block costs more than the occupant.
    CostCompare,
}

/// Report format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// VPR `.place` text.
    Place,
    /// JSON.
    Json,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Place(ref args) => place::run(args, &global),
        Command::Batch(ref args) => batch::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
