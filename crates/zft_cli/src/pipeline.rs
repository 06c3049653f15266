//! Shared pipeline helpers for CLI commands.
//!
//! Contains what `place` and `batch` have in common: logging setup, config
//! resolution, input loading, running the placer on a worker thread, report
//! output and diagnostic rendering.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use zft_arch::Architecture;
use zft_config::{InitialMode, OutputFormat, PlacerConfig, SwapMode, CONFIG_FILE_NAME};
use zft_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use zft_netlist::Netlist;
use zft_place::{
    CancelToken, InitialPlacement, PlaceError, Placement, PlacementReport, PlacementWriter,
    PlacerOptions, SwapPolicy,
};

use crate::{FormatArg, GlobalArgs, InitArg, PlacementFlags, SwapArg};

/// Placement settings after merging flags, config file and defaults.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Options handed to the placer.
    pub options: PlacerOptions,
    /// Report format.
    pub format: OutputFormat,
    /// Directory for reports without an explicit output path.
    pub directory: PathBuf,
}

/// Installs the `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug output with
/// `--verbose`. Diagnostics are printed by the renderer, so their `tracing`
/// copies stay at `warn` to avoid printing them twice.
pub fn init_logging(global: &GlobalArgs) {
    let fallback = if global.verbose {
        "debug,zft_diagnostics=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .try_init();
}

/// Loads `--config`, or `zft.toml` from the current directory if present.
pub fn load_settings(global: &GlobalArgs) -> Result<PlacerConfig, Box<dyn std::error::Error>> {
    if let Some(ref path) = global.config {
        return Ok(zft_config::load_config(Path::new(path))?);
    }
    let local = Path::new(CONFIG_FILE_NAME);
    if local.is_file() {
        Ok(zft_config::load_config(local)?)
    } else {
        Ok(PlacerConfig::default())
    }
}

/// Merges command-line flags over the config file.
pub fn resolve_settings(
    config: &PlacerConfig,
    flags: &PlacementFlags,
    global: &GlobalArgs,
) -> Settings {
    let placement = &config.placement;
    let initial = match flags.init {
        Some(InitArg::Random) => InitialPlacement::Random,
        Some(InitArg::NetOrder) => InitialPlacement::NetOrder,
        None => match placement.initial {
            InitialMode::Random => InitialPlacement::Random,
            InitialMode::NetOrder => InitialPlacement::NetOrder,
        },
    };
    let swap_policy = match flags.swap_policy {
        Some(SwapArg::Verified) => SwapPolicy::Verified,
        Some(SwapArg::CostCompare) => SwapPolicy::CostCompare,
        None => match placement.swap_policy {
            SwapMode::Verified => SwapPolicy::Verified,
            SwapMode::CostCompare => SwapPolicy::CostCompare,
        },
    };
    let format = match flags.format {
        Some(FormatArg::Place) => OutputFormat::Place,
        Some(FormatArg::Json) => OutputFormat::Json,
        None => config.output.format,
    };

    Settings {
        options: PlacerOptions {
            iterations: flags.iterations.unwrap_or(placement.iterations),
            area_swap_size: flags.area_swap_size.unwrap_or(placement.area_swap_size),
            initial,
            swap_policy,
            seed: flags.seed.or(placement.seed),
            verbose: global.verbose || placement.verbose,
        },
        format,
        directory: PathBuf::from(&config.output.directory),
    }
}

/// Reads an architecture file.
pub fn load_architecture(path: &Path) -> Result<Architecture, Box<dyn std::error::Error>> {
    zft_arch::load_architecture(path)
        .map_err(|e| format!("failed to load architecture {}: {e}", path.display()).into())
}

/// Reads a netlist file.
pub fn load_netlist(
    path: &Path,
    arch: &Architecture,
    sink: &DiagnosticSink,
) -> Result<Netlist, Box<dyn std::error::Error>> {
    zft_netlist::load_netlist(path, arch, sink)
        .map_err(|e| format!("{}: {e}", path.display()).into())
}

/// Places `netlist` on a worker thread.
///
/// With a `timeout`, the controlling thread sets `cancel` once it expires;
/// the worker then stops before its next pass.
pub fn place_on_worker(
    netlist: Netlist,
    arch: &Architecture,
    options: PlacerOptions,
    cancel: &CancelToken,
    sink: &DiagnosticSink,
    timeout: Option<Duration>,
) -> Result<Placement, PlaceError> {
    run_with_watchdog(cancel, timeout, move || {
        zft_place::place(netlist, arch, options, cancel, sink)
    })
}

/// Runs `job` on a scoped thread and cancels it when `timeout` expires first.
///
/// A panic in `job` is re-raised on the calling thread without touching
/// `cancel`.
fn run_with_watchdog<T: Send>(
    cancel: &CancelToken,
    timeout: Option<Duration>,
    job: impl FnOnce() -> T + Send,
) -> T {
    std::thread::scope(|scope| {
        let (done_tx, done_rx) = mpsc::channel();
        let worker = scope.spawn(move || {
            let result = job();
            let _ = done_tx.send(());
            result
        });
        if let Some(limit) = timeout {
            if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(limit) {
                tracing::warn!(seconds = limit.as_secs(), "placement timed out, cancelling");
                cancel.cancel();
            }
        }
        match worker.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

/// Default report path: the netlist's file stem in `dir` with the format's extension.
pub fn output_path(netlist: &Path, dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = netlist
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "placement".into());
    dir.join(stem).with_extension(format.extension())
}

/// Writes `report` to `path` in `format`.
pub fn write_report(
    report: &PlacementReport,
    path: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Place => PlacementWriter.write_file(report, path)?,
        OutputFormat::Json => std::fs::write(path, report.to_json()? + "\n")?,
    }
    Ok(())
}

/// Returns `path` made absolute where possible, for report headers.
pub fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Creates a sink that prints each diagnostic to stderr as it is emitted.
///
/// With `--quiet` nothing is printed; the diagnostics are still collected.
pub fn live_sink(global: &GlobalArgs) -> DiagnosticSink {
    if global.quiet {
        return DiagnosticSink::new();
    }
    let renderer = TerminalRenderer::new(global.color);
    DiagnosticSink::with_listener(move |diag| eprint!("{}", renderer.render(diag)))
}

/// Prints and drains every diagnostic in `sink`, unless `--quiet`.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let diagnostics = sink.take_all();
    if global.quiet {
        return;
    }
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics {
        eprint!("{}", renderer.render(&diag));
    }
}
