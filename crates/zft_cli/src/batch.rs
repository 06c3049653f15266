//! `zft batch`: place several netlists concurrently.
//!
//! Every netlist gets its own placer and diagnostic sink; they share only the
//! read-only architecture. Diagnostics are printed per netlist, in argument
//! order, after all placements finished.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use zft_arch::Architecture;
use zft_diagnostics::DiagnosticSink;
use zft_place::{CancelToken, PlacementReport};

use crate::pipeline::{
    display_path, load_architecture, load_netlist, load_settings, output_path,
    render_diagnostics, resolve_settings, write_report, Settings,
};
use crate::{BatchArgs, GlobalArgs};

/// Runs the `zft batch` command.
///
/// Returns exit code 0 if every netlist was placed, 1 otherwise.
pub fn run(args: &BatchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let mut settings = resolve_settings(&config, &args.placement, global);
    if let Some(ref dir) = args.out_dir {
        settings.directory = PathBuf::from(dir);
    }
    std::fs::create_dir_all(&settings.directory)?;

    let arch_path = Path::new(&args.placement.arch);
    let arch = load_architecture(arch_path)?;
    let arch_display = display_path(arch_path);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()?;
    if !global.quiet {
        eprintln!(
            "     Placing {} netlists on {} threads",
            args.netlists.len(),
            pool.current_num_threads()
        );
    }

    let outcomes: Vec<(DiagnosticSink, Result<PathBuf, String>)> = pool.install(|| {
        args.netlists
            .par_iter()
            .map(|netlist| {
                let sink = DiagnosticSink::new();
                let result = place_one(Path::new(netlist), &arch, &arch_display, &settings, &sink)
                    .map_err(|e| e.to_string());
                (sink, result)
            })
            .collect()
    });

    let mut failures = 0;
    for (netlist, (sink, result)) in args.netlists.iter().zip(outcomes) {
        render_diagnostics(&sink, global);
        match result {
            Ok(out) => {
                if !global.quiet {
                    eprintln!("      Placed {netlist} -> {}", out.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("error: {netlist}: {e}");
            }
        }
    }

    if failures > 0 && !global.quiet {
        eprintln!("      Failed {failures} of {} netlists", args.netlists.len());
    }
    Ok(if failures == 0 { 0 } else { 1 })
}

/// Places one netlist and writes its report into the output directory.
fn place_one(
    netlist_path: &Path,
    arch: &Architecture,
    arch_display: &str,
    settings: &Settings,
    sink: &DiagnosticSink,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let netlist = load_netlist(netlist_path, arch, sink)?;
    tracing::debug!(netlist = %netlist_path.display(), blocks = netlist.element_count(), "placing");
    let placed = zft_place::place(
        netlist,
        arch,
        settings.options.clone(),
        &CancelToken::new(),
        sink,
    )?;
    let out = output_path(netlist_path, &settings.directory, settings.format);
    let report = PlacementReport::new(
        display_path(netlist_path),
        arch_display,
        placed.array_size,
        placed.placements,
    );
    write_report(&report, &out, settings.format)?;
    Ok(out)
}
