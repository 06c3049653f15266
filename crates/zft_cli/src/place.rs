//! `zft place`: place one netlist and write its report.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use zft_place::{CancelToken, PlaceError, PlacementReport};

use crate::pipeline::{
    display_path, live_sink, load_architecture, load_netlist, load_settings, output_path,
    place_on_worker, resolve_settings, write_report,
};
use crate::{GlobalArgs, PlaceArgs};

/// Exit code for a placement stopped by `--timeout`.
const EXIT_INTERRUPTED: i32 = 2;

/// Runs the `zft place` command.
///
/// Returns exit code 0 on success, 1 on input errors and 2 when the timeout
/// interrupted placement. No report is written unless placement completed.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let settings = resolve_settings(&config, &args.placement, global);

    let arch_path = Path::new(&args.placement.arch);
    let netlist_path = Path::new(&args.netlist);
    let arch = load_architecture(arch_path)?;

    let sink = live_sink(global);
    if !global.quiet {
        eprintln!("     Parsing {}", netlist_path.display());
    }
    let netlist = load_netlist(netlist_path, &arch, &sink)?;
    if !global.quiet {
        eprintln!("     Placing {} blocks", netlist.element_count());
    }

    let cancel = CancelToken::new();
    let start = Instant::now();
    let outcome = place_on_worker(
        netlist,
        &arch,
        settings.options.clone(),
        &cancel,
        &sink,
        args.timeout.map(Duration::from_secs),
    );

    let placed = match outcome {
        Ok(placed) => placed,
        Err(PlaceError::Interrupted {
            completed_iterations,
        }) => {
            eprintln!(
                "error: placement timed out after {completed_iterations} iterations, no report written"
            );
            return Ok(EXIT_INTERRUPTED);
        }
        Err(e) => return Err(e.into()),
    };
    let elapsed = start.elapsed();

    let out = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| output_path(netlist_path, &settings.directory, settings.format));
    let report = PlacementReport::new(
        display_path(netlist_path),
        display_path(arch_path),
        placed.array_size,
        placed.placements,
    );
    write_report(&report, &out, settings.format)?;

    if !global.quiet {
        eprintln!(
            "      Placed {} x {} array, cost {:.2}, in {:.2}s",
            placed.array_size.0,
            placed.array_size.1,
            placed.summary.final_cost,
            elapsed.as_secs_f64()
        );
        eprintln!("     Written {}", out.display());
        let warnings = sink.warning_count();
        if warnings > 0 {
            eprintln!("    Warnings {warnings}");
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlacementFlags;

    const ARCH: &str = "io_rat 2\nsubblocks_per_clb 1\nsubblock_lut_size 4\n\
inpin class: 0 bottom\ninpin class: 0 left\ninpin class: 0 top\ninpin class: 0 right\n\
outpin class: 1 top bottom left right\ninpin class: 2 global top\n";

    const NETLIST: &str = ".global clk\n\n.input a\npinlist: a\n\n.input clk\npinlist: clk\n\n\
.clb b0\npinlist: a open open open n0 clk\nsubblock: b0 0 open open open 4 5\n\n\
.clb b1\npinlist: n0 a open open n1 clk\nsubblock: b1 0 1 open open 4 5\n\n\
.output out:n1\npinlist: n1\n";

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    fn write_inputs(dir: &Path) -> (String, String) {
        let arch = dir.join("lut4.arch");
        let net = dir.join("small.net");
        std::fs::write(&arch, ARCH).unwrap();
        std::fs::write(&net, NETLIST).unwrap();
        (arch.display().to_string(), net.display().to_string())
    }

    fn args(netlist: String, arch: String, output: &Path) -> PlaceArgs {
        PlaceArgs {
            netlist,
            output: Some(output.display().to_string()),
            timeout: None,
            placement: PlacementFlags {
                arch,
                seed: Some(1),
                ..PlacementFlags::default()
            },
        }
    }

    #[test]
    fn place_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let (arch, net) = write_inputs(dir.path());
        let out = dir.path().join("small.place");
        let code = run(&args(net, arch, &out), &global()).unwrap();
        assert_eq!(code, 0);

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Netlist file: "));
        assert_eq!(lines[1], "Array size: 2 x 2 logic blocks");
        // Header, separator, blank line and five blocks.
        assert_eq!(lines.len(), 10);
        assert!(lines[5].starts_with("a "));
        assert!(lines[9].ends_with("#4"));
    }

    #[test]
    fn place_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let (arch, net) = write_inputs(dir.path());
        let out = dir.path().join("small.json");
        let mut a = args(net, arch, &out);
        a.placement.format = Some(crate::FormatArg::Json);
        assert_eq!(run(&a, &global()).unwrap(), 0);

        let report: PlacementReport =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report.blocks.len(), 5);
        assert_eq!((report.columns, report.rows), (2, 2));
    }

    #[test]
    fn missing_netlist_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (arch, _) = write_inputs(dir.path());
        let missing = dir.path().join("missing.net").display().to_string();
        let out = dir.path().join("missing.place");
        assert!(run(&args(missing, arch, &out), &global()).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn malformed_netlist_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (arch, _) = write_inputs(dir.path());
        let net = dir.path().join("bad.net");
        std::fs::write(&net, ".latch x\npinlist: a\n").unwrap();
        let out = dir.path().join("bad.place");
        let err = run(&args(net.display().to_string(), arch, &out), &global()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
