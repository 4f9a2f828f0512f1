//! `matcheck`: sweeps square sizes through an external matrix multiplier and checks every
//! product it prints against a reference product.

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process,
};

use anyhow::{bail, Context as _, Result};
use matcheck_core::{HarnessConfig, SweepMode, TrailingBlock};
use matcheck_harness::{
    case_io::{write_sweep_report, SweepReport},
    run_sweep,
};
use tracer::init_tracing;

const USAGE: &str = "\
Usage: matcheck [options]

Options:
  --exe=PATH              multiplier to invoke as `PATH m n p` (default ./main)
  --arg=VALUE             argument placed before the dimensions (repeatable)
  --min-size=N            first size of the sweep (default 2)
  --max-size=N            last size of the sweep, inclusive (default 128)
  --tolerance=X           absolute per-cell tolerance (default 1e-5)
  --rel-tolerance=X       relative per-cell tolerance (default 0)
  --max-mismatches=N      differing cells listed per failure (default 10)
  --collect-all           keep sweeping after a failing size
  --close-trailing-block  count output after the last `---` as a block
  --report-json=PATH      also write a JSON report of the sweep
  --help                  print this message";

fn main() -> Result<()> {
    init_tracing();

    let Some(config) = parse_options(env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let mut stdout = io::stdout().lock();
    let outcome = run_sweep(&config, &mut stdout)?;

    if let Some(ref path) = config.report_json {
        write_sweep_report(path, &SweepReport::new(&config, &outcome))?;
        tracing::info!(path = %path.display(), "wrote sweep report");
    }

    if !outcome.passed() {
        stdout.flush().context("failed to flush stdout")?;
        process::exit(outcome.exit_code());
    }
    Ok(())
}

/// Returns `None` when `--help` was requested.
fn parse_options<I>(args: I) -> Result<Option<HarnessConfig>>
where
    I: IntoIterator<Item = String>,
{
    let mut cfg = HarnessConfig::default();

    for arg in args {
        if let Some(value) = arg.strip_prefix("--exe=") {
            cfg.executable = PathBuf::from(value);
        } else if let Some(value) = arg.strip_prefix("--arg=") {
            cfg.leading_args.push(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--min-size=") {
            cfg.min_size = value.parse().context("invalid --min-size value")?;
        } else if let Some(value) = arg.strip_prefix("--max-size=") {
            cfg.max_size = value.parse().context("invalid --max-size value")?;
        } else if let Some(value) = arg.strip_prefix("--tolerance=") {
            cfg.tolerance.abs = value.parse().context("invalid --tolerance value")?;
        } else if let Some(value) = arg.strip_prefix("--rel-tolerance=") {
            cfg.tolerance.rel = value.parse().context("invalid --rel-tolerance value")?;
        } else if let Some(value) = arg.strip_prefix("--max-mismatches=") {
            cfg.max_reported_mismatches =
                value.parse().context("invalid --max-mismatches value")?;
        } else if let Some(value) = arg.strip_prefix("--report-json=") {
            cfg.report_json = Some(PathBuf::from(value));
        } else if arg == "--collect-all" {
            cfg.mode = SweepMode::CollectAll;
        } else if arg == "--close-trailing-block" {
            cfg.trailing_block = TrailingBlock::Close;
        } else if arg == "--help" || arg == "-h" {
            return Ok(None);
        } else {
            bail!("unrecognized argument: {arg}\n\n{USAGE}");
        }
    }

    cfg.validate().map_err(anyhow::Error::msg)?;
    Ok(Some(cfg))
}

mod tracer {
    use tracing_subscriber::EnvFilter;

    /// Logs go to stderr so the sweep report on stdout stays clean. `RUST_LOG` overrides `warn`.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_flags_gives_default_sweep() {
        let cfg = parse_options(Vec::new()).unwrap().unwrap();
        assert_eq!(cfg, HarnessConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = parse_options(args(&[
            "--exe=python3",
            "--arg=mm.py",
            "--min-size=4",
            "--max-size=16",
            "--tolerance=1e-3",
            "--collect-all",
            "--close-trailing-block",
            "--report-json=out/report.json",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.executable, PathBuf::from("python3"));
        assert_eq!(cfg.leading_args, vec!["mm.py".to_string()]);
        assert_eq!(cfg.sizes(), 4..=16);
        assert_eq!(cfg.tolerance.abs, 1e-3);
        assert_eq!(cfg.mode, SweepMode::CollectAll);
        assert_eq!(cfg.trailing_block, TrailingBlock::Close);
        assert_eq!(cfg.report_json, Some(PathBuf::from("out/report.json")));
    }

    #[test]
    fn rejects_unknown_flags_and_invalid_ranges() {
        assert!(parse_options(args(&["--verbose"])).is_err());
        assert!(parse_options(args(&["--min-size=abc"])).is_err());
        assert!(parse_options(args(&["--min-size=10", "--max-size=5"])).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse_options(args(&["--help"])).unwrap().is_none());
    }
}
