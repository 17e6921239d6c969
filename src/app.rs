//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - resolves settings (CLI, then environment, then defaults)
//! - dispatches to the shared pipeline

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{ChartArgs, Command, DataArgs, OutputArgs, ReportArgs, RunArgs, SampleArgs};
use crate::domain::{ChartConfig, DEFAULT_DATA_FILE, ReportConfig, SampleConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the campaign CSV path.
pub const ENV_DATA: &str = "INSIGHTS_DATA";
/// Environment variable holding the chart output directory.
pub const ENV_OUT_DIR: &str = "INSIGHTS_OUT_DIR";
/// Environment variable holding a TrueType font for chart text.
pub const ENV_FONT: &str = "INSIGHTS_FONT";

/// Entry point for the `insights` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `insights` and `insights --data x.csv` behave like `insights run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.verbose, cli.quiet);
    log::debug!("campaign-insights v{}", env!("CARGO_PKG_VERSION"));

    let font = cli.font.or_else(|| env_path(ENV_FONT));

    match cli.command {
        Command::Run(args) => handle_run(args, font),
        Command::Report(args) => handle_report(args),
        Command::Charts(args) => handle_charts(args, font),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_run(args: RunArgs, font: Option<PathBuf>) -> Result<(), AppError> {
    let config = run_config_from_args(&args, font);
    pipeline::run_report(&config)?;
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = ReportConfig {
        data_path: data_path(&args.data),
        print_reports: true,
        charts: None,
        export_json: args.export_json,
    };
    pipeline::run_report(&config)?;
    Ok(())
}

fn handle_charts(args: ChartArgs, font: Option<PathBuf>) -> Result<(), AppError> {
    let config = chart_config_from_args(&args.output, font);
    pipeline::run_charts(&data_path(&args.data), &config)?;
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args)?;
    let records = crate::data::generate_sample(&config)?;
    crate::data::write_sample_csv(&config.out, &records)?;
    println!(
        "Synthetic dataset written: {} ({} records, seed {})",
        config.out.display(),
        records.len(),
        config.seed
    );
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs, font: Option<PathBuf>) -> ReportConfig {
    ReportConfig {
        data_path: data_path(&args.data),
        print_reports: !args.no_report,
        charts: (!args.no_charts).then(|| chart_config_from_args(&args.output, font)),
        export_json: args.export_json.clone(),
    }
}

pub fn chart_config_from_args(args: &OutputArgs, font: Option<PathBuf>) -> ChartConfig {
    ChartConfig {
        out_dir: resolve_setting(args.out_dir.clone(), std::env::var(ENV_OUT_DIR).ok(), "."),
        dashboard_dpi: args.dpi,
        scatter_dpi: args.scatter_dpi,
        font,
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> Result<SampleConfig, AppError> {
    let start_date = crate::io::parse_date(&args.start)
        .map_err(|e| AppError::config(format!("Invalid --start: {e}")))?;
    Ok(SampleConfig {
        rows: args.rows,
        seed: args.seed,
        out: args.out.clone(),
        start_date,
    })
}

fn data_path(args: &DataArgs) -> PathBuf {
    resolve_setting(args.data.clone(), std::env::var(ENV_DATA).ok(), DEFAULT_DATA_FILE)
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}

/// CLI value, else non-empty environment value, else `default`.
fn resolve_setting(cli: Option<PathBuf>, env: Option<String>, default: &str) -> PathBuf {
    cli.or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Initialize logging based on verbosity level.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .ok();
}

/// Rewrite argv so `insights` defaults to `insights run`.
///
/// Rules:
/// - `insights`                     -> `insights run`
/// - `insights --data x.csv ...`    -> `insights run --data x.csv ...`
/// - `insights --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "report" | "charts" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_everything() {
        assert_eq!(rewrite_args(argv(&["insights"])), argv(&["insights", "run"]));
        assert_eq!(
            rewrite_args(argv(&["insights", "--data", "x.csv"])),
            argv(&["insights", "run", "--data", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            &["insights", "charts", "--dpi", "150"][..],
            &["insights", "--help"][..],
            &["insights", "-V"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn cli_beats_env_beats_default() {
        let cli = Some(PathBuf::from("cli.csv"));
        let env = Some("env.csv".to_string());
        assert_eq!(resolve_setting(cli, env.clone(), "d.csv"), PathBuf::from("cli.csv"));
        assert_eq!(resolve_setting(None, env, "d.csv"), PathBuf::from("env.csv"));
        assert_eq!(resolve_setting(None, Some("  ".to_string()), "d.csv"), PathBuf::from("d.csv"));
        assert_eq!(resolve_setting(None, None, "d.csv"), PathBuf::from("d.csv"));
    }

    #[test]
    fn rewritten_default_parses() {
        let cli =
            crate::cli::Cli::parse_from(rewrite_args(argv(&["insights", "-q", "--no-charts"])));
        assert!(cli.quiet);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.no_charts);
    }

    #[test]
    fn run_flags_drive_the_pipeline_stages() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "insights",
            "run",
            "--no-report",
            "--no-charts",
            "--export-json",
            "out.json",
        ]));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };

        let config = run_config_from_args(&args, None);
        assert!(!config.print_reports);
        assert!(config.charts.is_none());
        assert_eq!(config.export_json, Some(PathBuf::from("out.json")));

        let cli = crate::cli::Cli::parse_from(argv(&["insights", "run", "--dpi", "72"]));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = run_config_from_args(&args, None);
        assert!(config.print_reports);
        assert_eq!(config.charts.map(|c| c.dashboard_dpi), Some(72));
    }

    #[test]
    fn bad_sample_start_date_is_config_error() {
        let args = SampleArgs {
            rows: 10,
            seed: 1,
            start: "not a date".to_string(),
            out: PathBuf::from("x.csv"),
        };
        let err = sample_config_from_args(&args).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
