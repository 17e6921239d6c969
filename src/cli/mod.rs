//! Command-line parsing for the campaign insights tool.
//!
//! Parsing lives here; turning flags into `ReportConfig`/`ChartConfig`
//! (with `.env` fallbacks) happens in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "insights", version, about = "Marketing campaign performance reports and charts")]
pub struct Cli {
    /// Verbosity level (can be repeated: -v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TrueType font used for chart text (falls back to INSIGHTS_FONT, then system fonts).
    #[arg(long, global = true, value_name = "TTF")]
    pub font: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the dataset, print every report and render both charts.
    Run(RunArgs),
    /// Print the console reports only.
    Report(ReportArgs),
    /// Render the scatter chart and the dashboard only.
    ///
    /// A missing data file is reported and the command exits successfully
    /// without drawing anything.
    Charts(ChartArgs),
    /// Write a synthetic campaign dataset.
    Sample(SampleArgs),
}

/// Location of the campaign CSV.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Campaign CSV (falls back to INSIGHTS_DATA, then `datos_sinteticos.csv`).
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: Option<PathBuf>,
}

/// Where and how charts are written.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Output directory for PNG files (falls back to INSIGHTS_OUT_DIR, then `.`).
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Dashboard resolution in dots per inch.
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,

    /// Scatter chart resolution in dots per inch.
    #[arg(long, default_value_t = 100)]
    pub scatter_dpi: u32,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Skip chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Do not print the console reports (useful with --export-json).
    #[arg(long)]
    pub no_report: bool,

    /// Write the computed reports to a JSON file.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write the computed reports to a JSON file.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of campaign rows to generate.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub rows: usize,

    /// Random seed (same seed, same file).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First campaign date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE", default_value = "2024-01-01")]
    pub start: String,

    /// Output CSV path.
    #[arg(long, value_name = "CSV", default_value = "datos_sinteticos.csv")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["insights", "charts", "-vv", "--dpi", "150", "--data", "x.csv"]);
        assert_eq!(cli.verbose, 2);
        let Command::Charts(args) = cli.command else {
            panic!("expected charts");
        };
        assert_eq!(args.output.dpi, 150);
        assert_eq!(args.output.scatter_dpi, 100);
        assert_eq!(args.data.data, Some(PathBuf::from("x.csv")));
    }
}
