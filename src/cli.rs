use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

// ---------------------------------------------------------------------------
// Command line surface
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Morphometric spreadsheets and PDF reports from imaged fish specimens",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one CSV spreadsheet per metric into an output directory
    GenerateSpreadsheets(SpreadsheetArgs),
    /// Compose a PDF report with one charted section per metric
    GenerateReport(ReportArgs),
}

/// Arguments shared by both subcommands: where the measurements live and
/// which metrics to aggregate.
#[derive(Parser, Debug)]
pub struct CommonArgs {
    /// Class configuration: inline JSON (`{"class": ["specimen", ...]}`) or a
    /// path to a JSON file with the same shape
    #[arg(long)]
    pub config: String,

    /// Root directory holding one measurement directory per specimen
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub input: PathBuf,

    /// Metrics to include, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Area,Circularity,Volume,Surface,Width,Height,Length"
    )]
    pub metrics: Vec<String>,

    /// Filename prefix selecting the result file inside a specimen directory
    #[arg(long, default_value = "statistics")]
    pub method_prefix: String,

    /// Keep raw area values instead of dividing them by the fish volume
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_normalize: bool,
}

#[derive(Parser, Debug)]
pub struct SpreadsheetArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory the per-metric CSV files are written into (created if absent)
    #[arg(short, long, default_value = "spreadsheets", value_hint = ValueHint::DirPath)]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output PDF path
    #[arg(short, long, default_value = "report.pdf", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Title printed on the report's first page
    #[arg(long, default_value = "Morphometry report")]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn metrics_split_on_commas() {
        let cli = Cli::parse_from([
            "finmorph",
            "generate-report",
            "--config",
            "{}",
            "--input",
            "data",
            "--metrics",
            "Area,Volume",
        ]);
        match cli.command {
            Command::GenerateReport(args) => {
                assert_eq!(args.common.metrics, vec!["Area", "Volume"]);
                assert_eq!(args.title, "Morphometry report");
                assert!(!args.common.no_normalize);
            }
            _ => panic!("expected the report subcommand"),
        }
    }

    #[test]
    fn default_metric_list_is_complete() {
        let cli = Cli::parse_from([
            "finmorph",
            "generate-spreadsheets",
            "--config",
            "{}",
            "--input",
            "data",
        ]);
        match cli.command {
            Command::GenerateSpreadsheets(args) => {
                assert_eq!(
                    args.common.metrics,
                    vec![
                        "Area",
                        "Circularity",
                        "Volume",
                        "Surface",
                        "Width",
                        "Height",
                        "Length"
                    ]
                );
                assert_eq!(args.common.method_prefix, "statistics");
                assert_eq!(args.output, PathBuf::from("spreadsheets"));
            }
            _ => panic!("expected the spreadsheet subcommand"),
        }
    }
}
