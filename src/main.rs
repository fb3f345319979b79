use std::fs;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use finmorph::cli::{Cli, Command, CommonArgs};
use finmorph::data::loader::{load_specimens, LoadOptions};
use finmorph::data::model::{Metric, Specimen};
use finmorph::export::{report, spreadsheet};
use finmorph::ClassConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::GenerateSpreadsheets(args) => {
            let (specimens, metrics) = load(&args.common)?;
            spreadsheet::export_metrics(&specimens, &metrics, &args.output)
                .context("writing spreadsheets")?;
        }
        Command::GenerateReport(args) => {
            let (specimens, metrics) = load(&args.common)?;
            report::generate_report(&specimens, &metrics, &args.output, &args.title)
                .context("composing the report")?;
        }
    }
    Ok(())
}

fn load(common: &CommonArgs) -> anyhow::Result<(Vec<Specimen>, Vec<Metric>)> {
    let config = read_class_config(&common.config)?;
    let metrics = Metric::parse_list(&common.metrics)?;
    let options = LoadOptions {
        method_prefix: common.method_prefix.clone(),
        normalize: !common.no_normalize,
    };
    let specimens =
        load_specimens(&common.input, &config, &options).context("loading specimens")?;
    Ok((specimens, metrics))
}

/// `--config` accepts either inline JSON or a path to a JSON file.
fn read_class_config(arg: &str) -> anyhow::Result<ClassConfig> {
    let json = if arg.trim_start().starts_with('{') {
        arg.to_string()
    } else {
        fs::read_to_string(arg).with_context(|| format!("reading config file '{arg}'"))?
    };
    ClassConfig::from_json(&json).context("parsing class configuration")
}
