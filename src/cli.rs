use crate::config::{JobConfig, LogConfig};
use crate::errors::{AppError, AppResult};
use crate::logging::init_logging;
use crate::models::{InputFormat, ParseMode};
use crate::pipeline::{export, load_table, output_for_path, run_job, JobSummary};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

fn build_command() -> Command<'static> {
    Command::new("tabular-etl")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("toml")
                .about("Run a job described by a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Parse, flatten and export files in one step")
                .after_help(
                    "The sink is chosen by the output extension (.csv, .xlsx, .parquet).\nExample:\n  tabular-etl convert people.xml -f xml -t Person -o out/people.csv",
                )
                .arg(
                    Arg::new("input")
                        .help("Input files, loaded in order")
                        .required(true)
                        .multiple_values(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("Input format: 'json' or 'xml'")
                        .default_value("json")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("record_tag")
                        .short('t')
                        .long("record-tag")
                        .help("Element name of one XML record")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Destination file")
                        .required(true)
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("index")
                        .long("index")
                        .help("Write a leading 0-based index column")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Parses command-line arguments and runs the selected subcommand.
///
/// - `toml`: loads a [`JobConfig`], initialises logging from its `[logging]`
///   section and runs it through [`run_job`].
/// - `convert`: strict parse of the given files, flatten, export by extension,
///   with default logging.
///
/// Without a subcommand the help text is printed.
pub fn cli() -> AppResult<()> {
    let mut cmd_for_help = build_command();
    let matches = build_command().get_matches();
    dispatch(&matches, &mut cmd_for_help)
}

fn dispatch(matches: &ArgMatches, cmd_for_help: &mut Command<'static>) -> AppResult<()> {
    match matches.subcommand() {
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("config path is required".into()))?;

            let config = JobConfig::from_toml_file(config_path)?;
            init_logging(&config.logging)?;
            info!(config = %config_path.display(), "Loaded job configuration");

            let summary = run_job(&config)?;
            print_summary(&summary);
        }
        Some(("convert", sub)) => {
            init_logging(&LogConfig::default())?;
            let summary = run_convert(sub)?;
            print_summary(&summary);
        }
        _ => {
            cmd_for_help.print_help()?;
        }
    }

    Ok(())
}

fn run_convert(sub: &ArgMatches) -> AppResult<JobSummary> {
    let inputs: Vec<PathBuf> = sub
        .get_many::<PathBuf>("input")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let format: InputFormat = sub
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json")
        .parse()?;
    let record_tag = sub.get_one::<String>("record_tag").map(String::as_str);
    let output_path = sub
        .get_one::<PathBuf>("output")
        .ok_or_else(|| AppError::InvalidInput("output path is required".into()))?;

    let index = sub.get_one::<bool>("index").copied().unwrap_or(false);
    let output = output_for_path(output_path, index)?;

    let df = load_table(&inputs, format, record_tag, ParseMode::Strict)?;
    export(&df, &output)?;

    Ok(JobSummary {
        files: inputs.len(),
        rows: df.height(),
        columns: df.width(),
        destination: output.destination(),
    })
}

fn print_summary(summary: &JobSummary) {
    info!(
        files = summary.files,
        rows = summary.rows,
        columns = summary.columns,
        destination = %summary.destination,
        "All operations completed successfully"
    );
}
