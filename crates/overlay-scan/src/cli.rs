use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RecognizerBackend {
    Auto,
    Noop,
}

/// Which arguments came from the command line, as opposed to clap defaults.
/// File-config values must not be shadowed by defaults during merging.
#[derive(Debug, Default)]
pub struct CliSources {
    pub interval_from_cli: bool,
    pub start_time_from_cli: bool,
    pub end_time_from_cli: bool,
    pub confidence_threshold_from_cli: bool,
    pub recognizer_from_cli: bool,
}

impl CliSources {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            interval_from_cli: value_from_cli(matches, "interval"),
            start_time_from_cli: value_from_cli(matches, "start_time"),
            end_time_from_cli: value_from_cli(matches, "end_time"),
            confidence_threshold_from_cli: value_from_cli(matches, "confidence_threshold"),
            recognizer_from_cli: value_from_cli(matches, "recognizer"),
        }
    }
}

fn value_from_cli(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .is_some_and(|source| matches!(source, ValueSource::CommandLine))
}

pub fn parse_cli() -> (CliArgs, CliSources) {
    let command = CliArgs::command();
    let matches = command.get_matches();
    let args = match CliArgs::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    let sources = CliSources::from_matches(&matches);
    (args, sources)
}

#[derive(Debug, Parser)]
#[command(
    name = "overlay-scan",
    about = "Read telemetry overlay regions out of video frames into a CSV table",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Lock frame decoding to a specific backend implementation
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,

    /// Override the configuration file path
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Output path for the extracted table (CSV)
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the list of available frame-source backends
    #[arg(long = "list-backends")]
    pub list_backends: bool,

    /// Frames to advance between samples
    #[arg(
        long = "interval",
        id = "interval",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub interval: u32,

    /// Start of the extraction window, in seconds
    #[arg(long = "start-time", id = "start_time", default_value_t = 0.0)]
    pub start_time: f64,

    /// End of the extraction window, in seconds
    #[arg(long = "end-time", id = "end_time")]
    pub end_time: Option<f64>,

    /// Minimum recognizer confidence for a text value to be kept (0-1)
    #[arg(
        long = "confidence-threshold",
        id = "confidence_threshold",
        default_value_t = 0.3
    )]
    pub confidence_threshold: f64,

    /// Record each text region's recognizer confidence as an extra column
    #[arg(
        long = "record-confidence",
        value_parser = clap::value_parser!(bool)
    )]
    pub record_confidence: Option<bool>,

    /// Apply contrast adjustment and sharpening before recognition
    #[arg(
        long = "enhance-contrast",
        value_parser = clap::value_parser!(bool)
    )]
    pub enhance_contrast: Option<bool>,

    /// Preferred text recognizer backend
    #[arg(long = "recognizer", id = "recognizer", value_enum, default_value = "auto")]
    pub recognizer: RecognizerBackend,

    /// Input video path
    pub input: Option<PathBuf>,
}
