use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the mapprint binary.
#[derive(Debug, Parser)]
#[command(
    name = "mapprint",
    version,
    about = "Build and submit MapFish print requests from a map snapshot"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "MAPPRINT_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the request document built from a snapshot without submitting it.
    Render(RenderArgs),
    /// Submit a snapshot to the print service and wait for the document.
    Submit(SubmitArgs),
    /// List the layout selectors and the print apps they map to.
    Layouts,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Map snapshot JSON file.
    #[arg(value_name = "SNAPSHOT", value_hint = ValueHint::FilePath)]
    pub snapshot: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Map snapshot JSON file.
    #[arg(value_name = "SNAPSHOT", value_hint = ValueHint::FilePath)]
    pub snapshot: PathBuf,

    /// Save the rendered document here instead of printing its URL.
    #[arg(long, short, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the print service origin, e.g. <https://maps.example.com>.
    #[arg(long = "print-origin", value_name = "URL")]
    pub print_origin: Option<String>,

    /// Override the request body encoding (url_encoded|json).
    #[arg(long = "print-body-encoding", value_name = "ENCODING")]
    pub print_body_encoding: Option<String>,

    /// Override the tile catalog file.
    #[arg(long = "tile-catalog-file", value_name = "PATH")]
    pub tile_catalog_file: Option<PathBuf>,

    /// Override the maximum number of status checks (0 for no limit).
    #[arg(long = "poll-max-attempts", value_name = "COUNT")]
    pub poll_max_attempts: Option<u32>,

    /// Override the maximum polling time (0 for no limit).
    #[arg(long = "poll-max-elapsed-seconds", value_name = "SECONDS")]
    pub poll_max_elapsed_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
