//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::poll::{
    DEFAULT_INITIAL_INTERVAL, DEFAULT_INTERVAL_CEILING, DEFAULT_INTERVAL_STEP, PollPolicy,
};
use crate::application::request::{DEFAULT_OVERVIEW_CENTER, OverviewDefaults};
use crate::application::transform::{
    DEFAULT_LEGEND_ICON_URL, DEFAULT_TOPMOST_TILE_SERVICE, DEFAULT_WMS_BASE_URL,
    DEFAULT_WMS_SERVER_TYPE, TransformOptions,
};
use crate::infra::http::{BodyEncoding, DEFAULT_PRINT_ORIGIN};

mod cli;

pub use cli::{CliArgs, Command, Overrides, RenderArgs, SubmitArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "mapprint";
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 120;
const DEFAULT_POLL_MAX_ELAPSED_SECS: u64 = 3600;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub print: PrintSettings,
    pub layers: LayerSettings,
    pub overview: OverviewDefaults,
    pub poll: PollPolicy,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct PrintSettings {
    pub origin: Url,
    pub body_encoding: BodyEncoding,
}

#[derive(Debug, Clone)]
pub struct LayerSettings {
    pub transform: TransformOptions,
    pub tile_catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("MAPPRINT").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Render(args) => raw.apply_overrides(&args.overrides),
        Command::Submit(args) => raw.apply_overrides(&args.overrides),
        Command::Layouts => {}
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    print: RawPrintSettings,
    layers: RawLayerSettings,
    overview: RawOverviewSettings,
    poll: RawPollSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(origin) = overrides.print_origin.as_ref() {
            self.print.origin = Some(origin.clone());
        }
        if let Some(encoding) = overrides.print_body_encoding.as_ref() {
            self.print.body_encoding = Some(encoding.clone());
        }
        if let Some(path) = overrides.tile_catalog_file.as_ref() {
            self.layers.tile_catalog_file = Some(path.clone());
        }
        if let Some(max) = overrides.poll_max_attempts {
            self.poll.max_attempts = Some(max);
        }
        if let Some(seconds) = overrides.poll_max_elapsed_seconds {
            self.poll.max_elapsed_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            print,
            layers,
            overview,
            poll,
            logging,
        } = raw;

        Ok(Self {
            print: build_print_settings(print)?,
            layers: build_layer_settings(layers)?,
            overview: build_overview_settings(overview),
            poll: build_poll_policy(poll)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_print_settings(print: RawPrintSettings) -> Result<PrintSettings, LoadError> {
    let origin_value = print
        .origin
        .unwrap_or_else(|| DEFAULT_PRINT_ORIGIN.to_string());
    let origin = Url::parse(origin_value.trim())
        .map_err(|err| LoadError::invalid("print.origin", format!("failed to parse: {err}")))?;
    if origin.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "print.origin",
            "must be an absolute http(s) URL",
        ));
    }

    let body_encoding = match print.body_encoding {
        Some(value) => BodyEncoding::from_str(value.trim())
            .map_err(|reason| LoadError::invalid("print.body_encoding", reason))?,
        None => BodyEncoding::default(),
    };

    Ok(PrintSettings {
        origin,
        body_encoding,
    })
}

fn build_layer_settings(layers: RawLayerSettings) -> Result<LayerSettings, LoadError> {
    let wms_base_url = non_empty(
        layers.wms_base_url,
        DEFAULT_WMS_BASE_URL,
        "layers.wms_base_url",
    )?;
    let wms_server_type = non_empty(
        layers.wms_server_type,
        DEFAULT_WMS_SERVER_TYPE,
        "layers.wms_server_type",
    )?;
    let legend_icon_url = non_empty(
        layers.legend_icon_url,
        DEFAULT_LEGEND_ICON_URL,
        "layers.legend_icon_url",
    )?;
    let topmost_tile_service = non_empty(
        layers.topmost_tile_service,
        DEFAULT_TOPMOST_TILE_SERVICE,
        "layers.topmost_tile_service",
    )?;

    let tile_catalog_file = layers
        .tile_catalog_file
        .filter(|path| !path.as_os_str().is_empty());

    Ok(LayerSettings {
        transform: TransformOptions {
            wms_base_url,
            wms_server_type,
            legend_icon_url,
            topmost_tile_service,
        },
        tile_catalog_file,
    })
}

fn build_overview_settings(overview: RawOverviewSettings) -> OverviewDefaults {
    OverviewDefaults {
        center: [
            overview.center_x.unwrap_or(DEFAULT_OVERVIEW_CENTER[0]),
            overview.center_y.unwrap_or(DEFAULT_OVERVIEW_CENTER[1]),
        ],
    }
}

fn build_poll_policy(poll: RawPollSettings) -> Result<PollPolicy, LoadError> {
    let initial_interval = poll
        .initial_interval_ms
        .map_or(DEFAULT_INITIAL_INTERVAL, Duration::from_millis);
    if initial_interval.is_zero() {
        return Err(LoadError::invalid(
            "poll.initial_interval_ms",
            "must be greater than zero",
        ));
    }

    let step = poll
        .step_ms
        .map_or(DEFAULT_INTERVAL_STEP, Duration::from_millis);

    let ceiling = poll
        .ceiling_ms
        .map_or(DEFAULT_INTERVAL_CEILING, Duration::from_millis);
    if ceiling < initial_interval {
        return Err(LoadError::invalid(
            "poll.ceiling_ms",
            "must not be lower than poll.initial_interval_ms",
        ));
    }

    let max_attempts = match poll.max_attempts.unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS) {
        0 => None,
        value => Some(value),
    };
    let max_elapsed = match poll
        .max_elapsed_seconds
        .unwrap_or(DEFAULT_POLL_MAX_ELAPSED_SECS)
    {
        0 => None,
        value => Some(Duration::from_secs(value)),
    };

    Ok(PollPolicy {
        initial_interval,
        step,
        ceiling,
        max_attempts,
        max_elapsed,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_empty(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid(key, "must not be empty"));
            }
            Ok(trimmed.to_string())
        }
        None => Ok(default.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPrintSettings {
    origin: Option<String>,
    body_encoding: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLayerSettings {
    wms_base_url: Option<String>,
    wms_server_type: Option<String>,
    legend_icon_url: Option<String>,
    topmost_tile_service: Option<String>,
    tile_catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOverviewSettings {
    center_x: Option<f64>,
    center_y: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPollSettings {
    initial_interval_ms: Option<u64>,
    step_ms: Option<u64>,
    ceiling_ms: Option<u64>,
    max_attempts: Option<u32>,
    max_elapsed_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}
