use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Args;

use crate::error::ConfigError;
use crate::pipeline::timestamp;
use crate::types::palette::parse_hex_color;
use crate::types::scene::RenderOptions;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Chicago;
pub const DEFAULT_IMPORTS_DIR: &str = "imports";

/// Everything an entry point needs, built once in `main` and handed down.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub timezone: Tz,
    pub epoch: DateTime<Utc>,
    pub imports_dir: PathBuf,
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("default.gpx"),
            output: PathBuf::from("trail.svg"),
            timezone: DEFAULT_TIMEZONE,
            epoch: timestamp::spreadsheet_epoch(),
            imports_dir: PathBuf::from(DEFAULT_IMPORTS_DIR),
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    /// Defaults, with `TRAILVIZ_*` variables applied where they parse.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(tz) = env("TRAILVIZ_TIMEZONE").and_then(|s| parse_timezone(&s).ok()) {
            config.timezone = tz;
        }
        if let Some(epoch) = env("TRAILVIZ_EPOCH").and_then(|s| parse_epoch(&s).ok()) {
            config.epoch = epoch;
        }
        if let Some(dir) = env("TRAILVIZ_IMPORTS_DIR") {
            config.imports_dir = PathBuf::from(dir);
        }
        if let Some(width) = env("TRAILVIZ_WIDTH").and_then(|s| s.parse().ok()) {
            config.render.width = width;
        }
        if let Some(height) = env("TRAILVIZ_HEIGHT").and_then(|s| s.parse().ok()) {
            config.render.height = height;
        }
        if let Some(background) = env("TRAILVIZ_BACKGROUND").and_then(|s| parse_background(&s).ok()) {
            config.render.background = background;
        }

        config
    }
}

/// Scene size and background flags shared by the plotting binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Background colour (`#RRGGBB[AA]` or `transparent`)
    #[arg(long)]
    pub background: Option<String>,
}

impl RenderArgs {
    pub fn apply(&self, options: &mut RenderOptions) -> Result<(), ConfigError> {
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(background) = self.background.as_deref() {
            options.background = parse_background(background)?;
        }
        Ok(())
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// IANA zone name, e.g. `America/Chicago`.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

pub fn parse_epoch(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ConfigError::InvalidEpoch(value.to_string()))
}

/// `transparent` or a `#RRGGBB[AA]` colour.
pub fn parse_background(value: &str) -> Result<Option<(u8, u8, u8, u8)>, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return Ok(None);
    }
    parse_hex_color(value)
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidBackground(value.to_string()))
}
