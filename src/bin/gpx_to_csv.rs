use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum, ValueHint};
use tracing::{error, info, warn};
use trailviz::config::{self, Config};
use trailviz::pipeline::tabular::{self, CsvLayout};
use trailviz::pipeline::{overlay, parse};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert GPX track points to CSV", long_about = None)]
struct Cli {
    /// GPX file to read
    #[arg(default_value = "default.gpx", value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// CSV file to write
    #[arg(short, long, default_value = "output.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Derived time column: spreadsheet day serial or local wall-clock time
    #[arg(long, value_enum, default_value_t = TimeOpt::Excel)]
    time: TimeOpt,

    /// IANA zone used by `--time local`
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimeOpt {
    Excel,
    Local,
}

fn main() -> Result<()> {
    trailviz::logging::init();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    config.input = cli.input;
    config.output = cli.output;
    if let Some(name) = cli.timezone.as_deref() {
        config.timezone = config::parse_timezone(name)?;
    }

    let layout = match cli.time {
        TimeOpt::Excel => CsvLayout::SpreadsheetSerial {
            epoch: config.epoch,
        },
        TimeOpt::Local => CsvLayout::LocalTime {
            zone: config.timezone,
        },
    };

    let extraction = match parse::parse_file(&config.input) {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("{e}");
            return Ok(());
        }
    };
    overlay::report_skipped(&config.input, &extraction.skipped);

    let summary = tabular::write_csv_file(&config.output, &extraction.points, &layout)?;
    for idx in &summary.invalid_timestamps {
        warn!(
            "Could not convert timestamp {:?} on row {}",
            extraction.points[*idx].time.as_deref().unwrap_or_default(),
            idx + 1
        );
    }
    info!(
        "Data written to {}. Rows: {}",
        config.output.display(),
        summary.rows
    );
    Ok(())
}
