use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueHint};
use tracing::{error, info, warn};
use trailviz::config::{Config, RenderArgs};
use trailviz::pipeline::{export, tabular};
use trailviz::types::scene::{Scene, Trace};
use trailviz::types::track::Track;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot a 3D trail from a CSV file", long_about = None)]
struct Cli {
    /// CSV file to read
    #[arg(default_value = "output.csv", value_hint = ValueHint::FilePath)]
    filename: PathBuf,

    /// Output image (`.svg` or `.png`)
    #[arg(short, long, default_value = "trail.svg", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> Result<()> {
    trailviz::logging::init();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    config.input = cli.filename;
    config.output = cli.output;
    cli.render.apply(&mut config.render)?;

    let read = match tabular::read_csv_file(&config.input) {
        Ok(read) => read,
        Err(e) => {
            error!("{e}");
            return Ok(());
        }
    };
    for row in &read.skipped {
        warn!("Skipped row {} of {}: {}", row.row, config.input.display(), row.reason);
    }
    if read.points.is_empty() {
        info!("No valid data points found in the file.");
        return Ok(());
    }

    let track = Track::from_path(&config.input, read.points);
    let scene = Scene::new(
        format!("3D Trail: {}", config.input.display()),
        vec![Trace::from_track(&track)],
        false,
    );
    export::export_scene(&scene, &config.render, &config.output)?;
    Ok(())
}
