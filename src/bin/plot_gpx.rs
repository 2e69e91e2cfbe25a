use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueHint};
use tracing::{error, info};
use trailviz::config::{Config, RenderArgs};
use trailviz::pipeline::{export, overlay};
use trailviz::types::scene::{Scene, Trace};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot a 3D trail from a GPX file", long_about = None)]
struct Cli {
    /// GPX file to read
    #[arg(default_value = "default.gpx", value_hint = ValueHint::FilePath)]
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

    let track = match overlay::load_plottable_track(&config.input) {
        Ok(track) => track,
        Err(e) => {
            error!("{e}");
            return Ok(());
        }
    };
    if track.is_empty() {
        info!("No valid track points found in the file.");
        return Ok(());
    }

    let scene = Scene::new(
        format!("3D GPX Trail: {}", config.input.display()),
        vec![Trace::from_track(&track)],
        false,
    );
    export::export_scene(&scene, &config.render, &config.output)?;
    Ok(())
}
