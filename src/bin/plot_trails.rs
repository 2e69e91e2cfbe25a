use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use tracing::info;
use trailviz::config::{Config, RenderArgs};
use trailviz::pipeline::{export, overlay};

#[derive(Parser, Debug)]
#[command(author, version, about = "Overlay and plot multiple GPX tracks in 3D", long_about = None)]
struct Cli {
    /// GPX files (default: every *.gpx in the imports directory)
    #[arg(value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Shift every track so it starts at the same origin
    #[arg(long, action = ArgAction::SetTrue)]
    align: bool,

    /// Directory searched when no files are given
    #[arg(long, value_hint = ValueHint::DirPath)]
    imports: Option<PathBuf>,

    /// Output image (`.svg` or `.png`)
    #[arg(short, long, default_value = "trails.svg", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> Result<()> {
    trailviz::logging::init();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    config.output = cli.output;
    if let Some(dir) = cli.imports {
        config.imports_dir = dir;
    }
    cli.render.apply(&mut config.render)?;

    let files = if cli.files.is_empty() {
        overlay::discover_gpx_files(&config.imports_dir)
    } else {
        cli.files
    };
    if files.is_empty() {
        info!("No GPX files found to process.");
        return Ok(());
    }

    let batch = overlay::load_tracks(&files);
    if batch.tracks.is_empty() {
        info!("No valid tracks to plot.");
        return Ok(());
    }

    let scene = overlay::build_scene(overlay::OVERLAY_TITLE, &batch.tracks, cli.align);
    export::export_scene(&scene, &config.render, &config.output)?;
    Ok(())
}
