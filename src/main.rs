use std::fs;

use anyhow::Context;
use clap::Parser;

use rhumb_grid::cli::{Args, Config, Format};
use rhumb_grid::logger::{self, Logger};
use rhumb_grid::overlay::GridOverlay;
use rhumb_grid::render::PngSurface;
use rhumb_grid::surface::{GeoJsonFileSurface, OverlaySession, OverlayStyle, RenderSurface, StyleSurface};

fn main() {
    // Before init, the fallback logger still reports errors on stderr.
    let result = Args::parse()
        .validate()
        .map_err(anyhow::Error::from)
        .and_then(|config| {
            Logger::init(config.verbosity, config.no_color);
            run(&config)
        });

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    logger::info(&format!(
        "Building {} x {} grid",
        config.grid.rows(),
        config.grid.columns()
    ));
    let overlay = GridOverlay::compute(&config.corners, config.grid, config.axis)
        .context("failed to compute grid")?;
    logger::info(&format!(
        "{} cells, centered on {}, {}",
        overlay.cells.len(),
        overlay.center.latitude,
        overlay.center.longitude
    ));

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("failed to create output directory {}", config.output_dir.display())
    })?;

    let dir = config.output_dir.as_path();
    let name = config.output_name.as_str();
    match config.format {
        Format::Geojson => present(&mut GeoJsonFileSurface::new(dir, name), &overlay, &config.style),
        Format::Style => present(
            &mut StyleSurface::new(dir, name, config.axis),
            &overlay,
            &config.style,
        ),
        Format::Png => present(
            &mut PngSurface::new(dir, name, config.resolution, config.axis),
            &overlay,
            &config.style,
        ),
    }
    .with_context(|| format!("failed to write {:?} output", config.format))
}

fn present<S: RenderSurface>(
    surface: &mut S,
    overlay: &GridOverlay,
    style: &OverlayStyle,
) -> rhumb_grid::Result<()> {
    OverlaySession::attach(surface, overlay, style)?.finish()
}
