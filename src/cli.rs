//! CLI argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use crate::coord::{Coordinate, CornerSet};
use crate::error::{GridError, Result};
use crate::geojson::AxisOrder;
use crate::grid::GridConfig;
use crate::logger::VerbosityLevel;
use crate::surface::{OverlayStyle, MAX_STROKE_WIDTH};

/// Output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// GeoJSON source document (`<name>.geojson`)
    Geojson,
    /// Map style document with source, fill and outline layers (`<name>.json`)
    Style,
    /// Rendered raster (`<name>.png`)
    Png,
}

/// Command line arguments for rhumb-grid.
#[derive(Parser, Debug)]
#[command(name = "rhumb-grid")]
#[command(version, about = "Lay a rhumb-line grid over a four-corner region", long_about = None)]
pub struct Args {
    /// Top-left corner as "latitude,longitude".
    #[arg(long, default_value = "24.049985023339868,37.74100146276254", allow_hyphen_values = true)]
    pub top_left: String,

    /// Top-right corner as "latitude,longitude".
    #[arg(long, default_value = "24.06134725897303,37.74061987222393", allow_hyphen_values = true)]
    pub top_right: String,

    /// Bottom-left corner as "latitude,longitude".
    #[arg(long, default_value = "24.049853721229447,37.738066888652696", allow_hyphen_values = true)]
    pub bottom_left: String,

    /// Bottom-right corner as "latitude,longitude".
    #[arg(long, default_value = "24.060932203545054,37.737708882231665", allow_hyphen_values = true)]
    pub bottom_right: String,

    /// Number of cell rows.
    #[arg(long, default_value_t = GridConfig::DEFAULT_ROWS, allow_negative_numbers = true)]
    pub rows: i64,

    /// Number of cell columns.
    #[arg(long, default_value_t = GridConfig::DEFAULT_COLUMNS, allow_negative_numbers = true)]
    pub columns: i64,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Geojson)]
    pub format: Format,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output filename without extension.
    #[arg(long, default_value = "grid")]
    pub output_name: String,

    /// Order of the values in emitted positions.
    #[arg(long, value_enum, default_value_t = AxisOrder::LatLon)]
    pub axis_order: AxisOrder,

    /// Fill color RGBA hex (e.g., "0080FF80").
    #[arg(long, default_value = "0080FF80")]
    pub fill: String,

    /// Outline color RGB hex (e.g., "000000").
    #[arg(long, default_value = "000000")]
    pub stroke: String,

    /// Outline width in pixels, 0 to 64 (0 hides the outline).
    #[arg(long, default_value = "2")]
    pub stroke_width: u32,

    /// Initial zoom level (style only, default: 16).
    #[arg(short, long)]
    pub zoom: Option<f64>,

    /// Pixel size in degrees (png only, default: 0.00001).
    #[arg(short, long)]
    pub resolution: Option<f64>,

    /// Only print written file paths.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Timestamped, detailed logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Fully validated configuration object.
#[derive(Debug)]
pub struct Config {
    pub corners: CornerSet,
    pub grid: GridConfig,
    pub format: Format,
    pub output_dir: PathBuf,
    pub output_name: String,
    pub axis: AxisOrder,
    /// Paint and zoom handed to the render surface.
    pub style: OverlayStyle,
    /// Degrees per pixel for PNG output.
    pub resolution: f64,
    pub verbosity: VerbosityLevel,
    pub no_color: bool,
}

pub const DEFAULT_RESOLUTION: f64 = 0.00001;

impl Args {
    /// Validates arguments and converts them to a structured `Config`.
    pub fn validate(self) -> Result<Config> {
        let grid = GridConfig::new(self.rows, self.columns)?;

        let corners = CornerSet::new(
            parse_coordinate("top-left", &self.top_left)?,
            parse_coordinate("top-right", &self.top_right)?,
            parse_coordinate("bottom-left", &self.bottom_left)?,
            parse_coordinate("bottom-right", &self.bottom_right)?,
        )?;

        let fill = parse_rgba(&self.fill)?;
        let stroke = parse_rgb(&self.stroke)?;

        if self.zoom.is_some() && self.format != Format::Style {
            return Err(GridError::InvalidFormatOption(
                "--zoom can only be used with style format".to_string(),
            ));
        }
        if self.resolution.is_some() && self.format != Format::Png {
            return Err(GridError::InvalidFormatOption(
                "--resolution can only be used with png format".to_string(),
            ));
        }

        if self.stroke_width > MAX_STROKE_WIDTH {
            return Err(GridError::InvalidStrokeWidth {
                width: self.stroke_width,
                max: MAX_STROKE_WIDTH,
            });
        }

        let defaults = OverlayStyle::default();
        let zoom = self.zoom.unwrap_or(defaults.zoom);
        if !(0.0..=24.0).contains(&zoom) {
            return Err(GridError::InvalidZoom(zoom));
        }

        let resolution = self.resolution.unwrap_or(DEFAULT_RESOLUTION);
        if !(resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }

        if self.output_name.trim().is_empty() {
            return Err(GridError::InvalidFormatOption(
                "--output-name must not be empty".to_string(),
            ));
        }

        Ok(Config {
            corners,
            grid,
            format: self.format,
            output_dir: self.output_dir,
            output_name: self.output_name,
            axis: self.axis_order,
            style: OverlayStyle {
                fill,
                stroke,
                stroke_width: self.stroke_width,
                zoom,
            },
            resolution,
            verbosity: VerbosityLevel::from_flags(self.quiet, self.verbose),
            no_color: self.no_color,
        })
    }
}

fn parse_coordinate(label: &str, s: &str) -> Result<Coordinate> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(GridError::InvalidCoordinateFormat(format!(
            "{}: expected \"latitude,longitude\", got {} values",
            label,
            parts.len()
        )));
    }

    let values: std::result::Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse()).collect();
    let values = values.map_err(|_| {
        GridError::InvalidCoordinateFormat(format!("{}: invalid number format in \"{}\"", label, s))
    })?;

    Ok(Coordinate::new(values[0], values[1]))
}

fn parse_rgba(s: &str) -> Result<[u8; 4]> {
    let bytes = hex::decode(s).map_err(|_| GridError::InvalidColor(s.to_string()))?;
    if bytes.len() != 4 {
        return Err(GridError::InvalidColor(format!(
            "RGBA color must be 8 hex digits, got {}",
            s.len()
        )));
    }
    Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn parse_rgb(s: &str) -> Result<[u8; 3]> {
    let bytes = hex::decode(s).map_err(|_| GridError::InvalidColor(s.to_string()))?;
    if bytes.len() != 3 {
        return Err(GridError::InvalidColor(format!(
            "RGB color must be 6 hex digits, got {}",
            s.len()
        )));
    }
    Ok([bytes[0], bytes[1], bytes[2]])
}
