use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid grid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid {label} coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        label: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinateFormat(String),

    #[error("Invalid color format: {0}")]
    InvalidColor(String),

    #[error("Resolution must be positive, got: {0}")]
    InvalidResolution(f64),

    #[error("Zoom must be between 0 and 24, got: {0}")]
    InvalidZoom(f64),

    #[error("Stroke width must be at most {max} pixels, got: {width}")]
    InvalidStrokeWidth { width: u32, max: u32 },

    #[error("{0}")]
    InvalidFormatOption(String),

    #[error("Image dimensions too large: {width}x{height} pixels (max: {max})")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("Render surface error: {0}")]
    SurfaceState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::InvalidConfiguration("rows must be positive, got 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid grid configuration: rows must be positive, got 0"
        );
    }

    #[test]
    fn test_invalid_coordinate_display() {
        let err = GridError::InvalidCoordinate {
            label: "top-left".to_string(),
            latitude: 91.0,
            longitude: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid top-left coordinate: latitude 91, longitude 10"
        );
    }
}
