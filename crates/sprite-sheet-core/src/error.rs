use crate::model::Rect;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteSheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Could not decode pixels of '{name}': {reason}")]
    Decode { name: String, reason: String },
    #[error("Rectangle '{name}' {rect:?} lies outside the {width}x{height} raster")]
    OutOfBounds {
        name: String,
        rect: Rect,
        width: u32,
        height: u32,
    },
    #[error("Persistence {op} failed: {reason}")]
    Persistence { op: &'static str, reason: String },
    #[error("Background task failed: {0}")]
    Task(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, SpriteSheetError>;
