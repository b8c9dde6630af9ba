use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightMapError {
    #[error("Failed to read credentials file {path:?}: {source}")]
    Credentials {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Flight log is missing the '{0}' column")]
    MissingColumn(String),

    #[error("Row {row}: '{value}' is not a valid mileage")]
    InvalidMileage { row: usize, value: String },

    #[error("Row {row}: '{column}' is blank")]
    MissingCode { row: usize, column: String },

    #[error("No mileage field found for {origin}-{destination}; page layout may have changed")]
    MileageNotFound { origin: String, destination: String },

    #[error("Resolver returned 0 miles for {origin}-{destination}")]
    ZeroMileage { origin: String, destination: String },

    #[error("Mileage text '{0}' contains no digits")]
    MileageParse(String),

    #[error("Airport '{0}' has no known coordinates or country")]
    UnknownAirport(String),
}

pub type Result<T> = std::result::Result<T, FlightMapError>;
