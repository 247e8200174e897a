use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No network data for any sub-polygon of the area")]
    NoNetworkData,
    #[error("Area boundary contains no valid polygon")]
    EmptyBoundary,
    #[error("No centerlines could be extracted from the corridor")]
    NoCenterlines,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Unrecoverable error: {0}")]
    UnrecoverableError(&'static str),
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::GeoJsonError(e.to_string())
    }
}
