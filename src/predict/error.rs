use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {source_name}: {message}")]
    InvalidTle {
        source_name: String,
        message: String,
    },
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Geometry error: {0}")]
    Geometry(String),
    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),
}
