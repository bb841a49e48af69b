use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog returned status {status} for NORAD {norad_id}")]
    Status { status: u16, norad_id: u32 },
    #[error("no element set found for NORAD {0}")]
    NotFound(u32),
    #[error("catalog returned NORAD {found} when asked for {requested}")]
    Mismatch { requested: u32, found: u32 },
    #[error("invalid element set: {0}")]
    Invalid(#[from] PredictError),
}
