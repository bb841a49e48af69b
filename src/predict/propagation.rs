use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::tle_loader::ElementSet;
use crate::predict::types::GeocentricPosition;

/// Turns a timestamp into a geocentric satellite position.
pub trait Propagator {
    fn position_at(&self, timestamp: DateTime<Utc>) -> Result<GeocentricPosition, PredictError>;
}

pub struct SgpPropagator {
    elements: Elements,
    constants: Constants,
}

impl SgpPropagator {
    pub fn new(set: &ElementSet) -> Result<Self, PredictError> {
        let elements = set.elements()?;
        let constants =
            Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
                source_name: set.source.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u32 {
        self.elements.norad_id as u32
    }
}

impl Propagator for SgpPropagator {
    fn position_at(&self, timestamp: DateTime<Utc>) -> Result<GeocentricPosition, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        if prediction.position.iter().any(|c| !c.is_finite()) {
            return Err(PredictError::Propagation(format!(
                "non-finite position at {}",
                timestamp
            )));
        }

        Ok(GeocentricPosition {
            timestamp,
            position_km: prediction.position,
            gmst_rad: sidereal_angle(timestamp),
        })
    }
}

/// Greenwich sidereal angle in radians.
pub fn sidereal_angle(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}
