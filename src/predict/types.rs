use chrono::{DateTime, Utc};

/// One instant of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    pub timestamp: DateTime<Utc>,
    pub step_index: usize,
}

/// Satellite position in the true-equator mean-equinox frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocentricPosition {
    pub timestamp: DateTime<Utc>,
    pub position_km: [f64; 3],
    /// Greenwich sidereal angle at `timestamp`
    pub gmst_rad: f64,
}

impl GeocentricPosition {
    pub fn distance_km(&self) -> f64 {
        let [x, y, z] = self.position_km;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Observer-relative look angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topocentric {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Geodetic point directly below the satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub height_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySample {
    pub timestamp: DateTime<Utc>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
    pub sub_point: SubPoint,
    /// Delay applied to the observer side of the geometry
    pub light_time_sec: f64,
}

/// A closed visibility interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub pass_id: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub max_elevation_time: DateTime<Utc>,
    pub start_azimuth_deg: f64,
    pub end_azimuth_deg: f64,
    pub duration_sec: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub pass_id: u32,
    pub timestamp: DateTime<Utc>,
    pub sub_point: SubPoint,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}
