use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::predict::error::PredictError;
use crate::predict::geometry::GeometryProvider;
use crate::predict::ground_station::GroundStation;
use crate::predict::propagation::Propagator;
use crate::predict::types::GeometrySample;

pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Which distance drives the signal travel-time delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LightTimeMode {
    /// Satellite-to-observer line of sight
    #[default]
    Observer,
    /// Satellite distance from the Earth's centre
    Geocentric,
    Off,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LightTimeCorrector {
    pub mode: LightTimeMode,
}

impl LightTimeCorrector {
    pub fn new(mode: LightTimeMode) -> Self {
        Self { mode }
    }

    /// Propagate to `timestamp` and evaluate the observer geometry with the
    /// observer shifted back by the light travel time.
    pub fn observe<P, G>(
        &self,
        propagator: &P,
        geometry: &G,
        station: &GroundStation,
        timestamp: DateTime<Utc>,
    ) -> Result<GeometrySample, PredictError>
    where
        P: Propagator + ?Sized,
        G: GeometryProvider + ?Sized,
    {
        let satellite = propagator.position_at(timestamp)?;

        let (topo, light_time_sec) = match self.mode {
            LightTimeMode::Off => (geometry.topocentric(&satellite, station, timestamp)?, 0.0),
            LightTimeMode::Geocentric => {
                let delay = satellite.distance_km() / SPEED_OF_LIGHT_KM_S;
                let observed_at = timestamp - light_delay(delay);
                (geometry.topocentric(&satellite, station, observed_at)?, delay)
            }
            LightTimeMode::Observer => {
                let geometric = geometry.topocentric(&satellite, station, timestamp)?;
                let delay = geometric.range_km / SPEED_OF_LIGHT_KM_S;
                let observed_at = timestamp - light_delay(delay);
                (geometry.topocentric(&satellite, station, observed_at)?, delay)
            }
        };

        Ok(GeometrySample {
            timestamp,
            elevation_deg: topo.elevation_deg,
            azimuth_deg: topo.azimuth_deg,
            range_km: topo.range_km,
            sub_point: geometry.sub_point(&satellite),
            light_time_sec,
        })
    }
}

fn light_delay(seconds: f64) -> Duration {
    Duration::nanoseconds((seconds * 1e9).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::types::{GeocentricPosition, SubPoint, Topocentric};
    use chrono::TimeZone;
    use std::cell::RefCell;

    struct FixedPropagator;

    impl Propagator for FixedPropagator {
        fn position_at(&self, timestamp: DateTime<Utc>) -> Result<GeocentricPosition, PredictError> {
            Ok(GeocentricPosition {
                timestamp,
                position_km: [29_979.2458, 0.0, 0.0],
                gmst_rad: 0.0,
            })
        }
    }

    #[derive(Default)]
    struct RecordingGeometry {
        calls: RefCell<Vec<DateTime<Utc>>>,
    }

    impl GeometryProvider for RecordingGeometry {
        fn topocentric(
            &self,
            _satellite: &GeocentricPosition,
            _station: &GroundStation,
            observed_at: DateTime<Utc>,
        ) -> Result<Topocentric, PredictError> {
            self.calls.borrow_mut().push(observed_at);
            Ok(Topocentric {
                elevation_deg: 45.0,
                azimuth_deg: 180.0,
                range_km: 2_997.924_58,
            })
        }

        fn sub_point(&self, _satellite: &GeocentricPosition) -> SubPoint {
            SubPoint {
                lat_deg: 1.0,
                lon_deg: 2.0,
                height_m: 3.0,
            }
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap()
    }

    fn observe(mode: LightTimeMode) -> (GeometrySample, Vec<DateTime<Utc>>) {
        let geometry = RecordingGeometry::default();
        let sample = LightTimeCorrector::new(mode)
            .observe(
                &FixedPropagator,
                &geometry,
                &GroundStation::new(0.0, 0.0, 0.0),
                t0(),
            )
            .unwrap();
        (sample, geometry.calls.into_inner())
    }

    #[test]
    fn off_uses_sweep_time() {
        let (sample, calls) = observe(LightTimeMode::Off);
        assert_eq!(calls, vec![t0()]);
        assert_eq!(sample.light_time_sec, 0.0);
    }

    #[test]
    fn observer_mode_uses_line_of_sight_range() {
        let (sample, calls) = observe(LightTimeMode::Observer);
        assert_eq!(calls, vec![t0(), t0() - Duration::milliseconds(10)]);
        assert!((sample.light_time_sec - 0.01).abs() < 1e-12);
        assert_eq!(sample.timestamp, t0());
    }

    #[test]
    fn geocentric_mode_uses_earth_centre_distance() {
        let (sample, calls) = observe(LightTimeMode::Geocentric);
        assert_eq!(calls, vec![t0() - Duration::milliseconds(100)]);
        assert!((sample.light_time_sec - 0.1).abs() < 1e-12);
    }

    #[test]
    fn sample_carries_geometry() {
        let (sample, _) = observe(LightTimeMode::Observer);
        assert_eq!(sample.elevation_deg, 45.0);
        assert_eq!(sample.azimuth_deg, 180.0);
        assert_eq!(sample.sub_point.height_m, 3.0);
    }

    #[test]
    fn mode_names() {
        assert_eq!(LightTimeMode::Observer.to_string(), "observer");
        assert_eq!(LightTimeMode::default(), LightTimeMode::Observer);
        let mode: LightTimeMode = serde_yaml::from_str("geocentric").unwrap();
        assert_eq!(mode, LightTimeMode::Geocentric);
    }
}
