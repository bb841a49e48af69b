use chrono::{DateTime, Utc};

use crate::predict::error::PredictError;
use crate::predict::ground_station::{GroundStation, EARTH_E2, EARTH_RADIUS_KM};
use crate::predict::propagation::sidereal_angle;
use crate::predict::types::{GeocentricPosition, SubPoint, Topocentric};

const GEODETIC_MAX_ITERATIONS: usize = 10;
const GEODETIC_TOLERANCE_RAD: f64 = 1e-12;
const MIN_RANGE_KM: f64 = 1e-6;

/// Observer-relative and ground-track geometry for a propagated position.
pub trait GeometryProvider {
    /// Look angles from `station` to `satellite`, with the observer placed at
    /// `observed_at`.
    fn topocentric(
        &self,
        satellite: &GeocentricPosition,
        station: &GroundStation,
        observed_at: DateTime<Utc>,
    ) -> Result<Topocentric, PredictError>;

    fn sub_point(&self, satellite: &GeocentricPosition) -> SubPoint;
}

/// Rigid-Earth geometry on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarthGeometry;

impl GeometryProvider for EarthGeometry {
    fn topocentric(
        &self,
        satellite: &GeocentricPosition,
        station: &GroundStation,
        observed_at: DateTime<Utc>,
    ) -> Result<Topocentric, PredictError> {
        let gmst = sidereal_angle(observed_at);
        let sta_inertial = ecef_to_teme_position(station.position_ecef_km(), gmst);

        let dr_inertial = [
            satellite.position_km[0] - sta_inertial[0],
            satellite.position_km[1] - sta_inertial[1],
            satellite.position_km[2] - sta_inertial[2],
        ];
        let dr = teme_to_ecef_position(dr_inertial, gmst);
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        if !range_km.is_finite() || range_km < MIN_RANGE_KM {
            return Err(PredictError::Geometry(format!(
                "degenerate line of sight at {} (range {} km)",
                observed_at, range_km
            )));
        }

        let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = (up / range_km).clamp(-1.0, 1.0).asin().to_degrees();

        Ok(Topocentric {
            elevation_deg,
            azimuth_deg,
            range_km,
        })
    }

    fn sub_point(&self, satellite: &GeocentricPosition) -> SubPoint {
        ecef_to_geodetic(teme_to_ecef_position(
            satellite.position_km,
            satellite.gmst_rad,
        ))
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_teme_position(pos_ecef: [f64; 3], gmst: f64) -> [f64; 3] {
    teme_to_ecef_position(pos_ecef, -gmst)
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Iterative geodetic latitude/height for an Earth-fixed point.
pub fn ecef_to_geodetic(pos: [f64; 3]) -> SubPoint {
    let [x, y, z] = pos;
    let p = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - EARTH_E2));
    let mut height_km = 0.0;
    for _ in 0..GEODETIC_MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = EARTH_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        height_km = if lat.cos().abs() > 1e-10 {
            p / lat.cos() - n
        } else {
            // pole
            z.abs() - n * (1.0 - EARTH_E2)
        };
        let next = z.atan2(p * (1.0 - EARTH_E2 * n / (n + height_km)));
        let converged = (next - lat).abs() < GEODETIC_TOLERANCE_RAD;
        lat = next;
        if converged {
            break;
        }
    }

    SubPoint {
        lat_deg: lat.to_degrees(),
        lon_deg: lon.to_degrees(),
        height_m: height_km * 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ecef: [f64; 3], timestamp: DateTime<Utc>) -> GeocentricPosition {
        let gmst = sidereal_angle(timestamp);
        GeocentricPosition {
            timestamp,
            position_km: ecef_to_teme_position(ecef, gmst),
            gmst_rad: gmst,
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 1, 6, 30, 0).unwrap()
    }

    #[test]
    fn satellite_overhead_is_at_zenith() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let sat = at([EARTH_RADIUS_KM + 400.0, 0.0, 0.0], epoch());

        let topo = EarthGeometry.topocentric(&sat, &station, epoch()).unwrap();
        assert!((topo.elevation_deg - 90.0).abs() < 1e-4);
        assert!((topo.range_km - 400.0).abs() < 1e-6);

        let sub = EarthGeometry.sub_point(&sat);
        assert!(sub.lat_deg.abs() < 1e-9);
        assert!(sub.lon_deg.abs() < 1e-9);
        assert!((sub.height_m - 400_000.0).abs() < 1e-3);
    }

    #[test]
    fn look_angles_north_of_station() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let sat = at([EARTH_RADIUS_KM + 500.0, 0.0, 1000.0], epoch());

        let topo = EarthGeometry.topocentric(&sat, &station, epoch()).unwrap();
        assert!((topo.elevation_deg - 0.5_f64.atan().to_degrees()).abs() < 1e-6);
        assert!(topo.azimuth_deg < 1e-6 || topo.azimuth_deg > 360.0 - 1e-6);
        assert!((topo.range_km - 1_250_000.0_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn look_angles_east_below_horizon() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let sat = at([EARTH_RADIUS_KM - 100.0, 1000.0, 0.0], epoch());

        let topo = EarthGeometry.topocentric(&sat, &station, epoch()).unwrap();
        assert!(topo.elevation_deg < 0.0);
        assert!((topo.azimuth_deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn coincident_positions_fail() {
        let station = GroundStation::new(10.0, 20.0, 0.0);
        let sat = at(station.position_ecef_km(), epoch());
        let err = EarthGeometry
            .topocentric(&sat, &station, epoch())
            .unwrap_err();
        assert!(matches!(err, PredictError::Geometry(_)));
    }

    #[test]
    fn geodetic_round_trips_station() {
        let station = GroundStation::new(55.7522, 37.6156, 150.0);
        let sub = ecef_to_geodetic(station.position_ecef_km());
        assert!((sub.lat_deg - 55.7522).abs() < 1e-9);
        assert!((sub.lon_deg - 37.6156).abs() < 1e-9);
        assert!((sub.height_m - 150.0).abs() < 1e-3);
    }

    #[test]
    fn geodetic_at_pole() {
        let sub = ecef_to_geodetic([0.0, 0.0, 6356.752314 + 1.0]);
        assert!((sub.lat_deg - 90.0).abs() < 1e-9);
        assert!((sub.height_m - 1000.0).abs() < 1.0);
    }
}
