//! Output documents for a sweep.
//!
//! Everything in here is a plain value built once from the sweep outcome.
//! Numbers are rounded exactly once, while the documents are assembled.

mod error;
mod writer;

pub use error::ReportError;
pub use writer::write_json;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::{
    EphemerisRecord, GapPolicy, GroundStation, LightTimeMode, Pass, SweepOutcome, SweepParams,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObserverInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationInfo {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step_seconds: f64,
    pub min_elevation_deg: f64,
    pub light_time: LightTimeMode,
    pub gap_policy: GapPolicy,
    pub utc_calculated: DateTime<Utc>,
}

/// Identity of the run, shared by both reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetadata {
    pub satellite: SatelliteInfo,
    pub observer: ObserverInfo,
    pub calculation: CalculationInfo,
}

impl RunMetadata {
    pub fn new(
        satellite: SatelliteInfo,
        station: &GroundStation,
        station_name: Option<String>,
        params: &SweepParams,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            satellite,
            observer: ObserverInfo {
                name: station_name,
                latitude: station.latitude_deg,
                longitude: station.longitude_deg,
                elevation_m: station.altitude_m,
            },
            calculation: CalculationInfo {
                start: params.start,
                end: params.end,
                step_seconds: params.step.as_seconds_f64(),
                min_elevation_deg: params.min_elevation_deg,
                light_time: params.light_time,
                gap_policy: params.gap_policy,
                utc_calculated: calculated_at,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassStatistics {
    pub total_passes: u32,
    /// Seconds
    pub visible_time_total: f64,
    pub evaluated_steps: usize,
    pub skipped_steps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassEntry {
    pub pass_id: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub max_elevation: f64,
    pub max_elevation_time: DateTime<Utc>,
    pub start_azimuth: f64,
    pub end_azimuth: f64,
    pub duration_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassesReport {
    pub metadata: RunMetadata,
    pub statistics: PassStatistics,
    pub passes: Vec<PassEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub height_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopocentricEntry {
    pub elevation: f64,
    pub azimuth: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EphemerisEntry {
    pub pass_id: u32,
    pub timestamp: DateTime<Utc>,
    pub geodetic: Geodetic,
    pub topocentric: TopocentricEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EphemerisReport {
    pub metadata: RunMetadata,
    pub ephemeris: Vec<EphemerisEntry>,
}

/// Build both reports from a finished sweep.
pub fn assemble(metadata: &RunMetadata, outcome: &SweepOutcome) -> (PassesReport, EphemerisReport) {
    let visible_time_total: f64 = outcome.passes.iter().map(|p| p.duration_sec).sum();

    let passes = PassesReport {
        metadata: metadata.clone(),
        statistics: PassStatistics {
            total_passes: outcome.total_passes,
            visible_time_total: round(visible_time_total, 1),
            evaluated_steps: outcome.evaluated_steps,
            skipped_steps: outcome.skipped_steps,
        },
        passes: outcome.passes.iter().map(pass_entry).collect(),
    };

    let ephemeris = EphemerisReport {
        metadata: metadata.clone(),
        ephemeris: outcome.ephemeris.iter().map(ephemeris_entry).collect(),
    };

    (passes, ephemeris)
}

fn pass_entry(pass: &Pass) -> PassEntry {
    PassEntry {
        pass_id: pass.pass_id,
        start: pass.start_time,
        end: pass.end_time,
        max_elevation: round(pass.max_elevation_deg, 2),
        max_elevation_time: pass.max_elevation_time,
        start_azimuth: round(pass.start_azimuth_deg, 2),
        end_azimuth: round(pass.end_azimuth_deg, 2),
        duration_sec: round(pass.duration_sec, 1),
    }
}

fn ephemeris_entry(record: &EphemerisRecord) -> EphemerisEntry {
    EphemerisEntry {
        pass_id: record.pass_id,
        timestamp: record.timestamp,
        geodetic: Geodetic {
            latitude: round(record.sub_point.lat_deg, 6),
            longitude: round(record.sub_point.lon_deg, 6),
            height_m: round(record.sub_point.height_m, 2),
        },
        topocentric: TopocentricEntry {
            elevation: round(record.elevation_deg, 3),
            azimuth: round(record.azimuth_deg, 3),
            distance_km: round(record.range_km, 3),
        },
    }
}

fn round(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::sweep_tests::{params, t0, SyntheticGeometry, SyntheticPropagator};
    use crate::predict::{run_sweep, SubPoint};
    use chrono::Duration;
    use std::collections::HashSet;
    use std::f64::consts::PI;

    fn metadata(params: &SweepParams) -> RunMetadata {
        RunMetadata::new(
            SatelliteInfo {
                name: "ISS (ZARYA)".into(),
                norad_id: 25544,
                tle_source: "inline".into(),
            },
            &GroundStation::new(55.7522, 37.6156, 150.0),
            Some("Moscow".into()),
            params,
            t0() + Duration::days(1),
        )
    }

    fn wave(secs: f64) -> f64 {
        12.345_678_9 * (2.0 * PI * secs / 1800.0).sin()
    }

    fn reports(params: &SweepParams) -> (PassesReport, EphemerisReport) {
        let outcome = run_sweep(
            &SyntheticPropagator::default(),
            &SyntheticGeometry { elevation: wave },
            &GroundStation::new(55.7522, 37.6156, 150.0),
            params,
        )
        .unwrap();
        assemble(&metadata(params), &outcome)
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round(1.23456789, 6), 1.234568);
        assert_eq!(round(-1.2345, 2), -1.23);
        assert_eq!(round(359.9996, 3), 360.0);
        assert_eq!(round(0.25, 1), 0.3);
    }

    #[test]
    fn assembles_statistics() {
        let p = params(90, 60, 0.0);
        let (passes, ephemeris) = reports(&p);

        assert_eq!(passes.statistics.total_passes, 3);
        assert_eq!(passes.passes.len(), 3);
        let total: f64 = passes.passes.iter().map(|p| p.duration_sec).sum();
        assert!((passes.statistics.visible_time_total - total).abs() < 1e-9);
        assert_eq!(passes.statistics.skipped_steps, 0);
        assert_eq!(passes.metadata, ephemeris.metadata);
        // the crest at 450 s falls between samples; 420 s is the highest one
        assert_eq!(passes.passes[0].max_elevation, 12.28);
    }

    #[test]
    fn ephemeris_values_are_rounded() {
        let outcome = SweepOutcome {
            passes: vec![Pass {
                pass_id: 1,
                start_time: t0(),
                end_time: t0(),
                max_elevation_deg: 45.678_9,
                max_elevation_time: t0(),
                start_azimuth_deg: 123.456_7,
                end_azimuth_deg: 123.456_7,
                duration_sec: 0.0,
            }],
            ephemeris: vec![EphemerisRecord {
                pass_id: 1,
                timestamp: t0(),
                sub_point: SubPoint {
                    lat_deg: 55.123_456_789,
                    lon_deg: -37.987_654_321,
                    height_m: 420_123.456_7,
                },
                elevation_deg: 45.678_9,
                azimuth_deg: 123.456_7,
                range_km: 567.891_23,
            }],
            total_passes: 1,
            evaluated_steps: 1,
            skipped_steps: 0,
        };
        let (passes, ephemeris) = assemble(&metadata(&params(1, 60, 0.0)), &outcome);

        let pass = &passes.passes[0];
        assert_eq!(pass.max_elevation, 45.68);
        assert_eq!(pass.start_azimuth, 123.46);

        let entry = &ephemeris.ephemeris[0];
        assert_eq!(entry.geodetic.latitude, 55.123457);
        assert_eq!(entry.geodetic.longitude, -37.987654);
        assert_eq!(entry.geodetic.height_m, 420123.46);
        assert_eq!(entry.topocentric.elevation, 45.679);
        assert_eq!(entry.topocentric.azimuth, 123.457);
        assert_eq!(entry.topocentric.distance_km, 567.891);
    }

    #[test]
    fn reports_are_byte_identical_across_runs() {
        let p = params(120, 20, 1.0);
        let (passes_a, ephemeris_a) = reports(&p);
        let (passes_b, ephemeris_b) = reports(&p);
        assert_eq!(
            serde_json::to_string_pretty(&passes_a).unwrap(),
            serde_json::to_string_pretty(&passes_b).unwrap()
        );
        assert_eq!(
            serde_json::to_string_pretty(&ephemeris_a).unwrap(),
            serde_json::to_string_pretty(&ephemeris_b).unwrap()
        );
    }

    #[test]
    fn every_record_belongs_to_one_pass() {
        let (passes, ephemeris) = reports(&params(180, 30, 3.0));
        let ids: HashSet<u32> = passes.passes.iter().map(|p| p.pass_id).collect();
        assert_eq!(ids.len(), passes.passes.len());
        assert_eq!(
            ids,
            (1..=passes.statistics.total_passes).collect::<HashSet<_>>()
        );
        assert!(ephemeris.ephemeris.iter().all(|e| ids.contains(&e.pass_id)));
    }

    #[test]
    fn serialized_layout() {
        let (passes, ephemeris) = reports(&params(30, 60, 0.0));
        let passes = serde_json::to_value(&passes).unwrap();
        let ephemeris = serde_json::to_value(&ephemeris).unwrap();

        let meta = &passes["metadata"];
        assert_eq!(meta["satellite"]["norad_id"], 25544);
        assert_eq!(meta["observer"]["name"], "Moscow");
        assert_eq!(meta["calculation"]["step_seconds"], 60.0);
        assert_eq!(meta["calculation"]["light_time"], "observer");
        assert_eq!(meta["calculation"]["gap_policy"], "bridge");
        assert_eq!(meta["calculation"]["start"], "2023-10-01T00:00:00Z");
        assert_eq!(passes["statistics"]["total_passes"], 1);
        assert_eq!(passes["passes"][0]["start"], "2023-10-01T00:00:00Z");

        let first = &ephemeris["ephemeris"][0];
        assert_eq!(first["pass_id"], 1);
        assert!(first["geodetic"]["latitude"].is_f64());
        assert!(first["topocentric"]["distance_km"].is_f64());
    }

    #[test]
    fn sub_millisecond_step_is_kept() {
        let mut p = params(1, 60, 0.0);
        p.step = Duration::microseconds(500);
        let meta = metadata(&p);
        assert_eq!(meta.calculation.step_seconds, 0.0005);
    }

    #[test]
    fn skipped_steps_are_reported() {
        let p = params(10, 60, 0.0);
        let propagator = SyntheticPropagator {
            failing: HashSet::from([t0() + Duration::minutes(3)]),
        };
        let outcome = run_sweep(
            &propagator,
            &SyntheticGeometry { elevation: |_| 5.0 },
            &GroundStation::new(0.0, 0.0, 0.0),
            &p,
        )
        .unwrap();
        let (passes, ephemeris) = assemble(&metadata(&p), &outcome);
        assert_eq!(passes.statistics.skipped_steps, 1);
        assert_eq!(passes.statistics.evaluated_steps, 10);
        assert_eq!(passes.statistics.total_passes, 1);
        assert_eq!(passes.passes[0].duration_sec, 600.0);
        assert_eq!(ephemeris.ephemeris.len(), 10);
    }
}
