use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::predict::classifier::SampleClassifier;
use crate::predict::ephemeris::EphemerisCollector;
use crate::predict::error::PredictError;
use crate::predict::geometry::GeometryProvider;
use crate::predict::ground_station::GroundStation;
use crate::predict::light_time::{LightTimeCorrector, LightTimeMode};
use crate::predict::propagation::Propagator;
use crate::predict::segmenter::PassSegmenter;
use crate::predict::types::{EphemerisRecord, Pass, TimeStep};

/// What a step without geometry does to an open pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GapPolicy {
    /// Keep the pass open; only computed samples change visibility
    #[default]
    Bridge,
    /// Close the pass at the last computed sample
    Close,
}

#[derive(Debug, Clone)]
pub struct SweepParams {
    pub start: DateTime<Utc>,
    /// Inclusive
    pub end: DateTime<Utc>,
    pub step: Duration,
    pub min_elevation_deg: f64,
    pub light_time: LightTimeMode,
    pub gap_policy: GapPolicy,
}

impl SweepParams {
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.step <= Duration::zero() {
            return Err(PredictError::InvalidSweep(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.end < self.start {
            return Err(PredictError::InvalidSweep(format!(
                "end {} is before start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    pub fn time_steps(&self) -> TimeSteps {
        TimeSteps {
            cursor: self.start,
            end: self.end,
            step: self.step,
            index: 0,
        }
    }
}

/// Uniform instants from start to end inclusive.
pub struct TimeSteps {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    index: usize,
}

impl Iterator for TimeSteps {
    type Item = TimeStep;

    fn next(&mut self) -> Option<TimeStep> {
        if self.cursor > self.end || self.step <= Duration::zero() {
            return None;
        }
        let step = TimeStep {
            timestamp: self.cursor,
            step_index: self.index,
        };
        self.cursor = match self.cursor.checked_add_signed(self.step) {
            Some(next) => next,
            None => {
                self.step = Duration::zero();
                self.cursor
            }
        };
        self.index += 1;
        Some(step)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    pub passes: Vec<Pass>,
    pub ephemeris: Vec<EphemerisRecord>,
    pub total_passes: u32,
    pub evaluated_steps: usize,
    pub skipped_steps: usize,
}

/// Walk the time range and segment the visible samples into passes.
///
/// Steps whose geometry cannot be computed are logged and skipped; what they
/// do to an open pass depends on `params.gap_policy`.
pub fn run_sweep<P, G>(
    propagator: &P,
    geometry: &G,
    station: &GroundStation,
    params: &SweepParams,
) -> Result<SweepOutcome, PredictError>
where
    P: Propagator + ?Sized,
    G: GeometryProvider + ?Sized,
{
    params.validate()?;

    let corrector = LightTimeCorrector::new(params.light_time);
    let classifier = SampleClassifier::new(params.min_elevation_deg);
    let mut segmenter = PassSegmenter::new();
    let mut collector = EphemerisCollector::new();
    let mut evaluated_steps = 0;
    let mut skipped_steps = 0;

    for step in params.time_steps() {
        let sample = match corrector.observe(propagator, geometry, station, step.timestamp) {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!(
                    "Skipping step {} at {}: {}",
                    step.step_index,
                    step.timestamp,
                    e
                );
                skipped_steps += 1;
                if params.gap_policy == GapPolicy::Close {
                    if let Some(id) = segmenter.interrupt() {
                        log::debug!("Pass {} closed by failed step at {}", id, step.timestamp);
                    }
                }
                continue;
            }
        };
        evaluated_steps += 1;
        log::trace!(
            "Step {} at {}: el {:.3} az {:.3} range {:.1} km, light time {:.6} s",
            step.step_index,
            step.timestamp,
            sample.elevation_deg,
            sample.azimuth_deg,
            sample.range_km,
            sample.light_time_sec
        );

        let visible = classifier.is_visible(&sample);
        if let Some(pass_id) = segmenter.advance(&sample, visible) {
            collector.record(pass_id, &sample);
        }
    }

    let ephemeris_len = collector.len();
    let (passes, total_passes) = segmenter.finish();

    log::info!(
        "Sweep {} -> {}: {} passes, {} ephemeris records, {} steps evaluated, {} skipped",
        params.start,
        params.end,
        total_passes,
        ephemeris_len,
        evaluated_steps,
        skipped_steps
    );

    Ok(SweepOutcome {
        passes,
        ephemeris: collector.into_records(),
        total_passes,
        evaluated_steps,
        skipped_steps,
    })
}
