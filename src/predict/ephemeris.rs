use crate::predict::types::{EphemerisRecord, GeometrySample};

/// Append-only trace of visible samples.
#[derive(Debug, Default)]
pub struct EphemerisCollector {
    records: Vec<EphemerisRecord>,
}

impl EphemerisCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pass_id: u32, sample: &GeometrySample) {
        self.records.push(EphemerisRecord {
            pass_id,
            timestamp: sample.timestamp,
            sub_point: sample.sub_point,
            elevation_deg: sample.elevation_deg,
            azimuth_deg: sample.azimuth_deg,
            range_km: sample.range_km,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn into_records(self) -> Vec<EphemerisRecord> {
        self.records
    }
}
