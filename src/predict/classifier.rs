use crate::predict::types::GeometrySample;

/// Inclusive elevation threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleClassifier {
    pub min_elevation_deg: f64,
}

impl SampleClassifier {
    pub fn new(min_elevation_deg: f64) -> Self {
        Self { min_elevation_deg }
    }

    pub fn is_visible(&self, sample: &GeometrySample) -> bool {
        sample.elevation_deg >= self.min_elevation_deg
    }
}
