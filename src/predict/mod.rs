mod classifier;
mod ephemeris;
mod error;
mod geometry;
mod ground_station;
mod light_time;
mod propagation;
mod segmenter;
mod sweep;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use geometry::EarthGeometry;
pub use ground_station::GroundStation;
pub use light_time::LightTimeMode;
pub use propagation::SgpPropagator;
pub use sweep::{run_sweep, GapPolicy, SweepOutcome, SweepParams};
pub use tle_loader::{parse_multi_tle, ElementSet};
pub use types::{EphemerisRecord, Pass};

#[cfg(test)]
pub(crate) use sweep::tests as sweep_tests;
#[cfg(test)]
pub(crate) use types::SubPoint;
#[cfg(test)]
pub(crate) use tle_loader::tests as tle_tests;
