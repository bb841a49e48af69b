use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::{resolve_satellite_name, CatalogClient, CatalogError};
use crate::config::{ConfigError, JobConfig, TargetConfig, TargetSource};
use crate::predict::{run_sweep, EarthGeometry, ElementSet, PredictError, SgpPropagator};
use crate::report::{
    assemble, write_json, EphemerisReport, PassesReport, ReportError, RunMetadata, SatelliteInfo,
};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("NORAD {0} needs a catalog lookup but catalog access is disabled")]
    Offline(u32),
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

pub async fn load_elements<C: CatalogClient>(
    target: &TargetConfig,
    catalog: Option<&C>,
) -> Result<ElementSet, JobError> {
    let set = match target.source()? {
        TargetSource::Inline(text) => ElementSet::from_text(&text, "inline")?,
        TargetSource::File(path) => ElementSet::from_file(&path)?,
        TargetSource::Catalog(norad_id) => {
            let catalog = catalog.ok_or(JobError::Offline(norad_id))?;
            catalog.fetch_elements(norad_id).await?
        }
    };
    Ok(set)
}

/// Resolve the target, run the sweep and assemble both reports.
pub async fn run_job<C: CatalogClient>(
    job: &JobConfig,
    catalog: Option<&C>,
    calculated_at: DateTime<Utc>,
) -> Result<(PassesReport, EphemerisReport), JobError> {
    let station = job.station()?;
    let params = job.sweep_params()?;

    let set = load_elements(&job.target, catalog).await?;
    let propagator = SgpPropagator::new(&set)?;
    let norad_id = propagator.norad_id();
    let name = resolve_satellite_name(job.target.name.as_deref(), &set, norad_id, catalog).await;

    log::info!(
        "Predicting {} (NORAD {}) from {} for {} -> {}, step {}s, min elevation {} deg",
        name,
        norad_id,
        set.source,
        params.start,
        params.end,
        params.step.as_seconds_f64(),
        params.min_elevation_deg
    );

    let metadata = RunMetadata::new(
        SatelliteInfo {
            name,
            norad_id,
            tle_source: set.source.clone(),
        },
        &station,
        job.station.name.clone(),
        &params,
        calculated_at,
    );

    let outcome = run_sweep(&propagator, &EarthGeometry, &station, &params)?;
    Ok(assemble(&metadata, &outcome))
}

pub fn write_reports(
    passes: &PassesReport,
    ephemeris: &EphemerisReport,
    passes_path: &Path,
    ephemeris_path: &Path,
) -> Result<(), JobError> {
    write_json(passes_path, passes)?;
    log::info!("Wrote {} passes to {}", passes.passes.len(), passes_path.display());
    write_json(ephemeris_path, ephemeris)?;
    log::info!(
        "Wrote {} ephemeris records to {}",
        ephemeris.ephemeris.len(),
        ephemeris_path.display()
    );
    Ok(())
}
