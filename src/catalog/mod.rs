mod celestrak;
mod error;

pub use celestrak::{CelestrakClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::CatalogError;

use crate::predict::ElementSet;

/// Remote source of element sets keyed by NORAD catalog number.
#[allow(async_fn_in_trait)]
pub trait CatalogClient {
    async fn fetch_elements(&self, norad_id: u32) -> Result<ElementSet, CatalogError>;

    async fn resolve_name(&self, norad_id: u32) -> Result<String, CatalogError> {
        self.fetch_elements(norad_id)
            .await?
            .name
            .ok_or(CatalogError::NotFound(norad_id))
    }
}

/// Display name for a satellite: configured name, then the element set's
/// name line, then a catalog lookup, then `SAT-<norad_id>`.
pub async fn resolve_satellite_name<C: CatalogClient>(
    configured: Option<&str>,
    set: &ElementSet,
    norad_id: u32,
    catalog: Option<&C>,
) -> String {
    if let Some(name) = configured.or(set.name.as_deref()) {
        return name.to_string();
    }

    if let Some(catalog) = catalog {
        match catalog.resolve_name(norad_id).await {
            Ok(name) => return name,
            Err(e) => log::warn!("Name lookup for NORAD {} failed: {}", norad_id, e),
        }
    }

    format!("SAT-{}", norad_id)
}
