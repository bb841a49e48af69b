use std::time::Duration;

use crate::catalog::error::CatalogError;
use crate::catalog::CatalogClient;
use crate::predict::{parse_multi_tle, ElementSet};

pub const DEFAULT_BASE_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Element sets by catalog number from a Celestrak GP endpoint.
pub struct CelestrakClient {
    client: reqwest::Client,
    base_url: String,
}

impl CelestrakClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('?').to_string(),
        })
    }

    pub fn url_for(&self, norad_id: u32) -> String {
        format!("{}?CATNR={}", self.base_url, norad_id)
    }
}

impl CatalogClient for CelestrakClient {
    async fn fetch_elements(&self, norad_id: u32) -> Result<ElementSet, CatalogError> {
        let url = self.url_for(norad_id);
        log::debug!("Fetching element set for NORAD {} from {}", norad_id, url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                norad_id,
            });
        }

        let body = response.text().await?;
        parse_catalog_response(&body, norad_id, &url)
    }
}

/// Extract the element set for `norad_id` from a catalog response body.
pub fn parse_catalog_response(
    body: &str,
    norad_id: u32,
    source: &str,
) -> Result<ElementSet, CatalogError> {
    let Some((name, line1, line2)) = parse_multi_tle(body).into_iter().next() else {
        return Err(CatalogError::NotFound(norad_id));
    };

    let set = ElementSet {
        name,
        line1,
        line2,
        source: source.to_string(),
    };

    let found = set.norad_id()?;
    if found != norad_id {
        return Err(CatalogError::Mismatch {
            requested: norad_id,
            found,
        });
    }

    Ok(set)
}
