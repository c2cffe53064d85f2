//! HTTP client for a remote market report service.
//!
//! The service answers `GET {base_url}/{slug}-bajar-bhav-today` with a report
//! of the shape `{ date, locations: [{ location, details: [{ quality,
//! minPrice, maxPrice }] }] }`.

use crate::{CatalogError, Commodity, PriceCatalog, PriceRecord, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpCatalogConfig {
    pub base_url: String,
    /// Environment variable holding a bearer token, if the service needs one.
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    120_000
}

#[derive(Debug, Deserialize)]
struct MarketReport {
    #[serde(default)]
    locations: Vec<LocationReport>,
}

#[derive(Debug, Deserialize)]
struct LocationReport {
    location: String,
    #[serde(alias = "onionDetails", alias = "peaDetails", default)]
    details: Vec<QualityPrice>,
}

#[derive(Debug, Deserialize)]
struct QualityPrice {
    quality: Option<String>,
    #[serde(rename = "minPrice")]
    min_price: u32,
    #[serde(rename = "maxPrice")]
    max_price: u32,
}

pub struct HttpCatalog {
    config: HttpCatalogConfig,
}

impl HttpCatalog {
    pub fn new(config: HttpCatalogConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self, commodity: Commodity) -> String {
        format!(
            "{}/{}-bajar-bhav-today",
            self.config.base_url.trim_end_matches('/'),
            commodity.slug()
        )
    }

    fn fetch(&self, commodity: Commodity) -> Result<(StatusCode, String)> {
        let unavailable = |e: reqwest::Error| CatalogError::unavailable(commodity, e.to_string());

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build()
            .map_err(unavailable)?;

        let mut req = client.get(self.endpoint(commodity));
        if let Some(var) = &self.config.token_env {
            match std::env::var(var) {
                Ok(token) => req = req.bearer_auth(token),
                Err(_) => {
                    return Err(CatalogError::unavailable(
                        commodity,
                        format!("{var} environment variable not set"),
                    ))
                }
            }
        }

        let resp = req.send().map_err(unavailable)?;
        let status = resp.status();
        let body = resp.text().map_err(unavailable)?;
        Ok((status, body))
    }
}

impl PriceCatalog for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    fn lookup(&self, commodity: Commodity) -> Result<Vec<PriceRecord>> {
        // The blocking client owns its own runtime and must not be created or
        // dropped on an async worker thread.
        let (status, body) =
            std::thread::scope(|s| s.spawn(|| self.fetch(commodity)).join())
                .map_err(|_| CatalogError::unavailable(commodity, "fetch thread panicked"))??;

        let records = parse_response(commodity, status, &body)?;
        tracing::debug!(%commodity, records = records.len(), "fetched remote prices");
        Ok(records)
    }
}

/// Turn one service response into records. Anything but a successful report
/// with at least one priced location is `Unavailable`.
fn parse_response(
    commodity: Commodity,
    status: StatusCode,
    body: &str,
) -> Result<Vec<PriceRecord>> {
    if !status.is_success() {
        return Err(CatalogError::unavailable(commodity, format!("HTTP {status}")));
    }
    let report: MarketReport = serde_json::from_str(body)
        .map_err(|e| CatalogError::unavailable(commodity, format!("bad report: {e}")))?;
    let records = flatten_report(report);
    if records.is_empty() {
        return Err(CatalogError::unavailable(commodity, "report has no locations"));
    }
    Ok(records)
}

fn flatten_report(report: MarketReport) -> Vec<PriceRecord> {
    let mut out = Vec::new();
    for loc in report.locations {
        let graded = loc.details.len() > 1;
        for d in loc.details {
            let location = match (&d.quality, graded) {
                (Some(q), true) => format!("{} {}", loc.location, q),
                _ => loc.location.clone(),
            };
            out.push(PriceRecord::new(location, d.min_price, d.max_price));
        }
    }
    out
}
