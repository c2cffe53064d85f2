//! price-catalog: per-commodity market prices
//!
//! This crate provides the [`PriceCatalog`] trait the kiosk queries for a
//! commodity's ordered price records. The default build ships a static
//! in-memory catalog; the `http` feature adds a client for a remote market
//! report service.

mod types;
pub use types::PriceRecord;

mod error;
pub use error::{CatalogError, Result};

mod traits;
pub use traits::PriceCatalog;

mod static_catalog;
pub use static_catalog::{load_catalog_file, StaticCatalog};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{HttpCatalog, HttpCatalogConfig};

pub use intent_parser::Commodity;

/// Initialize the price catalog system
pub fn init() {
    tracing::info!("Initializing Price Catalog system");
}
