use intent_parser::Commodity;
use thiserror::Error;

pub type Result<T, E = CatalogError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no price data available for {commodity}: {reason}")]
    Unavailable {
        commodity: Commodity,
        reason: String,
    },
}

impl CatalogError {
    pub fn unavailable(commodity: Commodity, reason: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            commodity,
            reason: reason.into(),
        }
    }
}
