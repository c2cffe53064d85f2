use crate::{Commodity, PriceRecord, Result};

/// A source of today's prices.
pub trait PriceCatalog {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Ordered price records for a commodity. Order is display order.
    ///
    /// An empty list is a valid answer; a source that cannot answer at all
    /// returns [`CatalogError::Unavailable`](crate::CatalogError::Unavailable).
    fn lookup(&self, commodity: Commodity) -> Result<Vec<PriceRecord>>;
}
