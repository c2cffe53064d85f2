use serde::{Deserialize, Serialize};

/// One market's price band for a commodity, in rupees per quintal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub location: String,
    #[serde(alias = "minPrice", alias = "min")]
    pub min_price: u32,
    #[serde(alias = "maxPrice", alias = "max")]
    pub max_price: u32,
}

impl PriceRecord {
    pub fn new(location: impl Into<String>, min_price: u32, max_price: u32) -> Self {
        Self {
            location: location.into(),
            min_price,
            max_price,
        }
    }
}
