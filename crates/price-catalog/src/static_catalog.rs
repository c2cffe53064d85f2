use crate::{CatalogError, Commodity, PriceCatalog, PriceRecord, Result};
use anyhow::{bail, Context};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// An in-memory catalog, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: BTreeMap<Commodity, Vec<PriceRecord>>,
}

impl StaticCatalog {
    /// The stub prices the kiosk ships with.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.insert(
            Commodity::Onion,
            vec![
                PriceRecord::new("संगमनेर", 2200, 2800),
                PriceRecord::new("नाशिक", 2400, 3000),
                PriceRecord::new("सिन्नर", 2300, 2950),
            ],
        );
        catalog.insert(
            Commodity::Pea,
            vec![
                PriceRecord::new("संगमनेर", 4500, 5100),
                PriceRecord::new("नाशिक", 4800, 5300),
                PriceRecord::new("पुणे", 4700, 5200),
            ],
        );
        catalog
    }

    pub fn insert(&mut self, commodity: Commodity, records: Vec<PriceRecord>) {
        self.entries.insert(commodity, records);
    }
}

impl PriceCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    fn lookup(&self, commodity: Commodity) -> Result<Vec<PriceRecord>> {
        self.entries
            .get(&commodity)
            .cloned()
            .ok_or_else(|| CatalogError::unavailable(commodity, "not listed in catalog"))
    }
}

/// Load a catalog from a YAML (or JSON) document mapping commodity names to
/// ordered record lists.
pub fn load_catalog_file(path: impl AsRef<Path>) -> anyhow::Result<StaticCatalog> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading catalog: {}", path.display()))?;
    let table: BTreeMap<String, Vec<PriceRecord>> = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing catalog: {}", path.display()))?;

    let mut catalog = StaticCatalog::default();
    for (name, records) in table {
        let Some(commodity) = Commodity::from_name(&name) else {
            bail!("unknown commodity '{}' in {}", name, path.display());
        };
        if catalog.entries.contains_key(&commodity) {
            bail!(
                "duplicate entry for {} ('{}') in {}",
                commodity,
                name,
                path.display()
            );
        }
        for r in &records {
            if r.min_price > r.max_price {
                bail!(
                    "{} at {}: min price {} exceeds max price {}",
                    commodity,
                    r.location,
                    r.min_price,
                    r.max_price
                );
            }
        }
        tracing::debug!(%commodity, records = records.len(), "loaded catalog entry");
        catalog.insert(commodity, records);
    }
    Ok(catalog)
}
