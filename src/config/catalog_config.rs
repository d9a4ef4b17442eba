//! Asset catalog and currency table loading.
//!
//! Both tables default to the built-in listings. A TOML file can replace
//! either one:
//!
//! ```toml
//! [[assets]]
//! symbol = "BTC"
//! base_price_usd = 30000.0
//! provider_id = "bitcoin"
//!
//! [[currencies]]
//! code = "USD"
//! rate = 1.0
//! ```

use crate::domain::catalog::{AssetCatalog, AssetListing, CurrencyRate, CurrencyTable};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    assets: Vec<AssetListing>,
    #[serde(default)]
    currencies: Vec<CurrencyRate>,
}

/// Parses catalog TOML. An absent or empty section keeps the built-in table.
pub fn parse_catalog(content: &str) -> Result<(AssetCatalog, CurrencyTable)> {
    let file: CatalogFile = toml::from_str(content).context("Failed to parse catalog TOML")?;

    for asset in &file.assets {
        if asset.symbol.trim().is_empty() {
            anyhow::bail!("Catalog asset with empty symbol");
        }
        if !(asset.base_price_usd.is_finite() && asset.base_price_usd > 0.0) {
            anyhow::bail!(
                "Invalid base_price_usd for {}: {}",
                asset.symbol,
                asset.base_price_usd
            );
        }
    }
    for currency in &file.currencies {
        if !(currency.rate.is_finite() && currency.rate > 0.0) {
            anyhow::bail!("Invalid rate for {}: {}", currency.code, currency.rate);
        }
    }

    let catalog = if file.assets.is_empty() {
        AssetCatalog::default()
    } else {
        AssetCatalog::new(
            file.assets
                .into_iter()
                .map(|a| AssetListing {
                    symbol: a.symbol.trim().to_uppercase(),
                    ..a
                })
                .collect(),
        )
    };

    let currencies = if file.currencies.is_empty() {
        CurrencyTable::default()
    } else {
        CurrencyTable::new(
            file.currencies
                .into_iter()
                .map(|c| CurrencyRate {
                    code: c.code.trim().to_uppercase(),
                    rate: c.rate,
                })
                .collect(),
        )
    };

    Ok((catalog, currencies))
}

/// Loads a catalog file from disk.
pub fn load_catalog_file(path: &Path) -> Result<(AssetCatalog, CurrencyTable)> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read catalog file: {}", path.display()))?;
    parse_catalog(&content).context(format!("Invalid catalog file: {}", path.display()))
}
