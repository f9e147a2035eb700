// ============================================================================
// Structure : GlobalMetrics
// ============================================================================
// Chiffres agrégés du marché (/v1/global-metrics/quotes/latest)
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::format_usd;

/// Capitalisation totale et dominance du Bitcoin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    /// Capitalisation totale du marché en USD
    pub total_market_cap: f64,

    /// Part du Bitcoin en pourcentage (ex: 52.3)
    pub btc_dominance: f64,
}

impl GlobalMetrics {
    /// Extrait les métriques de `data.quote.USD.total_market_cap` et `data.btc_dominance`
    pub fn from_document(document: &Value) -> Result<Self> {
        let data = &document["data"];

        let total_market_cap = data["quote"]["USD"]["total_market_cap"]
            .as_f64()
            .context("Champ data.quote.USD.total_market_cap absent")?;
        let btc_dominance = data["btc_dominance"]
            .as_f64()
            .context("Champ data.btc_dominance absent")?;

        Ok(Self {
            total_market_cap,
            btc_dominance,
        })
    }

    /// Texte affiché dans le panneau des métriques globales
    pub fn display_text(&self) -> String {
        format!(
            "Total Market Cap: {}\nBTC Dominance: {:.2}%",
            format_usd(self.total_market_cap),
            self.btc_dominance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document() {
        let doc = json!({ "data": {
            "btc_dominance": 52.3456,
            "quote": { "USD": { "total_market_cap": 2_450_000_000_000.0 } }
        }});

        let metrics = GlobalMetrics::from_document(&doc).unwrap();
        assert_eq!(metrics.btc_dominance, 52.3456);
        assert_eq!(
            metrics.display_text(),
            "Total Market Cap: $2,450,000,000,000.00\nBTC Dominance: 52.35%"
        );
    }

    #[test]
    fn test_missing_field() {
        let doc = json!({ "data": { "quote": { "USD": {} } } });
        assert!(GlobalMetrics::from_document(&doc).is_err());
    }
}
