// ============================================================================
// Structure : CryptoInfo
// ============================================================================
// Métadonnées statiques d'une cryptomonnaie (/v1/cryptocurrency/info)
//
// La réponse est indexée par symbole :
//   { "data": { "BTC": { "name": "Bitcoin", "symbol": "BTC", "category": "coin" } } }
// Certaines versions de l'API renvoient un tableau par symbole.
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Nom, symbole et catégorie d'une cryptomonnaie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoInfo {
    pub name: String,
    pub symbol: String,
    pub category: String,
}

impl CryptoInfo {
    /// Extrait l'entrée `data[symbol]` de la réponse
    pub fn from_document(symbol: &str, document: &Value) -> Result<Self> {
        let entry = match &document["data"][symbol] {
            Value::Array(items) => items.first(),
            Value::Null => None,
            other => Some(other),
        }
        .with_context(|| format!("Aucune information pour {}", symbol))?;

        let field = |key: &str| -> Result<String> {
            entry[key]
                .as_str()
                .map(str::to_string)
                .with_context(|| format!("Champ {} absent pour {}", key, symbol))
        };

        Ok(Self {
            name: field("name")?,
            symbol: field("symbol")?,
            // La catégorie peut être null pour les jetons récents
            category: entry["category"].as_str().unwrap_or("unknown").to_string(),
        })
    }

    /// Texte affiché sous le formulaire de recherche
    pub fn display_text(&self) -> String {
        format!(
            "Name: {}\nSymbol: {}\nCategory: {}",
            self.name, self.symbol, self.category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document() {
        let doc = json!({ "data": { "ETH": { "name": "Ethereum", "symbol": "ETH", "category": "coin" } } });

        let info = CryptoInfo::from_document("ETH", &doc).unwrap();
        assert_eq!(info.display_text(), "Name: Ethereum\nSymbol: ETH\nCategory: coin");
    }

    #[test]
    fn test_array_entry() {
        let doc = json!({ "data": { "USDT": [ { "name": "Tether USDt", "symbol": "USDT", "category": "token" } ] } });

        let info = CryptoInfo::from_document("USDT", &doc).unwrap();
        assert_eq!(info.name, "Tether USDt");
        assert_eq!(info.category, "token");
    }

    #[test]
    fn test_unknown_symbol() {
        let doc = json!({ "data": {} });
        assert!(CryptoInfo::from_document("NOPE", &doc).is_err());
    }
}
