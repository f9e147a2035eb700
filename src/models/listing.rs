// ============================================================================
// Structure : Listing
// ============================================================================
// Représente une ligne du top des cryptomonnaies (nom, symbole, cap, prix)
//
// Les listings sont extraits du document JSON renvoyé par
// /v1/cryptocurrency/listings/latest :
//
//   { "data": [ { "name": "Bitcoin", "symbol": "BTC",
//                 "quote": { "USD": { "price": ..., "market_cap": ... } } },
//               ... ] }
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Nombre de cryptomonnaies affichées dans la table et le graphique
pub const TOP_N: usize = 10;

/// Snapshot de marché d'une cryptomonnaie (durée de vie : un rafraîchissement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// Symbole (ex: "BTC")
    pub symbol: String,

    /// Capitalisation en USD
    pub market_cap: f64,

    /// Prix en USD
    pub price: f64,
}

impl Listing {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, market_cap: f64, price: f64) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            market_cap,
            price,
        }
    }

    /// Projette une entrée `data[i]` du document en Listing
    ///
    /// Un champ texte absent devient "", un champ numérique absent ou null 0.0
    pub fn from_entry(entry: &Value) -> Self {
        let usd = &entry["quote"]["USD"];

        Self {
            name: entry["name"].as_str().unwrap_or_default().to_string(),
            symbol: entry["symbol"].as_str().unwrap_or_default().to_string(),
            market_cap: usd["market_cap"].as_f64().unwrap_or(0.0),
            price: usd["price"].as_f64().unwrap_or(0.0),
        }
    }
}

/// Extrait les `limit` premières entrées d'un document listings
///
/// L'ordre est celui renvoyé par l'API (aucun tri supplémentaire).
/// Un document absent ou sans tableau `data` donne une liste vide.
pub fn top_listings(document: Option<&Value>, limit: usize) -> Vec<Listing> {
    document
        .and_then(|doc| doc["data"].as_array())
        .map(|entries| entries.iter().take(limit).map(Listing::from_entry).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listings_document(count: usize) -> Value {
        let entries: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "name": format!("Coin {}", i),
                    "symbol": format!("C{}", i),
                    "quote": { "USD": { "market_cap": 1_000_000.0 * (count - i) as f64, "price": i as f64 + 0.5 } }
                })
            })
            .collect();
        json!({ "status": { "error_code": 0 }, "data": entries })
    }

    #[test]
    fn test_top_listings_truncates_to_ten() {
        let doc = listings_document(25);
        let listings = top_listings(Some(&doc), TOP_N);

        assert_eq!(listings.len(), 10);
        for (i, listing) in listings.iter().enumerate() {
            assert_eq!(listing.symbol, format!("C{}", i));
        }
    }

    #[test]
    fn test_top_listings_keeps_short_lists() {
        let doc = listings_document(3);
        let listings = top_listings(Some(&doc), TOP_N);

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[2].name, "Coin 2");
        assert_eq!(listings[2].price, 2.5);
    }

    #[test]
    fn test_top_listings_preserves_source_order() {
        // Capitalisations volontairement non triées
        let doc = json!({ "data": [
            { "name": "Small", "symbol": "S", "quote": { "USD": { "market_cap": 1.0, "price": 1.0 } } },
            { "name": "Big", "symbol": "B", "quote": { "USD": { "market_cap": 100.0, "price": 2.0 } } },
        ]});

        let listings = top_listings(Some(&doc), TOP_N);
        assert_eq!(listings[0].name, "Small");
        assert_eq!(listings[1].name, "Big");
    }

    #[test]
    fn test_top_listings_failed_response() {
        assert!(top_listings(None, TOP_N).is_empty());
        assert!(top_listings(None, TOP_N).is_empty());
        assert!(top_listings(Some(&json!({ "status": {} })), TOP_N).is_empty());
        assert!(top_listings(Some(&json!({ "data": [] })), TOP_N).is_empty());
    }

    #[test]
    fn test_from_entry_null_quote() {
        let entry = json!({ "name": "Nulled", "symbol": "NUL", "quote": { "USD": { "market_cap": null, "price": 0.25 } } });
        let listing = Listing::from_entry(&entry);

        assert_eq!(listing, Listing::new("Nulled", "NUL", 0.0, 0.25));
    }
}
