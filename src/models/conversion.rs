// ============================================================================
// Conversion de devises
// ============================================================================
// - ConversionRequest : saisie validée du formulaire (montant + 2 symboles)
// - ConversionResult : résultat de /v1/tools/price-conversion
//
// Format de la réponse :
//   { "data": { "symbol": "USD", "amount": 100,
//               "quote": { "EUR": { "price": 91.23 } } } }
// Selon les symboles, `data` peut aussi être un tableau d'objets.
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::utils::format_amount;

/// Saisie refusée par le formulaire de conversion
///
/// Chaque variant correspond à un message différent dans la zone de conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Montant non numérique, nul, négatif ou infini
    #[error("montant invalide : {0:?}")]
    InvalidAmount(String),

    /// Symbole source ou cible vide
    #[error("symbole de devise manquant")]
    MissingSymbol,
}

/// Saisie du formulaire de conversion, déjà validée et normalisée
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub amount: f64,
    pub symbol_from: String,
    pub symbol_to: String,
}

impl ConversionRequest {
    /// Parse les trois champs du formulaire
    ///
    /// - le montant doit être un nombre fini strictement positif
    /// - les symboles sont nettoyés et mis en majuscules, ils ne peuvent être vides
    pub fn parse(amount: &str, symbol_from: &str, symbol_to: &str) -> Result<Self, ConversionError> {
        let invalid = || ConversionError::InvalidAmount(amount.to_string());

        let amount: f64 = amount.trim().parse().map_err(|_| invalid())?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(invalid());
        }

        let symbol_from = normalize_symbol(symbol_from);
        let symbol_to = normalize_symbol(symbol_to);
        if symbol_from.is_empty() || symbol_to.is_empty() {
            return Err(ConversionError::MissingSymbol);
        }

        Ok(Self {
            amount,
            symbol_from,
            symbol_to,
        })
    }
}

/// Résultat d'une conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub amount: f64,
    pub symbol_from: String,
    pub symbol_to: String,
    pub converted_amount: f64,
}

impl ConversionResult {
    /// Extrait `data.quote[symbol_to].price` de la réponse
    pub fn from_document(request: &ConversionRequest, document: &Value) -> Result<Self> {
        let data = match &document["data"] {
            Value::Array(items) => items.first().context("Réponse de conversion vide")?,
            other => other,
        };

        let converted_amount = data["quote"][request.symbol_to.as_str()]["price"]
            .as_f64()
            .with_context(|| format!("Pas de cotation {} dans la réponse", request.symbol_to))?;

        Ok(Self {
            amount: request.amount,
            symbol_from: request.symbol_from.clone(),
            symbol_to: request.symbol_to.clone(),
            converted_amount,
        })
    }

    /// Texte affiché sous le formulaire : "100.0 USD = 91.23 EUR"
    pub fn display_text(&self) -> String {
        format!(
            "{} {} = {:.2} {}",
            format_amount(self.amount),
            self.symbol_from,
            self.converted_amount,
            self.symbol_to
        )
    }
}

/// Nettoie et met en majuscules un symbole saisi
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_normalizes_symbols() {
        let request = ConversionRequest::parse(" 100 ", "usd", " eur ").unwrap();
        assert_eq!(request.amount, 100.0);
        assert_eq!(request.symbol_from, "USD");
        assert_eq!(request.symbol_to, "EUR");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ConversionRequest::parse("abc", "USD", "EUR").is_err());
        assert!(ConversionRequest::parse("", "USD", "EUR").is_err());
        assert!(ConversionRequest::parse("-5", "USD", "EUR").is_err());
        assert!(ConversionRequest::parse("0", "USD", "EUR").is_err());
        assert!(ConversionRequest::parse("NaN", "USD", "EUR").is_err());
        assert_eq!(ConversionRequest::parse("10", "", "EUR"), Err(ConversionError::MissingSymbol));
        assert_eq!(ConversionRequest::parse("10", "USD", "  "), Err(ConversionError::MissingSymbol));
    }

    #[test]
    fn test_amount_checked_before_symbols() {
        assert_eq!(
            ConversionRequest::parse("abc", "", ""),
            Err(ConversionError::InvalidAmount("abc".to_string()))
        );
    }

    #[test]
    fn test_display_text() {
        let request = ConversionRequest::parse("100", "USD", "EUR").unwrap();
        let doc = json!({ "data": { "symbol": "USD", "amount": 100, "quote": { "EUR": { "price": 91.23 } } } });

        let result = ConversionResult::from_document(&request, &doc).unwrap();
        assert_eq!(result.display_text(), "100.0 USD = 91.23 EUR");
    }

    #[test]
    fn test_array_data() {
        let request = ConversionRequest::parse("0.5", "BTC", "USD").unwrap();
        let doc = json!({ "data": [ { "symbol": "BTC", "quote": { "USD": { "price": 31234.5 } } } ] });

        let result = ConversionResult::from_document(&request, &doc).unwrap();
        assert_eq!(result.display_text(), "0.5 BTC = 31234.50 USD");
    }

    #[test]
    fn test_missing_quote() {
        let request = ConversionRequest::parse("1", "BTC", "EUR").unwrap();
        let doc = json!({ "data": { "quote": { "USD": { "price": 1.0 } } } });

        assert!(ConversionResult::from_document(&request, &doc).is_err());
    }
}
