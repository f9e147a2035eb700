// Source de données en mémoire : réponses préparées + journal des appels

use std::sync::Mutex;

use reqwest::StatusCode;
use serde_json::Value;

use super::{ApiError, ApiResult, MarketDataSource};

/// Réponse préparée pour une opération (None → HTTP 500)
#[derive(Debug, Default)]
pub struct FakeSource {
    pub listings: Option<Value>,
    pub global_metrics: Option<Value>,
    pub conversion: Option<Value>,
    pub info: Option<Value>,

    /// Statut renvoyé quand aucune réponse n'est préparée
    pub failure_status: Option<StatusCode>,

    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source sans aucune réponse : chaque appel échoue avec `status`
    pub fn failing(status: StatusCode) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::default()
        }
    }

    /// Appels reçus, dans l'ordre (ex: "price_conversion 100 USD EUR")
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: String, response: &Option<Value>) -> ApiResult<Value> {
        self.calls.lock().unwrap().push(call);
        response.clone().ok_or(ApiError::Status(
            self.failure_status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        ))
    }
}

impl MarketDataSource for FakeSource {
    async fn listings_latest(&self) -> ApiResult<Value> {
        self.respond("listings_latest".to_string(), &self.listings)
    }

    async fn global_metrics(&self) -> ApiResult<Value> {
        self.respond("global_metrics".to_string(), &self.global_metrics)
    }

    async fn price_conversion(&self, amount: f64, symbol: &str, convert: &str) -> ApiResult<Value> {
        self.respond(format!("price_conversion {} {} {}", amount, symbol, convert), &self.conversion)
    }

    async fn crypto_info(&self, symbol: &str) -> ApiResult<Value> {
        self.respond(format!("crypto_info {}", symbol), &self.info)
    }
}
