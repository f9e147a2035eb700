// ============================================================================
// API Client : CoinMarketCap
// ============================================================================
// Quatre endpoints GET, tous authentifiés par l'en-tête X-CMC_PRO_API_KEY :
// - /v1/cryptocurrency/listings/latest   (top des cryptomonnaies)
// - /v1/global-metrics/quotes/latest     (métriques globales)
// - /v1/tools/price-conversion           (amount, symbol, convert)
// - /v1/cryptocurrency/info              (symbol)
//
// Chaque appel renvoie le document JSON brut (serde_json::Value) ;
// l'extraction des champs utiles est faite par les models.
// Pas de retry, pas de backoff : un échec est renvoyé tel quel à l'appelant.
// ============================================================================

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::utils::format_amount;

/// En-tête d'authentification de l'API Pro
pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

pub const LISTINGS_PATH: &str = "/v1/cryptocurrency/listings/latest";
pub const GLOBAL_METRICS_PATH: &str = "/v1/global-metrics/quotes/latest";
pub const PRICE_CONVERSION_PATH: &str = "/v1/tools/price-conversion";
pub const INFO_PATH: &str = "/v1/cryptocurrency/info";

// ============================================================================
// Erreurs
// ============================================================================

/// Échec d'un appel API
///
/// Tous les variants sont récupérables : l'appelant les transforme en message
/// d'erreur dans la zone d'affichage concernée.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Aucune clé configurée, la requête n'est jamais envoyée
    #[error("clé API absente (COINMARKETCAP_API_KEY)")]
    MissingApiKey,

    /// Statut HTTP différent de 200
    #[error("l'API a retourné une erreur : HTTP {0}")]
    Status(StatusCode),

    /// Erreur réseau, de construction de requête ou de parsing JSON
    #[error("échec de la requête HTTP : {0}")]
    Transport(#[from] reqwest::Error),

    /// Paramètre refusé avant tout appel réseau
    #[error("paramètre invalide : {0}")]
    InvalidInput(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// ============================================================================
// Trait : MarketDataSource
// ============================================================================
// Abstraction des quatre opérations, implémentée par le client HTTP et par
// une source en mémoire dans les tests.
// ============================================================================

/// Source de données de marché
#[allow(async_fn_in_trait)]
pub trait MarketDataSource {
    /// Top des cryptomonnaies (ordre de l'API)
    async fn listings_latest(&self) -> ApiResult<Value>;

    /// Capitalisation totale et dominance BTC
    async fn global_metrics(&self) -> ApiResult<Value>;

    /// Convertit `amount` de `symbol` vers `convert`
    async fn price_conversion(&self, amount: f64, symbol: &str, convert: &str) -> ApiResult<Value>;

    /// Métadonnées d'un symbole
    async fn crypto_info(&self, symbol: &str) -> ApiResult<Value>;
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Client CoinMarketCap (un reqwest::Client réutilisé pour toutes les requêtes)
#[derive(Debug, Clone)]
pub struct CoinMarketCapClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinMarketCapClient {
    /// Crée le client à partir de la configuration
    pub fn new(config: &Config) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("accepts", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// URL complète d'un endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET authentifié avec contrôle du statut
    ///
    /// La clé est vérifiée avant de construire la requête : sans clé,
    /// aucun appel réseau n'est fait.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        let api_key = match self.api_key.as_deref() {
            Some(key) => key,
            None => {
                error!(path, "API key not found, request not sent");
                return Err(ApiError::MissingApiKey);
            }
        };

        let url = self.endpoint(path);
        debug!(url = %url, params = ?query, "Sending HTTP request to CoinMarketCap");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "HTTP request failed");
                ApiError::Transport(e)
            })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if status != StatusCode::OK {
            error!(status = status.as_u16(), path, "CoinMarketCap returned error status");
            return Err(ApiError::Status(status));
        }

        let document: Value = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON response");
            ApiError::Transport(e)
        })?;

        Ok(document)
    }
}

impl MarketDataSource for CoinMarketCapClient {
    #[instrument(skip(self))]
    async fn listings_latest(&self) -> ApiResult<Value> {
        info!("Fetching listings from CoinMarketCap");
        let document = self.get(LISTINGS_PATH, &[]).await?;
        info!("Listings fetched successfully");
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn global_metrics(&self) -> ApiResult<Value> {
        let document = self.get(GLOBAL_METRICS_PATH, &[]).await?;
        info!("Global metrics fetched successfully");
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn price_conversion(&self, amount: f64, symbol: &str, convert: &str) -> ApiResult<Value> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ApiError::InvalidInput(format!("montant {}", amount)));
        }
        if symbol.trim().is_empty() || convert.trim().is_empty() {
            return Err(ApiError::InvalidInput("symbole de devise vide".to_string()));
        }

        info!("Converting {} {} to {}", format_amount(amount), symbol, convert);
        let query = [
            ("amount", format_amount(amount)),
            ("symbol", symbol.to_string()),
            ("convert", convert.to_string()),
        ];
        let document = self.get(PRICE_CONVERSION_PATH, &query).await?;
        info!("Currency conversion successful");
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn crypto_info(&self, symbol: &str) -> ApiResult<Value> {
        if symbol.trim().is_empty() {
            return Err(ApiError::InvalidInput("symbole vide".to_string()));
        }

        let document = self.get(INFO_PATH, &[("symbol", symbol.to_string())]).await?;
        info!("Cryptocurrency info fetched successfully");
        Ok(document)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// Aucun test ne contacte l'API réelle : les réponses HTTP viennent d'un
// serveur local qui répond une seule fois puis renvoie la requête reçue.
// ============================================================================
