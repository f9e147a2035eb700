// ============================================================================
// Configuration
// ============================================================================
// Lit la configuration une seule fois au démarrage :
// - COINMARKETCAP_API_KEY : clé API (optionnelle, son absence n'est pas fatale)
// - CMC_BASE_URL : hôte de l'API (sandbox ou serveur de test)
//
// Un fichier .env local est chargé avant la lecture (dotenvy), les variables
// déjà présentes dans l'environnement restent prioritaires.
// ============================================================================

use std::env;
use std::time::Duration;

use tracing::{debug, info, warn};

/// Variable d'environnement contenant la clé API
pub const API_KEY_VAR: &str = "COINMARKETCAP_API_KEY";

/// Variable d'environnement pour surcharger l'hôte de l'API
pub const BASE_URL_VAR: &str = "CMC_BASE_URL";

/// Hôte de production CoinMarketCap
pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Intervalle du rafraîchissement automatique des listings
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration du processus, immuable après le démarrage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Clé API (None si absente ou vide)
    pub api_key: Option<String>,

    /// URL de base sans slash final (ex: "https://pro-api.coinmarketcap.com")
    pub base_url: String,
}

impl Config {
    /// Construit une configuration explicite (tests, serveur local)
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Charge le fichier .env puis lit l'environnement
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded settings file"),
            Err(e) if e.not_found() => debug!("No .env settings file found"),
            Err(e) => warn!(error = %e, "Failed to read .env settings file"),
        }

        Self::from_env()
    }

    /// Lit la configuration depuis les variables d'environnement uniquement
    pub fn from_env() -> Self {
        let config = Self::new(
            get_env(API_KEY_VAR),
            get_env(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        );

        // On ne log jamais la valeur de la clé, seulement sa présence
        if config.has_api_key() {
            info!(base_url = %config.base_url, "API key found");
        } else {
            warn!(
                var = API_KEY_VAR,
                "API key not found, every request will fail until it is set"
            );
        }

        config
    }

    /// Vérifie si une clé API est configurée
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, DEFAULT_BASE_URL)
    }
}

/// Lit une variable d'environnement, None si absente ou vide
fn get_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_absent() {
        let config = Config::new(Some("   ".to_string()), DEFAULT_BASE_URL);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_key_is_trimmed() {
        let config = Config::new(Some(" abc-123\n".to_string()), DEFAULT_BASE_URL);
        assert_eq!(config.api_key.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = Config::new(None, "http://127.0.0.1:8080/");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.has_api_key());
    }
}
