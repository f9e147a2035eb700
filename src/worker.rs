// ============================================================================
// Background Worker
// ============================================================================
// Exécute les appels API hors du thread UI.
//
// - L'event loop envoie des AppCommand au worker (mpsc channel)
// - Le worker traite les commandes une par une, dans l'ordre d'arrivée,
//   avec son propre runtime tokio
// - Les AppResult reviennent au thread UI par un second channel
//
// Une seule requête HTTP est donc en vol à un instant donné, et les
// résultats arrivent dans l'ordre des commandes.
// ============================================================================

use std::sync::mpsc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::{ApiError, MarketDataSource};
use crate::models::{
    top_listings, ConversionRequest, ConversionResult, CryptoInfo, GlobalMetrics, Listing, TOP_N,
};
use crate::refresh::RefreshTrigger;

/// Commandes envoyées au worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Recharger le top des cryptomonnaies
    FetchListings { trigger: RefreshTrigger },

    /// Récupérer les métriques globales
    FetchGlobalMetrics,

    /// Convertir un montant (saisie déjà validée)
    Convert(ConversionRequest),

    /// Récupérer les métadonnées d'un symbole (déjà normalisé)
    FetchInfo { symbol: String },
}

/// Résultats renvoyés par le worker thread
///
/// L'erreur est transportée sous forme de texte : elle n'est plus utilisée
/// que pour les logs, l'affichage utilise un message fixe par zone.
#[derive(Debug, Clone, PartialEq)]
pub enum AppResult {
    ListingsLoaded {
        trigger: RefreshTrigger,
        result: Result<Vec<Listing>, String>,
    },
    GlobalMetricsLoaded(Result<GlobalMetrics, String>),
    ConversionDone(Result<ConversionResult, String>),
    InfoLoaded(Result<CryptoInfo, String>),
}

/// Exécute une commande contre une source de données
///
/// Ne panique jamais : tout échec devient un AppResult en erreur.
pub async fn execute<S: MarketDataSource>(source: &S, command: AppCommand) -> AppResult {
    match command {
        AppCommand::FetchListings { trigger } => {
            let result = match source.listings_latest().await {
                Ok(document) => {
                    let listings = top_listings(Some(&document), TOP_N);
                    info!(count = listings.len(), ?trigger, "Listings transformed");
                    Ok(listings)
                }
                Err(e) => Err(describe(e)),
            };
            AppResult::ListingsLoaded { trigger, result }
        }

        AppCommand::FetchGlobalMetrics => {
            let result = source
                .global_metrics()
                .await
                .map_err(describe)
                .and_then(|doc| GlobalMetrics::from_document(&doc).map_err(|e| format!("{:#}", e)));
            AppResult::GlobalMetricsLoaded(result)
        }

        AppCommand::Convert(request) => {
            let result = source
                .price_conversion(request.amount, &request.symbol_from, &request.symbol_to)
                .await
                .map_err(describe)
                .and_then(|doc| {
                    ConversionResult::from_document(&request, &doc).map_err(|e| format!("{:#}", e))
                });
            AppResult::ConversionDone(result)
        }

        AppCommand::FetchInfo { symbol } => {
            let result = source
                .crypto_info(&symbol)
                .await
                .map_err(describe)
                .and_then(|doc| CryptoInfo::from_document(&symbol, &doc).map_err(|e| format!("{:#}", e)));
            AppResult::InfoLoaded(result)
        }
    }
}

/// Log l'erreur API et la convertit en texte
fn describe(e: ApiError) -> String {
    match &e {
        ApiError::Status(status) => error!(status = status.as_u16(), "Request failed"),
        ApiError::MissingApiKey => warn!("Request skipped: no API key"),
        _ => error!(error = %e, "Request failed"),
    }
    e.to_string()
}

/// Lance le worker thread
///
/// Le runtime tokio est créé avant le spawn pour que son échec remonte
/// à l'appelant au lieu de tuer silencieusement le thread.
pub fn spawn_background_worker<S>(
    source: S,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> Result<std::thread::JoinHandle<()>>
where
    S: MarketDataSource + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio")?;

    let handle = std::thread::Builder::new()
        .name("api-worker".to_string())
        .spawn(move || {
            // CONCEPT RUST : Async dans sync
            // - le thread UI est synchrone (crossterm, ratatui)
            // - les appels reqwest sont async
            // - runtime.block_on() exécute une future jusqu'au bout sur ce
            //   thread : une commande à la fois, dans l'ordre de réception
            //
            // recv() échoue quand l'UI a fermé le channel : on quitte
            while let Ok(command) = command_rx.recv() {
                info!(?command, "Worker received command");
                let result = runtime.block_on(execute(&source, command));

                if result_tx.send(result).is_err() {
                    break;
                }
            }
            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du worker thread")?;

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_listings() {
        let mut source = FakeSource::new();
        source.listings = Some(json!({ "data": [
            { "name": "Bitcoin", "symbol": "BTC", "quote": { "USD": { "market_cap": 1.2e12, "price": 61000.0 } } }
        ]}));

        let result = execute(&source, AppCommand::FetchListings { trigger: RefreshTrigger::Timer }).await;
        assert_eq!(
            result,
            AppResult::ListingsLoaded {
                trigger: RefreshTrigger::Timer,
                result: Ok(vec![Listing::new("Bitcoin", "BTC", 1.2e12, 61000.0)]),
            }
        );
    }

    #[tokio::test]
    async fn test_execute_conversion() {
        let mut source = FakeSource::new();
        source.conversion = Some(json!({ "data": { "quote": { "EUR": { "price": 91.23 } } } }));

        let request = ConversionRequest::parse("100", "USD", "EUR").unwrap();
        match execute(&source, AppCommand::Convert(request)).await {
            AppResult::ConversionDone(Ok(result)) => {
                assert_eq!(result.display_text(), "100.0 USD = 91.23 EUR")
            }
            other => panic!("résultat inattendu : {:?}", other),
        }
        assert_eq!(source.calls(), vec!["price_conversion 100 USD EUR"]);
    }

    #[tokio::test]
    async fn test_execute_http_failure() {
        let source = FakeSource::new();

        for command in [
            AppCommand::FetchGlobalMetrics,
            AppCommand::FetchInfo { symbol: "BTC".to_string() },
        ] {
            match execute(&source, command).await {
                AppResult::GlobalMetricsLoaded(Err(e)) | AppResult::InfoLoaded(Err(e)) => {
                    assert!(e.contains("500"))
                }
                other => panic!("résultat inattendu : {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_execute_malformed_document() {
        let mut source = FakeSource::new();
        source.info = Some(json!({ "data": {} }));

        let result = execute(&source, AppCommand::FetchInfo { symbol: "XYZ".to_string() }).await;
        assert!(matches!(result, AppResult::InfoLoaded(Err(_))));
    }

    #[test]
    fn test_worker_processes_commands_in_order() {
        let mut source = FakeSource::new();
        source.global_metrics = Some(json!({ "data": {
            "btc_dominance": 50.0,
            "quote": { "USD": { "total_market_cap": 1000.0 } }
        }}));

        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_background_worker(source, command_rx, result_tx).unwrap();

        command_tx.send(AppCommand::FetchGlobalMetrics).unwrap();
        command_tx.send(AppCommand::FetchListings { trigger: RefreshTrigger::Manual }).unwrap();
        drop(command_tx);

        assert!(matches!(result_rx.recv().unwrap(), AppResult::GlobalMetricsLoaded(Ok(_))));
        assert!(matches!(
            result_rx.recv().unwrap(),
            AppResult::ListingsLoaded { result: Err(_), .. }
        ));
        handle.join().unwrap();
    }
}
