// ============================================================================
// Module : api
// ============================================================================
// Clients API pour récupérer les données de marché (CoinMarketCap)
// ============================================================================

pub mod coinmarketcap;  // Client API CoinMarketCap

#[cfg(test)]
pub mod fake;           // Source en mémoire pour les tests

// Re-export des types principaux
pub use coinmarketcap::{ApiError, ApiResult, CoinMarketCapClient, MarketDataSource};
