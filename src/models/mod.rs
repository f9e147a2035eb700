// ============================================================================
// Module : models
// ============================================================================
// Structures de données extraites des réponses CoinMarketCap
//
// Toutes sont éphémères : recalculées à chaque requête, jamais persistées.
// ============================================================================

pub mod listing;        // Top des cryptomonnaies + transformation
pub mod global_metrics; // Métriques globales du marché
pub mod conversion;     // Conversion de devises
pub mod crypto_info;    // Métadonnées d'une cryptomonnaie

// Re-export des structures principales
pub use listing::{top_listings, Listing, TOP_N};
pub use global_metrics::GlobalMetrics;
pub use conversion::{normalize_symbol, ConversionError, ConversionRequest, ConversionResult};
pub use crypto_info::CryptoInfo;
