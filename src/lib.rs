// ============================================================================
// Cryptocurrency Analyzer - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // API CoinMarketCap
pub mod app;       // État de l'application
pub mod config;    // Configuration (clé API, hôte)
pub mod models;    // Structures de données
pub mod refresh;   // Rafraîchissement automatique
pub mod ui;        // Interface utilisateur
pub mod utils;     // Formatage des montants
pub mod worker;    // Appels API en arrière-plan
