// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Rendu de la fenêtre principale + table
pub mod chart;     // Graphique en barres des capitalisations
pub mod panels;    // Panneaux métriques / conversion / info

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
