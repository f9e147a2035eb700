// ============================================================================
// Gestion des événements
// ============================================================================
// Lecture du clavier avec timeout : en l'absence de touche, un Tick est émis
// toutes les 250ms, ce qui permet à l'event loop de traiter les résultats du
// worker et le minuteur de rafraîchissement.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Intervalle maximum entre deux ticks
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (résultats du worker, minuteur)
    Tick,
}

/// Gestionnaire d'événements (sans état)
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant au plus TICK_RATE)
    ///
    /// CONCEPT RUST : Polling avec timeout
    /// - event::poll() attend au plus TICK_RATE
    /// - sans touche, un Tick laisse l'event loop avancer (résultats, minuteur)
    pub fn next(&self) -> Result<Event> {
        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Sur certains OS on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                // Resize, souris, Release : un simple redessin suffit
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : identifier les touches
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// 'q' : quitter (two-step)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Ctrl-C : quitter immédiatement
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    } else {
        false
    }
}

/// 'r' : bouton "Refresh"
pub fn is_refresh_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('r') | KeyCode::Char('R')))
}

/// 'g' : bouton "Display Global Metrics"
pub fn is_global_metrics_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('g') | KeyCode::Char('G')))
}

/// 'c' : ouvre le formulaire de conversion
pub fn is_convert_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('c') | KeyCode::Char('C')))
}

/// 'i' : ouvre la recherche d'informations
pub fn is_info_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('i') | KeyCode::Char('I')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Tab ou ↓ : champ suivant du formulaire
pub fn is_next_field_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab | KeyCode::Down))
}

/// Shift-Tab ou ↑ : champ précédent
pub fn is_previous_field_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::BackTab | KeyCode::Up))
}

/// Caractère acceptable dans un champ (montant ou symbole)
pub fn is_input_char_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if c.is_alphanumeric() || matches!(c, '.' | '-' | ' '))
}

/// Extrait le caractère d'un événement clavier
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_interrupt_requires_control() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(is_interrupt_event(&ctrl_c));
        assert!(!is_interrupt_event(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_input_chars() {
        assert!(is_input_char_event(&key(KeyCode::Char('7'))));
        assert!(is_input_char_event(&key(KeyCode::Char('.'))));
        assert!(!is_input_char_event(&key(KeyCode::Char('$'))));
        assert_eq!(get_char_from_event(&key(KeyCode::Char('x'))), Some('x'));
        assert_eq!(get_char_from_event(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_field_navigation() {
        assert!(is_next_field_event(&key(KeyCode::Tab)));
        assert!(is_previous_field_event(&key(KeyCode::BackTab)));
        assert!(!is_next_field_event(&Event::Tick));
    }
}
