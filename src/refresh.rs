// ============================================================================
// Rafraîchissement automatique des listings
// ============================================================================
// Minuteur auto-replanifié : la prochaine exécution est planifiée à la FIN
// de la précédente (succès ou échec), jamais à intervalle fixe.
// Un fetch lent retarde donc le tick suivant d'autant.
//
// Le minuteur ne lance rien lui-même : l'event loop l'interroge à chaque tick
// (toutes les ~250ms) via App::due_refresh().
// ============================================================================

use std::time::{Duration, Instant};

/// Origine d'une demande de listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Chargement initial au démarrage
    Startup,
    /// Tick du minuteur
    Timer,
    /// Touche [r] de l'utilisateur
    Manual,
}

impl RefreshTrigger {
    /// Indique si la fin du fetch doit planifier le tick suivant
    ///
    /// Un rafraîchissement manuel ne touche pas à la chaîne du minuteur.
    pub fn reschedules(&self) -> bool {
        !matches!(self, RefreshTrigger::Manual)
    }
}

/// Planification du prochain rafraîchissement
#[derive(Debug, Clone)]
pub struct RefreshLoop {
    interval: Duration,

    /// None : rien de planifié (fetch en cours ou pas encore démarré)
    next_due: Option<Instant>,
}

impl RefreshLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Planifie le prochain tick `interval` après la fin d'un fetch
    pub fn schedule_after(&mut self, completed_at: Instant) {
        self.next_due = Some(completed_at + self.interval);
    }

    /// Vérifie si le tick planifié est échu
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.map(|due| now >= due).unwrap_or(false)
    }

    /// Consomme le tick s'il est échu
    ///
    /// Après consommation, plus rien n'est planifié jusqu'au prochain
    /// schedule_after() : deux ticks ne peuvent pas se chevaucher.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.next_due = None;
            true
        } else {
            false
        }
    }

    /// Temps restant avant le prochain tick (None si rien n'est planifié)
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_scheduled_initially() {
        let mut refresh = RefreshLoop::new(Duration::from_secs(60));
        let now = Instant::now();

        assert!(!refresh.is_due(now));
        assert!(!refresh.take_due(now + Duration::from_secs(3600)));
        assert_eq!(refresh.remaining(now), None);
    }

    #[test]
    fn test_due_after_interval() {
        let mut refresh = RefreshLoop::new(Duration::from_secs(60));
        let completed = Instant::now();
        refresh.schedule_after(completed);

        assert!(!refresh.is_due(completed + Duration::from_secs(59)));
        assert_eq!(
            refresh.remaining(completed + Duration::from_secs(20)),
            Some(Duration::from_secs(40))
        );
        assert!(refresh.take_due(completed + Duration::from_secs(60)));

        // Consommé : plus rien tant que le fetch n'est pas terminé
        assert!(!refresh.take_due(completed + Duration::from_secs(120)));
    }

    #[test]
    fn test_slow_fetch_delays_next_tick() {
        let mut refresh = RefreshLoop::new(Duration::from_secs(60));
        let start = Instant::now();
        refresh.schedule_after(start);
        assert!(refresh.take_due(start + Duration::from_secs(60)));

        // Le fetch prend 15s : le tick suivant est à 60s de la fin, pas du début
        let completed = start + Duration::from_secs(75);
        refresh.schedule_after(completed);
        assert!(!refresh.is_due(start + Duration::from_secs(120)));
        assert!(refresh.is_due(start + Duration::from_secs(135)));
    }

    #[test]
    fn test_manual_trigger_does_not_reschedule() {
        assert!(RefreshTrigger::Startup.reschedules());
        assert!(RefreshTrigger::Timer.reschedules());
        assert!(!RefreshTrigger::Manual.reschedules());
    }
}
