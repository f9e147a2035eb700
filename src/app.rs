// ============================================================================
// Structure : App
// ============================================================================
// État complet de l'application TUI, possédé par le thread UI.
//
// PATTERN "Application State" :
// - Le rendu lit uniquement App
// - Les actions utilisateur et les ticks passent par les méthodes de App,
//   qui renvoient éventuellement une AppCommand à envoyer au worker
// - Les résultats du worker sont appliqués par App::apply()
//
// Aucun widget n'est global : tout l'état testable vit ici.
// ============================================================================

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::config::REFRESH_INTERVAL;
use crate::models::{normalize_symbol, ConversionError, ConversionRequest, Listing};
use crate::refresh::{RefreshLoop, RefreshTrigger};
use crate::worker::{AppCommand, AppResult};

// Messages fixes affichés en cas d'échec, un par zone
pub const LISTINGS_FAILED: &str = "Failed to fetch data.";
pub const GLOBAL_METRICS_FAILED: &str = "Failed to fetch global metrics.";
pub const CONVERSION_FAILED: &str = "Failed to convert currency.";
pub const INFO_FAILED: &str = "Failed to fetch cryptocurrency info.";
pub const INVALID_AMOUNT: &str = "Invalid input. Please enter a valid amount.";
pub const INVALID_SYMBOL: &str = "Invalid input. Please enter a cryptocurrency symbol.";
pub const INVALID_CURRENCY: &str = "Invalid input. Please enter a currency symbol.";

// ============================================================================
// Zones d'affichage
// ============================================================================
// Chaque zone suit sa propre machine à états :
//   Idle → Loading → (Ready | Failed) → Loading → ...
// Les zones sont indépendantes : l'échec de l'une ne touche pas les autres.
//
// CONCEPT RUST : Machine à états avec un enum
// - RegionStatus liste tous les états possibles, rien d'autre n'existe
// - Les transitions passent par les méthodes privées de Panel
//   (start_loading, succeed, fail) : le reste du code ne peut pas
//   mettre une zone dans un état incohérent
// - start_loading() renvoie false si la zone charge déjà : c'est le
//   garde "une seule requête en vol par zone"
// ============================================================================

/// État d'une zone d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStatus {
    /// Rien demandé pour l'instant
    Idle,
    /// Requête en cours
    Loading,
    /// Dernière requête réussie
    Ready,
    /// Dernière requête échouée (ou saisie invalide)
    Failed,
}

/// Zone d'affichage : statut + texte du résultat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub status: RegionStatus,
    pub text: String,
}

impl Panel {
    pub fn new() -> Self {
        Self {
            status: RegionStatus::Idle,
            text: String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == RegionStatus::Loading
    }

    /// Passe en chargement, refuse si une requête est déjà en vol
    fn start_loading(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.status = RegionStatus::Loading;
        true
    }

    fn succeed(&mut self, text: String) {
        self.status = RegionStatus::Ready;
        self.text = text;
    }

    fn fail(&mut self, text: &str) {
        self.status = RegionStatus::Failed;
        self.text = text.to_string();
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Formulaires
// ============================================================================

/// Champ actif du formulaire de conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionField {
    Amount,
    From,
    To,
}

impl ConversionField {
    /// CONCEPT : Cycle d'états (le dernier champ revient au premier)
    pub fn next(&self) -> Self {
        match self {
            ConversionField::Amount => ConversionField::From,
            ConversionField::From => ConversionField::To,
            ConversionField::To => ConversionField::Amount,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            ConversionField::Amount => ConversionField::To,
            ConversionField::From => ConversionField::Amount,
            ConversionField::To => ConversionField::From,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConversionField::Amount => "Amount",
            ConversionField::From => "From Currency",
            ConversionField::To => "To Currency",
        }
    }
}

/// Contenu des trois champs du formulaire de conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionForm {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl ConversionForm {
    pub fn field(&self, field: ConversionField) -> &str {
        match field {
            ConversionField::Amount => &self.amount,
            ConversionField::From => &self.from,
            ConversionField::To => &self.to,
        }
    }

    fn field_mut(&mut self, field: ConversionField) -> &mut String {
        match field {
            ConversionField::Amount => &mut self.amount,
            ConversionField::From => &mut self.from,
            ConversionField::To => &mut self.to,
        }
    }
}

/// Élément qui reçoit le clavier
///
/// CONCEPT : Modal input mode
/// - Dashboard : chaque touche est un raccourci
/// - Conversion / Info : les touches alimentent le champ actif
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Raccourcis globaux (r, g, c, i, q)
    Dashboard,
    /// Saisie dans le formulaire de conversion
    Conversion(ConversionField),
    /// Saisie du symbole à rechercher
    Info,
}

// ============================================================================
// App
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Première pression de 'q' reçue, en attente de confirmation
    ///
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    /// Top 10 courant (remplacé en entier à chaque rafraîchissement réussi)
    pub listings: Vec<Listing>,

    /// Zone table + graphique
    pub listings_panel: Panel,

    /// Heure locale du dernier rafraîchissement réussi
    pub last_updated: Option<DateTime<Local>>,

    pub global_panel: Panel,
    pub conversion_panel: Panel,
    pub info_panel: Panel,

    pub focus: Focus,
    pub conversion_form: ConversionForm,
    pub info_input: String,

    /// Minuteur du rafraîchissement automatique
    pub refresh: RefreshLoop,
}

impl App {
    /// Crée l'état initial avec l'intervalle par défaut (60s)
    pub fn new() -> Self {
        Self::with_refresh_interval(REFRESH_INTERVAL)
    }

    pub fn with_refresh_interval(interval: Duration) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            listings: Vec::new(),
            listings_panel: Panel::new(),
            last_updated: None,
            global_panel: Panel::new(),
            conversion_panel: Panel::new(),
            info_panel: Panel::new(),
            focus: Focus::Dashboard,
            conversion_form: ConversionForm::default(),
            info_input: String::new(),
            refresh: RefreshLoop::new(interval),
        }
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Two-step quit : la première pression demande confirmation
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Requêtes (retournent la commande à envoyer au worker)
    // ========================================================================

    /// Demande un rafraîchissement des listings
    ///
    /// None si un fetch de listings est déjà en cours.
    pub fn request_listings(&mut self, trigger: RefreshTrigger) -> Option<AppCommand> {
        if !self.listings_panel.start_loading() {
            warn!(?trigger, "Listings fetch already in flight, request ignored");
            return None;
        }
        info!(?trigger, "Refreshing data");
        Some(AppCommand::FetchListings { trigger })
    }

    /// Bouton "Display Global Metrics"
    pub fn request_global_metrics(&mut self) -> Option<AppCommand> {
        if !self.global_panel.start_loading() {
            warn!("Global metrics fetch already in flight, request ignored");
            return None;
        }
        Some(AppCommand::FetchGlobalMetrics)
    }

    /// Valide le formulaire de conversion
    ///
    /// Une saisie invalide est signalée dans la zone sans aucun appel réseau.
    pub fn submit_conversion(&mut self) -> Option<AppCommand> {
        if self.conversion_panel.is_loading() {
            warn!("Conversion already in flight, request ignored");
            return None;
        }

        let form = &self.conversion_form;
        match ConversionRequest::parse(&form.amount, &form.from, &form.to) {
            Ok(request) => {
                self.conversion_panel.start_loading();
                Some(AppCommand::Convert(request))
            }
            Err(e) => {
                debug!(error = %e, "Invalid conversion input");
                // CONCEPT RUST : match exhaustif sur l'erreur typée
                // - un nouveau variant de ConversionError ne compile pas
                //   tant qu'il n'a pas son message ici
                let message = match e {
                    ConversionError::InvalidAmount(_) => INVALID_AMOUNT,
                    ConversionError::MissingSymbol => INVALID_CURRENCY,
                };
                self.conversion_panel.fail(message);
                None
            }
        }
    }

    /// Valide la recherche d'informations sur un symbole
    pub fn submit_info(&mut self) -> Option<AppCommand> {
        if self.info_panel.is_loading() {
            warn!("Info lookup already in flight, request ignored");
            return None;
        }

        let symbol = normalize_symbol(&self.info_input);
        if symbol.is_empty() {
            self.info_panel.fail(INVALID_SYMBOL);
            return None;
        }

        self.info_panel.start_loading();
        Some(AppCommand::FetchInfo { symbol })
    }

    /// Appelé à chaque tick : lance le rafraîchissement automatique s'il est échu
    ///
    /// Si des listings sont déjà en cours de chargement, le tick attend.
    pub fn due_refresh(&mut self, now: Instant) -> Option<AppCommand> {
        if self.listings_panel.is_loading() || !self.refresh.take_due(now) {
            return None;
        }
        self.request_listings(RefreshTrigger::Timer)
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique un résultat à la zone correspondante
    ///
    /// CONCEPT RUST : Destructuring dans un match
    /// - chaque variant d'AppResult est décomposé en place
    /// - le compilateur vérifie que les quatre zones sont traitées
    ///
    /// `now` est l'instant de fin du fetch, utilisé pour replanifier le minuteur.
    pub fn apply(&mut self, result: AppResult, now: Instant) {
        match result {
            AppResult::ListingsLoaded { trigger, result } => {
                match result {
                    Ok(listings) => {
                        info!(count = listings.len(), "Data displayed");
                        self.replace_listings(listings);
                        self.listings_panel.succeed(String::new());
                    }
                    Err(e) => {
                        warn!(error = %e, "No data to display");
                        self.listings_panel.fail(LISTINGS_FAILED);
                    }
                }

                if trigger.reschedules() {
                    self.refresh.schedule_after(now);
                    debug!(interval_secs = self.refresh.interval().as_secs(), "Next refresh scheduled");
                }
            }

            AppResult::GlobalMetricsLoaded(result) => match result {
                Ok(metrics) => self.global_panel.succeed(metrics.display_text()),
                Err(e) => {
                    warn!(error = %e, "Global metrics unavailable");
                    self.global_panel.fail(GLOBAL_METRICS_FAILED);
                }
            },

            AppResult::ConversionDone(result) => match result {
                Ok(conversion) => self.conversion_panel.succeed(conversion.display_text()),
                Err(e) => {
                    warn!(error = %e, "Conversion unavailable");
                    self.conversion_panel.fail(CONVERSION_FAILED);
                }
            },

            AppResult::InfoLoaded(result) => match result {
                Ok(info) => self.info_panel.succeed(info.display_text()),
                Err(e) => {
                    warn!(error = %e, "Crypto info unavailable");
                    self.info_panel.fail(INFO_FAILED);
                }
            },
        }
    }

    /// Le worker ne répond plus : toute zone en chargement passe en échec
    ///
    /// Sans cela une zone resterait "Loading..." indéfiniment, et le minuteur
    /// des listings ne repartirait jamais.
    pub fn fail_in_flight(&mut self) {
        let regions = [
            (&mut self.listings_panel, LISTINGS_FAILED),
            (&mut self.global_panel, GLOBAL_METRICS_FAILED),
            (&mut self.conversion_panel, CONVERSION_FAILED),
            (&mut self.info_panel, INFO_FAILED),
        ];

        for (panel, message) in regions {
            if panel.is_loading() {
                warn!(failure = message, "Request abandoned, worker unavailable");
                panel.fail(message);
            }
        }
    }

    /// Remplace toutes les lignes de la table (pas de diff incrémental)
    fn replace_listings(&mut self, listings: Vec<Listing>) {
        self.listings.clear();
        self.listings.extend(listings);
        self.last_updated = Some(Local::now());
    }

    /// Barres du graphique (nom, capitalisation) dérivées des lignes courantes
    ///
    /// Le graphique est reconstruit à partir de l'état : il remplace le
    /// précédent au lieu de s'empiler.
    pub fn chart_bars(&self) -> Vec<(&str, u64)> {
        self.listings
            .iter()
            .map(|l| (l.name.as_str(), l.market_cap.max(0.0).round() as u64))
            .collect()
    }

    // ========================================================================
    // Gestion des formulaires
    // ========================================================================

    pub fn open_conversion_form(&mut self) {
        self.focus = Focus::Conversion(ConversionField::Amount);
    }

    pub fn open_info_form(&mut self) {
        self.focus = Focus::Info;
    }

    /// Quitte la saisie, les valeurs saisies sont conservées
    pub fn close_form(&mut self) {
        self.focus = Focus::Dashboard;
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.focus == Focus::Dashboard
    }

    pub fn is_in_form(&self) -> bool {
        !self.is_on_dashboard()
    }

    pub fn next_field(&mut self) {
        if let Focus::Conversion(field) = self.focus {
            self.focus = Focus::Conversion(field.next());
        }
    }

    pub fn previous_field(&mut self) {
        if let Focus::Conversion(field) = self.focus {
            self.focus = Focus::Conversion(field.previous());
        }
    }

    /// Ajoute un caractère au champ actif
    pub fn append_char(&mut self, c: char) {
        match self.focus {
            Focus::Conversion(field) => self.conversion_form.field_mut(field).push(c),
            Focus::Info => self.info_input.push(c),
            Focus::Dashboard => {}
        }
    }

    /// Supprime le dernier caractère du champ actif
    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Conversion(field) => {
                self.conversion_form.field_mut(field).pop();
            }
            Focus::Info => {
                self.info_input.pop();
            }
            Focus::Dashboard => {}
        }
    }

    /// Enter dans un formulaire : soumet et revient au dashboard
    pub fn submit_form(&mut self) -> Option<AppCommand> {
        let command = match self.focus {
            Focus::Conversion(_) => self.submit_conversion(),
            Focus::Info => self.submit_info(),
            Focus::Dashboard => None,
        };
        self.close_form();
        command
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
