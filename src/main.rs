// ============================================================================
// Cryptocurrency Analyzer
// ============================================================================
// Programme TUI : top 10 des cryptomonnaies (table + graphique), métriques
// globales, conversion de devises et informations par symbole, depuis
// l'API CoinMarketCap.
//
// Architecture :
// 1. Thread UI : event loop (render → input → update), possède App
// 2. Worker thread : exécute les appels API (runtime tokio dédié)
// 3. Channels mpsc : commandes UI → worker, résultats worker → UI
// ============================================================================

use std::io;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use cryptoanalyzer::api::CoinMarketCapClient;
use cryptoanalyzer::app::App;
use cryptoanalyzer::config::Config;
use cryptoanalyzer::refresh::RefreshTrigger;
use cryptoanalyzer::ui::{events::EventHandler, render, Event};
use cryptoanalyzer::worker::{spawn_background_worker, AppCommand, AppResult};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! sont inutilisables une fois le TUI lancé : les logs vont
// dans ./logs/cryptoanalyzer.log, avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f logs/cryptoanalyzer.log
/// RUST_LOG=cryptoanalyzer=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "cryptoanalyzer.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour l'application, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptoanalyzer=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("Cryptocurrency Analyzer starting up");

    // Lue une seule fois : une clé absente n'empêche pas le démarrage
    let config = Config::load();
    if !config.has_api_key() {
        eprintln!(
            "Error: API key not found. Please set the {} environment variable.",
            cryptoanalyzer::config::API_KEY_VAR
        );
    }

    let client = CoinMarketCapClient::new(&config).context("Échec de la création du client HTTP")?;

    // CONCEPT RUST : mpsc channels
    // - (sender, receiver) : canal unidirectionnel
    // - command_tx/rx : l'UI envoie des commandes au worker
    // - result_tx/rx : le worker renvoie les résultats à l'UI
    // - App reste possédé par le thread UI : aucun Arc<Mutex<>> nécessaire
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let worker = spawn_background_worker(client, command_rx, result_tx)?;

    let mut app = App::new();

    // Chargement initial : sa fin planifiera le premier rafraîchissement automatique
    if let Some(command) = app.request_listings(RefreshTrigger::Startup) {
        send_command(&mut app, &command_tx, command);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Fermer le channel arrête le worker après sa commande en cours ;
    // on ne l'attend pas pour ne pas bloquer sur une requête lente
    drop(command_tx);
    drop(worker);

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Envoie une commande au worker
///
/// Si le worker a disparu, la zone concernée passe en échec au lieu de
/// rester en chargement.
fn send_command(app: &mut App, command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) {
    debug!(?command, "Sending command to worker");
    if command_tx.send(command).is_err() {
        error!("Worker thread unavailable, command dropped");
        app.fail_in_flight();
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. appliquer les résultats du worker
//   1. dessiner l'interface
//   2. traiter un événement clavier (ou un tick après 250ms)
//   3. lancer le rafraîchissement automatique s'il est échu
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_lost = false;

    while app.is_running() {
        // 0. RÉSULTATS (non bloquant, dans l'ordre d'arrivée)
        loop {
            match result_rx.try_recv() {
                Ok(result) => app.apply(result, Instant::now()),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if !worker_lost {
                        error!("Worker thread disconnected!");
                        worker_lost = true;
                    }
                    app.fail_in_flight();
                    break;
                }
            }
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                if let Some(command) = handle_event(app, event) {
                    send_command(app, command_tx, command);
                }
            }
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }

        // 3. UPDATE
        if let Some(command) = app.due_refresh(Instant::now()) {
            send_command(app, command_tx, command);
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et retourne la commande éventuelle pour le worker
///
/// En saisie, les touches alimentent le formulaire ; sinon ce sont des
/// raccourcis ("boutons") du dashboard.
fn handle_event(app: &mut App, event: Event) -> Option<AppCommand> {
    use cryptoanalyzer::ui::events::{
        get_char_from_event, is_backspace_event, is_convert_event, is_enter_event,
        is_escape_event, is_global_metrics_event, is_info_event, is_input_char_event,
        is_interrupt_event, is_next_field_event, is_previous_field_event, is_quit_event,
        is_refresh_event,
    };

    match event {
        Event::Key(_) if is_interrupt_event(&event) => {
            info!("User interrupted (Ctrl-C)");
            app.quit();
            None
        }

        // ========================================
        // Saisie dans un formulaire
        // ========================================
        Event::Key(_) if app.is_in_form() => {
            if is_escape_event(&event) {
                debug!("User cancelled input");
                app.close_form();
            } else if is_enter_event(&event) {
                info!(focus = ?app.focus, "User submitted form");
                return app.submit_form();
            } else if is_next_field_event(&event) {
                app.next_field();
            } else if is_previous_field_event(&event) {
                app.previous_field();
            } else if is_backspace_event(&event) {
                app.backspace();
            } else if is_input_char_event(&event) {
                if let Some(c) = get_char_from_event(&event) {
                    app.append_char(c);
                }
            }
            None
        }

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
            None
        }

        Event::Key(_) if is_refresh_event(&event) => {
            app.cancel_quit();
            app.request_listings(RefreshTrigger::Manual)
        }

        Event::Key(_) if is_global_metrics_event(&event) => {
            app.cancel_quit();
            app.request_global_metrics()
        }

        Event::Key(_) if is_convert_event(&event) => {
            app.cancel_quit();
            app.open_conversion_form();
            None
        }

        Event::Key(_) if is_info_event(&event) => {
            app.cancel_quit();
            app.open_info_form();
            None
        }

        Event::Key(_) => {
            // Toute autre touche annule la confirmation de quit
            app.cancel_quit();
            None
        }

        Event::Tick => None,
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
