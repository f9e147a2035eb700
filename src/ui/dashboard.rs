// ============================================================================
// Dashboard - Rendu de la fenêtre principale
// ============================================================================
//
// ┌──────────────────── Cryptocurrency Analyzer ─────────────────────┐
// │ Last update / Next refresh                                        │
// ├───────────────────────────────┬───────────────────────────────────┤
// │ Table Name/Symbol/Cap/Price   │ Bar chart market cap              │
// ├──────────────┬────────────────┴──────────┬────────────────────────┤
// │ Global       │ Currency conversion       │ Crypto info            │
// ├──────────────┴───────────────────────────┴────────────────────────┤
// │ Raccourcis                                                        │
// └───────────────────────────────────────────────────────────────────┘
// ============================================================================

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, RegionStatus};
use crate::ui::{chart, panels};
use crate::utils::format_usd;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(14),    // Table + graphique
            Constraint::Length(9),  // Panneaux métriques / conversion / info
            Constraint::Length(3),  // Footer
        ])
        .split(frame.size())
        .to_vec();

    render_header(frame, app, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1])
        .to_vec();
    render_listings_table(frame, app, middle[0]);
    chart::render_market_cap_chart(frame, app, middle[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(chunks[2])
        .to_vec();
    panels::render_global_metrics(frame, app, bottom[0]);
    panels::render_conversion(frame, app, bottom[1]);
    panels::render_info(frame, app, bottom[2]);

    render_footer(frame, app, chunks[3]);
}

// ============================================================================
// Header
// ============================================================================

/// Titre + heure du dernier rafraîchissement + compte à rebours
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Cryptocurrency Analyzer ")
        .title_alignment(Alignment::Center);

    let updated = app
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut spans = vec![
        Span::raw("Last update: "),
        Span::styled(updated, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
    ];

    if app.listings_panel.is_loading() {
        spans.push(Span::raw("  •  "));
        spans.push(Span::styled("Refreshing data...", Style::default().fg(Color::Yellow)));
    } else if let Some(remaining) = app.refresh.remaining(Instant::now()) {
        spans.push(Span::raw("  •  "));
        spans.push(Span::raw(format!("Next refresh in {}s", remaining.as_secs())));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Table des listings
// ============================================================================

/// Table Name / Symbol / Market Cap / Price
fn render_listings_table(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.listings_panel.status {
        RegionStatus::Failed => format!(" Top 10 Cryptocurrencies - {} ", app.listings_panel.text),
        _ => " Top 10 Cryptocurrencies ".to_string(),
    };
    let border_color = match app.listings_panel.status {
        RegionStatus::Failed => Color::Red,
        _ => Color::Cyan,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let header = Row::new(vec!["Name", "Symbol", "Market Cap", "Price"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .listings
        .iter()
        .map(|listing| {
            Row::new(vec![
                Cell::from(listing.name.clone()),
                Cell::from(listing.symbol.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(format_usd(listing.market_cap)),
                Cell::from(format_usd(listing.price)).style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(12),
        Constraint::Percentage(34),
        Constraint::Percentage(26),
    ];

    let table = Table::new(rows, widths).header(header).block(block);

    frame.render_widget(table, area);
}

// ============================================================================
// Footer : raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.is_in_form() { Color::Green } else { Color::Cyan }));

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Press ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_in_form() {
        Line::from(vec![
            key("[Tab/↑↓]", Color::Yellow),
            Span::raw(" Next field  "),
            key("[Enter]", Color::Green),
            Span::raw(" Submit  "),
            key("[Esc]", Color::Red),
            Span::raw(" Cancel"),
        ])
    } else {
        Line::from(vec![
            key("[q]", Color::Yellow),
            Span::raw(" Quit  "),
            key("[r]", Color::Yellow),
            Span::raw(" Refresh  "),
            key("[g]", Color::Yellow),
            Span::raw(" Global Metrics  "),
            key("[c]", Color::Green),
            Span::raw(" Convert Currency  "),
            key("[i]", Color::Green),
            Span::raw(" Crypto Info"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use crate::refresh::RefreshTrigger;
    use crate::worker::AppResult;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_table_rows() {
        let mut app = App::new();
        app.request_listings(RefreshTrigger::Startup);
        app.apply(
            AppResult::ListingsLoaded {
                trigger: RefreshTrigger::Startup,
                result: Ok(vec![Listing::new("Bitcoin", "BTC", 1.2e12, 61000.5)]),
            },
            Instant::now(),
        );

        let content = screen(&app);
        assert!(content.contains("Name"));
        assert!(content.contains("Market Cap"));
        assert!(content.contains("BTC"));
        assert!(content.contains("$61,000.50"));
        assert!(content.contains("Next refresh in"));
    }

    #[test]
    fn test_render_quit_confirmation() {
        let mut app = App::new();
        app.request_quit();

        assert!(screen(&app).contains("again to quit"));
    }
}
