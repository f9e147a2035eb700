// ============================================================================
// Chart - Capitalisation du top 10
// ============================================================================
// Barres horizontales : une barre par cryptomonnaie, longueur = market cap.
//
// Le graphique est recalculé à chaque frame à partir de App::chart_bars() :
// il n'existe qu'un seul graphique, remplacé à chaque rafraîchissement.
// ============================================================================

use ratatui::{
    layout::{Alignment, Direction, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, RegionStatus};
use crate::utils::format_compact_usd;

/// Largeur max des noms affichés à gauche des barres
const LABEL_WIDTH: usize = 12;

/// Dessine le graphique "Top 10 Cryptocurrencies by Market Cap"
pub fn render_market_cap_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Top 10 Cryptocurrencies by Market Cap (USD) ");

    let bars_data = app.chart_bars();

    // Pas encore de données : message selon l'état de la zone
    if bars_data.is_empty() {
        let message = match app.listings_panel.status {
            RegionStatus::Loading | RegionStatus::Idle => "Loading...",
            _ => "No data to display",
        };
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let bars: Vec<Bar> = bars_data
        .iter()
        .map(|&(name, market_cap)| {
            Bar::default()
                .value(market_cap)
                .label(Line::from(truncate(name, LABEL_WIDTH)))
                .text_value(format_compact_usd(market_cap as f64))
                .style(Style::default().fg(Color::LightBlue))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Tronque un nom avec une ellipse si nécessaire
fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(width - 1).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use crate::refresh::RefreshTrigger;
    use crate::worker::AppResult;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bitcoin", 12), "Bitcoin");
        assert_eq!(truncate("Wrapped Bitcoin Token", 8), "Wrapped…");
    }

    #[test]
    fn test_render_bars() {
        let mut app = App::new();
        app.request_listings(RefreshTrigger::Startup);
        app.apply(
            AppResult::ListingsLoaded {
                trigger: RefreshTrigger::Startup,
                result: Ok(vec![
                    Listing::new("Bitcoin", "BTC", 1.2e12, 61000.0),
                    Listing::new("Ethereum", "ETH", 4.0e11, 3300.0),
                ]),
            },
            Instant::now(),
        );

        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal
            .draw(|frame| render_market_cap_chart(frame, &app, frame.size()))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Bitcoin"));
        assert!(content.contains("Ethereum"));
    }
}
