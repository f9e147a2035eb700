// ============================================================================
// Panneaux : métriques globales, conversion, informations
// ============================================================================
// Chaque panneau affiche l'état de sa zone :
// - Idle    : aide (quelle touche utiliser)
// - Loading : "Loading..."
// - Ready   : texte du résultat
// - Failed  : message d'erreur fixe, en rouge
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ConversionField, Focus, Panel, RegionStatus};

/// Panneau "Display Global Metrics"
pub fn render_global_metrics(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(" Global Metrics ", &app.global_panel, false);

    let lines = result_lines(&app.global_panel, "Press [g] to display global metrics");

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

/// Formulaire de conversion (3 champs) + résultat
pub fn render_conversion(frame: &mut Frame, app: &App, area: Rect) {
    let focused_field = match app.focus {
        Focus::Conversion(field) => Some(field),
        _ => None,
    };
    let block = panel_block(" Currency Conversion ", &app.conversion_panel, focused_field.is_some());

    let mut lines: Vec<Line> = [ConversionField::Amount, ConversionField::From, ConversionField::To]
        .into_iter()
        .map(|field| {
            input_line(
                field.label(),
                app.conversion_form.field(field),
                focused_field == Some(field),
            )
        })
        .collect();

    lines.push(Line::from(""));
    lines.extend(result_lines(&app.conversion_panel, "Press [c] to convert currency"));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

/// Recherche d'informations (1 champ) + résultat
pub fn render_info(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Info;
    let block = panel_block(" Crypto Info ", &app.info_panel, focused);

    let mut lines = vec![input_line("Crypto Symbol", &app.info_input, focused), Line::from("")];
    lines.extend(result_lines(&app.info_panel, "Press [i] to look up a symbol"));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

// ============================================================================
// Helpers
// ============================================================================

/// Bordure colorée selon l'état : vert en saisie, rouge en échec
fn panel_block<'a>(title: &'a str, panel: &Panel, focused: bool) -> Block<'a> {
    let color = if focused {
        Color::Green
    } else if panel.status == RegionStatus::Failed {
        Color::Red
    } else {
        Color::Cyan
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

/// Ligne "Label: valeur" avec curseur si le champ a le focus
fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ];
    if focused {
        spans.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    Line::from(spans)
}

/// Lignes de résultat d'une zone selon son état
fn result_lines<'a>(panel: &'a Panel, hint: &'a str) -> Vec<Line<'a>> {
    match panel.status {
        RegionStatus::Idle => vec![Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))],
        RegionStatus::Loading => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))],
        RegionStatus::Ready => panel
            .text
            .lines()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::White))))
            .collect(),
        RegionStatus::Failed => vec![Line::from(Span::styled(
            panel.text.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))],
    }
}
