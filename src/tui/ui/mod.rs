//! UI module: View components for the TUI.

pub mod report;
pub mod upload;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::domain::{ServerStatus, ServerSummary};
use crate::tui::styles::MedicalTheme;

pub fn render_header(f: &mut Frame, area: Rect, server: &ServerSummary, api_url: &str) {
    let (dot_style, status) = match server.status {
        ServerStatus::Online => (MedicalTheme::success(), "online"),
        ServerStatus::Offline => (MedicalTheme::danger(), "offline"),
        ServerStatus::Unknown => (MedicalTheme::text_muted(), "checking"),
    };

    let mut spans = vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("AMD Detection System", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Age-Related Macular Degeneration Classification",
            MedicalTheme::text_secondary(),
        ),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled("● ", dot_style),
        Span::styled(format!("{api_url} ({status})"), MedicalTheme::text_secondary()),
    ];
    if let Some(model) = &server.model {
        spans.push(Span::styled(" │ ", MedicalTheme::text_muted()));
        spans.push(Span::styled(model.summary(), MedicalTheme::text_secondary()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Inline banner for the controller's error state.
pub fn render_error_banner(f: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled("! ", MedicalTheme::danger()),
        Span::styled(message, MedicalTheme::text()),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(banner, area);
}

/// Blocking alert drawn over everything else.
pub fn render_alert(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 7, f.area());

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("OK", MedicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Alert ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(Clear, area);
    f.render_widget(content, area);
}

pub fn render_footer(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(format!("[{key}] "), MedicalTheme::key_hint()));
        spans.push(Span::styled(format!("{desc}  "), MedicalTheme::key_desc()));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

/// Rectangle of `percent_x`% width and fixed `height`, centered in `area`.
#[must_use]
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
