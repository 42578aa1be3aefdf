//! Diagnostic report view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, LineGauge, Paragraph, Wrap},
    Frame,
};

use crate::application::{DistributionBar, Report, MEDICAL_DISCLAIMER};
use crate::domain::Severity;
use crate::tui::styles::MedicalTheme;

/// Render a finished report. Stateless: everything comes from `report`.
pub fn render_report(f: &mut Frame, area: Rect, report: &Report) {
    let block = Block::default()
        .title(Span::styled(" Diagnostic Report ", MedicalTheme::subtitle()))
        .title_top(Line::from(Span::styled(format!(" {} ", report.date), MedicalTheme::text_muted())).right_aligned())
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let bars_height = u16::try_from(report.bars.len())
        .unwrap_or(u16::MAX)
        .saturating_mul(2)
        .saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),           // Classification + confidence
            Constraint::Length(bars_height), // Distribution
            Constraint::Min(4),              // Disclaimer
        ])
        .split(inner);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_classification(f, top[0], report);
    render_confidence(f, top[1], report);
    render_distribution(f, chunks[1], report);
    render_medical_notice(f, chunks[2]);
}

fn render_classification(f: &mut Frame, area: Rect, report: &Report) {
    let content = Paragraph::new(vec![
        Line::from(Span::styled(
            report.classification.as_str(),
            MedicalTheme::severity(report.severity),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} ", report.severity.label()),
            MedicalTheme::severity_badge(report.severity),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Classification ", MedicalTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_confidence(f: &mut Frame, area: Rect, report: &Report) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Confidence Level ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::severity(report.severity))
        .percent(report.gauge_percent)
        .label(Span::styled(
            format!("{}%", report.gauge_percent),
            MedicalTheme::title(),
        ));

    f.render_widget(gauge, area);
}

fn render_distribution(f: &mut Frame, area: Rect, report: &Report) {
    let block = Block::default()
        .title(Span::styled(" Probability Distribution ", MedicalTheme::text_secondary()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Only lay out the rows that fit.
    let visible = usize::from(inner.height / 2);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(report.bars.iter().take(visible).map(|_| Constraint::Length(2)))
        .split(inner);

    for (bar, row) in report.bars.iter().zip(rows.iter()) {
        render_bar(f, *row, bar, report.severity);
    }
}

fn render_bar(f: &mut Frame, area: Rect, bar: &DistributionBar, severity: Severity) {
    let name_style = if bar.active {
        MedicalTheme::severity(severity)
    } else {
        MedicalTheme::text()
    };
    let marker = if bar.active { "▶ " } else { "  " };

    let gauge = LineGauge::default()
        .ratio(bar.fill_ratio())
        .label(Line::from(vec![
            Span::styled(marker, name_style),
            Span::styled(format!("{:<18}", bar.label), name_style),
            Span::styled(format!("{:>6} ", bar.percent_label()), MedicalTheme::text_secondary()),
        ]))
        .filled_style(MedicalTheme::distribution_bar(severity, bar.active))
        .unfilled_style(MedicalTheme::text_muted().add_modifier(Modifier::DIM));

    f.render_widget(gauge, area);
}

fn render_medical_notice(f: &mut Frame, area: Rect) {
    let notice = Paragraph::new(vec![
        Line::from(Span::styled("Medical Disclaimer", MedicalTheme::title())),
        Line::from(Span::styled(MEDICAL_DISCLAIMER, MedicalTheme::text_muted())),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(notice, area);
}
