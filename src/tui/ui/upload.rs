//! Upload zone and image preview views.

use image::RgbImage;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::application::ScreeningState;
use crate::domain::{format_size, SelectedFile};
use crate::tui::styles::MedicalTheme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Empty state: path entry plus drop hint.
pub fn render_upload_zone(f: &mut Frame, area: Rect, path_input: &str) {
    let block = Block::default()
        .title(Span::styled(" Upload Fundus Image ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(4), // Instructions
            Constraint::Length(3), // Path entry
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let instructions = Paragraph::new(vec![
        Line::from(Span::styled(
            "Type a path and press Enter, or drag and drop a file onto the terminal",
            MedicalTheme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Supported: JPG, PNG (Max 16MB)",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[1]);

    let entry = Paragraph::new(Line::from(vec![
        Span::styled(path_input, MedicalTheme::text()),
        Span::styled("█", MedicalTheme::focused()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Path ", MedicalTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(entry, chunks[2]);
}

/// Selected file: thumbnail on the left, details and status on the right.
pub fn render_preview_section(f: &mut Frame, area: Rect, state: &ScreeningState, tick: usize) {
    let Some(file) = &state.selected else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let block = Block::default()
        .title(Span::styled(" Preview ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    match state.preview.as_ref().map(|p| p.thumbnail.as_ref()) {
        Some(Some(thumbnail)) => f.render_widget(Thumbnail::new(thumbnail), inner),
        Some(None) => f.render_widget(
            Paragraph::new(Span::styled("(no thumbnail)", MedicalTheme::text_muted()))
                .alignment(Alignment::Center),
            inner,
        ),
        None => f.render_widget(
            Paragraph::new(Span::styled("Loading preview...", MedicalTheme::text_muted()))
                .alignment(Alignment::Center),
            inner,
        ),
    }

    render_file_details(f, chunks[1], file, state, tick);
}

fn render_file_details(
    f: &mut Frame,
    area: Rect,
    file: &SelectedFile,
    state: &ScreeningState,
    tick: usize,
) {
    let dimensions = state
        .preview
        .as_ref()
        .and_then(|p| p.dimensions)
        .map_or_else(|| "-".to_string(), |(w, h)| format!("{w} x {h}"));

    let status = if state.in_flight {
        Line::from(vec![
            Span::styled(SPINNER[tick % SPINNER.len()], MedicalTheme::info()),
            Span::styled(" Analyzing...", MedicalTheme::info()),
        ])
    } else if state.result.is_some() {
        Line::from(Span::styled("Analysis complete", MedicalTheme::success()))
    } else {
        Line::from(vec![
            Span::styled("Press ", MedicalTheme::text_secondary()),
            Span::styled("[Enter]", MedicalTheme::key_hint()),
            Span::styled(" to analyze", MedicalTheme::text_secondary()),
        ])
    };

    let details = Paragraph::new(vec![
        detail_line("File", &file.name),
        detail_line("Type", &file.content_type),
        detail_line("Size", &format_size(file.size())),
        detail_line("Pixels", &dimensions),
        Line::from(""),
        status,
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(details, area);
}

fn detail_line<'a>(label: &'a str, value: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<8}"), MedicalTheme::text_secondary()),
        Span::styled(value.to_string(), MedicalTheme::text()),
    ])
}

/// Half-block rendering of an RGB thumbnail: each cell shows two pixels
/// stacked vertically.
pub struct Thumbnail<'a> {
    image: &'a RgbImage,
}

impl<'a> Thumbnail<'a> {
    #[must_use]
    pub fn new(image: &'a RgbImage) -> Self {
        Self { image }
    }
}

impl Widget for Thumbnail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (img_w, img_h) = self.image.dimensions();
        if img_w == 0 || img_h == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Fit inside the area, keeping aspect ratio (a cell is 1 x 2 pixels).
        let avail_w = f64::from(area.width);
        let avail_h = f64::from(area.height) * 2.0;
        let scale = (avail_w / f64::from(img_w)).min(avail_h / f64::from(img_h));
        let out_w = ((f64::from(img_w) * scale).floor() as u16).clamp(1, area.width);
        let out_rows = ((f64::from(img_h) * scale / 2.0).floor() as u16).clamp(1, area.height);

        let x0 = area.x + (area.width - out_w) / 2;
        let y0 = area.y + (area.height - out_rows) / 2;

        let sample = |col: u16, half_row: u32| -> Color {
            let px = (u32::from(col) * img_w / u32::from(out_w)).min(img_w - 1);
            let py = (half_row * img_h / (u32::from(out_rows) * 2)).min(img_h - 1);
            let p = self.image.get_pixel(px, py);
            Color::Rgb(p[0], p[1], p[2])
        };

        for row in 0..out_rows {
            for col in 0..out_w {
                let top = sample(col, u32::from(row) * 2);
                let bottom = sample(col, u32::from(row) * 2 + 1);
                if let Some(cell) = buf.cell_mut((x0 + col, y0 + row)) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_thumbnail_fills_cells() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        for x in 0..4 {
            for y in 2..4 {
                img.put_pixel(x, y, Rgb([0, 0, 255]));
            }
        }

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        Thumbnail::new(&img).render(area, &mut buf);

        let top = &buf[(0, 0)];
        assert_eq!(top.symbol(), "▀");
        assert_eq!(top.fg, Color::Rgb(255, 0, 0));
        assert_eq!(top.bg, Color::Rgb(255, 0, 0));

        let bottom = &buf[(0, 1)];
        assert_eq!(bottom.fg, Color::Rgb(0, 0, 255));
        assert_eq!(bottom.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_thumbnail_empty_area_is_noop() {
        let img = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        Thumbnail::new(&img).render(area, &mut buf);
    }
}
