use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::ui::AppState;
use crate::ui::theme::Palette;

pub(super) fn render_header(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let title = Span::styled(
        " Bandwatch ",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let tracked = Span::styled(
        format!("{} tracked ", app.stocks.len()),
        Style::default().fg(palette.dim),
    );

    let updated = match app.snapshot.last_updated_label() {
        Some(time) => Span::styled(
            format!("Updated {} ", time),
            Style::default().fg(palette.dim),
        ),
        None => Span::styled("Waiting for prices ", Style::default().fg(palette.dim)),
    };

    let stats = Span::styled(
        format!(
            "Full: {} | Prices: {} | Errors: {} ",
            app.stats.full_refreshes, app.stats.price_refreshes, app.stats.fetch_errors
        ),
        Style::default().fg(palette.dim),
    );

    let mut spans = vec![
        title,
        Span::raw(" "),
        tracked,
        Span::raw(" "),
        updated,
        Span::raw(" "),
        stats,
    ];

    // The indicator hides while the user scrolls down through the table
    if !app.theme_switch_hidden {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("◐ {}", app.theme.label()),
            Style::default().fg(palette.accent),
        ));
    }

    let block = Block::default().borders(Borders::ALL).title(" Session ");
    let paragraph = Paragraph::new(vec![Line::from(spans)])
        .style(Style::default().fg(palette.text))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
