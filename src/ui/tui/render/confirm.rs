use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::AppState;
use crate::ui::theme::Palette;

pub(super) fn render_confirm_delete(frame: &mut Frame<'_>, app: &AppState, palette: &Palette) {
    let Some(ticker) = app.pending_delete.as_deref() else {
        return;
    };

    let area = super::layout::centered_rect(40, 20, frame.size());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Confirm delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.error));
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let lines = vec![
        Line::from(Span::styled(
            format!("Delete {}?", ticker),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(palette.error)),
            Span::styled(": delete   ", Style::default().fg(palette.dim)),
            Span::styled("n", Style::default().fg(palette.accent)),
            Span::styled(": cancel", Style::default().fg(palette.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
