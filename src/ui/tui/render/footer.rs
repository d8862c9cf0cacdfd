use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::ui::theme::Palette;
use crate::ui::{AppState, InputMode};

pub(super) fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let block = Block::default().title(" Keys ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key_style = Style::default().fg(palette.accent);
    let text_style = Style::default().fg(palette.dim);

    let mut hints = match app.input_mode {
        InputMode::Normal => vec![
            Span::styled("↑/↓", key_style),
            Span::styled(": Select   ", text_style),
            Span::styled("a", key_style),
            Span::styled(": Add   ", text_style),
            Span::styled("d", key_style),
            Span::styled(": Delete   ", text_style),
            Span::styled("t", key_style),
            Span::styled(": Theme   ", text_style),
            Span::styled("r", key_style),
            Span::styled(": Refresh   ", text_style),
            Span::styled("q", key_style),
            Span::styled(": Quit", text_style),
        ],
        InputMode::AddForm => vec![
            Span::styled("Enter", key_style),
            Span::styled(": Next/Submit   ", text_style),
            Span::styled("Tab", key_style),
            Span::styled(": Field   ", text_style),
            Span::styled("↑/↓", key_style),
            Span::styled(": Suggestion   ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(": Close", text_style),
        ],
        InputMode::ConfirmDelete => vec![
            Span::styled("y", key_style),
            Span::styled(": Delete   ", text_style),
            Span::styled("n", key_style),
            Span::styled(": Cancel", text_style),
        ],
    };

    if let Some(notice) = app.notices.last() {
        hints.push(Span::styled("   |   ", text_style));
        hints.push(Span::styled(
            notice.message.clone(),
            Style::default().fg(palette.info),
        ));
    }

    let paragraph = Paragraph::new(Text::from(vec![Line::from(hints)])).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}
