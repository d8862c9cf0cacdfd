use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::ui::theme::Palette;
use crate::ui::{AppState, NoticeLevel};

pub(super) fn render_notices(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let block = Block::default().title(" Notices ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut items: Vec<ListItem> = app
        .notices
        .iter()
        .rev()
        .take(inner.height as usize)
        .map(|notice| {
            let style = match notice.level {
                NoticeLevel::Info => Style::default().fg(palette.info),
                NoticeLevel::Error => Style::default().fg(palette.error),
            };
            ListItem::new(Span::styled(notice.message.clone(), style))
        })
        .collect();

    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "No notices yet",
            Style::default().fg(palette.dim),
        )));
    }

    let list = List::new(items).style(Style::default());
    frame.render_widget(list, inner);
}
