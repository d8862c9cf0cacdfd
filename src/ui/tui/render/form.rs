use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::ui::theme::Palette;
use crate::ui::{AddFormField, AppState};

use super::layout::centered_rect;

const LABEL_WIDTH: u16 = 12;

pub(super) fn render_add_form(frame: &mut Frame<'_>, app: &AppState, palette: &Palette) {
    let area = centered_rect(50, 60, frame.size());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Add stock ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .margin(1)
        .split(inner);

    let form = &app.add_form;
    render_field(
        frame,
        layout[0],
        "Ticker",
        &form.ticker_input,
        form.active_field == AddFormField::Ticker,
        palette,
    );
    render_field(
        frame,
        layout[1],
        "Buy bound",
        &form.buy_input,
        form.active_field == AddFormField::BuyPrice,
        palette,
    );
    render_field(
        frame,
        layout[2],
        "Sell bound",
        &form.sell_input,
        form.active_field == AddFormField::SellPrice,
        palette,
    );

    if let Some(error) = &form.error {
        let line = Paragraph::new(Span::styled(
            error.clone(),
            Style::default().fg(palette.error),
        ));
        frame.render_widget(line, layout[3]);
    }

    // Suggestion list below the fields; nothing renders when the filtered
    // list is empty
    if form.suggestions_open && !form.suggestions.is_empty() {
        let items: Vec<ListItem> = form
            .suggestions
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<6}", entry.ticker),
                        Style::default()
                            .fg(palette.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(entry.name, Style::default().fg(palette.dim)),
                ]))
            })
            .collect();

        let mut state = ListState::default();
        if form.selected_suggestion >= 0 {
            state.select(Some(form.selected_suggestion as usize));
        }

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(palette.selection_fg)
                    .bg(palette.selection_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, layout[4], &mut state);
    }
}

fn render_field(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    palette: &Palette,
) {
    let label_style = if active {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim)
    };

    let line = Paragraph::new(Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH as usize), label_style),
        Span::styled(value.to_string(), Style::default().fg(palette.text)),
    ]));
    frame.render_widget(line, area);

    if active {
        let max_cursor_x = area.x.saturating_add(area.width.saturating_sub(1));
        let cursor_x = area
            .x
            .saturating_add(LABEL_WIDTH)
            .saturating_add(value.len() as u16)
            .min(max_cursor_x);
        frame.set_cursor(cursor_x, area.y);
    }
}
