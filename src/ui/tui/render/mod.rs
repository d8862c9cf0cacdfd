mod chart;
mod confirm;
mod footer;
mod form;
mod header;
mod layout;
mod notices;
mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::ui::{AppState, InputMode};

use self::chart::render_chart;
use self::confirm::render_confirm_delete;
use self::footer::render_footer;
use self::form::render_add_form;
use self::header::render_header;
use self::notices::render_notices;
use self::table::render_stock_table;

pub(super) fn render_root(frame: &mut Frame<'_>, app: &mut AppState) {
    let palette = app.theme.palette();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], app, &palette);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_stock_table(frame, body_chunks[0], app, &palette);
    render_chart(frame, body_chunks[1], app, &palette);

    render_notices(frame, chunks[2], app, &palette);
    render_footer(frame, chunks[3], app, &palette);

    match app.input_mode {
        InputMode::AddForm => render_add_form(frame, app, &palette),
        InputMode::ConfirmDelete => render_confirm_delete(frame, app, &palette),
        InputMode::Normal => {}
    }
}
