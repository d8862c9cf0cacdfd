use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::market::band::{BandStatus, DeviationKind, band_status, deviation};
use crate::ui::AppState;
use crate::ui::theme::Palette;

pub(super) fn render_stock_table(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut AppState,
    palette: &Palette,
) {
    let block = Block::default()
        .title(" Tracked stocks ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.stocks.is_empty() {
        let message = if app.loaded_once {
            "No stocks tracked yet. Press 'a' to add one."
        } else {
            "Loading tracked stocks..."
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(palette.dim))
            .alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return;
    }

    // One line is taken by the column header
    let visible_rows = inner.height.saturating_sub(1) as usize;
    app.normalize_scroll(visible_rows);

    let header = Row::new(["Ticker", "Buy", "Sell", "Current", "Δ%", "Status"]).style(
        Style::default()
            .fg(palette.dim)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .stocks
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible_rows)
        .map(|(idx, stock)| {
            let price = app.snapshot.price(&stock.ticker);
            let status = band_status(stock.buy_price, stock.sell_price, price);
            let diff = deviation(stock.buy_price, stock.sell_price, price);

            let price_cell = match price {
                Some(value) => Cell::from(format_price(value)).style(match status {
                    Some(BandStatus::Buy) => Style::default().fg(palette.buy),
                    Some(BandStatus::Sell) => Style::default().fg(palette.sell),
                    None => Style::default().fg(palette.text),
                }),
                None => Cell::from("N/A").style(Style::default().fg(palette.dim)),
            };

            let diff_cell = match diff {
                Some(diff) => {
                    Cell::from(format!("{:.2}%", diff.percent)).style(match diff.kind {
                        DeviationKind::High => Style::default().fg(palette.sell),
                        DeviationKind::Low => Style::default().fg(palette.buy),
                    })
                }
                None => Cell::from(""),
            };

            let status_cell = match status {
                Some(status) => Cell::from(status.label()).style(
                    match status {
                        BandStatus::Buy => Style::default().fg(palette.buy),
                        BandStatus::Sell => Style::default().fg(palette.sell),
                    }
                    .add_modifier(Modifier::BOLD),
                ),
                None => Cell::from(""),
            };

            let mut row = Row::new(vec![
                Cell::from(stock.ticker.clone()),
                Cell::from(format_price(stock.buy_price)),
                Cell::from(format_price(stock.sell_price)),
                price_cell,
                diff_cell,
                status_cell,
            ]);

            if idx == app.selected_row {
                row = row.style(
                    Style::default()
                        .fg(palette.selection_fg)
                        .bg(palette.selection_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }

            row
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .style(Style::default().fg(palette.text))
        .column_spacing(1);

    frame.render_widget(table, inner);
}

/// Display a price without trailing zeros, the way the backend echoes them
pub(super) fn format_price(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
