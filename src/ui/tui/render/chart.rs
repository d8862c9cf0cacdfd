use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::market::sparkline;
use crate::ui::AppState;
use crate::ui::theme::Palette;

pub(super) fn render_chart(frame: &mut Frame<'_>, area: Rect, app: &AppState, palette: &Palette) {
    let block = Block::default()
        .title(" Price history ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 12 || inner.height < 4 {
        render_placeholder(frame, inner, palette, "Terminal too small");
        return;
    }

    let Some(stock) = app.selected_stock() else {
        render_placeholder(frame, inner, palette, "No stock selected");
        return;
    };

    let Some(history) = app.histories.get(&stock.ticker) else {
        render_placeholder(frame, inner, palette, "Loading chart...");
        return;
    };

    // Fewer than 2 points produce no chart
    let Some(poly) = sparkline::polyline(history) else {
        render_placeholder(frame, inner, palette, "Not enough history");
        return;
    };

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(8), Constraint::Min(2)])
        .split(inner);
    let axis_area = horizontal[0];
    let chart_area = horizontal[1];

    let min = history.iter().copied().fold(f64::INFINITY, f64::min);
    let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Price axis labels (max, mid, min)
    {
        let buffer = frame.buffer_mut();
        let label_style = Style::default().fg(palette.dim);
        buffer.set_string(
            axis_area.x,
            axis_area.y,
            format_price_label(max, axis_area.width),
            label_style,
        );
        if axis_area.height > 2 {
            let mid_y = axis_area.y + axis_area.height / 2;
            buffer.set_string(
                axis_area.x,
                mid_y,
                format_price_label((min + max) / 2.0, axis_area.width),
                label_style,
            );
        }
        let bottom_y = axis_area.y + axis_area.height.saturating_sub(1);
        buffer.set_string(
            axis_area.x,
            bottom_y,
            format_price_label(min, axis_area.width),
            label_style,
        );
    }

    let cells = poly.project(chart_area.width, chart_area.height);
    let style = Style::default().fg(palette.chart);
    let buffer = frame.buffer_mut();
    for pair in cells.windows(2) {
        draw_segment(buffer, chart_area, pair[0], pair[1], style);
    }
}

/// Draw one polyline segment by walking the columns between two projected
/// points, filling vertical gaps so the line stays connected
fn draw_segment(buffer: &mut Buffer, area: Rect, from: (u16, u16), to: (u16, u16), style: Style) {
    let (c0, r0) = from;
    let (c1, r1) = to;

    let span = c1.saturating_sub(c0);
    if span == 0 {
        let (lo, hi) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
        for row in lo..=hi {
            put(buffer, area, c0, row, "│", style);
        }
        return;
    }

    let mut prev_row = r0;
    for step in 0..=span {
        let col = c0 + step;
        let t = f64::from(step) / f64::from(span);
        let row = (f64::from(r0) + (f64::from(r1) - f64::from(r0)) * t).round() as u16;

        let symbol = if row == prev_row {
            "─"
        } else if row < prev_row {
            "╱"
        } else {
            "╲"
        };
        put(buffer, area, col, row, symbol, style);

        if row.abs_diff(prev_row) > 1 {
            let (lo, hi) = if row < prev_row {
                (row + 1, prev_row - 1)
            } else {
                (prev_row + 1, row - 1)
            };
            for gap_row in lo..=hi {
                put(buffer, area, col, gap_row, "│", style);
            }
        }

        prev_row = row;
    }
}

fn put(buffer: &mut Buffer, area: Rect, col: u16, row: u16, symbol: &str, style: Style) {
    let x = area.x.saturating_add(col);
    let y = area.y.saturating_add(row);
    if x < area.x + area.width && y < area.y + area.height {
        buffer.get_mut(x, y).set_style(style).set_symbol(symbol);
    }
}

fn format_price_label(value: f64, width: u16) -> String {
    let mut label = format!("{:.2}", value);
    let max_len = width as usize;
    if max_len > 0 && label.len() > max_len {
        label.truncate(max_len);
    }
    label
}

fn render_placeholder(frame: &mut Frame<'_>, area: Rect, palette: &Palette, message: &str) {
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(palette.dim))
            .alignment(Alignment::Center),
        area,
    );
}
