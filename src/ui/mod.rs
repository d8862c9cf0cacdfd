//! User interface module
//!
//! Application state for the TUI plus the UI task driving it.

pub mod theme;
pub mod tui;
pub mod ui_manager;

use std::collections::HashMap;

use crate::backend::{PriceSnapshot, TrackedStock};
use crate::market::suggest::{SuggestionEntry, filter_suggestions};
use crate::session::SessionStats;
use self::theme::Theme;

/// Rows the user scrolls past before the theme indicator hides
pub const SCROLL_HIDE_THRESHOLD: usize = 5;

/// Input focus for key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddForm,
    ConfirmDelete,
}

/// Field focus inside the add-stock popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFormField {
    Ticker,
    BuyPrice,
    SellPrice,
}

/// Severity of a notice line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One line in the notices panel
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// State of the add-stock popup, including the ticker autocomplete
#[derive(Debug, Clone)]
pub struct AddForm {
    pub active_field: AddFormField,
    pub ticker_input: String,
    pub buy_input: String,
    pub sell_input: String,
    pub suggestions: Vec<SuggestionEntry>,
    /// Cursor into `suggestions`; -1 means none selected
    pub selected_suggestion: isize,
    pub suggestions_open: bool,
    pub error: Option<String>,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            active_field: AddFormField::Ticker,
            ticker_input: String::new(),
            buy_input: String::new(),
            sell_input: String::new(),
            suggestions: Vec::new(),
            selected_suggestion: -1,
            suggestions_open: false,
            error: None,
        }
    }
}

impl AddForm {
    /// Append a character to the ticker field and recompute suggestions
    pub fn edit_ticker(&mut self, c: char) {
        self.ticker_input.push(c);
        self.refresh_suggestions();
    }

    /// Remove the last character from the ticker field and recompute
    pub fn backspace_ticker(&mut self) {
        self.ticker_input.pop();
        self.refresh_suggestions();
    }

    /// Recompute the filtered list; every edit resets the cursor
    fn refresh_suggestions(&mut self) {
        self.suggestions = filter_suggestions(&self.ticker_input);
        self.selected_suggestion = -1;
        self.suggestions_open = !self.suggestions.is_empty();
        self.error = None;
    }

    pub fn select_next_suggestion(&mut self) {
        if !self.suggestions_open || self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() as isize - 1;
        self.selected_suggestion = (self.selected_suggestion + 1).min(last);
    }

    pub fn select_previous_suggestion(&mut self) {
        if !self.suggestions_open || self.suggestions.is_empty() {
            return;
        }
        self.selected_suggestion = (self.selected_suggestion - 1).max(-1);
    }

    pub fn close_suggestions(&mut self) {
        self.suggestions_open = false;
        self.selected_suggestion = -1;
    }

    pub fn selected_entry(&self) -> Option<SuggestionEntry> {
        if !self.suggestions_open || self.selected_suggestion < 0 {
            return None;
        }
        self.suggestions
            .get(self.selected_suggestion as usize)
            .copied()
    }

    /// Write the selected suggestion into the ticker field and close the
    /// list; false when nothing was selected
    pub fn commit_selected_suggestion(&mut self) -> bool {
        match self.selected_entry() {
            Some(entry) => {
                self.ticker_input = entry.ticker.to_string();
                self.close_suggestions();
                true
            }
            None => false,
        }
    }

    /// Move focus to the next field; leaving the ticker closes the list
    pub fn next_field(&mut self) {
        if self.active_field == AddFormField::Ticker {
            self.close_suggestions();
        }
        self.active_field = match self.active_field {
            AddFormField::Ticker => AddFormField::BuyPrice,
            AddFormField::BuyPrice => AddFormField::SellPrice,
            AddFormField::SellPrice => AddFormField::Ticker,
        };
    }

    pub fn previous_field(&mut self) {
        if self.active_field == AddFormField::Ticker {
            self.close_suggestions();
        }
        self.active_field = match self.active_field {
            AddFormField::Ticker => AddFormField::SellPrice,
            AddFormField::BuyPrice => AddFormField::Ticker,
            AddFormField::SellPrice => AddFormField::BuyPrice,
        };
    }

    /// Validate the form into a submission; on failure sets `error`
    pub fn validated(&mut self) -> Option<(String, f64, f64)> {
        let ticker = self.ticker_input.trim().to_uppercase();
        if ticker.is_empty() {
            self.error = Some("Enter a ticker".to_string());
            return None;
        }

        let buy_price = match self.buy_input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.error = Some("Enter a numeric buy bound".to_string());
                return None;
            }
        };
        let sell_price = match self.sell_input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.error = Some("Enter a numeric sell bound".to_string());
                return None;
            }
        };

        self.error = None;
        Some((ticker, buy_price, sell_price))
    }
}

/// Application state for the TUI
#[derive(Debug)]
pub struct AppState {
    pub should_quit: bool,
    pub input_mode: InputMode,
    /// Structure of the table: the last full generation
    pub stocks: Vec<TrackedStock>,
    /// Latest applied price snapshot, replaced whole
    pub snapshot: PriceSnapshot,
    /// History series per ticker for the current generation
    pub histories: HashMap<String, Vec<f64>>,
    pub generation: u64,
    pub selected_row: usize,
    pub scroll_offset: usize,
    last_scroll_offset: usize,
    pub theme: Theme,
    pub theme_switch_hidden: bool,
    pub add_form: AddForm,
    pub pending_delete: Option<String>,
    pub notices: Vec<Notice>,
    pub max_notices: usize,
    pub stats: SessionStats,
    pub loaded_once: bool,
}

impl AppState {
    pub fn new(theme: Theme, max_notices: usize) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            stocks: Vec::new(),
            snapshot: PriceSnapshot::default(),
            histories: HashMap::new(),
            generation: 0,
            selected_row: 0,
            scroll_offset: 0,
            last_scroll_offset: 0,
            theme,
            theme_switch_hidden: false,
            add_form: AddForm::default(),
            pending_delete: None,
            notices: Vec::new(),
            max_notices: max_notices.max(1),
            stats: SessionStats::default(),
            loaded_once: false,
        }
    }

    /// Apply a full table generation: structure, snapshot, and chart slate
    /// are replaced together
    pub fn apply_table(
        &mut self,
        generation: u64,
        stocks: Vec<TrackedStock>,
        snapshot: PriceSnapshot,
    ) {
        self.generation = generation;
        self.stocks = stocks;
        self.snapshot = snapshot;
        // Charts belong to the generation they were fetched for
        self.histories.clear();
        self.loaded_once = true;

        if self.stocks.is_empty() {
            self.selected_row = 0;
        } else if self.selected_row >= self.stocks.len() {
            self.selected_row = self.stocks.len() - 1;
        }
        self.scroll_offset = self.scroll_offset.min(self.selected_row);
    }

    /// Apply a price-only patch; rows keep the last generation's structure
    pub fn apply_prices(&mut self, snapshot: PriceSnapshot) {
        self.snapshot = snapshot;
    }

    /// Accept a history series only for the rendered generation
    pub fn apply_history(&mut self, generation: u64, ticker: &str, prices: Vec<f64>) {
        if generation == self.generation {
            self.histories.insert(ticker.to_string(), prices);
        }
    }

    pub fn selected_stock(&self) -> Option<&TrackedStock> {
        self.stocks.get(self.selected_row)
    }

    pub fn select_next_row(&mut self) {
        if !self.stocks.is_empty() && self.selected_row + 1 < self.stocks.len() {
            self.selected_row += 1;
        }
    }

    pub fn select_previous_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Keep the selected row inside the viewport and track scroll direction
    /// for the theme indicator
    pub fn normalize_scroll(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }

        if self.selected_row < self.scroll_offset {
            self.scroll_offset = self.selected_row;
        } else if self.selected_row >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected_row + 1 - visible_rows;
        }

        self.update_theme_switch_visibility();
    }

    /// Hide the theme indicator while scrolling down past the threshold;
    /// any upward scroll restores it
    fn update_theme_switch_visibility(&mut self) {
        if self.scroll_offset > self.last_scroll_offset
            && self.scroll_offset > SCROLL_HIDE_THRESHOLD
        {
            self.theme_switch_hidden = true;
        } else if self.scroll_offset < self.last_scroll_offset {
            self.theme_switch_hidden = false;
        }
        self.last_scroll_offset = self.scroll_offset;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn open_add_form(&mut self) {
        self.add_form = AddForm::default();
        self.input_mode = InputMode::AddForm;
    }

    pub fn close_add_form(&mut self) {
        self.add_form = AddForm::default();
        if self.input_mode == InputMode::AddForm {
            self.input_mode = InputMode::Normal;
        }
    }

    /// Keep the form open and surface the backend's rejection
    pub fn fail_add(&mut self, message: String) {
        if self.input_mode == InputMode::AddForm {
            self.add_form.error = Some(message.clone());
        }
        self.push_notice(NoticeLevel::Error, message);
    }

    /// Arm the delete confirmation for the selected row
    pub fn request_delete(&mut self) {
        if let Some(stock) = self.selected_stock() {
            self.pending_delete = Some(stock.ticker.clone());
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        if self.input_mode == InputMode::ConfirmDelete {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
        if self.notices.len() > self.max_notices {
            let excess = self.notices.len() - self.max_notices;
            self.notices.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(ticker: &str) -> TrackedStock {
        TrackedStock {
            ticker: ticker.to_string(),
            buy_price: 100.0,
            sell_price: 120.0,
        }
    }

    fn app_with_stocks(tickers: &[&str]) -> AppState {
        let mut app = AppState::new(Theme::Light, 10);
        let stocks = tickers.iter().map(|t| stock(t)).collect();
        app.apply_table(1, stocks, PriceSnapshot::default());
        app
    }

    #[test]
    fn test_row_navigation_clamps() {
        let mut app = app_with_stocks(&["SBER", "GAZP"]);

        app.select_previous_row();
        assert_eq!(app.selected_row, 0);

        app.select_next_row();
        app.select_next_row();
        assert_eq!(app.selected_row, 1);
    }

    #[test]
    fn test_apply_table_clamps_selection() {
        let mut app = app_with_stocks(&["SBER", "GAZP", "LKOH"]);
        app.selected_row = 2;

        app.apply_table(2, vec![stock("SBER")], PriceSnapshot::default());
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_apply_table_clears_charts() {
        let mut app = app_with_stocks(&["SBER"]);
        app.apply_history(1, "SBER", vec![1.0, 2.0]);
        assert!(app.histories.contains_key("SBER"));

        app.apply_table(2, vec![stock("SBER")], PriceSnapshot::default());
        assert!(app.histories.is_empty());
    }

    #[test]
    fn test_history_for_old_generation_ignored() {
        let mut app = app_with_stocks(&["SBER"]);
        app.apply_table(2, vec![stock("SBER")], PriceSnapshot::default());

        app.apply_history(1, "SBER", vec![1.0, 2.0]);
        assert!(app.histories.is_empty());

        app.apply_history(2, "SBER", vec![3.0, 4.0]);
        assert_eq!(app.histories["SBER"], vec![3.0, 4.0]);
    }

    #[test]
    fn test_price_patch_keeps_table_structure() {
        let mut app = app_with_stocks(&["SBER", "GAZP"]);

        let patch: PriceSnapshot =
            serde_json::from_str(r#"{"prices":{"SBER":305.0,"YNDX":4000.0}}"#).unwrap();
        app.apply_prices(patch);

        assert_eq!(app.stocks.len(), 2);
        assert_eq!(app.snapshot.price("SBER"), Some(305.0));
        // Removed server-side rows survive until the next full cycle
        assert_eq!(app.snapshot.price("GAZP"), None);
    }

    #[test]
    fn test_suggestion_cursor_resets_on_edit() {
        let mut form = AddForm::default();
        form.edit_ticker('S');
        form.select_next_suggestion();
        form.select_next_suggestion();
        assert_eq!(form.selected_suggestion, 1);

        form.edit_ticker('B');
        assert_eq!(form.selected_suggestion, -1);
        assert!(form.suggestions_open);
    }

    #[test]
    fn test_suggestion_cursor_clamps() {
        let mut form = AddForm::default();
        form.edit_ticker('S');
        form.edit_ticker('B');
        assert_eq!(form.suggestions.len(), 2);

        form.select_previous_suggestion();
        assert_eq!(form.selected_suggestion, -1);

        form.select_next_suggestion();
        form.select_next_suggestion();
        form.select_next_suggestion();
        assert_eq!(form.selected_suggestion, 1);
    }

    #[test]
    fn test_commit_selected_suggestion() {
        let mut form = AddForm::default();
        form.edit_ticker('S');
        form.edit_ticker('B');

        assert!(!form.commit_selected_suggestion());

        form.select_next_suggestion();
        assert!(form.commit_selected_suggestion());
        assert_eq!(form.ticker_input, "SBER");
        assert!(!form.suggestions_open);
    }

    #[test]
    fn test_form_validation() {
        let mut form = AddForm::default();
        form.ticker_input = "sber".to_string();
        form.buy_input = "250.5".to_string();
        form.sell_input = "abc".to_string();
        assert!(form.validated().is_none());
        assert!(form.error.is_some());

        form.sell_input = "310".to_string();
        assert_eq!(
            form.validated(),
            Some(("SBER".to_string(), 250.5, 310.0))
        );
    }

    #[test]
    fn test_theme_indicator_hides_on_downward_scroll() {
        let mut app = app_with_stocks(&[
            "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A12",
        ]);

        for _ in 0..11 {
            app.select_next_row();
            app.normalize_scroll(3);
        }
        assert!(app.theme_switch_hidden);

        app.select_previous_row();
        app.select_previous_row();
        app.select_previous_row();
        app.normalize_scroll(3);
        assert!(!app.theme_switch_hidden);
    }

    #[test]
    fn test_notices_are_bounded() {
        let mut app = AppState::new(Theme::Light, 3);
        for i in 0..5 {
            app.push_notice(NoticeLevel::Info, format!("notice {}", i));
        }
        assert_eq!(app.notices.len(), 3);
        assert_eq!(app.notices[0].message, "notice 2");
    }
}
