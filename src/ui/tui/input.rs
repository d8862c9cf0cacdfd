use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::UiAction;
use crate::ui::{AddFormField, AppState, InputMode};

/// Handle keyboard events for the TUI, returning actions for the session
pub fn handle_key_event(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    if key_event.kind == KeyEventKind::Release {
        return UiAction::None;
    }

    // Global shortcuts first
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        match key_event.code {
            KeyCode::Char('c') | KeyCode::Char('d') => {
                app.should_quit = true;
                return UiAction::QuitRequested;
            }
            _ => {}
        }
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode_keys(app, key_event),
        InputMode::AddForm => handle_add_form_keys(app, key_event),
        InputMode::ConfirmDelete => handle_confirm_delete_keys(app, key_event),
    }
}

fn handle_normal_mode_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            UiAction::QuitRequested
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_row();
            UiAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_row();
            UiAction::None
        }
        KeyCode::Char('a') => {
            app.open_add_form();
            UiAction::None
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete();
            UiAction::None
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            UiAction::ThemeToggled
        }
        KeyCode::Char('r') => UiAction::Reload,
        _ => UiAction::None,
    }
}

fn handle_add_form_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    // Escape closes the suggestion list first, the popup second
    if key_event.code == KeyCode::Esc {
        if app.add_form.suggestions_open {
            app.add_form.close_suggestions();
        } else {
            app.close_add_form();
        }
        return UiAction::None;
    }

    let form = &mut app.add_form;

    match key_event.code {
        KeyCode::Tab => {
            form.next_field();
            UiAction::None
        }
        KeyCode::BackTab => {
            form.previous_field();
            UiAction::None
        }
        KeyCode::Down => {
            if form.active_field == AddFormField::Ticker {
                form.select_next_suggestion();
            }
            UiAction::None
        }
        KeyCode::Up => {
            if form.active_field == AddFormField::Ticker {
                form.select_previous_suggestion();
            }
            UiAction::None
        }
        KeyCode::Enter => {
            // A selected suggestion wins over form navigation
            if form.active_field == AddFormField::Ticker && form.commit_selected_suggestion() {
                return UiAction::None;
            }

            match form.active_field {
                AddFormField::Ticker | AddFormField::BuyPrice => {
                    form.next_field();
                    UiAction::None
                }
                AddFormField::SellPrice => match form.validated() {
                    Some((ticker, buy_price, sell_price)) => UiAction::SubmitAdd {
                        ticker,
                        buy_price,
                        sell_price,
                    },
                    None => UiAction::None,
                },
            }
        }
        KeyCode::Backspace => {
            match form.active_field {
                AddFormField::Ticker => form.backspace_ticker(),
                AddFormField::BuyPrice => {
                    form.buy_input.pop();
                    form.error = None;
                }
                AddFormField::SellPrice => {
                    form.sell_input.pop();
                    form.error = None;
                }
            }
            UiAction::None
        }
        KeyCode::Char(c) => {
            if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                return UiAction::None;
            }
            match form.active_field {
                AddFormField::Ticker => {
                    if c.is_ascii_alphanumeric() {
                        form.edit_ticker(c.to_ascii_uppercase());
                    }
                }
                AddFormField::BuyPrice => {
                    if c.is_ascii_digit() || c == '.' {
                        form.buy_input.push(c);
                        form.error = None;
                    }
                }
                AddFormField::SellPrice => {
                    if c.is_ascii_digit() || c == '.' {
                        form.sell_input.push(c);
                        form.error = None;
                    }
                }
            }
            UiAction::None
        }
        _ => UiAction::None,
    }
}

fn handle_confirm_delete_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let ticker = app.pending_delete.take();
            app.input_mode = InputMode::Normal;
            match ticker {
                Some(ticker) => UiAction::SubmitDelete { ticker },
                None => UiAction::None,
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
            app.cancel_delete();
            UiAction::None
        }
        _ => UiAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{PriceSnapshot, TrackedStock};
    use crate::ui::theme::Theme;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_one_stock() -> AppState {
        let mut app = AppState::new(Theme::Light, 10);
        app.apply_table(
            1,
            vec![TrackedStock {
                ticker: "SBER".to_string(),
                buy_price: 250.0,
                sell_price: 310.0,
            }],
            PriceSnapshot::default(),
        );
        app
    }

    #[test]
    fn test_delete_without_confirmation_submits_nothing() {
        let mut app = app_with_one_stock();

        let action = handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(action, UiAction::None);
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);

        let action = handle_key_event(&mut app, key(KeyCode::Char('n')));
        assert_eq!(action, UiAction::None);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_confirmed_delete_submits_the_selected_ticker() {
        let mut app = app_with_one_stock();

        handle_key_event(&mut app, key(KeyCode::Char('d')));
        let action = handle_key_event(&mut app, key(KeyCode::Char('y')));
        assert_eq!(
            action,
            UiAction::SubmitDelete {
                ticker: "SBER".to_string()
            }
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_typing_recomputes_suggestions_and_resets_cursor() {
        let mut app = app_with_one_stock();
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.input_mode, InputMode::AddForm);

        handle_key_event(&mut app, key(KeyCode::Char('s')));
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.add_form.selected_suggestion, 0);

        handle_key_event(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.add_form.ticker_input, "SB");
        assert_eq!(app.add_form.selected_suggestion, -1);
    }

    #[test]
    fn test_enter_commits_the_selected_suggestion() {
        let mut app = app_with_one_stock();
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        handle_key_event(&mut app, key(KeyCode::Char('b')));
        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Down));

        let action = handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(action, UiAction::None);
        assert_eq!(app.add_form.ticker_input, "SBERP");
        assert!(!app.add_form.suggestions_open);
        // Still on the ticker field; Enter committed instead of advancing
        assert_eq!(app.add_form.active_field, AddFormField::Ticker);
    }

    #[test]
    fn test_escape_closes_list_before_popup() {
        let mut app = app_with_one_stock();
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert!(app.add_form.suggestions_open);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::AddForm);
        assert!(!app.add_form.suggestions_open);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_full_form_submission() {
        let mut app = app_with_one_stock();
        handle_key_event(&mut app, key(KeyCode::Char('a')));

        for c in "gazp".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Enter));
        for c in "120.5".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Enter));
        for c in "140".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }

        let action = handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(
            action,
            UiAction::SubmitAdd {
                ticker: "GAZP".to_string(),
                buy_price: 120.5,
                sell_price: 140.0,
            }
        );
    }

    #[test]
    fn test_price_fields_reject_letters() {
        let mut app = app_with_one_stock();
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.add_form.active_field, AddFormField::BuyPrice);

        handle_key_event(&mut app, key(KeyCode::Char('x')));
        handle_key_event(&mut app, key(KeyCode::Char('1')));
        handle_key_event(&mut app, key(KeyCode::Char('.')));
        handle_key_event(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.add_form.buy_input, "1.5");
    }
}
