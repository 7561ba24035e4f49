use crate::application::{App, AppMode, FieldEdit, WizardPhase};
use crate::infrastructure::copy_to_clipboard;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::debug;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if app.quote_modal.is_visible() {
            match app.wizard.phase() {
                WizardPhase::Editing(_) => Self::handle_wizard_editing(app, key, modifiers),
                WizardPhase::Submitting => Self::handle_wizard_submitting(app, key),
                WizardPhase::Success => Self::handle_wizard_success(app, key),
            }
            return;
        }

        match app.mode {
            AppMode::Home => Self::handle_home_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_home_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('g') | KeyCode::Enter => {
                app.status_message = None;
                app.open_quote();
            }
            KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
            KeyCode::Esc => app.status_message = None,
            _ => {}
        }
    }

    fn handle_wizard_editing(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('b') = key {
                app.previous_step();
            }
            return;
        }

        let on_choice = app.focused_field().is_some_and(|f| f.is_choice());

        match key {
            KeyCode::Esc => app.close_quote(),
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Right if on_choice => {
                app.edit_focused(FieldEdit::NextOption);
            }
            KeyCode::Left if on_choice => {
                app.edit_focused(FieldEdit::PreviousOption);
            }
            KeyCode::Char(' ') if on_choice => {
                app.edit_focused(FieldEdit::NextOption);
            }
            KeyCode::Char(c) if !on_choice => {
                app.edit_focused(FieldEdit::Insert(c));
            }
            KeyCode::Backspace => {
                app.edit_focused(FieldEdit::Backspace);
            }
            KeyCode::Enter => {
                if app.wizard.can_submit() {
                    if let Err(refusal) = app.request_submit() {
                        debug!(%refusal, "submit refused");
                    }
                } else {
                    app.next_step();
                }
            }
            _ => {}
        }
    }

    fn handle_wizard_submitting(app: &mut App, key: KeyCode) {
        if key == KeyCode::Esc {
            app.close_quote();
        }
    }

    fn handle_wizard_success(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('d') => app.finish_quote(),
            KeyCode::Char('c') => {
                if let Some(id) = app.wizard.quote_id().map(str::to_string) {
                    let result = copy_to_clipboard(&id);
                    app.set_copy_result(result);
                }
            }
            KeyCode::Esc => app.close_quote(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.toggle_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SubmissionOutcome;
    use crate::domain::{Field, Step, StoredQuote};

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Drives the form to the contact step with valid locations and cargo.
    fn reach_contact_step(app: &mut App) {
        press(app, KeyCode::Char('g'));
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        type_text(app, "Andheri East");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        type_text(app, "Okhla");
        press(app, KeyCode::Enter);
        assert_eq!(app.wizard.step(), Step::Cargo);

        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        type_text(app, "500");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Left);
        press(app, KeyCode::Enter);
        assert_eq!(app.wizard.step(), Step::Contact);
    }

    fn fill_contact(app: &mut App) {
        type_text(app, "Asha");
        press(app, KeyCode::Tab);
        type_text(app, "9876543210");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Tab);
        type_text(app, "2026-01-10");
    }

    #[test]
    fn test_g_opens_quote_modal() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('g'));
        assert!(app.quote_modal.is_visible());
        assert_eq!(app.focused_field(), Some(Field::PickupCity));
    }

    #[test]
    fn test_help_toggle_and_scroll() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Home);
    }

    #[test]
    fn test_arrows_cycle_choices() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.wizard.draft().value(Field::PickupCity), "Mumbai");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.wizard.draft().value(Field::PickupCity), "Lucknow");
    }

    #[test]
    fn test_typing_on_choice_field_is_ignored() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.wizard.draft().is_empty());
    }

    #[test]
    fn test_enter_on_incomplete_step_stays() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard.step(), Step::Locations);
        assert!(app.wizard.validation().for_field(Field::PickupCity).is_some());
    }

    #[test]
    fn test_ctrl_b_goes_back_and_keeps_values() {
        let mut app = App::default();
        reach_contact_step(&mut app);

        InputHandler::handle_key_event(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);

        assert_eq!(app.wizard.step(), Step::Cargo);
        assert_eq!(app.wizard.draft().value(Field::Weight), "500");
    }

    #[test]
    fn test_backspace_edits_text_field() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Pun");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.wizard.draft().value(Field::PickupAddress), "Pu");
    }

    #[test]
    fn test_enter_on_contact_step_queues_one_submission() {
        let mut app = App::default();
        reach_contact_step(&mut app);
        fill_contact(&mut app);

        press(&mut app, KeyCode::Enter);
        assert!(app.wizard.is_submitting());
        press(&mut app, KeyCode::Enter);

        assert!(app.take_outbox().is_some());
        assert!(app.take_outbox().is_none());
    }

    #[test]
    fn test_enter_on_success_closes_with_status() {
        let mut app = App::default();
        reach_contact_step(&mut app);
        fill_contact(&mut app);
        press(&mut app, KeyCode::Enter);
        let pending = app.take_outbox().unwrap();
        let stored: StoredQuote = serde_json::from_str(r#"{"id":"ab12cd34-ffff"}"#).unwrap();
        app.apply_outcome(SubmissionOutcome {
            ticket: pending.ticket,
            result: Ok(stored),
        });

        press(&mut app, KeyCode::Enter);

        assert!(!app.quote_modal.is_visible());
        assert!(app.status_message.as_deref().unwrap().contains("AB12CD34"));
    }

    #[test]
    fn test_esc_discards_draft() {
        let mut app = App::default();
        reach_contact_step(&mut app);
        press(&mut app, KeyCode::Esc);
        assert!(!app.quote_modal.is_visible());

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.wizard.step(), Step::Locations);
        assert!(app.wizard.draft().is_empty());
    }
}
