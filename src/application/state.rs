//! Application state for the terminal site.
//!
//! Holds the page shell mode, the modal host the quote wizard is rendered
//! in, and the keyboard focus inside the wizard.

use super::submission::{PendingSubmission, SubmissionOutcome};
use super::wizard::{FieldEdit, QuoteWizard, SubmitRefusal, WizardPhase};
use crate::domain::{Field, ValidationErrors};

/// Represents the current mode of the page shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Landing page with the service overview
    Home,
    /// Key binding reference is displayed
    Help,
}

/// A show/hide container for dialogs.
///
/// The host does not know what it contains; whoever owns the content decides
/// what happens when it is dismissed.
#[derive(Debug, Clone, Default)]
pub struct ModalHost {
    visible: bool,
}

impl ModalHost {
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides the modal, returning whether it was visible.
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use quote_wizard::application::App;
///
/// let mut app = App::default();
/// app.open_quote();
/// assert!(app.quote_modal.is_visible());
/// ```
#[derive(Debug)]
pub struct App {
    /// Current page shell mode
    pub mode: AppMode,
    /// Host for the quote request dialog
    pub quote_modal: ModalHost,
    /// The quote request wizard
    pub wizard: QuoteWizard,
    /// Index of the focused field within the current step
    pub focus: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Submission waiting to be handed to the dispatcher
    pub outbox: Option<PendingSubmission>,
    /// Help text scroll offset
    pub help_scroll: usize,
}

impl Default for App {
    fn default() -> Self {
        Self {
            mode: AppMode::Home,
            quote_modal: ModalHost::default(),
            wizard: QuoteWizard::new(),
            focus: 0,
            status_message: None,
            outbox: None,
            help_scroll: 0,
        }
    }
}

impl App {
    /// Opens the quote dialog on a fresh draft.
    pub fn open_quote(&mut self) {
        self.wizard.reset();
        self.focus = 0;
        self.mode = AppMode::Home;
        self.quote_modal.show();
    }

    /// Dismisses the quote dialog and discards the draft.
    ///
    /// An in-flight submission keeps running; its outcome is ignored.
    pub fn close_quote(&mut self) {
        if self.quote_modal.hide() {
            self.wizard.reset();
            self.focus = 0;
            self.outbox = None;
        }
    }

    /// The "Done" action on the confirmation view.
    pub fn finish_quote(&mut self) {
        if self.wizard.is_complete() {
            self.status_message = Some(format!(
                "Quote {} requested. Our team will contact you within 2 hours.",
                self.wizard.display_quote_id()
            ));
        }
        self.close_quote();
    }

    pub fn focused_field(&self) -> Option<Field> {
        match self.wizard.phase() {
            WizardPhase::Editing(step) => step.fields().get(self.focus).copied(),
            WizardPhase::Submitting | WizardPhase::Success => None,
        }
    }

    pub fn focus_next(&mut self) {
        let len = self.wizard.step().fields().len();
        self.focus = (self.focus + 1) % len;
    }

    pub fn focus_previous(&mut self) {
        let len = self.wizard.step().fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Applies an edit to the focused field.
    pub fn edit_focused(&mut self, edit: FieldEdit) -> bool {
        match self.focused_field() {
            Some(field) => self.wizard.edit(field, edit),
            None => false,
        }
    }

    /// Moves the wizard forward; on a blocked step, focuses the first
    /// invalid field.
    pub fn next_step(&mut self) {
        match self.wizard.advance() {
            Ok(_) => self.focus = 0,
            Err(errors) => self.focus_first_error(&errors),
        }
    }

    pub fn previous_step(&mut self) {
        let before = self.wizard.step();
        if self.wizard.retreat() != before {
            self.focus = 0;
        }
    }

    /// Starts a submission and queues it for dispatch.
    ///
    /// Refused while a submission is already in flight.
    pub fn request_submit(&mut self) -> Result<(), SubmitRefusal> {
        match self.wizard.begin_submission() {
            Ok(pending) => {
                self.outbox = Some(pending);
                Ok(())
            }
            Err(refusal) => {
                if let SubmitRefusal::Invalid(errors) = &refusal {
                    self.focus_first_error(errors);
                }
                Err(refusal)
            }
        }
    }

    /// Takes the queued submission, if any.
    pub fn take_outbox(&mut self) -> Option<PendingSubmission> {
        self.outbox.take()
    }

    /// Feeds a finished submission back into the wizard.
    pub fn apply_outcome(&mut self, outcome: SubmissionOutcome) -> bool {
        self.wizard.complete_submission(outcome.ticket, outcome.result)
    }

    /// Processes the result of copying the quote reference.
    pub fn set_copy_result(&mut self, result: Result<(), String>) {
        self.status_message = Some(match result {
            Ok(()) => format!("Copied quote ID {}", self.wizard.display_quote_id()),
            Err(error) => error,
        });
    }

    fn focus_first_error(&mut self, errors: &ValidationErrors) {
        let fields = self.wizard.step().fields();
        if let Some(index) = errors
            .iter()
            .find_map(|e| fields.iter().position(|f| *f == e.field()))
        {
            self.focus = index;
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Home => AppMode::Help,
            AppMode::Help => AppMode::Home,
        };
        self.help_scroll = 0;
    }
}
