//! The quote request wizard state machine.
//!
//! The wizard walks the requester through three steps (locations, cargo,
//! contact), validates each step before moving on, submits the finished
//! draft through a [`QuoteSubmitter`] and shows either a confirmation or an
//! inline error. All state lives in [`QuoteWizard`]; it is mutated only
//! through the transition methods below.

use super::submission::{PendingSubmission, QuoteSubmitter, StoredResult};
use crate::domain::{
    display_quote_id, validate_step, Field, QuoteDraft, QuoteRecord, QuoteSummary, Step,
    ValidationErrors,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// The requester is filling in a step.
    Editing(Step),
    /// The draft has been sent and the wizard waits for the store.
    Submitting,
    /// The store accepted the quote.
    Success,
}

impl Default for WizardPhase {
    fn default() -> Self {
        WizardPhase::Editing(Step::Locations)
    }
}

/// A single user edit to a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// Replace the value (option label or code for select fields).
    Set(String),
    /// Type one character at the end of a text field.
    Insert(char),
    /// Delete the last character of a text field.
    Backspace,
    NextOption,
    PreviousOption,
}

/// Why a submission was not started.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitRefusal {
    #[error("quotes can only be submitted from the contact step")]
    NotOnContactStep,
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

/// State of one run through the quote form.
///
/// # Examples
///
/// ```
/// use quote_wizard::application::{QuoteWizard, WizardPhase};
/// use quote_wizard::domain::Step;
///
/// let mut wizard = QuoteWizard::new();
/// assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Locations));
///
/// // Going back from the first step does nothing.
/// wizard.retreat();
/// assert_eq!(wizard.step(), Step::Locations);
/// ```
#[derive(Debug, Default)]
pub struct QuoteWizard {
    phase: WizardPhase,
    draft: QuoteDraft,
    error: Option<String>,
    quote_id: Option<String>,
    validation: ValidationErrors,
    ticket: u64,
}

impl QuoteWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// The step the wizard is addressable at.
    ///
    /// While submitting, and after success, this is the contact step.
    pub fn step(&self) -> Step {
        match self.phase {
            WizardPhase::Editing(step) => step,
            WizardPhase::Submitting | WizardPhase::Success => Step::Contact,
        }
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    /// The submission error currently shown, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Field errors from the last blocked advance or submit.
    pub fn validation(&self) -> &ValidationErrors {
        &self.validation
    }

    /// Identifier returned by the store after a successful submission.
    pub fn quote_id(&self) -> Option<&str> {
        self.quote_id.as_deref()
    }

    pub fn display_quote_id(&self) -> String {
        display_quote_id(self.quote_id())
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary::of(&self.draft)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }

    pub fn is_complete(&self) -> bool {
        self.phase == WizardPhase::Success
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.phase == WizardPhase::Editing(Step::Contact)
    }

    /// Applies an edit to the draft.
    ///
    /// Edits are only accepted for fields of the step being filled in; the
    /// draft is frozen while submitting and after success. Any accepted edit
    /// clears the submission error and the validation error of that field.
    pub fn edit(&mut self, field: Field, edit: FieldEdit) -> bool {
        let WizardPhase::Editing(step) = self.phase else {
            return false;
        };
        if field.step() != step {
            debug!(%field, step = step.number(), "ignoring edit outside the current step");
            return false;
        }

        let changed = match edit {
            FieldEdit::Set(value) => self.draft.set(field, &value),
            FieldEdit::Insert(c) => self.draft.push_char(field, c),
            FieldEdit::Backspace => self.draft.pop_char(field),
            FieldEdit::NextOption => self.draft.cycle(field, true),
            FieldEdit::PreviousOption => self.draft.cycle(field, false),
        };

        if changed {
            self.error = None;
            self.validation.clear_field(field);
        }
        changed
    }

    /// Moves to the next step once the current step is valid.
    ///
    /// Does nothing on the contact step or outside of editing. When the
    /// current step has invalid fields the wizard stays where it is and the
    /// errors are returned (and kept for display).
    pub fn advance(&mut self) -> Result<Step, ValidationErrors> {
        let WizardPhase::Editing(step) = self.phase else {
            return Ok(self.step());
        };
        let Some(next) = step.next() else {
            return Ok(step);
        };

        if let Err(errors) = validate_step(&self.draft, step) {
            debug!(step = step.number(), errors = errors.0.len(), "advance blocked");
            self.validation = errors.clone();
            return Err(errors);
        }

        self.validation = ValidationErrors::default();
        self.phase = WizardPhase::Editing(next);
        debug!(step = next.number(), "advanced");
        Ok(next)
    }

    /// Moves back one step. Does nothing on the first step, while
    /// submitting or after success. A shown error does not block it.
    pub fn retreat(&mut self) -> Step {
        if let WizardPhase::Editing(step) = self.phase {
            if let Some(previous) = step.previous() {
                self.validation = ValidationErrors::default();
                self.phase = WizardPhase::Editing(previous);
                debug!(step = previous.number(), "retreated");
            }
        }
        self.step()
    }

    /// Freezes the draft and enters [`WizardPhase::Submitting`].
    ///
    /// The whole draft is validated first. At most one submission is in
    /// flight: while submitting, further calls are refused. The returned
    /// ticket must be handed back to [`complete_submission`](Self::complete_submission).
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitRefusal> {
        match self.phase {
            WizardPhase::Submitting => return Err(SubmitRefusal::AlreadySubmitting),
            WizardPhase::Editing(Step::Contact) => {}
            WizardPhase::Editing(_) | WizardPhase::Success => {
                return Err(SubmitRefusal::NotOnContactStep);
            }
        }

        let record = match QuoteRecord::from_draft(&self.draft) {
            Ok(record) => record,
            Err(errors) => {
                debug!(errors = errors.0.len(), "submission blocked by validation");
                self.validation = errors.clone();
                return Err(SubmitRefusal::Invalid(errors));
            }
        };

        self.ticket += 1;
        self.error = None;
        self.validation = ValidationErrors::default();
        self.phase = WizardPhase::Submitting;
        info!(
            ticket = self.ticket,
            from = %record.pickup_city,
            to = %record.delivery_city,
            "submitting quote request"
        );

        Ok(PendingSubmission {
            ticket: self.ticket,
            record,
        })
    }

    /// Applies the store's answer to the submission identified by `ticket`.
    ///
    /// Outcomes for a submission the wizard no longer waits on (because it
    /// was reset in the meantime) are ignored and `false` is returned.
    pub fn complete_submission(&mut self, ticket: u64, result: StoredResult) -> bool {
        if self.phase != WizardPhase::Submitting || ticket != self.ticket {
            debug!(ticket, current = self.ticket, "ignoring stale submission outcome");
            return false;
        }

        match result {
            Ok(stored) => {
                info!(id = stored.id.as_deref().unwrap_or("-"), "quote request accepted");
                self.quote_id = stored.id;
                self.phase = WizardPhase::Success;
            }
            Err(error) => {
                warn!(%error, "quote submission failed");
                self.error = Some(error.user_message().to_string());
                self.phase = WizardPhase::Editing(Step::Contact);
            }
        }
        true
    }

    /// Submits the draft and waits for the store's answer.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<(), SubmitRefusal>
    where
        S: QuoteSubmitter + ?Sized,
    {
        let pending = self.begin_submission()?;
        let result = submitter.submit_quote(&pending.record).await;
        self.complete_submission(pending.ticket, result);
        Ok(())
    }

    /// Discards the draft and returns to the first step.
    pub fn reset(&mut self) {
        if self.phase == WizardPhase::Submitting {
            debug!(ticket = self.ticket, "abandoning in-flight submission");
        }
        self.phase = WizardPhase::default();
        self.draft = QuoteDraft::default();
        self.error = None;
        self.quote_id = None;
        self.validation = ValidationErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::submission::testing::FakeSubmitter;
    use crate::application::{SubmissionError, GENERIC_SUBMIT_ERROR};
    use crate::domain::{CargoType, City, StoredQuote, VehicleType};

    fn fill(wizard: &mut QuoteWizard, values: &[(Field, &str)]) {
        for (field, value) in values {
            assert!(wizard.edit(*field, FieldEdit::Set(value.to_string())), "{field:?}");
        }
    }

    /// Scenario draft: Mumbai to Delhi NCR, electronics in a 14 ft truck.
    fn wizard_on_contact_step() -> QuoteWizard {
        let mut wizard = QuoteWizard::new();
        fill(
            &mut wizard,
            &[
                (Field::PickupCity, "Mumbai"),
                (Field::PickupAddress, "Andheri East"),
                (Field::DeliveryCity, "Delhi NCR"),
                (Field::DeliveryAddress, "Okhla Phase 2"),
            ],
        );
        wizard.advance().unwrap();
        fill(
            &mut wizard,
            &[
                (Field::CargoType, "Electronics"),
                (Field::Weight, "500"),
                (Field::VehicleType, "14ft"),
            ],
        );
        wizard.advance().unwrap();
        fill(
            &mut wizard,
            &[
                (Field::Name, "Asha"),
                (Field::Phone, "9876543210"),
                (Field::PreferredDate, "2026-01-10"),
            ],
        );
        wizard
    }

    fn stored(id: &str) -> StoredQuote {
        serde_json::from_value(serde_json::json!({ "id": id })).unwrap()
    }

    #[test]
    fn test_new_wizard_is_empty_on_first_step() {
        let wizard = QuoteWizard::new();
        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Locations));
        assert!(wizard.draft().is_empty());
        assert!(wizard.error().is_none());
        assert!(wizard.quote_id().is_none());
        assert!(!wizard.can_submit());
    }

    #[test]
    fn test_advance_blocked_by_missing_required_fields() {
        let mut wizard = QuoteWizard::new();
        wizard.edit(Field::PickupCity, FieldEdit::Set("Mumbai".to_string()));

        let errors = wizard.advance().unwrap_err();
        assert_eq!(wizard.step(), Step::Locations);
        assert!(errors.for_field(Field::PickupAddress).is_some());
        assert!(errors.for_field(Field::PickupCity).is_none());
        assert_eq!(wizard.validation(), &errors);
    }

    #[test]
    fn test_editing_clears_that_fields_validation_error() {
        let mut wizard = QuoteWizard::new();
        let _ = wizard.advance();
        assert!(wizard.validation().for_field(Field::PickupAddress).is_some());

        wizard.edit(Field::PickupAddress, FieldEdit::Insert('A'));
        assert!(wizard.validation().for_field(Field::PickupAddress).is_none());
        assert!(wizard.validation().for_field(Field::DeliveryAddress).is_some());
    }

    #[test]
    fn test_advance_at_last_step_is_noop() {
        let mut wizard = wizard_on_contact_step();
        let before = wizard.draft().clone();
        assert_eq!(wizard.advance(), Ok(Step::Contact));
        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Contact));
        assert_eq!(wizard.draft(), &before);

        // Also a no-op with an empty contact step.
        let mut wizard = wizard_on_contact_step();
        wizard.edit(Field::Name, FieldEdit::Set(String::new()));
        assert_eq!(wizard.advance(), Ok(Step::Contact));
    }

    #[test]
    fn test_retreat_at_first_step_is_noop() {
        let mut wizard = QuoteWizard::new();
        assert_eq!(wizard.retreat(), Step::Locations);

        wizard.edit(Field::PickupCity, FieldEdit::NextOption);
        assert_eq!(wizard.retreat(), Step::Locations);
        assert_eq!(wizard.draft().pickup_city, Some(City::Mumbai));
    }

    #[test]
    fn test_edit_outside_current_step_is_refused() {
        let mut wizard = wizard_on_contact_step();
        assert!(!wizard.edit(Field::PickupAddress, FieldEdit::Set(String::new())));
        assert!(!wizard.edit(Field::VehicleType, FieldEdit::NextOption));
        assert_eq!(wizard.draft().pickup_address, "Andheri East");
        assert_eq!(wizard.draft().vehicle_type, Some(VehicleType::Truck14Ft));
        assert!(wizard.edit(Field::Name, FieldEdit::Insert('!')));
    }

    #[test]
    fn test_retreat_keeps_draft() {
        let mut wizard = wizard_on_contact_step();
        assert_eq!(wizard.retreat(), Step::Cargo);
        assert_eq!(wizard.retreat(), Step::Locations);
        assert_eq!(wizard.draft().cargo_type, Some(CargoType::Electronics));
        assert_eq!(wizard.draft().name, "Asha");
    }

    #[tokio::test]
    async fn test_successful_submission_scenario() {
        let mut wizard = wizard_on_contact_step();
        let submitter = FakeSubmitter::succeeding("9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d");

        wizard.submit(&submitter).await.unwrap();

        assert_eq!(wizard.phase(), WizardPhase::Success);
        assert_eq!(wizard.quote_id(), Some("9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d"));
        assert_eq!(wizard.display_quote_id(), "9B1DEB4D");
        assert_eq!(wizard.summary().route(), "Mumbai → Delhi NCR");
        assert_eq!(submitter.call_count(), 1);

        let records = submitter.records.lock().unwrap();
        assert_eq!(records[0].customer_phone, "9876543210");
        assert_eq!(records[0].status, "pending");
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_draft_and_shows_message() {
        let mut wizard = wizard_on_contact_step();
        let before = wizard.draft().clone();
        let submitter = FakeSubmitter::failing(SubmissionError::new("Network timeout"));

        wizard.submit(&submitter).await.unwrap();

        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Contact));
        assert_eq!(wizard.error(), Some("Network timeout"));
        assert_eq!(wizard.draft(), &before);
        assert!(wizard.quote_id().is_none());
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_generic_text() {
        let mut wizard = wizard_on_contact_step();
        let submitter = FakeSubmitter::failing(SubmissionError::without_message());

        wizard.submit(&submitter).await.unwrap();

        assert_eq!(wizard.step(), Step::Contact);
        assert_eq!(wizard.error(), Some(GENERIC_SUBMIT_ERROR));
    }

    #[tokio::test]
    async fn test_editing_after_error_clears_it_without_moving() {
        let mut wizard = wizard_on_contact_step();
        let submitter = FakeSubmitter::failing(SubmissionError::new("Network timeout"));
        wizard.submit(&submitter).await.unwrap();
        assert!(wizard.error().is_some());

        wizard.edit(Field::Phone, FieldEdit::Backspace);

        assert!(wizard.error().is_none());
        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Contact));
    }

    #[tokio::test]
    async fn test_error_does_not_block_retreat() {
        let mut wizard = wizard_on_contact_step();
        let submitter = FakeSubmitter::failing(SubmissionError::new("Network timeout"));
        wizard.submit(&submitter).await.unwrap();

        assert_eq!(wizard.retreat(), Step::Cargo);
        assert_eq!(wizard.error(), Some("Network timeout"));
    }

    #[tokio::test]
    async fn test_retry_clears_error_and_can_succeed() {
        let mut wizard = wizard_on_contact_step();
        wizard
            .submit(&FakeSubmitter::failing(SubmissionError::new("Network timeout")))
            .await
            .unwrap();

        let pending = wizard.begin_submission().unwrap();
        assert!(wizard.error().is_none());
        assert!(wizard.is_submitting());

        assert!(wizard.complete_submission(pending.ticket, Ok(stored("abc12345xyz"))));
        assert!(wizard.is_complete());
    }

    #[test]
    fn test_second_submit_while_submitting_is_refused() {
        let mut wizard = wizard_on_contact_step();
        let first = wizard.begin_submission().unwrap();

        assert_eq!(wizard.begin_submission(), Err(SubmitRefusal::AlreadySubmitting));
        assert!(!wizard.can_submit());
        assert_eq!(first.ticket, 1);
    }

    #[test]
    fn test_draft_is_frozen_while_submitting() {
        let mut wizard = wizard_on_contact_step();
        wizard.begin_submission().unwrap();

        assert!(!wizard.edit(Field::Name, FieldEdit::Insert('x')));
        assert_eq!(wizard.draft().name, "Asha");
        assert_eq!(wizard.retreat(), Step::Contact);
    }

    #[test]
    fn test_submit_only_from_contact_step() {
        let mut wizard = QuoteWizard::new();
        assert_eq!(wizard.begin_submission(), Err(SubmitRefusal::NotOnContactStep));
    }

    #[test]
    fn test_submit_validates_contact_step() {
        let mut wizard = wizard_on_contact_step();
        wizard.edit(Field::Phone, FieldEdit::Set("98765".to_string()));

        match wizard.begin_submission() {
            Err(SubmitRefusal::Invalid(errors)) => {
                assert!(errors.for_field(Field::Phone).is_some());
            }
            other => panic!("expected validation refusal, got {other:?}"),
        }
        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Contact));
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut wizard = wizard_on_contact_step();
        wizard.reset();
        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Locations));
        assert!(wizard.draft().is_empty());

        let mut wizard = wizard_on_contact_step();
        let pending = wizard.begin_submission().unwrap();
        wizard.reset();
        assert!(wizard.draft().is_empty());
        // The abandoned request's outcome is ignored.
        assert!(!wizard.complete_submission(pending.ticket, Ok(stored("late"))));
        assert_eq!(wizard.phase(), WizardPhase::Editing(Step::Locations));

        let mut wizard = wizard_on_contact_step();
        let pending = wizard.begin_submission().unwrap();
        wizard.complete_submission(pending.ticket, Ok(stored("abcdef0123")));
        assert!(wizard.is_complete());
        wizard.reset();
        assert_eq!(wizard.step(), Step::Locations);
        assert!(wizard.draft().is_empty());
        assert!(wizard.quote_id().is_none());
        assert!(wizard.error().is_none());
    }

    #[test]
    fn test_stale_ticket_is_ignored_after_resubmission() {
        let mut wizard = wizard_on_contact_step();
        let first = wizard.begin_submission().unwrap();
        wizard.complete_submission(first.ticket, Err(SubmissionError::new("Network timeout")));

        let second = wizard.begin_submission().unwrap();
        assert!(!wizard.complete_submission(first.ticket, Ok(stored("stale"))));
        assert!(wizard.complete_submission(second.ticket, Ok(stored("fresh0001"))));
        assert_eq!(wizard.quote_id(), Some("fresh0001"));
    }

    #[test]
    fn test_success_without_identifier_shows_placeholder() {
        let mut wizard = wizard_on_contact_step();
        let pending = wizard.begin_submission().unwrap();
        let no_id: StoredQuote = serde_json::from_str("{}").unwrap();
        wizard.complete_submission(pending.ticket, Ok(no_id));

        assert!(wizard.is_complete());
        assert_eq!(wizard.display_quote_id(), "—");
    }
}
