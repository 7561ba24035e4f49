//! Quote submission boundary.
//!
//! [`QuoteSubmitter`] is the seam between the wizard and whatever persists
//! quotes. [`SubmissionDispatcher`] runs submissions as background tasks and
//! hands the outcomes back to the event loop, which applies them to the
//! wizard on its own thread.

use crate::domain::{QuoteRecord, StoredQuote};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Message shown when a submission fails without a usable reason.
pub const GENERIC_SUBMIT_ERROR: &str = "Failed to submit quote. Please try again.";

/// The remote write of a quote failed.
///
/// Carries the store's own message when one was provided.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(GENERIC_SUBMIT_ERROR))]
pub struct SubmissionError {
    message: Option<String>,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure the store gave no reason for.
    pub fn without_message() -> Self {
        Self { message: None }
    }

    /// The store's message, if it was non-blank.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// Text to show the requester; never blank.
    pub fn user_message(&self) -> &str {
        self.message().unwrap_or(GENERIC_SUBMIT_ERROR)
    }
}

/// Persists a validated quote and returns the created row.
#[async_trait]
pub trait QuoteSubmitter: Send + Sync {
    async fn submit_quote(&self, record: &QuoteRecord) -> Result<StoredQuote, SubmissionError>;
}

/// What the store answered to a single submission.
pub type StoredResult = Result<StoredQuote, SubmissionError>;

/// A submission the wizard has committed to, tagged with its ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub ticket: u64,
    pub record: QuoteRecord,
}

/// Result of a dispatched submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub ticket: u64,
    pub result: StoredResult,
}

/// Spawns submissions on the tokio runtime and collects their outcomes.
///
/// Requests are never cancelled. If the wizard is reset while a request is
/// in flight the outcome still arrives, and the wizard discards it because
/// its ticket no longer matches. Call [`shutdown`](Self::shutdown) before the
/// runtime goes away so in-flight writes are not cut short.
pub struct SubmissionDispatcher {
    submitter: Arc<dyn QuoteSubmitter>,
    tasks: JoinSet<()>,
    tx: mpsc::UnboundedSender<SubmissionOutcome>,
    rx: mpsc::UnboundedReceiver<SubmissionOutcome>,
}

impl std::fmt::Debug for SubmissionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionDispatcher")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl SubmissionDispatcher {
    pub fn new(submitter: Arc<dyn QuoteSubmitter>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            submitter,
            tasks: JoinSet::new(),
            tx,
            rx,
        }
    }

    /// Starts the remote write for `pending` in a background task.
    pub fn dispatch(&mut self, pending: PendingSubmission) {
        let submitter = Arc::clone(&self.submitter);
        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            let result = submitter.submit_quote(&pending.record).await;
            if tx
                .send(SubmissionOutcome {
                    ticket: pending.ticket,
                    result,
                })
                .is_err()
            {
                debug!(ticket = pending.ticket, "submission outcome dropped, receiver closed");
            }
        });
    }

    /// Number of submissions whose task has not been reaped yet.
    pub fn in_flight(&mut self) -> usize {
        while self.tasks.try_join_next().is_some() {}
        self.tasks.len()
    }

    /// Returns a finished outcome without blocking.
    pub fn try_recv(&mut self) -> Option<SubmissionOutcome> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next finished outcome.
    pub async fn recv(&mut self) -> Option<SubmissionOutcome> {
        self.rx.recv().await
    }

    /// Waits up to `grace` for every in-flight submission to finish.
    ///
    /// Returns `false` when some were still running at the deadline; those
    /// are aborted when the dispatcher is dropped.
    pub async fn shutdown(&mut self, grace: Duration) -> bool {
        let pending = self.in_flight();
        if pending == 0 {
            return true;
        }

        info!(pending, "waiting for in-flight submissions");
        let tasks = &mut self.tasks;
        let drained = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await
        .is_ok();

        if !drained {
            warn!(
                remaining = self.tasks.len(),
                "gave up waiting for in-flight submissions"
            );
        }
        drained
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeSubmitter;
    use super::*;
    use crate::domain::{CargoType, City, QuoteDraft, VehicleType};

    fn record() -> QuoteRecord {
        let draft = QuoteDraft {
            pickup_city: Some(City::Pune),
            pickup_address: "Hinjewadi".to_string(),
            delivery_city: Some(City::Chennai),
            delivery_address: "Guindy".to_string(),
            cargo_type: Some(CargoType::Textiles),
            weight: "1200".to_string(),
            vehicle_type: Some(VehicleType::Truck17Ft),
            name: "Ravi".to_string(),
            phone: "9123456780".to_string(),
            preferred_date: "2026-03-02".to_string(),
            ..QuoteDraft::default()
        };
        QuoteRecord::from_draft(&draft).unwrap()
    }

    #[test]
    fn test_submission_error_messages() {
        assert_eq!(SubmissionError::new("Network timeout").user_message(), "Network timeout");
        assert_eq!(SubmissionError::without_message().user_message(), GENERIC_SUBMIT_ERROR);
        assert_eq!(SubmissionError::new("  ").user_message(), GENERIC_SUBMIT_ERROR);
        assert_eq!(SubmissionError::without_message().to_string(), GENERIC_SUBMIT_ERROR);
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_outcome_with_ticket() {
        let submitter = Arc::new(FakeSubmitter::succeeding("0c5e7d3a-1111"));
        let mut dispatcher = SubmissionDispatcher::new(submitter.clone());

        dispatcher.dispatch(PendingSubmission {
            ticket: 7,
            record: record(),
        });

        let outcome = dispatcher.recv().await.expect("outcome");
        assert_eq!(outcome.ticket, 7);
        assert_eq!(outcome.result.unwrap().id.as_deref(), Some("0c5e7d3a-1111"));
        assert_eq!(submitter.call_count(), 1);
        assert!(dispatcher.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_failures() {
        let submitter = Arc::new(FakeSubmitter::failing(SubmissionError::new("duplicate key")));
        let mut dispatcher = SubmissionDispatcher::new(submitter);

        dispatcher.dispatch(PendingSubmission {
            ticket: 1,
            record: record(),
        });

        let outcome = dispatcher.recv().await.expect("outcome");
        assert_eq!(outcome.result, Err(SubmissionError::new("duplicate key")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_slow_submission() {
        let submitter = Arc::new(
            FakeSubmitter::succeeding("77aa0000").with_delay(Duration::from_secs(3)),
        );
        let mut dispatcher = SubmissionDispatcher::new(submitter.clone());
        dispatcher.dispatch(PendingSubmission {
            ticket: 1,
            record: record(),
        });
        assert_eq!(dispatcher.in_flight(), 1);

        assert!(dispatcher.shutdown(Duration::from_secs(30)).await);

        assert_eq!(dispatcher.in_flight(), 0);
        assert_eq!(submitter.records.lock().unwrap().len(), 1);
        assert_eq!(dispatcher.try_recv().map(|o| o.ticket), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_gives_up_after_grace_period() {
        let submitter = Arc::new(
            FakeSubmitter::succeeding("77aa0000").with_delay(Duration::from_secs(60)),
        );
        let mut dispatcher = SubmissionDispatcher::new(submitter);
        dispatcher.dispatch(PendingSubmission {
            ticket: 1,
            record: record(),
        });

        assert!(!dispatcher.shutdown(Duration::from_secs(1)).await);
        assert_eq!(dispatcher.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_without_submissions_returns_at_once() {
        let mut dispatcher =
            SubmissionDispatcher::new(Arc::new(FakeSubmitter::succeeding("unused")));
        assert!(dispatcher.shutdown(Duration::from_secs(0)).await);
    }
}
