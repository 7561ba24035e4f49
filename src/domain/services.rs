//! Read-only views over a quote draft.
//!
//! Produces the strings the wizard shows to the requester: the running
//! summary on the contact step, the confirmation panel after success, and
//! the shortened quote reference.

use super::models::{Choice, QuoteDraft};

/// Shown wherever a value has not been provided.
pub const PLACEHOLDER: &str = "—";

/// Number of identifier characters shown to the requester.
const QUOTE_ID_DISPLAY_LEN: usize = 8;

/// Formats a store identifier for display.
///
/// Takes the first eight characters, upper-cased, or the placeholder when no
/// identifier was returned.
///
/// # Examples
///
/// ```
/// use quote_wizard::domain::display_quote_id;
///
/// assert_eq!(display_quote_id(Some("3f2a9c1e-77b0-4d2e")), "3F2A9C1E");
/// assert_eq!(display_quote_id(None), "—");
/// ```
pub fn display_quote_id(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => id
            .chars()
            .take(QUOTE_ID_DISPLAY_LEN)
            .collect::<String>()
            .to_uppercase(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Human readable summary of a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSummary {
    pub from: String,
    pub to: String,
    pub cargo: String,
    pub weight: String,
    pub vehicle: String,
    pub contact: String,
}

impl QuoteSummary {
    pub fn of(draft: &QuoteDraft) -> Self {
        let or_placeholder = |value: Option<&str>| value.unwrap_or(PLACEHOLDER).to_string();
        let weight = draft.weight.trim();

        Self {
            from: or_placeholder(draft.pickup_city.map(|c| c.label())),
            to: or_placeholder(draft.delivery_city.map(|c| c.label())),
            cargo: or_placeholder(draft.cargo_type.map(|c| c.label())),
            weight: if weight.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                format!("{} KG", weight)
            },
            vehicle: or_placeholder(draft.vehicle_type.map(|v| v.label())),
            contact: if draft.phone.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                draft.phone.clone()
            },
        }
    }

    /// Pickup and delivery cities joined by an arrow.
    pub fn route(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}
