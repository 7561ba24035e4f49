use super::models::Field;
use thiserror::Error;

/// A single field that failed its constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },
    #[error("{0} must be a positive number")]
    NotPositive(Field),
    #[error("{0} must be exactly 10 digits")]
    InvalidPhone(Field),
    #[error("{0} is not a valid email address")]
    InvalidEmail(Field),
    #[error("{0} must be a date in YYYY-MM-DD format")]
    InvalidDate(Field),
}

impl ValidationError {
    /// The field the error refers to.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field)
            | ValidationError::NotPositive(field)
            | ValidationError::InvalidPhone(field)
            | ValidationError::InvalidEmail(field)
            | ValidationError::InvalidDate(field)
            | ValidationError::TooLong { field, .. } => *field,
        }
    }
}

/// All constraint failures found on a step or a whole draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// First error reported for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    /// Drops every error reported for `field`.
    pub fn clear_field(&mut self, field: Field) {
        self.0.retain(|e| e.field() != field);
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub type DomainResult<T> = Result<T, ValidationErrors>;
