//! Field validators for the quote form.
//!
//! Each validator checks one constraint on raw input. [`validate_step`]
//! applies the constraints of every field on a wizard step and
//! [`QuoteRecord::from_draft`] turns a fully valid draft into the record that
//! is sent to the remote store.

use super::errors::{DomainResult, ValidationError, ValidationErrors};
use super::models::{Field, QuoteDraft, QuoteRecord, Step, PENDING_STATUS};
use chrono::NaiveDate;

/// Checks that a required value is not blank.
pub fn required(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

pub fn max_length(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}

/// Parses a strictly positive, finite number.
pub fn positive_number(field: Field, value: &str) -> Result<f64, ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(ValidationError::NotPositive(field)),
    }
}

/// Accepts exactly ten ASCII digits.
pub fn phone_number(field: Field, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(field))
    }
}

/// Loose `local@domain.tld` shape check, matching what browsers enforce for
/// email inputs.
pub fn email(field: Field, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(field))
    }
}

pub fn calendar_date(field: Field, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(field))
}

/// Validates a single field of the draft.
pub fn validate_field(draft: &QuoteDraft, field: Field) -> Result<(), ValidationError> {
    let value = draft.value(field);

    if value.trim().is_empty() {
        return if field.is_required() {
            Err(ValidationError::Required(field))
        } else {
            Ok(())
        };
    }

    if let Some(max) = field.max_len() {
        max_length(field, value, max)?;
    }

    match field {
        Field::Weight => positive_number(field, value).map(|_| ()),
        Field::Phone => phone_number(field, value),
        Field::Email => email(field, value),
        Field::PreferredDate => calendar_date(field, value).map(|_| ()),
        _ => required(field, value),
    }
}

/// Validates every field collected on `step`.
pub fn validate_step(draft: &QuoteDraft, step: Step) -> DomainResult<()> {
    let errors = ValidationErrors(
        step.fields()
            .iter()
            .filter_map(|field| validate_field(draft, *field).err())
            .collect(),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl QuoteRecord {
    /// Translates a draft into the persisted record, validating every step.
    ///
    /// Each form field maps to exactly one column and the status is always
    /// [`PENDING_STATUS`]. The draft is destructured so that a new form field
    /// cannot be added without deciding its column here.
    pub fn from_draft(draft: &QuoteDraft) -> DomainResult<QuoteRecord> {
        let mut errors = Vec::new();
        for step in Step::ALL {
            if let Err(ValidationErrors(step_errors)) = validate_step(draft, step) {
                errors.extend(step_errors);
            }
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let QuoteDraft {
            pickup_city,
            pickup_address,
            delivery_city,
            delivery_address,
            cargo_type,
            weight,
            vehicle_type,
            special_instructions,
            name,
            phone,
            email,
            preferred_date,
        } = draft;

        let missing = |field| ValidationErrors(vec![ValidationError::Required(field)]);
        let invalid = |e| ValidationErrors(vec![e]);

        Ok(QuoteRecord {
            pickup_city: pickup_city.ok_or_else(|| missing(Field::PickupCity))?,
            pickup_address: pickup_address.trim().to_string(),
            delivery_city: delivery_city.ok_or_else(|| missing(Field::DeliveryCity))?,
            delivery_address: delivery_address.trim().to_string(),
            cargo_type: cargo_type.ok_or_else(|| missing(Field::CargoType))?,
            weight: positive_number(Field::Weight, weight).map_err(invalid)?,
            vehicle_type: vehicle_type.ok_or_else(|| missing(Field::VehicleType))?,
            special_instructions: optional_text(special_instructions),
            customer_name: name.trim().to_string(),
            customer_phone: phone.trim().to_string(),
            customer_email: optional_text(email),
            preferred_date: calendar_date(Field::PreferredDate, preferred_date).map_err(invalid)?,
            status: PENDING_STATUS.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CargoType, City, VehicleType};

    fn complete_draft() -> QuoteDraft {
        QuoteDraft {
            pickup_city: Some(City::Mumbai),
            pickup_address: "Andheri East".to_string(),
            delivery_city: Some(City::DelhiNcr),
            delivery_address: "Okhla Phase 2".to_string(),
            cargo_type: Some(CargoType::Electronics),
            weight: "500".to_string(),
            vehicle_type: Some(VehicleType::Truck14Ft),
            special_instructions: String::new(),
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            email: String::new(),
            preferred_date: "2026-01-10".to_string(),
        }
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(Field::Name, "Asha").is_ok());
        assert_eq!(required(Field::Name, "   "), Err(ValidationError::Required(Field::Name)));
    }

    #[test]
    fn test_positive_number() {
        assert_eq!(positive_number(Field::Weight, "500"), Ok(500.0));
        assert_eq!(positive_number(Field::Weight, " 12.5 "), Ok(12.5));
        assert!(positive_number(Field::Weight, "0").is_err());
        assert!(positive_number(Field::Weight, "-3").is_err());
        assert!(positive_number(Field::Weight, "heavy").is_err());
        assert!(positive_number(Field::Weight, "inf").is_err());
    }

    #[test]
    fn test_phone_number_requires_ten_digits() {
        assert!(phone_number(Field::Phone, "9876543210").is_ok());
        assert!(phone_number(Field::Phone, "987654321").is_err());
        assert!(phone_number(Field::Phone, "98765-4321").is_err());
        assert!(phone_number(Field::Phone, "98765432100").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(email(Field::Email, "asha@example.in").is_ok());
        assert!(email(Field::Email, "asha@example").is_err());
        assert!(email(Field::Email, "@example.in").is_err());
        assert!(email(Field::Email, "asha example@example.in").is_err());
        assert!(email(Field::Email, "asha@@example.in").is_err());
    }

    #[test]
    fn test_calendar_date() {
        assert_eq!(
            calendar_date(Field::PreferredDate, "2026-01-10"),
            Ok(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap())
        );
        assert!(calendar_date(Field::PreferredDate, "2026-02-30").is_err());
        assert!(calendar_date(Field::PreferredDate, "10/01/2026").is_err());
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        let draft = complete_draft();
        assert!(validate_field(&draft, Field::Email).is_ok());
        assert!(validate_field(&draft, Field::SpecialInstructions).is_ok());
    }

    #[test]
    fn test_validate_step_collects_all_errors() {
        let draft = QuoteDraft::default();
        let errors = validate_step(&draft, Step::Locations).unwrap_err();
        assert_eq!(errors.0.len(), 4);
        assert!(errors.for_field(Field::PickupCity).is_some());
        assert!(errors.for_field(Field::DeliveryAddress).is_some());

        let mut errors = validate_step(&draft, Step::Cargo).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec![Field::CargoType, Field::Weight, Field::VehicleType]);

        for field in fields {
            errors.clear_field(field);
        }
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_step_passes_complete_draft() {
        let draft = complete_draft();
        for step in Step::ALL {
            assert!(validate_step(&draft, step).is_ok());
        }
    }

    #[test]
    fn test_from_draft_maps_every_field() {
        let mut draft = complete_draft();
        draft.email = " asha@example.in ".to_string();
        draft.special_instructions = "Fragile".to_string();

        let record = QuoteRecord::from_draft(&draft).unwrap();
        assert_eq!(record.pickup_city, City::Mumbai);
        assert_eq!(record.pickup_address, "Andheri East");
        assert_eq!(record.delivery_city, City::DelhiNcr);
        assert_eq!(record.delivery_address, "Okhla Phase 2");
        assert_eq!(record.cargo_type, CargoType::Electronics);
        assert_eq!(record.weight, 500.0);
        assert_eq!(record.vehicle_type, VehicleType::Truck14Ft);
        assert_eq!(record.special_instructions.as_deref(), Some("Fragile"));
        assert_eq!(record.customer_name, "Asha");
        assert_eq!(record.customer_phone, "9876543210");
        assert_eq!(record.customer_email.as_deref(), Some("asha@example.in"));
        assert_eq!(record.preferred_date, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert_eq!(record.status, "pending");
    }

    #[test]
    fn test_from_draft_rejects_incomplete_draft() {
        let mut draft = complete_draft();
        draft.phone = "12345".to_string();
        draft.weight.clear();

        let errors = QuoteRecord::from_draft(&draft).unwrap_err();
        assert!(errors.for_field(Field::Phone).is_some());
        assert!(errors.for_field(Field::Weight).is_some());
        assert_eq!(errors.0.len(), 2);
    }
}
