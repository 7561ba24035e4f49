//! CSV export of stored quotes for staff follow-up.

use crate::domain::StoredQuote;
use std::io::Write;

const HEADERS: [&str; 15] = [
    "id",
    "created_at",
    "status",
    "pickup_city",
    "pickup_address",
    "delivery_city",
    "delivery_address",
    "cargo_type",
    "weight",
    "vehicle_type",
    "special_instructions",
    "customer_name",
    "customer_phone",
    "customer_email",
    "preferred_date",
];

pub struct CsvExporter;

impl CsvExporter {
    /// Writes one row per quote, with the persisted column names as header.
    /// Missing values become empty cells.
    pub fn write_quotes<W: Write>(quotes: &[StoredQuote], writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(HEADERS)?;

        for quote in quotes {
            let text = |value: &Option<String>| value.clone().unwrap_or_default();
            csv_writer.write_record([
                text(&quote.id),
                quote.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                text(&quote.status),
                text(&quote.pickup_city),
                text(&quote.pickup_address),
                text(&quote.delivery_city),
                text(&quote.delivery_address),
                text(&quote.cargo_type),
                quote.weight.map(|w| w.to_string()).unwrap_or_default(),
                text(&quote.vehicle_type),
                text(&quote.special_instructions),
                text(&quote.customer_name),
                text(&quote.customer_phone),
                text(&quote.customer_email),
                quote.preferred_date.map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
