//! Quote request data model.
//!
//! Contains the static reference data offered by the quote form (cities,
//! cargo types and vehicles), the in-progress [`QuoteDraft`] edited by the
//! wizard, and the records exchanged with the remote store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle status written on every newly created quote.
pub const PENDING_STATUS: &str = "pending";

/// A closed set of options presented as a select field.
///
/// Implementors expose their full option table so that input handlers can
/// cycle through the options without knowing the concrete type.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];

    /// Human readable label shown in the form.
    fn label(&self) -> &'static str;

    /// Looks an option up by its label or wire value.
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|option| option.label() == value)
    }

    /// Returns the option after (or before) `current`, wrapping around.
    ///
    /// An empty selection moves to the first option going forward and to the
    /// last option going backward.
    fn cycle(current: Option<Self>, forward: bool) -> Self {
        let len = Self::ALL.len();
        let index = match current.and_then(|c| Self::ALL.iter().position(|o| *o == c)) {
            None if forward => 0,
            None => len - 1,
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
        };
        Self::ALL[index]
    }
}

/// Cities served by the brokerage hub network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Mumbai")]
    Mumbai,
    #[serde(rename = "Delhi NCR")]
    DelhiNcr,
    #[serde(rename = "Bangalore")]
    Bangalore,
    #[serde(rename = "Hyderabad")]
    Hyderabad,
    #[serde(rename = "Chennai")]
    Chennai,
    #[serde(rename = "Pune")]
    Pune,
    #[serde(rename = "Kolkata")]
    Kolkata,
    #[serde(rename = "Ahmedabad")]
    Ahmedabad,
    #[serde(rename = "Jaipur")]
    Jaipur,
    #[serde(rename = "Lucknow")]
    Lucknow,
}

impl Choice for City {
    const ALL: &'static [Self] = &[
        City::Mumbai,
        City::DelhiNcr,
        City::Bangalore,
        City::Hyderabad,
        City::Chennai,
        City::Pune,
        City::Kolkata,
        City::Ahmedabad,
        City::Jaipur,
        City::Lucknow,
    ];

    fn label(&self) -> &'static str {
        match self {
            City::Mumbai => "Mumbai",
            City::DelhiNcr => "Delhi NCR",
            City::Bangalore => "Bangalore",
            City::Hyderabad => "Hyderabad",
            City::Chennai => "Chennai",
            City::Pune => "Pune",
            City::Kolkata => "Kolkata",
            City::Ahmedabad => "Ahmedabad",
            City::Jaipur => "Jaipur",
            City::Lucknow => "Lucknow",
        }
    }
}

/// Kinds of cargo a requester can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoType {
    #[serde(rename = "General Goods")]
    GeneralGoods,
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Furniture")]
    Furniture,
    #[serde(rename = "Machinery")]
    Machinery,
    #[serde(rename = "Perishables")]
    Perishables,
    #[serde(rename = "Pharmaceuticals")]
    Pharmaceuticals,
    #[serde(rename = "Textiles")]
    Textiles,
    #[serde(rename = "Raw Materials")]
    RawMaterials,
    #[serde(rename = "Other")]
    Other,
}

impl Choice for CargoType {
    const ALL: &'static [Self] = &[
        CargoType::GeneralGoods,
        CargoType::Electronics,
        CargoType::Furniture,
        CargoType::Machinery,
        CargoType::Perishables,
        CargoType::Pharmaceuticals,
        CargoType::Textiles,
        CargoType::RawMaterials,
        CargoType::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            CargoType::GeneralGoods => "General Goods",
            CargoType::Electronics => "Electronics",
            CargoType::Furniture => "Furniture",
            CargoType::Machinery => "Machinery",
            CargoType::Perishables => "Perishables",
            CargoType::Pharmaceuticals => "Pharmaceuticals",
            CargoType::Textiles => "Textiles",
            CargoType::RawMaterials => "Raw Materials",
            CargoType::Other => "Other",
        }
    }
}

/// Vehicle classes with their capacity labels.
///
/// Vehicles travel over the wire as short codes (`14ft`, `tata-ace`) while
/// the form shows the capacity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "tata-ace")]
    TataAce,
    #[serde(rename = "bolero")]
    Bolero,
    #[serde(rename = "14ft")]
    Truck14Ft,
    #[serde(rename = "17ft")]
    Truck17Ft,
    #[serde(rename = "19ft")]
    Truck19Ft,
    #[serde(rename = "22ft")]
    Truck22Ft,
    #[serde(rename = "32ft-sxl")]
    Truck32FtSxl,
    #[serde(rename = "32ft-mxl")]
    Truck32FtMxl,
    #[serde(rename = "trailer")]
    Trailer,
}

impl VehicleType {
    /// Code persisted in the `vehicle_type` column.
    pub fn value(&self) -> &'static str {
        match self {
            VehicleType::TataAce => "tata-ace",
            VehicleType::Bolero => "bolero",
            VehicleType::Truck14Ft => "14ft",
            VehicleType::Truck17Ft => "17ft",
            VehicleType::Truck19Ft => "19ft",
            VehicleType::Truck22Ft => "22ft",
            VehicleType::Truck32FtSxl => "32ft-sxl",
            VehicleType::Truck32FtMxl => "32ft-mxl",
            VehicleType::Trailer => "trailer",
        }
    }

    /// Looks a vehicle up by its persisted code.
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.value() == value)
    }
}

impl Choice for VehicleType {
    const ALL: &'static [Self] = &[
        VehicleType::TataAce,
        VehicleType::Bolero,
        VehicleType::Truck14Ft,
        VehicleType::Truck17Ft,
        VehicleType::Truck19Ft,
        VehicleType::Truck22Ft,
        VehicleType::Truck32FtSxl,
        VehicleType::Truck32FtMxl,
        VehicleType::Trailer,
    ];

    fn label(&self) -> &'static str {
        match self {
            VehicleType::TataAce => "Tata Ace (0.75 MT)",
            VehicleType::Bolero => "Bolero Pickup (1.5 MT)",
            VehicleType::Truck14Ft => "14 ft Truck (4 MT)",
            VehicleType::Truck17Ft => "17 ft Truck (5 MT)",
            VehicleType::Truck19Ft => "19 ft Truck (7 MT)",
            VehicleType::Truck22Ft => "22 ft Truck (9 MT)",
            VehicleType::Truck32FtSxl => "32 ft SXL (14 MT)",
            VehicleType::Truck32FtMxl => "32 ft MXL (21 MT)",
            VehicleType::Trailer => "Trailer (28 MT)",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::from_value(value).or_else(|| Self::ALL.iter().copied().find(|v| v.label() == value))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for CargoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three pages of the quote wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Locations,
    Cargo,
    Contact,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Locations, Step::Cargo, Step::Contact];

    /// One-based position shown in the progress indicator.
    pub fn number(&self) -> u8 {
        match self {
            Step::Locations => 1,
            Step::Cargo => 2,
            Step::Contact => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Locations => "Locations",
            Step::Cargo => "Cargo",
            Step::Contact => "Contact",
        }
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Locations => Some(Step::Cargo),
            Step::Cargo => Some(Step::Contact),
            Step::Contact => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::Locations => None,
            Step::Cargo => Some(Step::Locations),
            Step::Contact => Some(Step::Cargo),
        }
    }

    /// Fields collected on this step, in tab order.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Step::Locations => &[
                Field::PickupCity,
                Field::PickupAddress,
                Field::DeliveryCity,
                Field::DeliveryAddress,
            ],
            Step::Cargo => &[
                Field::CargoType,
                Field::Weight,
                Field::VehicleType,
                Field::SpecialInstructions,
            ],
            Step::Contact => &[
                Field::Name,
                Field::Phone,
                Field::Email,
                Field::PreferredDate,
            ],
        }
    }
}

/// Every input of the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PickupCity,
    PickupAddress,
    DeliveryCity,
    DeliveryAddress,
    CargoType,
    Weight,
    VehicleType,
    SpecialInstructions,
    Name,
    Phone,
    Email,
    PreferredDate,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::PickupCity => "Pickup City",
            Field::PickupAddress => "Pickup Address",
            Field::DeliveryCity => "Delivery City",
            Field::DeliveryAddress => "Delivery Address",
            Field::CargoType => "Cargo Type",
            Field::Weight => "Approximate Weight (in KG)",
            Field::VehicleType => "Preferred Vehicle Type",
            Field::SpecialInstructions => "Special Instructions (Optional)",
            Field::Name => "Your Name",
            Field::Phone => "Mobile Number",
            Field::Email => "Email (Optional)",
            Field::PreferredDate => "Preferred Pickup Date",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::PickupCity | Field::DeliveryCity => "Select City",
            Field::PickupAddress | Field::DeliveryAddress => "Street, Area, Landmark",
            Field::CargoType => "Select Cargo Type",
            Field::Weight => "e.g., 500",
            Field::VehicleType => "Select Vehicle",
            Field::SpecialInstructions => "Fragile items, stacking restrictions...",
            Field::Name => "Full Name",
            Field::Phone => "10-digit mobile number",
            Field::Email => "your@email.com",
            Field::PreferredDate => "YYYY-MM-DD",
        }
    }

    pub fn step(&self) -> Step {
        match self {
            Field::PickupCity
            | Field::PickupAddress
            | Field::DeliveryCity
            | Field::DeliveryAddress => Step::Locations,
            Field::CargoType | Field::Weight | Field::VehicleType | Field::SpecialInstructions => {
                Step::Cargo
            }
            Field::Name | Field::Phone | Field::Email | Field::PreferredDate => Step::Contact,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::SpecialInstructions | Field::Email)
    }

    /// Whether the field is a select rather than free text.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Field::PickupCity | Field::DeliveryCity | Field::CargoType | Field::VehicleType
        )
    }

    /// Maximum number of characters accepted while typing.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Field::Phone => Some(10),
            Field::PreferredDate => Some(10),
            Field::Name => Some(100),
            Field::Email => Some(254),
            Field::PickupAddress | Field::DeliveryAddress => Some(200),
            Field::SpecialInstructions => Some(500),
            Field::Weight => Some(12),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        f.write_str(label.strip_suffix(" (Optional)").unwrap_or(label))
    }
}

/// The in-progress quote request assembled across the wizard steps.
///
/// Select fields hold `None` until the requester picks an option; text
/// fields hold the raw input exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteDraft {
    pub pickup_city: Option<City>,
    pub pickup_address: String,
    pub delivery_city: Option<City>,
    pub delivery_address: String,
    pub cargo_type: Option<CargoType>,
    pub weight: String,
    pub vehicle_type: Option<VehicleType>,
    pub special_instructions: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub preferred_date: String,
}

impl QuoteDraft {
    /// Returns the text shown for `field`, or an empty string when unset.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::PickupCity => self.pickup_city.map(|c| c.label()).unwrap_or(""),
            Field::DeliveryCity => self.delivery_city.map(|c| c.label()).unwrap_or(""),
            Field::CargoType => self.cargo_type.map(|c| c.label()).unwrap_or(""),
            Field::VehicleType => self.vehicle_type.map(|v| v.label()).unwrap_or(""),
            Field::PickupAddress => &self.pickup_address,
            Field::DeliveryAddress => &self.delivery_address,
            Field::Weight => &self.weight,
            Field::SpecialInstructions => &self.special_instructions,
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::PreferredDate => &self.preferred_date,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::PickupAddress => Some(&mut self.pickup_address),
            Field::DeliveryAddress => Some(&mut self.delivery_address),
            Field::Weight => Some(&mut self.weight),
            Field::SpecialInstructions => Some(&mut self.special_instructions),
            Field::Name => Some(&mut self.name),
            Field::Phone => Some(&mut self.phone),
            Field::Email => Some(&mut self.email),
            Field::PreferredDate => Some(&mut self.preferred_date),
            Field::PickupCity | Field::DeliveryCity | Field::CargoType | Field::VehicleType => None,
        }
    }

    /// Replaces the value of `field`.
    ///
    /// Text is truncated to the field's maximum length. Select fields accept
    /// an option label (or vehicle code); an unknown option leaves the draft
    /// untouched and returns `false`.
    pub fn set(&mut self, field: Field, value: &str) -> bool {
        match field {
            Field::PickupCity => assign(&mut self.pickup_city, City::parse(value)),
            Field::DeliveryCity => assign(&mut self.delivery_city, City::parse(value)),
            Field::CargoType => assign(&mut self.cargo_type, CargoType::parse(value)),
            Field::VehicleType => assign(&mut self.vehicle_type, VehicleType::parse(value)),
            _ => match self.text_mut(field) {
                Some(text) => {
                    *text = match field.max_len() {
                        Some(max) => value.chars().take(max).collect(),
                        None => value.to_string(),
                    };
                    true
                }
                None => false,
            },
        }
    }

    /// Appends a typed character to a text field.
    ///
    /// Returns `false` for select fields or when the field is already at its
    /// maximum length.
    pub fn push_char(&mut self, field: Field, c: char) -> bool {
        let max = field.max_len();
        match self.text_mut(field) {
            Some(text) if max.is_none_or(|max| text.chars().count() < max) => {
                text.push(c);
                true
            }
            _ => false,
        }
    }

    /// Removes the last character of a text field.
    pub fn pop_char(&mut self, field: Field) -> bool {
        self.text_mut(field).and_then(|text| text.pop()).is_some()
    }

    /// Moves a select field to its next or previous option.
    pub fn cycle(&mut self, field: Field, forward: bool) -> bool {
        match field {
            Field::PickupCity => self.pickup_city = Some(City::cycle(self.pickup_city, forward)),
            Field::DeliveryCity => {
                self.delivery_city = Some(City::cycle(self.delivery_city, forward))
            }
            Field::CargoType => self.cargo_type = Some(CargoType::cycle(self.cargo_type, forward)),
            Field::VehicleType => {
                self.vehicle_type = Some(VehicleType::cycle(self.vehicle_type, forward))
            }
            _ => return false,
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == QuoteDraft::default()
    }
}

fn assign<T>(slot: &mut Option<T>, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

/// A validated quote as written to the `quotes` table.
///
/// Field names are the persisted column names. Build one with
/// [`QuoteRecord::from_draft`](crate::domain::QuoteRecord::from_draft).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    pub pickup_city: City,
    pub pickup_address: String,
    pub delivery_city: City,
    pub delivery_address: String,
    pub cargo_type: CargoType,
    pub weight: f64,
    pub vehicle_type: VehicleType,
    pub special_instructions: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub preferred_date: NaiveDate,
    pub status: String,
}

/// A quote row as returned by the remote store.
///
/// Reads are lenient: reference data is kept as plain text so rows edited by
/// staff outside the wizard still load, and a column holding a value of an
/// unexpected shape reads as `None` instead of failing the whole row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoredQuote {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub pickup_city: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub pickup_address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub delivery_city: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub delivery_address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub cargo_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub special_instructions: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub customer_email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredQuote {
    /// Reads the row returned for a write. Accepts a bare object or a
    /// one-element array; any other JSON reads as an empty row.
    pub fn from_response_body(body: &str) -> Result<StoredQuote, serde_json::Error> {
        let row = match serde_json::from_str::<serde_json::Value>(body)? {
            serde_json::Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
            other => other,
        };
        Ok(serde_json::from_value(row).unwrap_or_default())
    }
}

fn id_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts a text (uuid) or numeric (bigint) identifier.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(id_text(&value))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_date))
}

/// Dates may come back as a plain date or with a time part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|t| t.date_naive()))
}

/// Accepts `timestamptz` output and `timestamp` output without an offset,
/// which is read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|t| t.and_utc())
}

/// Accepts a weight stored either as a JSON number or as numeric text.
fn deserialize_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
