use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BookingRecord, BookingStatus, SiteType};
use crate::pricing::Quote;

// -- JWT Claims --

/// Claims carried by admin session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Bookings --

/// Reservation form as submitted by a guest. Dates are optional here so a
/// missing date surfaces as a field error rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookingRequest {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default)]
    pub message: String,
    pub site_type: SiteType,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub tent_length: Option<Decimal>,
    #[serde(default)]
    pub tent_width: Option<Decimal>,
    #[serde(default)]
    pub vehicle_length: Option<Decimal>,
    #[serde(default)]
    pub cable_length: Option<Decimal>,
    pub adults: u32,
    #[serde(default)]
    pub children_over_8: u32,
    #[serde(default)]
    pub children_under_8: u32,
    #[serde(default)]
    pub pets: u32,
    #[serde(default)]
    pub electricity: bool,
}

/// A freshly created booking with its price, when a tariff exists for it.
#[derive(Debug, Serialize)]
pub struct CreatedBooking {
    #[serde(flatten)]
    pub booking: BookingRecord,
    pub quote: Option<Quote>,
}

/// Admin edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookingRequest {
    pub status: Option<BookingStatus>,
    pub deposit_paid: Option<bool>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub message: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub tent_length: Option<Decimal>,
    pub tent_width: Option<Decimal>,
    pub vehicle_length: Option<Decimal>,
    pub cable_length: Option<Decimal>,
    pub extra_vehicles: Option<u32>,
    pub extra_tents: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
}

// -- Capacities --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetCapacityRequest {
    pub max_places: u32,
}

// -- Pricing --

/// Nightly prices for one category and season. Camping cars take only the
/// two-person prices.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetTariffRequest {
    pub one_person_with_electricity: Option<Decimal>,
    pub two_persons_with_electricity: Option<Decimal>,
    pub one_person_without_electricity: Option<Decimal>,
    pub two_persons_without_electricity: Option<Decimal>,
}

// -- Errors --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}
