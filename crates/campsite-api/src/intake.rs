//! Reservation form validation.
//!
//! Mirrors the rules guests see on the public form: no arrival in the past,
//! at most three weeks, at most six people and two pets, the measurements
//! of whatever is pitched, plus contact details that look deliverable.
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use campsite_types::api::{CreateBookingRequest, FieldError};
use campsite_types::{BookingRecord, BookingStatus, ContactDetails, Equipment, SiteType, StayDates};

pub const MAX_NIGHTS: i64 = 21;
pub const MAX_PEOPLE: u32 = 6;
pub const MAX_PETS: u32 = 2;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;
const MAX_PHONE_LEN: usize = 20;
const MAX_ADDRESS_LEN: usize = 255;
const MAX_POSTAL_CODE_LEN: usize = 10;
const MAX_CITY_LEN: usize = 100;
const MAX_MESSAGE_LEN: usize = 1000;

/// Validate a submitted form and build the pending booking it describes.
pub fn build_booking(
    req: &CreateBookingRequest,
    now: DateTime<Utc>,
) -> Result<BookingRecord, Vec<FieldError>> {
    let mut errors = Vec::new();

    let submitted = ContactDetails {
        last_name: req.last_name.clone(),
        first_name: req.first_name.clone(),
        email: req.email.clone(),
        phone: req.phone.clone(),
        address: req.address.clone(),
        postal_code: req.postal_code.clone(),
        city: req.city.clone(),
        message: req.message.clone(),
    };
    let contact = normalize_contact(&submitted)
        .map_err(|e| errors.extend(e))
        .ok();

    let stay = match validate_stay(req.check_in, req.check_out, now.date_naive()) {
        Ok(stay) => Some(stay),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let equipment = Equipment {
        tent_length: req.tent_length,
        tent_width: req.tent_width,
        vehicle_length: req.vehicle_length,
        cable_length: req.cable_length,
    };
    errors.extend(validate_equipment(req.site_type, req.electricity, &equipment));

    if req.adults < 1 {
        errors.push(FieldError::new("adults", "at least one adult is required"));
    }
    let people = req
        .adults
        .checked_add(req.children_over_8)
        .and_then(|n| n.checked_add(req.children_under_8));
    if people.is_none_or(|n| n > MAX_PEOPLE) {
        errors.push(FieldError::new(
            "adults",
            format!("at most {} people per pitch, contact the campsite for larger groups", MAX_PEOPLE),
        ));
    }
    if req.pets > MAX_PETS {
        errors.push(FieldError::new("pets", format!("at most {} pets", MAX_PETS)));
    }

    match (contact, stay) {
        (Some(contact), Some(stay)) if errors.is_empty() => Ok(BookingRecord {
            id: Uuid::new_v4(),
            contact,
            stay: Some(stay),
            site_type: req.site_type,
            equipment,
            adults: req.adults,
            children_over_8: req.children_over_8,
            children_under_8: req.children_under_8,
            pets: req.pets,
            extra_vehicles: 0,
            extra_tents: 0,
            electricity: req.electricity,
            deposit_paid: false,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }),
        _ => Err(errors),
    }
}

fn validate_stay(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<StayDates, FieldError> {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Err(FieldError::new("check_in", "arrival and departure dates are required"));
    };
    if check_in < today {
        return Err(FieldError::new("check_in", "arrival cannot be in the past"));
    }
    let stay = StayDates::new(check_in, check_out)
        .map_err(|_| FieldError::new("check_out", "departure must be after arrival"))?;
    if stay.nights() > MAX_NIGHTS {
        return Err(FieldError::new(
            "check_out",
            "stays are limited to three weeks, contact the campsite for longer stays",
        ));
    }
    Ok(stay)
}

/// Tents give their footprint, vehicles their length, and anyone asking
/// for electricity the length of their cable.
fn validate_equipment(site_type: SiteType, electricity: bool, equipment: &Equipment) -> Vec<FieldError> {
    let mut errors = check_lengths(equipment);
    let mut require = |field: &str, value: Option<Decimal>, message: &str| {
        if value.is_none() && !errors.iter().any(|e| e.field == field) {
            errors.push(FieldError::new(field, message));
        }
    };

    if site_type.is_tent() {
        require("tent_length", equipment.tent_length, "required for a tent");
        require("tent_width", equipment.tent_width, "required for a tent");
    } else {
        require("vehicle_length", equipment.vehicle_length, "required for a vehicle");
    }
    if electricity {
        require("cable_length", equipment.cable_length, "required when electricity is requested");
    }
    errors
}

/// Range check for whichever measurements are present: 1 to 999.99 metres,
/// to the centimetre.
pub fn check_lengths(equipment: &Equipment) -> Vec<FieldError> {
    [
        ("tent_length", equipment.tent_length),
        ("tent_width", equipment.tent_width),
        ("vehicle_length", equipment.vehicle_length),
        ("cable_length", equipment.cable_length),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        let value = value?;
        (!is_valid_length(value)).then(|| FieldError::new(field, "between 1 and 999.99 metres"))
    })
    .collect()
}

fn is_valid_length(value: Decimal) -> bool {
    value >= Decimal::ONE && value < Decimal::new(1000, 0) && value.normalize().scale() <= 2
}

/// Trim and check contact fields. Email is lowercased; the message is
/// optional.
pub fn normalize_contact(submitted: &ContactDetails) -> Result<ContactDetails, Vec<FieldError>> {
    let mut errors = Vec::new();

    let last_name = required_text(&mut errors, "last_name", &submitted.last_name, MAX_NAME_LEN);
    let first_name = required_text(&mut errors, "first_name", &submitted.first_name, MAX_NAME_LEN);

    let email = submitted.email.trim().to_lowercase();
    if email.is_empty() {
        errors.push(FieldError::new("email", "required"));
    } else if email.len() > MAX_EMAIL_LEN || !is_valid_email(&email) {
        errors.push(FieldError::new("email", "enter a valid email address"));
    }

    let phone = submitted.phone.trim();
    if phone.is_empty() {
        errors.push(FieldError::new("phone", "required"));
    } else if phone.len() > MAX_PHONE_LEN || !is_valid_phone(phone) {
        errors.push(FieldError::new("phone", "enter a valid phone number"));
    }

    let address = required_text(&mut errors, "address", &submitted.address, MAX_ADDRESS_LEN);
    let postal_code =
        required_text(&mut errors, "postal_code", &submitted.postal_code, MAX_POSTAL_CODE_LEN);
    let city = required_text(&mut errors, "city", &submitted.city, MAX_CITY_LEN);

    let message = submitted.message.trim();
    if message.chars().count() > MAX_MESSAGE_LEN {
        errors.push(FieldError::new(
            "message",
            format!("at most {} characters", MAX_MESSAGE_LEN),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ContactDetails {
        last_name,
        first_name,
        email,
        phone: phone.to_string(),
        address,
        postal_code,
        city,
        message: message.to_string(),
    })
}

fn required_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "required"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(field, format!("at most {} characters", max)));
    }
    value.to_string()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

fn is_valid_phone(phone: &str) -> bool {
    phone.chars().any(|c| c.is_ascii_digit())
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
}
