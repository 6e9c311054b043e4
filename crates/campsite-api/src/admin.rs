use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use campsite_types::api::{BookingListQuery, Claims, FieldError, SetCapacityRequest, UpdateBookingRequest};
use campsite_types::{BookingRecord, Capacity, ContactDetails, SiteCategory, StayDates};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::intake::{check_lengths, normalize_contact};

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = blocking(move || Ok(db.db.list_bookings(query.status)?)).await?;

    let records: Vec<BookingRecord> = rows
        .into_iter()
        .filter_map(|row| match row.into_record() {
            Ok(record) => Some(record),
            Err(invalid) => {
                warn!("Hiding {}", invalid);
                None
            }
        })
        .collect();

    Ok(Json(records))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(load_booking(&state, id).await?))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut record = load_booking(&state, id).await?;
    apply_update(&mut record, req).map_err(ApiError::Validation)?;
    record.updated_at = chrono::Utc::now();

    let db = state.clone();
    let to_store = record.clone();
    let updated = blocking(move || Ok(db.db.update_booking(&to_store)?)).await?;
    if !updated {
        return Err(ApiError::NotFound);
    }

    info!(id = %record.id, admin = %claims.username, status = %record.status, "Booking updated");
    Ok(Json(record))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let deleted = blocking(move || Ok(db.db.delete_booking(&id.to_string())?)).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(%id, admin = %claims.username, "Booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_capacities(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let capacities = blocking(move || Ok(db.db.list_capacities()?)).await?;
    Ok(Json(capacities))
}

pub async fn set_capacity(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(req): Json<SetCapacityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category: SiteCategory = category
        .parse()
        .map_err(|e: campsite_types::ModelError| ApiError::BadRequest(e.to_string()))?;
    if req.max_places < 1 {
        return Err(ApiError::Validation(vec![FieldError::new(
            "max_places",
            "at least one place",
        )]));
    }

    let db = state.clone();
    let max_places = req.max_places;
    blocking(move || Ok(db.db.set_capacity(category, max_places)?)).await?;

    info!(%category, max_places, "Capacity updated");
    Ok(Json(Capacity {
        category,
        max_places,
    }))
}

pub(crate) async fn load_booking(state: &AppState, id: Uuid) -> Result<BookingRecord, ApiError> {
    let db = state.clone();
    let row = blocking(move || Ok(db.db.get_booking(&id.to_string())?))
        .await?
        .ok_or(ApiError::NotFound)?;
    row.into_record().map_err(|e| ApiError::Internal(e.into()))
}

/// Merge an admin edit into `record`, enforcing the same contact, date and
/// measurement rules as intake (except that past dates are allowed).
fn apply_update(record: &mut BookingRecord, req: UpdateBookingRequest) -> Result<(), Vec<FieldError>> {
    if let Some(status) = req.status {
        record.status = status;
    }
    if let Some(paid) = req.deposit_paid {
        record.deposit_paid = paid;
    }
    if let Some(n) = req.extra_vehicles {
        record.extra_vehicles = n;
    }
    if let Some(n) = req.extra_tents {
        record.extra_tents = n;
    }

    let contact_edited = [
        &req.last_name,
        &req.first_name,
        &req.email,
        &req.phone,
        &req.address,
        &req.postal_code,
        &req.city,
        &req.message,
    ]
    .iter()
    .any(|field| field.is_some());
    if contact_edited {
        let current = &record.contact;
        let pick = |edit: Option<String>, current: &str| edit.unwrap_or_else(|| current.to_string());
        let merged = ContactDetails {
            last_name: pick(req.last_name, &current.last_name),
            first_name: pick(req.first_name, &current.first_name),
            email: pick(req.email, &current.email),
            phone: pick(req.phone, &current.phone),
            address: pick(req.address, &current.address),
            postal_code: pick(req.postal_code, &current.postal_code),
            city: pick(req.city, &current.city),
            message: pick(req.message, &current.message),
        };
        record.contact = normalize_contact(&merged)?;
    }

    let mut equipment = record.equipment;
    equipment.tent_length = req.tent_length.or(equipment.tent_length);
    equipment.tent_width = req.tent_width.or(equipment.tent_width);
    equipment.vehicle_length = req.vehicle_length.or(equipment.vehicle_length);
    equipment.cable_length = req.cable_length.or(equipment.cable_length);
    let errors = check_lengths(&equipment);
    if !errors.is_empty() {
        return Err(errors);
    }
    record.equipment = equipment;

    if req.check_in.is_some() || req.check_out.is_some() {
        let check_in = req.check_in.or(record.stay.map(|s| s.check_in()));
        let check_out = req.check_out.or(record.stay.map(|s| s.check_out()));
        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return Err(vec![FieldError::new(
                "check_in",
                "arrival and departure dates are required",
            )]);
        };
        let stay = StayDates::new(check_in, check_out)
            .map_err(|_| vec![FieldError::new("check_out", "departure must be after arrival")])?;
        record.stay = Some(stay);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campsite_types::{BookingStatus, Equipment, SiteType};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn record() -> BookingRecord {
        let at = Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap();
        BookingRecord {
            id: Uuid::new_v4(),
            contact: ContactDetails {
                last_name: "Moreau".into(),
                first_name: "Luc".into(),
                email: "luc@example.net".into(),
                phone: "0600000000".into(),
                address: "2 rue Haute".into(),
                postal_code: "61000".into(),
                city: "Alençon".into(),
                message: String::new(),
            },
            stay: Some(StayDates::new(date(7, 1), date(7, 5)).unwrap()),
            site_type: SiteType::Tent,
            equipment: Equipment {
                tent_length: Some(Decimal::new(3, 0)),
                tent_width: Some(Decimal::new(2, 0)),
                ..Equipment::default()
            },
            adults: 1,
            children_over_8: 0,
            children_under_8: 0,
            pets: 0,
            extra_vehicles: 0,
            extra_tents: 0,
            electricity: false,
            deposit_paid: false,
            status: BookingStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn update_merges_partial_fields() {
        let mut r = record();
        let req = UpdateBookingRequest {
            status: Some(BookingStatus::Confirmed),
            deposit_paid: Some(true),
            email: Some(" LUC.MOREAU@Example.net ".into()),
            check_out: Some(date(7, 8)),
            ..Default::default()
        };
        apply_update(&mut r, req).unwrap();

        assert_eq!(r.status, BookingStatus::Confirmed);
        assert!(r.deposit_paid);
        assert_eq!(r.contact.email, "luc.moreau@example.net");
        assert_eq!(r.contact.last_name, "Moreau");
        assert_eq!(r.contact.city, "Alençon");
        assert_eq!(r.stay.unwrap().check_in(), date(7, 1));
        assert_eq!(r.stay.unwrap().check_out(), date(7, 8));
    }

    #[test]
    fn update_adds_extras_and_measurements() {
        let mut r = record();
        let req = UpdateBookingRequest {
            extra_vehicles: Some(1),
            extra_tents: Some(2),
            cable_length: Some(Decimal::new(20, 0)),
            message: Some("  Emplacement ombragé si possible ".into()),
            ..Default::default()
        };
        apply_update(&mut r, req).unwrap();

        assert_eq!(r.extra_vehicles, 1);
        assert_eq!(r.extra_tents, 2);
        assert_eq!(r.equipment.cable_length, Some(Decimal::new(20, 0)));
        assert_eq!(r.equipment.tent_length, Some(Decimal::new(3, 0)));
        assert_eq!(r.contact.message, "Emplacement ombragé si possible");
    }

    #[test]
    fn update_rejects_impossible_measurements() {
        let mut r = record();
        let before = r.clone();
        let req = UpdateBookingRequest {
            tent_width: Some(Decimal::new(50, 2)),
            ..Default::default()
        };
        let errors = apply_update(&mut r, req).unwrap_err();
        assert_eq!(errors[0].field, "tent_width");
        assert_eq!(r.equipment, before.equipment);
    }

    #[test]
    fn update_keeps_checkout_after_checkin() {
        let mut r = record();
        let req = UpdateBookingRequest {
            check_in: Some(date(7, 9)),
            ..Default::default()
        };
        let errors = apply_update(&mut r, req).unwrap_err();
        assert_eq!(errors[0].field, "check_out");
    }

    #[test]
    fn update_cannot_add_half_a_stay() {
        let mut r = BookingRecord {
            stay: None,
            ..record()
        };
        let req = UpdateBookingRequest {
            check_in: Some(date(7, 9)),
            ..Default::default()
        };
        assert!(apply_update(&mut r, req).is_err());
    }
}
