use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use campsite_db::Database;
use campsite_types::api::{Claims, FieldError, SetTariffRequest};
use campsite_types::pricing::{self, PricingError};
use campsite_types::{BookingRecord, ModelError, Quote, Season, SiteCategory, Supplements, Tariff};

use crate::admin::load_booking;
use crate::auth::AppState;
use crate::error::{ApiError, blocking};

/// Price `record` with the stored tariff of its category and season.
/// `None` when no tariff has been entered for them yet.
pub fn quote_for(db: &Database, record: &BookingRecord) -> Result<Option<Quote>, ApiError> {
    let Some(season) = pricing::season_of(record) else {
        return Ok(None);
    };
    let Some(tariff) = db.get_tariff(record.site_type.category(), season)? else {
        return Ok(None);
    };
    let supplements = db.get_supplements()?;
    pricing::quote(record, &tariff, &supplements)
        .map(Some)
        .map_err(|e| ApiError::Internal(e.into()))
}

pub async fn list_tariffs(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let tariffs = blocking(move || Ok(db.db.list_tariffs()?)).await?;
    Ok(Json(tariffs))
}

pub async fn set_tariff(
    State(state): State<AppState>,
    Path((category, season)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetTariffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (category, season) = parse_key(&category, &season)?;
    let tariff = Tariff {
        category,
        season,
        one_person_with_electricity: req.one_person_with_electricity,
        two_persons_with_electricity: req.two_persons_with_electricity,
        one_person_without_electricity: req.one_person_without_electricity,
        two_persons_without_electricity: req.two_persons_without_electricity,
    };
    validate_tariff(&tariff).map_err(ApiError::Validation)?;

    let db = state.clone();
    blocking(move || Ok(db.db.set_tariff(&tariff)?)).await?;

    info!(%category, %season, admin = %claims.username, "Tariff updated");
    Ok(Json(tariff))
}

pub async fn delete_tariff(
    State(state): State<AppState>,
    Path((category, season)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let (category, season) = parse_key(&category, &season)?;

    let db = state.clone();
    let deleted = blocking(move || Ok(db.db.delete_tariff(category, season)?)).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(%category, %season, admin = %claims.username, "Tariff deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_supplements(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let supplements = blocking(move || Ok(db.db.get_supplements()?)).await?;
    Ok(Json(supplements))
}

pub async fn set_supplements(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(supplements): Json<Supplements>,
) -> Result<impl IntoResponse, ApiError> {
    let errors: Vec<FieldError> = [
        ("extra_adult", Some(supplements.extra_adult)),
        ("child_over_8", Some(supplements.child_over_8)),
        ("child_under_8", Some(supplements.child_under_8)),
        ("pet", Some(supplements.pet)),
        ("extra_vehicle", supplements.extra_vehicle),
        ("extra_tent", supplements.extra_tent),
    ]
    .into_iter()
    .filter_map(|(field, amount)| check_amount(field, amount?))
    .collect();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let db = state.clone();
    blocking(move || Ok(db.db.set_supplements(&supplements)?)).await?;

    info!(admin = %claims.username, "Supplements updated");
    Ok(Json(supplements))
}

/// Price of an existing booking at today's tariffs.
pub async fn quote_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = load_booking(&state, id).await?;
    let Some(season) = pricing::season_of(&record) else {
        return Err(ApiError::Conflict(PricingError::NoStay.to_string()));
    };
    let category = record.site_type.category();

    let db = state.clone();
    let quote = blocking(move || quote_for(&db.db, &record)).await?;
    quote.map(Json).ok_or_else(|| {
        ApiError::Conflict(format!("no tariff for {} in {} season", category, season))
    })
}

fn parse_key(category: &str, season: &str) -> Result<(SiteCategory, Season), ApiError> {
    let bad_request = |e: ModelError| ApiError::BadRequest(e.to_string());
    Ok((
        category.parse().map_err(bad_request)?,
        season.parse().map_err(bad_request)?,
    ))
}

/// Amounts are non-negative, below 10 000 and in whole cents. Camping cars
/// are always charged for two, so a one-person price makes no sense there.
fn validate_tariff(tariff: &Tariff) -> Result<(), Vec<FieldError>> {
    let one_person = [
        ("one_person_with_electricity", tariff.one_person_with_electricity),
        ("one_person_without_electricity", tariff.one_person_without_electricity),
    ];
    let two_persons = [
        ("two_persons_with_electricity", tariff.two_persons_with_electricity),
        ("two_persons_without_electricity", tariff.two_persons_without_electricity),
    ];

    let mut errors: Vec<FieldError> = one_person
        .into_iter()
        .chain(two_persons)
        .filter_map(|(field, amount)| check_amount(field, amount?))
        .collect();

    if tariff.category == SiteCategory::CampingCar {
        for (field, amount) in one_person {
            if amount.is_some() && !errors.iter().any(|e| e.field == field) {
                errors.push(FieldError::new(field, "camping cars only have two-person prices"));
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_amount(field: &str, amount: Decimal) -> Option<FieldError> {
    let valid = amount >= Decimal::ZERO
        && amount < Decimal::new(10_000, 0)
        && amount.normalize().scale() <= 2;
    (!valid).then(|| FieldError::new(field, "between 0 and 9999.99, in cents"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tariff(category: SiteCategory) -> Tariff {
        Tariff {
            category,
            season: Season::Mid,
            one_person_with_electricity: None,
            two_persons_with_electricity: Some(Decimal::new(2800, 2)),
            one_person_without_electricity: None,
            two_persons_without_electricity: Some(Decimal::new(2400, 2)),
        }
    }

    #[test]
    fn camping_cars_refuse_one_person_prices() {
        assert!(validate_tariff(&tariff(SiteCategory::CampingCar)).is_ok());

        let priced_for_one = Tariff {
            one_person_with_electricity: Some(Decimal::new(1800, 2)),
            ..tariff(SiteCategory::CampingCar)
        };
        let errors = validate_tariff(&priced_for_one).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "one_person_with_electricity");

        let tent = Tariff {
            category: SiteCategory::Tent,
            ..priced_for_one
        };
        assert!(validate_tariff(&tent).is_ok());
    }

    #[test]
    fn amounts_are_whole_cents_in_range() {
        let bad = Tariff {
            two_persons_with_electricity: Some(Decimal::new(-1, 0)),
            two_persons_without_electricity: Some(Decimal::new(12_345, 3)),
            ..tariff(SiteCategory::Tent)
        };
        let fields: Vec<String> = validate_tariff(&bad)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            ["two_persons_with_electricity", "two_persons_without_electricity"]
        );

        assert!(check_amount("pet", Decimal::new(999_999, 2)).is_none());
        assert!(check_amount("pet", Decimal::new(10_000, 0)).is_some());
        assert!(check_amount("pet", Decimal::new(1_500, 3)).is_none());
    }
}
