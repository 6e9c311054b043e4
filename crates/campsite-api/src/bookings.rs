use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use campsite_db::ReserveOutcome;
use campsite_types::api::{CreateBookingRequest, CreatedBooking};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::intake::build_booking;
use crate::pricing::quote_for;

/// Public reservation request. Creates a pending booking if the form is
/// valid and a pitch of the requested category is free for every night.
/// The response carries the price and deposit when a tariff is set.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = build_booking(&req, chrono::Utc::now()).map_err(ApiError::Validation)?;
    let category = record.site_type.category();

    let db = state.clone();
    let to_insert = record.clone();
    let outcome = blocking(move || Ok(db.db.reserve_booking(&to_insert)?)).await?;

    match outcome {
        ReserveOutcome::Created => {
            info!(id = %record.id, site_type = %record.site_type, "Booking request received");

            let db = state.clone();
            let to_price = record.clone();
            // The booking is stored by now; a pricing failure must not undo that.
            let quote = match blocking(move || quote_for(&db.db, &to_price)).await {
                Ok(quote) => quote,
                Err(e) => {
                    warn!(id = %record.id, "Could not price booking: {}", e);
                    None
                }
            };

            Ok((
                StatusCode::CREATED,
                Json(CreatedBooking {
                    booking: record,
                    quote,
                }),
            ))
        }
        ReserveOutcome::Full { max_places } => {
            info!(%category, max_places, "Booking refused, category full");
            Err(ApiError::Conflict(
                "no pitch left for these dates, choose other dates or contact the campsite"
                    .to_string(),
            ))
        }
        ReserveOutcome::NoCapacity => Err(ApiError::Conflict(format!(
            "capacity for {} is not configured",
            category
        ))),
    }
}
