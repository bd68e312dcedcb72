//! Customer-facing booking endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_date, validate_date_range, validate_guests, validate_name, validate_phone,
};
use crate::db::bookings::{self, NewBooking};
use crate::db::{Booking, BookingAction, CreateBookingRequest, User, Villa};
use crate::AppState;

fn validate_create_request(req: &CreateBookingRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if req.villa_id.is_empty() {
        errors.add("villa_id", "Villa is required");
    }

    let check_in_ok = match validate_date(&req.check_in) {
        Ok(()) => true,
        Err(e) => {
            errors.add("check_in", e);
            false
        }
    };
    let check_out_ok = match validate_date(&req.check_out) {
        Ok(()) => true,
        Err(e) => {
            errors.add("check_out", e);
            false
        }
    };
    if check_in_ok && check_out_ok {
        if let Err(e) = validate_date_range(&req.check_in, &req.check_out) {
            errors.add("check_out", e);
        }
    }

    if let Err(e) = validate_guests(req.guests) {
        errors.add("guests", e);
    }
    if let Some(name) = &req.customer_name {
        if let Err(e) = validate_name(name) {
            errors.add("customer_name", e);
        }
    }
    if let Err(e) = validate_phone(&req.customer_phone) {
        errors.add("customer_phone", e);
    }

    errors.finish()
}

/// Whether the booking belongs to the authenticated account.
fn owns(user: &User, booking: &Booking) -> bool {
    booking.user_id.as_deref() == Some(user.id.as_str()) || booking.user_email == user.email
}

/// Create a booking request. The villa's name, image and nightly price
/// are snapshotted into the record, and the new booking starts Pending.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    validate_create_request(&request)?;

    let villa = sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = ?")
        .bind(&request.villa_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::validation_field("villa_id", "Unknown villa"))?;

    let new = NewBooking {
        villa_id: villa.id.clone(),
        villa_name: villa.name.clone(),
        villa_image: villa.image_url.clone(),
        check_in: request.check_in,
        check_out: request.check_out,
        guests: request.guests,
        total_price: villa.price,
        customer_name: request.customer_name.unwrap_or_else(|| user.name.clone()),
        customer_phone: request.customer_phone.or_else(|| user.phone.clone()),
        message: request.message,
        user_id: user.id.clone(),
        user_email: user.email.clone(),
    };

    let booking = bookings::create(&state.db, &new).await?;
    tracing::info!(
        "Booking {} created for {} ({})",
        booking.id,
        booking.villa_name,
        booking.user_email
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

/// List the authenticated user's bookings, newest first.
pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = bookings::list_by_user(&state.db, &user.email).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = bookings::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    // Another user's booking is indistinguishable from a missing one
    if !owns(&user, &booking) && !user.is_admin() {
        return Err(ApiError::not_found("Booking not found"));
    }

    Ok(Json(booking))
}

/// Cancel one of the user's own bookings.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = bookings::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;
    if !owns(&user, &booking) {
        return Err(ApiError::not_found("Booking not found"));
    }

    let booking = bookings::apply_action(&state.db, &id, BookingAction::Cancel, None).await?;
    tracing::info!("Booking {} cancelled by {}", booking.id, user.email);
    Ok(Json(booking))
}

/// Pay for one of the user's own bookings. Payment is simulated and
/// always succeeds; the booking moves from Pending to Confirmed.
pub async fn pay_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = bookings::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;
    if !owns(&user, &booking) {
        return Err(ApiError::not_found("Booking not found"));
    }

    let booking = bookings::apply_action(&state.db, &id, BookingAction::Confirm, None).await?;
    tracing::info!(
        "Simulated payment of {} received for booking {}",
        booking.total_price,
        booking.id
    );
    Ok(Json(booking))
}
