//! Back-office endpoints: booking management, export, stats, users.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_admin;
use super::error::ApiError;
use super::validation::{validate_date, validate_search, validate_time};
use crate::db::bookings::{self, BookingFilter};
use crate::db::{Booking, BookingAction, BookingStatus, RecordTimeRequest, User, UserResponse};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    /// Filter by lifecycle status
    pub status: Option<String>,
    /// Filter by check-in date (YYYY-MM-DD)
    pub check_in: Option<String>,
    /// Search over booking id, customer name and villa name
    pub q: Option<String>,
}

fn build_filter(query: &BookingListQuery) -> Result<BookingFilter, ApiError> {
    let status = match &query.status {
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .ok_or_else(|| ApiError::validation_field("status", "Unknown status"))?,
        ),
        None => None,
    };

    if let Some(check_in) = &query.check_in {
        validate_date(check_in).map_err(|e| ApiError::validation_field("check_in", e))?;
    }
    if let Some(q) = &query.q {
        validate_search(q).map_err(|e| ApiError::validation_field("q", e))?;
    }

    Ok(BookingFilter {
        status,
        check_in: query.check_in.clone(),
        search: query.q.clone(),
    })
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    user: User,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    require_admin(&user)?;
    let filter = build_filter(&query)?;
    let bookings = bookings::list_all(&state.db, &filter).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    require_admin(&user)?;
    let booking = bookings::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;
    Ok(Json(booking))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    require_admin(&user)?;
    let booking = bookings::apply_action(&state.db, &id, BookingAction::Confirm, None).await?;
    tracing::info!("Booking {} confirmed by {}", booking.id, user.email);
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    require_admin(&user)?;
    let booking = bookings::apply_action(&state.db, &id, BookingAction::Cancel, None).await?;
    tracing::info!("Booking {} cancelled by {}", booking.id, user.email);
    Ok(Json(booking))
}

/// Record guest arrival: Confirmed -> Checked-in, with the actual time.
pub async fn check_in_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(request): Json<RecordTimeRequest>,
) -> Result<Json<Booking>, ApiError> {
    require_admin(&user)?;
    validate_time(&request.time).map_err(|e| ApiError::validation_field("time", e))?;

    let booking =
        bookings::apply_action(&state.db, &id, BookingAction::CheckIn, Some(&request.time)).await?;
    tracing::info!("Booking {} checked in at {}", booking.id, request.time);
    Ok(Json(booking))
}

/// Record guest departure: Checked-in -> Checked-out, with the actual time.
pub async fn check_out_booking(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(request): Json<RecordTimeRequest>,
) -> Result<Json<Booking>, ApiError> {
    require_admin(&user)?;
    validate_time(&request.time).map_err(|e| ApiError::validation_field("time", e))?;

    let booking =
        bookings::apply_action(&state.db, &id, BookingAction::CheckOut, Some(&request.time)).await?;
    tracing::info!("Booking {} checked out at {}", booking.id, request.time);
    Ok(Json(booking))
}

/// CSV export of the (optionally filtered) booking list.
pub async fn export_bookings(
    State(state): State<Arc<AppState>>,
    user: User,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&user)?;
    let filter = build_filter(&query)?;
    let bookings = bookings::list_all(&state.db, &filter).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "id",
            "customer",
            "email",
            "phone",
            "villa",
            "check_in",
            "check_out",
            "guests",
            "total_price",
            "status",
            "actual_check_in",
            "actual_check_out",
            "created_at",
        ])
        .map_err(|e| ApiError::internal(format!("Failed to build CSV export: {}", e)))?;

    for b in &bookings {
        writer
            .write_record([
                b.id.clone(),
                b.customer_name.clone(),
                b.user_email.clone(),
                b.customer_phone.clone().unwrap_or_default(),
                b.villa_name.clone(),
                b.check_in.clone(),
                b.check_out.clone(),
                b.guests.to_string(),
                b.total_price.to_string(),
                b.status.clone(),
                b.actual_check_in.clone().unwrap_or_default(),
                b.actual_check_out.clone().unwrap_or_default(),
                b.created_at.clone(),
            ])
            .map_err(|e| ApiError::internal(format!("Failed to build CSV export: {}", e)))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| ApiError::internal(format!("Failed to build CSV export: {}", e)))?;
    let body = String::from_utf8(data)
        .map_err(|e| ApiError::internal(format!("Failed to build CSV export: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bookings.csv\"",
            ),
        ],
        body,
    ))
}

#[derive(Debug, Serialize)]
pub struct BookingStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub checked_in: i64,
    pub checked_out: i64,
    pub cancelled: i64,
    /// Summed price of all non-cancelled bookings
    pub revenue: i64,
}

/// Counts per lifecycle status plus gross revenue, for the dashboard.
pub async fn booking_stats(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<BookingStats>, ApiError> {
    require_admin(&user)?;

    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status")
            .fetch_all(&state.db)
            .await?;

    let mut stats = BookingStats {
        total: 0,
        pending: 0,
        confirmed: 0,
        checked_in: 0,
        checked_out: 0,
        cancelled: 0,
        revenue: 0,
    };
    for (status, count) in rows {
        stats.total += count;
        match BookingStatus::parse(&status) {
            Some(BookingStatus::Pending) => stats.pending = count,
            Some(BookingStatus::Confirmed) => stats.confirmed = count,
            Some(BookingStatus::CheckedIn) => stats.checked_in = count,
            Some(BookingStatus::CheckedOut) => stats.checked_out = count,
            Some(BookingStatus::Cancelled) => stats.cancelled = count,
            None => tracing::warn!("Skipping unrecognized booking status {:?} in stats", status),
        }
    }

    let revenue: (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_price), 0) FROM bookings WHERE status != 'Cancelled'",
    )
    .fetch_one(&state.db)
    .await?;
    stats.revenue = revenue.0;

    Ok(Json(stats))
}

/// List all user accounts.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_admin(&user)?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
