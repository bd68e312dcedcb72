use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::auth::require_admin;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_name, validate_price};
use crate::db::{CreateVillaRequest, UpdateVillaRequest, User, Villa, VillaResponse};
use crate::AppState;

pub async fn list_villas(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VillaResponse>>, ApiError> {
    let villas = sqlx::query_as::<_, Villa>("SELECT * FROM villas ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(villas.into_iter().map(VillaResponse::from).collect()))
}

pub async fn get_villa(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VillaResponse>, ApiError> {
    let villa = sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Villa not found"))?;

    Ok(Json(VillaResponse::from(villa)))
}

fn validate_villa_fields(
    name: &str,
    price: i64,
    guests: i64,
    bedrooms: i64,
    bathrooms: i64,
    size_sqm: i64,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_price(price) {
        errors.add("price", e);
    }
    if guests < 1 {
        errors.add("guests", "Capacity must be at least 1 guest");
    }
    if bedrooms < 1 {
        errors.add("bedrooms", "Bedrooms must be at least 1");
    }
    if bathrooms < 1 {
        errors.add("bathrooms", "Bathrooms must be at least 1");
    }
    if size_sqm < 0 {
        errors.add("size_sqm", "Size cannot be negative");
    }
    errors.finish()
}

fn encode_string_list(list: &[String]) -> Result<String, ApiError> {
    serde_json::to_string(list)
        .map_err(|e| ApiError::internal(format!("Failed to encode list: {}", e)))
}

pub async fn create_villa(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(request): Json<CreateVillaRequest>,
) -> Result<(StatusCode, Json<VillaResponse>), ApiError> {
    require_admin(&user)?;
    validate_villa_fields(
        &request.name,
        request.price,
        request.guests,
        request.bedrooms,
        request.bathrooms,
        request.size_sqm,
    )?;

    let id = Uuid::new_v4().to_string();
    let features = encode_string_list(&request.features)?;
    let images = encode_string_list(&request.images)?;

    sqlx::query(
        r#"
        INSERT INTO villas
            (id, name, price, guests, bedrooms, bathrooms, size_sqm, image_url, description, features, images)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&request.name)
    .bind(request.price)
    .bind(request.guests)
    .bind(request.bedrooms)
    .bind(request.bathrooms)
    .bind(request.size_sqm)
    .bind(&request.image_url)
    .bind(&request.description)
    .bind(&features)
    .bind(&images)
    .execute(&state.db)
    .await?;

    tracing::info!("Created villa {} ({})", request.name, id);

    let villa = sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(VillaResponse::from(villa))))
}

pub async fn update_villa(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(request): Json<UpdateVillaRequest>,
) -> Result<Json<VillaResponse>, ApiError> {
    require_admin(&user)?;

    let villa = sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Villa not found"))?;

    // Merge provided fields over the stored record
    let name = request.name.unwrap_or(villa.name);
    let price = request.price.unwrap_or(villa.price);
    let guests = request.guests.unwrap_or(villa.guests);
    let bedrooms = request.bedrooms.unwrap_or(villa.bedrooms);
    let bathrooms = request.bathrooms.unwrap_or(villa.bathrooms);
    let size_sqm = request.size_sqm.unwrap_or(villa.size_sqm);
    let image_url = request.image_url.unwrap_or(villa.image_url);
    let description = request.description.unwrap_or(villa.description);
    let features = match &request.features {
        Some(list) => encode_string_list(list)?,
        None => villa.features,
    };
    let images = match &request.images {
        Some(list) => encode_string_list(list)?,
        None => villa.images,
    };

    validate_villa_fields(&name, price, guests, bedrooms, bathrooms, size_sqm)?;

    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        UPDATE villas
        SET name = ?, price = ?, guests = ?, bedrooms = ?, bathrooms = ?, size_sqm = ?,
            image_url = ?, description = ?, features = ?, images = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(price)
    .bind(guests)
    .bind(bedrooms)
    .bind(bathrooms)
    .bind(size_sqm)
    .bind(&image_url)
    .bind(&description)
    .bind(&features)
    .bind(&images)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await?;

    let villa = sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(VillaResponse::from(villa)))
}

pub async fn delete_villa(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&user)?;

    // Bookings keep their denormalized villa snapshot; only the catalog
    // entry goes away.
    let result = sqlx::query("DELETE FROM villas WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Villa not found"));
    }

    tracing::info!("Deleted villa {}", id);
    Ok(StatusCode::NO_CONTENT)
}
