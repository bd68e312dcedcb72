mod admin;
pub mod auth;
mod bookings;
pub mod error;
mod validation;
mod villas;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Account routes (register/login are public, the rest authenticate
    // through the User extractor)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/language", put(auth::set_language));

    // Public villa catalog
    let villa_routes = Router::new()
        .route("/", get(villas::list_villas))
        .route("/:id", get(villas::get_villa));

    // Customer booking routes
    let booking_routes = Router::new()
        .route("/", get(bookings::list_my_bookings))
        .route("/", post(bookings::create_booking))
        .route("/:id", get(bookings::get_booking))
        .route("/:id/cancel", post(bookings::cancel_booking))
        .route("/:id/pay", post(bookings::pay_booking));

    // Back-office routes (admin role enforced per handler)
    let admin_routes = Router::new()
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/export", get(admin::export_bookings))
        .route("/bookings/:id", get(admin::get_booking))
        .route("/bookings/:id/confirm", post(admin::confirm_booking))
        .route("/bookings/:id/cancel", post(admin::cancel_booking))
        .route("/bookings/:id/checkin", post(admin::check_in_booking))
        .route("/bookings/:id/checkout", post(admin::check_out_booking))
        .route("/stats", get(admin::booking_stats))
        .route("/users", get(admin::list_users))
        .route("/villas", post(villas::create_villa))
        .route("/villas/:id", put(villas::update_villa))
        .route("/villas/:id", delete(villas::delete_villa));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/villas", villa_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/admin", admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
