pub mod admin;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod intake;
pub mod middleware;
pub mod pricing;
pub mod seo;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;

/// All routes of the booking site. Transport layers (CORS, tracing) are
/// added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/bookings", post(bookings::create_booking))
        .route("/admin/login", post(auth::login))
        .route("/robots.txt", get(seo::robots_txt))
        .route("/sitemap.xml", get(seo::sitemap_xml))
        .route("/health", get(|| async { "ok" }))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/bookings", get(admin::list_bookings))
        .route(
            "/admin/bookings/{id}",
            get(admin::get_booking)
                .patch(admin::update_booking)
                .delete(admin::delete_booking),
        )
        .route("/admin/bookings/{id}/quote", get(pricing::quote_booking))
        .route("/admin/capacities", get(admin::list_capacities))
        .route("/admin/capacities/{category}", put(admin::set_capacity))
        .route("/admin/tariffs", get(pricing::list_tariffs))
        .route(
            "/admin/tariffs/{category}/{season}",
            put(pricing::set_tariff).delete(pricing::delete_tariff),
        )
        .route(
            "/admin/supplements",
            get(pricing::get_supplements).put(pricing::set_supplements),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(admin_routes)
}
