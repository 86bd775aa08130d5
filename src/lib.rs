use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod store;

use state::AppState;

/// Assemble the full router over shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(booking_routes())
        .merge(assessment_routes())
        .merge(application_routes())
        .merge(admin_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
}

fn catalog_routes() -> Router<AppState> {
    use handlers::catalog;

    Router::new()
        .route("/api/psychologists", get(catalog::list_psychologists))
        .route("/api/psychologists/:id", get(catalog::get_psychologist))
        .route("/api/packages", get(catalog::list_packages))
        .route("/api/blog", get(catalog::list_blog))
        .route("/api/blog/:id", get(catalog::get_blog_post))
        .route("/api/news", get(catalog::list_news))
        .route("/api/videos", get(catalog::list_videos))
        .route("/api/events", get(catalog::list_events))
        .route("/api/events/:id", get(catalog::get_event))
        .route("/api/events/:id/signup", post(catalog::event_signup))
        .route("/api/support-orgs", get(catalog::list_support_orgs))
        .route("/api/support-orgs/:id", get(catalog::get_support_org))
}

fn booking_routes() -> Router<AppState> {
    use handlers::booking;

    Router::new()
        .route(
            "/api/appointments",
            get(booking::list_appointments).post(booking::create_appointment),
        )
        .route("/api/checkout", post(booking::checkout))
}

fn assessment_routes() -> Router<AppState> {
    use handlers::assessments;

    Router::new()
        .route("/api/tests", get(assessments::list_tests))
        .route("/api/test-results", post(assessments::submit_test_result))
}

fn application_routes() -> Router<AppState> {
    use handlers::applications;

    Router::new().route(
        "/api/psychologist-applications",
        get(applications::my_applications).post(applications::submit_application),
    )
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:id", delete(admin::delete_user))
        .route(
            "/api/admin/psychologist-applications",
            get(admin::list_applications),
        )
        .route(
            "/api/admin/psychologist-applications/:id",
            put(admin::update_application),
        )
        // Generic catalog CRUD; static segments above take precedence
        .route("/api/admin/:collection", post(admin::create_record))
        .route(
            "/api/admin/:collection/:id",
            put(admin::update_record).delete(admin::delete_record),
        )
}
