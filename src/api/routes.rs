use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::guard::route_guard;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes -- exempt from the page guard; handlers enforce their own
    // session requirements
    let api_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/auth/verify", get(handlers::verify))
        .route(
            "/api/students",
            post(handlers::create_student).get(handlers::list_students),
        )
        .route(
            "/api/students/:student_id",
            get(handlers::get_student).delete(handlers::delete_student),
        );

    // Page routes -- every navigation passes through the route guard
    let page_routes = Router::new()
        .route("/", get(handlers::page))
        .route("/login", get(handlers::page))
        .route("/dashboard", get(handlers::page))
        .route("/profile", get(handlers::page))
        .route("/materials", get(handlers::page))
        .route("/exams", get(handlers::page))
        .route("/exams/:id", get(handlers::page))
        .route("/results", get(handlers::page))
        .route("/transactions", get(handlers::page))
        .route("/admin/login", get(handlers::page))
        .route("/admin/dashboard", get(handlers::page))
        .route("/admin/students", get(handlers::page))
        .route("/admin/students/new", get(handlers::page))
        .route("/admin/courses", get(handlers::page))
        .route("/admin/exams", get(handlers::page))
        .route("/admin/transactions", get(handlers::page))
        .route("/admin/dues", get(handlers::page))
        .route("/admin/reports", get(handlers::page))
        .route("/admin/settings", get(handlers::page))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            route_guard,
        ));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
