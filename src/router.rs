use crate::handlers::{
    attendance::{create_attendance, list_attendance},
    courses::{create_course, list_courses},
    departments::{create_department, list_departments},
    health::health_check,
    students::{create_student, list_students},
    users::{login, refresh, register, user_list},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User registration, login and listing
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/refresh", post(refresh))
        .route("/user/user_list", get(user_list))
        // Resource list/create routes
        .route("/departments/", get(list_departments).post(create_department))
        .route("/course/", get(list_courses).post(create_course))
        .route("/student/", get(list_students).post(create_student))
        .route("/attendance/", get(list_attendance).post(create_attendance))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
