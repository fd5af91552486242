#[cfg(test)]
pub mod test_utils {
    use crate::auth::{AuthConfig, BootstrapConfig};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header, HeaderName, HeaderValue};
    use axum::Router;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Token configuration used by the test server
    pub fn test_auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "rollcall-test-secret".to_string(),
            access_token_minutes: 15,
            refresh_token_days: 7,
        }
    }

    /// Bootstrap credentials matching the documented defaults
    pub fn test_bootstrap_config() -> BootstrapConfig {
        BootstrapConfig {
            email: "admin@gmail.com".to_string(),
            username: "admin".to_string(),
            password: "Abcd@1234".to_string(),
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        AppState {
            db,
            auth: test_auth_config(),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Authorization header for a bearer token
    pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .expect("Failed to build Authorization header"),
        )
    }

    /// Provision the bootstrap superuser and return its access token
    pub async fn bootstrap_admin_access(state: &AppState, server: &TestServer) -> String {
        crate::auth::bootstrap_superuser(&state.db, &test_bootstrap_config())
            .await
            .expect("Failed to bootstrap superuser")
            .expect("Superuser was not created on empty database");

        login_access(server, "admin@gmail.com", "Abcd@1234").await
    }

    /// Register a non-staff user and return its access token
    pub async fn register_and_login(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "full_name": "Test User",
                "type": "teacher",
            }))
            .await;
        assert_eq!(
            response.status_code(),
            axum::http::StatusCode::CREATED,
            "registration failed: {}",
            response.text()
        );

        login_access(server, email, password).await
    }

    /// Log in and return the access token
    pub async fn login_access(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/user/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .await;
        assert_eq!(
            response.status_code(),
            axum::http::StatusCode::OK,
            "login failed: {}",
            response.text()
        );

        let body: serde_json::Value = response.json();
        body["access"]
            .as_str()
            .expect("login response missing access token")
            .to_string()
    }
}
