use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::auth::{bootstrap_superuser, BootstrapConfig};
use crate::config::initialize_app_state_with_url;
use crate::router::create_router;

pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering serve function");
    info!("Rollcall application starting up");
    debug!("Database URL: {}", database_url);
    debug!("Bind address: {}", bind_address);

    // Initialize application state
    trace!("Initializing application state");
    let state = match initialize_app_state_with_url(database_url).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    // Apply migrations
    info!("Running database migrations");
    if let Err(e) = Migrator::up(&state.db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    debug!("All pending migrations have been applied");

    // Provision the first superuser on an empty user table
    let bootstrap = BootstrapConfig::from_env();
    match bootstrap_superuser(&state.db, &bootstrap).await {
        Ok(Some(user)) => info!("Bootstrap superuser provisioned with ID: {}", user.id),
        Ok(None) => debug!("User table is not empty, skipping superuser bootstrap"),
        Err(e) => {
            error!("Failed to bootstrap superuser: {}", e);
            return Err(anyhow::anyhow!("superuser bootstrap failed: {}", e));
        }
    }

    // Create router
    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Rollcall API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
