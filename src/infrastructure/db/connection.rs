use std::time::Duration;

use sqlx::AnyConnection;
use sqlx::Connection;
use tracing::{error, info, warn};

use crate::domain::config::DbConfig;
use crate::domain::error::{AppError, Result};

/// Open the single connection used for a load run
pub async fn connect(config: &DbConfig) -> Result<AnyConnection> {
    sqlx::any::install_default_drivers();

    let url = config.connection_url()?;
    let timeout = Duration::from_secs(config.connect_timeout_secs);

    let conn = tokio::time::timeout(timeout, AnyConnection::connect(&url))
        .await
        .map_err(|_| {
            error!(
                backend = %config.backend,
                host = %config.host,
                timeout_secs = config.connect_timeout_secs,
                "Timed out connecting to database"
            );
            AppError::ConnectionError(format!(
                "Timed out after {}s connecting to {} database '{}'",
                config.connect_timeout_secs, config.backend, config.database
            ))
        })?
        .map_err(|e| {
            error!(backend = %config.backend, host = %config.host, "Failed to connect: {}", e);
            AppError::ConnectionError(format!(
                "Failed to connect to {} database '{}': {}",
                config.backend, config.database, e
            ))
        })?;

    info!(
        backend = %config.backend,
        host = %config.host,
        database = %config.database,
        "Successfully connected to database"
    );
    Ok(conn)
}

/// Release the connection. A failed close is logged, not returned.
pub async fn close(conn: AnyConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection cleanly: {}", e);
    }
}
