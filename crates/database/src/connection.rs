use crate::error::DbError;
use configuration::DatabaseConfig;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// Every statement checks a connection out of this pool and returns it when
/// the statement finishes, whether it succeeded or not.
pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, DbError> {
    let database_url = cfg.url.as_deref().ok_or_else(|| {
        DbError::ConnectionConfigError(
            "set database.url, BOXOFFICE__DATABASE__URL or DATABASE_URL".to_string(),
        )
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = cfg.max_connections, "Database pool ready.");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::StorageBackend;

    #[tokio::test]
    async fn missing_url_is_a_configuration_error() {
        let cfg = DatabaseConfig {
            backend: StorageBackend::Postgres,
            url: None,
            max_connections: 1,
            acquire_timeout_secs: 1,
        };
        let err = connect(&cfg).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionConfigError(_)));
        assert_eq!(
            err.to_string(),
            "Database connection is not configured: set database.url, BOXOFFICE__DATABASE__URL or DATABASE_URL"
        );
    }
}
