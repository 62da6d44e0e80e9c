use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The database settings cannot produce a connection (no URL configured).
    #[error("Database connection is not configured: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// The statement would break a foreign key: deleting a row that other
    /// rows still reference, or pointing a row at one that does not exist.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

impl DbError {
    /// Classifies a driver error, separating foreign-key violations from
    /// every other failure.
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return DbError::ForeignKeyViolation(db_err.message().to_string());
            }
        }
        DbError::Query(err)
    }
}
