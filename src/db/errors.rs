use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query execution error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Transaction error: {0}")]
    TransactionError(String),

    #[error("Integrity constraint violation: {0}")]
    IntegrityError(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl DatabaseError {
    /// Check if this is an integrity constraint violation (unique, foreign key, ...)
    pub fn is_integrity_error(&self) -> bool {
        match self {
            Self::IntegrityError(_) => true,
            Self::QueryError(e) => e
                .as_database_error()
                .map(|db_error| {
                    db_error.is_unique_violation()
                        || db_error.is_foreign_key_violation()
                        || db_error.is_check_violation()
                })
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Fold constraint violations reported by SQLite into `IntegrityError`
    pub fn from_query(err: sqlx::Error, context: &str) -> Self {
        let wrapped = Self::QueryError(err);
        if wrapped.is_integrity_error() {
            Self::IntegrityError(format!("{}: {}", context, wrapped))
        } else {
            wrapped
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
