use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// No record matched the given identifier. Logged by callers, not fatal.
    #[error("{entity} with source id {source_id} not found")]
    NotFound {
        entity: &'static str,
        source_id: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
