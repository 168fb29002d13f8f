use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("No target match for '{query}'")]
    TrackNotResolved { query: String },

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog_traits::CatalogError),

    #[error("Identity store error: {0}")]
    Store(#[from] core_store::StoreError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
