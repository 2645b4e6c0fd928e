/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The redb backend failed.
    #[error("database error: {0}")]
    Backend(#[from] redb::Error),
    /// A stored document could not be encoded or decoded.
    #[error("document codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

macro_rules! impl_from_redb {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for StorageError {
                fn from(err: $err) -> Self {
                    Self::Backend(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
