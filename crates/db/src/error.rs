#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unsafe identifier {0:?}")]
    UnsafeIdentifier(String),
    #[error("row has {found} values but the page declares {expected} columns")]
    RowShape { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, DbError>;
