/// Failure raised by a caller-supplied page handler; aborts pagination.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("auth error: {0}")]
    Auth(String),
    #[error("remote reporting error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("discovery document error: {0}")]
    Discovery(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("page handler error: {0}")]
    Handler(HandlerError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
