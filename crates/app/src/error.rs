use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] pulse_db::DbError),
    #[error("report client error: {0}")]
    Client(#[from] report_client::ClientError),
    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error("invalid metric set {name}: {source}")]
    InvalidSpec {
        name: String,
        source: pulse_core::SpecError,
    },
    #[error("no metric definition file configured for schedule {0:?}")]
    MissingSchedule(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
