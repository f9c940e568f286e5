use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuotaError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid timezone offset: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, QuotaError>;
