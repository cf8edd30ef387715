use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RfcError(#[from] almanac_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
