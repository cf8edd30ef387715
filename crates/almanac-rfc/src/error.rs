use thiserror::Error;

/// RFC parsing errors surfaced to strict callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RfcError {
    #[error("Unsupported recurrence rule: {0}")]
    UnsupportedRule(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
