use thiserror::Error;

pub type Result<T, E = KioskError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum KioskError {
    #[error(transparent)]
    Intent(#[from] intent_parser::IntentError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
