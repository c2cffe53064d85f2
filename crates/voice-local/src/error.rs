use thiserror::Error;

pub type Result<T, E = VoiceError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech capability not supported: {0}")]
    Unsupported(String),
    #[error("{0} session already active")]
    AlreadyActive(&'static str),
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),
}
