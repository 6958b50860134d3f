use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown buffer status: {0}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
