use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
