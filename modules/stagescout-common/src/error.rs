use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoutError>;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search provider error (status {status}): {message}")]
    SearchProvider { status: u16, message: String },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
