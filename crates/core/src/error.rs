use thiserror::Error;

/// Key-value backend failures. Never retried here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable<E: std::fmt::Display>(e: E) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// Startup configuration errors. Fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown light mode {0:?} (expected \"public\" or \"ci\")")]
    InvalidMode(Option<String>),
}

pub type StoreResult<T> = Result<T, StoreError>;
