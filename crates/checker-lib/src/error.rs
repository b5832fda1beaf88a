//! Error types for check evaluation
//!
//! A Kubernetes API error aborts the current pass entirely; there is no
//! retry, backoff, or partial-result handling at this layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("kubernetes api error: {0}")]
    Kube(#[from] kube::Error),

    #[error("finding sink error: {0}")]
    Sink(String),

    #[error("invalid check configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CheckError>;
