//! Error taxonomy
//!
//! Configuration and action errors are caller mistakes. A missing body means the
//! entity collections and the physics world disagree, which is unrecoverable.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid action {0}: expected 0 (left), 1 (hold) or 2 (right)")]
    InvalidAction(i64),
    #[error("{0} body is missing from the physics world")]
    MissingBody(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
