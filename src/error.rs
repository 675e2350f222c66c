//! Crate error type

use thiserror::Error;

/// Errors surfaced by the simulation and its collaborator boundaries.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no sound category named `{0}`")]
    UnknownSound(String),
    #[error("no animation named `{0}`")]
    UnknownAnimation(String),
    #[error("animation `{0}` has no frames")]
    EmptyAnimation(String),
    #[error("{entity} left the simulation with a non-finite position")]
    NonFinite { entity: &'static str },
    #[error("invalid settings: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
