//! Error type for the fallible edges of the core
//!
//! The tick path itself never fails; only loading settings/levels and
//! spawning the loop thread can.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level set contains no levels")]
    NoLevels,
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(io::Error),
    #[error("simulation state was lost when the loop thread died")]
    StateLost,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
