/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use std::io;
use thiserror::Error;

/// Boxed cause carried by [`PhotosError::Transport`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum PhotosError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request network error: {0}")]
    Transport(#[from] BoxError),

    #[error("Deserialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Authorization error. {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for PhotosError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<url::ParseError> for PhotosError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRequest(format!("URL parse error: {err}"))
    }
}
