//! Deck error types

use thiserror::Error;

/// Errors raised while fetching a deck document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0} for {1}")]
    Status(u16, String),

    #[error("Remote decks are disabled: {0}")]
    RemoteDisabled(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

/// Errors raised while loading or resolving a deck
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Invalid deck: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Extension cycle through {0}")]
    Cycle(String),

    #[error("Extension chain too deep at {0}")]
    TooDeep(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
