//! Registering uploaded deck files
//!
//! Uploaded bytes are validated as a deck, then stored verbatim under the
//! uploads directory using a sanitized copy of the original file name.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::deck::{validate_deck, Deck, DeckError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid deck file: {0}")]
    InvalidDeck(#[from] DeckError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// A stored upload, addressable by `deck_id` relative to the data directory
#[derive(Debug, Clone)]
pub struct Upload {
    pub deck_id: String,
    pub deck: Deck,
}

/// Replace anything outside `[A-Za-z0-9._-]` and ensure a `.json` extension
pub fn sanitize_file_name(name: &str) -> String {
    let mut clean: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !clean.ends_with(".json") {
        clean.push_str(".json");
    }
    clean
}

/// Validate `bytes` as a deck and write them to `<root>/<uploads_dir>/<name>`.
///
/// An existing file with the same name is replaced.
pub fn register_upload(root: &Path, uploads_dir: &str, file_name: &str, bytes: &[u8]) -> Result<Upload> {
    let deck = Deck::from_slice(bytes).map_err(DeckError::from)?;
    validate_deck(&deck)?;

    let name = sanitize_file_name(file_name);
    let dir = root.join(uploads_dir);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(&name), bytes)?;

    let deck_id = format!("{}/{}", uploads_dir.trim_end_matches('/'), name);
    log::info!("Registered deck '{}' as {}", deck.id, deck_id);

    Ok(Upload { deck_id, deck })
}
