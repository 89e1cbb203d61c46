//! Locating decks by identifier and opening them for practice

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::activity::{ActivityError, ActivityStore};
use crate::deck::{parse_deck, resolve, Deck, DeckError, DeckFetcher, Location, ResolvedDeck};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Activity(#[from] ActivityError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Absolute ids are used verbatim; anything else lives under `root`
pub fn locate_deck(root: &Path, deck_id: &str) -> PathBuf {
    let path = Path::new(deck_id);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Deck files under a data directory
pub struct DeckRepository {
    root: PathBuf,
    fetcher: Box<dyn DeckFetcher>,
}

impl DeckRepository {
    pub fn new(root: PathBuf, fetcher: Box<dyn DeckFetcher>) -> Self {
        Self { root, fetcher }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn locate(&self, deck_id: &str) -> PathBuf {
        locate_deck(&self.root, deck_id)
    }

    /// Read and validate a deck document without following extensions
    pub fn read_deck(&self, deck_id: &str) -> Result<Deck> {
        let location = Location::from(self.locate(deck_id));
        let text = self.fetcher.fetch(&location).map_err(DeckError::from)?;
        Ok(parse_deck(&text)?)
    }

    /// Read a deck and merge in everything it extends
    pub fn resolve_deck(&self, deck_id: &str) -> Result<ResolvedDeck> {
        let location = Location::from(self.locate(deck_id));
        let root = self.read_deck(deck_id)?;
        Ok(resolve(root, &location, self.fetcher.as_ref())?)
    }

    /// Resolve a deck and scope `store` to it with its activity loaded
    pub fn open_deck(&self, deck_id: &str, store: &mut ActivityStore) -> Result<ResolvedDeck> {
        let deck = self.resolve_deck(deck_id)?;
        store.bind(deck_id);
        store.load()?;
        Ok(deck)
    }
}
