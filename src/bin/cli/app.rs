use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use flashdeck_lib::activity::ActivityStore;
use flashdeck_lib::config::Config;
use flashdeck_lib::deck::ResolvedDeck;
use flashdeck_lib::repository::DeckRepository;

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub data_dir: PathBuf,
    pub repository: DeckRepository,
}

impl App {
    /// Load configuration; `data_dir` takes precedence over the config file and environment
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::load(config_path).context("Failed to load configuration")?;
        if let Some(dir) = data_dir {
            config.data_dir = Some(dir);
        }

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let repository = config
            .repository()
            .context("Failed to set up deck repository")?;

        Ok(Self {
            config,
            data_dir,
            repository,
        })
    }

    pub fn resolve_deck(&self, deck_id: &str) -> Result<ResolvedDeck> {
        self.repository
            .resolve_deck(deck_id)
            .with_context(|| format!("Failed to resolve deck '{}'", deck_id))
    }

    /// Resolve a deck and an activity store bound to it
    pub fn open_deck(&self, deck_id: &str) -> Result<(ResolvedDeck, ActivityStore)> {
        let mut store = self
            .config
            .activity_store()
            .context("Failed to create activity store")?;
        let deck = self
            .repository
            .open_deck(deck_id, &mut store)
            .with_context(|| format!("Failed to open deck '{}'", deck_id))?;
        Ok((deck, store))
    }

    /// Activity for a deck without resolving it
    pub fn open_activity(&self, deck_id: &str) -> Result<ActivityStore> {
        let mut store = self
            .config
            .activity_store()
            .context("Failed to create activity store")?;
        store.bind(deck_id);
        store
            .load()
            .with_context(|| format!("Failed to load activity for '{}'", deck_id))?;
        Ok(store)
    }
}
