//! Flashcard deck resolution and spaced-repetition activity storage
//!
//! - [`deck`] resolves decks that extend other decks and projects cards for practice
//! - [`activity`] persists per-card scheduling state next to each deck file
//! - [`practice`] selects due cards and records grades through a pluggable scheduler

pub mod activity;
pub mod config;
pub mod deck;
pub mod ingest;
pub mod practice;
pub mod repository;

pub use activity::{ActivityError, ActivityStore, CardState, ConflictPolicy, ReviewLog};
pub use config::Config;
pub use deck::{project, resolve, Deck, DeckError, NormalizedCard, ResolvedDeck};
pub use repository::DeckRepository;
