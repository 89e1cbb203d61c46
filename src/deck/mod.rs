//! Deck documents and their resolution into practice-ready cards
//!
//! This module provides:
//! - The deck/card/content data model
//! - Structural validation
//! - Extension resolution (local files and http(s) URLs)
//! - Projection of cards into normalized practice cards

pub mod errors;
pub mod fetch;
pub mod location;
pub mod models;
pub mod projection;
pub mod resolver;
pub mod validate;

pub use errors::{DeckError, FetchError};
pub use fetch::{DeckFetcher, DefaultFetcher};
pub use location::Location;
pub use models::*;
pub use projection::{project, project_all, NormalizedCard, QuizOption};
pub use resolver::{merge_cards, resolve, resolve_location, ResolvedDeck, MAX_EXTENSION_DEPTH};
pub use validate::{parse_deck, validate_deck};
