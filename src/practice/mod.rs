//! Practice sessions on top of resolved decks and activity stores
//!
//! The scheduling algorithm is pluggable through [`Scheduler`]; this module
//! only selects due cards and records grading outcomes.

pub mod sm2;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::{ActivityError, ActivityStore, CardState, ReviewLog};
use crate::deck::{project, NormalizedCard, ResolvedDeck};

pub use sm2::Sm2Scheduler;

#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("Rating must be between 1 and 4, got {0}")]
    InvalidRating(u8),

    #[error("Unknown practice mode: {0}")]
    InvalidMode(String),

    #[error("Unknown practice order: {0}")]
    InvalidOrder(String),

    #[error("Activity error: {0}")]
    Activity(#[from] ActivityError),
}

pub type Result<T> = std::result::Result<T, PracticeError>;

/// How well the user recalled a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl TryFrom<u8> for Rating {
    type Error = PracticeError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(PracticeError::InvalidRating(other)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating as u8
    }
}

/// Which cards a session draws from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    /// New cards and due reviews
    #[default]
    Mixed,
    /// Only cards that have been graded before and are due
    Review,
    /// Only cards that have never been graded
    New,
}

impl FromStr for PracticeMode {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mixed" => Ok(Self::Mixed),
            "review" => Ok(Self::Review),
            "new" => Ok(Self::New),
            other => Err(PracticeError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mixed => write!(f, "mixed"),
            Self::Review => write!(f, "review"),
            Self::New => write!(f, "new"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeOrder {
    /// Deck order
    #[default]
    Standard,
    Random,
}

impl PracticeOrder {
    /// Order requested by the deck's own settings
    pub fn for_deck(deck: &ResolvedDeck) -> Self {
        match deck.settings.as_ref().and_then(|s| s.shuffle) {
            Some(true) => Self::Random,
            _ => Self::Standard,
        }
    }
}

impl FromStr for PracticeOrder {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(Self::Standard),
            "random" => Ok(Self::Random),
            other => Err(PracticeError::InvalidOrder(other.to_string())),
        }
    }
}

/// Outcome of grading one card
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled {
    pub state: CardState,
    pub log: ReviewLog,
}

/// Computes the next state of a card from its previous state and a rating
pub trait Scheduler {
    fn schedule(&self, previous: Option<&CardState>, rating: Rating, now: DateTime<Utc>) -> Scheduled;
}

/// Eligible cards currently due in `mode`, in the requested order
pub fn due_cards(
    deck: &ResolvedDeck,
    store: &ActivityStore,
    mode: PracticeMode,
    order: PracticeOrder,
    now: DateTime<Utc>,
) -> Vec<NormalizedCard> {
    due_cards_with_rng(deck, store, mode, order, now, &mut rand::thread_rng())
}

pub fn due_cards_with_rng<R: Rng + ?Sized>(
    deck: &ResolvedDeck,
    store: &ActivityStore,
    mode: PracticeMode,
    order: PracticeOrder,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<NormalizedCard> {
    let mut due: Vec<NormalizedCard> = deck
        .cards
        .iter()
        .filter(|card| match store.card_state(&card.id) {
            None => mode != PracticeMode::Review,
            Some(state) => mode != PracticeMode::New && state.is_due(now),
        })
        .filter_map(project)
        .collect();

    if order == PracticeOrder::Random {
        due.shuffle(rng);
    }
    due
}

/// Grade a card and durably record the result before returning it
pub fn grade(
    store: &mut ActivityStore,
    scheduler: &dyn Scheduler,
    card_id: &str,
    rating: Rating,
    now: DateTime<Utc>,
) -> Result<CardState> {
    let previous = store.card_state(card_id).cloned();
    let Scheduled { state, log } = scheduler.schedule(previous.as_ref(), rating, now);
    store.record_review(card_id, state.clone(), log)?;
    Ok(state)
}
