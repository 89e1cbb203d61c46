//! Per-deck spaced-repetition activity
//!
//! This module provides:
//! - Card state and review log models with timestamp hydration
//! - A deck-scoped store backed by a sibling `.review.json` file

pub mod models;
pub mod store;

pub use models::*;
pub use store::{activity_path_for, ActivityError, ActivityStore, ConflictPolicy, ACTIVITY_SUFFIX};
