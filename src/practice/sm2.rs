//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! optimal review intervals based on user performance.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! The algorithm's bookkeeping lives in the card state's payload under
//! `interval`, `easeFactor`, `reviewCount`, `correctCount` and `status`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Rating, Scheduled, Scheduler};
use crate::activity::{CardState, ReviewLog};

/// Minimum ease factor allowed
const MIN_EASE_FACTOR: f32 = 1.3;

const DEFAULT_EASE_FACTOR: f32 = 2.5;

/// Longest interval ever scheduled, in days
pub const MAX_INTERVAL_DAYS: i32 = 36_500;

/// Status of a card in the spaced repetition system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    #[default]
    New,
    /// In initial learning phase
    Learning,
    /// Regular spaced review
    Review,
    /// Failed and re-learning
    Relearning,
}

/// SM-2 fields kept in a card state's payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sm2Fields {
    /// Current interval in days
    #[serde(default)]
    pub interval: i32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub correct_count: i32,
    #[serde(default)]
    pub status: CardStatus,
}

fn default_ease_factor() -> f32 {
    DEFAULT_EASE_FACTOR
}

impl Default for Sm2Fields {
    fn default() -> Self {
        Self {
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
            correct_count: 0,
            status: CardStatus::New,
        }
    }
}

impl Sm2Fields {
    /// Read the SM-2 fields from a state, falling back to a fresh card
    pub fn from_state(state: &CardState) -> Self {
        serde_json::from_value(Value::Object(state.fields.clone())).unwrap_or_default()
    }

    fn write_into(&self, state: &mut CardState) {
        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            state.fields.extend(map);
        }
    }
}

/// Result of calculating the next review
#[derive(Debug, Clone)]
pub struct ReviewResult {
    pub interval: i32,
    pub ease_factor: f32,
    pub due_date: DateTime<Utc>,
    pub status: CardStatus,
}

/// Calculate the next review interval and ease factor using SM-2 algorithm
///
/// # Arguments
/// * `fields` - Current SM-2 bookkeeping for the card
/// * `quality` - Quality rating (0-5)
/// * `now` - Time of the review
///
/// # Returns
/// ReviewResult with new interval, ease factor, due date, and status
pub fn calculate_next_review(fields: &Sm2Fields, quality: i32, now: DateTime<Utc>) -> ReviewResult {
    let quality = quality.clamp(0, 5);

    let mut ease_factor = fields.ease_factor;
    let interval;
    let status;

    if quality >= 3 {
        match fields.review_count {
            0 => {
                interval = 1;
                status = CardStatus::Learning;
            }
            1 => {
                interval = 6;
                status = CardStatus::Review;
            }
            _ => {
                let next = (f64::from(fields.interval) * f64::from(ease_factor)).round();
                interval = next.clamp(1.0, f64::from(MAX_INTERVAL_DAYS)) as i32;
                status = CardStatus::Review;
            }
        }

        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        ease_factor += 0.1 - (5 - quality) as f32 * (0.08 + (5 - quality) as f32 * 0.02);
        ease_factor = ease_factor.max(MIN_EASE_FACTOR);
    } else {
        // Incorrect response - reset to learning
        interval = 1;
        ease_factor = (ease_factor - 0.2).max(MIN_EASE_FACTOR);

        status = if fields.status == CardStatus::Review {
            CardStatus::Relearning
        } else {
            CardStatus::Learning
        };
    }

    ReviewResult {
        interval,
        ease_factor,
        due_date: now
            .checked_add_signed(Duration::days(i64::from(interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        status,
    }
}

/// Map UI rating (Again, Hard, Good, Easy) to SM-2 quality (0-5)
pub fn rating_to_quality(rating: Rating) -> i32 {
    match rating {
        Rating::Again => 1,
        Rating::Hard => 3,
        Rating::Good => 4,
        Rating::Easy => 5,
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

/// Scheduler backed by SM-2
#[derive(Debug, Clone, Copy, Default)]
pub struct Sm2Scheduler;

impl Scheduler for Sm2Scheduler {
    fn schedule(&self, previous: Option<&CardState>, rating: Rating, now: DateTime<Utc>) -> Scheduled {
        let fields = previous.map(Sm2Fields::from_state).unwrap_or_default();
        let quality = rating_to_quality(rating);
        let result = calculate_next_review(&fields, quality, now);

        let next = Sm2Fields {
            interval: result.interval,
            ease_factor: result.ease_factor,
            review_count: fields.review_count + 1,
            correct_count: fields.correct_count + i32::from(quality >= 3),
            status: result.status,
        };

        let mut state = previous.cloned().unwrap_or_default();
        state.fields.remove("due");
        state.fields.remove("last_review");
        state.due = Some(result.due_date);
        state.last_review = Some(now);
        next.write_into(&mut state);

        let mut log = ReviewLog::new(now, result.due_date);
        log.set_field("rating", u8::from(rating));
        log.set_field("quality", quality);
        log.set_field("interval", result.interval);
        log.set_field("easeFactor", f64::from(result.ease_factor));

        Scheduled { state, log }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_review_correct() {
        let result = calculate_next_review(&Sm2Fields::default(), 4, now());

        assert_eq!(result.interval, 1);
        assert_eq!(result.status, CardStatus::Learning);
        assert_eq!(result.due_date, now() + Duration::days(1));
    }

    #[test]
    fn test_second_review_correct() {
        let fields = Sm2Fields {
            review_count: 1,
            interval: 1,
            ..Default::default()
        };

        let result = calculate_next_review(&fields, 4, now());

        assert_eq!(result.interval, 6);
        assert_eq!(result.status, CardStatus::Review);
    }

    #[test]
    fn test_subsequent_review_correct() {
        let fields = Sm2Fields {
            review_count: 5,
            interval: 10,
            ease_factor: 2.5,
            ..Default::default()
        };

        let result = calculate_next_review(&fields, 4, now());

        // 10 * 2.5 = 25
        assert_eq!(result.interval, 25);
    }

    #[test]
    fn test_huge_stored_interval_is_clamped() {
        let fields = Sm2Fields {
            review_count: 5,
            interval: 2_000_000_000,
            ease_factor: 2.5,
            ..Default::default()
        };

        let result = calculate_next_review(&fields, 4, now());
        assert_eq!(result.interval, MAX_INTERVAL_DAYS);
        assert_eq!(result.due_date, now() + Duration::days(i64::from(MAX_INTERVAL_DAYS)));

        let negative = calculate_next_review(&Sm2Fields { interval: -40, ..fields }, 4, now());
        assert_eq!(negative.interval, 1);
    }

    #[test]
    fn test_review_incorrect_resets() {
        let fields = Sm2Fields {
            review_count: 5,
            interval: 30,
            status: CardStatus::Review,
            ..Default::default()
        };

        let result = calculate_next_review(&fields, 1, now());

        assert_eq!(result.interval, 1);
        assert_eq!(result.status, CardStatus::Relearning);
    }

    #[test]
    fn test_ease_factor_minimum() {
        let fields = Sm2Fields {
            ease_factor: 1.4,
            review_count: 5,
            interval: 10,
            ..Default::default()
        };

        let result = calculate_next_review(&fields, 1, now());
        assert!(result.ease_factor >= MIN_EASE_FACTOR);

        let again = calculate_next_review(
            &Sm2Fields {
                ease_factor: result.ease_factor,
                ..fields
            },
            1,
            now(),
        );
        assert!(again.ease_factor >= MIN_EASE_FACTOR);
    }

    #[test]
    fn test_scheduler_keeps_foreign_payload() {
        let mut previous = CardState::new(now(), None);
        previous.set_field("stability", 3.0);

        let scheduled = Sm2Scheduler.schedule(Some(&previous), Rating::Good, now());
        let state = scheduled.state;

        assert_eq!(state.field("stability"), Some(&Value::from(3.0)));
        assert_eq!(state.last_review, Some(now()));

        let fields = Sm2Fields::from_state(&state);
        assert_eq!(fields.review_count, 1);
        assert_eq!(fields.correct_count, 1);
        assert_eq!(fields.status, CardStatus::Learning);

        assert_eq!(scheduled.log.review, Some(now()));
        assert_eq!(scheduled.log.due, state.due);
        assert_eq!(scheduled.log.field("rating"), Some(&Value::from(3u8)));
    }

    #[test]
    fn test_scheduler_progression() {
        let first = Sm2Scheduler.schedule(None, Rating::Good, now()).state;
        let second = Sm2Scheduler.schedule(Some(&first), Rating::Good, now()).state;
        let failed = Sm2Scheduler.schedule(Some(&second), Rating::Again, now()).state;

        assert_eq!(Sm2Fields::from_state(&second).interval, 6);
        assert_eq!(Sm2Fields::from_state(&failed).status, CardStatus::Relearning);
        assert_eq!(Sm2Fields::from_state(&failed).correct_count, 2);
        assert_eq!(failed.due, Some(now() + Duration::days(1)));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
