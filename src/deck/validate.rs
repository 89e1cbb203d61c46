//! Structural validation of deck documents

use super::errors::{DeckError, Result};
use super::models::Deck;

/// Check the minimal deck invariants, reporting every problem found
pub fn validate_deck(deck: &Deck) -> Result<()> {
    let mut problems = Vec::new();

    if deck.id.trim().is_empty() {
        problems.push("missing deck id".to_string());
    }
    if deck.version.trim().is_empty() {
        problems.push("missing deck version".to_string());
    }
    if deck.name.trim().is_empty() {
        problems.push("missing deck name".to_string());
    }

    // Empty decks are only allowed when they inherit cards
    if deck.cards.is_empty() && deck.extends.is_empty() {
        problems.push("deck has no cards and extends nothing".to_string());
    }

    for (index, card) in deck.cards.iter().enumerate() {
        if card.id.trim().is_empty() {
            problems.push(format!("card #{} has no id", index));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DeckError::Validation(problems))
    }
}

/// Parse and validate a deck document
pub fn parse_deck(text: &str) -> Result<Deck> {
    let deck = Deck::from_json(text)?;
    validate_deck(&deck)?;
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_deck() {
        let deck = parse_deck(
            r#"{ "id": "d", "version": "1", "name": "Deck",
                 "cards": [{ "id": "c1", "sides": [] }] }"#,
        );
        assert!(deck.is_ok());
    }

    #[test]
    fn test_missing_metadata_is_reported() {
        let err = parse_deck(r#"{ "cards": [{ "id": "c1", "sides": [] }] }"#).unwrap_err();
        match err {
            DeckError::Validation(problems) => {
                assert_eq!(problems.len(), 3);
                assert!(problems[0].contains("id"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_cards_allowed_only_with_extensions() {
        let err = parse_deck(r#"{ "id": "d", "version": "1", "name": "Deck", "cards": [] }"#);
        assert!(matches!(err, Err(DeckError::Validation(_))));

        let ok = parse_deck(
            r#"{ "id": "d", "version": "1", "name": "Deck", "extends": ["./base.json"] }"#,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_card_without_id() {
        let err = parse_deck(
            r#"{ "id": "d", "version": "1", "name": "Deck", "cards": [{ "sides": [] }] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("card #0 has no id"));
    }

    #[test]
    fn test_untyped_rich_text_objects_parse() {
        let deck = parse_deck(
            r#"{ "id": "d", "version": "1", "name": "Deck", "cards": [{
                "id": "c1", "hint": { "inline": "think" },
                "sides": [{ "type": "term", "content": [{
                    "type": "multiple-choice",
                    "options": [{ "id": "a", "content": { "inline": "Paris" } }],
                    "correct": "a",
                    "explanation": { "inline": "It is the capital" }
                }] }]
            }] }"#,
        );
        assert!(deck.is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_deck("{ not json"), Err(DeckError::Parse(_))));
    }
}
