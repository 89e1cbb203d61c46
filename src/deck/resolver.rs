//! Flattening decks that extend other decks
//!
//! Cards contributed by extensions come first, in declaration order, followed
//! by the deck's own cards. A card id keeps the position where it was first
//! seen; later definitions under the same id replace its content.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::{DeckError, Result};
use super::fetch::DeckFetcher;
use super::location::Location;
use super::models::{Card, Deck, DeckSettings};
use super::validate::{parse_deck, validate_deck};

/// Maximum number of nested extension levels followed
pub const MAX_EXTENSION_DEPTH: usize = 16;

/// A deck with all extensions merged in. Metadata always comes from the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDeck {
    pub id: String,
    pub version: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<DeckSettings>,
    pub cards: Vec<Card>,
}

impl ResolvedDeck {
    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }
}

/// Resolve a parsed root deck loaded from `origin`.
///
/// Broken extensions are logged and skipped; only an invalid root fails.
pub fn resolve(root: Deck, origin: &Location, fetcher: &dyn DeckFetcher) -> Result<ResolvedDeck> {
    validate_deck(&root)?;

    let Deck {
        id,
        version,
        name,
        description,
        author,
        cards,
        extends,
        settings,
    } = root;

    let mut chain = vec![origin.clone()];
    let inherited = inherited_cards(&extends, origin, fetcher, &mut chain);

    Ok(ResolvedDeck {
        id,
        version,
        name,
        description,
        author,
        settings,
        cards: merge_cards(inherited, cards),
    })
}

/// Fetch, parse and resolve the deck at `location`
pub fn resolve_location(location: &Location, fetcher: &dyn DeckFetcher) -> Result<ResolvedDeck> {
    let text = fetcher.fetch(location)?;
    let root = parse_deck(&text)?;
    resolve(root, location, fetcher)
}

/// Merge card sequences by id, keeping first-seen positions
pub fn merge_cards(inherited: Vec<Card>, own: Vec<Card>) -> Vec<Card> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Card> = Vec::with_capacity(inherited.len() + own.len());

    for card in inherited.into_iter().chain(own) {
        match positions.get(&card.id) {
            Some(&pos) => merged[pos] = card,
            None => {
                positions.insert(card.id.clone(), merged.len());
                merged.push(card);
            }
        }
    }

    merged
}

fn inherited_cards(
    extends: &[String],
    origin: &Location,
    fetcher: &dyn DeckFetcher,
    chain: &mut Vec<Location>,
) -> Vec<Card> {
    let mut cards = Vec::new();
    for reference in extends {
        match load_extension(reference, origin, fetcher, chain) {
            Ok(extension_cards) => cards.extend(extension_cards),
            Err(e) => {
                log::warn!("Skipping extension '{}' of {}: {}", reference, origin, e);
            }
        }
    }
    cards
}

fn load_extension(
    reference: &str,
    origin: &Location,
    fetcher: &dyn DeckFetcher,
    chain: &mut Vec<Location>,
) -> Result<Vec<Card>> {
    let location = origin.join(reference)?;

    if chain.contains(&location) {
        return Err(DeckError::Cycle(location.to_string()));
    }
    if chain.len() >= MAX_EXTENSION_DEPTH {
        return Err(DeckError::TooDeep(location.to_string()));
    }

    let text = fetcher.fetch(&location)?;
    let parent = parse_deck(&text)?;

    chain.push(location.clone());
    let inherited = inherited_cards(&parent.extends, &location, fetcher, chain);
    chain.pop();

    Ok(merge_cards(inherited, parent.cards))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::errors::FetchError;
    use std::path::PathBuf;

    /// Serves documents from memory, keyed by location
    struct MemoryFetcher {
        documents: HashMap<Location, String>,
    }

    impl MemoryFetcher {
        fn new(documents: &[(&str, String)]) -> Self {
            Self {
                documents: documents
                    .iter()
                    .map(|(path, text)| (Location::File(PathBuf::from(path)), text.clone()))
                    .collect(),
            }
        }
    }

    impl DeckFetcher for MemoryFetcher {
        fn fetch(&self, location: &Location) -> std::result::Result<String, FetchError> {
            self.documents.get(location).cloned().ok_or_else(|| {
                FetchError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    location.to_string(),
                ))
            })
        }
    }

    fn card_json(id: &str, answer: &str) -> String {
        format!(
            r#"{{ "id": "{}", "sides": [
                {{ "type": "term", "content": [{{ "type": "text", "inline": "{}?" }}] }},
                {{ "type": "definition", "content": [{{ "type": "text", "inline": "{}" }}] }}
            ] }}"#,
            id, id, answer
        )
    }

    fn deck_json(id: &str, extends: &[&str], cards: &[(&str, &str)]) -> String {
        let extends: Vec<String> = extends.iter().map(|e| format!("\"{}\"", e)).collect();
        let cards: Vec<String> = cards.iter().map(|(id, a)| card_json(id, a)).collect();
        format!(
            r#"{{ "id": "{}", "version": "1.0", "name": "{} deck",
                 "extends": [{}], "cards": [{}] }}"#,
            id,
            id,
            extends.join(","),
            cards.join(",")
        )
    }

    fn answer_of(card: &Card) -> &str {
        card.sides[1].content[0].text().unwrap()
    }

    fn ids(deck: &ResolvedDeck) -> Vec<&str> {
        deck.cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_no_extensions_is_identity() {
        let root = Deck::from_json(&deck_json("d", &[], &[("b", "1"), ("a", "2"), ("c", "3")]))
            .unwrap();
        let fetcher = MemoryFetcher::new(&[]);

        let resolved = resolve(root.clone(), &Location::parse("/d.json").unwrap(), &fetcher).unwrap();
        assert_eq!(resolved.cards, root.cards);
        assert_eq!(resolved.name, "d deck");
    }

    #[test]
    fn test_child_overrides_parent_in_place() {
        let fetcher = MemoryFetcher::new(&[
            ("/decks/p1.json", deck_json("p1", &[], &[("x", "parent"), ("y", "p1")])),
            ("/decks/p2.json", deck_json("p2", &[], &[("z", "p2")])),
        ]);
        let root = Deck::from_json(&deck_json(
            "child",
            &["./p1.json", "p2.json"],
            &[("w", "child"), ("x", "child")],
        ))
        .unwrap();

        let resolved =
            resolve(root, &Location::parse("/decks/child.json").unwrap(), &fetcher).unwrap();

        assert_eq!(ids(&resolved), vec!["x", "y", "z", "w"]);
        assert_eq!(answer_of(&resolved.cards[0]), "child");
        assert_eq!(resolved.id, "child");
    }

    #[test]
    fn test_nested_extensions_resolve_against_their_own_location() {
        let fetcher = MemoryFetcher::new(&[
            ("/decks/lang/base.json", deck_json("base", &["../core/core.json"], &[("b", "base")])),
            ("/decks/core/core.json", deck_json("core", &[], &[("c", "core"), ("b", "core")])),
        ]);
        let root = Deck::from_json(&deck_json("top", &["./lang/base.json"], &[("t", "top")])).unwrap();

        let resolved = resolve(root, &Location::parse("/decks/top.json").unwrap(), &fetcher).unwrap();

        assert_eq!(ids(&resolved), vec!["c", "b", "t"]);
        assert_eq!(answer_of(&resolved.cards[1]), "base");
    }

    #[test]
    fn test_broken_extensions_are_skipped() {
        let fetcher = MemoryFetcher::new(&[
            ("/d/invalid.json", r#"{ "id": "", "cards": [] }"#.to_string()),
            ("/d/garbage.json", "not json".to_string()),
            ("/d/good.json", deck_json("good", &[], &[("g", "good")])),
        ]);
        let root = Deck::from_json(&deck_json(
            "root",
            &["missing.json", "invalid.json", "garbage.json", "good.json"],
            &[("r", "root")],
        ))
        .unwrap();

        let resolved = resolve(root, &Location::parse("/d/root.json").unwrap(), &fetcher).unwrap();
        assert_eq!(ids(&resolved), vec!["g", "r"]);
    }

    #[test]
    fn test_cyclic_extensions_terminate() {
        let fetcher = MemoryFetcher::new(&[
            ("/d/a.json", deck_json("a", &["b.json"], &[("a1", "a")])),
            ("/d/b.json", deck_json("b", &["a.json"], &[("b1", "b")])),
        ]);
        let location = Location::parse("/d/a.json").unwrap();

        let resolved = resolve_location(&location, &fetcher).unwrap();
        assert_eq!(ids(&resolved), vec!["b1", "a1"]);
    }

    #[test]
    fn test_invalid_root_fails() {
        let root = Deck::from_json(r#"{ "id": "x", "version": "1", "name": "x" }"#).unwrap();
        let fetcher = MemoryFetcher::new(&[]);
        let result = resolve(root, &Location::parse("/x.json").unwrap(), &fetcher);
        assert!(matches!(result, Err(DeckError::Validation(_))));
    }

    #[test]
    fn test_root_with_only_extensions() {
        let fetcher = MemoryFetcher::new(&[("/d/base.json", deck_json("base", &[], &[("a", "1")]))]);
        let root = Deck::from_json(&deck_json("empty", &["base.json"], &[])).unwrap();

        let resolved = resolve(root, &Location::parse("/d/empty.json").unwrap(), &fetcher).unwrap();
        assert_eq!(ids(&resolved), vec!["a"]);
        assert_eq!(resolved.id, "empty");
    }
}
