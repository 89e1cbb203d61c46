//! Practice-ready view of a card
//!
//! A card is eligible for practice only if it has a multiple-choice question
//! or at least one answer block on its definition side.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::models::{Card, ContentBlock, ContentFormat, MultipleChoice, RichText, SideRole};

/// A card flattened into question, answer and quiz parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCard {
    pub id: String,
    pub question: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Vec<ContentBlock>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuizOption>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub correct: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_format: Option<ContentFormat>,
}

/// One selectable answer of a quiz card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub content: String,
    pub format: ContentFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl NormalizedCard {
    pub fn is_quiz(&self) -> bool {
        self.options.as_ref().map_or(false, |o| !o.is_empty())
    }

    /// More than one option must be picked
    pub fn is_multi_select(&self) -> bool {
        self.correct.len() > 1
    }

    /// Check a selection against the correct set.
    ///
    /// Multi-select cards need exactly the correct set; single-answer cards
    /// look at the first selected id only.
    pub fn is_answer_correct(&self, selected: &[String]) -> bool {
        if self.is_multi_select() {
            let picked: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
            return selected.len() == self.correct.len()
                && picked.len() == self.correct.len()
                && self.correct.iter().all(|id| picked.contains(id.as_str()));
        }
        selected
            .first()
            .map_or(false, |id| self.correct.contains(id))
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Project a card for practice; `None` when the card has no term side or
/// nothing to answer
pub fn project(card: &Card) -> Option<NormalizedCard> {
    let term = card.side(&SideRole::Term)?;
    let mut question = Vec::new();
    let mut multiple_choice: Option<&MultipleChoice> = None;

    for block in &term.content {
        match block {
            ContentBlock::Text(_)
            | ContentBlock::Markdown(_)
            | ContentBlock::Html(_)
            | ContentBlock::Audio(_) => question.push(block.clone()),
            ContentBlock::MultipleChoice(mc) => {
                if multiple_choice.is_none() {
                    multiple_choice = Some(mc);
                }
            }
            ContentBlock::Unsupported => {}
        }
    }

    let answer: Vec<ContentBlock> = card
        .side(&SideRole::Definition)
        .map(|side| {
            side.content
                .iter()
                .filter(|block| block.format().is_some())
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    if multiple_choice.is_none() && answer.is_empty() {
        return None;
    }

    let mc_hint = multiple_choice
        .and_then(|mc| mc.hint.as_ref())
        .and_then(|h| non_empty(h.text()));
    let card_hint = card.hint.as_ref().and_then(|h| non_empty(h.text()));

    let explanation = multiple_choice.and_then(|mc| mc.explanation.as_ref());

    Some(NormalizedCard {
        id: card.id.clone(),
        question,
        answer: if answer.is_empty() { None } else { Some(answer) },
        options: multiple_choice.map(|mc| mc.options.iter().map(quiz_option).collect()),
        correct: multiple_choice
            .map(|mc| mc.correct.ids().into_iter().map(str::to_string).collect())
            .unwrap_or_default(),
        hint: mc_hint.or(card_hint),
        explanation: explanation.and_then(|e| non_empty(e.text())),
        explanation_format: explanation
            .filter(|e| !e.text().is_empty())
            .map(RichText::format),
    })
}

/// Project every eligible card, keeping deck order
pub fn project_all(cards: &[Card]) -> Vec<NormalizedCard> {
    cards.iter().filter_map(project).collect()
}

fn quiz_option(option: &super::models::ChoiceOption) -> QuizOption {
    QuizOption {
        id: option.id.clone(),
        content: option.content.text().to_string(),
        format: option.content.format(),
        description: option.description.as_ref().map(|d| d.text().to_string()),
        hint: option.hint.as_ref().map(|h| h.text().to_string()),
    }
}
