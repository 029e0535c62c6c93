use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_opt, require_text, Entity, Validate};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardDeck {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FlashcardDeck {
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlashcardDeckDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cards: Vec<Flashcard>,
}

fn validate_cards(cards: &[Flashcard]) -> Result<()> {
    if cards
        .iter()
        .any(|c| c.front.trim().is_empty() || c.back.trim().is_empty())
    {
        return Err(StoreError::validation(
            "cards",
            "every card needs a front and a back",
        ));
    }
    Ok(())
}

impl Validate for FlashcardDeckDraft {
    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("category", &self.category)?;
        validate_cards(&self.cards)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlashcardDeckPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cards: Option<Vec<Flashcard>>,
}

impl Validate for FlashcardDeckPatch {
    fn validate(&self) -> Result<()> {
        check_opt(&self.title, |v| require_text("title", v))?;
        check_opt(&self.category, |v| require_text("category", v))?;
        check_opt(&self.cards, |v| validate_cards(v))
    }
}

impl Entity for FlashcardDeck {
    type Draft = FlashcardDeckDraft;
    type Patch = FlashcardDeckPatch;

    const COLLECTION: &'static str = "flashcards";

    fn id(&self) -> u64 {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn from_draft(id: u64, draft: FlashcardDeckDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            cards: draft.cards,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: FlashcardDeckPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(cards) = patch.cards {
            self.cards = cards;
        }
        self.updated_at = now;
    }
}
