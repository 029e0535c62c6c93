//! Support chat: a persisted transcript and a keyword-matching assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::simulate::Simulator;
use crate::store::{keys, load_json, save_json, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// The transcript, stored as one array under `chat_history`.
pub struct ChatHistory<S> {
    store: S,
}

impl<S: KeyValueStore> ChatHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn messages(&self) -> Result<Vec<ChatMessage>> {
        Ok(load_json(&self.store, keys::CHAT_HISTORY)?.unwrap_or_default())
    }

    pub fn push(&self, message: ChatMessage) -> Result<()> {
        let mut messages = self.messages()?;
        messages.push(message);
        save_json(&self.store, keys::CHAT_HISTORY, &messages)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::CHAT_HISTORY)
    }
}

/// Keyword table, checked in order. First match wins.
const FAQ: &[(&[&str], &str)] = &[
    (
        &["ship", "delivery", "deliver"],
        "Orders ship within 2 business days. Shipping is free on orders over 50.",
    ),
    (
        &["return", "refund", "exchange"],
        "You can return any unused item within 30 days for a full refund.",
    ),
    (
        &["pay", "card", "paypal", "invoice"],
        "We accept all major cards and PayPal. Payment is taken when your order ships.",
    ),
    (
        &["flashcard", "deck", "study"],
        "Flashcard decks are free to browse. Open a deck to flip through its cards.",
    ),
];

const FALLBACK: &str =
    "Thanks for your message! A member of our team will get back to you shortly.";

pub struct ChatBot {
    simulator: Rc<Simulator>,
}

impl ChatBot {
    pub fn new(simulator: Rc<Simulator>) -> Self {
        Self { simulator }
    }

    /// The canned answer for `text`.
    pub fn answer_for(text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        FAQ.iter()
            .find(|(words, _)| words.iter().any(|w| lowered.contains(*w)))
            .map(|(_, answer)| *answer)
            .unwrap_or(FALLBACK)
    }

    /// Record `text`, wait the simulated latency, then record and return the reply.
    pub async fn reply<S: KeyValueStore>(
        &self,
        history: &ChatHistory<S>,
        text: &str,
    ) -> Result<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::validation("message", "is required"));
        }
        history.push(ChatMessage::new(ChatRole::User, text))?;

        self.simulator.simulate("chat").await?;

        let reply = ChatMessage::new(ChatRole::Assistant, Self::answer_for(text));
        debug!(chars = text.len(), "chat reply");
        history.push(reply.clone())?;
        Ok(reply)
    }
}
