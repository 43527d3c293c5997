use std::time::SystemTime;

use uuid::Uuid;

use crate::chat::ChatMessage;

const TITLE_MAX_CHARS: usize = 100;

/// A finished conversation as handed to the store.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatTranscript {
    pub id: Uuid,
    /// Display title derived from the conversation content.
    pub title: String,
    pub created_at: SystemTime,
    pub messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Builds a transcript from a frozen message list.
    ///
    /// The title is the leading portion of the final message's content.
    pub fn from_messages(id: Uuid, messages: Vec<ChatMessage>) -> Self {
        let title = messages
            .last()
            .map(|m| m.content.chars().take(TITLE_MAX_CHARS).collect())
            .unwrap_or_default();
        Self {
            id,
            title,
            created_at: SystemTime::now(),
            messages,
        }
    }
}

/// Keyed upsert store for finished chat transcripts.
///
/// Saving replaces an existing transcript with the same id in place and
/// appends otherwise, so insertion order is preserved. The store receives a
/// copy of the finished state; live conversations stay owned by their
/// session.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptStore {
    chats: Vec<ChatTranscript>,
}

impl TranscriptStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the transcript, replacing any existing one with the same id.
    pub fn save(&mut self, transcript: ChatTranscript) {
        match self.chats.iter_mut().find(|c| c.id == transcript.id) {
            Some(existing) => *existing = transcript,
            None => self.chats.push(transcript),
        }
    }

    /// Looks up a transcript by id.
    pub fn get(&self, id: Uuid) -> Option<&ChatTranscript> {
        self.chats.iter().find(|c| c.id == id)
    }

    /// Removes a transcript, returning it when present.
    pub fn remove(&mut self, id: Uuid) -> Option<ChatTranscript> {
        let idx = self.chats.iter().position(|c| c.id == id)?;
        Some(self.chats.remove(idx))
    }

    /// Removes all transcripts.
    pub fn clear(&mut self) {
        self.chats.clear();
    }

    /// All transcripts in insertion order.
    pub fn all(&self) -> &[ChatTranscript] {
        &self.chats
    }
}
