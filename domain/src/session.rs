//! Conversation session entities.
//!
//! A turn is one user message plus one assistant reply. History is bounded:
//! the newest [`ConversationHistory::cap`] turns are retained and older
//! turns are evicted FIFO. Messages are never mutated after append; the
//! whole history is discarded when the model is switched.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Default number of retained turns.
const DEFAULT_TURN_CAP: usize = 20;

/// Bounded conversation history, newest turns retained.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    /// Flat message list, always alternating user/assistant per turn
    messages: Vec<Message>,
    /// Maximum number of turns (user+assistant pairs) to retain
    cap: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_CAP)
    }
}

impl ConversationHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            messages: Vec::new(),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Append one completed exchange. Evicts the oldest turn beyond the cap.
    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::assistant(assistant));

        while self.turn_count() > self.cap {
            // One turn is two messages, evicted front-first.
            self.messages.drain(..2);
        }
    }

    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    /// Retained messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop everything (used when the model is switched).
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::assistant("hello").role, Role::Assistant);
        assert_eq!(Message::system("rules").role, Role::System);
    }

    #[test]
    fn test_push_turn_appends_pair() {
        let mut history = ConversationHistory::default();
        history.push_turn("question", "answer");

        assert_eq!(history.turn_count(), 1);
        assert_eq!(history.messages().len(), 2);
        assert_eq!(history.messages()[0].role, Role::User);
        assert_eq!(history.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_eviction_beyond_cap() {
        let mut history = ConversationHistory::new(20);
        for i in 0..21 {
            history.push_turn(format!("u{}", i), format!("a{}", i));
        }

        assert_eq!(history.turn_count(), 20);
        // Oldest turn (u0/a0) is gone; order of the rest preserved.
        assert_eq!(history.messages()[0].content, "u1");
        assert_eq!(history.messages()[1].content, "a1");
        assert_eq!(history.messages().last().unwrap().content, "a20");
    }

    #[test]
    fn test_small_cap() {
        let mut history = ConversationHistory::new(2);
        history.push_turn("u1", "a1");
        history.push_turn("u2", "a2");
        history.push_turn("u3", "a3");

        assert_eq!(history.turn_count(), 2);
        assert_eq!(history.messages()[0].content, "u2");
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::default();
        history.push_turn("u", "a");
        history.clear();
        assert!(history.is_empty());
    }
}
