//! Conversation Store — ordered, append-only log of turns.
//!
//! The log is never edited, only appended. Silent turns (automatic
//! follow-ups) stay in the history handed to the transport but are filtered
//! from the rendered view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::llm_client::{HistoryTurn, TurnRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    Text,
    Action,
    Result,
    Voice,
}

/// One turn in the conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub kind: TurnKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        role: Role,
        kind: TurnKind,
        text: impl Into<String>,
        visible: bool,
    ) -> &ConversationTurn {
        self.append_with_payload(role, kind, text, visible, None)
    }

    pub fn append_with_payload(
        &mut self,
        role: Role,
        kind: TurnKind,
        text: impl Into<String>,
        visible: bool,
        payload: Option<Value>,
    ) -> &ConversationTurn {
        self.turns.push(ConversationTurn {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            kind,
            payload,
            timestamp: Utc::now(),
            visible,
        });
        self.turns.last().expect("just pushed")
    }

    /// All turns, in append order. Includes silent ones.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Turns the chat view renders.
    pub fn visible(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().filter(|t| t.visible)
    }

    /// The full prior log, role-mapped for the transport: assistant turns
    /// become the model role, user and system turns the user role.
    pub fn history(&self) -> Vec<HistoryTurn> {
        self.turns
            .iter()
            .map(|turn| HistoryTurn {
                role: match turn.role {
                    Role::Assistant => TurnRole::Model,
                    Role::User | Role::System => TurnRole::User,
                },
                text: turn.text.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
