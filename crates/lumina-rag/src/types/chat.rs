//! Chat turn types and the /ask request shape

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Uppercase label used when rendering history into a prompt
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
        }
    }
}

/// A single turn of conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke
    pub role: Role,
    /// What they said
    pub content: String,
}

impl ChatTurn {
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

/// Request body for POST /ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,
    /// Recent conversation turns, oldest first (optional)
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_defaults_to_empty() {
        let request: AskRequest =
            serde_json::from_str(r#"{"question": "What is chapter 2 about?"}"#).expect("valid");
        assert!(request.history.is_empty());
    }

    #[test]
    fn roles_round_trip_lowercase() {
        let turn: ChatTurn =
            serde_json::from_str(r#"{"role": "assistant", "content": "Hello"}"#).expect("valid");
        assert_eq!(turn.role, Role::Assistant);

        let json = serde_json::to_string(&ChatTurn::user("hi")).expect("serialize");
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn labels_are_uppercase() {
        assert_eq!(Role::User.as_label(), "USER");
        assert_eq!(Role::Assistant.as_label(), "ASSISTANT");
    }
}
