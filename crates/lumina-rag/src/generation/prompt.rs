//! Prompt templates for the soft-RAG chat flow
//!
//! "Soft" here means the retrieved excerpts are offered as factual support,
//! with citations encouraged, but the model is allowed to elaborate from
//! general knowledge rather than being strictly grounded.

use crate::index::RetrievedChunk;
use crate::types::ChatTurn;

use super::truncate_chars;

/// Maximum excerpts included in the context block
const MAX_CHUNKS: usize = 6;

/// Characters per excerpt snippet
const MAX_SNIPPET_CHARS: usize = 1500;

/// Conversation turns carried into the prompt
const MAX_HISTORY_TURNS: usize = 8;

const SYSTEM: &str = "\
You are Lumina, a helpful, conversational assistant specialized in helping users understand \
uploaded documents. Use any provided document excerpts for factual support and cite them inline \
as 'Source 1', 'Source 2', etc., when you rely on them. You may also use your general knowledge \
to elaborate, provide examples, or suggest follow-ups. If you are not sure about a fact, say so \
and indicate uncertainty.

Answer naturally in plain language first (a few paragraphs, lists, examples). After your natural-language \
answer, include a JSON object that summarizes the response in this exact shape:
{\"answer\": \"<short summary sentence>\", \"sources\": [\"Source 1: ...\", ...]}

Place the JSON either inside a fenced block ```json ... ``` or between the markers <<<JSON_START>>> and <<<JSON_END>>>. \
This makes it easier for the system to extract the JSON programmatically. Keep the JSON truthful to the explanation.";

/// Prompt builder for the chat endpoints
pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble the full /ask prompt: system + excerpts + history + question
    pub fn build_ask_prompt(
        question: &str,
        retrieved: &[RetrievedChunk],
        history: &[ChatTurn],
    ) -> String {
        let context_block = Self::build_context(retrieved);
        let history_block = Self::build_history(history);

        let mut sections = vec![SYSTEM.to_string(), context_block];
        if !history_block.is_empty() {
            sections.push(history_block);
        }
        sections.push(format!("QUESTION: {}\n\nANSWER:", question));

        sections.join("\n\n")
    }

    /// Numbered excerpt block, or an explicit "none found" note
    fn build_context(retrieved: &[RetrievedChunk]) -> String {
        if retrieved.is_empty() {
            return "DOCUMENT EXCERPTS: None found for this query.".to_string();
        }

        let excerpts: Vec<String> = retrieved
            .iter()
            .take(MAX_CHUNKS)
            .enumerate()
            .map(|(i, chunk)| {
                let snippet = truncate_chars(&chunk.content.replace('\n', " "), MAX_SNIPPET_CHARS);
                format!("Source {}:\n{}", i + 1, snippet.trim())
            })
            .collect();

        format!(
            "DOCUMENT EXCERPTS (numbered):\n\n{}",
            excerpts.join("\n\n---\n\n")
        )
    }

    /// Recent conversation turns as "[ROLE] content" lines
    fn build_history(history: &[ChatTurn]) -> String {
        if history.is_empty() {
            return String::new();
        }

        let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
        let lines: Vec<String> = recent
            .iter()
            .map(|turn| format!("[{}] {}", turn.role.as_label(), turn.content))
            .collect();

        format!("RECENT CONVERSATION HISTORY:\n{}", lines.join("\n"))
    }

    /// Prompt for the /greet endpoint
    pub fn greeting_prompt() -> &'static str {
        "Say hello and ask the user to upload a PDF so you can help answer questions about it. \
         Keep it short and friendly."
    }
}
