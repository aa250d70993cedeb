//! Prompt assembly, model invocation, and reply parsing

pub mod extract;
pub mod ollama;
pub mod prompt;

pub use extract::{answer_text, extract_cited_sources, extract_json_span, resolve_sources, JsonSpan};
pub use ollama::{GenerateOptions, OllamaClient};
pub use prompt::PromptBuilder;

/// Truncate a string to at most `max` characters (not bytes)
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 120), "short");
        assert_eq!(truncate_chars("", 10), "");
    }
}
