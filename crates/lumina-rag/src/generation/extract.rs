//! Best-effort parsing of the model's mixed natural-language/JSON reply
//!
//! The prompt asks the model to append a JSON summary after its prose answer,
//! delimited by explicit markers or a fenced ```json block. Models comply
//! unevenly, so extraction tries markers, then a fence, then generic brace
//! matching, and the caller degrades gracefully when all three fail.

use regex::Regex;
use serde_json::Value;

use crate::index::RetrievedChunk;

use super::truncate_chars;

const JSON_START_MARKER: &str = "<<<JSON_START>>>";
const JSON_END_MARKER: &str = "<<<JSON_END>>>";

/// Source snippets are clipped to this many characters
const MAX_SOURCE_CHARS: usize = 120;

/// Retrieved chunks used as informal sources when the reply cites nothing
const MAX_FALLBACK_SOURCES: usize = 5;

/// A parsed JSON object and the byte span it occupies in the reply
///
/// The span starts at the delimiter (marker or fence) when one was used, so
/// slicing the reply at `start` yields clean prose with no dangling marker.
#[derive(Debug, Clone)]
pub struct JsonSpan {
    pub value: Value,
    pub start: usize,
    pub end: usize,
}

/// Locate the first parseable JSON object in free text.
///
/// Tried in order: explicit markers, fenced ```json block, generic brace
/// matching from the first `{`. Returns `None` when nothing parses.
pub fn extract_json_span(text: &str) -> Option<JsonSpan> {
    if let Some(span) = extract_between_markers(text) {
        return Some(span);
    }
    if let Some(span) = extract_from_fence(text) {
        return Some(span);
    }
    extract_by_brace_matching(text)
}

fn extract_between_markers(text: &str) -> Option<JsonSpan> {
    let marker_start = text.find(JSON_START_MARKER)?;
    let content_start = marker_start + JSON_START_MARKER.len();
    let content_end = content_start + text[content_start..].find(JSON_END_MARKER)?;

    let candidate = text[content_start..content_end].trim();
    let value: Value = serde_json::from_str(candidate).ok()?;

    Some(JsonSpan {
        value,
        start: marker_start,
        end: content_end + JSON_END_MARKER.len(),
    })
}

fn extract_from_fence(text: &str) -> Option<JsonSpan> {
    let fence = Regex::new(r"(?i)```json\s*(\{[\s\S]*?\})\s*```").expect("valid regex");
    let captures = fence.captures(text)?;
    let whole = captures.get(0)?;
    let inner = captures.get(1)?;

    let value: Value = serde_json::from_str(inner.as_str()).ok()?;

    Some(JsonSpan {
        value,
        start: whole.start(),
        end: whole.end(),
    })
}

/// Walk from the first `{`, counting brace depth, and try to parse the
/// balanced slice. Braces inside JSON strings can fool the counter; this is
/// deliberately best-effort.
fn extract_by_brace_matching(text: &str) -> Option<JsonSpan> {
    let first = text.find('{')?;

    let mut depth = 0i32;
    let mut end = None;
    for (i, ch) in text[first..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(first + i + ch.len_utf8());
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end?;
    let value: Value = serde_json::from_str(&text[first..end]).ok()?;

    Some(JsonSpan {
        value,
        start: first,
        end,
    })
}

/// Pull "Source N: ..." snippets out of free text, clipped to 120 characters
pub fn extract_cited_sources(text: &str) -> Vec<String> {
    let pattern = Regex::new(r"(?i)Source\s*\d+\s*[:\-]\s*([^\n\r]+)").expect("valid regex");

    pattern
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| truncate_chars(m.as_str().trim(), MAX_SOURCE_CHARS))
        .collect()
}

/// Decide the `sources` array for the response.
///
/// With a structured JSON object, its `sources` field wins (even when empty,
/// matching the model's own accounting). Without one, fall back to "Source N"
/// snippets cited in the prose, then to the leading text of the retrieved
/// chunks themselves.
pub fn resolve_sources(
    structured: Option<&Value>,
    raw: &str,
    retrieved: &[RetrievedChunk],
) -> Vec<String> {
    if let Some(value) = structured {
        return match value.get("sources") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|s| match s {
                    Value::String(text) => truncate_chars(text, MAX_SOURCE_CHARS),
                    other => truncate_chars(&other.to_string(), MAX_SOURCE_CHARS),
                })
                .collect(),
            _ => Vec::new(),
        };
    }

    let cited = extract_cited_sources(raw);
    if !cited.is_empty() {
        return cited;
    }

    retrieved
        .iter()
        .take(MAX_FALLBACK_SOURCES)
        .enumerate()
        .map(|(i, chunk)| {
            let snippet = truncate_chars(chunk.content.replace('\n', " ").trim(), MAX_SOURCE_CHARS);
            format!("Source {}: {}", i + 1, snippet)
        })
        .collect()
}

/// Pick the natural-language answer to render.
///
/// Prefer the prose before the JSON span; fall back to the JSON's own
/// `answer` field; with no JSON at all, the whole reply is the answer.
pub fn answer_text(raw: &str, span: Option<&JsonSpan>) -> String {
    match span {
        Some(span) => {
            let prose = raw[..span.start].trim();
            if !prose.is_empty() {
                return prose.to_string();
            }
            span.value
                .get("answer")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        }
        None => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retrieved(contents: &[&str]) -> Vec<RetrievedChunk> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| RetrievedChunk {
                index: i as u32,
                content: c.to_string(),
                score: 0.9,
            })
            .collect()
    }

    #[test]
    fn markers_are_preferred() {
        let text = "The answer is simple.\n<<<JSON_START>>>{\"answer\": \"simple\"}<<<JSON_END>>>";
        let span = extract_json_span(text).expect("span");
        assert_eq!(span.value["answer"], "simple");
        // Span starts at the marker, so the prose split is clean
        assert_eq!(text[..span.start].trim(), "The answer is simple.");
        assert_eq!(span.end, text.len());
    }

    #[test]
    fn fenced_json_block_is_found() {
        let text = "Here you go.\n```json\n{\"answer\": \"fenced\", \"sources\": []}\n```\nthanks";
        let span = extract_json_span(text).expect("span");
        assert_eq!(span.value["answer"], "fenced");
        assert_eq!(text[..span.start].trim(), "Here you go.");
        assert_eq!(&text[span.end..], "\nthanks");
    }

    #[test]
    fn bare_object_is_found_by_brace_matching() {
        let text = "Prose first. {\"answer\": \"bare\", \"nested\": {\"a\": 1}} trailing";
        let span = extract_json_span(text).expect("span");
        assert_eq!(span.value["nested"]["a"], 1);
        assert_eq!(text[..span.start].trim(), "Prose first.");
    }

    #[test]
    fn unparseable_braces_yield_nothing() {
        assert!(extract_json_span("plain prose, no json at all").is_none());
        assert!(extract_json_span("{not valid json}").is_none());
        assert!(extract_json_span("unbalanced {\"a\": 1").is_none());
    }

    #[test]
    fn invalid_json_between_markers_falls_through() {
        // Markers wrap garbage; brace matching then finds the same slice and
        // also fails to parse it.
        let text = "<<<JSON_START>>>{oops}<<<JSON_END>>>";
        assert!(extract_json_span(text).is_none());
    }

    #[test]
    fn cited_sources_match_case_insensitively() {
        let text = "See Source 1: the intro section\nand SOURCE 2 - the appendix";
        let sources = extract_cited_sources(text);
        assert_eq!(sources, vec!["the intro section", "the appendix"]);
    }

    #[test]
    fn cited_sources_are_clipped_to_120_chars() {
        let text = format!("Source 1: {}", "a".repeat(300));
        let sources = extract_cited_sources(&text);
        assert_eq!(sources[0].chars().count(), 120);
    }

    #[test]
    fn structured_sources_win() {
        let value: Value =
            serde_json::from_str(r#"{"answer": "x", "sources": ["Source 1: intro"]}"#).unwrap();
        let sources = resolve_sources(Some(&value), "Source 9: ignored", &retrieved(&["chunk"]));
        assert_eq!(sources, vec!["Source 1: intro"]);
    }

    #[test]
    fn structured_non_array_sources_yield_empty() {
        let value: Value = serde_json::from_str(r#"{"sources": "not a list"}"#).unwrap();
        assert!(resolve_sources(Some(&value), "Source 1: x", &retrieved(&["c"])).is_empty());
    }

    #[test]
    fn prose_citations_beat_chunk_fallback() {
        let sources = resolve_sources(None, "As Source 1: page two says", &retrieved(&["chunk"]));
        assert_eq!(sources, vec!["page two says"]);
    }

    #[test]
    fn chunk_fallback_labels_and_clips() {
        let long = "word ".repeat(100);
        let chunks = retrieved(&[long.as_str(), "second chunk", "c3", "c4", "c5", "c6", "c7"]);
        let sources = resolve_sources(None, "no citations here", &chunks);

        assert_eq!(sources.len(), MAX_FALLBACK_SOURCES);
        assert!(sources[0].starts_with("Source 1: word word"));
        assert!(sources[0].chars().count() <= MAX_SOURCE_CHARS + "Source 1: ".len());
        assert_eq!(sources[1], "Source 2: second chunk");
    }

    #[test]
    fn no_sources_at_all_is_empty() {
        assert!(resolve_sources(None, "nothing cited", &[]).is_empty());
    }

    #[test]
    fn answer_prefers_prose_before_json() {
        let raw = "The real answer.\n{\"answer\": \"summary\"}";
        let span = extract_json_span(raw);
        assert_eq!(answer_text(raw, span.as_ref()), "The real answer.");
    }

    #[test]
    fn answer_falls_back_to_json_answer_field() {
        let raw = "{\"answer\": \"only the summary\"}";
        let span = extract_json_span(raw);
        assert_eq!(answer_text(raw, span.as_ref()), "only the summary");
    }

    #[test]
    fn answer_without_json_is_the_whole_reply() {
        assert_eq!(answer_text("  plain reply  ", None), "plain reply");
    }

    #[test]
    fn answer_with_json_but_no_answer_field_is_empty() {
        let raw = "{\"sources\": []}";
        let span = extract_json_span(raw);
        assert_eq!(answer_text(raw, span.as_ref()), "");
    }
}
