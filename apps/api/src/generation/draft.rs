//! Draft parsing: coerces free-form model output into a `BlogDraft`.
//!
//! Order: strip outer code fences → parse → on failure one repair pass
//! (trim to the outermost braces, drop trailing commas) → parse again.
//! There is never a second repair. Field values are only rewritten to
//! default absent or mistyped ones and to keep commas out of tags.

use serde_json::Value;
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::post::{clean_tag, DEFAULT_READING_TIME};

#[derive(Debug, Error)]
pub enum DraftParseError {
    #[error("no JSON object found in model response")]
    NoJsonObject,

    #[error("invalid JSON after repair: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model response is not a JSON object")]
    NotAnObject,

    #[error("model response has no usable title")]
    MissingTitle,
}

/// Model-generated post content, before slug, date, author and image are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub reading_time: u32,
    /// Comma-separated keywords for the stock-image selector, if the model gave any.
    pub image_keywords: Option<String>,
}

pub fn parse_draft(raw: &str) -> Result<BlogDraft, DraftParseError> {
    let text = strip_json_fences(raw);

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(first_error) => {
            tracing::warn!("Model response is not valid JSON ({first_error}), attempting repair");
            let repaired = repair_json(text).ok_or(DraftParseError::NoJsonObject)?;
            serde_json::from_str(&repaired)?
        }
    };

    draft_from_value(&value)
}

fn draft_from_value(value: &Value) -> Result<BlogDraft, DraftParseError> {
    let object = value.as_object().ok_or(DraftParseError::NotAnObject)?;

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(DraftParseError::MissingTitle)?
        .to_string();

    let text_field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(BlogDraft {
        title,
        excerpt: text_field("excerpt"),
        content: text_field("content"),
        tags: object.get("tags").map(coerce_tags).unwrap_or_default(),
        reading_time: object
            .get("readingTime")
            .and_then(coerce_reading_time)
            .unwrap_or(DEFAULT_READING_TIME),
        image_keywords: object
            .get("suggestedImageKeywords")
            .and_then(coerce_keywords),
    })
}

fn coerce_tags(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(clean_tag)
            .filter(|t| !t.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Numbers and numeric strings are accepted; zero, negatives and anything else are not.
fn coerce_reading_time(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if minutes.is_finite() && minutes >= 1.0 && minutes <= u32::MAX as f64 {
        Some(minutes.round() as u32)
    } else {
        None
    }
}

fn coerce_keywords(value: &Value) -> Option<String> {
    let joined = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Trims to the first `{` .. last `}` and removes trailing commas.
fn repair_json(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(remove_trailing_commas(&text[start..=end]))
}

/// Drops commas whose next non-whitespace char is `}` or `]`, ignoring string literals.
fn remove_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r###"{
        "title": "Mastering TypeScript Advanced Types",
        "excerpt": "Conditional and mapped types, demystified.",
        "content": "## Intro\n\nTypes are great.\n\n```ts\ntype A = B extends C ? D : E;\n```",
        "tags": ["TypeScript", "Types", "JavaScript"],
        "readingTime": 7,
        "suggestedImageKeywords": "typescript, code editor, laptop"
    }"###;

    #[test]
    fn test_parses_well_formed_response() {
        let draft = parse_draft(WELL_FORMED).unwrap();
        assert_eq!(draft.title, "Mastering TypeScript Advanced Types");
        assert_eq!(draft.tags, vec!["TypeScript", "Types", "JavaScript"]);
        assert_eq!(draft.reading_time, 7);
        assert_eq!(
            draft.image_keywords.as_deref(),
            Some("typescript, code editor, laptop")
        );
        assert!(draft.content.contains("```ts"));
    }

    #[test]
    fn test_parses_fenced_response() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        assert_eq!(parse_draft(&fenced).unwrap(), parse_draft(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_repairs_leading_prose_and_trailing_commas() {
        let messy = r#"Sure! Here is your post:
        {
            "title": "Docker for Web Developers",
            "tags": ["docker", "devops",],
            "readingTime": 6,
        }
        Let me know if you need anything else."#;
        let draft = parse_draft(messy).unwrap();
        assert_eq!(draft.title, "Docker for Web Developers");
        assert_eq!(draft.tags, vec!["docker", "devops"]);
        assert_eq!(draft.reading_time, 6);
    }

    #[test]
    fn test_repair_keeps_commas_inside_strings() {
        let messy = r#"Output: {"title": "Lists, arrays, and sets", "excerpt": "a ,}", }"#;
        let draft = parse_draft(messy).unwrap();
        assert_eq!(draft.title, "Lists, arrays, and sets");
        assert_eq!(draft.excerpt, "a ,}");
    }

    #[test]
    fn test_unrecoverable_response_is_error() {
        assert!(matches!(
            parse_draft("I cannot help with that."),
            Err(DraftParseError::NoJsonObject)
        ));
        assert!(matches!(
            parse_draft(r#"{"title": "Unclosed "#),
            Err(DraftParseError::NoJsonObject)
        ));
        assert!(matches!(
            parse_draft(r#"prefix {"title": oops} suffix"#),
            Err(DraftParseError::Json(_))
        ));
    }

    #[test]
    fn test_missing_title_is_error() {
        assert!(matches!(
            parse_draft(r#"{"excerpt": "no title"}"#),
            Err(DraftParseError::MissingTitle)
        ));
        assert!(matches!(
            parse_draft(r#"{"title": "   "}"#),
            Err(DraftParseError::MissingTitle)
        ));
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(matches!(
            parse_draft(r#"["title"]"#),
            Err(DraftParseError::NotAnObject)
        ));
    }

    #[test]
    fn test_reading_time_defaults_and_coercion() {
        let cases = [
            (r#"{"title": "T"}"#, 8),
            (r#"{"title": "T", "readingTime": "9"}"#, 9),
            (r#"{"title": "T", "readingTime": "nine"}"#, 8),
            (r#"{"title": "T", "readingTime": 6.6}"#, 7),
            (r#"{"title": "T", "readingTime": -3}"#, 8),
            (r#"{"title": "T", "readingTime": null}"#, 8),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_draft(input).unwrap().reading_time, expected, "{input}");
        }
    }

    #[test]
    fn test_absent_fields_default_to_empty() {
        let draft = parse_draft(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(draft.excerpt, "");
        assert_eq!(draft.content, "");
        assert!(draft.tags.is_empty());
        assert!(draft.image_keywords.is_none());
    }

    #[test]
    fn test_commas_inside_tag_items_are_removed() {
        let draft = parse_draft(r#"{"title": "T", "tags": ["CI, CD", "  Rust ", ","]}"#).unwrap();
        assert_eq!(draft.tags, vec!["CI CD", "Rust"]);
    }

    #[test]
    fn test_keywords_accept_array() {
        let draft =
            parse_draft(r#"{"title": "T", "suggestedImageKeywords": ["code", "laptop"]}"#).unwrap();
        assert_eq!(draft.image_keywords.as_deref(), Some("code, laptop"));
    }

    #[test]
    fn test_remove_trailing_commas_handles_escaped_quotes() {
        let input = r#"{"a": "say \"hi\",", "b": [1, 2, ], }"#;
        assert_eq!(
            remove_trailing_commas(input),
            r#"{"a": "say \"hi\",", "b": [1, 2 ] }"#
        );
    }
}
