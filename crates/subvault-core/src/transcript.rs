//! Transcript request and provider payload types.
//!
//! Provider responses are passed through to the caller untouched; the structs here
//! document the two shapes the provider returns and are used by tests and clients.

use serde::{Deserialize, Deserializer, Serialize};

/// Language requested when the caller does not specify one.
pub const DEFAULT_LANG: &str = "en";

/// A transcript request for a single video.
///
/// A `null` field reads the same as a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptQuery {
    /// Video URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Preferred transcript language.
    #[serde(default = "default_lang", deserialize_with = "lang_or_default")]
    pub lang: String,
    /// Ask the provider for one text blob instead of timed segments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: bool,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lang_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|lang| !lang.trim().is_empty())
        .unwrap_or_else(default_lang))
}

impl TranscriptQuery {
    /// Build a query for timed segments in the default language.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lang: default_lang(),
            text: false,
        }
    }
}

/// A timed transcript segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Spoken text.
    pub text: String,
    /// Start offset in milliseconds.
    pub offset: f64,
    /// Duration in milliseconds.
    pub duration: f64,
    /// Language of the segment.
    pub lang: String,
}

/// Plain-text transcript returned when `text=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptText {
    /// Full transcript text.
    pub content: String,
    /// Detected language.
    pub lang: String,
    /// Other languages the video has transcripts in.
    #[serde(default)]
    pub available_langs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults() {
        let query: TranscriptQuery =
            serde_json::from_str(r#"{"url":"https://youtu.be/abc"}"#).unwrap();
        assert_eq!(query, TranscriptQuery::new("https://youtu.be/abc"));
        assert_eq!(query.lang, "en");
        assert!(!query.text);
    }

    #[test]
    fn null_fields_read_as_missing() {
        let query: TranscriptQuery =
            serde_json::from_str(r#"{"url":null,"lang":null,"text":null}"#).unwrap();
        assert_eq!(query, TranscriptQuery::new(""));

        let query: TranscriptQuery = serde_json::from_str(r#"{"url":"u","lang":""}"#).unwrap();
        assert_eq!(query.lang, DEFAULT_LANG);
    }

    #[test]
    fn non_string_url_is_rejected() {
        assert!(serde_json::from_str::<TranscriptQuery>(r#"{"url":123}"#).is_err());
    }

    #[test]
    fn segment_payload() {
        let segments: Vec<TranscriptSegment> = serde_json::from_value(serde_json::json!([
            { "text": "hello", "offset": 0, "duration": 1250.5, "lang": "en" },
            { "text": "world", "offset": 1250.5, "duration": 900, "lang": "en" }
        ]))
        .unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "world");
        assert!((segments[1].offset - 1250.5).abs() < f64::EPSILON);
    }

    #[test]
    fn text_payload_uses_camel_case() {
        let payload: TranscriptText = serde_json::from_value(serde_json::json!({
            "content": "hello world",
            "lang": "en",
            "availableLangs": ["en", "fr"]
        }))
        .unwrap();
        assert_eq!(payload.available_langs, vec!["en", "fr"]);
    }
}
