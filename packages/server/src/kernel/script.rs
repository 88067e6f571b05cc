//! MulmoScript document model, prompt construction and shape validation.
//!
//! The wire format is fixed by the external tool:
//!
//! ```json
//! {
//!   "$mulmocast": { "version": "1.0" },
//!   "title": "...",
//!   "lang": "en",
//!   "beats": [ { "text": "...", "imagePrompt": "..." } ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SCRIPT_VERSION: &str = "1.0";

/// The model sometimes returns structurally broken JSON despite the forced
/// JSON mode; that is a distinct failure from network or API errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("generated script is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulmoMeta {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Narration text for this beat.
    pub text: String,
    #[serde(rename = "imagePrompt")]
    pub image_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulmoScript {
    #[serde(rename = "$mulmocast")]
    pub mulmocast: MulmoMeta,
    pub title: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    pub beats: Vec<Beat>,
}

fn default_lang() -> String {
    "en".to_string()
}

pub const SYSTEM_PROMPT: &str = "You are an expert MulmoScript author. Always answer with valid \
    JSON only, with no explanations or extra text.";

/// Build the generation prompt for the given page text and visual style.
///
/// Only the first 2000 characters of the content are included; the page
/// extraction step has already truncated to 3000.
pub fn build_prompt(content: &str, style: &str) -> String {
    let content: String = content.chars().take(2000).collect();
    let style_description = if style == "ghibli" {
        "Ghibli-style animation"
    } else {
        "business presentation"
    };

    format!(
        r#"Based on the following content, generate a MulmoScript JSON document.

IMPORTANT: follow the required structure exactly. Do not add or rename fields.

[CONTENT]
{content}

[REQUIREMENTS]
1. Follow the structure below exactly
2. Produce 3-5 beats
3. Each beat's text should be 50-100 characters of narration
4. Each imagePrompt must be a concrete, visual description in {style_description} style

Required structure (nothing else will be accepted):

{{
  "$mulmocast": {{
    "version": "{SCRIPT_VERSION}"
  }},
  "title": "title here",
  "lang": "en",
  "beats": [
    {{
      "text": "narration text here",
      "imagePrompt": "image generation prompt here"
    }}
  ]
}}

Return only the JSON. No explanations or additional text."#
    )
}

/// Parse and validate an LLM response into a typed script.
///
/// Validates the two structural requirements the tool depends on — the
/// `$mulmocast` header and a non-empty `beats` array — before the full
/// typed deserialization.
pub fn parse_script(raw: &str) -> Result<MulmoScript, ScriptError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ScriptError::Malformed(format!("not valid JSON: {e}")))?;

    if value.get("$mulmocast").is_none() {
        return Err(ScriptError::Malformed("missing $mulmocast header".into()));
    }
    match value.get("beats").and_then(|b| b.as_array()) {
        Some(beats) if !beats.is_empty() => {}
        _ => return Err(ScriptError::Malformed("missing or empty beats array".into())),
    }

    serde_json::from_value(value).map_err(|e| ScriptError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "$mulmocast": {"version": "1.0"},
        "title": "A Story",
        "lang": "ja",
        "beats": [
            {"text": "Once upon a time", "imagePrompt": "a quiet village at dawn"}
        ]
    }"#;

    #[test]
    fn parses_a_valid_script() {
        let script = parse_script(VALID).unwrap();
        assert_eq!(script.title, "A Story");
        assert_eq!(script.lang, "ja");
        assert_eq!(script.beats.len(), 1);
        assert_eq!(script.beats[0].image_prompt, "a quiet village at dawn");
    }

    #[test]
    fn lang_defaults_to_english_when_absent() {
        let raw = r#"{
            "$mulmocast": {"version": "1.0"},
            "title": "t",
            "beats": [{"text": "x", "imagePrompt": "y"}]
        }"#;
        assert_eq!(parse_script(raw).unwrap().lang, "en");
    }

    #[test]
    fn rejects_missing_mulmocast_header() {
        let raw = r#"{"title": "t", "beats": [{"text": "x", "imagePrompt": "y"}]}"#;
        let err = parse_script(raw).unwrap_err();
        assert!(err.to_string().contains("$mulmocast"));
    }

    #[test]
    fn rejects_empty_beats() {
        let raw = r#"{"$mulmocast": {"version": "1.0"}, "title": "t", "beats": []}"#;
        let err = parse_script(raw).unwrap_err();
        assert!(err.to_string().contains("beats"));
    }

    #[test]
    fn rejects_non_json_output() {
        let err = parse_script("Sure! Here is your script: {...}").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn script_round_trips_with_external_field_names() {
        let script = parse_script(VALID).unwrap();
        let json = serde_json::to_value(&script).unwrap();
        assert!(json.get("$mulmocast").is_some());
        assert!(json["beats"][0].get("imagePrompt").is_some());
    }

    #[test]
    fn prompt_embeds_content_and_style() {
        let prompt = build_prompt("All about rustaceans", "ghibli");
        assert!(prompt.contains("All about rustaceans"));
        assert!(prompt.contains("Ghibli-style animation"));

        let prompt = build_prompt("quarterly numbers", "business");
        assert!(prompt.contains("business presentation"));
    }

    #[test]
    fn prompt_truncates_oversized_content() {
        let content = "x".repeat(5000);
        let prompt = build_prompt(&content, "ghibli");
        assert!(!prompt.contains(&"x".repeat(2001)));
    }
}
