//! Request and response bodies for the `generateContent` endpoint.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GeminiError;

/// `{"contents":[{"parts":[{"text": ...}]}]}`
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    /// Single-turn request carrying one text part.
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

/// Subset of the response the tool reads. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate's first content part.
    pub fn into_text(self) -> Result<String, GeminiError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GeminiError::MalformedResponse("no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason;
        let content = candidate.content.ok_or_else(|| {
            GeminiError::MalformedResponse(format!(
                "first candidate has no content (finishReason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        content
            .parts
            .into_iter()
            .next()
            .and_then(|part| part.text)
            .ok_or_else(|| {
                GeminiError::MalformedResponse("first content part has no text".to_string())
            })
    }
}

/// Parse a response body and extract the generated text.
pub fn parse_generate_response(body: &str) -> Result<String, GeminiError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GeminiError::MalformedResponse(format!("invalid JSON: {}", e)))?;
    response.into_text()
}

static ENCLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(?:markdown|md)?[ \t]*\r?\n(.*?)\r?\n```$").expect("Invalid regex")
});

/// Remove a code fence that wraps the entire response.
///
/// Models sometimes return the document inside ```` ```markdown ```` even when
/// told not to. Fences inside the document are left alone. A stripped
/// document gets a single trailing newline.
pub fn strip_enclosing_fence(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();
    match ENCLOSING_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) if !inner.as_str().contains("\n```") => {
            Cow::Owned(format!("{}\n", inner.as_str()))
        }
        _ => Cow::Borrowed(text),
    }
}
