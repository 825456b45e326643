//! Request and response bodies exchanged with the collaborators.
//!
//! All bodies are JSON except speech audio, which travels as raw bytes.

use crate::error::{AssistError, AssistResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest text accepted for speech synthesis, in characters.
pub const MAX_TTS_CHARS: usize = 5000;

/// Prompt used when a vision request carries none.
pub const DEFAULT_VISION_PROMPT: &str =
    "Analyze this whiteboard content and provide educational insights.";

/// Flavor of help requested from the AI-assist service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistMode {
    #[default]
    General,
    LessonSuggestion,
    ContentHelp,
    DoubtSolving,
    FormulaRecognition,
}

impl AssistMode {
    pub const ALL: [AssistMode; 5] = [
        AssistMode::General,
        AssistMode::LessonSuggestion,
        AssistMode::ContentHelp,
        AssistMode::DoubtSolving,
        AssistMode::FormulaRecognition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistMode::General => "general",
            AssistMode::LessonSuggestion => "lesson_suggestion",
            AssistMode::ContentHelp => "content_help",
            AssistMode::DoubtSolving => "doubt_solving",
            AssistMode::FormulaRecognition => "formula_recognition",
        }
    }
}

impl fmt::Display for AssistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistMode {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssistMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| AssistError::InvalidRequest(format!("unknown assist mode {s:?}")))
    }
}

/// AI-assist request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistRequest {
    #[serde(default)]
    pub message: String,
    /// Free-text description of the board.
    #[serde(default)]
    pub context: String,
    #[serde(default, alias = "type")]
    pub mode: AssistMode,
}

impl AssistRequest {
    pub fn new(message: impl Into<String>, context: impl Into<String>, mode: AssistMode) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
            mode,
        }
    }

    pub fn validate(&self) -> AssistResult<()> {
        if self.message.trim().is_empty() {
            return Err(AssistError::InvalidRequest("Message is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistResponse {
    /// May be empty when the service had nothing to say.
    #[serde(default)]
    pub response: String,
}

/// Speech-to-text result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

/// Text-to-speech request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    pub fn validate(&self) -> AssistResult<()> {
        if self.text.trim().is_empty() {
            return Err(AssistError::InvalidRequest(
                "Text is required and must be a string".into(),
            ));
        }
        if self.text.chars().count() > MAX_TTS_CHARS {
            return Err(AssistError::InvalidRequest(
                "Text is too long for TTS. Maximum 5,000 characters allowed.".into(),
            ));
        }
        Ok(())
    }
}

/// Synthesized speech.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Vision analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionRequest {
    /// Usually a `data:image/png;base64,...` URI.
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl VisionRequest {
    pub fn new(image_url: impl Into<String>, prompt: Option<String>) -> Self {
        Self {
            image_url: image_url.into(),
            prompt,
        }
    }

    pub fn validate(&self) -> AssistResult<()> {
        if self.image_url.trim().is_empty() {
            return Err(AssistError::InvalidRequest("Image URL is required".into()));
        }
        Ok(())
    }

    pub fn effective_prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_VISION_PROMPT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionResponse {
    pub analysis: String,
}

/// Error body returned by the HTTP endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
