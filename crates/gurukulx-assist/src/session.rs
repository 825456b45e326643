//! Teaching assistant conversation.
//!
//! Failures of a collaborator never abort a session. They surface as an
//! assistant message or as a [`Notice`] for the host to display.

use crate::config::AssistConfig;
use crate::error::AssistError;
use crate::protocol::{AssistMode, AssistRequest, SpeechAudio, SpeechRequest, VisionRequest};
use crate::service::{AudioSource, Collaborators, LocalSpeech};
use gurukulx_core::BoardSummary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI teaching assistant. I can help with lesson planning, content explanation, solving doubts, and analyzing your whiteboard content. How can I assist you today?";
pub const EMPTY_RESPONSE_MESSAGE: &str =
    "I'm sorry, I couldn't process your request right now. Please try again.";
pub const FAILURE_MESSAGE: &str =
    "I'm experiencing some technical difficulties. Please try again in a moment.";
pub const ANALYSIS_PREFIX: &str = "Whiteboard Analysis:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Toast-style message for the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            destructive: false,
        }
    }

    fn error(title: &str, description: &str) -> Self {
        Self {
            destructive: true,
            ..Self::info(title, description)
        }
    }
}

/// How a request to read text aloud was served.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    /// Audio from the speech service, ready to play.
    Audio(SpeechAudio),
    /// Spoken by the platform after the service failed.
    LocalFallback,
    /// Nothing was spoken.
    Failed,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub struct AssistantSession {
    collaborators: Collaborators,
    local_speech: Option<Arc<dyn LocalSpeech>>,
    mode: AssistMode,
    max_recording: Duration,
    messages: Vec<ChatMessage>,
    notices: Vec<Notice>,
}

impl AssistantSession {
    pub fn new(collaborators: Collaborators, config: &AssistConfig) -> Self {
        let mut session = Self {
            collaborators,
            local_speech: None,
            mode: config.default_mode,
            max_recording: config.max_recording(),
            messages: Vec::new(),
            notices: Vec::new(),
        };
        session.push_welcome();
        session
    }

    /// Platform speech used when the speech service fails.
    pub fn with_local_speech(mut self, speech: Arc<dyn LocalSpeech>) -> Self {
        self.local_speech = Some(speech);
        self
    }

    pub fn mode(&self) -> AssistMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AssistMode) {
        self.mode = mode;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand pending notices to the host.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn push_welcome(&mut self) {
        self.messages.push(ChatMessage {
            id: "welcome".to_string(),
            role: Role::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            timestamp: now_millis(),
        });
    }

    fn push(&mut self, role: Role, content: String) -> &ChatMessage {
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: now_millis(),
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Ask a question about the board. Blank input is ignored.
    ///
    /// Returns the assistant's reply.
    pub fn send(&mut self, input: &str, summary: &BoardSummary) -> Option<&ChatMessage> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        self.push(Role::User, message.to_string());

        let request = AssistRequest::new(message, summary.context_line(), self.mode);
        let reply = match self.collaborators.assist.ask(&request) {
            Ok(response) if !response.response.trim().is_empty() => response.response,
            Ok(_) => EMPTY_RESPONSE_MESSAGE.to_string(),
            Err(e) => {
                log::warn!("AI assist failed: {e}");
                FAILURE_MESSAGE.to_string()
            }
        };
        Some(self.push(Role::Assistant, reply))
    }

    /// Record a spoken question and transcribe it.
    ///
    /// The transcript is returned for the host to place in its input field;
    /// nothing is sent.
    pub fn transcribe(&mut self, source: &mut dyn AudioSource) -> Option<String> {
        self.notices
            .push(Notice::info("Recording Started", "Speak your question now..."));

        let audio = match source.record(self.max_recording) {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Microphone unavailable: {e}");
                self.notices
                    .push(Notice::error("Microphone Error", "Could not access microphone"));
                return None;
            }
        };

        match self.collaborators.stt.transcribe(&audio) {
            Ok(transcript) => Some(transcript.text),
            Err(e) => {
                log::warn!("Speech recognition failed: {e}");
                self.notices.push(Notice::error(
                    "Voice Recognition Error",
                    "Could not convert speech to text",
                ));
                None
            }
        }
    }

    /// Read `text` aloud, falling back to platform speech.
    pub fn speak(&mut self, text: &str) -> SpeechOutcome {
        let request = SpeechRequest::new(text);
        let err = match self.collaborators.tts.synthesize(&request) {
            Ok(audio) => return SpeechOutcome::Audio(audio),
            Err(e) => e,
        };
        log::warn!("Speech service failed, trying platform speech: {err}");

        let Some(local) = self.local_speech.as_ref() else {
            self.notices.push(Notice::error(
                "Speech Not Supported",
                "Text-to-speech is not supported in this browser",
            ));
            return SpeechOutcome::Failed;
        };

        match local.speak(text) {
            Ok(()) => SpeechOutcome::LocalFallback,
            Err(e) => {
                log::warn!("Platform speech failed: {e}");
                self.notices
                    .push(Notice::error("Speech Error", "Failed to generate speech"));
                SpeechOutcome::Failed
            }
        }
    }

    /// Ask the vision service about a board export.
    ///
    /// `image_url` is normally a PNG data URI of the committed board.
    pub fn analyze_board(
        &mut self,
        image_url: impl Into<String>,
        prompt: Option<String>,
    ) -> Option<&ChatMessage> {
        let request = VisionRequest::new(image_url, prompt);
        let result = self
            .collaborators
            .vision
            .analyze(&request)
            .and_then(|response| {
                if response.analysis.trim().is_empty() {
                    Err(AssistError::Decode("empty analysis".into()))
                } else {
                    Ok(response.analysis)
                }
            });

        match result {
            Ok(analysis) => Some(self.push(
                Role::Assistant,
                format!("{ANALYSIS_PREFIX}\n\n{analysis}"),
            )),
            Err(e) => {
                log::warn!("Board analysis failed: {e}");
                self.notices.push(Notice::error(
                    "Analysis Error",
                    "Could not analyze whiteboard content",
                ));
                None
            }
        }
    }

    /// Drop the conversation, keeping only the welcome message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.push_welcome();
        self.notices
            .push(Notice::info("Chat Cleared", "AI conversation history cleared"));
    }
}
