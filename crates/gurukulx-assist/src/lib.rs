//! GurukulX Assist Library
//!
//! External collaborators of the whiteboard (AI assist, speech recognition,
//! speech synthesis, vision) and the teaching assistant session built on
//! top of them.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod protocol;
pub mod service;
pub mod session;

pub use config::AssistConfig;
pub use error::{AssistError, AssistResult};
pub use http::HttpCollaborator;
pub use mock::{MockAudioSource, MockBehavior, MockCollaborator, MockLocalSpeech};
pub use protocol::{
    AssistMode, AssistRequest, AssistResponse, DEFAULT_VISION_PROMPT, ErrorBody, MAX_TTS_CHARS,
    SpeechAudio, SpeechRequest, Transcript, VisionRequest, VisionResponse,
};
pub use service::{
    AssistService, AudioSource, Collaborators, LocalSpeech, SpeechToText, TextToSpeech,
    VisionService,
};
pub use session::{AssistantSession, ChatMessage, Notice, Role, SpeechOutcome};
