//! Collaborator interfaces.
//!
//! Every call blocks until the collaborator answers or fails. Async hosts
//! should run them on a blocking thread.

use crate::config::AssistConfig;
use crate::error::AssistResult;
use crate::http::HttpCollaborator;
use crate::mock::MockCollaborator;
use crate::protocol::{
    AssistRequest, AssistResponse, SpeechAudio, SpeechRequest, Transcript, VisionRequest,
    VisionResponse,
};
use std::sync::Arc;
use std::time::Duration;

/// Question answering about the board.
pub trait AssistService: Send + Sync {
    fn ask(&self, request: &AssistRequest) -> AssistResult<AssistResponse>;
}

/// Speech recognition.
pub trait SpeechToText: Send + Sync {
    fn transcribe(&self, audio: &[u8]) -> AssistResult<Transcript>;
}

/// Speech synthesis.
pub trait TextToSpeech: Send + Sync {
    fn synthesize(&self, request: &SpeechRequest) -> AssistResult<SpeechAudio>;
}

/// Image analysis of a board export.
pub trait VisionService: Send + Sync {
    fn analyze(&self, request: &VisionRequest) -> AssistResult<VisionResponse>;
}

/// Speech synthesis provided by the host platform, used when the remote
/// service fails.
pub trait LocalSpeech: Send + Sync {
    fn speak(&self, text: &str) -> AssistResult<()>;
}

/// Microphone capture.
pub trait AudioSource: Send {
    /// Record until the speaker stops or `max` elapses.
    fn record(&mut self, max: Duration) -> AssistResult<Vec<u8>>;
}

/// The remote collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub assist: Arc<dyn AssistService>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub vision: Arc<dyn VisionService>,
}

impl Collaborators {
    /// Use one implementation for every collaborator.
    pub fn uniform<T>(collaborator: T) -> Self
    where
        T: AssistService + SpeechToText + TextToSpeech + VisionService + 'static,
    {
        let shared = Arc::new(collaborator);
        Self {
            assist: shared.clone(),
            stt: shared.clone(),
            tts: shared.clone(),
            vision: shared,
        }
    }

    /// Canned local collaborators.
    pub fn mock(config: &AssistConfig) -> Self {
        Self::uniform(MockCollaborator::new(config.mock_delay()))
    }

    /// Collaborators behind the whiteboard HTTP API.
    pub fn http(config: &AssistConfig) -> AssistResult<Self> {
        Ok(Self::uniform(HttpCollaborator::new(config)?))
    }
}
