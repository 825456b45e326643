//! Local stand-ins for the collaborators.
//!
//! Answers are canned and arrive after a fixed delay, which is enough to
//! drive the assistant and the HTTP server without any remote service.

use crate::error::{AssistError, AssistResult};
use crate::protocol::{
    AssistMode, AssistRequest, AssistResponse, SpeechAudio, SpeechRequest, Transcript,
    VisionRequest, VisionResponse,
};
use crate::service::{
    AssistService, AudioSource, LocalSpeech, SpeechToText, TextToSpeech, VisionService,
};
use std::sync::Mutex;
use std::time::Duration;

const SAMPLE_RATE: u32 = 16_000;
const TONE_HZ: f32 = 440.0;

/// How the mock answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    #[default]
    Answer,
    /// Succeeds with empty content.
    Silent,
    /// Every call fails as if the service were down.
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct MockCollaborator {
    delay: Duration,
    behavior: MockBehavior,
}

impl MockCollaborator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            behavior: MockBehavior::Answer,
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn failing() -> Self {
        Self::default().with_behavior(MockBehavior::Fail)
    }

    fn wait(&self) -> AssistResult<()> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        match self.behavior {
            MockBehavior::Fail => Err(AssistError::Connection("mock service unavailable".into())),
            _ => Ok(()),
        }
    }

    fn silent(&self) -> bool {
        self.behavior == MockBehavior::Silent
    }
}

fn canned_answer(request: &AssistRequest) -> String {
    let question = request.message.trim();
    let body = match request.mode {
        AssistMode::General => format!(
            "Here is a quick take on \"{question}\": break it into smaller ideas and tie each one to something already on the board."
        ),
        AssistMode::LessonSuggestion => format!(
            "Lesson idea for \"{question}\": open with a short warm-up question, work one example on the board, then let students try two on their own."
        ),
        AssistMode::ContentHelp => format!(
            "In simple terms, \"{question}\" is easiest to explain with a diagram. Sketch the main parts first and label them before adding detail."
        ),
        AssistMode::DoubtSolving => format!(
            "Let's solve \"{question}\" step by step.\n1. Write down what is given.\n2. Identify what is asked.\n3. Pick the rule that links them and apply it."
        ),
        AssistMode::FormulaRecognition => format!(
            "For \"{question}\", write the formula on the board, name every symbol, then substitute the known values one at a time."
        ),
    };
    if request.context.trim().is_empty() {
        body
    } else {
        format!("{body}\n\n({})", request.context.trim())
    }
}

/// Mono 16-bit PCM WAV tone whose length follows the word count.
pub fn tone_wav(text: &str) -> Vec<u8> {
    let words = text.split_whitespace().count().clamp(1, 40) as u32;
    let samples = SAMPLE_RATE / 8 * words;
    let data_len = samples * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());

    for n in 0..samples {
        let t = n as f32 / SAMPLE_RATE as f32;
        let sample = (t * TONE_HZ * std::f32::consts::TAU).sin() * 0.3 * i16::MAX as f32;
        wav.extend_from_slice(&(sample as i16).to_le_bytes());
    }
    wav
}

impl AssistService for MockCollaborator {
    fn ask(&self, request: &AssistRequest) -> AssistResult<AssistResponse> {
        request.validate()?;
        self.wait()?;
        let response = if self.silent() {
            String::new()
        } else {
            canned_answer(request)
        };
        Ok(AssistResponse { response })
    }
}

impl SpeechToText for MockCollaborator {
    fn transcribe(&self, audio: &[u8]) -> AssistResult<Transcript> {
        if audio.is_empty() {
            return Err(AssistError::InvalidRequest("Audio file is required".into()));
        }
        self.wait()?;
        let text = if self.silent() {
            String::new()
        } else {
            "Can you explain the Pythagorean theorem?".to_string()
        };
        Ok(Transcript { text })
    }
}

impl TextToSpeech for MockCollaborator {
    fn synthesize(&self, request: &SpeechRequest) -> AssistResult<SpeechAudio> {
        request.validate()?;
        self.wait()?;
        Ok(SpeechAudio {
            bytes: tone_wav(&request.text),
            content_type: "audio/wav".to_string(),
        })
    }
}

impl VisionService for MockCollaborator {
    fn analyze(&self, request: &VisionRequest) -> AssistResult<VisionResponse> {
        request.validate()?;
        self.wait()?;
        let analysis = if self.silent() {
            String::new()
        } else {
            format!(
                "{}\n\nThe board shows handwritten notes. Consider adding a short heading to each region and summarizing the key idea at the end.",
                request.effective_prompt()
            )
        };
        Ok(VisionResponse { analysis })
    }
}

/// Platform speech that records what it was asked to say.
#[derive(Debug, Default)]
pub struct MockLocalSpeech {
    fail: bool,
    spoken: Mutex<Vec<String>>,
}

impl MockLocalSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken
            .lock()
            .map(|spoken| spoken.clone())
            .unwrap_or_default()
    }
}

impl LocalSpeech for MockLocalSpeech {
    fn speak(&self, text: &str) -> AssistResult<()> {
        if self.fail {
            return Err(AssistError::Unsupported("speech synthesis failed".into()));
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        Ok(())
    }
}

/// Microphone that either hands back fixed audio or denies access.
#[derive(Debug, Clone, Default)]
pub struct MockAudioSource {
    audio: Option<Vec<u8>>,
    last_limit: Option<Duration>,
}

impl MockAudioSource {
    pub fn granted(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            last_limit: None,
        }
    }

    pub fn denied() -> Self {
        Self::default()
    }

    /// Limit passed to the most recent recording.
    pub fn last_limit(&self) -> Option<Duration> {
        self.last_limit
    }
}

impl AudioSource for MockAudioSource {
    fn record(&mut self, max: Duration) -> AssistResult<Vec<u8>> {
        self.last_limit = Some(max);
        self.audio
            .clone()
            .ok_or_else(|| AssistError::PermissionDenied("microphone access denied".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_mentions_question_and_context() {
        let mock = MockCollaborator::default();
        let request = AssistRequest::new(
            "photosynthesis",
            "Current whiteboard has 2 strokes",
            AssistMode::ContentHelp,
        );
        let answer = mock.ask(&request).unwrap().response;
        assert!(answer.contains("photosynthesis"));
        assert!(answer.contains("Current whiteboard has 2 strokes"));
    }

    #[test]
    fn test_failing_mock() {
        let mock = MockCollaborator::failing();
        let err = mock
            .ask(&AssistRequest::new("hi", "", AssistMode::General))
            .unwrap_err();
        assert!(matches!(err, AssistError::Connection(_)));
        assert!(mock.synthesize(&SpeechRequest::new("hi")).is_err());
    }

    #[test]
    fn test_tone_wav_header() {
        let wav = tone_wav("one two three");
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_len, SAMPLE_RATE / 8 * 3 * 2);
        assert_eq!(wav.len(), 44 + data_len as usize);
    }

    #[test]
    fn test_audio_source_denied() {
        let mut mic = MockAudioSource::denied();
        let err = mic.record(Duration::from_secs(30)).unwrap_err();
        assert!(matches!(err, AssistError::PermissionDenied(_)));
        assert_eq!(mic.last_limit(), Some(Duration::from_secs(30)));
    }
}
