//! Collaborator endpoints under `/api/whiteboard/`.
//!
//! | Route        | Body                                   | Success            |
//! |--------------|----------------------------------------|--------------------|
//! | `ai-assist`  | `{ "message", "context", "type" }`     | `{ "response" }`   |
//! | `stt`        | raw audio bytes                        | `{ "text" }`       |
//! | `tts`        | `{ "text", "language" }`               | `audio/wav` bytes  |
//! | `vision`     | `{ "imageUrl", "prompt" }`             | `{ "analysis" }`   |
//!
//! Validation failures answer 400 and collaborator failures 500, both with
//! an `{ "error" }` body.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dashmap::DashMap;
use gurukulx_assist::{
    AssistError, AssistRequest, Collaborators, ErrorBody, SpeechAudio, SpeechRequest,
    VisionRequest,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, warn};

/// How long synthesized speech is reused for identical requests.
pub const TTS_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

struct CachedAudio {
    audio: SpeechAudio,
    created: Instant,
}

/// Shared application state
pub struct AppState {
    collaborators: Collaborators,
    tts_cache: DashMap<String, CachedAudio>,
    tts_ttl: Duration,
}

impl AppState {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            tts_cache: DashMap::new(),
            tts_ttl: TTS_CACHE_TTL,
        }
    }

    fn cached_audio(&self, key: &str) -> Option<SpeechAudio> {
        let hit = self
            .tts_cache
            .get(key)
            .filter(|entry| entry.created.elapsed() < self.tts_ttl)
            .map(|entry| entry.audio.clone());
        if hit.is_none() {
            self.tts_cache.remove(key);
        }
        hit
    }

    fn cache_audio(&self, key: String, audio: SpeechAudio) {
        self.tts_cache.retain(|_, entry| entry.created.elapsed() < self.tts_ttl);
        self.tts_cache.insert(
            key,
            CachedAudio {
                audio,
                created: Instant::now(),
            },
        );
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/whiteboard/ai-assist", post(ai_assist))
        .route("/api/whiteboard/stt", post(stt))
        .route("/api/whiteboard/tts", post(tts))
        .route("/api/whiteboard/vision", post(vision))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "GurukulX Whiteboard API - POST to /api/whiteboard/{ai-assist,stt,tts,vision}"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, ErrorBody::new(message))
}

fn rejected(err: AssistError) -> Response {
    match err {
        AssistError::InvalidRequest(message) => bad_request(&message),
        other => bad_request(&other.to_string()),
    }
}

/// Parse a JSON body, answering 400 with `missing` when it is unusable.
fn parse_body<T: DeserializeOwned>(body: &Bytes, missing: &str) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected body: {}", e);
        bad_request(missing)
    })
}

/// Run a blocking collaborator call off the async runtime.
async fn run_blocking<T, F>(call: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AssistError> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("worker panicked: {e}")),
    }
}

async fn ai_assist(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: AssistRequest = match parse_body(&body, "Message is required") {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(e) = request.validate() {
        return rejected(e);
    }

    let assist = state.collaborators.assist.clone();
    match run_blocking(move || assist.ask(&request)).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!("AI assist error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to process AI request"),
            )
        }
    }
}

async fn stt(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    if body.is_empty() {
        return bad_request("Audio file is required");
    }

    let recognizer = state.collaborators.stt.clone();
    match run_blocking(move || recognizer.transcribe(&body)).await {
        Ok(transcript) => Json(transcript).into_response(),
        Err(e) => {
            warn!("STT error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to transcribe audio"),
            )
        }
    }
}

async fn tts(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: SpeechRequest = match parse_body(&body, "Text is required and must be a string")
    {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(e) = request.validate() {
        return rejected(e);
    }

    let key = format!(
        "{}:{}",
        request.language.as_deref().unwrap_or("hi-IN"),
        request.text
    );
    let audio = match state.cached_audio(&key) {
        Some(audio) => {
            debug!("TTS cache hit");
            audio
        }
        None => {
            let synthesizer = state.collaborators.tts.clone();
            match run_blocking(move || synthesizer.synthesize(&request)).await {
                Ok(audio) => {
                    state.cache_audio(key, audio.clone());
                    audio
                }
                Err(e) => {
                    warn!("TTS error: {}", e);
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::new("Failed to generate audio").with_details(e),
                    );
                }
            }
        }
    };

    (
        [
            (header::CONTENT_TYPE, audio.content_type),
            (header::CONTENT_LENGTH, audio.bytes.len().to_string()),
        ],
        audio.bytes,
    )
        .into_response()
}

async fn vision(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: VisionRequest = match parse_body(&body, "Image URL is required") {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(e) = request.validate() {
        return rejected(e);
    }

    let analyzer = state.collaborators.vision.clone();
    match run_blocking(move || analyzer.analyze(&request)).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!("Vision error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to analyze image"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurukulx_assist::{AssistResult, MockCollaborator, TextToSpeech};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn state_with(mock: MockCollaborator) -> Arc<AppState> {
        Arc::new(AppState::new(Collaborators::uniform(mock)))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ai_assist_answers() {
        let state = state_with(MockCollaborator::default());
        let body = Bytes::from_static(
            br#"{"message":"What is gravity?","context":"Board is empty.","type":"content_help"}"#,
        );
        let response = ai_assist(State(state), body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["response"].as_str().unwrap().contains("What is gravity?"));
    }

    #[tokio::test]
    async fn test_ai_assist_requires_message() {
        let state = state_with(MockCollaborator::default());
        let response = ai_assist(State(state.clone()), Bytes::from_static(b"{}")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Message is required");

        let response = ai_assist(State(state), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ai_assist_collaborator_failure() {
        let state = state_with(MockCollaborator::failing());
        let response = ai_assist(State(state), Bytes::from_static(br#"{"message":"hi"}"#)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "Failed to process AI request"
        );
    }

    #[tokio::test]
    async fn test_stt_requires_audio() {
        let state = state_with(MockCollaborator::default());
        let response = stt(State(state.clone()), Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Audio file is required");

        let response = stt(State(state), Bytes::from_static(&[1, 2, 3])).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["text"].is_string());
    }

    #[tokio::test]
    async fn test_tts_validation() {
        let state = state_with(MockCollaborator::default());
        let response = tts(State(state.clone()), Bytes::from_static(br#"{"text":42}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Text is required and must be a string"
        );

        let long = serde_json::json!({ "text": "a".repeat(5001) }).to_string();
        let response = tts(State(state), Bytes::from(long)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Text is too long for TTS. Maximum 5,000 characters allowed."
        );
    }

    #[tokio::test]
    async fn test_tts_returns_wav() {
        let state = state_with(MockCollaborator::default());
        let response = tts(State(state), Bytes::from_static(br#"{"text":"Namaste"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    struct CountingTts {
        calls: AtomicUsize,
    }

    impl TextToSpeech for CountingTts {
        fn synthesize(&self, _request: &SpeechRequest) -> AssistResult<SpeechAudio> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SpeechAudio {
                bytes: vec![1, 2, 3],
                content_type: "audio/wav".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_tts_cache_reuses_audio() {
        let counter = Arc::new(CountingTts {
            calls: AtomicUsize::new(0),
        });
        let mut collaborators = Collaborators::uniform(MockCollaborator::default());
        collaborators.tts = counter.clone();
        let state = Arc::new(AppState::new(collaborators));

        for _ in 0..2 {
            let response = tts(
                State(state.clone()),
                Bytes::from_static(br#"{"text":"Hello","language":"en-US"}"#),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);

        let response = tts(
            State(state),
            Bytes::from_static(br#"{"text":"Hello","language":"hi-IN"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tts_failure_carries_details() {
        let state = state_with(MockCollaborator::failing());
        let response = tts(State(state), Bytes::from_static(br#"{"text":"Hello"}"#)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to generate audio");
        assert!(json["details"].is_string());
    }

    #[tokio::test]
    async fn test_vision_requires_image() {
        let state = state_with(MockCollaborator::default());
        let response = vision(State(state.clone()), Bytes::from_static(br#"{"prompt":"x"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Image URL is required");

        let response = vision(
            State(state),
            Bytes::from_static(br#"{"imageUrl":"data:image/png;base64,AAAA"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_json(response).await["analysis"]
                .as_str()
                .unwrap()
                .contains("educational insights")
        );
    }

    #[tokio::test]
    async fn test_vision_collaborator_failure() {
        let state = state_with(MockCollaborator::failing());
        let response = vision(
            State(state),
            Bytes::from_static(br#"{"imageUrl":"data:image/png;base64,AAAA"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to analyze image");
    }
}
