//! HTTP client for the whiteboard collaborator API.
//!
//! Endpoints live under `{base_url}/api/whiteboard/`. Speech recognition
//! posts raw audio bytes; every other call posts JSON.

use crate::config::AssistConfig;
use crate::error::{AssistError, AssistResult};
use crate::protocol::{
    AssistRequest, AssistResponse, ErrorBody, SpeechAudio, SpeechRequest, Transcript,
    VisionRequest, VisionResponse,
};
use crate::service::{AssistService, SpeechToText, TextToSpeech, VisionService};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

/// Blocking client for all four collaborators.
pub struct HttpCollaborator {
    base_url: String,
    client: Client,
    timeout_secs: u64,
}

impl HttpCollaborator {
    pub fn new(config: &AssistConfig) -> AssistResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AssistError::Connection(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/whiteboard/{name}", self.base_url)
    }

    fn send(&self, request: RequestBuilder) -> AssistResult<Response> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                AssistError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AssistError::Connection(format!("Cannot reach {}", self.base_url))
            } else {
                AssistError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(AssistError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> AssistResult<T> {
        response
            .json()
            .map_err(|e| AssistError::Decode(e.to_string()))
    }
}

impl AssistService for HttpCollaborator {
    fn ask(&self, request: &AssistRequest) -> AssistResult<AssistResponse> {
        request.validate()?;
        log::debug!("ai-assist request ({})", request.mode);
        let response = self.send(self.client.post(self.endpoint("ai-assist")).json(request))?;
        Self::decode(response)
    }
}

impl SpeechToText for HttpCollaborator {
    fn transcribe(&self, audio: &[u8]) -> AssistResult<Transcript> {
        if audio.is_empty() {
            return Err(AssistError::InvalidRequest("Audio file is required".into()));
        }
        let request = self
            .client
            .post(self.endpoint("stt"))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(audio.to_vec());
        Self::decode(self.send(request)?)
    }
}

impl TextToSpeech for HttpCollaborator {
    fn synthesize(&self, request: &SpeechRequest) -> AssistResult<SpeechAudio> {
        request.validate()?;
        let response = self.send(self.client.post(self.endpoint("tts")).json(request))?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/wav")
            .to_string();
        let bytes = response
            .bytes()
            .map_err(|e| AssistError::Decode(e.to_string()))?;
        Ok(SpeechAudio {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl VisionService for HttpCollaborator {
    fn analyze(&self, request: &VisionRequest) -> AssistResult<VisionResponse> {
        request.validate()?;
        let response = self.send(self.client.post(self.endpoint("vision")).json(request))?;
        Self::decode(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AssistMode;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn unreachable_config() -> AssistConfig {
        AssistConfig {
            // Port 1 is reserved and refuses connections on loopback.
            base_url: "http://127.0.0.1:1/".to_string(),
            timeout_secs: 2,
            ..AssistConfig::default()
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = HttpCollaborator::new(&unreachable_config()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1");
        assert_eq!(
            client.endpoint("ai-assist"),
            "http://127.0.0.1:1/api/whiteboard/ai-assist"
        );
    }

    #[test]
    fn test_invalid_requests_fail_before_network() {
        let client = HttpCollaborator::new(&unreachable_config()).unwrap();

        let err = client
            .ask(&AssistRequest::new("", "", AssistMode::General))
            .unwrap_err();
        assert!(matches!(err, AssistError::InvalidRequest(_)));

        let err = client.transcribe(&[]).unwrap_err();
        assert!(matches!(err, AssistError::InvalidRequest(_)));

        let err = client
            .analyze(&VisionRequest::new("", None))
            .unwrap_err();
        assert!(matches!(err, AssistError::InvalidRequest(_)));
    }

    #[test]
    fn test_unreachable_service_is_connection_error() {
        let client = HttpCollaborator::new(&unreachable_config()).unwrap();
        let err = client
            .ask(&AssistRequest::new("hello", "", AssistMode::General))
            .unwrap_err();
        assert!(matches!(
            err,
            AssistError::Connection(_) | AssistError::Timeout(_)
        ));
    }

    #[test]
    fn test_silent_service_is_timeout_error() {
        // Accepts the connection and reads the request but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            thread::sleep(Duration::from_secs(3));
        });

        let client = HttpCollaborator::new(&AssistConfig {
            base_url: format!("http://{addr}"),
            timeout_secs: 1,
            ..AssistConfig::default()
        })
        .unwrap();
        let err = client
            .ask(&AssistRequest::new("hello", "", AssistMode::General))
            .unwrap_err();
        assert!(matches!(err, AssistError::Timeout(1)), "got {err:?}");

        server.join().unwrap();
    }
}
