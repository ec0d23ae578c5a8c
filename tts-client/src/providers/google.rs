//! Google Cloud Text-to-Speech provider
//!
//! Calls the `text:synthesize` REST endpoint with a bearer token obtained
//! from a service account (see `google_auth`).

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TtsError};
use crate::google_auth::CredentialSource;
use crate::provider::SpeechSynthesizer;
use crate::request::{AudioFormat, Gender, SynthesisRequest};

pub const GOOGLE_ENDPOINT_ENV: &str = "CLOUD_TTS_GOOGLE_ENDPOINT";
const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com";

/// Audio encodings understood by the Google API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoogleAudioEncoding {
    Mp3,
    OggOpus,
    Linear16,
    Mulaw,
    Alaw,
}

impl From<AudioFormat> for GoogleAudioEncoding {
    fn from(format: AudioFormat) -> Self {
        match format {
            AudioFormat::Mp3 => GoogleAudioEncoding::Mp3,
            AudioFormat::OggOpus => GoogleAudioEncoding::OggOpus,
            AudioFormat::Linear16 => GoogleAudioEncoding::Linear16,
            AudioFormat::Mulaw => GoogleAudioEncoding::Mulaw,
            AudioFormat::Alaw => GoogleAudioEncoding::Alaw,
        }
    }
}

// Google API request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum SynthesisInput<'a> {
    Text(&'a str),
    Ssml(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum SsmlVoiceGender {
    Male,
    Female,
    Neutral,
}

impl From<Gender> for SsmlVoiceGender {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => SsmlVoiceGender::Male,
            Gender::Female => SsmlVoiceGender::Female,
            Gender::Neutral => SsmlVoiceGender::Neutral,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    ssml_gender: SsmlVoiceGender,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: GoogleAudioEncoding,
    speaking_rate: f64,
    pitch: f64,
    sample_rate_hertz: u32,
    volume_gain_db: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    audio_content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn build_request(request: &SynthesisRequest) -> SynthesizeSpeechRequest<'_> {
    let input = if request.ssml {
        SynthesisInput::Ssml(&request.text)
    } else {
        SynthesisInput::Text(&request.text)
    };

    SynthesizeSpeechRequest {
        input,
        voice: VoiceSelectionParams {
            language_code: &request.language,
            ssml_gender: request.gender.into(),
            name: request.voice.as_deref(),
        },
        audio_config: AudioConfig {
            audio_encoding: request.format.into(),
            speaking_rate: request.speed,
            pitch: request.pitch,
            sample_rate_hertz: request.sample_rate,
            volume_gain_db: request.volume_gain_db,
        },
    }
}

/// Provider for Google Cloud Text-to-Speech
pub struct GoogleProvider {
    base_url: String,
    credentials: CredentialSource,
    client: Client,
}

impl GoogleProvider {
    /// Create a provider against an explicit endpoint
    pub fn new(base_url: &str, credentials: CredentialSource) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| TtsError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    /// Create a provider using environment credentials
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var(GOOGLE_ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url, CredentialSource::from_env()?)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let body = build_request(request);
        log::debug!(
            "Google synthesize: language={} gender={:?} voice={:?} encoding={:?} rate={}Hz",
            request.language,
            body.voice.ssml_gender,
            request.voice,
            body.audio_config.audio_encoding,
            request.sample_rate
        );

        let token = self.credentials.access_token(&self.client).await?;
        let url = format!("{}/v1/text:synthesize", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                    error_response.error.message
                } else {
                    error_text
                };

            return Err(TtsError::Api {
                provider: self.name(),
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let speech: SynthesizeSpeechResponse = response.json().await.map_err(|e| {
            TtsError::InvalidResponse(format!("Failed to parse synthesize response: {}", e))
        })?;

        BASE64
            .decode(speech.audio_content)
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid audio content: {}", e)))
    }

    fn name(&self) -> &'static str {
        "Google Cloud TTS"
    }
}
