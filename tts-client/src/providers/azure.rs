//! Azure Speech provider
//!
//! Posts SSML to the regional `cognitiveservices/v1` endpoint using a
//! subscription key. The call is bounded by `AZURE_SYNTHESIS_TIMEOUT`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{Result, TtsError};
use crate::provider::SpeechSynthesizer;
use crate::request::{AudioFormat, Gender, SynthesisRequest};

pub const AZURE_KEY_ENV: &str = "AZURE_API_KEY";
pub const AZURE_REGION_ENV: &str = "AZURE_REGION";
pub const AZURE_ENDPOINT_ENV: &str = "CLOUD_TTS_AZURE_ENDPOINT";

/// Deadline for a single synthesis call
pub const AZURE_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("cloud-tts/", env!("CARGO_PKG_VERSION"));

/// Output formats accepted in the `X-Microsoft-OutputFormat` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzureOutputFormat {
    Audio16Khz32KBitRateMonoMp3,
    Audio24Khz48KBitRateMonoMp3,
    Audio48Khz96KBitRateMonoMp3,
    Riff8Khz16BitMonoPcm,
    Riff16Khz16BitMonoPcm,
    Riff22050Hz16BitMonoPcm,
    Riff24Khz16BitMonoPcm,
    Riff44100Hz16BitMonoPcm,
    Riff48Khz16BitMonoPcm,
}

impl AzureOutputFormat {
    /// Look up the output format for a format/sample-rate pair.
    /// Pairs missing from the table fall back to 16kHz MP3.
    pub fn lookup(format: AudioFormat, sample_rate: u32) -> Self {
        match (format, sample_rate) {
            (AudioFormat::Mp3, 16000) => Self::Audio16Khz32KBitRateMonoMp3,
            (AudioFormat::Mp3, 24000) => Self::Audio24Khz48KBitRateMonoMp3,
            (AudioFormat::Mp3, 48000) => Self::Audio48Khz96KBitRateMonoMp3,
            (AudioFormat::Linear16, 8000) => Self::Riff8Khz16BitMonoPcm,
            (AudioFormat::Linear16, 16000) => Self::Riff16Khz16BitMonoPcm,
            (AudioFormat::Linear16, 22050) => Self::Riff22050Hz16BitMonoPcm,
            (AudioFormat::Linear16, 24000) => Self::Riff24Khz16BitMonoPcm,
            (AudioFormat::Linear16, 44100) => Self::Riff44100Hz16BitMonoPcm,
            (AudioFormat::Linear16, 48000) => Self::Riff48Khz16BitMonoPcm,
            _ => Self::Audio16Khz32KBitRateMonoMp3,
        }
    }

    pub fn header_value(&self) -> &'static str {
        match self {
            Self::Audio16Khz32KBitRateMonoMp3 => "audio-16khz-32kbitrate-mono-mp3",
            Self::Audio24Khz48KBitRateMonoMp3 => "audio-24khz-48kbitrate-mono-mp3",
            Self::Audio48Khz96KBitRateMonoMp3 => "audio-48khz-96kbitrate-mono-mp3",
            Self::Riff8Khz16BitMonoPcm => "riff-8khz-16bit-mono-pcm",
            Self::Riff16Khz16BitMonoPcm => "riff-16khz-16bit-mono-pcm",
            Self::Riff22050Hz16BitMonoPcm => "riff-22050hz-16bit-mono-pcm",
            Self::Riff24Khz16BitMonoPcm => "riff-24khz-16bit-mono-pcm",
            Self::Riff44100Hz16BitMonoPcm => "riff-44100hz-16bit-mono-pcm",
            Self::Riff48Khz16BitMonoPcm => "riff-48khz-16bit-mono-pcm",
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Convert a dB gain to the signed percentage change Azure's prosody volume expects
fn volume_percent(gain_db: f64) -> f64 {
    (10f64.powf(gain_db / 20.0) - 1.0) * 100.0
}

/// Wrap plain text in SSML carrying voice and prosody settings.
/// SSML input is passed through untouched.
pub(crate) fn build_ssml(request: &SynthesisRequest) -> String {
    if request.ssml {
        return request.text.clone();
    }

    let language = escape_xml(&request.language);
    let voice = match &request.voice {
        Some(name) => format!("<voice name=\"{}\">", escape_xml(name)),
        None => {
            let gender = match request.gender {
                Gender::Male => "Male",
                Gender::Female => "Female",
                Gender::Neutral => "Neutral",
            };
            format!("<voice xml:lang=\"{}\" xml:gender=\"{}\">", language, gender)
        }
    };

    format!(
        "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{}\">{}<prosody rate=\"{:.2}\" pitch=\"{:+.2}st\" volume=\"{:+.2}%\">{}</prosody></voice></speak>",
        language,
        voice,
        request.speed,
        request.pitch,
        volume_percent(request.volume_gain_db),
        escape_xml(&request.text)
    )
}

/// Provider for Azure Cognitive Services Speech
pub struct AzureProvider {
    endpoint: String,
    api_key: String,
    timeout: Duration,
    client: Client,
}

impl AzureProvider {
    /// Create a provider against an explicit endpoint URL
    pub fn new(endpoint: &str, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TtsError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key,
            timeout: AZURE_SYNTHESIS_TIMEOUT,
            client,
        })
    }

    /// Create a provider from `AZURE_API_KEY` and `AZURE_REGION`.
    ///
    /// Missing values are not rejected here; the service reports them.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(AZURE_KEY_ENV).unwrap_or_default();
        let region = std::env::var(AZURE_REGION_ENV).unwrap_or_default();

        if api_key.is_empty() {
            log::warn!("{} is not set", AZURE_KEY_ENV);
        }
        if region.is_empty() {
            log::warn!("{} is not set", AZURE_REGION_ENV);
        }
        log::debug!("Azure region: {}", region);

        let endpoint = std::env::var(AZURE_ENDPOINT_ENV).unwrap_or_else(|_| {
            format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                region
            )
        });
        Self::new(&endpoint, api_key)
    }

    /// Override the synthesis deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, ssml: String, output_format: AzureOutputFormat) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", output_format.header_value())
            .body(ssml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            };
            return Err(TtsError::Canceled {
                status_code: status.as_u16(),
                details,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let output_format = AzureOutputFormat::lookup(request.format, request.sample_rate);
        log::debug!(
            "Azure synthesize: format={} voice={:?} ssml={}",
            output_format.header_value(),
            request.voice,
            request.ssml
        );

        let ssml = build_ssml(request);

        // The losing future is dropped, which closes the in-flight request
        match tokio::time::timeout(self.timeout, self.send(ssml, output_format)).await {
            Ok(result) => result,
            Err(_) => Err(TtsError::Timeout(self.timeout)),
        }
    }

    fn name(&self) -> &'static str {
        "Azure Speech"
    }
}
