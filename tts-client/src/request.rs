//! Provider-independent synthesis request types

use serde::Serialize;

/// Requested voice gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl Gender {
    /// Parse a gender code (`m`, `f`, `n`). Anything unrecognized is neutral.
    pub fn from_code(code: &str) -> Self {
        match code {
            "m" => Gender::Male,
            "f" => Gender::Female,
            _ => Gender::Neutral,
        }
    }
}

/// Requested audio format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AudioFormat {
    #[serde(rename = "mp3")]
    Mp3,
    #[serde(rename = "opus")]
    OggOpus,
    #[serde(rename = "pcm")]
    Linear16,
    #[serde(rename = "ulaw")]
    Mulaw,
    #[serde(rename = "alaw")]
    Alaw,
}

impl AudioFormat {
    /// Parse a format code. Unsupported codes fall back to MP3.
    pub fn from_code(code: &str) -> Self {
        match code {
            "mp3" => AudioFormat::Mp3,
            "opus" | "ogg" => AudioFormat::OggOpus,
            "pcm" => AudioFormat::Linear16,
            "ulaw" => AudioFormat::Mulaw,
            "alaw" => AudioFormat::Alaw,
            _ => AudioFormat::Mp3,
        }
    }

    /// File extension used for the default output name
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::OggOpus => "ogg",
            AudioFormat::Linear16 => "pcm",
            AudioFormat::Mulaw => "ulaw",
            AudioFormat::Alaw => "alaw",
        }
    }
}

/// Everything a provider needs to synthesize one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Plain text or SSML, depending on `ssml`
    pub text: String,
    pub ssml: bool,
    /// BCP-47 language code (e.g. "en-US")
    pub language: String,
    pub gender: Gender,
    /// Explicit voice name; overrides language and gender where the provider allows
    pub voice: Option<String>,
    pub format: AudioFormat,
    /// Speaking rate multiplier, 1.0 is normal
    pub speed: f64,
    /// Pitch in semitones
    pub pitch: f64,
    pub sample_rate: u32,
    pub volume_gain_db: f64,
}

impl SynthesisRequest {
    /// Request for plain text with the tool's default voice settings
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ssml: false,
            language: "en-US".to_string(),
            gender: Gender::Male,
            voice: None,
            format: AudioFormat::Mp3,
            speed: 1.0,
            pitch: 1.0,
            sample_rate: 24000,
            volume_gain_db: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_code() {
        assert_eq!(Gender::from_code("m"), Gender::Male);
        assert_eq!(Gender::from_code("f"), Gender::Female);
        assert_eq!(Gender::from_code("n"), Gender::Neutral);
        assert_eq!(Gender::from_code("x"), Gender::Neutral);
        assert_eq!(Gender::from_code(""), Gender::Neutral);
    }

    #[test]
    fn test_format_from_code() {
        assert_eq!(AudioFormat::from_code("mp3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_code("opus"), AudioFormat::OggOpus);
        assert_eq!(AudioFormat::from_code("ogg"), AudioFormat::OggOpus);
        assert_eq!(AudioFormat::from_code("pcm"), AudioFormat::Linear16);
        assert_eq!(AudioFormat::from_code("ulaw"), AudioFormat::Mulaw);
        assert_eq!(AudioFormat::from_code("alaw"), AudioFormat::Alaw);
    }

    #[test]
    fn test_unknown_format_defaults_to_mp3() {
        assert_eq!(AudioFormat::from_code("flac"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_code("MP3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_code(""), AudioFormat::Mp3);
    }

    #[test]
    fn test_extension() {
        assert_eq!(AudioFormat::from_code("opus").extension(), "ogg");
        assert_eq!(AudioFormat::from_code("pcm").extension(), "pcm");
        assert_eq!(AudioFormat::from_code("bogus").extension(), "mp3");
    }

    #[test]
    fn test_default_request() {
        let request = SynthesisRequest::new("Hello world");
        assert_eq!(request.text, "Hello world");
        assert!(!request.ssml);
        assert_eq!(request.language, "en-US");
        assert_eq!(request.gender, Gender::Male);
        assert_eq!(request.voice, None);
        assert_eq!(request.sample_rate, 24000);
    }
}
