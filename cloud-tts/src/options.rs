// Resolved options for a single run

use serde::Serialize;
use std::path::PathBuf;
use tts_client::{AudioFormat, Engine, Gender, SynthesisRequest};

use crate::cli::Args;
use crate::config::{CloudTtsConfig, UNSPECIFIED_VOICE};

/// Sentinel for stdin/stdout
const STDIO: &str = "-";
/// Literal default of `-o`; its extension follows the chosen format
const DEFAULT_OUTPUT: &str = "./tts.mp3";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Everything the user asked for, after applying config defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    pub list_voices: bool,
    pub ssml: bool,
    pub input: InputSource,
    pub output: OutputTarget,
    pub language: String,
    pub gender: Gender,
    pub voice: Option<String>,
    pub format: AudioFormat,
    pub speed: f64,
    pub pitch: f64,
    pub sample_rate: u32,
    pub volume_gain_db: f64,
    pub engine: Engine,
}

impl Options {
    /// Combine command-line flags with config defaults; flags win
    pub fn resolve(args: &Args, config: &CloudTtsConfig) -> Self {
        let format = AudioFormat::from_code(args.format.as_deref().unwrap_or(&config.format));

        let input = if args.input == STDIO {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(&args.input))
        };

        let output = match args.output.as_deref() {
            Some(STDIO) => OutputTarget::Stdout,
            None | Some(DEFAULT_OUTPUT) => {
                OutputTarget::File(PathBuf::from(format!("./tts.{}", format.extension())))
            }
            Some(path) => OutputTarget::File(PathBuf::from(path)),
        };

        let voice = args.voice.clone().unwrap_or_else(|| config.voice.clone());
        let voice = if voice.is_empty() || voice == UNSPECIFIED_VOICE {
            None
        } else {
            Some(voice)
        };

        let engine = match args.engine.as_deref() {
            Some(name) => Engine::from_code(name),
            None => config.engine(),
        };

        Self {
            list_voices: args.listvoices,
            ssml: args.ssml,
            input,
            output,
            language: args
                .language
                .clone()
                .unwrap_or_else(|| config.language.clone()),
            gender: Gender::from_code(args.gender.as_deref().unwrap_or(&config.gender)),
            voice,
            format,
            speed: args.speed.unwrap_or(config.speed),
            pitch: args.pitch.unwrap_or(config.pitch),
            sample_rate: args.sample_rate.unwrap_or(config.sample_rate),
            volume_gain_db: args.volume_gain_db.unwrap_or(config.volume_gain_db),
            engine,
        }
    }

    /// Build the provider request for the given input text
    pub fn synthesis_request(&self, text: String) -> SynthesisRequest {
        SynthesisRequest {
            text,
            ssml: self.ssml,
            language: self.language.clone(),
            gender: self.gender,
            voice: self.voice.clone(),
            format: self.format,
            speed: self.speed,
            pitch: self.pitch,
            sample_rate: self.sample_rate,
            volume_gain_db: self.volume_gain_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn resolve(argv: &[&str]) -> Options {
        let args = Args::parse_from(argv.iter().copied());
        Options::resolve(&args, &CloudTtsConfig::default())
    }

    #[test]
    fn test_defaults() {
        let options = resolve(&["cloud-tts"]);
        assert!(!options.list_voices);
        assert!(!options.ssml);
        assert_eq!(options.input, InputSource::Stdin);
        assert_eq!(options.output, OutputTarget::File(PathBuf::from("./tts.mp3")));
        assert_eq!(options.language, "en-US");
        assert_eq!(options.gender, Gender::Male);
        assert_eq!(options.voice, None);
        assert_eq!(options.format, AudioFormat::Mp3);
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.pitch, 1.0);
        assert_eq!(options.sample_rate, 24000);
        assert_eq!(options.volume_gain_db, 0.0);
        assert_eq!(options.engine, Engine::Google);
    }

    #[test]
    fn test_default_output_follows_format() {
        let options = resolve(&["cloud-tts", "-f", "opus"]);
        assert_eq!(options.output, OutputTarget::File(PathBuf::from("./tts.ogg")));

        let options = resolve(&["cloud-tts", "-f", "pcm", "-o", "./tts.mp3"]);
        assert_eq!(options.output, OutputTarget::File(PathBuf::from("./tts.pcm")));
    }

    #[test]
    fn test_explicit_output_and_stdio() {
        let options = resolve(&["cloud-tts", "-o", "speech.wav", "-i", "script.txt"]);
        assert_eq!(options.output, OutputTarget::File(PathBuf::from("speech.wav")));
        assert_eq!(options.input, InputSource::File(PathBuf::from("script.txt")));

        let options = resolve(&["cloud-tts", "-o", "-"]);
        assert_eq!(options.output, OutputTarget::Stdout);
    }

    #[test]
    fn test_unspecified_voice_means_none() {
        assert_eq!(resolve(&["cloud-tts", "-v", "unspecified"]).voice, None);
        assert_eq!(resolve(&["cloud-tts", "-v", ""]).voice, None);
        assert_eq!(
            resolve(&["cloud-tts", "-v", "en-US-Wavenet-D"]).voice.as_deref(),
            Some("en-US-Wavenet-D")
        );
    }

    #[test]
    fn test_invalid_codes_fall_back() {
        let options = resolve(&["cloud-tts", "-f", "flac", "-g", "x"]);
        assert_eq!(options.format, AudioFormat::Mp3);
        assert_eq!(options.gender, Gender::Neutral);
    }

    #[test]
    fn test_unknown_engine_selects_azure() {
        assert_eq!(resolve(&["cloud-tts", "-e", "polly"]).engine, Engine::Azure);
        assert_eq!(resolve(&["cloud-tts", "-e", "Azure"]).engine, Engine::Azure);
    }

    #[test]
    fn test_config_supplies_defaults_and_flags_win() {
        let config = CloudTtsConfig {
            engine: "azure".to_string(),
            language: "de-DE".to_string(),
            speed: 1.2,
            ..CloudTtsConfig::default()
        };

        let args = Args::parse_from(["cloud-tts", "-s", "0.8"]);
        let options = Options::resolve(&args, &config);
        assert_eq!(options.engine, Engine::Azure);
        assert_eq!(options.language, "de-DE");
        assert_eq!(options.speed, 0.8);

        let args = Args::parse_from(["cloud-tts", "-e", "google"]);
        let options = Options::resolve(&args, &config);
        assert_eq!(options.engine, Engine::Google);
    }

    #[test]
    fn test_synthesis_request_carries_options() {
        let options = resolve(&["cloud-tts", "-g", "f", "-r", "16000", "-f", "pcm"]);
        let request = options.synthesis_request("Hello".to_string());
        assert_eq!(request.text, "Hello");
        assert_eq!(request.gender, Gender::Female);
        assert_eq!(request.sample_rate, 16000);
        assert_eq!(request.format, AudioFormat::Linear16);
    }

    #[test]
    fn test_serialized_keys_are_distinct() {
        let options = resolve(&["cloud-tts", "-e", "azure", "-f", "opus"]);
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["engine"], "azure");
        assert_eq!(value["format"], "opus");
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 13);
    }
}
