// Command-line definition

use clap::{Parser, Subcommand};
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(name = "cloud-tts")]
#[command(about = "Synthesize speech from text or SSML with Google Cloud or Azure TTS", long_about = None)]
#[command(version)]
pub struct Args {
    /// List available voices (not implemented; input is synthesized as usual)
    #[arg(long)]
    pub listvoices: bool,

    /// Input is SSML format, rather than plain text
    #[arg(long)]
    pub ssml: bool,

    /// Input file path. Use '-' for stdin
    #[arg(short = 'i', value_name = "PATH", default_value = "-")]
    pub input: String,

    /// Output file path. Use '-' for stdout [default: ./tts.mp3]
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<String>,

    /// Language selection: 'en-US', 'en-GB', 'en-AU', 'el-GR', 'ru-RU', etc. [default: en-US]
    #[arg(short = 'l', value_name = "LANG")]
    pub language: Option<String>,

    /// Gender selection [m,f,n]. 'n' means neutral/don't care [default: m]
    #[arg(short = 'g', value_name = "CODE")]
    pub gender: Option<String>,

    /// Voice name. If specified, this overrides language & gender [default: unspecified]
    #[arg(short = 'v', value_name = "NAME")]
    pub voice: Option<String>,

    /// Audio format [mp3,opus,ogg,pcm,ulaw,alaw] [default: mp3]
    #[arg(short = 'f', value_name = "FORMAT")]
    pub format: Option<String>,

    /// Speed. '1.0' is normal, '2.0' is double speed, '0.25' is quarter speed [default: 1.0]
    #[arg(short = 's', value_name = "RATE", allow_negative_numbers = true)]
    pub speed: Option<f64>,

    /// Pitch in semitones. '0.0' is unchanged, range -20.0 to 20.0 [default: 1.0]
    #[arg(short = 'p', value_name = "SEMITONES", allow_negative_numbers = true)]
    pub pitch: Option<f64>,

    /// Sample rate in Hz [8000,11025,16000,22050,24000,32000,44100,48000] [default: 24000]
    #[arg(short = 'r', value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Volume gain in dB, range -96 to 16 [default: 0.0]
    #[arg(long = "db", value_name = "DB", allow_negative_numbers = true)]
    pub volume_gain_db: Option<f64>,

    /// TTS engine to use [google,azure]. Any other name selects azure [default: google]
    #[arg(short = 'e', value_name = "ENGINE")]
    pub engine: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage default settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (engine, language, gender, voice, format, sample_rate, speed, pitch, volume_gain_db)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Long flags also accepted with a single dash
const LEGACY_FLAGS: &[&str] = &["listvoices", "ssml", "db"];
const LEGACY_BOOL_FLAGS: &[&str] = &["listvoices", "ssml"];

/// Rewrite `-listvoices`, `-ssml` and `-db` (with optional `=value`) to
/// their double-dash forms. Everything after `--` is left alone.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            normalized.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let Some(body) = text.strip_prefix('-').filter(|b| !b.starts_with('-')) else {
            normalized.push(arg);
            continue;
        };

        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if !LEGACY_FLAGS.contains(&name) {
            normalized.push(arg);
            continue;
        }

        match value {
            Some(value) if LEGACY_BOOL_FLAGS.contains(&name) => match value {
                "true" | "1" => normalized.push(format!("--{}", name).into()),
                "false" | "0" => {}
                _ => normalized.push(format!("--{}={}", name, value).into()),
            },
            Some(value) => normalized.push(format!("--{}={}", name, value).into()),
            None => normalized.push(format!("--{}", name).into()),
        }
    }

    normalized
}

/// Parse process arguments, accepting the legacy flag spellings
pub fn parse() -> Args {
    Args::parse_from(normalize_legacy_flags(std::env::args_os()))
}
