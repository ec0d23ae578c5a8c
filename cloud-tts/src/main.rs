// cloud-tts - Synthesize speech from text or SSML with Google Cloud or Azure TTS

mod cli;
mod config;
mod input;
mod options;
mod output;

use anyhow::{Context, Result};
use cli::{Args, Commands, ConfigAction};
use config::CloudTtsConfig;
use options::Options;
use tts_client::{Provider, SpeechSynthesizer};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Logs go to stderr; stdout may carry audio
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(args).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let config = CloudTtsConfig::load_or_default().context("Failed to load configuration")?;
    let options = Options::resolve(&args, &config);

    if let Ok(json) = serde_json::to_string(&options) {
        log::debug!("Options: {}", json);
    }

    if options.list_voices {
        log::warn!("Voice listing is not implemented; synthesizing input instead");
    }

    let text = input::read_input(&options.input)?;
    log::debug!("Read {} bytes of input", text.len());

    let provider = Provider::for_engine(options.engine)
        .with_context(|| format!("Failed to set up {} engine", options.engine))?;

    let request = options.synthesis_request(text);
    let audio = provider
        .synthesize(&request)
        .await
        .with_context(|| format!("{} synthesis failed", provider.name()))?;
    log::debug!("Received {} bytes of audio", audio.len());

    output::write_audio(&options.output, &audio)
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = CloudTtsConfig::load()?;
            println!("Configuration file: {:?}", CloudTtsConfig::config_path()?);
            println!();
            println!("engine = \"{}\"", config.engine);
            println!("language = \"{}\"", config.language);
            println!("gender = \"{}\"", config.gender);
            println!("voice = \"{}\"", config.voice);
            println!("format = \"{}\"", config.format);
            println!("sample_rate = {}", config.sample_rate);
            println!("speed = {}", config.speed);
            println!("pitch = {}", config.pitch);
            println!("volume_gain_db = {}", config.volume_gain_db);
        }
        ConfigAction::Set { key, value } => {
            let mut config = CloudTtsConfig::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
    }
    Ok(())
}
