use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::providers::{AzureProvider, GoogleProvider};
use crate::request::SynthesisRequest;

/// Common interface for all speech synthesis providers
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize the request and return the encoded audio bytes
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}

/// Supported TTS engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Google,
    Azure,
}

impl Engine {
    /// Parse an engine name. Anything other than `google` selects Azure.
    pub fn from_code(code: &str) -> Self {
        match code {
            "google" => Engine::Google,
            "azure" => Engine::Azure,
            other => {
                log::warn!("Unknown TTS engine '{}', using azure", other);
                Engine::Azure
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Google => "google",
            Engine::Azure => "azure",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "google" => Ok(Engine::Google),
            "azure" => Ok(Engine::Azure),
            other => Err(format!(
                "Unknown TTS engine: {}. Available: google, azure",
                other
            )),
        }
    }
}

/// One configured provider per engine
pub enum Provider {
    Google(GoogleProvider),
    Azure(AzureProvider),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Provider").field(&self.name()).finish()
    }
}

impl Provider {
    /// Build the provider for an engine from the process environment
    pub fn for_engine(engine: Engine) -> Result<Self> {
        match engine {
            Engine::Google => Ok(Provider::Google(GoogleProvider::from_env()?)),
            Engine::Azure => Ok(Provider::Azure(AzureProvider::from_env()?)),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for Provider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        match self {
            Provider::Google(p) => p.synthesize(request).await,
            Provider::Azure(p) => p.synthesize(request).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Provider::Google(p) => p.name(),
            Provider::Azure(p) => p.name(),
        }
    }
}
