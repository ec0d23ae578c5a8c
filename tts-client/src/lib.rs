//! Cloud text-to-speech client library
//!
//! Translates a provider-independent `SynthesisRequest` into the request
//! schema of Google Cloud Text-to-Speech or Azure Speech and returns the
//! synthesized audio bytes untouched.
//!
//! # Example
//!
//! ```no_run
//! use tts_client::{Engine, Provider, SpeechSynthesizer, SynthesisRequest};
//!
//! # async fn example() -> tts_client::Result<()> {
//! let provider = Provider::for_engine(Engine::Google)?;
//! let audio = provider.synthesize(&SynthesisRequest::new("Hello world")).await?;
//! std::fs::write("hello.mp3", audio).ok();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod google_auth;
pub mod provider;
pub mod providers;
pub mod request;

pub use error::{Result, TtsError};
pub use provider::{Engine, Provider, SpeechSynthesizer};
pub use request::{AudioFormat, Gender, SynthesisRequest};
