//! Provider implementations

mod azure;
mod google;

pub use azure::{AZURE_SYNTHESIS_TIMEOUT, AzureOutputFormat, AzureProvider};
pub use google::{GoogleAudioEncoding, GoogleProvider};
