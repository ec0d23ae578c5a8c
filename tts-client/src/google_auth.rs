//! Google Cloud credential resolution
//!
//! Produces a bearer token for the Text-to-Speech API from, in order:
//! - `CLOUD_TTS_GOOGLE_TOKEN` (a ready access token)
//! - `GOOGLE_APPLICATION_CREDENTIALS` (service account JSON key)
//! - gcloud application default credentials (`gcloud auth application-default login`)

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TtsError};

pub const TOKEN_ENV: &str = "CLOUD_TTS_GOOGLE_TOKEN";
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_LIFETIME_SECS: i64 = 3600;

/// Service account key file (only the fields needed for the JWT grant)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Application default credentials written by gcloud
#[derive(Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Where the access token comes from
#[derive(Clone)]
pub enum CredentialSource {
    Token(String),
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

// Keys and tokens stay out of debug output
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Token(_) => f.write_str("Token(..)"),
            CredentialSource::ServiceAccount(key) => f
                .debug_struct("ServiceAccount")
                .field("client_email", &key.client_email)
                .finish(),
            CredentialSource::AuthorizedUser(_) => f.write_str("AuthorizedUser(..)"),
        }
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl CredentialSource {
    /// Resolve credentials from the environment and gcloud's well-known file
    pub fn from_env() -> Result<Self> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                log::debug!("Using Google access token from {}", TOKEN_ENV);
                return Ok(CredentialSource::Token(token.trim().to_string()));
            }
        }

        if let Ok(path) = std::env::var(CREDENTIALS_ENV) {
            log::debug!("Using Google service account key at {}", path);
            return Self::service_account_from_file(Path::new(&path));
        }

        if let Some(path) = default_adc_path() {
            if path.exists() {
                log::debug!("Using application default credentials at {}", path.display());
                return Self::authorized_user_from_file(&path);
            }
        }

        Err(TtsError::Configuration(format!(
            "No Google credentials found. Set {} or run 'gcloud auth application-default login'",
            CREDENTIALS_ENV
        )))
    }

    pub fn service_account_from_file(path: &Path) -> Result<Self> {
        let content = read_credentials_file(path)?;
        let key: ServiceAccountKey = serde_json::from_str(&content).map_err(|e| {
            TtsError::Configuration(format!(
                "Invalid service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(CredentialSource::ServiceAccount(key))
    }

    pub fn authorized_user_from_file(path: &Path) -> Result<Self> {
        let content = read_credentials_file(path)?;
        let user: AuthorizedUser = serde_json::from_str(&content).map_err(|e| {
            TtsError::Configuration(format!(
                "Invalid application default credentials {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(CredentialSource::AuthorizedUser(user))
    }

    /// Obtain a bearer token, exchanging the credential if needed
    pub async fn access_token(&self, client: &Client) -> Result<String> {
        match self {
            CredentialSource::Token(token) => Ok(token.clone()),
            CredentialSource::ServiceAccount(key) => {
                let assertion = sign_jwt(key)?;
                let params = [
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", assertion.as_str()),
                ];
                exchange(client, &key.token_uri, &params).await
            }
            CredentialSource::AuthorizedUser(user) => {
                let params = [
                    ("grant_type", "refresh_token"),
                    ("client_id", user.client_id.as_str()),
                    ("client_secret", user.client_secret.as_str()),
                    ("refresh_token", user.refresh_token.as_str()),
                ];
                exchange(client, &user.token_uri, &params).await
            }
        }
    }
}

fn read_credentials_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        TtsError::Configuration(format!(
            "Failed to read credentials file {}: {}",
            path.display(),
            e
        ))
    })
}

fn sign_jwt(key: &ServiceAccountKey) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: CLOUD_PLATFORM_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + JWT_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
        TtsError::Configuration(format!("Invalid RSA private key in service account: {}", e))
    })?;

    jsonwebtoken::encode(&header, &claims, &encoding_key)
        .map_err(|e| TtsError::Configuration(format!("Failed to sign token request: {}", e)))
}

async fn exchange(client: &Client, token_uri: &str, params: &[(&str, &str)]) -> Result<String> {
    let response = client.post(token_uri).form(params).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(TtsError::Api {
            provider: "Google OAuth",
            message,
            status_code: Some(status.as_u16()),
        });
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| TtsError::InvalidResponse(format!("Failed to parse token response: {}", e)))?;
    Ok(token.access_token)
}

fn default_adc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("gcloud")
            .join("application_default_credentials.json")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Throwaway 2048-bit key generated for these tests only
    const TEST_RSA_KEY: &str = include_str!("../tests/fixtures/test_rsa_key.pem");

    fn write_json(value: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    #[tokio::test]
    async fn test_static_token_is_returned_as_is() {
        let source = CredentialSource::Token("ya29.static".to_string());
        let token = source.access_token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.static");
    }

    #[test]
    fn test_service_account_token_uri_defaults() {
        let file = write_json(serde_json::json!({
            "client_email": "tts@example.iam.gserviceaccount.com",
            "private_key": "not-a-key",
        }));
        let source = CredentialSource::service_account_from_file(file.path()).unwrap();
        match source {
            CredentialSource::ServiceAccount(key) => {
                assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
                assert_eq!(key.client_email, "tts@example.iam.gserviceaccount.com");
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_file_is_configuration_error() {
        let err = CredentialSource::service_account_from_file(Path::new("/nonexistent/key.json"))
            .unwrap_err();
        assert!(matches!(err, TtsError::Configuration(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let source = CredentialSource::Token("secret-token".to_string());
        assert!(!format!("{:?}", source).contains("secret-token"));
    }

    #[tokio::test]
    async fn test_invalid_private_key_fails_before_request() {
        let source = CredentialSource::ServiceAccount(ServiceAccountKey {
            client_email: "tts@example.iam.gserviceaccount.com".to_string(),
            private_key: "not-a-key".to_string(),
            token_uri: "http://127.0.0.1:9/token".to_string(),
        });
        let err = source.access_token(&Client::new()).await.unwrap_err();
        assert!(matches!(err, TtsError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_service_account_jwt_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("jwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "ya29.from-jwt" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = CredentialSource::ServiceAccount(ServiceAccountKey {
            client_email: "tts@example.iam.gserviceaccount.com".to_string(),
            private_key: TEST_RSA_KEY.to_string(),
            token_uri: format!("{}/token", server.uri()),
        });

        let token = source.access_token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.from-jwt");
    }

    #[tokio::test]
    async fn test_authorized_user_refresh_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=1%2F%2Frefresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "ya29.refreshed" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = CredentialSource::AuthorizedUser(AuthorizedUser {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "1//refresh".to_string(),
            token_uri: format!("{}/token", server.uri()),
        });

        let token = source.access_token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.refreshed");
    }

    #[tokio::test]
    async fn test_token_exchange_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let source = CredentialSource::AuthorizedUser(AuthorizedUser {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "stale".to_string(),
            token_uri: format!("{}/token", server.uri()),
        });

        match source.access_token(&Client::new()).await.unwrap_err() {
            TtsError::Api {
                message,
                status_code,
                ..
            } => {
                assert_eq!(status_code, Some(400));
                assert_eq!(message, "invalid_grant");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
