use std::path::Path;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ResolveError};

/// OAuth scope required by Secret Manager.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Token endpoint used when the credential file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for service-account assertions.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// A Google credential file, as written by `gcloud` or the IAM console.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

/// `"type": "service_account"` key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// `"type": "authorized_user"` file from `gcloud auth application-default login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub quota_project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl Credentials {
    /// Read and parse a credential file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolveError::ClientSetup {
            reason: format!("cannot read credential file {}: {e}", path.display()),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ResolveError::ClientSetup { reason } => ResolveError::ClientSetup {
                reason: format!("{reason} ({})", path.display()),
            },
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ResolveError::ClientSetup {
            reason: format!("invalid credential file: {e}"),
        })
    }
}

/// Claims of the JWT exchanged for a service-account access token.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Credentials prepared for minting access tokens.
///
/// The service-account private key is parsed up front so that a broken
/// key file fails at client setup rather than on the first secret.
pub enum TokenSource {
    ServiceAccount {
        client_email: String,
        key_id: Option<String>,
        signing_key: EncodingKey,
        token_uri: String,
    },
    AuthorizedUser(AuthorizedUser),
}

impl TokenSource {
    pub fn token_uri(&self) -> &str {
        match self {
            TokenSource::ServiceAccount { token_uri, .. } => token_uri,
            TokenSource::AuthorizedUser(user) => &user.token_uri,
        }
    }

    /// Project billed for requests made with user credentials.
    pub fn quota_project(&self) -> Option<&str> {
        match self {
            TokenSource::ServiceAccount { .. } => None,
            TokenSource::AuthorizedUser(user) => user.quota_project_id.as_deref(),
        }
    }

    /// Form fields for the token endpoint, as of unix time `now`.
    pub fn grant_form(&self, now: i64) -> std::result::Result<Vec<(&'static str, String)>, String> {
        match self {
            TokenSource::ServiceAccount {
                client_email,
                key_id,
                signing_key,
                token_uri,
            } => {
                let mut header = Header::new(Algorithm::RS256);
                header.kid = key_id.clone();
                let claims = AssertionClaims {
                    iss: client_email,
                    scope: CLOUD_PLATFORM_SCOPE,
                    aud: token_uri,
                    iat: now,
                    exp: now + ASSERTION_LIFETIME_SECS,
                };
                let assertion = jsonwebtoken::encode(&header, &claims, signing_key)
                    .map_err(|e| format!("failed to sign token assertion: {e}"))?;
                Ok(vec![
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer".into()),
                    ("assertion", assertion),
                ])
            }
            TokenSource::AuthorizedUser(user) => Ok(vec![
                ("grant_type", "refresh_token".into()),
                ("client_id", user.client_id.clone()),
                ("client_secret", user.client_secret.clone()),
                ("refresh_token", user.refresh_token.clone()),
            ]),
        }
    }
}

impl TryFrom<Credentials> for TokenSource {
    type Error = ResolveError;

    fn try_from(credentials: Credentials) -> Result<Self> {
        match credentials {
            Credentials::ServiceAccount(key) => {
                let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
                    .map_err(|e| ResolveError::ClientSetup {
                        reason: format!(
                            "invalid private key for service account {}: {e}",
                            key.client_email
                        ),
                    })?;
                Ok(TokenSource::ServiceAccount {
                    client_email: key.client_email,
                    key_id: key.private_key_id,
                    signing_key,
                    token_uri: key.token_uri,
                })
            }
            Credentials::AuthorizedUser(user) => Ok(TokenSource::AuthorizedUser(user)),
        }
    }
}
