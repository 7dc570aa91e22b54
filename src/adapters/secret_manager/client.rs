use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::debug;

use super::credentials::{Credentials, TokenSource};
use crate::core::errors::{Result, ResolveError};
use crate::core::traits::secret_accessor::SecretAccessor;

/// Public Secret Manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Per-request timeout for token and access calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: Option<SecretPayload>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    status: Option<String>,
}

/// Blocking Secret Manager client over the v1 REST API.
///
/// Owns a current-thread tokio runtime and drives each request with
/// `block_on`, so callers stay fully synchronous. The access token is
/// fetched on the first request and reused for the rest of the run.
pub struct SecretManagerClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    tokens: TokenSource,
    access_token: RefCell<Option<String>>,
}

impl SecretManagerClient {
    /// Build a client from a credential file.
    ///
    /// # Errors
    ///
    /// `ClientSetup` if the credential file cannot be read or parsed, or
    /// if the HTTP client or runtime cannot be created.
    pub fn new(credential_path: &Path, endpoint: &str) -> Result<Self> {
        let tokens = TokenSource::try_from(Credentials::load(credential_path)?)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ResolveError::ClientSetup {
                reason: format!("failed to create async runtime: {e}"),
            })?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("envresolve/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResolveError::ClientSetup {
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        debug!(endpoint, token_uri = tokens.token_uri(), "secret manager client ready");

        Ok(Self {
            http,
            runtime,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            tokens,
            access_token: RefCell::new(None),
        })
    }

    /// Return the cached access token, fetching one if needed.
    fn access_token(&self) -> std::result::Result<String, String> {
        if let Some(token) = self.access_token.borrow().as_ref() {
            return Ok(token.clone());
        }

        let form = self.tokens.grant_form(chrono::Utc::now().timestamp())?;
        let token = self.runtime.block_on(async {
            let resp = self
                .http
                .post(self.tokens.token_uri())
                .form(&form)
                .send()
                .await
                .map_err(|e| format!("token request failed: {e}"))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(format!("token endpoint returned {status}: {body}"));
            }

            resp.json::<TokenResponse>()
                .await
                .map(|t| t.access_token)
                .map_err(|e| format!("failed to parse token response: {e}"))
        })?;

        debug!("obtained access token");
        *self.access_token.borrow_mut() = Some(token.clone());
        Ok(token)
    }

    fn access_url(&self, name: &str) -> String {
        format!(
            "{}/v1/{}:access",
            self.endpoint,
            name.trim_start_matches('/')
        )
    }
}

impl SecretAccessor for SecretManagerClient {
    fn access_secret_version(&self, name: &str) -> Result<Vec<u8>> {
        let fail = |reason: String| ResolveError::SecretAccess {
            name: name.to_string(),
            reason,
        };

        let token = self.access_token().map_err(fail)?;
        let url = self.access_url(name);

        let encoded = self
            .runtime
            .block_on(async {
                let mut request = self.http.get(&url).bearer_auth(&token);
                if let Some(project) = self.tokens.quota_project() {
                    request = request.header("x-goog-user-project", project);
                }

                let resp = request
                    .send()
                    .await
                    .map_err(|e| format!("request failed: {e}"))?;

                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                        Ok(err) => format!(
                            "{} ({}): {}",
                            status,
                            err.error.status.unwrap_or_default(),
                            err.error.message
                        ),
                        Err(_) => format!("{status}: {body}"),
                    });
                }

                resp.json::<AccessSecretVersionResponse>()
                    .await
                    .map_err(|e| format!("failed to parse response: {e}"))
            })
            .map_err(fail)?
            .payload
            .map(|p| p.data)
            .unwrap_or_default();

        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ResolveError::SecretAccess {
                name: name.to_string(),
                reason: format!("response payload is not valid base64: {e}"),
            })
    }
}
