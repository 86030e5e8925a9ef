//! OAuth credential handling for the chat transport.
//!
//! Tokens are referenced by environment variable and validated against the
//! id server before use; an invalid token is refreshed when the app
//! credentials are available. This runs once at process start, before the
//! bot core is constructed.

use crate::config::AuthConfig;
use crate::error::{BotError, Result};
use serde::Deserialize;

const VALIDATE_URL: &str = "https://id.twitch.tv/oauth2/validate";
const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// A usable chat credential.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth access token for the IRC login.
    pub token: String,
}

/// Response body of a successful token refresh.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Resolve a working token: read it from the environment, validate it, and
/// refresh it when the id server rejects it.
///
/// # Errors
///
/// Returns a `Credentials` error when no token is configured and no refresh
/// is possible, or when the refresh itself fails.
pub async fn resolve(auth: &AuthConfig) -> Result<Credentials> {
    let client = reqwest::Client::new();

    if let Some(token) = env_value(&auth.token_env) {
        if validate(&client, &token).await? {
            return Ok(Credentials { token });
        }
        tracing::info!("configured token rejected, refreshing");
    } else {
        tracing::info!(var = %auth.token_env, "no token in environment, refreshing");
    }

    refresh(&client, auth).await
}

/// Check a token against the id server. `Ok(false)` means rejected.
async fn validate(client: &reqwest::Client, token: &str) -> Result<bool> {
    let response = client
        .get(VALIDATE_URL)
        .header("Authorization", format!("OAuth {token}"))
        .send()
        .await
        .map_err(|e| BotError::Credentials(format!("validate request failed: {e}")))?;

    Ok(response.status().is_success())
}

/// Exchange the refresh token for a fresh access token.
async fn refresh(client: &reqwest::Client, auth: &AuthConfig) -> Result<Credentials> {
    let client_id = require_env(&auth.client_id_env)?;
    let client_secret = require_env(&auth.client_secret_env)?;
    let refresh_token = require_env(&auth.refresh_token_env)?;

    let response = client
        .post(TOKEN_URL)
        .form(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ])
        .send()
        .await
        .map_err(|e| BotError::Credentials(format!("refresh request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(BotError::Credentials(format!(
            "refresh rejected with status {}",
            response.status()
        )));
    }

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| BotError::Credentials(format!("bad refresh response: {e}")))?;

    tracing::info!("token refreshed");
    Ok(Credentials {
        token: body.access_token,
    })
}

/// Read an environment variable, treating blank values as absent.
fn env_value(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn require_env(var: &str) -> Result<String> {
    env_value(var).ok_or_else(|| BotError::Credentials(format!("env var is missing: {var}")))
}
