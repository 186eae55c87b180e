// SPDX-License-Identifier: MIT

//! REST client for the fitness-tracker backend.
//!
//! Handles:
//! - Credential exchange (login) and registration
//! - Google federated-login exchange
//! - Current-user fetch and profile patch
//! - Credential/email pre-validation
//! - Failure-response classification into the error taxonomy

use anyhow::Context as _;
use serde::Deserialize;

use crate::error::{ApiError, ErrorPayload};
use crate::models::{ProfileUpdate, RegisterRequest, UserProfileWire};

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client against the given API base URL (no trailing slash).
    pub fn new(
        base_url: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Exchange username/password for a token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let url = format!("{}/auth/jwt/create/", self.base_url);
        let body = serde_json::json!({ "username": username, "password": password });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }

    /// Create a new account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let url = format!("{}/auth/users/", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        check_response(response).await
    }

    /// Exchange a Google identity credential for an application token pair.
    pub async fn google_login(&self, credential: &str) -> Result<FederatedLoginResponse, ApiError> {
        let url = format!("{}/users/google-login/", self.base_url);
        let body = serde_json::json!({ "credential": credential });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }

    /// Fetch the authenticated user's profile.
    pub async fn current_user(&self, access_token: &str) -> Result<UserProfileWire, ApiError> {
        let url = format!("{}/auth/users/me/", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }

    /// Pre-validate a username/email pair before registration.
    ///
    /// Conflicts come back as a 400 with per-field messages, which
    /// classification surfaces as [`ErrorPayload::FieldErrors`].
    pub async fn validate_credentials(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/users/validate-credentials/", self.base_url);
        let body = serde_json::json!({ "username": username, "email": email });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        check_response(response).await
    }

    /// Check whether an account with this email already exists.
    pub async fn validate_email(&self, email: &str) -> Result<bool, ApiError> {
        let url = format!("{}/users/validate-email/", self.base_url);
        let body = serde_json::json!({ "email": email });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let check: EmailCheckResponse = check_response_json(response).await?;
        Ok(check.exists)
    }

    /// Patch the authenticated user's profile; returns the updated profile.
    pub async fn update_profile(
        &self,
        access_token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfileWire, ApiError> {
        let url = format!("{}/users/profile/", self.base_url);

        let response = self
            .http
            .patch(&url)
            .bearer_auth(access_token)
            .json(update)
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }
}

/// Map a reqwest error to the transport variant.
fn transport_error(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Check response status; classify failures. Discards any success body.
async fn check_response(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(classify_failure(response).await)
}

/// Check response status and parse the JSON success body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(classify_failure(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Transport(format!("JSON parse error: {}", e)))
}

/// Turn a non-success response into the right taxonomy variant.
///
/// The raw body is logged here; everything downstream only sees the
/// classified error.
async fn classify_failure(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    tracing::debug!(status = %status, body = %body, "Backend request failed");

    if status.as_u16() == 401 {
        return ApiError::Unauthorized(ErrorPayload::classify(&body));
    }

    if status.is_client_error() {
        return ApiError::Validation(ErrorPayload::classify(&body));
    }

    ApiError::Server {
        status: status.as_u16(),
        body,
    }
}

/// Token pair from credential exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Response from the Google federated-login exchange.
///
/// Carries a token pair plus a summary of the (possibly just created) user.
/// The summary never includes body metrics, so the command layer still does a
/// full current-user fetch afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedLoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: FederatedUserSummary,
}

/// User summary embedded in the federated-login response.
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedUserSummary {
    pub id: u64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct EmailCheckResponse {
    exists: bool,
}
