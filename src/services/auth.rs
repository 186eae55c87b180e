// SPDX-License-Identifier: MIT

//! Auth command layer: orchestrates login, registration, federated login,
//! profile refresh/update, and logout.
//!
//! Commands run the network calls, then funnel every state change through the
//! session reducer. Each command also records its failure payload in the
//! session, so view code bound to the store sees the same error the caller
//! gets back.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::error::{ApiError, ErrorPayload, Result};
use crate::models::{MetricsSnapshot, ProfileUpdate, RegisterRequest};
use crate::sanitize;
use crate::services::api::ApiClient;
use crate::session::{SessionEvent, SessionStore};
use crate::storage::LocalStore;

/// High-level auth service owning the HTTP client, local store, and session.
pub struct AuthService {
    api: ApiClient,
    storage: Arc<LocalStore>,
    store: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, storage: Arc<LocalStore>, store: Arc<SessionStore>) -> Self {
        Self {
            api,
            storage,
            store,
        }
    }

    /// The session store this service dispatches into.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.store
    }

    // ─── Commands ────────────────────────────────────────────────────────────

    /// Log in with username/password, then load the profile.
    ///
    /// A profile-fetch failure after a successful credential exchange is
    /// fatal: the whole session is cleared rather than left half
    /// authenticated.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.store.dispatch(SessionEvent::StartLoading);

        let tokens = match self.api.login(username, password).await {
            Ok(tokens) => tokens,
            Err(e) => return self.fail("login", e),
        };

        self.persist_tokens(&tokens.access, tokens.refresh.as_deref());
        self.store.dispatch(SessionEvent::LoginSuccess {
            token: tokens.access.clone(),
        });

        self.finish_login_fetch(&tokens.access).await
    }

    /// Register a new account, then log in with the same credentials.
    ///
    /// Local form validation and server-side pre-validation both run before
    /// the account is created, so field errors surface without a partial
    /// registration.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.store.dispatch(SessionEvent::StartLoading);

        if let Err(errors) = request.validate() {
            let payload = validation_errors_payload(&errors);
            self.store.dispatch(SessionEvent::Error(payload.clone()));
            return Err(ApiError::Validation(payload));
        }

        if let Err(e) = self
            .api
            .validate_credentials(&request.username, &request.email)
            .await
        {
            return self.fail("register pre-validation", e);
        }

        if let Err(e) = self.api.register(request).await {
            return self.fail("register", e);
        }

        tracing::info!(username = %request.username, "Account created, logging in");

        let tokens = match self.api.login(&request.username, &request.password).await {
            Ok(tokens) => tokens,
            Err(e) => return self.fail("post-registration login", e),
        };

        self.persist_tokens(&tokens.access, tokens.refresh.as_deref());
        self.store.dispatch(SessionEvent::LoginSuccess {
            token: tokens.access.clone(),
        });

        self.finish_login_fetch(&tokens.access).await
    }

    /// Log in with a Google identity credential.
    ///
    /// The exchange response embeds a user summary without body metrics, so
    /// the full profile is fetched afterwards like any other login.
    pub async fn google_login(&self, credential: &str) -> Result<()> {
        self.store.dispatch(SessionEvent::StartLoading);

        let response = match self.api.google_login(credential).await {
            Ok(response) => response,
            Err(e) => return self.fail("google login", e),
        };

        tracing::info!(username = %response.user.username, "Federated login exchanged");

        self.persist_tokens(&response.access, response.refresh.as_deref());
        self.store.dispatch(SessionEvent::LoginSuccess {
            token: response.access.clone(),
        });

        self.finish_login_fetch(&response.access).await
    }

    /// Server-side username/email pre-validation for registration forms.
    pub async fn validate_credentials(&self, username: &str, email: &str) -> Result<()> {
        self.api.validate_credentials(username, email).await
    }

    /// Whether an account with this email already exists.
    pub async fn validate_email(&self, email: &str) -> Result<bool> {
        self.api.validate_email(email).await
    }

    /// Re-fetch the current user's profile.
    ///
    /// An authorization failure clears the session unconditionally; other
    /// failures surface as a recoverable error.
    pub async fn refresh_profile(&self) -> Result<()> {
        let token = self.require_token()?;
        self.store.dispatch(SessionEvent::StartLoading);

        match self.api.current_user(&token).await {
            Ok(profile) => {
                self.store_profile(profile);
                Ok(())
            }
            Err(ApiError::Unauthorized(payload)) => {
                tracing::warn!("Profile refresh rejected, clearing session");
                self.clear_session();
                Err(ApiError::Unauthorized(payload))
            }
            Err(e) => self.fail("profile refresh", e),
        }
    }

    /// Patch the profile and store the updated result.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let token = self.require_token()?;
        self.store.dispatch(SessionEvent::StartLoading);

        match self.api.update_profile(&token, update).await {
            Ok(profile) => {
                self.store_profile(profile);
                Ok(())
            }
            Err(ApiError::Unauthorized(payload)) => {
                tracing::warn!("Profile update rejected, clearing session");
                self.clear_session();
                Err(ApiError::Unauthorized(payload))
            }
            Err(e) => self.fail("profile update", e),
        }
    }

    /// Startup path: resume a session from the persisted token.
    ///
    /// Returns whether a session was restored. A rejected token is cleared
    /// silently and the user starts signed out; a transport or server
    /// failure keeps the token on disk (the backend may just be down) and
    /// surfaces as an error.
    pub async fn restore_session(&self) -> Result<bool> {
        let Some(token) = self.store.token() else {
            return Ok(false);
        };

        match self.api.current_user(&token).await {
            Ok(profile) => {
                self.store_profile(profile);
                tracing::info!("Session restored from persisted token");
                Ok(true)
            }
            Err(ApiError::Unauthorized(_)) => {
                tracing::info!("Persisted token rejected, starting signed out");
                self.clear_session();
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session restore failed, keeping persisted token");
                Err(e)
            }
        }
    }

    /// Clear the persisted tokens and the in-memory session.
    pub fn logout(&self) {
        self.clear_session();
        tracing::info!("Logged out");
    }

    /// Clear a surfaced error without otherwise changing state.
    pub fn clear_error(&self) {
        self.store.dispatch(SessionEvent::ResetError);
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    /// Profile fetch immediately after a credential exchange.
    ///
    /// Any failure here invalidates the whole session (explicit asymmetry:
    /// a token without a loadable profile is not a usable session), but the
    /// error payload is re-recorded after the clear so the login form can
    /// explain what happened.
    async fn finish_login_fetch(&self, token: &str) -> Result<()> {
        match self.api.current_user(token).await {
            Ok(profile) => {
                self.store_profile(profile);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch after login failed, clearing session");
                self.clear_session();
                self.store.dispatch(SessionEvent::Error(e.display_payload()));
                Err(e)
            }
        }
    }

    /// Sanitize/repair an incoming profile, store it, and refresh the backup
    /// snapshot when the stored metrics are fully valid.
    fn store_profile(&self, profile: crate::models::UserProfileWire) {
        let backup = self.storage.load_snapshot();
        self.store
            .dispatch(SessionEvent::UserLoaded { profile, backup });

        let Some(user) = self.store.current_user() else {
            return;
        };

        // Only a fully valid set of metrics refreshes the backup; a repaired
        // profile must not overwrite the snapshot it was repaired from.
        if sanitize::primary_metrics_valid(&user) {
            let snapshot = MetricsSnapshot::from_profile(&user, Utc::now());
            if let Err(e) = self.storage.save_snapshot(&snapshot) {
                tracing::warn!(error = %e, "Failed to save metrics snapshot");
            }
        }
    }

    fn persist_tokens(&self, access: &str, refresh: Option<&str>) {
        if let Err(e) = self.storage.save_tokens(access, refresh) {
            // The in-memory session still works; only restarts lose the login.
            tracing::warn!(error = %e, "Failed to persist tokens, continuing anyway");
        }
    }

    /// Clear persisted tokens and dispatch the logout transition.
    fn clear_session(&self) {
        if let Err(e) = self.storage.clear_tokens() {
            tracing::warn!(error = %e, "Failed to clear persisted tokens");
        }
        self.store.dispatch(SessionEvent::Logout);
    }

    fn require_token(&self) -> Result<String> {
        self.store.token().ok_or_else(|| {
            ApiError::Unauthorized(ErrorPayload::Message("Not signed in".to_string()))
        })
    }

    /// Record a command failure in the session and pass the error up.
    fn fail(&self, operation: &str, error: ApiError) -> Result<()> {
        tracing::warn!(operation, error = %error, "Auth command failed");
        self.store
            .dispatch(SessionEvent::Error(error.display_payload()));
        Err(error)
    }
}

/// Convert local form-validation errors to the tagged payload.
fn validation_errors_payload(errors: &validator::ValidationErrors) -> ErrorPayload {
    let mut fields = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        let message = field_errors
            .first()
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid value for {}", field));
        fields.insert(field.to_string(), message);
    }
    ErrorPayload::FieldErrors(fields)
}
