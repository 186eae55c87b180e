// SPDX-License-Identifier: MIT

//! Fittrack client: session, auth, and profile display logic for the
//! fitness-tracker backend.
//!
//! This crate is the client side of the product: it exchanges credentials
//! (password or Google federated login) for a bearer token, keeps the session
//! record in a reducer-driven store, repairs malformed numeric profile fields
//! from a local backup snapshot, and exposes unit-converted view models for
//! the profile and dashboard screens.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod sanitize;
pub mod services;
pub mod session;
pub mod storage;
pub mod views;

use std::sync::Arc;

use config::Config;
use error::Result;
use services::{ApiClient, AuthService};
use session::{SessionState, SessionStore};
use storage::LocalStore;

/// One application instance's session context.
///
/// Explicitly constructed and passed down instead of ambient global state:
/// init is [`SessionContext::new`] (+ [`AuthService::restore_session`] for
/// the startup path), teardown is [`AuthService::logout`].
pub struct SessionContext {
    pub config: Config,
    pub auth: AuthService,
}

impl SessionContext {
    /// Build a context from configuration: opens the local store, seeds the
    /// session from any persisted token, and wires up the command layer.
    pub fn new(config: Config) -> Result<Self> {
        let storage = Arc::new(LocalStore::new(&config.storage_dir)?);
        let persisted_token = storage.load_token()?;

        let store = Arc::new(SessionStore::new(SessionState::from_persisted_token(
            persisted_token,
        )));
        let api = ApiClient::new(&config.api_base_url, config.request_timeout)?;
        let auth = AuthService::new(api, storage, store);

        Ok(Self { config, auth })
    }

    /// Current session state snapshot.
    pub fn session_state(&self) -> SessionState {
        self.auth.session().state()
    }
}
