// SPDX-License-Identifier: MIT

//! Session state and its reducer.
//!
//! The session record is mutated exclusively through named transitions: each
//! [`SessionEvent`] maps the old state to a new state as a pure function, no
//! I/O. Anything a transition needs from disk (the backup snapshot for
//! profile repair) is carried in the event payload by the command layer.

use std::sync::RwLock;

use crate::error::ErrorPayload;
use crate::models::{MetricsSnapshot, UserProfile, UserProfileWire};
use crate::sanitize;

/// The client-held record of authentication status, token, and current user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Opaque bearer token, present once credentials were exchanged.
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    /// True while a command has a request in flight.
    pub loading: bool,
    pub error: Option<ErrorPayload>,
}

impl SessionState {
    /// Initial state at process start, seeded from a persisted token.
    ///
    /// A persisted token alone does not authenticate the session; the startup
    /// path still has to fetch the profile before `is_authenticated` flips.
    pub fn from_persisted_token(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }
}

/// Named session transitions.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A login/registration/federated-login command was submitted.
    StartLoading,
    /// Credential exchange succeeded; token is in hand.
    LoginSuccess { token: String },
    /// A profile arrived from the backend. Always sanitized (and repaired
    /// from the backup, when one exists) before it is stored.
    UserLoaded {
        profile: UserProfileWire,
        backup: Option<MetricsSnapshot>,
    },
    /// A command failed with a classified payload.
    Error(ErrorPayload),
    /// Explicit logout or fatal authorization failure.
    Logout,
    /// Clear a previous error without otherwise changing state.
    ResetError,
}

/// Apply one transition. Pure: no I/O, no shared state.
pub fn apply(state: &SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::StartLoading => SessionState {
            loading: true,
            error: None,
            ..state.clone()
        },
        SessionEvent::LoginSuccess { token } => SessionState {
            token: Some(token),
            is_authenticated: true,
            loading: false,
            error: None,
            ..state.clone()
        },
        SessionEvent::UserLoaded { profile, backup } => {
            let sanitized = sanitize::sanitize_profile(&profile);
            let repaired = sanitize::repair_profile(sanitized, backup.as_ref());
            SessionState {
                user: Some(repaired),
                is_authenticated: true,
                loading: false,
                ..state.clone()
            }
        }
        SessionEvent::Error(payload) => SessionState {
            error: Some(payload),
            loading: false,
            ..state.clone()
        },
        SessionEvent::Logout => SessionState::default(),
        SessionEvent::ResetError => SessionState {
            error: None,
            ..state.clone()
        },
    }
}

/// Shared session store: a single state record behind a lock, updated only
/// via [`apply`].
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(initial: SessionState) -> Self {
        Self {
            state: RwLock::new(initial),
        }
    }

    /// Dispatch a transition.
    pub fn dispatch(&self, event: SessionEvent) {
        let mut state = self.state.write().expect("session lock poisoned");
        let next = apply(&state, event);
        *state = next;
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().expect("session lock poisoned").is_authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().expect("session lock poisoned").token.clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.read().expect("session lock poisoned").user.clone()
    }
}
