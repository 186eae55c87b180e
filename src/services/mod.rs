// SPDX-License-Identifier: MIT

//! Services module - HTTP client and auth orchestration.

pub mod api;
pub mod auth;

pub use api::{ApiClient, FederatedLoginResponse, TokenPair};
pub use auth::AuthService;
