// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod snapshot;
pub mod user;

pub use snapshot::MetricsSnapshot;
pub use user::{ProfileUpdate, RegisterRequest, UserProfile, UserProfileWire};
