//! Locally cached backup of the last known-good numeric profile fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Best-effort backup of the numeric profile fields.
///
/// Stored as JSON under the fixed `profile_metrics` key and used only as a
/// fallback source when a freshly received profile fails the numeric-validity
/// check. Never authoritative: the server copy always wins when it is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub initial_weight: Option<f64>,
    #[serde(default)]
    pub fitness_goal: Option<f64>,
    /// When this snapshot was saved.
    pub saved_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Capture the numeric fields of a sanitized profile.
    pub fn from_profile(profile: &UserProfile, saved_at: DateTime<Utc>) -> Self {
        Self {
            height: profile.height,
            weight: profile.weight,
            initial_weight: profile.initial_weight,
            fitness_goal: profile.fitness_goal,
            saved_at,
        }
    }
}
