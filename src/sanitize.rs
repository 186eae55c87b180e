// SPDX-License-Identifier: MIT

//! Numeric sanitization and best-effort repair of incoming profiles.
//!
//! The backend has been observed handing back non-numeric strings in the
//! body-metric fields (stale sessions, partial writes). Everything that
//! stores a profile into the session runs through [`sanitize_profile`], so
//! the rest of the crate can do arithmetic on `Option<f64>` without checks.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{MetricsSnapshot, UserProfile, UserProfileWire};

/// Coerce a raw JSON value to a finite number, or explicit absence.
///
/// Accepts numbers and numeric strings; everything else (including `null`,
/// `NaN`, and infinities) becomes `None` rather than propagating a
/// non-numeric value into display arithmetic.
pub fn ensure_numeric(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Sanitize a wire profile into the strict in-session shape.
pub fn sanitize_profile(wire: &UserProfileWire) -> UserProfile {
    UserProfile {
        username: wire.username.clone(),
        email: wire.email.clone(),
        height: ensure_numeric(wire.height.as_ref()),
        weight: ensure_numeric(wire.weight.as_ref()),
        initial_weight: ensure_numeric(wire.initial_weight.as_ref()),
        fitness_goal: ensure_numeric(wire.fitness_goal.as_ref()),
        date_of_birth: wire
            .date_of_birth
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
    }
}

/// Whether the three primary metrics are all present and numeric.
pub fn primary_metrics_valid(profile: &UserProfile) -> bool {
    profile.height.is_some() && profile.weight.is_some() && profile.fitness_goal.is_some()
}

/// Repair a sanitized profile from the local backup snapshot.
///
/// Runs only when the primary metrics (height, weight, fitness goal) are not
/// all valid. Snapshot fields overwrite the invalid ones; valid server values
/// are kept. With no snapshot the fields stay absent and the display layer
/// substitutes placeholders. Best-effort and local-only: never contacts the
/// server, never blocks.
pub fn repair_profile(mut profile: UserProfile, backup: Option<&MetricsSnapshot>) -> UserProfile {
    if primary_metrics_valid(&profile) {
        return profile;
    }

    let Some(backup) = backup else {
        tracing::debug!(
            username = %profile.username,
            "Profile metrics incomplete and no local backup available"
        );
        return profile;
    };

    tracing::info!(
        username = %profile.username,
        saved_at = %backup.saved_at,
        "Restoring missing profile metrics from local backup"
    );

    if profile.height.is_none() {
        profile.height = backup.height;
    }
    if profile.weight.is_none() {
        profile.weight = backup.weight;
    }
    if profile.initial_weight.is_none() {
        profile.initial_weight = backup.initial_weight;
    }
    if profile.fitness_goal.is_none() {
        profile.fitness_goal = backup.fitness_goal;
    }

    profile
}
