//! User profile models: wire shapes, sanitized profile, and form requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Sanitized user profile held in the session.
///
/// Invariant: the body-metric fields are numeric or explicitly absent, never
/// strings — the calculation and display layers do arithmetic on them
/// unconditionally. Every path that populates the session runs
/// [`crate::sanitize::sanitize_profile`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    /// Email address (may be empty for federated accounts)
    #[serde(default)]
    pub email: String,
    /// Height in centimeters
    pub height: Option<f64>,
    /// Current weight in kilograms
    pub weight: Option<f64>,
    /// Weight in kilograms when the account was created
    pub initial_weight: Option<f64>,
    /// Target weight in kilograms
    pub fitness_goal: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Profile as received from the backend, before sanitization.
///
/// The body-metric fields are raw JSON values because the backend (and stale
/// sessions) have been observed returning strings like `"abc"` where a number
/// belongs. Parsing happens in the sanitize step, never here.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileWire {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub initial_weight: Option<Value>,
    #[serde(default)]
    pub fitness_goal: Option<Value>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

/// Registration form data submitted to the backend.
///
/// Local validation mirrors what the registration form enforces before any
/// network call; server-side pre-validation still runs afterwards.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub re_password: String,
    /// Height in centimeters (the form collects feet/inches and converts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

/// Partial profile update (PATCH). Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}
