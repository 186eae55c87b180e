// SPDX-License-Identifier: MIT

//! View models for the profile and dashboard screens.
//!
//! Pure construction from a sanitized [`UserProfile`]: unknown metrics become
//! placeholders or 0.0, never panics or blank arithmetic. Storage stays
//! metric; imperial exists only in these formatted strings.

use serde::Serialize;

use crate::metrics;
use crate::models::UserProfile;

/// Placeholder shown for metrics the profile does not have.
const UNKNOWN_PLACEHOLDER: &str = "—";

/// Unit system selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Profile screen fields, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub height: String,
    pub weight: String,
    pub fitness_goal: String,
    pub date_of_birth: Option<String>,
}

impl ProfileView {
    pub fn build(profile: &UserProfile, units: UnitSystem) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            height: format_height(profile.height, units),
            weight: format_weight(profile.weight, units),
            fitness_goal: format_weight(profile.fitness_goal, units),
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Dashboard screen fields: greeting plus derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub greeting: String,
    /// BMI rounded to one decimal; 0.0 when unknown.
    pub bmi: f64,
    /// Progress towards the fitness goal, 0-100, one decimal.
    pub progress_percent: f64,
    pub current_weight: String,
    pub goal_weight: String,
}

impl DashboardView {
    pub fn build(profile: &UserProfile, units: UnitSystem) -> Self {
        Self {
            greeting: format!("Welcome {}!", profile.username),
            bmi: metrics::round1(metrics::bmi(profile.weight, profile.height)),
            progress_percent: metrics::round1(metrics::progress_percent(
                profile.weight,
                profile.initial_weight,
                profile.fitness_goal,
            )),
            current_weight: format_weight(profile.weight, units),
            goal_weight: format_weight(profile.fitness_goal, units),
        }
    }
}

/// Format a height for display in the selected unit system.
fn format_height(height_cm: Option<f64>, units: UnitSystem) -> String {
    let Some(cm) = height_cm else {
        return UNKNOWN_PLACEHOLDER.to_string();
    };
    match units {
        UnitSystem::Metric => format!("{} cm", metrics::round1(cm)),
        UnitSystem::Imperial => {
            let (feet, inches) = metrics::cm_to_feet_inches(cm);
            format!("{} ft {} in", feet, inches)
        }
    }
}

/// Format a weight for display in the selected unit system.
fn format_weight(weight_kg: Option<f64>, units: UnitSystem) -> String {
    let Some(kg) = weight_kg else {
        return UNKNOWN_PLACEHOLDER.to_string();
    };
    match units {
        UnitSystem::Metric => format!("{} kg", metrics::round1(kg)),
        UnitSystem::Imperial => format!("{} lbs", metrics::round1(metrics::kg_to_lbs(kg))),
    }
}

/// Compose the registration form's feet/inches inputs into centimeters.
///
/// Returns `None` unless both inputs were provided, matching the form rule
/// that a partial height is not submitted.
pub fn compose_height_cm(feet: Option<f64>, inches: Option<f64>) -> Option<f64> {
    match (feet, inches) {
        (Some(feet), Some(inches)) => Some(metrics::feet_inches_to_cm(feet, inches)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            height: Some(175.0),
            weight: Some(70.0),
            initial_weight: Some(90.0),
            fitness_goal: Some(75.0),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 4, 1),
        }
    }

    #[test]
    fn test_profile_view_metric() {
        let view = ProfileView::build(&profile(), UnitSystem::Metric);
        assert_eq!(view.height, "175 cm");
        assert_eq!(view.weight, "70 kg");
        assert_eq!(view.date_of_birth.as_deref(), Some("1990-04-01"));
    }

    #[test]
    fn test_profile_view_imperial() {
        let view = ProfileView::build(&profile(), UnitSystem::Imperial);
        assert_eq!(view.height, "5 ft 9 in");
        assert_eq!(view.weight, "154.3 lbs");
    }

    #[test]
    fn test_unknown_metrics_show_placeholder() {
        let mut p = profile();
        p.height = None;
        p.fitness_goal = None;

        let view = ProfileView::build(&p, UnitSystem::Metric);
        assert_eq!(view.height, UNKNOWN_PLACEHOLDER);
        assert_eq!(view.fitness_goal, UNKNOWN_PLACEHOLDER);
    }

    #[test]
    fn test_dashboard_derived_metrics() {
        let view = DashboardView::build(&profile(), UnitSystem::Metric);
        assert_eq!(view.greeting, "Welcome bob!");
        assert_eq!(view.bmi, 22.9);
        // 90 -> 70 towards 75: past the goal, clamped to 100.
        assert_eq!(view.progress_percent, 100.0);
    }

    #[test]
    fn test_dashboard_with_unknown_metrics_is_zeroed() {
        let mut p = profile();
        p.height = None;
        p.initial_weight = None;

        let view = DashboardView::build(&p, UnitSystem::Metric);
        assert_eq!(view.bmi, 0.0);
        assert_eq!(view.progress_percent, 0.0);
    }

    #[test]
    fn test_compose_height_requires_both_inputs() {
        assert_eq!(compose_height_cm(Some(5.0), None), None);
        assert_eq!(compose_height_cm(None, Some(11.0)), None);
        let cm = compose_height_cm(Some(5.0), Some(11.0)).unwrap();
        assert!((cm - 180.34).abs() < 1e-9);
    }
}
