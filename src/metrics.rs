// SPDX-License-Identifier: MIT

//! Unit conversions and derived body metrics.
//!
//! Pure functions over sanitized profile values. Storage is always metric
//! (cm / kg); imperial only ever exists as a display conversion.

/// Centimeters per foot.
pub const CM_PER_FOOT: f64 = 30.48;
/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;
/// Pounds per kilogram.
pub const LBS_PER_KG: f64 = 2.20462;

/// Convert a feet/inches form input to centimeters.
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    feet * CM_PER_FOOT + inches * CM_PER_INCH
}

/// Convert centimeters to whole feet and inches for display.
///
/// Inches are rounded to the nearest whole inch, carrying into feet when the
/// rounding lands on 12.
pub fn cm_to_feet_inches(cm: f64) -> (u32, u32) {
    let total_inches = (cm / CM_PER_INCH).max(0.0);
    let mut feet = (total_inches / 12.0).floor() as u32;
    let mut inches = (total_inches % 12.0).round() as u32;
    if inches == 12 {
        feet += 1;
        inches = 0;
    }
    (feet, inches)
}

/// Convert kilograms to pounds (display only).
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

/// Round to one decimal for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Body mass index from weight (kg) and height (cm).
///
/// Returns 0.0 when either value is unknown or height is non-positive; the
/// dashboard shows that as a placeholder rather than an error.
pub fn bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> f64 {
    match (weight_kg, height_cm) {
        (Some(weight), Some(height)) if height > 0.0 => {
            let height_m = height / 100.0;
            weight / (height_m * height_m)
        }
        _ => 0.0,
    }
}

/// Progress towards the fitness goal as a percentage in [0, 100].
///
/// A goal below the initial weight is a reduction target; a goal at or above
/// it is a gain target with the symmetric formula. A non-positive denominator
/// (goal equal to initial, or inputs in a degenerate order) yields 0.
pub fn progress_percent(
    current_kg: Option<f64>,
    initial_kg: Option<f64>,
    goal_kg: Option<f64>,
) -> f64 {
    let (Some(current), Some(initial), Some(goal)) = (current_kg, initial_kg, goal_kg) else {
        return 0.0;
    };

    let (achieved, span) = if goal < initial {
        (initial - current, initial - goal)
    } else {
        (current - initial, goal - initial)
    };

    if span <= 0.0 {
        return 0.0;
    }

    (achieved / span * 100.0).clamp(0.0, 100.0)
}
