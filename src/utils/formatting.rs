//! Formatting utilities used for CLI outputs.

/// Meters below 1 km, kilometers with two decimals above.
pub fn distance(meters: f64) -> String {
    if !meters.is_finite() {
        "n/a".to_string()
    } else if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
