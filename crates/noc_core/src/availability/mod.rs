use crate::window::ReportWindow;

pub const FULL_AVAILABILITY: f64 = 100.0;

/// Availability of one entity over `window`, in percent.
///
/// - A zero-length window is defined as fully available.
/// - Downtime longer than the window clamps to 0 instead of going negative.
/// - The value is unrounded; use [`round2`] only at presentation time.
pub fn availability_percent(total_downtime_minutes: f64, window: &ReportWindow) -> f64 {
    let window_minutes = window.minutes();
    if window_minutes <= 0.0 {
        return FULL_AVAILABILITY;
    }
    let pct = (window_minutes - total_downtime_minutes) / window_minutes * 100.0;
    pct.clamp(0.0, FULL_AVAILABILITY)
}

/// Share of the window spent down, in percent, clamped to `[0, 100]`.
pub fn downtime_percent(downtime_minutes: f64, window: &ReportWindow) -> f64 {
    let window_minutes = window.minutes();
    if window_minutes <= 0.0 {
        return 0.0;
    }
    (downtime_minutes / window_minutes * 100.0).clamp(0.0, FULL_AVAILABILITY)
}

/// Share of `part` in `whole`, in percent; an empty whole reads as 0.
pub fn share_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal rendering used by every table ("99.80", "100.00").
pub fn format_percent(value: f64) -> String {
    format!("{:.2}", round2(value))
}
