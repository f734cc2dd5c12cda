use serde::{Deserialize, Serialize};
use time::Month;

use crate::aggregate::aggregate_downtime;
use crate::availability::{availability_percent, format_percent};
use crate::domain::Incident;
use crate::normalize::interval::OngoingPolicy;
use crate::window::ReportWindow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAvailability {
    /// `YYYY-MM`
    pub month: String,
    /// `Mar 2024`
    pub label: String,
    pub window_minutes: f64,
    pub downtime_minutes: f64,
    pub availability_percent: f64,
    pub availability_display: String,
    pub incident_count: usize,
}

/// Month-by-month aggregate availability of a category (or of everything when `category` is
/// `None`).
///
/// Each month slice of `window` is run through the same clip/aggregate pipeline as any other
/// report; the downtime of every entity in scope is summed against the slice length.
pub fn build_monthly_trend(
    incidents: &[Incident],
    window: &ReportWindow,
    category: Option<&str>,
    ongoing: OngoingPolicy,
) -> Vec<MonthlyAvailability> {
    window
        .month_slices()
        .into_iter()
        .map(|(month, slice)| {
            let (downtime_minutes, incident_count) = aggregate_downtime(incidents, &slice, ongoing)
                .into_iter()
                .filter(|(key, _)| category.map_or(true, |c| key.category == c.trim()))
                .fold((0.0, 0usize), |(minutes, count), (_, d)| {
                    (minutes + d.total_minutes(), count + d.incident_count())
                });
            let availability = availability_percent(downtime_minutes, &slice);
            MonthlyAvailability {
                label: month_label(&slice),
                month,
                window_minutes: slice.minutes(),
                downtime_minutes,
                availability_percent: availability,
                availability_display: format_percent(availability),
                incident_count,
            }
        })
        .collect()
}

fn month_label(slice: &ReportWindow) -> String {
    let start = slice.start();
    let name = match start.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };
    format!("{name} {}", start.year())
}
