use serde::{Deserialize, Serialize};
use time::{Date, Month, PrimitiveDateTime};

use crate::error::{AppError, WINDOW_INVERTED, WINDOW_UNPARSEABLE};
use crate::normalize::interval::{minutes_between, Interval};
use crate::normalize::timestamps::{format_timestamp, parse_date, parse_instant};

/// Caller-supplied reporting window `[start, end]`.
///
/// Construction rejects `end < start`. A zero-length window is accepted and reads as 100%
/// available for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
}

/// Serializable description of a window, attached to every report payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSummary {
    pub start: String,
    pub end: String,
    pub minutes: f64,
}

/// Portion of an outage interval that falls inside a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedInterval {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
    pub minutes: f64,
}

impl ReportWindow {
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self, AppError> {
        if end < start {
            return Err(
                AppError::new(WINDOW_INVERTED, "Report window ends before it starts").with_details(
                    format!(
                        "start={}; end={}",
                        format_timestamp(start),
                        format_timestamp(end)
                    ),
                ),
            );
        }
        Ok(Self { start, end })
    }

    /// Window between two instants; each bound may be a timestamp or a bare date (midnight).
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        Self::new(parse_bound("start", start)?, parse_bound("end", end)?)
    }

    /// Window covering whole calendar days, `start_date` through `end_date` inclusive.
    pub fn from_dates(start_date: &str, end_date: &str) -> Result<Self, AppError> {
        let start = parse_day("start", start_date)?;
        let end = parse_day("end", end_date)?;
        if end < start {
            return Err(
                AppError::new(WINDOW_INVERTED, "Report window ends before it starts")
                    .with_details(format!("start={start_date}; end={end_date}")),
            );
        }
        Self::new(start.midnight(), start_of_next_day(end)?)
    }

    pub fn calendar_month(year: i32, month: u8) -> Result<Self, AppError> {
        let month = Month::try_from(month).map_err(|e| {
            AppError::new(WINDOW_UNPARSEABLE, "Invalid month").with_details(e.to_string())
        })?;
        let first = Date::from_calendar_date(year, month, 1).map_err(|e| {
            AppError::new(WINDOW_UNPARSEABLE, "Invalid month").with_details(e.to_string())
        })?;
        Self::new(first.midnight(), first_of_next_month(first)?.midnight())
    }

    /// `YYYY-MM` → that calendar month.
    pub fn parse_month(raw: &str) -> Result<Self, AppError> {
        let bad = || {
            AppError::new(WINDOW_UNPARSEABLE, "Expected a month as YYYY-MM")
                .with_details(format!("value={raw}"))
        };
        let (year, month) = raw.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u8 = month.parse().map_err(|_| bad())?;
        Self::calendar_month(year, month)
    }

    pub fn start(&self) -> PrimitiveDateTime {
        self.start
    }

    pub fn end(&self) -> PrimitiveDateTime {
        self.end
    }

    pub fn minutes(&self) -> f64 {
        minutes_between(self.start, self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.end == self.start
    }

    pub fn summary(&self) -> WindowSummary {
        WindowSummary {
            start: format_timestamp(self.start),
            end: format_timestamp(self.end),
            minutes: self.minutes(),
        }
    }

    /// Split the window at calendar-month boundaries.
    ///
    /// Each slice is labelled `YYYY-MM`. The first and last slices are truncated to the window.
    pub fn month_slices(&self) -> Vec<(String, ReportWindow)> {
        let mut out = Vec::new();
        let Ok(mut month_start) =
            Date::from_calendar_date(self.start.year(), self.start.month(), 1)
        else {
            return out;
        };

        while month_start.midnight() < self.end {
            let Ok(next) = first_of_next_month(month_start) else {
                break;
            };
            let slice_start = self.start.max(month_start.midnight());
            let slice_end = self.end.min(next.midnight());
            if slice_end > slice_start {
                let key = format!(
                    "{:04}-{:02}",
                    month_start.year(),
                    u8::from(month_start.month())
                );
                out.push((
                    key,
                    ReportWindow {
                        start: slice_start,
                        end: slice_end,
                    },
                ));
            }
            month_start = next;
        }
        out
    }
}

fn parse_bound(field: &str, raw: &str) -> Result<PrimitiveDateTime, AppError> {
    parse_instant(raw).ok_or_else(|| {
        AppError::new(
            WINDOW_UNPARSEABLE,
            format!("Unparseable report window {field}"),
        )
        .with_details(format!("value={raw}"))
    })
}

fn parse_day(field: &str, raw: &str) -> Result<Date, AppError> {
    parse_date(raw).ok_or_else(|| {
        AppError::new(
            WINDOW_UNPARSEABLE,
            format!("Unparseable report window {field} date"),
        )
        .with_details(format!("value={raw}"))
    })
}

fn start_of_next_day(date: Date) -> Result<PrimitiveDateTime, AppError> {
    date.next_day().map(Date::midnight).ok_or_else(|| {
        AppError::new(WINDOW_UNPARSEABLE, "Report window end is out of range")
            .with_details(date.to_string())
    })
}

fn first_of_next_month(first: Date) -> Result<Date, AppError> {
    let (year, month) = match first.month() {
        Month::December => (first.year() + 1, Month::January),
        m => (first.year(), m.next()),
    };
    Date::from_calendar_date(year, month, 1).map_err(|e| {
        AppError::new(WINDOW_UNPARSEABLE, "Report window is out of range")
            .with_details(e.to_string())
    })
}

/// Intersect an outage interval with the window.
///
/// An interval is kept when it touches the window at all
/// (`interval.end >= window.start && interval.start <= window.end`), so a boundary touch yields a
/// zero-minute clip. Intervals entirely outside the window yield `None`.
pub fn clip_interval(interval: &Interval, window: &ReportWindow) -> Option<ClippedInterval> {
    if interval.end < window.start || interval.start > window.end {
        return None;
    }
    let start = interval.start.max(window.start);
    let end = interval.end.min(window.end);
    // Cannot go negative after the overlap test above.
    let minutes = minutes_between(start, end).max(0.0);
    Some(ClippedInterval {
        start,
        end,
        minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> PrimitiveDateTime {
        parse_instant(raw).expect("timestamp")
    }

    fn march() -> ReportWindow {
        ReportWindow::calendar_month(2024, 3).expect("window")
    }

    #[test]
    fn march_has_44640_minutes() {
        assert_eq!(march().minutes(), 44_640.0);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = ReportWindow::parse("2024-04-01", "2024-03-01").expect_err("inverted");
        assert_eq!(err.code, WINDOW_INVERTED);
    }

    #[test]
    fn unparseable_window_is_rejected() {
        let err = ReportWindow::parse("yesterday", "2024-03-01").expect_err("garbage");
        assert_eq!(err.code, WINDOW_UNPARSEABLE);
        let err = ReportWindow::parse_month("2024-13").expect_err("month");
        assert_eq!(err.code, WINDOW_UNPARSEABLE);
    }

    #[test]
    fn from_dates_covers_whole_days() {
        let w = ReportWindow::from_dates("2024-03-01", "2024-03-31").expect("window");
        assert_eq!(w, march());
        let single = ReportWindow::from_dates("2024-03-05", "2024-03-05").expect("window");
        assert_eq!(single.minutes(), 1440.0);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let w = ReportWindow::parse_month("2023-12").expect("window");
        assert_eq!(w.summary().end, "2024-01-01T00:00");
    }

    #[test]
    fn clip_truncates_partial_overlap() {
        let iv = Interval::new(at("2024-02-28T23:00"), at("2024-03-01T01:00")).expect("iv");
        let clipped = clip_interval(&iv, &march()).expect("overlap");
        assert_eq!(format_timestamp(clipped.start), "2024-03-01T00:00");
        assert_eq!(clipped.minutes, 60.0);
    }

    #[test]
    fn clip_excludes_disjoint_and_keeps_boundary_touch() {
        let before = Interval::new(at("2024-02-01T00:00"), at("2024-02-02T00:00")).expect("iv");
        assert_eq!(clip_interval(&before, &march()), None);

        let touching = Interval::new(at("2024-02-29T23:00"), at("2024-03-01T00:00")).expect("iv");
        let clipped = clip_interval(&touching, &march()).expect("touch");
        assert_eq!(clipped.minutes, 0.0);
    }

    #[test]
    fn month_slices_truncate_to_window() {
        let w = ReportWindow::parse("2024-01-15", "2024-03-10").expect("window");
        let slices = w.month_slices();
        let keys: Vec<&str> = slices.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(slices[0].1.summary().start, "2024-01-15T00:00");
        assert_eq!(slices[1].1.minutes(), 29.0 * 1440.0);
        assert_eq!(slices[2].1.summary().end, "2024-03-10T00:00");
        let total: f64 = slices.iter().map(|(_, s)| s.minutes()).sum();
        assert_eq!(total, w.minutes());
    }
}
