use time::PrimitiveDateTime;

use crate::domain::{Cause, Incident};
use crate::normalize::timestamps::{parse_timestamp, ParsedTimestamp};

/// Half-open outage interval `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

impl Interval {
    /// Builds an interval only when it has positive length.
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn minutes(&self) -> f64 {
        minutes_between(self.start, self.end)
    }
}

/// How records with a down time but no up time are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OngoingPolicy {
    /// Skip them, as the incident log always has.
    #[default]
    Exclude,
    /// Treat the outage as lasting until the given instant, usually the caller's "now".
    CountUntil(PrimitiveDateTime),
}

pub(crate) fn minutes_between(start: PrimitiveDateTime, end: PrimitiveDateTime) -> f64 {
    (end - start).as_seconds_f64() / 60.0
}

/// Turn one incident record into the outage interval it describes, if any.
///
/// Yields `None` (never an error) when:
/// - the cause is `NotDown`,
/// - either endpoint is missing, the "-" sentinel, or unparseable,
/// - the interval has zero or negative length.
///
/// With [`OngoingPolicy::CountUntil`], a missing up time is replaced by the policy instant.
pub fn normalize_interval(incident: &Incident, ongoing: OngoingPolicy) -> Option<Interval> {
    if incident.cause == Cause::NotDown {
        return None;
    }

    let start = parse_timestamp(incident.down_at.as_deref()).value()?;
    let end_ts = parse_timestamp(incident.up_at.as_deref());
    let end = match (end_ts.value(), ongoing) {
        (Some(end), _) => end,
        (None, OngoingPolicy::CountUntil(until)) if end_ts == ParsedTimestamp::Missing => until,
        _ => return None,
    };

    let interval = Interval::new(start, end);
    if interval.is_none() {
        tracing::debug!(
            incident = %incident.label(),
            "skipping incident with non-positive duration"
        );
    }
    interval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::timestamps::parse_instant;

    fn at(raw: &str) -> PrimitiveDateTime {
        parse_instant(raw).expect("timestamp")
    }

    fn incident(down: Option<&str>, up: Option<&str>, cause: Cause) -> Incident {
        Incident::new("Core Switch", "SW-1", down, up, cause)
    }

    #[test]
    fn valid_record_yields_interval() {
        let inc = incident(Some("2024-03-10T10:00"), Some("2024-03-10T11:30"), Cause::Unplanned);
        let iv = normalize_interval(&inc, OngoingPolicy::Exclude).expect("interval");
        assert_eq!(iv.minutes(), 90.0);
    }

    #[test]
    fn not_down_never_yields_interval() {
        let inc = incident(Some("2024-03-10T10:00"), Some("2024-03-10T11:30"), Cause::NotDown);
        assert_eq!(normalize_interval(&inc, OngoingPolicy::Exclude), None);
    }

    #[test]
    fn inverted_and_zero_length_are_skipped() {
        let inverted = incident(Some("2024-03-10T11:30"), Some("2024-03-10T10:00"), Cause::Planned);
        let zero = incident(Some("2024-03-10T10:00"), Some("2024-03-10T10:00"), Cause::Planned);
        assert_eq!(normalize_interval(&inverted, OngoingPolicy::Exclude), None);
        assert_eq!(normalize_interval(&zero, OngoingPolicy::Exclude), None);
    }

    #[test]
    fn sentinel_and_garbage_are_skipped() {
        let sentinel = incident(Some("-"), Some("2024-03-10T10:00"), Cause::Planned);
        let garbage = incident(Some("2024-03-10T10:00"), Some("soon"), Cause::Planned);
        assert_eq!(normalize_interval(&sentinel, OngoingPolicy::Exclude), None);
        assert_eq!(normalize_interval(&garbage, OngoingPolicy::Exclude), None);
    }

    #[test]
    fn ongoing_policy_only_fills_missing_up_time() {
        let until = at("2024-03-10T12:00");
        let ongoing = incident(Some("2024-03-10T10:00"), None, Cause::Unplanned);
        assert_eq!(normalize_interval(&ongoing, OngoingPolicy::Exclude), None);
        let iv = normalize_interval(&ongoing, OngoingPolicy::CountUntil(until)).expect("interval");
        assert_eq!(iv.minutes(), 120.0);

        let garbage = incident(Some("2024-03-10T10:00"), Some("soon"), Cause::Unplanned);
        assert_eq!(
            normalize_interval(&garbage, OngoingPolicy::CountUntil(until)),
            None
        );
    }
}
