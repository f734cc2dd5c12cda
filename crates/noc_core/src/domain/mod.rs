use serde::{Deserialize, Serialize};

/// Sentinel the incident log stores when a field was left blank.
pub const NOT_RECORDED: &str = "-";

/// Classification of an incident record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cause {
    Planned,
    Unplanned,
    /// The record exists but represents no outage; always zero downtime.
    #[serde(rename = "Not Down")]
    NotDown,
}

impl Cause {
    /// Lenient parse of the labels operators type into the log.
    ///
    /// Returns `None` for anything that is not one of the three known causes so callers can
    /// decide how loudly to complain.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "planned" => Some(Cause::Planned),
            "unplanned" => Some(Cause::Unplanned),
            "notdown" => Some(Cause::NotDown),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cause::Planned => "Planned",
            Cause::Unplanned => "Unplanned",
            Cause::NotDown => "Not Down",
        }
    }

    pub fn is_downtime(self) -> bool {
        !matches!(self, Cause::NotDown)
    }
}

/// Incident record as handed over by the persistence layer.
///
/// Notes:
/// - Timestamps are kept as raw strings; the interval normalizer decides whether they are usable.
/// - A record with unusable timing data is still a valid record. It is shown by the log views,
///   it just contributes no downtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: Option<i64>,
    pub entity_id: String,
    pub category: String,
    pub down_at: Option<String>,
    pub up_at: Option<String>,
    pub cause: Cause,
    pub note: Option<String>,
    pub escalated_person: Option<String>,
}

impl Incident {
    pub fn new(
        category: impl Into<String>,
        entity_id: impl Into<String>,
        down_at: Option<&str>,
        up_at: Option<&str>,
        cause: Cause,
    ) -> Self {
        Self {
            id: None,
            entity_id: entity_id.into(),
            category: category.into(),
            down_at: down_at.map(str::to_string),
            up_at: up_at.map(str::to_string),
            cause,
            note: None,
            escalated_person: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Free-text note, ignoring blanks and the "not recorded" sentinel.
    pub fn remark(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != NOT_RECORDED)
    }

    /// Short label for diagnostics: the numeric id when known, otherwise the entity.
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("#{id} {}", self.entity_id),
            None => self.entity_id.clone(),
        }
    }
}

/// Identity of a monitored entity. The same identifier under two categories is two devices.
///
/// Both parts are stored trimmed, so `"SW-1 "` and `"SW-1"` are the same entity wherever a key
/// is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub category: String,
    pub entity_id: String,
}

impl EntityKey {
    pub fn new(category: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            category: category.into().trim().to_string(),
            entity_id: entity_id.into().trim().to_string(),
        }
    }

    pub fn of(incident: &Incident) -> Self {
        Self::new(incident.category.clone(), incident.entity_id.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
