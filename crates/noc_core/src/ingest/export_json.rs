use crate::error::{AppError, INGEST_JSON_INVALID};
use crate::ingest::{collect_rows, IncidentExportRow, IngestSummary};

/// Parse a JSON array of export rows (the shape the incidents API returns).
///
/// Only a document that is not an array at all is an error. Each element is decoded on its own,
/// so a single malformed row is skipped with a warning.
pub fn ingest_incidents_json(json_text: &str) -> Result<IngestSummary, AppError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json_text).map_err(|e| {
        AppError::new(INGEST_JSON_INVALID, "Incident export is not a JSON array of incidents")
            .with_details(e.to_string())
    })?;
    Ok(collect_rows(values.into_iter().enumerate().map(|(i, value)| {
        let row = serde_json::from_value::<IncidentExportRow>(value).map_err(|e| e.to_string());
        (i + 1, row)
    })))
}
