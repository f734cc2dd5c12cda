use crate::error::{AppError, INGEST_CSV_INVALID, INGEST_MISSING_COLUMN};
use crate::ingest::{collect_rows, IncidentExportRow, IngestSummary};

const REQUIRED_COLUMNS: [&str; 2] = ["category", "subValue"];

/// Parse a CSV export with a header row naming the export fields.
///
/// Unknown columns are ignored; `category` and `subValue` are required. Rows that fail to decode
/// are skipped with a warning.
pub fn ingest_incidents_csv(csv_text: &str) -> Result<IngestSummary, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| {
            AppError::new(INGEST_CSV_INVALID, "Failed to read CSV headers")
                .with_details(e.to_string())
        })?
        .clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            let seen: Vec<&str> = headers.iter().collect();
            return Err(AppError::new(
                INGEST_MISSING_COLUMN,
                format!("Missing required column {required}"),
            )
            .with_details(format!("headers={}", seen.join(","))));
        }
    }

    let rows: Vec<(usize, Result<IncidentExportRow, String>)> = rdr
        .deserialize::<IncidentExportRow>()
        .enumerate()
        .map(|(i, result)| (i + 1, result.map_err(|e| e.to_string())))
        .collect();

    Ok(collect_rows(rows))
}
