use crate::error::{PipelineError, Result};
use crate::schema::{Cell, RowSet};
use crate::source::RowSource;
use log::warn;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a worksheet through the spreadsheet backend's public CSV export.
///
/// The export endpoint has accumulated several URL shapes over the years and
/// not every deployment answers on all of them, so each variant is tried in
/// order and the first parseable response wins. Authenticated API access is
/// a different collaborator entirely; this source only covers sheets shared
/// by link.
pub struct CsvExportSource {
    spreadsheet_id: String,
    gid: String,
    label: String,
}

impl CsvExportSource {
    pub fn new(spreadsheet_id: impl Into<String>, gid: impl Into<String>) -> Self {
        let spreadsheet_id = spreadsheet_id.into();
        let gid = gid.into();
        let label = format!("csv-export:{}#{}", spreadsheet_id, gid);
        Self {
            spreadsheet_id,
            gid,
            label,
        }
    }

    fn export_urls(&self) -> [String; 3] {
        [
            format!(
                "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
                self.spreadsheet_id, self.gid
            ),
            format!(
                "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&gid={}",
                self.spreadsheet_id, self.gid
            ),
            format!(
                "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
                self.spreadsheet_id
            ),
        ]
    }
}

impl RowSource for CsvExportSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<RowSet> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| PipelineError::SourceUnavailable {
                source_name: self.label.clone(),
                details: err.to_string(),
            })?;

        let mut last_failure = String::new();

        for url in self.export_urls() {
            let body = client
                .get(&url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text());

            match body {
                Ok(body) => match parse_csv(&body, &self.label) {
                    Ok(rows) if !rows.is_empty() => return Ok(rows),
                    Ok(_) => {
                        warn!("'{}' answered with an empty sheet", url);
                        last_failure = "empty sheet".to_string();
                    }
                    Err(err) => {
                        warn!("'{}' answered with unparseable CSV: {}", url, err);
                        last_failure = err.to_string();
                    }
                },
                Err(err) => {
                    warn!("'{}' failed: {}", url, err);
                    last_failure = err.to_string();
                }
            }
        }

        Err(PipelineError::SourceUnavailable {
            source_name: self.label.clone(),
            details: last_failure,
        })
    }
}

/// Parses a CSV export body into a row-set. Columns with a blank header (the
/// export's filler columns) are dropped, as are rows whose kept cells are all
/// empty. Every cell stays text; numeric coercion happens downstream.
pub fn parse_csv(body: &str, label: &str) -> Result<RowSet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| PipelineError::SourceUnavailable {
            source_name: label.to_string(),
            details: err.to_string(),
        })?
        .clone();

    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.trim().is_empty())
        .map(|(idx, _)| idx)
        .collect();

    let mut rows = RowSet::new(
        kept.iter()
            .map(|&idx| headers[idx].trim().to_string())
            .collect(),
    );

    for record in reader.records() {
        let record = record.map_err(|err| PipelineError::SourceUnavailable {
            source_name: label.to_string(),
            details: err.to_string(),
        })?;

        let cells: Vec<Cell> = kept
            .iter()
            .map(|&idx| {
                let field = record.get(idx).unwrap_or("");
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();

        if cells.iter().all(|c| matches!(c, Cell::Empty)) {
            continue;
        }

        rows.push_row(cells)?;
    }

    Ok(rows)
}
