use crate::error::{PipelineError, Result};
use crate::schema::{Cell, RowSet};
use log::{info, warn};

/// A collaborator that can produce one raw row-set per fetch. Fetching is
/// blocking and synchronous; the pipeline performs no I/O of its own and
/// never retries a source internally; ordering and fallback policy belong
/// to the caller.
pub trait RowSource {
    fn label(&self) -> &str;

    /// Returns the row-set, or an error for both unavailability and an empty
    /// sheet: emptiness is an explicit absence signal, not a silent dataset.
    fn fetch(&self) -> Result<RowSet>;
}

/// An in-memory source. Carries the demonstration data and doubles as a test
/// stand-in for the network-backed sources.
pub struct StaticSource {
    label: String,
    rows: RowSet,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, rows: RowSet) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }
}

impl RowSource for StaticSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<RowSet> {
        if self.rows.is_empty() {
            return Err(PipelineError::EmptySheet {
                source_name: self.label.clone(),
            });
        }
        Ok(self.rows.clone())
    }
}

/// Tries each source in order and returns the first non-empty row-set.
/// Failures are logged and skipped; they never abort the refresh cycle.
pub fn fetch_first(sources: &[&dyn RowSource]) -> Result<RowSet> {
    for source in sources {
        match source.fetch() {
            Ok(rows) if !rows.is_empty() => {
                info!("loaded {} rows from source '{}'", rows.len(), source.label());
                return Ok(rows);
            }
            Ok(_) => warn!("source '{}' returned no rows", source.label()),
            Err(err) => warn!("source '{}' failed: {}", source.label(), err),
        }
    }

    Err(PipelineError::AllSourcesFailed {
        attempted: sources.len(),
    })
}

/// The fallback contract: when no live row-set can be obtained, the provided
/// demonstration row-set is returned instead, flagged so the caller can warn
/// the user. The demonstration data goes through the same pipeline as live
/// data; there is no separate code path.
pub fn fetch_or_demo(sources: &[&dyn RowSource], demo: RowSet) -> (RowSet, bool) {
    match fetch_first(sources) {
        Ok(rows) => (rows, false),
        Err(err) => {
            warn!("using demonstration data: {}", err);
            (demo, true)
        }
    }
}

/// The fixed demonstration payment row-set: four synthetic records shaped
/// exactly like the production sheet, grouped-comma amounts and day-first
/// dates included, so the full normalization path gets exercised end to end.
pub fn demo_payment_rows() -> RowSet {
    let mut rows = RowSet::new(
        [
            "Unit Name",
            "Work Order No",
            "Order Amount",
            "Final Amount",
            "Payment Received",
            "Pending Amount",
            "Payment Mode",
            "Work Status",
            "Date",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );

    let data: [[&str; 9]; 4] = [
        [
            "Unit A",
            "WO001",
            "79,290,940.00",
            "91,102,303.30",
            "36,923,263.30",
            "54,179,040.00",
            "Online",
            "Completed",
            "01/01/2024",
        ],
        [
            "Unit B",
            "WO002",
            "65,000,000.00",
            "75,000,000.00",
            "30,000,000.00",
            "45,000,000.00",
            "Cash",
            "In Progress",
            "15/01/2024",
        ],
        [
            "Unit C",
            "WO003",
            "45,500,000.00",
            "52,500,000.00",
            "25,000,000.00",
            "27,500,000.00",
            "Cheque",
            "Pending",
            "20/01/2024",
        ],
        [
            "Unit D",
            "WO004",
            "38,750,000.00",
            "44,750,000.00",
            "18,500,000.00",
            "26,250,000.00",
            "Cash and Online",
            "Completed",
            "25/01/2024",
        ],
    ];

    for row in data {
        rows.push_row(row.iter().map(|s| Cell::from(*s)).collect())
            .expect("demonstration rows match the header width");
    }

    rows
}
