use crate::error::{PipelineError, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell as delivered by a source collaborator.
///
/// Sources hand over whatever the sheet contains: numbers where the author
/// typed a number, text everywhere else, and `Empty` for blank cells. The
/// untagged representation lets a JSON row-set deserialize without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// True for `Empty` and for text that trims to nothing.
    pub fn is_empty_like(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// A raw row-set: one shared set of human-entered column labels and the rows
/// beneath them. All rows in a fetch share the same column set, so the
/// representation is columnar-by-header rather than per-row maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, rejecting rows that do not line up with the header.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonical field name plus its ordered list of recognized raw-label
/// variants. Declaration order is the contract: the reconciler binds the
/// first alias that matches, so inserting a new alias ahead of an existing
/// one changes which sheet column wins when several plausible candidates are
/// present.
pub type AliasTable = &'static [(&'static str, &'static [&'static str])];

pub const PAYMENT_ALIASES: AliasTable = &[
    (
        "unit_name",
        &["unit_name", "unit", "unitname", "name", "client", "customer"],
    ),
    (
        "work_order_no",
        &[
            "work_order_no",
            "work_order",
            "wo_no",
            "order_no",
            "workorder",
            "wo_number",
        ],
    ),
    (
        "order_amount",
        &[
            "order_amount",
            "order",
            "amount",
            "order_amt",
            "initial_amount",
            "quoted_amount",
        ],
    ),
    (
        "final_amount",
        &[
            "final_amount",
            "final",
            "final_amt",
            "total_amount",
            "grand_total",
            "invoice_amount",
        ],
    ),
    (
        "payment_received",
        &[
            "payment_received",
            "received",
            "paid",
            "amount_received",
            "paid_amount",
        ],
    ),
    (
        "pending_amount",
        &[
            "pending_amount",
            "pending",
            "balance",
            "due_amount",
            "outstanding",
            "remaining",
        ],
    ),
    (
        "payment_mode",
        &["payment_mode", "mode", "payment_type", "type", "payment_method"],
    ),
    (
        "work_status",
        &[
            "work_status",
            "status",
            "job_status",
            "project_status",
            "completion_status",
        ],
    ),
    (
        "date",
        &[
            "date",
            "p_date",
            "payment_date",
            "transaction_date",
            "invoice_date",
            "entry_date",
        ],
    ),
];

pub const PROPOSAL_ALIASES: AliasTable = &[
    ("s_no", &["s_no", "sno", "sl_no", "serial_no", "serial_number"]),
    ("year", &["year", "yr", "year_"]),
    ("date", &["date", "proposal_date", "submission_date"]),
    ("wo_date", &["wo_date", "work_order_date", "order_date"]),
    ("no", &["no", "wo_no", "work_order_no", "order_no"]),
    (
        "name",
        &["name", "client_name", "company", "customer", "client"],
    ),
    (
        "industry_type",
        &["industry_type", "industry", "business_type", "sector"],
    ),
    ("district", &["district", "location", "city_district", "area"]),
    (
        "scope_of_work",
        &["scope_of_work", "scope", "work_scope", "description"],
    ),
    ("type", &["type", "proposal_type", "category"]),
    ("source", &["source", "lead_source", "referral_source"]),
    ("status", &["status", "proposal_status", "current_status"]),
    (
        "refrence_no",
        &["refrence_no", "reference_no", "ref_no", "proposal_no"],
    ),
    (
        "contact_person",
        &["contact_person", "contact", "person", "representative"],
    ),
    (
        "amount",
        &["amount", "proposal_amount", "value", "quoted_amount"],
    ),
    (
        "present_status",
        &["present_status", "current_status", "latest_status", "status_update"],
    ),
];

/// A payment ledger row after reconciliation and normalization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaymentRecord {
    pub unit_name: String,
    pub work_order_no: String,
    pub order_amount: f64,
    pub final_amount: f64,
    pub payment_received: f64,

    #[schemars(
        description = "Always derived as max(0, final_amount - payment_received); a source-provided pending value is never stored here."
    )]
    pub pending_amount: f64,

    #[schemars(description = "Trimmed and title-cased; 'Unknown' when the sheet had no value.")]
    pub payment_mode: String,

    #[schemars(description = "Trimmed and title-cased; 'Unknown' when the sheet had no value.")]
    pub work_status: String,

    pub date: Option<NaiveDate>,

    #[schemars(
        description = "Year of the resolved date, or the processing fallback year when the date is unresolvable."
    )]
    pub year: i32,
}

/// A sales proposal row after reconciliation and normalization.
///
/// `refrence_no` keeps the sheet's own spelling so exports round-trip
/// against the source column.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProposalRecord {
    pub s_no: String,

    #[schemars(description = "Parsed integer year; 0 when absent or unparseable.")]
    pub year: i32,

    pub date: Option<NaiveDate>,
    pub wo_date: Option<NaiveDate>,
    pub no: String,
    pub name: String,
    pub industry_type: String,
    pub district: String,
    pub scope_of_work: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub source: String,
    pub status: String,
    pub refrence_no: String,
    pub contact_person: String,
    pub amount: f64,
    pub present_status: String,
}

impl PaymentRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PaymentRecord)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

impl ProposalRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ProposalRecord)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

/// Structured diagnostics from one processing run. This replaces the ambient
/// debug logging the source sheets' operators previously relied on: callers
/// get the mapping decisions and defaults back as data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessReport {
    pub row_count: usize,

    /// Raw label -> canonical name, one entry per alias binding that was not
    /// already the identity.
    pub mapped_columns: Vec<(String, String)>,

    /// Canonical columns that were absent from the sheet and synthesized with
    /// default values.
    pub synthesized_columns: Vec<String>,

    /// Present only for payment runs that had pending data to compare.
    pub pending_check: Option<PendingCheck>,
}

/// Diagnostic comparison of the sheet-provided pending total against the
/// derived one. The provided value is never used for display or aggregation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PendingCheck {
    pub provided_total: f64,
    pub derived_total: f64,
}

impl PendingCheck {
    pub fn discrepancy(&self) -> f64 {
        (self.provided_total - self.derived_total).abs()
    }
}
