use crate::normalize::{normalize_amount, normalize_categorical, normalize_date, normalize_text};
use crate::reconcile::ReconciledSheet;
use crate::schema::{Cell, ProcessReport, ProposalRecord, RowSet, PROPOSAL_ALIASES};
use log::{debug, info};
use serde::Serialize;

/// A processed proposal dataset plus its build diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalOutcome {
    pub records: Vec<ProposalRecord>,
    pub report: ProcessReport,
}

/// Orchestrates reconciliation and normalization for proposal rows.
///
/// Unlike the payment variant there is no pending-amount derivation and no
/// date fallback chain: `date` and `wo_date` are independent columns, and a
/// missing or unparseable `year` coerces to zero rather than borrowing the
/// calendar year.
#[derive(Default)]
pub struct ProposalProcessor;

impl ProposalProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, rows: &RowSet) -> ProposalOutcome {
        let sheet = ReconciledSheet::new(rows, PROPOSAL_ALIASES);

        let mut report = ProcessReport {
            row_count: rows.len(),
            mapped_columns: sheet.mapped_columns(),
            ..Default::default()
        };
        for (raw, canonical) in &report.mapped_columns {
            debug!("mapped column '{}' -> '{}'", raw, canonical);
        }

        let col = |name: &str| sheet.canonical_column(name);

        let s_no_col = col("s_no");
        let year_col = col("year");
        let date_col = col("date");
        let wo_date_col = col("wo_date");
        let no_col = col("no");
        let name_col = col("name");
        let industry_col = col("industry_type");
        let district_col = col("district");
        let scope_col = col("scope_of_work");
        let kind_col = col("type");
        let source_col = col("source");
        let status_col = col("status");
        let ref_col = col("refrence_no");
        let contact_col = col("contact_person");
        let amount_col = col("amount");
        let present_col = col("present_status");

        for (name, bound) in [
            ("s_no", s_no_col),
            ("year", year_col),
            ("date", date_col),
            ("wo_date", wo_date_col),
            ("no", no_col),
            ("name", name_col),
            ("industry_type", industry_col),
            ("district", district_col),
            ("scope_of_work", scope_col),
            ("type", kind_col),
            ("source", source_col),
            ("status", status_col),
            ("refrence_no", ref_col),
            ("contact_person", contact_col),
            ("amount", amount_col),
            ("present_status", present_col),
        ] {
            if bound.is_none() {
                info!("column '{}' not found, synthesizing defaults", name);
                report.synthesized_columns.push(name.to_string());
            }
        }

        let mut records = Vec::with_capacity(rows.len());

        for row in 0..sheet.row_count() {
            let text_at = |c: Option<usize>| {
                c.map(|c| normalize_text(sheet.cell(row, c)))
                    .unwrap_or_default()
            };
            let status_at = |c: Option<usize>| {
                c.map(|c| normalize_categorical(sheet.cell(row, c)))
                    .unwrap_or_else(|| "Unknown".to_string())
            };

            records.push(ProposalRecord {
                s_no: text_at(s_no_col),
                year: year_col
                    .map(|c| parse_year(sheet.cell(row, c)))
                    .unwrap_or(0),
                date: date_col.and_then(|c| normalize_date(sheet.cell(row, c))),
                wo_date: wo_date_col.and_then(|c| normalize_date(sheet.cell(row, c))),
                no: text_at(no_col),
                name: text_at(name_col),
                industry_type: text_at(industry_col),
                district: text_at(district_col),
                scope_of_work: text_at(scope_col),
                kind: text_at(kind_col),
                source: text_at(source_col),
                status: status_at(status_col),
                refrence_no: text_at(ref_col),
                contact_person: text_at(contact_col),
                amount: amount_col
                    .map(|c| normalize_amount(sheet.cell(row, c)).or_zero())
                    .unwrap_or(0.0),
                present_status: status_at(present_col),
            });
        }

        info!("processed {} proposal records", records.len());

        ProposalOutcome { records, report }
    }
}

/// Coerces a year cell to an integer; unparseable values become 0. A numeric
/// cell truncates toward zero, so a sheet's `2023.0` reads as 2023.
fn parse_year(cell: &Cell) -> i32 {
    match cell {
        Cell::Number(n) => *n as i32,
        Cell::Empty => 0,
        Cell::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i32>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i32))
                .unwrap_or(0)
        }
    }
}
