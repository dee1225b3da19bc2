use crate::normalize::{normalize_amount, normalize_categorical, normalize_date, normalize_text};
use crate::reconcile::ReconciledSheet;
use crate::schema::{PaymentRecord, PendingCheck, ProcessReport, RowSet, PAYMENT_ALIASES};
use chrono::{Datelike, Local};
use log::{debug, info};
use serde::Serialize;

/// A processed payment dataset plus the diagnostics gathered while building
/// it. The dataset is rebuilt wholesale on every fetch; nothing here is
/// mutated across refreshes.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOutcome {
    pub records: Vec<PaymentRecord>,
    pub report: ProcessReport,
}

/// Orchestrates reconciliation and normalization for payment ledger rows.
///
/// The only configuration is the year substituted when a record's date is
/// unresolvable; the default constructor reads the current calendar year,
/// tests pin it explicitly.
pub struct PaymentProcessor {
    fallback_year: i32,
}

impl Default for PaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentProcessor {
    pub fn new() -> Self {
        Self {
            fallback_year: Local::now().year(),
        }
    }

    pub fn with_fallback_year(year: i32) -> Self {
        Self {
            fallback_year: year,
        }
    }

    pub fn process(&self, rows: &RowSet) -> PaymentOutcome {
        let sheet = ReconciledSheet::new(rows, PAYMENT_ALIASES);

        let mut report = ProcessReport {
            row_count: rows.len(),
            mapped_columns: sheet.mapped_columns(),
            ..Default::default()
        };
        for (raw, canonical) in &report.mapped_columns {
            debug!("mapped column '{}' -> '{}'", raw, canonical);
        }

        let unit_col = sheet.canonical_column("unit_name");
        let wo_col = sheet.canonical_column("work_order_no");
        let order_col = sheet.canonical_column("order_amount");
        let final_col = sheet.canonical_column("final_amount");
        let received_col = sheet.canonical_column("payment_received");
        let pending_col = sheet.canonical_column("pending_amount");
        let mode_col = sheet.canonical_column("payment_mode");
        let status_col = sheet.canonical_column("work_status");

        // The payment sheets historically label their date column three
        // different ways; the first present one wins for the whole dataset.
        let date_col = sheet
            .canonical_column("date")
            .or_else(|| sheet.unbound_column("p_date"))
            .or_else(|| sheet.unbound_column("payment_date"));

        for (name, col) in [
            ("unit_name", unit_col),
            ("work_order_no", wo_col),
            ("order_amount", order_col),
            ("final_amount", final_col),
            ("payment_received", received_col),
            ("payment_mode", mode_col),
            ("work_status", status_col),
            ("date", date_col),
        ] {
            if col.is_none() {
                info!("column '{}' not found, synthesizing defaults", name);
                report.synthesized_columns.push(name.to_string());
            }
        }

        let mut records = Vec::with_capacity(rows.len());
        let mut provided_total = 0.0;
        let mut derived_total = 0.0;

        for row in 0..sheet.row_count() {
            let amount_at = |col: Option<usize>| {
                col.map(|c| normalize_amount(sheet.cell(row, c)).or_zero())
                    .unwrap_or(0.0)
            };

            let order_amount = amount_at(order_col);
            let final_amount = amount_at(final_col);
            let payment_received = amount_at(received_col);

            // The sheet's own pending value feeds the diagnostic comparison
            // only; the stored value is always derived.
            provided_total += amount_at(pending_col);
            let pending_amount = (final_amount - payment_received).max(0.0);
            derived_total += pending_amount;

            let date = date_col.and_then(|c| normalize_date(sheet.cell(row, c)));

            records.push(PaymentRecord {
                unit_name: unit_col
                    .map(|c| normalize_text(sheet.cell(row, c)))
                    .unwrap_or_default(),
                work_order_no: wo_col
                    .map(|c| normalize_text(sheet.cell(row, c)))
                    .unwrap_or_default(),
                order_amount,
                final_amount,
                payment_received,
                pending_amount,
                payment_mode: mode_col
                    .map(|c| normalize_categorical(sheet.cell(row, c)))
                    .unwrap_or_else(|| "Unknown".to_string()),
                work_status: status_col
                    .map(|c| normalize_categorical(sheet.cell(row, c)))
                    .unwrap_or_else(|| "Unknown".to_string()),
                year: date.map(|d| d.year()).unwrap_or(self.fallback_year),
                date,
            });
        }

        if pending_col.is_some() {
            let check = PendingCheck {
                provided_total,
                derived_total,
            };
            debug!(
                "pending amount check: provided {:.2}, derived {:.2}",
                check.provided_total, check.derived_total
            );
            report.pending_check = Some(check);
        }

        info!("processed {} payment records", records.len());

        PaymentOutcome { records, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Cell;
    use chrono::NaiveDate;

    fn sheet(columns: &[&str], rows: &[&[Cell]]) -> RowSet {
        let mut set = RowSet::new(columns.iter().map(|s| s.to_string()).collect());
        for row in rows {
            set.push_row(row.to_vec()).unwrap();
        }
        set
    }

    #[test]
    fn test_pending_amount_is_always_derived() {
        let rows = sheet(
            &["Final Amount", "Payment Received", "Pending Amount"],
            &[
                &[
                    Cell::from("1,000.00"),
                    Cell::from("400.00"),
                    Cell::from("999,999.00"),
                ],
                &[Cell::from("500.00"), Cell::from("800.00"), Cell::from("0")],
            ],
        );

        let outcome = PaymentProcessor::with_fallback_year(2024).process(&rows);

        // Row 1: 1000 - 400, ignoring the sheet's 999999.
        assert_eq!(outcome.records[0].pending_amount, 600.0);
        // Row 2: overpaid clips to zero.
        assert_eq!(outcome.records[1].pending_amount, 0.0);

        let check = outcome.report.pending_check.unwrap();
        assert_eq!(check.provided_total, 999999.0);
        assert_eq!(check.derived_total, 600.0);
        assert!(check.discrepancy() > 100.0);
    }

    #[test]
    fn test_missing_monetary_columns_synthesize_zero() {
        let rows = sheet(&["Unit Name"], &[&[Cell::from("Unit A")]]);

        let outcome = PaymentProcessor::with_fallback_year(2024).process(&rows);
        let record = &outcome.records[0];

        assert_eq!(record.order_amount, 0.0);
        assert_eq!(record.final_amount, 0.0);
        assert_eq!(record.payment_received, 0.0);
        assert_eq!(record.pending_amount, 0.0);
        assert!(outcome
            .report
            .synthesized_columns
            .iter()
            .any(|c| c == "order_amount"));
        assert!(outcome.report.pending_check.is_none());
    }

    #[test]
    fn test_categoricals_default_and_title_case() {
        let rows = sheet(
            &["Work Status", "Payment Mode"],
            &[
                &[Cell::from("  in progress "), Cell::from("CASH AND ONLINE")],
                &[Cell::Empty, Cell::Empty],
            ],
        );

        let outcome = PaymentProcessor::with_fallback_year(2024).process(&rows);
        assert_eq!(outcome.records[0].work_status, "In Progress");
        assert_eq!(outcome.records[0].payment_mode, "Cash And Online");
        assert_eq!(outcome.records[1].work_status, "Unknown");
        assert_eq!(outcome.records[1].payment_mode, "Unknown");
    }

    #[test]
    fn test_date_fallback_chain_prefers_date() {
        let rows = sheet(
            &["Date", "P Date"],
            &[&[Cell::from("01/02/2024"), Cell::from("15/03/2023")]],
        );

        let outcome = PaymentProcessor::with_fallback_year(2020).process(&rows);
        assert_eq!(
            outcome.records[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(outcome.records[0].year, 2024);
    }

    #[test]
    fn test_year_falls_back_when_date_unresolvable() {
        let rows = sheet(
            &["Date", "Final Amount"],
            &[&[Cell::from("not a date"), Cell::from("100")]],
        );

        let outcome = PaymentProcessor::with_fallback_year(2022).process(&rows);
        assert_eq!(outcome.records[0].date, None);
        assert_eq!(outcome.records[0].year, 2022);
    }

    #[test]
    fn test_no_date_column_at_all() {
        let rows = sheet(&["Final Amount"], &[&[Cell::from("100")]]);

        let outcome = PaymentProcessor::with_fallback_year(2021).process(&rows);
        assert_eq!(outcome.records[0].date, None);
        assert_eq!(outcome.records[0].year, 2021);
        assert!(outcome
            .report
            .synthesized_columns
            .iter()
            .any(|c| c == "date"));
    }

    #[test]
    fn test_mapped_columns_reported() {
        let rows = sheet(
            &["Client", "Grand Total"],
            &[&[Cell::from("Unit A"), Cell::from("5,000")]],
        );

        let outcome = PaymentProcessor::with_fallback_year(2024).process(&rows);
        assert!(outcome
            .report
            .mapped_columns
            .contains(&("Client".to_string(), "unit_name".to_string())));
        assert!(outcome
            .report
            .mapped_columns
            .contains(&("Grand Total".to_string(), "final_amount".to_string())));
        assert_eq!(outcome.records[0].final_amount, 5000.0);
    }
}
