//! # Sheet Insights
//!
//! A library for normalizing tabular records pulled from spreadsheet sources
//! with no fixed, guaranteed column layout into canonical payment and
//! proposal datasets, and for computing derived insights over them.
//!
//! ## Core Concepts
//!
//! - **Row-set**: raw sheet rows under one shared set of human-entered
//!   column labels, exactly as a source collaborator delivered them
//! - **Reconciliation**: binding those labels onto a closed canonical schema
//!   via per-dataset alias tables, first-match-wins over declared order
//! - **Normalization**: coercing locale-formatted currency strings and
//!   day-first dates into typed values, absorbing malformed cells as
//!   defaults instead of errors
//! - **Derivation**: fields computed from other fields (`pending_amount`,
//!   `year`) that override whatever the sheet provided
//! - **Insights**: read-only aggregations recomputed from each dataset
//!   snapshot
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheet_insights::*;
//!
//! let (rows, used_demo) = fetch_or_demo(&[&my_source], demo_payment_rows());
//! let outcome = process_payment_rows(&rows);
//!
//! let insights = summarize_payments(&outcome.records);
//! println!("pending: {:.2}", insights.total_pending_amount);
//! if used_demo {
//!     println!("showing demonstration data");
//! }
//! ```

pub mod error;
pub mod export;
pub mod filter;
pub mod insights;
pub mod normalize;
pub mod payment;
pub mod proposal;
pub mod reconcile;
pub mod schema;
pub mod source;

#[cfg(feature = "sheets")]
pub mod sheets;

pub use error::{PipelineError, Result};
pub use export::{payment_csv, proposal_csv};
pub use filter::{PaymentFilter, ProposalFilter};
pub use insights::{
    summarize_payments, summarize_proposals, Distribution, PaymentInsights, ProposalInsights,
    YearlyTotals,
};
pub use normalize::{normalize_amount, normalize_date, title_case, AmountParse};
pub use payment::{PaymentOutcome, PaymentProcessor};
pub use proposal::{ProposalOutcome, ProposalProcessor};
pub use reconcile::{clean_column_name, reconcile, ReconciledSheet, RenameMap};
pub use schema::*;
pub use source::{demo_payment_rows, fetch_first, fetch_or_demo, RowSource, StaticSource};

#[cfg(feature = "sheets")]
pub use sheets::CsvExportSource;

/// Processes a payment row-set with the default processor (the fallback year
/// for dateless records is the current calendar year).
pub fn process_payment_rows(rows: &RowSet) -> PaymentOutcome {
    PaymentProcessor::new().process(rows)
}

/// Processes a proposal row-set.
pub fn process_proposal_rows(rows: &RowSet) -> ProposalOutcome {
    ProposalProcessor::new().process(rows)
}
