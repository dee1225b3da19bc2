use crate::schema::{PaymentRecord, ProposalRecord};
use serde::{Deserialize, Serialize};

/// Record-level filter criteria for a payment dataset. `None` means "all";
/// the amount range is inclusive and applies to `final_amount`.
///
/// Filters are plain values handed to the pipeline by the caller; selection
/// state lives with the presentation layer, never inside the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentFilter {
    pub work_status: Option<String>,
    pub payment_mode: Option<String>,
    pub unit_name: Option<String>,
    pub amount_range: Option<(f64, f64)>,
}

impl PaymentFilter {
    pub fn matches(&self, record: &PaymentRecord) -> bool {
        if let Some(status) = &self.work_status {
            if record.work_status != *status {
                return false;
            }
        }
        if let Some(mode) = &self.payment_mode {
            if record.payment_mode != *mode {
                return false;
            }
        }
        if let Some(unit) = &self.unit_name {
            if record.unit_name != *unit {
                return false;
            }
        }
        if let Some((lo, hi)) = self.amount_range {
            if record.final_amount < lo || record.final_amount > hi {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[PaymentRecord]) -> Vec<PaymentRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

/// Record-level filter criteria for a proposal dataset; the amount range is
/// inclusive and applies to `amount`, `client` matches the full `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalFilter {
    pub status: Option<String>,
    pub present_status: Option<String>,
    pub client: Option<String>,
    pub amount_range: Option<(f64, f64)>,
}

impl ProposalFilter {
    pub fn matches(&self, record: &ProposalRecord) -> bool {
        if let Some(status) = &self.status {
            if record.status != *status {
                return false;
            }
        }
        if let Some(present) = &self.present_status {
            if record.present_status != *present {
                return false;
            }
        }
        if let Some(client) = &self.client {
            if record.name != *client {
                return false;
            }
        }
        if let Some((lo, hi)) = self.amount_range {
            if record.amount < lo || record.amount > hi {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[ProposalRecord]) -> Vec<ProposalRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
