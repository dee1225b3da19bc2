use crate::schema::{PaymentRecord, ProposalRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Frequency distribution of a categorical field, ordered by descending
/// count with ties broken by label so recomputation is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution(Vec<(String, usize)>);

impl Distribution {
    pub fn tally<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }

        let mut entries: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self(entries)
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sums `values` per label, descending by total. Labels whose total is not
/// positive are dropped when `drop_nonpositive` is set (charts have no use
/// for zero slices).
fn sum_by_label<'a, I>(pairs: I, drop_nonpositive: bool) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for (label, value) in pairs {
        *totals.entry(label).or_default() += value;
    }

    let mut entries: Vec<(String, f64)> = totals
        .into_iter()
        .filter(|(_, total)| !drop_nonpositive || *total > 0.0)
        .map(|(label, total)| (label.to_string(), total))
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    entries
}

/// Per-year sums of the payment monetary columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyTotals {
    pub year: i32,
    pub order_amount: f64,
    pub final_amount: f64,
    pub payment_received: f64,
    pub pending_amount: f64,
}

/// Read-only aggregation over one payment dataset snapshot. Recomputed from
/// the full dataset on every call; nothing is cached across refreshes.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentInsights {
    pub record_count: usize,
    pub total_order_amount: f64,
    pub total_final_amount: f64,
    pub total_payment_received: f64,
    pub total_pending_amount: f64,
    pub work_status_distribution: Distribution,
    pub payment_mode_distribution: Distribution,
    /// Pending value grouped by work status, positive groups only.
    pub pending_by_work_status: Vec<(String, f64)>,
    /// Received value grouped by payment mode, positive groups only.
    pub received_by_payment_mode: Vec<(String, f64)>,
    /// Ascending by year.
    pub yearly_totals: Vec<YearlyTotals>,
}

pub fn summarize_payments(records: &[PaymentRecord]) -> PaymentInsights {
    let mut yearly: BTreeMap<i32, YearlyTotals> = BTreeMap::new();
    for record in records {
        let totals = yearly.entry(record.year).or_insert(YearlyTotals {
            year: record.year,
            order_amount: 0.0,
            final_amount: 0.0,
            payment_received: 0.0,
            pending_amount: 0.0,
        });
        totals.order_amount += record.order_amount;
        totals.final_amount += record.final_amount;
        totals.payment_received += record.payment_received;
        totals.pending_amount += record.pending_amount;
    }

    PaymentInsights {
        record_count: records.len(),
        total_order_amount: records.iter().map(|r| r.order_amount).sum(),
        total_final_amount: records.iter().map(|r| r.final_amount).sum(),
        total_payment_received: records.iter().map(|r| r.payment_received).sum(),
        total_pending_amount: records.iter().map(|r| r.pending_amount).sum(),
        work_status_distribution: Distribution::tally(
            records.iter().map(|r| r.work_status.as_str()),
        ),
        payment_mode_distribution: Distribution::tally(
            records.iter().map(|r| r.payment_mode.as_str()),
        ),
        pending_by_work_status: sum_by_label(
            records
                .iter()
                .map(|r| (r.work_status.as_str(), r.pending_amount)),
            true,
        ),
        received_by_payment_mode: sum_by_label(
            records
                .iter()
                .map(|r| (r.payment_mode.as_str(), r.payment_received)),
            true,
        ),
        yearly_totals: yearly.into_values().collect(),
    }
}

/// Read-only aggregation over one proposal dataset snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalInsights {
    pub total_proposals: usize,
    pub total_value: f64,
    pub status_distribution: Distribution,
    pub present_status_distribution: Distribution,
    pub industry_distribution: Distribution,
    pub district_distribution: Distribution,
    pub source_distribution: Distribution,
    /// Ascending by year.
    pub yearly_distribution: Vec<(i32, usize)>,
    /// Proposal value grouped by status, descending.
    pub value_by_status: Vec<(String, f64)>,
    /// Top clients by summed proposal value; the client key is the name up
    /// to the first comma. At most ten entries.
    pub top_clients: Vec<(String, f64)>,
    /// Percentage of proposals whose status is "OK" (case-insensitive);
    /// zero for an empty dataset rather than a division error.
    pub conversion_rate: f64,
}

pub fn summarize_proposals(records: &[ProposalRecord]) -> ProposalInsights {
    let total = records.len();

    let ok_count = records
        .iter()
        .filter(|r| r.status.to_uppercase() == "OK")
        .count();
    let conversion_rate = if total == 0 {
        0.0
    } else {
        ok_count as f64 / total as f64 * 100.0
    };

    let mut yearly: BTreeMap<i32, usize> = BTreeMap::new();
    for record in records {
        *yearly.entry(record.year).or_default() += 1;
    }

    let mut top_clients = sum_by_label(
        records
            .iter()
            .map(|r| (client_short_name(&r.name), r.amount)),
        false,
    );
    top_clients.truncate(10);

    ProposalInsights {
        total_proposals: total,
        total_value: records.iter().map(|r| r.amount).sum(),
        status_distribution: Distribution::tally(records.iter().map(|r| r.status.as_str())),
        present_status_distribution: Distribution::tally(
            records.iter().map(|r| r.present_status.as_str()),
        ),
        industry_distribution: Distribution::tally(
            records.iter().map(|r| r.industry_type.as_str()),
        ),
        district_distribution: Distribution::tally(records.iter().map(|r| r.district.as_str())),
        source_distribution: Distribution::tally(records.iter().map(|r| r.source.as_str())),
        yearly_distribution: yearly.into_iter().collect(),
        value_by_status: sum_by_label(
            records.iter().map(|r| (r.status.as_str(), r.amount)),
            false,
        ),
        top_clients,
        conversion_rate,
    }
}

fn client_short_name(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}
