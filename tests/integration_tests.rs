use chrono::NaiveDate;
use sheet_insights::*;

fn rows(columns: &[&str], data: &[&[&str]]) -> RowSet {
    let mut set = RowSet::new(columns.iter().map(|s| s.to_string()).collect());
    for row in data {
        let cells = row
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::from(*s)
                }
            })
            .collect();
        set.push_row(cells).unwrap();
    }
    set
}

#[test]
fn test_demo_payment_dataset_totals() {
    let outcome = PaymentProcessor::with_fallback_year(2024).process(&demo_payment_rows());
    let insights = summarize_payments(&outcome.records);

    assert_eq!(insights.record_count, 4);

    let expected_final = 91_102_303.30 + 75_000_000.00 + 52_500_000.00 + 44_750_000.00;
    assert!((insights.total_final_amount - expected_final).abs() < 1e-6);

    let expected_order = 79_290_940.00 + 65_000_000.00 + 45_500_000.00 + 38_750_000.00;
    assert!((insights.total_order_amount - expected_order).abs() < 1e-6);

    // Pending is derived per record, never read from the sheet.
    let expected_pending: f64 = outcome
        .records
        .iter()
        .map(|r| (r.final_amount - r.payment_received).max(0.0))
        .sum();
    assert!((insights.total_pending_amount - expected_pending).abs() < 1e-6);

    // The demo sheet's own pending column only shows up in the diagnostic,
    // and happens to agree with the derivation.
    let check = outcome.report.pending_check.unwrap();
    assert!(check.discrepancy() < 1.0);
}

#[test]
fn test_derived_pending_overrides_contradictory_sheet_values() {
    let sheet = rows(
        &["Unit Name", "Final Amount", "Payment Received", "Pending Amount"],
        &[
            &["Unit A", "10,000.00", "4,000.00", "99,999.00"],
            &["Unit B", "5,000.00", "6,000.00", "1,000.00"],
        ],
    );

    let outcome = PaymentProcessor::with_fallback_year(2024).process(&sheet);

    assert_eq!(outcome.records[0].pending_amount, 6000.0);
    assert_eq!(outcome.records[1].pending_amount, 0.0);

    let insights = summarize_payments(&outcome.records);
    assert_eq!(insights.total_pending_amount, 6000.0);

    // The contradiction is still visible to diagnostics.
    let check = outcome.report.pending_check.unwrap();
    assert_eq!(check.provided_total, 100999.0);
    assert_eq!(check.derived_total, 6000.0);
}

#[test]
fn test_messy_payment_sheet_reconciles_and_normalizes() {
    let sheet = rows(
        &[
            "Client",
            "W.O. Number",
            "Order Amt",
            "Grand Total",
            "Amount Received",
            "Due Amount",
            "Mode",
            "Job Status",
            "P Date",
        ],
        &[&[
            "  Sunrise Chemicals ",
            "WO-77",
            "₹ 1,25,000.00",
            "₹ 1,50,000.00",
            "₹ 50,000.00",
            "₹ 1,00,000.00",
            "online",
            "in progress",
            "05/06/2023",
        ]],
    );

    let outcome = PaymentProcessor::with_fallback_year(2024).process(&sheet);
    let record = &outcome.records[0];

    assert_eq!(record.unit_name, "Sunrise Chemicals");
    assert_eq!(record.work_order_no, "WO-77");
    assert_eq!(record.order_amount, 125000.0);
    assert_eq!(record.final_amount, 150000.0);
    assert_eq!(record.payment_received, 50000.0);
    assert_eq!(record.pending_amount, 100000.0);
    assert_eq!(record.payment_mode, "Online");
    assert_eq!(record.work_status, "In Progress");
    assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 6, 5));
    assert_eq!(record.year, 2023);

    assert!(outcome
        .report
        .mapped_columns
        .contains(&("Grand Total".to_string(), "final_amount".to_string())));
}

#[test]
fn test_reconciler_identity_and_precedence_via_public_api() {
    // Identity: canonical names map to themselves.
    let canonical: Vec<String> = PAYMENT_ALIASES
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    let map = reconcile(&canonical, PAYMENT_ALIASES);
    for (pos, (name, _)) in PAYMENT_ALIASES.iter().enumerate() {
        assert_eq!(map.get(name), Some(pos));
    }

    // Precedence: with both "paid" and "payment_received" present, the
    // earlier-declared alias wins and "paid" passes through.
    let map = reconcile(
        &["paid".to_string(), "payment_received".to_string()],
        PAYMENT_ALIASES,
    );
    assert_eq!(map.get("payment_received"), Some(1));
    assert!(!map.is_claimed(0));
}

#[test]
fn test_proposal_pipeline_and_conversion_rate() {
    let sheet = rows(
        &[
            "S No",
            "Year",
            "Date",
            "Client Name",
            "Industry",
            "District",
            "Proposal Amount",
            "Status",
            "Present Status",
        ],
        &[
            &[
                "1",
                "2023",
                "10/01/2023",
                "ACME Corp, Pune",
                "Chemicals",
                "Pune",
                "1,00,000",
                "OK",
                "Ongoing",
            ],
            &[
                "2",
                "2023",
                "12/02/2023",
                "Beta Pharma",
                "Pharma",
                "Mumbai",
                "2,00,000",
                "ok",
                "Approved",
            ],
            &[
                "3",
                "2023",
                "",
                "Gamma Textiles",
                "Textiles",
                "Surat",
                "50,000",
                "Drop",
                "Others",
            ],
            &[
                "4",
                "bad-year",
                "01/04/2024",
                "Delta Foods",
                "FMCG",
                "Pune",
                "",
                "Pending",
                "",
            ],
        ],
    );

    let outcome = ProposalProcessor::new().process(&sheet);
    assert_eq!(outcome.records.len(), 4);

    // Year coercion: unparseable becomes 0.
    assert_eq!(outcome.records[0].year, 2023);
    assert_eq!(outcome.records[3].year, 0);

    // Statuses title-case; blank present_status defaults to Unknown.
    assert_eq!(outcome.records[1].status, "Ok");
    assert_eq!(outcome.records[3].present_status, "Unknown");

    // Free text keeps its case.
    assert_eq!(outcome.records[0].name, "ACME Corp, Pune");

    let insights = summarize_proposals(&outcome.records);
    assert_eq!(insights.total_proposals, 4);
    assert_eq!(insights.conversion_rate, 50.0);
    assert!((insights.total_value - 350_000.0).abs() < 1e-9);
    assert_eq!(insights.district_distribution.count_of("Pune"), 2);
}

#[test]
fn test_empty_datasets_summarize_without_error() {
    let payments = summarize_payments(&[]);
    assert_eq!(payments.record_count, 0);
    assert_eq!(payments.total_pending_amount, 0.0);

    let proposals = summarize_proposals(&[]);
    assert_eq!(proposals.total_proposals, 0);
    assert_eq!(proposals.conversion_rate, 0.0);
}

#[test]
fn test_fallback_demo_data_flows_through_same_pipeline() {
    struct DeadSource;

    impl RowSource for DeadSource {
        fn label(&self) -> &str {
            "dead"
        }

        fn fetch(&self) -> Result<RowSet> {
            Err(PipelineError::SourceUnavailable {
                source_name: "dead".to_string(),
                details: "no route to host".to_string(),
            })
        }
    }

    let (fallback_rows, used_demo) = fetch_or_demo(&[&DeadSource], demo_payment_rows());
    assert!(used_demo);

    let processor = PaymentProcessor::with_fallback_year(2024);
    let from_fallback = processor.process(&fallback_rows);
    let from_demo = processor.process(&demo_payment_rows());

    assert_eq!(from_fallback.records.len(), from_demo.records.len());
    for (a, b) in from_fallback.records.iter().zip(&from_demo.records) {
        assert_eq!(a.unit_name, b.unit_name);
        assert_eq!(a.pending_amount, b.pending_amount);
    }
}

#[test]
fn test_filter_then_export_round() {
    let outcome = PaymentProcessor::with_fallback_year(2024).process(&demo_payment_rows());

    let filter = PaymentFilter {
        work_status: Some("Completed".to_string()),
        ..Default::default()
    };
    let completed = filter.apply(&outcome.records);
    assert_eq!(completed.len(), 2);

    let csv = payment_csv(&completed);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Unit A,WO001"));
    assert!(lines[2].starts_with("Unit D,WO004"));
    assert!(lines[1].contains("01-01-2024"));
}

#[test]
fn test_insight_groupings_over_demo_data() {
    let outcome = PaymentProcessor::with_fallback_year(2024).process(&demo_payment_rows());
    let insights = summarize_payments(&outcome.records);

    assert_eq!(insights.work_status_distribution.count_of("Completed"), 2);
    assert_eq!(insights.payment_mode_distribution.len(), 4);
    assert_eq!(insights.yearly_totals.len(), 1);
    assert_eq!(insights.yearly_totals[0].year, 2024);

    // All three work statuses carry positive pending, so none drop out of
    // the grouping.
    assert_eq!(insights.pending_by_work_status.len(), 3);
}
