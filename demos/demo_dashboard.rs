use anyhow::Result;
use sheet_insights::*;

/// Runs the full pipeline over the built-in demonstration data and prints
/// the numbers a dashboard would show.
fn main() -> Result<()> {
    // No live sources configured, so this falls back to demonstration data
    // through the exact same processing path.
    let (rows, used_demo) = fetch_or_demo(&[], demo_payment_rows());
    if used_demo {
        println!("(showing demonstration data)\n");
    }

    let outcome = process_payment_rows(&rows);
    let insights = summarize_payments(&outcome.records);

    println!("records:          {}", insights.record_count);
    println!("total order:      {:>18.2}", insights.total_order_amount);
    println!("total final:      {:>18.2}", insights.total_final_amount);
    println!("total received:   {:>18.2}", insights.total_payment_received);
    println!("total pending:    {:>18.2}", insights.total_pending_amount);

    println!("\nwork status:");
    for (status, count) in insights.work_status_distribution.entries() {
        println!("  {:<16} {}", status, count);
    }

    println!("\npending by status:");
    for (status, amount) in &insights.pending_by_work_status {
        println!("  {:<16} {:>18.2}", status, amount);
    }

    if let Some(check) = &outcome.report.pending_check {
        println!(
            "\npending check: sheet {:.2} vs derived {:.2}",
            check.provided_total, check.derived_total
        );
    }

    println!("\nCSV export:\n{}", payment_csv(&outcome.records));

    Ok(())
}
