use anyhow::{Context, Result};
use sheet_insights::*;

/// Loads a payment sheet from a local CSV file and runs it through the
/// pipeline: `cargo run --example csv_import -- path/to/sheet.csv`
fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: csv_import <file.csv>")?;

    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("could not open {}", path))?;

    let headers: Vec<String> = reader
        .headers()
        .context("missing header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = RowSet::new(headers);
    for record in reader.records() {
        let record = record.context("bad CSV record")?;
        let cells: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        rows.push_row(cells)?;
    }

    let outcome = process_payment_rows(&rows);

    for (raw, canonical) in &outcome.report.mapped_columns {
        println!("mapped '{}' -> '{}'", raw, canonical);
    }
    for column in &outcome.report.synthesized_columns {
        println!("synthesized '{}'", column);
    }

    let insights = summarize_payments(&outcome.records);
    println!(
        "\n{} records; final {:.2}, received {:.2}, pending {:.2}",
        insights.record_count,
        insights.total_final_amount,
        insights.total_payment_received,
        insights.total_pending_amount
    );

    Ok(())
}
