use crate::schema::{PaymentRecord, ProposalRecord};
use chrono::NaiveDate;

/// CSV emission of already-normalized datasets. Columns come out in
/// canonical order, dates in the sheets' customary day-first display form,
/// amounts with two decimals. Pure serialization; no re-normalization.

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_default()
}

pub fn payment_csv(records: &[PaymentRecord]) -> String {
    let mut output = String::new();
    output.push_str(
        "unit_name,work_order_no,order_amount,final_amount,payment_received,pending_amount,payment_mode,work_status,date,year\n",
    );

    for record in records {
        output.push_str(&format!(
            "{},{},{:.2},{:.2},{:.2},{:.2},{},{},{},{}\n",
            csv_field(&record.unit_name),
            csv_field(&record.work_order_no),
            record.order_amount,
            record.final_amount,
            record.payment_received,
            record.pending_amount,
            csv_field(&record.payment_mode),
            csv_field(&record.work_status),
            csv_date(record.date),
            record.year,
        ));
    }

    output
}

pub fn proposal_csv(records: &[ProposalRecord]) -> String {
    let mut output = String::new();
    output.push_str(
        "s_no,year,date,wo_date,no,name,industry_type,district,scope_of_work,type,source,status,refrence_no,contact_person,amount,present_status\n",
    );

    for record in records {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{:.2},{}\n",
            csv_field(&record.s_no),
            record.year,
            csv_date(record.date),
            csv_date(record.wo_date),
            csv_field(&record.no),
            csv_field(&record.name),
            csv_field(&record.industry_type),
            csv_field(&record.district),
            csv_field(&record.scope_of_work),
            csv_field(&record.kind),
            csv_field(&record.source),
            csv_field(&record.status),
            csv_field(&record.refrence_no),
            csv_field(&record.contact_person),
            record.amount,
            csv_field(&record.present_status),
        ));
    }

    output
}
