//! CSV rendering of the balance report.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;
use csv::WriterBuilder;
use rust_decimal::Decimal;

use super::balance_model::BalanceReport;
use crate::errors::{Error, Result};
use crate::receipts::Receipt;

pub const BALANCE_CSV_HEADERS: [&str; 8] = [
    "Date",
    "Kind",
    "Type",
    "Amount",
    "Payment Method",
    "Work",
    "Notes",
    "Receipts",
];

struct Row<'a> {
    date: NaiveDate,
    kind: &'static str,
    type_name: &'static str,
    amount: Decimal,
    payment_method: Option<&'a str>,
    work_id: Option<&'a str>,
    notes: Option<&'a str>,
    receipts: &'a [Receipt],
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Writes one row per income and expense, ordered by date, then a totals row.
///
/// `work_labels` maps work ids to the label shown in the Work column; unknown
/// ids are written as-is.
pub fn write_balance_csv<W: Write>(
    report: &BalanceReport,
    work_labels: &HashMap<String, String>,
    writer: W,
) -> Result<()> {
    let mut rows: Vec<Row<'_>> = report
        .incomes
        .iter()
        .map(|i| Row {
            date: i.income.date,
            kind: "Income",
            type_name: i.income.income_type.as_str(),
            amount: i.income.amount,
            payment_method: i.income.payment_method.as_deref(),
            work_id: i.income.work_id.as_deref(),
            notes: i.income.notes.as_deref(),
            receipts: &i.receipts,
        })
        .chain(report.expenses.iter().map(|e| Row {
            date: e.expense.date,
            kind: "Expense",
            type_name: e.expense.expense_type.as_str(),
            amount: e.expense.amount,
            payment_method: e.expense.payment_method.as_deref(),
            work_id: e.expense.work_id.as_deref(),
            notes: e.expense.notes.as_deref(),
            receipts: &e.receipts,
        }))
        .collect();
    rows.sort_by_key(|r| r.date);

    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(BALANCE_CSV_HEADERS)?;

    for row in rows {
        let work = row
            .work_id
            .map(|id| work_labels.get(id).map(String::as_str).unwrap_or(id))
            .unwrap_or("");
        let receipts = row
            .receipts
            .iter()
            .map(|r| r.file_name.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        csv_writer.write_record([
            row.date.to_string().as_str(),
            row.kind,
            row.type_name,
            money(row.amount).as_str(),
            row.payment_method.unwrap_or(""),
            work,
            row.notes.unwrap_or(""),
            receipts.as_str(),
        ])?;
    }

    let summary = format!(
        "Income {} / Expense {}",
        money(report.total_income),
        money(report.total_expense)
    );
    csv_writer.write_record([
        "",
        "Total",
        "BALANCE",
        money(report.balance).as_str(),
        "",
        "",
        summary.as_str(),
        "",
    ])?;
    csv_writer
        .flush()
        .map_err(|e| Error::Export(e.to_string()))?;
    Ok(())
}
