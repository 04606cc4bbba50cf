use crate::models::{NormalizedUsage, ReportDocument, ReportPeriod, ServerRow};
use crate::period::{format_long_date, format_long_date_with_era, month_name_nominative};
use chrono::Datelike;

/// Builds the rendering payload. Rows keep the order the statistics
/// source returned them in, numbered from 1, with earnings fixed to two
/// decimal places. Pure: identical inputs produce identical documents.
pub fn assemble_document(
    period: &ReportPeriod,
    usage: &[NormalizedUsage],
    total_earnings: String,
) -> ReportDocument {
    ReportDocument {
        date: format_long_date_with_era(period.end_date),
        start_date: format_long_date(period.start_date),
        end_date: format_long_date(period.end_date),
        rows: usage
            .iter()
            .enumerate()
            .map(|(i, u)| ServerRow {
                index: i + 1,
                vm_name: u.vm_name.clone(),
                minutes: u.minutes,
                earnings: format!("{:.2}", u.earnings),
            })
            .collect(),
        total_earnings,
    }
}

/// `"2024-02 (февраль) Акт выполненных работ Иванов.docx"`, keyed off
/// the period end date.
pub fn output_file_name(period: &ReportPeriod, last_name: &str) -> String {
    let end = period.end_date;
    format!(
        "{}-{:02} ({}) Акт выполненных работ {}.docx",
        end.year(),
        end.month(),
        month_name_nominative(end.month()),
        last_name
    )
}
