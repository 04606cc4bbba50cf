use crate::error::AppError;
use crate::models::{PeriodPolicy, ReportPeriod};
use chrono::{Datelike, NaiveDate};

const MONTHS_NOMINATIVE: [&str; 12] = [
    "январь",
    "февраль",
    "март",
    "апрель",
    "май",
    "июнь",
    "июль",
    "август",
    "сентябрь",
    "октябрь",
    "ноябрь",
    "декабрь",
];

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

fn first_of_month(date: NaiveDate) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| AppError::Format(format!("invalid calendar date {date}")))
}

fn first_of_next_month(date: NaiveDate) -> Result<NaiveDate, AppError> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Format(format!("invalid calendar date after {date}")))
}

/// Derives the reporting period from an injected "today".
///
/// Previous-month policy covers the month that just ended: the period
/// end is the day before the 1st of the current month, which lands on
/// 28/29/30/31 per calendar rules.
pub fn compute_report_period(
    today: NaiveDate,
    policy: PeriodPolicy,
) -> Result<ReportPeriod, AppError> {
    let first_of_current = first_of_month(today)?;
    match policy {
        PeriodPolicy::PreviousMonth => {
            let end_date = first_of_current.pred_opt().ok_or_else(|| {
                AppError::Format(format!("no day precedes {first_of_current}"))
            })?;
            Ok(ReportPeriod {
                start_date: first_of_month(end_date)?,
                end_date,
            })
        }
        PeriodPolicy::CurrentMonth => {
            let end_date = first_of_next_month(first_of_current)?
                .pred_opt()
                .ok_or_else(|| {
                    AppError::Format(format!("no last day for month of {first_of_current}"))
                })?;
            Ok(ReportPeriod {
                start_date: first_of_current,
                end_date,
            })
        }
    }
}

pub fn month_name_nominative(month: u32) -> &'static str {
    MONTHS_NOMINATIVE[(month as usize - 1) % 12]
}

/// `"01 февраля 2024"` — zero-padded day, genitive month, no era suffix.
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_GENITIVE[(date.month() as usize - 1) % 12],
        date.year()
    )
}

/// The certificate's header date line keeps the era suffix:
/// `"29 февраля 2024 г."`.
pub fn format_long_date_with_era(date: NaiveDate) -> String {
    format!("{} г.", format_long_date(date))
}
