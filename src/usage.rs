use crate::error::AppError;
use crate::models::{NormalizedUsage, PeriodTotals, RawUsageEntry, RateSource};

/// Per-minute rate charged when the deployment bills at a fixed rate
/// instead of the API-supplied `playtime_cost`.
pub const DEFAULT_FIXED_RATE: f64 = 0.30;

fn normalize_entry(
    entry: &RawUsageEntry,
    rate_source: RateSource,
    fixed_rate: f64,
) -> Result<NormalizedUsage, AppError> {
    if entry.vm_name.trim().is_empty() {
        return Err(AppError::MalformedEntry(
            "entry has a missing or empty vm_name".into(),
        ));
    }
    if entry.session_seconds < 0 {
        return Err(AppError::MalformedEntry(format!(
            "vm '{}' reports negative session_seconds {}",
            entry.vm_name, entry.session_seconds
        )));
    }

    let cost_per_minute = match rate_source {
        RateSource::Api => entry.playtime_cost.ok_or_else(|| {
            AppError::MalformedEntry(format!(
                "vm '{}' has no playtime_cost but rate-source is 'api'",
                entry.vm_name
            ))
        })?,
        RateSource::Fixed => fixed_rate,
    };
    if !cost_per_minute.is_finite() || cost_per_minute < 0.0 {
        return Err(AppError::MalformedEntry(format!(
            "vm '{}' has invalid cost rate {cost_per_minute}",
            entry.vm_name
        )));
    }

    let minutes = entry.session_seconds / 60;
    Ok(NormalizedUsage {
        vm_name: entry.vm_name.clone(),
        minutes,
        cost_per_minute,
        // Unrounded; display rounding happens once, on the totals.
        earnings: minutes as f64 * cost_per_minute,
    })
}

/// Normalizes raw API entries in input order. A malformed entry aborts
/// the run unless `skip_malformed` is set, in which case it is dropped
/// with a warning on stderr.
pub fn normalize_entries(
    entries: &[RawUsageEntry],
    rate_source: RateSource,
    fixed_rate: f64,
    skip_malformed: bool,
) -> Result<Vec<NormalizedUsage>, AppError> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match normalize_entry(entry, rate_source, fixed_rate) {
            Ok(usage) => out.push(usage),
            Err(err) if skip_malformed => {
                eprintln!("warning: skipping {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}

/// Sums earnings and minutes across the period. An empty month is a
/// valid, reportable state with zero totals.
pub fn aggregate(usage: &[NormalizedUsage]) -> PeriodTotals {
    PeriodTotals {
        total_minutes: usage.iter().map(|u| u.minutes).sum(),
        total_earnings: usage.iter().map(|u| u.earnings).sum(),
    }
}
