//! Adherence calculator: doses due vs. doses taken, for a single day or
//! an inclusive day window.

use crate::calendar::{days_inclusive, month_bounds, week_starting_sunday};
use crate::ledger::CompletionLedger;
use crate::schedule::is_due_today;
use crate::{DailyAdherence, Error, Medication, Result, WindowedAdherence};
use chrono::NaiveDate;

/// Compute adherence for one calendar day.
///
/// The per-medication completion reads are awaited sequentially; the
/// flag store is device-local, so the O(medications) round trips are
/// cheap and keep read-after-write ordering trivial.
pub async fn daily_adherence(
    meds: &[Medication],
    day: NaiveDate,
    ledger: &CompletionLedger,
) -> Result<DailyAdherence> {
    let due: Vec<&Medication> = meds.iter().filter(|m| is_due_today(m, day)).collect();

    let due_count = due.len();
    let mut taken_count = 0;
    for med in &due {
        if ledger.is_done(med, day).await? {
            taken_count += 1;
        }
    }

    let ratio = if due_count == 0 {
        0.0
    } else {
        taken_count as f64 / due_count as f64
    };

    tracing::debug!(
        "Adherence for {}: {}/{} taken",
        day,
        taken_count,
        due_count
    );

    Ok(DailyAdherence {
        date: day,
        due_count,
        taken_count,
        ratio,
    })
}

/// Aggregate adherence over `start..=end`.
///
/// Days with nothing due are skipped, not averaged in as 0%; a window
/// where no medication is ever due reports zero over zero days.
pub async fn windowed_adherence(
    meds: &[Medication],
    start: NaiveDate,
    end: NaiveDate,
    ledger: &CompletionLedger,
) -> Result<WindowedAdherence> {
    let mut percent_sum = 0.0;
    let mut included_days = 0usize;

    for day in days_inclusive(start, end) {
        let daily = daily_adherence(meds, day, ledger).await?;
        if daily.due_count == 0 {
            continue;
        }
        percent_sum += daily.ratio * 100.0;
        included_days += 1;
    }

    let mean_ratio_percent = if included_days == 0 {
        0
    } else {
        (percent_sum / included_days as f64).round() as u32
    };

    Ok(WindowedAdherence {
        mean_ratio_percent,
        days_with_due_medications: included_days,
    })
}

/// Adherence over the Sunday-start week containing `day`.
pub async fn weekly_adherence(
    meds: &[Medication],
    day: NaiveDate,
    ledger: &CompletionLedger,
) -> Result<WindowedAdherence> {
    let (start, end) = week_starting_sunday(day);
    windowed_adherence(meds, start, end, ledger).await
}

/// Adherence over a whole calendar month.
pub async fn monthly_adherence(
    meds: &[Medication],
    year: i32,
    month: u32,
    ledger: &CompletionLedger,
) -> Result<WindowedAdherence> {
    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| Error::Other(format!("invalid month {}-{}", year, month)))?;
    windowed_adherence(meds, start, end, ledger).await
}
