//! Pure fold from a user's windowed ledger to a [`UserPointsSummary`].
//!
//! Nothing here reads a clock or storage; the same entries and `as_of`
//! always produce the same rollup.

use chrono::{DateTime, Duration, Months, Utc};

use crate::domain::models::{PointEntry, PointSummary, UserPointsSummary};
use crate::storage::DateRange;

/// Number of items kept in each recent list
pub const RECENT_ITEMS: usize = 2;

/// The two windows a summary is computed over, both ending at `as_of`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryWindow {
    pub as_of: DateTime<Utc>,
    /// `[as_of - 1 calendar month, as_of]`, used for the ledger reads
    pub month: DateRange,
    /// `[as_of - 7 days, as_of]`, used for the gained/lost sums
    pub week: DateRange,
}

impl SummaryWindow {
    pub fn ending_at(as_of: DateTime<Utc>) -> Self {
        let month_start = as_of.checked_sub_months(Months::new(1)).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let week_start = as_of.checked_sub_signed(Duration::days(7)).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            as_of,
            month: DateRange::between(month_start, as_of),
            week: DateRange::between(week_start, as_of),
        }
    }
}

/// Fold the three category reads into a summary.
///
/// `requests` are WAITING entries of any type, `settled` are SETTLED ADD and
/// SUBTRACT entries, `cashouts` are SETTLED CASHOUT entries. Each list is
/// re-sorted newest first (stable, so equal timestamps keep storage order).
pub fn aggregate_points_summary(
    window: &SummaryWindow,
    balance: i32,
    mut requests: Vec<PointEntry>,
    mut settled: Vec<PointEntry>,
    mut cashouts: Vec<PointEntry>,
) -> UserPointsSummary {
    for list in [&mut requests, &mut settled, &mut cashouts] {
        list.sort_by(|a, b| b.updated_on.cmp(&a.updated_on));
    }

    let mut points_last_7_days = 0i32;
    let mut points_lost_last_7_days = 0i32;
    for entry in settled.iter().chain(cashouts.iter()) {
        if !entry.is_approved() || !window.week.contains(entry.updated_on) {
            continue;
        }
        let delta = entry.effective_delta();
        if delta > 0 {
            points_last_7_days = points_last_7_days.saturating_add(delta);
        } else {
            points_lost_last_7_days = points_lost_last_7_days.saturating_add(delta);
        }
    }

    UserPointsSummary {
        balance,
        points_last_7_days,
        points_lost_last_7_days,
        recent_points: recent(&settled),
        recent_requests: recent(&requests),
        recent_cashouts: recent(&cashouts),
    }
}

fn recent(entries: &[PointEntry]) -> Vec<PointSummary> {
    entries.iter().take(RECENT_ITEMS).map(PointSummary::from).collect()
}
