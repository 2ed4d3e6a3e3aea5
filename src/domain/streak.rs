//! Writing streaks over calendar days

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Consecutive written days ending on `today`.
///
/// A day without a story on `today` yields 0, however long the run that
/// ended yesterday.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> usize {
    let mut streak = 0;
    let mut day = today;

    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

/// Longest run of consecutive written days anywhere in the history
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    // BTreeSet iterates in ascending order
    for &day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}
