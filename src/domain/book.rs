//! Month-oriented views of the story collection: library sections and the
//! calendar grid.

use crate::domain::Story;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Stories written in one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<'a> {
    pub year: i32,
    pub month: u32,
    pub stories: Vec<&'a Story>,
}

impl MonthGroup<'_> {
    /// Section heading such as "March 2024"
    pub fn label(&self) -> String {
        month_label(self.year, self.month).unwrap_or_default()
    }
}

/// Group stories by the local month of their date, newest month first.
///
/// Stories keep their incoming order inside each group.
pub fn group_by_month<'a, I>(stories: I) -> Vec<MonthGroup<'a>>
where
    I: IntoIterator<Item = &'a Story>,
{
    let mut groups: BTreeMap<(i32, u32), Vec<&'a Story>> = BTreeMap::new();

    for story in stories {
        let day = story.local_day();
        groups
            .entry((day.year(), day.month()))
            .or_default()
            .push(story);
    }

    groups
        .into_iter()
        .rev()
        .map(|((year, month), stories)| MonthGroup {
            year,
            month,
            stories,
        })
        .collect()
}

/// "March 2024" style label, or None for an invalid month
pub fn month_label(year: i32, month: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| first.format("%B %Y").to_string())
}

/// One day cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub has_entries: bool,
}

/// Lay out a month as whole Sunday-first weeks.
///
/// Cells before the 1st and after the last day are `None`. Returns `None`
/// when `month` is not a valid month of `year`.
pub fn month_grid(
    year: i32,
    month: u32,
    days_with_entries: &BTreeSet<NaiveDate>,
) -> Option<Vec<Option<CalendarDay>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<CalendarDay>> = vec![None; leading];

    let mut day = first;
    while day.month() == month {
        cells.push(Some(CalendarDay {
            date: day,
            has_entries: days_with_entries.contains(&day),
        }));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    Some(cells)
}
