//! Output formatting utilities

use crate::domain::{CalendarDay, MonthGroup, Story};
use chrono::{Datelike, Local, NaiveDate};

const EXCERPT_CHARS: usize = 60;

fn local_stamp(story: &Story) -> String {
    story
        .date
        .with_timezone(&Local)
        .format("%d-%m-%Y %H:%M")
        .to_string()
}

/// First line of the body, shortened for list views
fn excerpt(body: &str) -> String {
    let line = body.lines().next().unwrap_or("").trim();
    if line.chars().count() > EXCERPT_CHARS {
        let cut: String = line.chars().take(EXCERPT_CHARS).collect();
        format!("{}…", cut.trim_end())
    } else {
        line.to_string()
    }
}

fn story_line(story: &Story) -> String {
    let mut line = format!("{}  {}  {}", local_stamp(story), story.id, story.title);
    if !story.images.is_empty() {
        line.push_str(&format!(" [{} photo{}]", story.images.len(), plural(story.images.len())));
    }
    let excerpt = excerpt(&story.body);
    if !excerpt.is_empty() {
        line.push_str(&format!(" - {}", excerpt));
    }
    line.push('\n');
    line
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// One line per story
pub fn format_story_list(stories: &[&Story]) -> String {
    if stories.is_empty() {
        return "No stories found".to_string();
    }

    stories.iter().map(|story| story_line(story)).collect()
}

/// Stories under "Month Year" headings
pub fn format_month_groups(groups: &[MonthGroup<'_>]) -> String {
    if groups.is_empty() {
        return "No stories found".to_string();
    }

    let mut output = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", group.label()));
        for story in &group.stories {
            output.push_str("  ");
            output.push_str(&story_line(story));
        }
    }
    output
}

/// Full story view
pub fn format_story(story: &Story) -> String {
    let mut output = format!(
        "{}\n{}\n{}\n",
        story.title,
        story.date.with_timezone(&Local).format("%A, %B %-d, %Y at %H:%M"),
        story.id
    );
    if !story.images.is_empty() {
        output.push_str(&format!(
            "{} photo{} attached\n",
            story.images.len(),
            plural(story.images.len())
        ));
    }
    if !story.body.is_empty() {
        output.push('\n');
        output.push_str(&story.body);
        output.push('\n');
    }
    output
}

pub fn format_streaks(current: usize, longest: usize) -> String {
    format!(
        "Current streak: {} day{}\nLongest streak: {} day{}\n",
        current,
        plural(current),
        longest,
        plural(longest)
    )
}

/// Month grid with written days marked by `*` and today in brackets
pub fn format_calendar(title: &str, cells: &[Option<CalendarDay>], today: NaiveDate) -> String {
    let mut output = format!("{}\n", title);
    output.push_str(" Su   Mo   Tu   We   Th   Fr   Sa\n");

    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "     ".to_string(),
                Some(day) => {
                    let mark = if day.has_entries { '*' } else { ' ' };
                    let (open, close) = if day.date == today {
                        ('[', ']')
                    } else {
                        (' ', ' ')
                    };
                    format!("{}{:>2}{}{}", open, day.date.day(), mark, close)
                }
            })
            .collect();
        output.push_str(row.join("").trim_end());
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{group_by_month, month_grid};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn story(title: &str, body: &str) -> Story {
        Story::new(title, body, Utc.with_ymd_and_hms(2025, 1, 17, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_story_list(&[]), "No stories found");
        assert_eq!(format_month_groups(&[]), "No stories found");
    }

    #[test]
    fn test_format_story_list() {
        let a = story("Morning Coffee", "Perfect cup.\nSecond line");
        let b = story("Photos", "").with_images(vec![vec![1], vec![2]]);

        let output = format_story_list(&[&a, &b]);

        assert!(output.contains("Morning Coffee - Perfect cup."));
        assert!(!output.contains("Second line"));
        assert!(output.contains("Photos [2 photos]"));
        assert!(output.contains(&a.id.to_string()));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "x".repeat(100);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_format_month_groups() {
        let stories = vec![story("A", "")];
        let output = format_month_groups(&group_by_month(&stories));
        assert!(output.starts_with("January 2025\n  "));
    }

    #[test]
    fn test_format_story() {
        let s = story("A Great Day", "Walk in the park.").with_images(vec![vec![1]]);
        let output = format_story(&s);
        assert!(output.starts_with("A Great Day\n"));
        assert!(output.contains("1 photo attached"));
        assert!(output.ends_with("Walk in the park.\n"));
    }

    #[test]
    fn test_format_streaks() {
        assert_eq!(
            format_streaks(1, 3),
            "Current streak: 1 day\nLongest streak: 3 days\n"
        );
    }

    #[test]
    fn test_format_calendar() {
        let marked = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let days: BTreeSet<NaiveDate> = [marked].into_iter().collect();
        let grid = month_grid(2025, 6, &days).unwrap();

        let output = format_calendar("June 2025", &grid, today);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "June 2025");
        assert_eq!(lines.len(), 2 + 5);
        assert!(lines[1].starts_with(" Su   Mo"));
        assert!(lines[2].starts_with("  1  "));
        assert!(lines[2].contains("  3* "));
        assert!(lines[3].contains("[10 ]"));
    }

    #[test]
    fn test_format_calendar_today_with_entries_keeps_mark() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let days: BTreeSet<NaiveDate> = [today].into_iter().collect();
        let grid = month_grid(2025, 6, &days).unwrap();

        let output = format_calendar("June 2025", &grid, today);

        assert!(output.contains("[10*]"));
    }
}
