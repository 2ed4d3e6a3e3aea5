//! Domain layer - Stories and the calendar logic derived from them

pub mod book;
pub mod calendar;
pub mod story;
pub mod streak;
pub mod time_ref;

pub use book::{group_by_month, month_grid, CalendarDay, MonthGroup};
pub use story::Story;
pub use time_ref::{parse_story_date, MonthReference, TimeReference};
