//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands};
pub use output::{
    format_calendar, format_month_groups, format_story, format_story_list, format_streaks,
};
