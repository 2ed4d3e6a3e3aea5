//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "storybook")]
#[command(about = "A dated storybook of your days", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Library directory (default: STORYBOOK_DIR or the nearest .storybook
    /// above the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new storybook
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Title printed on the book cover
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Write a new story
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        body: String,

        /// When the story happened (today, yesterday, last friday, 2025-01-17, RFC 3339)
        #[arg(short, long)]
        date: Option<String>,

        /// Photo files to attach, in order
        #[arg(short, long = "image", value_name = "FILE")]
        images: Vec<PathBuf>,
    },

    /// Change an existing story
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        body: Option<String>,

        #[arg(short, long)]
        date: Option<String>,

        /// Photo files to append
        #[arg(short, long = "image", value_name = "FILE")]
        images: Vec<PathBuf>,

        /// Drop existing photos before appending
        #[arg(long)]
        clear_images: bool,
    },

    /// Remove a story
    Delete { id: String },

    /// Show one story in full
    Show { id: String },

    /// List stories, newest first
    List {
        /// Maximum number of stories to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Group stories under month headings
        #[arg(short = 'm', long)]
        by_month: bool,
    },

    /// Find stories whose title or text contains a phrase
    Search { query: String },

    /// Stories written on a day
    On {
        /// Day reference (today, yesterday, monday, last friday, 2025-01-17)
        #[arg(default_value = "today")]
        day: String,
    },

    /// Current and longest writing streaks
    Streak,

    /// Month calendar with written days marked
    Calendar {
        /// Month (YYYY-MM, this month, last month)
        #[arg(default_value = "this month")]
        month: String,
    },

    /// View or modify preferences
    Config {
        key: Option<String>,

        value: Option<String>,

        #[arg(short, long)]
        list: bool,

        /// Restore first-run preferences
        #[arg(long)]
        reset: bool,
    },

    /// Delete every story in the library
    Reset {
        /// Required; there is no undo
        #[arg(long)]
        force: bool,
    },
}
