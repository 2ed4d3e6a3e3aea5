use chrono::{Local, Utc};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use storybook::application::init::init;
use storybook::application::preferences::PREFERENCE_KEYS;
use storybook::application::{PreferencesService, StoryRepository};
use storybook::cli::{
    format_calendar, format_month_groups, format_story, format_story_list, format_streaks, Cli,
    Commands,
};
use storybook::domain::book::month_label;
use storybook::domain::{
    calendar, group_by_month, parse_story_date, MonthReference, Story, TimeReference,
};
use storybook::error::{Result, StorybookError};
use storybook::infrastructure::{JsonFileStore, Library};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Environment variable holding the log filter
const LOG_ENV: &str = "STORYBOOK_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

type Repository = StoryRepository<JsonFileStore>;

/// Open the library's stories, refusing to continue over an unreadable store
/// so a later save cannot overwrite it.
fn open_repository(dir: Option<&Path>) -> Result<Repository> {
    let library = Library::locate(dir)?;
    let mut repo = StoryRepository::new(library.store());
    match repo.take_error() {
        Some(e) => Err(e.into()),
        None => Ok(repo),
    }
}

/// Mutations never fail; a save that did not reach disk is only a warning
fn warn_if_unsaved(repo: &mut Repository) {
    if let Some(e) = repo.take_error() {
        eprintln!("Warning: change not saved to disk: {}", e);
    }
}

/// Full id, or a prefix matching exactly one story
fn resolve_id(repo: &Repository, input: &str) -> Result<Uuid> {
    let trimmed = input.trim();
    if let Ok(id) = Uuid::parse_str(trimmed) {
        return match repo.get(id) {
            Some(_) => Ok(id),
            None => Err(StorybookError::StoryNotFound(input.to_string())),
        };
    }

    let prefix = trimmed.to_lowercase();
    let matches: Vec<Uuid> = repo
        .all()
        .iter()
        .map(|s| s.id)
        .filter(|id| !prefix.is_empty() && id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(StorybookError::StoryNotFound(input.to_string())),
        _ => Err(StorybookError::Config(format!(
            "Id prefix '{}' matches {} stories; use more characters",
            input,
            matches.len()
        ))),
    }
}

fn read_images(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| {
            fs::read(path).map_err(|e| {
                StorybookError::Config(format!("Failed to read image {}: {}", path.display(), e))
            })
        })
        .collect()
}

fn emit(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = cli.dir.as_deref();

    match cli.command {
        Commands::Init { path, title } => {
            let path = cli.dir.clone().unwrap_or(path);
            init(&path, title.as_deref())?;
            println!("Initialized storybook at {}", path.display());
            Ok(())
        }
        Commands::Add {
            title,
            body,
            date,
            images,
        } => {
            let date = match date {
                Some(input) => parse_story_date(&input, Local::now())?,
                None => Utc::now(),
            };
            let story = Story::new(title, body, date).with_images(read_images(&images)?);

            let mut repo = open_repository(dir)?;
            let id = repo.add(story);
            warn_if_unsaved(&mut repo);

            println!("Added story {}", id);
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            body,
            date,
            images,
            clear_images,
        } => {
            let mut repo = open_repository(dir)?;
            let id = resolve_id(&repo, &id)?;
            let mut story = repo
                .get(id)
                .cloned()
                .ok_or_else(|| StorybookError::StoryNotFound(id.to_string()))?;

            if let Some(title) = title {
                story.title = title;
            }
            if let Some(body) = body {
                story.body = body;
            }
            if let Some(input) = date {
                story.date = parse_story_date(&input, Local::now())?;
            }
            if clear_images {
                story.images.clear();
            }
            story.images.extend(read_images(&images)?);

            repo.update(story);
            warn_if_unsaved(&mut repo);

            println!("Updated story {}", id);
            Ok(())
        }
        Commands::Delete { id } => {
            let mut repo = open_repository(dir)?;
            let id = resolve_id(&repo, &id)?;

            repo.delete(id);
            warn_if_unsaved(&mut repo);

            println!("Deleted story {}", id);
            Ok(())
        }
        Commands::Show { id } => {
            let repo = open_repository(dir)?;
            let id = resolve_id(&repo, &id)?;
            if let Some(story) = repo.get(id) {
                emit(&format_story(story));
            }
            Ok(())
        }
        Commands::List { limit, by_month } => {
            let repo = open_repository(dir)?;
            let stories: Vec<&Story> = repo
                .all()
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .collect();

            if by_month {
                emit(&format_month_groups(&group_by_month(stories)));
            } else {
                emit(&format_story_list(&stories));
            }
            Ok(())
        }
        Commands::Search { query } => {
            let repo = open_repository(dir)?;
            emit(&format_story_list(&repo.search(&query)));
            Ok(())
        }
        Commands::On { day } => {
            let day = TimeReference::parse(&day)?.resolve(calendar::today());
            let repo = open_repository(dir)?;
            emit(&format_story_list(&repo.entries_on_day(day)));
            Ok(())
        }
        Commands::Streak => {
            let repo = open_repository(dir)?;
            emit(&format_streaks(repo.current_streak(), repo.longest_streak()));
            Ok(())
        }
        Commands::Calendar { month } => {
            let today = calendar::today();
            let (year, month_number) = MonthReference::parse(&month)?.resolve(today);
            let repo = open_repository(dir)?;

            let grid = repo
                .month_grid(year, month_number)
                .ok_or_else(|| StorybookError::InvalidTimeReference(month.clone()))?;
            let title = month_label(year, month_number).unwrap_or_default();

            emit(&format_calendar(&title, &grid, today));
            Ok(())
        }
        Commands::Config {
            key,
            value,
            list,
            reset,
        } => {
            let library = Library::locate(dir)?;
            let service = PreferencesService::new(library);

            if reset {
                service.reset_onboarding()?;
                println!("Preferences reset");
            } else if list {
                let preferences = service.list()?;
                println!("book_title = {}", preferences.book_title);
                println!("cover = {}", preferences.cover);
                println!("onboarded = {}", preferences.onboarded);
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: storybook config [--list | --reset | <key> [<value>]]");
                println!("Valid keys: {}", PREFERENCE_KEYS.join(", "));
            }
            Ok(())
        }
        Commands::Reset { force } => {
            if !force {
                return Err(StorybookError::Config(
                    "Refusing to delete all stories without --force".to_string(),
                ));
            }

            let library = Library::locate(dir)?;
            // A corrupt store is exactly what a reset is for, so load errors are ignored
            let mut repo = StoryRepository::new(library.store());
            repo.reset();
            if let Some(e) = repo.take_error() {
                return Err(e.into());
            }

            println!("Deleted all stories");
            Ok(())
        }
    }
}
