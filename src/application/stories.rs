//! Story repository: the single owner of the story collection
//!
//! Every mutation follows the same sequence: change the in-memory
//! collection, keep it sorted newest first, save the whole collection, then
//! notify subscribers. A failed save is recorded in [`StoryRepository::last_error`]
//! and the in-memory change is kept, so memory and disk may differ until the
//! next successful save.
//!
//! The repository is meant for a single thread of control and does no
//! locking of its own.

use crate::domain::{calendar, month_grid, streak, CalendarDay, MonthGroup, Story};
use crate::error::StorageError;
use crate::infrastructure::StoryStore;
use chrono::{DateTime, NaiveDate, TimeZone};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

/// Handle returned by [`StoryRepository::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut()>;

pub struct StoryRepository<S: StoryStore> {
    store: S,
    stories: Vec<Story>,
    last_error: Option<StorageError>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: StoryStore> StoryRepository<S> {
    /// Load the collection from `store`.
    ///
    /// A store that cannot be read leaves the repository empty with the
    /// failure available from `last_error`.
    pub fn new(store: S) -> Self {
        let mut repository = StoryRepository {
            store,
            stories: Vec::new(),
            last_error: None,
            observers: Vec::new(),
            next_subscription: 0,
        };
        repository.load_from_store();
        repository
    }

    fn load_from_store(&mut self) {
        match self.store.load() {
            Ok(stories) => {
                self.stories = stories;
                self.ensure_unique_ids();
                self.sort();
                self.last_error = None;
                debug!(count = self.stories.len(), "story collection loaded");
            }
            Err(e) => {
                warn!(error = %e, "failed to load stories; starting empty");
                self.stories = Vec::new();
                self.last_error = Some(e);
            }
        }
    }

    /// Hand-edited stores may repeat an id; later copies get fresh ids.
    fn ensure_unique_ids(&mut self) {
        let mut seen = HashSet::with_capacity(self.stories.len());
        for story in &mut self.stories {
            if story.id.is_nil() || !seen.insert(story.id) {
                let old = story.id;
                story.id = Uuid::new_v4();
                seen.insert(story.id);
                warn!(old_id = %old, new_id = %story.id, "reassigned duplicate story id");
            }
        }
    }

    /// Newest first. The sort is stable, so ties keep their relative order.
    fn sort(&mut self) {
        self.stories.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn persist(&mut self) {
        match self.store.save(&self.stories) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!(error = %e, count = self.stories.len(), "failed to save stories");
                self.last_error = Some(e);
            }
        }
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer();
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn contains(&self, id: Uuid) -> bool {
        self.stories.iter().any(|s| s.id == id)
    }

    /// Add a story and return the id it is stored under.
    ///
    /// A nil id, or one already in use, is replaced with a fresh id.
    pub fn add(&mut self, mut story: Story) -> Uuid {
        if story.id.is_nil() || self.contains(story.id) {
            story.id = Uuid::new_v4();
        }
        let id = story.id;

        self.stories.push(story);
        self.sort();
        debug!(story_id = %id, "story added");
        self.commit();

        id
    }

    /// Replace every field of the story with the same id.
    ///
    /// Returns false, without saving, when no such story exists.
    pub fn update(&mut self, story: Story) -> bool {
        let Some(existing) = self.stories.iter_mut().find(|s| s.id == story.id) else {
            debug!(story_id = %story.id, "update ignored; no such story");
            return false;
        };

        let id = story.id;
        *existing = story;
        self.sort();
        debug!(story_id = %id, "story updated");
        self.commit();

        true
    }

    /// Remove the story with `id`. The collection is saved either way.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.stories.len();
        self.stories.retain(|s| s.id != id);
        let removed = self.stories.len() != before;

        debug!(story_id = %id, removed, "story delete");
        self.commit();

        removed
    }

    /// Remove stories by position in [`all`](Self::all).
    ///
    /// Out-of-range positions are ignored. Returns how many were removed.
    pub fn delete_at(&mut self, positions: &[usize]) -> usize {
        let mut positions: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < self.stories.len())
            .collect();
        positions.sort_unstable();
        positions.dedup();

        for &position in positions.iter().rev() {
            self.stories.remove(position);
        }

        debug!(removed = positions.len(), "stories deleted by position");
        self.commit();

        positions.len()
    }

    /// Re-read the collection from the store
    pub fn reload(&mut self) {
        self.load_from_store();
        self.notify();
    }

    /// Remove the store and empty the collection
    pub fn reset(&mut self) {
        self.stories.clear();
        match self.store.clear() {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!(error = %e, "failed to clear story store");
                self.last_error = Some(e);
            }
        }
        self.notify();
    }

    /// All stories, newest first
    pub fn all(&self) -> &[Story] {
        &self.stories
    }

    pub fn get(&self, id: Uuid) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Case-insensitive match on title or body, in collection order.
    ///
    /// A blank query matches everything. Otherwise the query is matched as
    /// given, surrounding whitespace included.
    pub fn search(&self, query: &str) -> Vec<&Story> {
        if query.trim().is_empty() {
            return self.stories.iter().collect();
        }
        let needle = query.to_lowercase();
        self.stories
            .iter()
            .filter(|s| s.matches_lowercase(&needle))
            .collect()
    }

    /// Stories on the same local calendar day as `date`, whatever its time
    pub fn entries_on<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Vec<&Story> {
        self.entries_on_day(calendar::local_day(date))
    }

    pub fn entries_on_day(&self, day: NaiveDate) -> Vec<&Story> {
        self.stories
            .iter()
            .filter(|s| s.local_day() == day)
            .collect()
    }

    /// Local calendar days with at least one story
    pub fn days_with_entries(&self) -> BTreeSet<NaiveDate> {
        self.stories.iter().map(Story::local_day).collect()
    }

    pub fn has_entries_on(&self, day: NaiveDate) -> bool {
        self.stories.iter().any(|s| s.local_day() == day)
    }

    /// Consecutive written days ending today; 0 if nothing is written today
    pub fn current_streak(&self) -> usize {
        self.current_streak_as_of(calendar::today())
    }

    pub fn current_streak_as_of(&self, today: NaiveDate) -> usize {
        streak::current_streak(&self.days_with_entries(), today)
    }

    pub fn longest_streak(&self) -> usize {
        streak::longest_streak(&self.days_with_entries())
    }

    /// Stories grouped by month, newest month first
    pub fn by_month(&self) -> Vec<MonthGroup<'_>> {
        crate::domain::group_by_month(&self.stories)
    }

    /// Calendar grid for a month with days that have stories flagged
    pub fn month_grid(&self, year: i32, month: u32) -> Option<Vec<Option<CalendarDay>>> {
        month_grid(year, month, &self.days_with_entries())
    }

    /// The most recent storage failure, if it has not been cleared
    pub fn last_error(&self) -> Option<&StorageError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Remove and return the recorded storage failure
    pub fn take_error(&mut self) -> Option<StorageError> {
        self.last_error.take()
    }

    /// Call `observer` after every change to the collection
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut() + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
