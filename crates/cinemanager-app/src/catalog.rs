// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, error, info, warn};

use crate::pipeline::{compute_stats, filter_movies, genres_present, page_slice, sort_movies};
use crate::{
    CatalogError, CatalogStats, Clock, ExportFile, FieldErrors, Genre, ImportedMovie,
    KeyValueStore, MOVIES_KEY, Movie, MovieField, MovieFormInput, MovieId, Notice, ViewCommand,
    ViewEvent, ViewState, export_file, parse_import,
};

/// Upper bound (exclusive) of the random offset added to import ids.
const IMPORT_ID_JITTER: i64 = 1_000_000;

/// A destructive operation waiting for the user to confirm it. Dropping the
/// value cancels; [`Catalog::commit`] carries it out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending action does nothing until committed"]
pub struct PendingAction {
    kind: PendingKind,
    prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingKind {
    Delete(MovieId),
    ClearAll,
    Import(Vec<ImportedMovie>),
}

impl PendingAction {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageReset {
    First,
    Keep,
}

pub struct Catalog<S, C> {
    store: S,
    clock: C,
    movies: Vec<Movie>,
    visible: Vec<Movie>,
    view: ViewState,
    stats: CatalogStats,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore, C: Clock> Catalog<S, C> {
    /// Reads the saved movie list. A missing or unreadable value starts an
    /// empty catalog; the failure is logged, never surfaced.
    pub fn load(store: S, clock: C) -> Self {
        let movies = match store.get(MOVIES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Movie>>(&raw) {
                Ok(movies) => movies,
                Err(error) => {
                    warn!(%error, "saved catalog is unreadable; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "read saved catalog; starting empty");
                Vec::new()
            }
        };
        info!(count = movies.len(), "catalog loaded");

        let mut catalog = Self {
            store,
            clock,
            movies,
            visible: Vec::new(),
            view: ViewState::default(),
            stats: CatalogStats::default(),
            notices: Vec::new(),
        };
        catalog.refresh(PageReset::First);
        catalog.notices.push(catalog.welcome_notice());
        catalog
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.view.page_size = page_size.max(1);
        self.refresh(PageReset::First);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Filtered and sorted rows across all pages.
    pub fn visible(&self) -> &[Movie] {
        &self.visible
    }

    pub fn page_items(&self) -> &[Movie] {
        page_slice(&self.visible, self.view.page, self.view.page_size)
    }

    pub fn page(&self) -> usize {
        self.view.page
    }

    pub fn total_pages(&self) -> usize {
        crate::pipeline::total_pages(self.visible.len(), self.view.page_size)
    }

    pub fn pagination_visible(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn stats(&self) -> CatalogStats {
        self.stats
    }

    pub fn genres_present(&self) -> Vec<Genre> {
        genres_present(&self.movies)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn editing(&self) -> Option<MovieId> {
        self.view.editing
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn current_year(&self) -> i32 {
        self.clock.now().year()
    }

    /// Validates one field as the user types, against the open edit target.
    pub fn check_field(&self, form: &MovieFormInput, field: MovieField) -> Result<(), String> {
        form.validate_field(field, &self.movies, self.view.editing, self.current_year())
    }

    pub fn add(&mut self, form: &MovieFormInput) -> Result<MovieId, CatalogError> {
        let validated = self.validate(form, None)?;
        let now = self.clock.now();
        let id = self.fresh_id(now.unix_timestamp_nanos());
        let name = validated.name.clone();
        self.movies.insert(
            0,
            Movie {
                id,
                name: validated.name,
                year: validated.year,
                genre: validated.genre,
                rating: validated.rating,
                date_added: now,
            },
        );
        info!(%id, name = %name, "movie added");

        self.refresh(PageReset::First);
        self.persist_and_notify(Notice::success(format!("{name:?} was added")));
        Ok(id)
    }

    /// Opens `id` for editing and returns the prefilled form.
    pub fn begin_edit(&mut self, id: MovieId) -> Option<MovieFormInput> {
        let form = self.movie(id).map(MovieFormInput::from_movie)?;
        self.view.editing = Some(id);
        Some(form)
    }

    pub fn cancel_edit(&mut self) {
        self.view.editing = None;
    }

    pub fn submit_edit(&mut self, id: MovieId, form: &MovieFormInput) -> Result<(), CatalogError> {
        if self.movie(id).is_none() {
            self.notices
                .push(Notice::error(CatalogError::NotFound(id).to_string()));
            self.view.editing = None;
            return Err(CatalogError::NotFound(id));
        }
        let validated = self.validate(form, Some(id))?;
        let name = validated.name.clone();
        if let Some(movie) = self.movies.iter_mut().find(|movie| movie.id == id) {
            movie.name = validated.name;
            movie.year = validated.year;
            movie.genre = validated.genre;
            movie.rating = validated.rating;
        }
        info!(%id, name = %name, "movie updated");

        self.refresh(PageReset::Keep);
        self.view.editing = None;
        self.persist_and_notify(Notice::success(format!("{name:?} was updated")));
        Ok(())
    }

    /// Proposes deleting `id`; `None` when no such movie exists.
    pub fn request_delete(&self, id: MovieId) -> Option<PendingAction> {
        let movie = self.movie(id)?;
        Some(PendingAction {
            kind: PendingKind::Delete(id),
            prompt: format!("Delete {:?}?", movie.name),
        })
    }

    /// Proposes clearing the catalog; rejected with a notice when empty.
    pub fn request_clear_all(&mut self) -> Option<PendingAction> {
        if self.movies.is_empty() {
            self.notices
                .push(Notice::error("there are no movies to delete"));
            return None;
        }
        Some(PendingAction {
            kind: PendingKind::ClearAll,
            prompt: format!(
                "Delete all {} movies? This cannot be undone.",
                self.movies.len()
            ),
        })
    }

    /// Parses `contents` and proposes replacing the catalog with it.
    pub fn request_import(&mut self, contents: &str) -> Result<PendingAction, CatalogError> {
        let batch = match parse_import(contents, self.current_year()) {
            Ok(batch) => batch,
            Err(error) => {
                warn!(%error, "import rejected");
                self.notices
                    .push(Notice::error(format!("import failed: {error}")));
                return Err(error.into());
            }
        };
        if batch.skipped > 0 {
            debug!(skipped = batch.skipped, "import entries dropped");
        }
        Ok(PendingAction {
            prompt: format!(
                "Import {} movies? This replaces your current list.",
                batch.movies.len()
            ),
            kind: PendingKind::Import(batch.movies),
        })
    }

    pub fn commit(&mut self, action: PendingAction) {
        match action.kind {
            PendingKind::Delete(id) => self.delete(id),
            PendingKind::ClearAll => self.clear_all(),
            PendingKind::Import(movies) => self.replace_with(movies),
        }
    }

    pub fn export(&mut self) -> Result<ExportFile, CatalogError> {
        if self.movies.is_empty() {
            self.notices
                .push(Notice::error("there are no movies to export"));
            return Err(CatalogError::EmptyCatalog);
        }
        let file = export_file(&self.movies, self.clock.now()).map_err(|error| {
            error!(%error, "serialize export");
            CatalogError::Persistence(error.to_string())
        })?;
        info!(count = self.movies.len(), file = %file.file_name, "catalog exported");
        Ok(file)
    }

    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        let clearing = command == ViewCommand::ClearFilters;
        let events = self.view.dispatch(command, self.total_pages());
        if events.contains(&ViewEvent::FiltersChanged) {
            self.refresh(PageReset::First);
        }
        if clearing {
            self.notices.push(Notice::info("filters cleared"));
        }
        events
    }

    /// Writes the full movie list to the store.
    pub fn save(&mut self) -> Result<(), CatalogError> {
        let raw = serde_json::to_string(&self.movies)
            .map_err(|error| CatalogError::Persistence(error.to_string()))?;
        self.store
            .set(MOVIES_KEY, &raw)
            .map_err(|error| CatalogError::Persistence(format!("{error:#}")))
    }

    /// Saves, then queues `outcome`. A failed save turns the outcome into a
    /// single error notice; the in-memory change stands either way.
    fn persist_and_notify(&mut self, outcome: Notice) {
        match self.save() {
            Ok(()) => self.notices.push(outcome),
            Err(error) => {
                error!(%error, "persist catalog");
                self.notices.push(Notice::error(format!(
                    "{}, but {error}",
                    outcome.message
                )));
            }
        }
    }

    fn delete(&mut self, id: MovieId) {
        let Some(index) = self.movies.iter().position(|movie| movie.id == id) else {
            return;
        };
        let removed = self.movies.remove(index);
        self.visible.retain(|movie| movie.id != id);
        if self.view.editing == Some(id) {
            self.view.editing = None;
        }
        info!(%id, name = %removed.name, "movie deleted");

        self.refresh(PageReset::Keep);
        self.persist_and_notify(Notice::info(format!("{:?} was deleted", removed.name)));
    }

    fn clear_all(&mut self) {
        if self.movies.is_empty() {
            return;
        }
        let count = self.movies.len();
        self.movies.clear();
        self.view.editing = None;
        info!(count, "catalog cleared");

        self.view.dispatch(ViewCommand::ClearFilters, 0);
        self.refresh(PageReset::First);
        self.persist_and_notify(Notice::info("all movies were deleted"));
    }

    fn replace_with(&mut self, imported: Vec<ImportedMovie>) {
        let now = self.clock.now();
        let base = millis(now.unix_timestamp_nanos());
        let ids = import_ids(base, imported.len(), IMPORT_ID_JITTER, &mut rand::rng());
        let movies = imported
            .into_iter()
            .zip(ids)
            .map(|(movie, id)| {
                Movie {
                    id,
                    name: movie.name,
                    year: movie.year,
                    genre: movie.genre,
                    rating: movie.rating,
                    date_added: movie.date_added.unwrap_or(now),
                }
            })
            .collect::<Vec<_>>();
        let count = movies.len();
        self.movies = movies;
        self.view.editing = None;
        info!(count, "catalog replaced by import");

        self.refresh(PageReset::First);
        self.persist_and_notify(Notice::success(format!("{count} movies imported")));
    }

    fn validate(
        &mut self,
        form: &MovieFormInput,
        editing: Option<MovieId>,
    ) -> Result<crate::ValidatedMovie, CatalogError> {
        form.validate(&self.movies, editing, self.current_year())
            .map_err(|errors: FieldErrors| {
                debug!(%errors, "form rejected");
                self.notices
                    .push(Notice::error("please fix the highlighted fields"));
                CatalogError::Validation(errors)
            })
    }

    fn fresh_id(&self, now_nanos: i128) -> MovieId {
        let mut candidate = millis(now_nanos);
        while self.movies.iter().any(|movie| movie.id.get() == candidate) {
            candidate += 1;
        }
        MovieId::new(candidate)
    }

    fn refresh(&mut self, reset: PageReset) {
        if let Some(genre) = self.view.genre
            && !self.movies.iter().any(|movie| movie.genre == genre)
        {
            self.view.genre = None;
        }

        let mut visible = filter_movies(&self.movies, &self.view.search_term(), self.view.genre);
        sort_movies(&mut visible, self.view.sort);
        self.visible = visible;
        self.stats = compute_stats(&self.movies);

        match reset {
            PageReset::First => self.view.page = 1,
            PageReset::Keep => self.view.clamp_page(self.total_pages()),
        }
    }

    fn welcome_notice(&self) -> Notice {
        match self.movies.len() {
            0 => Notice::info("welcome! add your first movie"),
            count => Notice::success(format!(
                "welcome back! {count} movie(s) in your catalog"
            )),
        }
    }
}

fn millis(nanos: i128) -> i64 {
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

/// Distinct ids for an import batch: `base` plus a random offset below
/// `jitter`, or, when that offset is already taken, a slot past the jitter
/// window indexed by position so the batch size never matters.
fn import_ids<R: Rng>(base: i64, count: usize, jitter: i64, rng: &mut R) -> Vec<MovieId> {
    let mut taken = BTreeSet::new();
    (0..count)
        .map(|index| {
            let candidate = base.saturating_add(rng.random_range(0..jitter.max(1)));
            let id = if taken.insert(candidate) {
                candidate
            } else {
                let overflow = base
                    .saturating_add(jitter.max(1))
                    .saturating_add(i64::try_from(index).unwrap_or(i64::MAX));
                taken.insert(overflow);
                overflow
            };
            MovieId::new(id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::{
        CatalogError, FixedClock, Genre, ImportFormatError, KeyValueStore, MOVIES_KEY,
        MemoryStore, MovieField, MovieFormInput, MovieId, NoticeLevel, SortMode, ViewCommand,
        ViewEvent,
    };
    use anyhow::{Result, bail};
    use std::collections::BTreeSet;
    use time::OffsetDateTime;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-18 12:00:00 UTC);

    fn catalog() -> Catalog<MemoryStore, FixedClock> {
        Catalog::load(MemoryStore::new(), FixedClock(NOW))
    }

    fn form(name: &str, year: i32, genre: Genre, rating: u8) -> MovieFormInput {
        MovieFormInput {
            name: name.to_owned(),
            year: year.to_string(),
            genre: genre.as_str().to_owned(),
            rating,
        }
    }

    fn seeded(count: usize) -> Catalog<MemoryStore, FixedClock> {
        let mut catalog = catalog();
        for index in 0..count {
            catalog
                .add(&form(&format!("Movie {index}"), 1990 + index as i32, Genre::Drama, 3))
                .expect("seed movie");
        }
        catalog.drain_notices();
        catalog
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            bail!("quota exceeded")
        }
    }

    #[test]
    fn load_without_saved_value_starts_empty_with_welcome() {
        let mut catalog = catalog();
        assert!(catalog.movies().is_empty());
        assert_eq!(catalog.stats().average_year, None);
        let notices = catalog.drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("add your first movie"));
    }

    #[test]
    fn load_with_corrupt_value_starts_empty() {
        let store = MemoryStore::with_value(MOVIES_KEY, "{not json");
        let catalog = Catalog::load(store, FixedClock(NOW));
        assert!(catalog.movies().is_empty());
    }

    #[test]
    fn saved_catalog_reloads() -> Result<()> {
        let mut catalog = catalog();
        catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        let raw = catalog
            .store()
            .raw(MOVIES_KEY)
            .expect("movies persisted")
            .to_owned();

        let mut reloaded = Catalog::load(MemoryStore::with_value(MOVIES_KEY, &raw), FixedClock(NOW));
        assert_eq!(reloaded.movies(), catalog.movies());
        let welcome = reloaded.drain_notices();
        assert!(welcome[0].message.contains("1 movie(s)"));
        Ok(())
    }

    #[test]
    fn add_prepends_with_fresh_id_and_timestamp() -> Result<()> {
        let mut catalog = catalog();
        let first = catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        let second = catalog.add(&form("Ronin", 1998, Genre::Action, 3))?;

        assert_ne!(first, second);
        assert_eq!(first.get(), NOW.unix_timestamp() * 1000);
        assert_eq!(catalog.movies()[0].id, second);
        assert_eq!(catalog.movies()[0].name, "Ronin");
        assert_eq!(catalog.movies()[0].year, 1998);
        assert_eq!(catalog.movies()[0].genre, Genre::Action);
        assert_eq!(catalog.movies()[0].rating, 3);
        assert_eq!(catalog.movies()[1].date_added, NOW);
        assert_eq!(catalog.store().write_count(), 2);
        Ok(())
    }

    #[test]
    fn add_resets_to_first_page() -> Result<()> {
        let mut catalog = seeded(13);
        catalog.dispatch(ViewCommand::ChangePage(1));
        assert_eq!(catalog.page(), 2);
        catalog.add(&form("Late Entry", 2001, Genre::Comedy, 2))?;
        assert_eq!(catalog.page(), 1);
        Ok(())
    }

    #[test]
    fn invalid_add_persists_nothing_and_reports_fields() {
        let mut catalog = seeded(1);
        let writes = catalog.store().write_count();

        let error = catalog
            .add(&form("movie 0", 1887, Genre::Drama, 0))
            .expect_err("invalid form should fail");
        let CatalogError::Validation(errors) = error else {
            panic!("expected validation error, got {error:?}");
        };
        assert!(errors.get(MovieField::Name).is_some());
        assert!(errors.get(MovieField::Year).is_some());
        assert!(errors.get(MovieField::Rating).is_some());
        assert!(errors.get(MovieField::Genre).is_none());

        assert_eq!(catalog.movies().len(), 1);
        assert_eq!(catalog.store().write_count(), writes);
        let notices = catalog.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn duplicate_name_is_case_insensitive() -> Result<()> {
        let mut catalog = catalog();
        catalog.add(&form("inception", 2010, Genre::ScienceFiction, 5))?;
        assert!(
            catalog
                .add(&form("Inception", 2010, Genre::ScienceFiction, 5))
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn edit_updates_fields_and_keeps_identity() -> Result<()> {
        let mut catalog = catalog();
        let id = catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        let before = catalog.movie(id).cloned().expect("movie exists");

        let mut edit = catalog.begin_edit(id).expect("edit form");
        assert_eq!(catalog.editing(), Some(id));
        edit.name = "HEAT".to_owned();
        edit.rating = 5;
        catalog.submit_edit(id, &edit)?;

        let after = catalog.movie(id).expect("movie still exists");
        assert_eq!(after.name, "HEAT");
        assert_eq!(after.rating, 5);
        assert_eq!(after.id, before.id);
        assert_eq!(after.date_added, before.date_added);
        assert_eq!(catalog.editing(), None);
        Ok(())
    }

    #[test]
    fn edit_keeps_current_page() -> Result<()> {
        let mut catalog = seeded(13);
        catalog.dispatch(ViewCommand::ChangePage(1));
        let id = catalog.page_items()[0].id;
        let mut edit = catalog.begin_edit(id).expect("edit form");
        edit.rating = 1;
        catalog.submit_edit(id, &edit)?;
        assert_eq!(catalog.page(), 2);
        Ok(())
    }

    #[test]
    fn edit_rejects_name_of_another_movie() -> Result<()> {
        let mut catalog = catalog();
        catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        let id = catalog.add(&form("Ronin", 1998, Genre::Action, 3))?;
        let mut edit = catalog.begin_edit(id).expect("edit form");
        edit.name = "heat".to_owned();
        assert!(catalog.submit_edit(id, &edit).is_err());
        assert_eq!(catalog.movie(id).map(|movie| movie.name.as_str()), Some("Ronin"));
        assert_eq!(catalog.editing(), Some(id));
        Ok(())
    }

    #[test]
    fn delete_requires_commit() {
        let mut catalog = seeded(5);
        let id = catalog.movies()[2].id;

        let pending = catalog.request_delete(id).expect("movie exists");
        assert!(pending.prompt().contains("Movie 2"));
        assert_eq!(catalog.movies().len(), 5);

        catalog.commit(pending);
        assert_eq!(catalog.movies().len(), 4);
        assert_eq!(catalog.stats().total, 4);
        assert!(catalog.visible().iter().all(|movie| movie.id != id));
        assert!(catalog.movie(id).is_none());
    }

    #[test]
    fn deleting_unknown_id_is_noop() {
        let mut catalog = seeded(2);
        let writes = catalog.store().write_count();
        assert!(catalog.request_delete(MovieId::new(42)).is_none());

        let pending = catalog.request_delete(catalog.movies()[0].id).expect("exists");
        let stale = pending.clone();
        catalog.commit(pending);
        catalog.commit(stale);
        assert_eq!(catalog.movies().len(), 1);
        assert_eq!(catalog.store().write_count(), writes + 1);
    }

    #[test]
    fn delete_on_last_page_clamps_page() {
        let mut catalog = seeded(7);
        catalog.dispatch(ViewCommand::ChangePage(1));
        assert_eq!(catalog.page(), 2);
        let last = catalog.page_items()[0].id;
        let pending = catalog.request_delete(last).expect("exists");
        catalog.commit(pending);
        assert_eq!(catalog.total_pages(), 1);
        assert_eq!(catalog.page(), 1);
        assert!(!catalog.pagination_visible());
    }

    #[test]
    fn clear_all_on_empty_catalog_is_rejected_without_write() {
        let mut catalog = catalog();
        catalog.drain_notices();
        assert!(catalog.request_clear_all().is_none());
        assert_eq!(catalog.store().write_count(), 0);
        let notices = catalog.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn clear_all_empties_catalog_and_resets_filters() {
        let mut catalog = seeded(3);
        catalog.dispatch(ViewCommand::SetSearch("movie".to_owned()));
        catalog.dispatch(ViewCommand::SetSort(SortMode::Name));

        let pending = catalog.request_clear_all().expect("catalog has movies");
        assert!(pending.prompt().contains("all 3 movies"));
        catalog.commit(pending);

        assert!(catalog.movies().is_empty());
        assert_eq!(catalog.view().search, "");
        assert_eq!(catalog.view().sort, SortMode::Newest);
        assert_eq!(catalog.stats().total, 0);
        assert_eq!(catalog.store().raw(MOVIES_KEY), Some("[]"));
    }

    #[test]
    fn pagination_bounds() {
        let mut catalog = seeded(13);
        assert_eq!(catalog.total_pages(), 3);
        catalog.dispatch(ViewCommand::ChangePage(1));
        catalog.dispatch(ViewCommand::ChangePage(1));
        assert_eq!(catalog.page(), 3);
        assert_eq!(catalog.page_items().len(), 1);

        let events = catalog.dispatch(ViewCommand::ChangePage(1));
        assert!(events.is_empty());
        assert_eq!(catalog.page(), 3);
    }

    #[test]
    fn filter_change_rederives_view_from_first_page() {
        let mut catalog = seeded(13);
        catalog.dispatch(ViewCommand::ChangePage(1));
        let events = catalog.dispatch(ViewCommand::SetSearch("movie 1".to_owned()));
        assert_eq!(events, vec![ViewEvent::FiltersChanged]);
        assert_eq!(catalog.page(), 1);
        // "Movie 1", "Movie 10", "Movie 11", "Movie 12"
        assert_eq!(catalog.visible().len(), 4);
        assert_eq!(catalog.stats().total, 13);
    }

    #[test]
    fn genre_filter_is_dropped_when_its_last_movie_goes() -> Result<()> {
        let mut catalog = seeded(2);
        let id = catalog.add(&form("Up", 2009, Genre::Animation, 4))?;
        catalog.dispatch(ViewCommand::SetGenre(Some(Genre::Animation)));
        assert_eq!(catalog.visible().len(), 1);

        let pending = catalog.request_delete(id).expect("exists");
        catalog.commit(pending);
        assert_eq!(catalog.view().genre, None);
        assert_eq!(catalog.visible().len(), 2);
        Ok(())
    }

    #[test]
    fn persistence_failure_keeps_mutation_and_notifies() -> Result<()> {
        let mut catalog = Catalog::load(BrokenStore, FixedClock(NOW));
        catalog.drain_notices();
        catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        assert_eq!(catalog.movies().len(), 1);

        let notices = catalog.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(
            notices[0].message,
            "\"Heat\" was added, but save failed: quota exceeded"
        );
        Ok(())
    }

    #[test]
    fn persistence_failure_is_the_last_notice_for_every_mutation() -> Result<()> {
        let mut catalog = Catalog::load(BrokenStore, FixedClock(NOW));
        let id = catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        catalog.add(&form("Ronin", 1998, Genre::Action, 3))?;
        let mut edit = catalog.begin_edit(id).expect("movie exists");
        edit.rating = 5;
        catalog.submit_edit(id, &edit)?;
        let pending = catalog.request_delete(id).expect("movie exists");
        catalog.commit(pending);
        let pending = catalog.request_clear_all().expect("catalog has movies");
        catalog.commit(pending);

        let notices = catalog.drain_notices();
        let failures = notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
            .map(|notice| notice.message.as_str())
            .collect::<Vec<_>>();
        assert_eq!(failures.len(), 5);
        assert!(failures.iter().all(|message| message.contains("save failed")));
        assert!(failures[2].starts_with("\"Heat\" was updated"));
        assert!(failures[4].starts_with("all movies were deleted"));
        Ok(())
    }

    #[test]
    fn import_ids_stay_distinct_when_jitter_window_is_exhausted() {
        let ids = super::import_ids(1_000, 64, 4, &mut rand::rng());
        let distinct = ids.iter().collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 64);
        assert_eq!(distinct.len(), 64);
        assert!(ids.iter().all(|id| id.get() >= 1_000));
    }

    #[test]
    fn export_on_empty_catalog_is_rejected() {
        let mut catalog = catalog();
        assert_eq!(catalog.export(), Err(CatalogError::EmptyCatalog));
    }

    #[test]
    fn export_then_import_round_trips_fields() -> Result<()> {
        let mut source = catalog();
        source.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        source.add(&form("Amélie", 2001, Genre::Romance, 5))?;
        source.add(&form("Up", 2009, Genre::Animation, 3))?;
        let file = source.export()?;

        let mut target = seeded(2);
        let pending = target.request_import(&file.contents)?;
        assert!(pending.prompt().contains("Import 3 movies"));
        target.commit(pending);

        let fields = |movies: &[crate::Movie]| {
            movies
                .iter()
                .map(|movie| (movie.name.clone(), movie.year, movie.genre, movie.rating))
                .collect::<BTreeSet<_>>()
        };
        assert_eq!(fields(target.movies()), fields(source.movies()));
        assert_eq!(target.movies()[0].date_added, NOW);

        let ids = target
            .movies()
            .iter()
            .map(|movie| movie.id)
            .collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 3);
        Ok(())
    }

    #[test]
    fn import_stamps_missing_date_added() -> Result<()> {
        let mut catalog = catalog();
        let pending = catalog.request_import(
            r#"{"movies":[{"name":"Up","year":2009,"genre":"Animation","rating":4}]}"#,
        )?;
        catalog.commit(pending);
        assert_eq!(catalog.movies()[0].date_added, NOW);
        Ok(())
    }

    #[test]
    fn rejected_import_leaves_catalog_untouched() {
        let mut catalog = seeded(2);
        let writes = catalog.store().write_count();
        let error = catalog
            .request_import(r#"{"films":[]}"#)
            .expect_err("missing movies should fail");
        assert_eq!(
            error,
            CatalogError::ImportFormat(ImportFormatError::MissingMovies)
        );
        assert_eq!(catalog.movies().len(), 2);
        assert_eq!(catalog.store().write_count(), writes);
    }

    #[test]
    fn cancelled_import_changes_nothing() -> Result<()> {
        let mut catalog = seeded(2);
        let pending = catalog.request_import(
            r#"{"movies":[{"name":"Up","year":2009,"genre":"Animation","rating":4}]}"#,
        )?;
        drop(pending);
        assert_eq!(catalog.movies().len(), 2);
        Ok(())
    }

    #[test]
    fn check_field_uses_edit_target() -> Result<()> {
        let mut catalog = catalog();
        let id = catalog.add(&form("Heat", 1995, Genre::Thriller, 4))?;
        let typed = form("heat", 1995, Genre::Thriller, 4);
        assert!(catalog.check_field(&typed, MovieField::Name).is_err());
        catalog.begin_edit(id);
        assert!(catalog.check_field(&typed, MovieField::Name).is_ok());
        catalog.cancel_edit();
        assert!(catalog.check_field(&typed, MovieField::Name).is_err());
        Ok(())
    }

    #[test]
    fn clear_filters_emits_info_notice() {
        let mut catalog = seeded(1);
        catalog.dispatch(ViewCommand::ClearFilters);
        let notices = catalog.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Info);
    }
}
