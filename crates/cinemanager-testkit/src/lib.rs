// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use cinemanager_app::{
    Genre, KeyValueStore, MOVIES_KEY, MemoryStore, Movie, MovieFormInput, MovieId, RATING_MAX,
    RATING_MIN,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const TITLE_OPENERS: [&str; 10] = [
    "The", "Last", "Silent", "Midnight", "Broken", "Northern", "Hidden", "Electric", "Burning",
    "Distant",
];
const TITLE_SUBJECTS: [&str; 18] = [
    "Harbor",
    "Orchard",
    "Signal",
    "Empire",
    "Lighthouse",
    "Frontier",
    "Carnival",
    "Detective",
    "Garden",
    "Station",
    "Voyage",
    "Kingdom",
    "Mirror",
    "Circus",
    "Comet",
    "Canyon",
    "Symphony",
    "Ghost",
];
const TITLE_SUFFIXES: [&str; 8] = [
    "",
    " Returns",
    " II",
    " of Tomorrow",
    " at Dawn",
    " in Winter",
    ": Redux",
    " Rising",
];

const FILM_YEAR_MIN: i32 = 1920;
const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for movie fixtures and the `--demo` catalog.
#[derive(Debug, Clone)]
pub struct MovieFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl MovieFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn title(&mut self) -> String {
        let opener = self.pick(&TITLE_OPENERS);
        let subject = self.pick(&TITLE_SUBJECTS);
        let suffix = self.pick(&TITLE_SUFFIXES);
        format!("{opener} {subject}{suffix}")
    }

    pub fn genre(&mut self) -> Genre {
        Genre::ALL[self.rng.int_n(Genre::ALL.len())]
    }

    pub fn year(&mut self) -> i32 {
        self.int_range_i32(FILM_YEAR_MIN, REFERENCE_YEAR)
    }

    pub fn rating(&mut self) -> u8 {
        let span = usize::from(RATING_MAX - RATING_MIN) + 1;
        RATING_MIN + self.rng.int_n(span) as u8
    }

    /// A form that passes validation against an empty catalog.
    pub fn movie_form(&mut self) -> MovieFormInput {
        MovieFormInput {
            name: self.title(),
            year: self.year().to_string(),
            genre: self.genre().as_str().to_owned(),
            rating: self.rating(),
        }
    }

    /// `count` movies with distinct names and ids, newest first, added in the
    /// days leading up to `now`.
    pub fn movies(&mut self, count: usize, now: OffsetDateTime) -> Vec<Movie> {
        let mut seen = BTreeSet::new();
        let mut movies = Vec::with_capacity(count);
        let mut attempt = 0usize;
        while movies.len() < count {
            let mut name = self.title();
            attempt += 1;
            if !seen.insert(name.to_lowercase()) {
                name = format!("{name} {attempt}");
                seen.insert(name.to_lowercase());
            }
            let date_added = now - Duration::hours(movies.len() as i64 * 7);
            movies.push(Movie {
                id: MovieId::new(millis(date_added)),
                name,
                year: self.year(),
                genre: self.genre(),
                rating: self.rating(),
                date_added,
            });
        }
        movies
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }
}

/// A memory store preloaded with `movies` under the catalog key.
pub fn seeded_store(movies: &[Movie]) -> Result<MemoryStore> {
    let raw = serde_json::to_string(movies).context("serialize fixture movies")?;
    Ok(MemoryStore::with_value(MOVIES_KEY, &raw))
}

/// Store whose reads succeed and writes always fail, for exercising the
/// persistence error path.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    pub value: Option<String>,
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        bail!("storage quota exceeded while writing {key}")
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("cinemanager.db");
    Ok((dir, db_path))
}

pub fn reference_now() -> OffsetDateTime {
    datetime!(2026-02-19 12:34:56 UTC)
}

fn millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
