// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::{Genre, Movie, MovieId, RATING_MAX, RATING_MIN, YEAR_MIN, year_max};

pub const NAME_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MovieField {
    Name,
    Year,
    Genre,
    Rating,
}

impl MovieField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Year, Self::Genre, Self::Rating];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Year => "year",
            Self::Genre => "genre",
            Self::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    errors: BTreeMap<MovieField, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: MovieField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MovieField, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: MovieField, message: String) {
        self.errors.insert(field, message);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Raw input as typed into the add or edit form. A rating of `0` means no
/// stars were picked yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieFormInput {
    pub name: String,
    pub year: String,
    pub genre: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMovie {
    pub name: String,
    pub year: i32,
    pub genre: Genre,
    pub rating: u8,
}

impl MovieFormInput {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            name: movie.name.clone(),
            year: movie.year.to_string(),
            genre: movie.genre.as_str().to_owned(),
            rating: movie.rating,
        }
    }

    pub fn validate(
        &self,
        existing: &[Movie],
        editing: Option<MovieId>,
        current_year: i32,
    ) -> Result<ValidatedMovie, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = self.check_name(existing, editing);
        let year = self.check_year(current_year);
        let genre = self.check_genre();
        let rating = self.check_rating();

        match (name, year, genre, rating) {
            (Ok(name), Ok(year), Ok(genre), Ok(rating)) => {
                return Ok(ValidatedMovie {
                    name,
                    year,
                    genre,
                    rating,
                });
            }
            (name, year, genre, rating) => {
                for (field, result) in [
                    (MovieField::Name, name.map(|_| ())),
                    (MovieField::Year, year.map(|_| ())),
                    (MovieField::Genre, genre.map(|_| ())),
                    (MovieField::Rating, rating.map(|_| ())),
                ] {
                    if let Err(message) = result {
                        errors.insert(field, message);
                    }
                }
            }
        }
        Err(errors)
    }

    pub fn validate_field(
        &self,
        field: MovieField,
        existing: &[Movie],
        editing: Option<MovieId>,
        current_year: i32,
    ) -> Result<(), String> {
        match field {
            MovieField::Name => self.check_name(existing, editing).map(|_| ()),
            MovieField::Year => self.check_year(current_year).map(|_| ()),
            MovieField::Genre => self.check_genre().map(|_| ()),
            MovieField::Rating => self.check_rating().map(|_| ()),
        }
    }

    fn check_name(&self, existing: &[Movie], editing: Option<MovieId>) -> Result<String, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required".to_owned());
        }
        if name.chars().count() < NAME_MIN_CHARS {
            return Err(format!(
                "name must be at least {NAME_MIN_CHARS} characters"
            ));
        }
        let folded = name.to_lowercase();
        let duplicate = existing
            .iter()
            .filter(|movie| Some(movie.id) != editing)
            .any(|movie| movie.name.to_lowercase() == folded);
        if duplicate {
            return Err(format!("a movie named {name:?} is already in the catalog"));
        }
        Ok(name.to_owned())
    }

    fn check_year(&self, current_year: i32) -> Result<i32, String> {
        let raw = self.year.trim();
        if raw.is_empty() {
            return Err("year is required".to_owned());
        }
        let year = raw
            .parse::<i32>()
            .map_err(|_| "year must be a whole number".to_owned())?;
        let max = year_max(current_year);
        if !(YEAR_MIN..=max).contains(&year) {
            return Err(format!("year must be between {YEAR_MIN} and {max}"));
        }
        Ok(year)
    }

    fn check_genre(&self) -> Result<Genre, String> {
        let raw = self.genre.trim();
        if raw.is_empty() {
            return Err("genre is required".to_owned());
        }
        Genre::parse(raw).ok_or_else(|| format!("unknown genre {raw:?}"))
    }

    fn check_rating(&self) -> Result<u8, String> {
        if self.rating == 0 {
            return Err(format!(
                "rating is required -- pick {RATING_MIN} to {RATING_MAX} stars"
            ));
        }
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(format!(
                "rating must be between {RATING_MIN} and {RATING_MAX}"
            ));
        }
        Ok(self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::{MovieField, MovieFormInput};
    use crate::{Genre, Movie, MovieId};
    use time::OffsetDateTime;

    const CURRENT_YEAR: i32 = 2026;

    fn movie(id: i64, name: &str) -> Movie {
        Movie {
            id: MovieId::new(id),
            name: name.to_owned(),
            year: 2010,
            genre: Genre::ScienceFiction,
            rating: 5,
            date_added: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn form(name: &str, year: &str, genre: &str, rating: u8) -> MovieFormInput {
        MovieFormInput {
            name: name.to_owned(),
            year: year.to_owned(),
            genre: genre.to_owned(),
            rating,
        }
    }

    #[test]
    fn valid_form_trims_name_and_parses_fields() {
        let validated = form("  Heat  ", "1995", "Thriller", 4)
            .validate(&[], None, CURRENT_YEAR)
            .expect("form should validate");
        assert_eq!(validated.name, "Heat");
        assert_eq!(validated.year, 1995);
        assert_eq!(validated.genre, Genre::Thriller);
        assert_eq!(validated.rating, 4);
    }

    #[test]
    fn blank_form_reports_every_field() {
        let errors = MovieFormInput::blank()
            .validate(&[], None, CURRENT_YEAR)
            .expect_err("blank form should fail");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(MovieField::Name), Some("name is required"));
        assert_eq!(errors.get(MovieField::Year), Some("year is required"));
        assert_eq!(errors.get(MovieField::Genre), Some("genre is required"));
        assert!(
            errors
                .get(MovieField::Rating)
                .is_some_and(|message| message.contains("rating is required"))
        );
    }

    #[test]
    fn name_uniqueness_is_case_insensitive() {
        let existing = [movie(1, "inception")];
        let errors = form("Inception", "2010", "Science Fiction", 5)
            .validate(&existing, None, CURRENT_YEAR)
            .expect_err("duplicate should fail");
        assert!(
            errors
                .get(MovieField::Name)
                .is_some_and(|message| message.contains("already in the catalog"))
        );
    }

    #[test]
    fn editing_excludes_own_name_from_uniqueness() {
        let existing = [movie(1, "Inception"), movie(2, "Tenet")];
        assert!(
            form("INCEPTION", "2010", "Science Fiction", 5)
                .validate(&existing, Some(MovieId::new(1)), CURRENT_YEAR)
                .is_ok()
        );
        assert!(
            form("tenet", "2020", "Science Fiction", 5)
                .validate(&existing, Some(MovieId::new(1)), CURRENT_YEAR)
                .is_err()
        );
    }

    #[test]
    fn short_name_is_rejected() {
        let result = form(" x ", "2000", "Drama", 3).validate_field(
            MovieField::Name,
            &[],
            None,
            CURRENT_YEAR,
        );
        assert_eq!(
            result,
            Err("name must be at least 2 characters".to_owned())
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let check = |year: &str| {
            form("Film", year, "Drama", 3).validate_field(
                MovieField::Year,
                &[],
                None,
                CURRENT_YEAR,
            )
        };
        assert!(check("1887").is_err());
        assert!(check("1888").is_ok());
        assert!(check("2036").is_ok());
        assert!(check("2037").is_err());
        assert_eq!(check("19x5"), Err("year must be a whole number".to_owned()));
    }

    #[test]
    fn rating_zero_is_unset_and_rejected() {
        let check = |rating: u8| {
            form("Film", "2000", "Drama", rating).validate_field(
                MovieField::Rating,
                &[],
                None,
                CURRENT_YEAR,
            )
        };
        assert!(check(0).is_err());
        assert!(check(1).is_ok());
        assert!(check(5).is_ok());
        assert!(check(6).is_err());
    }

    #[test]
    fn unknown_genre_is_rejected() {
        let errors = form("Film", "2000", "Western", 3)
            .validate(&[], None, CURRENT_YEAR)
            .expect_err("unknown genre should fail");
        assert_eq!(errors.get(MovieField::Genre), Some("unknown genre \"Western\""));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn from_movie_prefills_edit_form() {
        let source = movie(9, "Arrival");
        let prefilled = MovieFormInput::from_movie(&source);
        assert_eq!(prefilled.name, "Arrival");
        assert_eq!(prefilled.year, "2010");
        assert_eq!(prefilled.genre, "Science Fiction");
        assert_eq!(prefilled.rating, 5);
    }
}
