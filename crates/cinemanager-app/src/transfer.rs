// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::{Genre, ImportFormatError, Movie, RATING_MAX, RATING_MIN, YEAR_MIN, year_max};

pub const EXPORT_VERSION: &str = "1.0";
pub const EXPORT_FILE_PREFIX: &str = "cinemanager-backup";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    movies: &'a [Movie],
    #[serde(with = "time::serde::rfc3339")]
    export_date: OffsetDateTime,
    version: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

pub fn export_file(movies: &[Movie], now: OffsetDateTime) -> serde_json::Result<ExportFile> {
    let document = ExportDocument {
        movies,
        export_date: now,
        version: EXPORT_VERSION,
    };
    let contents = serde_json::to_string_pretty(&document)?;
    let date = now
        .date()
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "undated".to_owned());
    Ok(ExportFile {
        file_name: format!("{EXPORT_FILE_PREFIX}-{date}.json"),
        contents,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedMovie {
    pub name: String,
    pub year: i32,
    pub genre: Genre,
    pub rating: u8,
    pub date_added: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub movies: Vec<ImportedMovie>,
    pub skipped: usize,
}

/// Parses a backup document. Only `movies` is required; entries missing a
/// field, out of bounds, or repeating an earlier name are skipped silently.
pub fn parse_import(contents: &str, current_year: i32) -> Result<ImportBatch, ImportFormatError> {
    let document: Value = serde_json::from_str(contents)
        .map_err(|error| ImportFormatError::InvalidJson(error.to_string()))?;
    let entries = document
        .get("movies")
        .and_then(Value::as_array)
        .ok_or(ImportFormatError::MissingMovies)?;

    let mut seen = BTreeSet::new();
    let mut movies = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(movie) = parse_entry(entry, current_year) else {
            continue;
        };
        if seen.insert(movie.name.to_lowercase()) {
            movies.push(movie);
        }
    }

    if movies.is_empty() {
        return Err(ImportFormatError::NoValidEntries);
    }
    Ok(ImportBatch {
        skipped: entries.len() - movies.len(),
        movies,
    })
}

fn parse_entry(entry: &Value, current_year: i32) -> Option<ImportedMovie> {
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let year = whole_number(entry.get("year")?)?;
    let rating = whole_number(entry.get("rating")?)?;
    let genre = Genre::parse(entry.get("genre")?.as_str()?)?;

    let year = i32::try_from(year).ok()?;
    if !(YEAR_MIN..=year_max(current_year)).contains(&year) {
        return None;
    }
    let rating = u8::try_from(rating).ok()?;
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return None;
    }

    let date_added = entry
        .get("dateAdded")
        .and_then(Value::as_str)
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok());

    Some(ImportedMovie {
        name: name.to_owned(),
        year,
        genre,
        rating,
        date_added,
    })
}

fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{EXPORT_VERSION, export_file, parse_import};
    use crate::{Genre, ImportFormatError, Movie, MovieId};
    use serde_json::Value;
    use time::macros::datetime;

    const CURRENT_YEAR: i32 = 2026;

    #[test]
    fn export_document_carries_version_date_and_movies() {
        let movies = vec![Movie {
            id: MovieId::new(7),
            name: "Up".to_owned(),
            year: 2009,
            genre: Genre::Animation,
            rating: 4,
            date_added: datetime!(2026-01-02 03:04:05 UTC),
        }];
        let file = export_file(&movies, datetime!(2026-10-18 09:00:00 UTC))
            .expect("export should serialize");
        assert_eq!(file.file_name, "cinemanager-backup-2026-10-18.json");

        let document: Value = serde_json::from_str(&file.contents).expect("valid json");
        assert_eq!(document["version"], EXPORT_VERSION);
        assert_eq!(document["exportDate"], "2026-10-18T09:00:00Z");
        assert_eq!(document["movies"][0]["name"], "Up");
        assert_eq!(document["movies"][0]["dateAdded"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn rejects_non_json_and_missing_movies() {
        assert!(matches!(
            parse_import("not json", CURRENT_YEAR),
            Err(ImportFormatError::InvalidJson(_))
        ));
        assert_eq!(
            parse_import(r#"{"version":"1.0"}"#, CURRENT_YEAR),
            Err(ImportFormatError::MissingMovies)
        );
        assert_eq!(
            parse_import(r#"{"movies":{"name":"x"}}"#, CURRENT_YEAR),
            Err(ImportFormatError::MissingMovies)
        );
    }

    #[test]
    fn rejects_document_without_surviving_entries() {
        let contents = r#"{"movies":[{"name":"","year":2000,"genre":"Drama","rating":3},{"name":"x"}]}"#;
        assert_eq!(
            parse_import(contents, CURRENT_YEAR),
            Err(ImportFormatError::NoValidEntries)
        );
        assert_eq!(
            parse_import(r#"{"movies":[]}"#, CURRENT_YEAR),
            Err(ImportFormatError::NoValidEntries)
        );
    }

    #[test]
    fn drops_incomplete_and_out_of_bounds_entries() {
        let contents = r#"{
            "movies": [
                {"name": "Cidade de Deus", "year": 2002, "genre": "Drama", "rating": 5,
                 "dateAdded": "2024-05-01T10:00:00.000Z", "id": 1714557600000.123},
                {"name": "No rating", "year": 2002, "genre": "Drama", "rating": 0},
                {"name": "Too old", "year": 1700, "genre": "Drama", "rating": 3},
                {"name": "Bad genre", "year": 2000, "genre": "Western", "rating": 3},
                {"name": "Tropa de Elite", "year": "2007", "genre": "Ação", "rating": 4},
                {"name": "cidade de deus", "year": 2002, "genre": "Drama", "rating": 1}
            ]
        }"#;
        let batch = parse_import(contents, CURRENT_YEAR).expect("import should parse");
        assert_eq!(batch.skipped, 4);
        assert_eq!(batch.movies.len(), 2);

        let first = &batch.movies[0];
        assert_eq!(first.name, "Cidade de Deus");
        assert_eq!(first.date_added, Some(datetime!(2024-05-01 10:00:00 UTC)));

        let second = &batch.movies[1];
        assert_eq!(second.year, 2007);
        assert_eq!(second.genre, Genre::Action);
        assert_eq!(second.date_added, None);
    }
}
