// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Filter, sort and paginate over the in-memory movie list. Every function
//! here is pure; the catalog recomputes the whole pipeline on each change.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::{CatalogStats, Genre, Movie, SortMode};

/// `term` must already be trimmed and lowercased.
pub fn matches(movie: &Movie, term: &str, genre: Option<Genre>) -> bool {
    let matches_search = term.is_empty()
        || movie.name.to_lowercase().contains(term)
        || movie.genre.as_str().to_lowercase().contains(term)
        || movie.year.to_string().contains(term);
    let matches_genre = genre.is_none_or(|wanted| movie.genre == wanted);
    matches_search && matches_genre
}

pub fn filter_movies(movies: &[Movie], term: &str, genre: Option<Genre>) -> Vec<Movie> {
    movies
        .iter()
        .filter(|movie| matches(movie, term, genre))
        .cloned()
        .collect()
}

/// Stable: movies with equal keys keep their incoming order.
pub fn sort_movies(movies: &mut [Movie], mode: SortMode) {
    match mode {
        SortMode::Newest => movies.sort_by(|a, b| b.year.cmp(&a.year)),
        SortMode::Oldest => movies.sort_by(|a, b| a.year.cmp(&b.year)),
        SortMode::Name => movies.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::Rating => movies.sort_by(|a, b| b.rating.cmp(&a.rating)),
    }
}

/// Dictionary order: accents and case are ignored first so "Élite" sorts
/// next to "elite", then the raw strings break the tie.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    let folded_left = collation_key(left);
    let folded_right = collation_key(right);
    folded_left
        .cmp(&folded_right)
        .then_with(|| left.cmp(right))
}

fn collation_key(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' | 'ļ' => 'l',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' | 'ș' => 's',
        'ť' | 'ţ' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Rows for 1-based `page`; empty when the page is out of range.
pub fn page_slice(movies: &[Movie], page: usize, page_size: usize) -> &[Movie] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(page_size))
    else {
        return &[];
    };
    if start >= movies.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(movies.len());
    &movies[start..end]
}

pub fn compute_stats(movies: &[Movie]) -> CatalogStats {
    let total = movies.len();
    let genre_count = movies
        .iter()
        .map(|movie| movie.genre)
        .collect::<BTreeSet<_>>()
        .len();
    let average_year = if total == 0 {
        None
    } else {
        let sum: i64 = movies.iter().map(|movie| i64::from(movie.year)).sum();
        let count = total as i64;
        // Round half up, matching how the totals have always been shown.
        Some((sum * 2 + count).div_euclid(count * 2) as i32)
    };
    CatalogStats {
        total,
        genre_count,
        average_year,
    }
}

/// Distinct genres in the catalog, ordered by label.
pub fn genres_present(movies: &[Movie]) -> Vec<Genre> {
    let mut genres = movies
        .iter()
        .map(|movie| movie.genre)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    genres.sort_by(|a, b| compare_names(a.as_str(), b.as_str()));
    genres
}
