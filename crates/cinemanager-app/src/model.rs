// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::ids::MovieId;

pub const YEAR_MIN: i32 = 1888;
pub const YEAR_FUTURE_WINDOW: i32 = 10;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;
pub const DEFAULT_PAGE_SIZE: usize = 6;

pub const fn year_max(current_year: i32) -> i32 {
    current_year + YEAR_FUTURE_WINDOW
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Horror,
    Romance,
    ScienceFiction,
    Fantasy,
    Thriller,
    Animation,
    Documentary,
    Musical,
}

impl Genre {
    pub const ALL: [Self; 12] = [
        Self::Action,
        Self::Adventure,
        Self::Comedy,
        Self::Drama,
        Self::Horror,
        Self::Romance,
        Self::ScienceFiction,
        Self::Fantasy,
        Self::Thriller,
        Self::Animation,
        Self::Documentary,
        Self::Musical,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::Horror => "Horror",
            Self::Romance => "Romance",
            Self::ScienceFiction => "Science Fiction",
            Self::Fantasy => "Fantasy",
            Self::Thriller => "Thriller",
            Self::Animation => "Animation",
            Self::Documentary => "Documentary",
            Self::Musical => "Musical",
        }
    }

    /// Label used by catalogs exported from the Portuguese web build.
    const fn legacy_label(self) -> &'static str {
        match self {
            Self::Action => "Ação",
            Self::Adventure => "Aventura",
            Self::Comedy => "Comédia",
            Self::Drama => "Drama",
            Self::Horror => "Terror",
            Self::Romance => "Romance",
            Self::ScienceFiction => "Ficção Científica",
            Self::Fantasy => "Fantasia",
            Self::Thriller => "Suspense",
            Self::Animation => "Animação",
            Self::Documentary => "Documentário",
            Self::Musical => "Musical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|genre| {
            genre.as_str().to_lowercase() == wanted || genre.legacy_label().to_lowercase() == wanted
        })
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Genre {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown genre {raw:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub year: i32,
    pub genre: Genre,
    pub rating: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub date_added: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Name,
    Rating,
}

impl SortMode {
    pub const ALL: [Self; 4] = [Self::Newest, Self::Oldest, Self::Name, Self::Rating];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Name => "name",
            Self::Rating => "rating",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "name" => Some(Self::Name),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "newest first",
            Self::Oldest => "oldest first",
            Self::Name => "name (a-z)",
            Self::Rating => "best rated",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl NoticeLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total: usize,
    pub genre_count: usize,
    pub average_year: Option<i32>,
}

impl CatalogStats {
    pub fn average_year_label(&self) -> String {
        self.average_year
            .map_or_else(|| "-".to_owned(), |year| year.to_string())
    }
}
