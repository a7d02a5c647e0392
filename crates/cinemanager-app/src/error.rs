// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

use crate::{FieldErrors, MovieId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportFormatError {
    #[error("import file is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("import file has no `movies` list -- choose a cinemanager backup file")]
    MissingMovies,
    #[error("no valid movies found in import file")]
    NoValidEntries,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    ImportFormat(#[from] ImportFormatError),
    #[error("save failed: {0}")]
    Persistence(String),
    #[error("movie {0} no longer exists")]
    NotFound(MovieId),
    #[error("the catalog is empty")]
    EmptyCatalog,
}

impl From<FieldErrors> for CatalogError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
