// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DEFAULT_PAGE_SIZE, Genre, MovieId, SortMode, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub genre: Option<Genre>,
    pub sort: SortMode,
    pub page: usize,
    pub page_size: usize,
    pub view_mode: ViewMode,
    pub editing: Option<MovieId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            genre: None,
            sort: SortMode::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            view_mode: ViewMode::default(),
            editing: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SetSearch(String),
    SetGenre(Option<Genre>),
    SetSort(SortMode),
    ChangePage(isize),
    SetViewMode(ViewMode),
    ClearFilters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    FiltersChanged,
    PageChanged(usize),
    ViewModeChanged(ViewMode),
}

impl ViewState {
    pub fn search_term(&self) -> String {
        self.search.trim().to_lowercase()
    }

    /// Applies `command`; `total_pages` bounds page changes, which are
    /// ignored when they would leave `[1, total_pages]`.
    pub fn dispatch(&mut self, command: ViewCommand, total_pages: usize) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SetSearch(search) => {
                self.search = search;
                self.filters_changed()
            }
            ViewCommand::SetGenre(genre) => {
                self.genre = genre;
                self.filters_changed()
            }
            ViewCommand::SetSort(sort) => {
                self.sort = sort;
                self.filters_changed()
            }
            ViewCommand::ChangePage(delta) => {
                let Some(next) = self.page.checked_add_signed(delta) else {
                    return Vec::new();
                };
                if next < 1 || next > total_pages || next == self.page {
                    return Vec::new();
                }
                self.page = next;
                vec![ViewEvent::PageChanged(next)]
            }
            ViewCommand::SetViewMode(mode) => {
                self.view_mode = mode;
                vec![ViewEvent::ViewModeChanged(mode)]
            }
            ViewCommand::ClearFilters => {
                self.search.clear();
                self.genre = None;
                self.sort = SortMode::default();
                self.filters_changed()
            }
        }
    }

    /// Pulls the page back into `[1, total_pages]` after the row set shrank.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    fn filters_changed(&mut self) -> Vec<ViewEvent> {
        self.page = 1;
        vec![ViewEvent::FiltersChanged]
    }
}
