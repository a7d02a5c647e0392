// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cinemanager_app::{
    Catalog, CatalogError, Clock, ExportFile, Genre, KeyValueStore, Movie, MovieField,
    MovieFormInput, MovieId, Notice, NoticeLevel, PendingAction, RATING_MAX, RATING_MIN,
    ViewCommand, ViewMode,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::macros::format_description;

const GRID_COLUMNS: usize = 3;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const STAR_FILLED: &str = "★";
const STAR_EMPTY: &str = "☆";
const SELECTED_MARK: &str = "▸";

/// Filesystem side of export and import, kept out of the key handlers so
/// tests can run without touching disk.
pub trait AppRuntime {
    fn write_export(&mut self, file: &ExportFile) -> Result<PathBuf>;
    fn read_import(&mut self, path: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    input: MovieFormInput,
    editing: Option<MovieId>,
    field: MovieField,
    errors: BTreeMap<MovieField, String>,
}

impl FormUiState {
    fn new(input: MovieFormInput, editing: Option<MovieId>) -> Self {
        Self {
            input,
            editing,
            field: MovieField::Name,
            errors: BTreeMap::new(),
        }
    }

    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "edit movie"
        } else {
            "add movie"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Overlay {
    #[default]
    None,
    Search,
    Form(Box<FormUiState>),
    Confirm(PendingAction),
    ImportPath(String),
    Help,
}

#[derive(Debug, Default)]
struct ViewData {
    overlay: Overlay,
    selected: usize,
    status: Option<Notice>,
    status_token: u64,
}

pub fn run_app<S, C, R>(catalog: &mut Catalog<S, C>, runtime: &mut R) -> Result<()>
where
    S: KeyValueStore,
    C: Clock,
    R: AppRuntime,
{
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, &internal_rx);
        pump_notices(catalog, &mut view_data, &internal_tx);

        if let Err(error) = terminal.draw(|frame| render(frame, catalog, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(catalog, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Moves queued catalog notices into the status line. One notice is shown
/// per batch: the newest error if there is one, else the newest notice.
fn pump_notices<S: KeyValueStore, C: Clock>(
    catalog: &mut Catalog<S, C>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(shown) = most_pressing(catalog.drain_notices()) else {
        return;
    };
    view_data.status = Some(shown);
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn most_pressing(mut notices: Vec<Notice>) -> Option<Notice> {
    match notices
        .iter()
        .rposition(|notice| notice.level == NoticeLevel::Error)
    {
        Some(index) => Some(notices.swap_remove(index)),
        None => notices.pop(),
    }
}

fn handle_key_event<S, C, R>(
    catalog: &mut Catalog<S, C>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool
where
    S: KeyValueStore,
    C: Clock,
    R: AppRuntime,
{
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    let overlay = std::mem::take(&mut view_data.overlay);
    let quit = match overlay {
        Overlay::None => handle_browse_key(catalog, runtime, view_data, key),
        Overlay::Search => {
            handle_search_key(catalog, view_data, key);
            false
        }
        Overlay::Form(form) => {
            handle_form_key(catalog, view_data, *form, key);
            false
        }
        Overlay::Confirm(pending) => {
            handle_confirm_key(catalog, view_data, pending, key);
            false
        }
        Overlay::ImportPath(path) => {
            handle_import_path_key(catalog, runtime, view_data, path, key);
            false
        }
        Overlay::Help => {
            if !matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                view_data.overlay = Overlay::Help;
            }
            false
        }
    };

    clamp_selection(catalog, view_data);
    pump_notices(catalog, view_data, internal_tx);
    quit
}

fn handle_browse_key<S, C, R>(
    catalog: &mut Catalog<S, C>,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool
where
    S: KeyValueStore,
    C: Clock,
    R: AppRuntime,
{
    if key.code == KeyCode::Char('k') && key.modifiers.contains(KeyModifiers::CONTROL) {
        view_data.overlay = Overlay::Search;
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('a') => {
            view_data.overlay = Overlay::Form(Box::new(FormUiState::new(
                MovieFormInput::blank(),
                None,
            )));
        }
        KeyCode::Char('e') => {
            if let Some(id) = selected_id(catalog, view_data)
                && let Some(input) = catalog.begin_edit(id)
            {
                view_data.overlay = Overlay::Form(Box::new(FormUiState::new(input, Some(id))));
            }
        }
        KeyCode::Char('d') => {
            if let Some(pending) =
                selected_id(catalog, view_data).and_then(|id| catalog.request_delete(id))
            {
                view_data.overlay = Overlay::Confirm(pending);
            }
        }
        KeyCode::Char('D') => {
            if let Some(pending) = catalog.request_clear_all() {
                view_data.overlay = Overlay::Confirm(pending);
            }
        }
        KeyCode::Char('/') => view_data.overlay = Overlay::Search,
        KeyCode::Char('g') => cycle_genre(catalog, 1),
        KeyCode::Char('G') => cycle_genre(catalog, -1),
        KeyCode::Char('s') => {
            let next = catalog.view().sort.next();
            catalog.dispatch(ViewCommand::SetSort(next));
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if !catalog.dispatch(ViewCommand::ChangePage(-1)).is_empty() {
                view_data.selected = 0;
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if !catalog.dispatch(ViewCommand::ChangePage(1)).is_empty() {
                view_data.selected = 0;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => move_selection(catalog, view_data, -step(catalog)),
        KeyCode::Down | KeyCode::Char('j') => move_selection(catalog, view_data, step(catalog)),
        KeyCode::Tab => move_selection(catalog, view_data, 1),
        KeyCode::BackTab => move_selection(catalog, view_data, -1),
        KeyCode::Char('v') => {
            let next = catalog.view().view_mode.toggled();
            catalog.dispatch(ViewCommand::SetViewMode(next));
        }
        KeyCode::Char('c') => {
            catalog.dispatch(ViewCommand::ClearFilters);
        }
        KeyCode::Char('x') => export(catalog, runtime),
        KeyCode::Char('i') => view_data.overlay = Overlay::ImportPath(String::new()),
        KeyCode::Char('?') => view_data.overlay = Overlay::Help,
        _ => {}
    }
    false
}

fn handle_search_key<S: KeyValueStore, C: Clock>(
    catalog: &mut Catalog<S, C>,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    let mut search = catalog.view().search.clone();
    match key.code {
        KeyCode::Esc | KeyCode::Enter => return,
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => search.clear(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => search.push(ch),
        _ => {}
    }
    view_data.overlay = Overlay::Search;
    if search != catalog.view().search {
        catalog.dispatch(ViewCommand::SetSearch(search));
        view_data.selected = 0;
    }
}

fn handle_form_key<S: KeyValueStore, C: Clock>(
    catalog: &mut Catalog<S, C>,
    view_data: &mut ViewData,
    mut form: FormUiState,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            if form.editing.is_some() {
                catalog.cancel_edit();
            }
            return;
        }
        KeyCode::Enter => {
            let result = match form.editing {
                Some(id) => catalog.submit_edit(id, &form.input),
                None => catalog.add(&form.input).map(|_| ()),
            };
            match result {
                Ok(()) => {
                    if form.editing.is_none() {
                        view_data.selected = 0;
                    }
                    return;
                }
                Err(CatalogError::Validation(errors)) => {
                    form.errors = errors
                        .iter()
                        .map(|(field, message)| (field, message.to_owned()))
                        .collect();
                    if let Some((first, _)) = errors.iter().next() {
                        form.field = first;
                    }
                }
                Err(CatalogError::NotFound(_)) => return,
                Err(_) => {}
            }
        }
        KeyCode::Tab | KeyCode::Down => form.field = shift_field(form.field, 1),
        KeyCode::BackTab | KeyCode::Up => form.field = shift_field(form.field, -1),
        _ => {
            if edit_field(&mut form, key) {
                let check = catalog.check_field(&form.input, form.field);
                match check {
                    Ok(()) => {
                        form.errors.remove(&form.field);
                    }
                    Err(message) => {
                        form.errors.insert(form.field, message);
                    }
                }
            }
        }
    }
    view_data.overlay = Overlay::Form(Box::new(form));
}

/// Applies one key to the focused field; returns whether the input changed.
fn edit_field(form: &mut FormUiState, key: KeyEvent) -> bool {
    let input = &mut form.input;
    match (form.field, key.code) {
        (MovieField::Name, KeyCode::Char(ch)) => input.name.push(ch),
        (MovieField::Name, KeyCode::Backspace) => return input.name.pop().is_some(),
        (MovieField::Year, KeyCode::Char(ch)) if ch.is_ascii_digit() => input.year.push(ch),
        (MovieField::Year, KeyCode::Backspace) => return input.year.pop().is_some(),
        (MovieField::Genre, KeyCode::Right | KeyCode::Char(' ')) => {
            input.genre = shift_genre_label(&input.genre, 1);
        }
        (MovieField::Genre, KeyCode::Left) => input.genre = shift_genre_label(&input.genre, -1),
        (MovieField::Rating, KeyCode::Char(ch)) => {
            let Some(digit) = ch.to_digit(10) else {
                return false;
            };
            let Ok(rating) = u8::try_from(digit) else {
                return false;
            };
            if !(RATING_MIN..=RATING_MAX).contains(&rating) {
                return false;
            }
            input.rating = rating;
        }
        (MovieField::Rating, KeyCode::Right) => {
            input.rating = input.rating.saturating_add(1).clamp(RATING_MIN, RATING_MAX);
        }
        (MovieField::Rating, KeyCode::Left) => {
            input.rating = input.rating.saturating_sub(1).clamp(RATING_MIN, RATING_MAX);
        }
        _ => return false,
    }
    true
}

fn shift_field(field: MovieField, delta: isize) -> MovieField {
    let index = MovieField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or(0);
    let len = MovieField::ALL.len() as isize;
    let next = (index as isize + delta).rem_euclid(len) as usize;
    MovieField::ALL[next]
}

fn shift_genre_label(current: &str, delta: isize) -> String {
    let len = Genre::ALL.len() as isize;
    let next = match Genre::parse(current)
        .and_then(|genre| Genre::ALL.iter().position(|candidate| *candidate == genre))
    {
        Some(index) => (index as isize + delta).rem_euclid(len),
        None if delta < 0 => len - 1,
        None => 0,
    };
    Genre::ALL[next as usize].as_str().to_owned()
}

fn handle_confirm_key<S: KeyValueStore, C: Clock>(
    catalog: &mut Catalog<S, C>,
    view_data: &mut ViewData,
    pending: PendingAction,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => catalog.commit(pending),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
        _ => view_data.overlay = Overlay::Confirm(pending),
    }
}

fn handle_import_path_key<S, C, R>(
    catalog: &mut Catalog<S, C>,
    runtime: &mut R,
    view_data: &mut ViewData,
    mut path: String,
    key: KeyEvent,
) where
    S: KeyValueStore,
    C: Clock,
    R: AppRuntime,
{
    match key.code {
        KeyCode::Esc => return,
        KeyCode::Enter => {
            let trimmed = path.trim();
            if trimmed.is_empty() {
                catalog.notify(Notice::error("enter the path of a backup file"));
            } else {
                match runtime.read_import(trimmed) {
                    Ok(contents) => {
                        if let Ok(pending) = catalog.request_import(&contents) {
                            view_data.overlay = Overlay::Confirm(pending);
                        }
                    }
                    Err(error) => {
                        catalog.notify(Notice::error(format!("import failed: {error:#}")));
                    }
                }
                return;
            }
        }
        KeyCode::Backspace => {
            path.pop();
        }
        KeyCode::Char(ch) => path.push(ch),
        _ => {}
    }
    view_data.overlay = Overlay::ImportPath(path);
}

fn export<S: KeyValueStore, C: Clock, R: AppRuntime>(
    catalog: &mut Catalog<S, C>,
    runtime: &mut R,
) {
    let Ok(file) = catalog.export() else {
        return;
    };
    let count = catalog.movies().len();
    match runtime.write_export(&file) {
        Ok(path) => catalog.notify(Notice::success(format!(
            "exported {count} movies to {}",
            path.display()
        ))),
        Err(error) => catalog.notify(Notice::error(format!("export failed: {error:#}"))),
    }
}

fn cycle_genre<S: KeyValueStore, C: Clock>(catalog: &mut Catalog<S, C>, delta: isize) {
    let mut options = vec![None];
    options.extend(catalog.genres_present().into_iter().map(Some));
    let current = options
        .iter()
        .position(|option| *option == catalog.view().genre)
        .unwrap_or(0);
    let len = options.len() as isize;
    let next = (current as isize + delta).rem_euclid(len) as usize;
    catalog.dispatch(ViewCommand::SetGenre(options[next]));
}

fn step<S: KeyValueStore, C: Clock>(catalog: &Catalog<S, C>) -> isize {
    match catalog.view().view_mode {
        ViewMode::Grid => GRID_COLUMNS as isize,
        ViewMode::List => 1,
    }
}

fn move_selection<S: KeyValueStore, C: Clock>(
    catalog: &Catalog<S, C>,
    view_data: &mut ViewData,
    delta: isize,
) {
    let count = catalog.page_items().len();
    if count == 0 {
        view_data.selected = 0;
        return;
    }
    let next = view_data.selected as isize + delta;
    view_data.selected = next.clamp(0, count as isize - 1) as usize;
}

fn clamp_selection<S: KeyValueStore, C: Clock>(catalog: &Catalog<S, C>, view_data: &mut ViewData) {
    let count = catalog.page_items().len();
    view_data.selected = view_data.selected.min(count.saturating_sub(1));
}

fn selected_id<S: KeyValueStore, C: Clock>(
    catalog: &Catalog<S, C>,
    view_data: &ViewData,
) -> Option<MovieId> {
    catalog
        .page_items()
        .get(view_data.selected)
        .map(|movie| movie.id)
}

fn render<S: KeyValueStore, C: Clock>(
    frame: &mut ratatui::Frame<'_>,
    catalog: &Catalog<S, C>,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(catalog))
        .block(Block::default().title("cinemanager").borders(Borders::ALL))
        .style(Style::default().fg(Color::White));
    frame.render_widget(header, layout[0]);

    let filters = Paragraph::new(filter_text(catalog, &view_data.overlay))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(filters, layout[1]);

    if catalog.page_items().is_empty() {
        let empty = Paragraph::new(empty_text(catalog))
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, layout[2]);
    } else {
        match catalog.view().view_mode {
            ViewMode::Grid => render_grid(frame, layout[2], catalog.page_items(), view_data),
            ViewMode::List => render_list(frame, layout[2], catalog.page_items(), view_data),
        }
    }

    if let Some(pagination) = pagination_text(catalog) {
        let widget = Paragraph::new(pagination).style(Style::default().fg(Color::Cyan));
        frame.render_widget(widget, layout[3]);
    }

    let (status, color) = match &view_data.status {
        Some(notice) => (notice.message.clone(), notice_color(notice.level)),
        None => (hint_text(&view_data.overlay).to_owned(), Color::Yellow),
    };
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[4]);

    match &view_data.overlay {
        Overlay::None | Overlay::Search => {}
        Overlay::Form(form) => {
            let area = centered_rect(60, 50, frame.area());
            frame.render_widget(Clear, area);
            let widget = Paragraph::new(form_lines(form))
                .block(Block::default().title(form.title()).borders(Borders::ALL));
            frame.render_widget(widget, area);
        }
        Overlay::Confirm(pending) => {
            let area = centered_rect(56, 24, frame.area());
            frame.render_widget(Clear, area);
            let widget = Paragraph::new(format!("{}\n\n[y] confirm   [n] cancel", pending.prompt()))
                .block(
                    Block::default()
                        .title("confirm")
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::Red)),
                );
            frame.render_widget(widget, area);
        }
        Overlay::ImportPath(path) => {
            let area = centered_rect(64, 20, frame.area());
            frame.render_widget(Clear, area);
            let widget = Paragraph::new(format!("backup file: {path}_"))
                .block(Block::default().title("import").borders(Borders::ALL));
            frame.render_widget(widget, area);
        }
        Overlay::Help => {
            let area = centered_rect(60, 70, frame.area());
            frame.render_widget(Clear, area);
            let widget = Paragraph::new(help_overlay_text())
                .block(Block::default().title("help").borders(Borders::ALL));
            frame.render_widget(widget, area);
        }
    }
}

fn render_grid(frame: &mut ratatui::Frame<'_>, area: Rect, movies: &[Movie], view_data: &ViewData) {
    let rows = movies.len().div_ceil(GRID_COLUMNS).max(1);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row_index, chunk) in movies.chunks(GRID_COLUMNS).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(row_areas[row_index]);
        for (column, movie) in chunk.iter().enumerate() {
            let index = row_index * GRID_COLUMNS + column;
            let selected = index == view_data.selected;
            let border = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let card = Paragraph::new(card_lines(movie)).block(
                Block::default()
                    .title(truncate_label(&movie.name, 28))
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            frame.render_widget(card, cells[column]);
        }
    }
}

fn render_list(frame: &mut ratatui::Frame<'_>, area: Rect, movies: &[Movie], view_data: &ViewData) {
    let header = Row::new(["", "name", "year", "genre", "rating", "added"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = movies.iter().enumerate().map(|(index, movie)| {
        let marker = if index == view_data.selected {
            SELECTED_MARK
        } else {
            ""
        };
        let row = Row::new(vec![
            Cell::from(marker),
            Cell::from(movie.name.clone()),
            Cell::from(movie.year.to_string()),
            Cell::from(movie.genre.as_str()),
            Cell::from(stars(movie.rating)),
            Cell::from(added_label(movie)),
        ]);
        if index == view_data.selected {
            row.style(Style::default().add_modifier(Modifier::REVERSED))
        } else {
            row
        }
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_text<S: KeyValueStore, C: Clock>(catalog: &Catalog<S, C>) -> String {
    let stats = catalog.stats();
    format!(
        "{} movies  |  {} genres  |  avg year {}",
        stats.total,
        stats.genre_count,
        stats.average_year_label()
    )
}

fn filter_text<S: KeyValueStore, C: Clock>(catalog: &Catalog<S, C>, overlay: &Overlay) -> String {
    let view = catalog.view();
    let cursor = if *overlay == Overlay::Search { "_" } else { "" };
    let genre = view.genre.map_or("all genres", Genre::as_str);
    format!(
        " search: {}{cursor}  genre: {genre}  sort: {}  view: {}",
        view.search,
        view.sort.label(),
        view.view_mode.as_str()
    )
}

fn empty_text<S: KeyValueStore, C: Clock>(catalog: &Catalog<S, C>) -> &'static str {
    if catalog.movies().is_empty() {
        "no movies yet -- press a to add one or i to import a backup"
    } else {
        "no movies match the current filters -- press c to clear them"
    }
}

fn pagination_text<S: KeyValueStore, C: Clock>(catalog: &Catalog<S, C>) -> Option<String> {
    if !catalog.pagination_visible() {
        return None;
    }
    let page = catalog.page();
    let total = catalog.total_pages();
    let previous = if page > 1 { "← prev" } else { "      " };
    let next = if page < total { "next →" } else { "" };
    Some(format!(" {previous}   page {page} of {total}   {next}"))
}

fn hint_text(overlay: &Overlay) -> &'static str {
    match overlay {
        Overlay::None => {
            "a add  e edit  d delete  / search  g genre  s sort  v view  x export  i import  ? help  q quit"
        }
        Overlay::Search => "type to filter  enter/esc done  ctrl-u clear",
        Overlay::Form(_) => "tab next field  ←/→ pick genre or stars  enter save  esc cancel",
        Overlay::Confirm(_) => "y confirm  n cancel",
        Overlay::ImportPath(_) => "enter load file  esc cancel",
        Overlay::Help => "esc close help",
    }
}

fn help_overlay_text() -> &'static str {
    "a        add a movie\n\
     e        edit selected movie\n\
     d        delete selected movie\n\
     D        delete all movies\n\
     / ctrl-k search by name, genre or year\n\
     g G      next / previous genre filter\n\
     s        cycle sort order\n\
     ← →      previous / next page\n\
     ↑ ↓      move selection\n\
     v        toggle grid / list view\n\
     c        clear search, genre and sort\n\
     x        export a backup\n\
     i        import a backup\n\
     q        quit"
}

fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
        NoticeLevel::Info => Color::Blue,
    }
}

fn card_lines(movie: &Movie) -> Vec<Line<'static>> {
    vec![
        Line::from(format!("{}  ·  {}", movie.year, movie.genre)),
        Line::from(Span::styled(
            stars(movie.rating),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            format!("added {}", added_label(movie)),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn form_lines(form: &FormUiState) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(MovieField::ALL.len() * 2);
    for field in MovieField::ALL {
        let value = match field {
            MovieField::Name => form.input.name.clone(),
            MovieField::Year => form.input.year.clone(),
            MovieField::Genre if form.input.genre.is_empty() => "(choose)".to_owned(),
            MovieField::Genre => form.input.genre.clone(),
            MovieField::Rating => stars(form.input.rating),
        };
        let focused = field == form.field;
        let marker = if focused { SELECTED_MARK } else { " " };
        let style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {:<7} {value}", field.label()),
            style,
        )));
        let message = form.errors.get(&field).cloned().unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("          {message}"),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(RATING_MAX));
    let empty = usize::from(RATING_MAX) - filled;
    format!("{}{}", STAR_FILLED.repeat(filled), STAR_EMPTY.repeat(empty))
}

fn added_label(movie: &Movie) -> String {
    movie
        .date_added
        .date()
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn truncate_label(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_owned();
    }
    let mut truncated = value
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
