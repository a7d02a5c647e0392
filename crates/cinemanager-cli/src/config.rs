// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cinemanager_app::{DEFAULT_PAGE_SIZE, SortMode, ViewMode};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::logging;

const CONFIG_VERSION: i64 = 1;
pub const CONFIG_PATH_ENV: &str = "CINEMANAGER_CONFIG_PATH";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
    pub export_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<usize>,
    pub view: Option<String>,
    pub sort: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE),
            view: Some(ViewMode::default().as_str().to_owned()),
            sort: Some(SortMode::default().as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(cinemanager_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [storage], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            cinemanager_db::validate_db_path(db_path)?;
        }

        if let Some(page_size) = self.ui.page_size
            && page_size == 0
        {
            bail!(
                "ui.page_size in {} must be at least 1, got 0",
                path.display()
            );
        }

        if let Some(view) = &self.ui.view
            && ViewMode::parse(view).is_none()
        {
            bail!(
                "ui.view in {} must be `grid` or `list`, got {view:?}",
                path.display()
            );
        }

        if let Some(sort) = &self.ui.sort
            && SortMode::parse(sort).is_none()
        {
            let choices = SortMode::ALL
                .iter()
                .map(|mode| mode.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "ui.sort in {} must be one of {choices}, got {sort:?}",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            logging::parse_level(level)
                .with_context(|| format!("log.level in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => cinemanager_db::default_db_path(),
        }
    }

    pub fn export_dir(&self) -> Result<PathBuf> {
        match &self.storage.export_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => cinemanager_db::default_export_dir(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.ui
            .view
            .as_deref()
            .and_then(ViewMode::parse)
            .unwrap_or_default()
    }

    pub fn sort(&self) -> SortMode {
        self.ui
            .sort
            .as_deref()
            .and_then(SortMode::parse)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log
            .level
            .as_deref()
            .and_then(|level| logging::parse_level(level).ok())
            .unwrap_or(LevelFilter::INFO)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(file) => Ok(PathBuf::from(file)),
            None => cinemanager_db::default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# cinemanager config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/cinemanager/cinemanager.db)\n# db_path = \"/absolute/path/to/cinemanager.db\"\n# Optional. Default is your downloads folder\n# export_dir = \"/absolute/path/to/backups\"\n\n[ui]\npage_size = {}\nview = \"{}\"\nsort = \"{}\"\n\n[log]\n# Overridden by the CINEMANAGER_LOG environment variable\nlevel = \"{}\"\n# file = \"/absolute/path/to/cinemanager.log\"\n",
            path.display(),
            DEFAULT_PAGE_SIZE,
            ViewMode::default().as_str(),
            SortMode::default().as_str(),
            DEFAULT_LOG_LEVEL,
        )
    }
}
