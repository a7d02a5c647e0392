// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cinemanager_app::ExportFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct FsRuntime {
    export_dir: PathBuf,
}

impl FsRuntime {
    pub fn new(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

impl cinemanager_tui::AppRuntime for FsRuntime {
    fn write_export(&mut self, file: &ExportFile) -> Result<PathBuf> {
        fs::create_dir_all(&self.export_dir).with_context(|| {
            format!(
                "create export directory {} -- set [storage].export_dir to a writable folder",
                self.export_dir.display()
            )
        })?;
        let path = self.export_dir.join(&file.file_name);
        fs::write(&path, &file.contents)
            .with_context(|| format!("write backup file {}", path.display()))?;
        info!(path = %path.display(), bytes = file.contents.len(), "wrote backup");
        Ok(path)
    }

    fn read_import(&mut self, path: &str) -> Result<String> {
        let path = expand_home(path.trim());
        fs::read_to_string(&path).with_context(|| {
            format!(
                "read backup file {} -- check the path and try again",
                path.display()
            )
        })
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}
