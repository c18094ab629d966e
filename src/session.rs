//! The explorer's in-memory state: the dataset in effect and the focal table.

use crate::catalog::{Dataset, TableSchema};
use crate::datapackage::{ImportError, ImportMode, import_datapackage};
use crate::graph::{GraphData, build_graph_data, focal_table};
use crate::ui::{UiState, sync};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn read_file_as_text(path: &Path) -> Result<String, ReadError> {
    fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub struct Session {
    bundled: Dataset,
    current: Dataset,
    focal: String,
    mode: ImportMode,
}

impl Session {
    pub fn new(bundled: Dataset, mode: ImportMode) -> Self {
        let focal = focal_table(&bundled.schemas);
        Self {
            current: bundled.clone(),
            bundled,
            focal,
            mode,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.current
    }

    pub fn bundled(&self) -> &Dataset {
        &self.bundled
    }

    pub fn focal(&self) -> &str {
        &self.focal
    }

    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ImportMode) {
        self.mode = mode;
    }

    /// Graph of the current dataset. Predicates pointing at tables outside
    /// the dataset are left out so every edge has both nodes.
    pub fn graph(&self) -> GraphData {
        let edges = self.current.renderable_predicates();
        let dropped = self.current.predicates.len() - edges.len();
        if dropped > 0 {
            log::debug!("{} predicates reference absent tables", dropped);
        }
        build_graph_data(&self.current.schemas, &edges)
    }

    pub fn ui_state<S: AsRef<str>>(&self, link_targets: &[S]) -> UiState {
        sync(&self.current, link_targets)
    }

    /// Link targets of the documentation list: every bundled table.
    pub fn bundled_links(&self) -> Vec<&str> {
        self.bundled.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    /// Replace the dataset with one imported from `raw`. On failure the
    /// current dataset and focal table stay as they were.
    pub fn upload(&mut self, raw: &str) -> Result<(), ImportError> {
        let import = import_datapackage(raw, self.mode, &self.bundled).inspect_err(|e| {
            log::error!("Upload rejected: {}", e);
        })?;

        self.current = import.dataset;
        self.focal = import.focal_table;
        Ok(())
    }

    pub fn upload_file(&mut self, path: &Path) -> Result<(), UploadError> {
        let raw = read_file_as_text(path)?;
        self.upload(&raw)?;
        Ok(())
    }

    /// Returns false, leaving the focal table unchanged, for unknown tables.
    pub fn set_focal(&mut self, name: &str) -> bool {
        if self.current.contains(name) {
            self.focal = name.to_string();
            true
        } else {
            false
        }
    }

    pub fn describe(&self, name: &str) -> Option<&TableSchema> {
        self.current.table(name)
    }

    pub fn reset(&mut self) {
        self.current = self.bundled.clone();
        self.focal = focal_table(&self.current.schemas);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Import(#[from] ImportError),
}
