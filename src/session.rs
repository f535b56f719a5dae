//! Immutable load/selection state.
//!
//! A [`Session`] is a snapshot: the loaded [`TableSet`], the active table name and the path it
//! came from. [`Session::load`] and [`Session::select`] return new snapshots and leave the
//! receiver untouched, so a failed load simply means the caller keeps the snapshot it has.
//!
//! ```no_run
//! use table_loader::ingestion::LoadOptions;
//! use table_loader::Session;
//!
//! # fn main() -> Result<(), table_loader::LoadError> {
//! let session = Session::new().load("workbook.xlsx", &LoadOptions::default())?;
//! let session = session.select("Sheet2");
//! println!("{}", session.summary()?);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::ingestion::{LoadOptions, load_from_path};
use crate::processing::{Summary, describe};
use crate::types::{Table, TableSet};

/// Snapshot of what is loaded and which table is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    tables: Option<Arc<TableSet>>,
    active: Option<String>,
    source: Option<PathBuf>,
}

impl Session {
    /// An empty session: nothing loaded, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` into a new snapshot whose active table is the first table of the file.
    ///
    /// On failure the error is returned and `self` is unchanged.
    pub fn load(&self, path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<Self> {
        let path = path.as_ref();
        let tables = load_from_path(path, options)?;
        let active = tables.first_name().map(str::to_owned);
        log::debug!(
            "session loaded {} table(s) from {}, active {:?}",
            tables.len(),
            path.display(),
            active
        );
        Ok(Self {
            tables: Some(Arc::new(tables)),
            active,
            source: Some(path.to_path_buf()),
        })
    }

    /// A snapshot with `name` active. Unknown names leave the selection as it is.
    pub fn select(&self, name: &str) -> Self {
        match &self.tables {
            Some(tables) if tables.contains(name) => Self {
                active: Some(name.to_owned()),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// The loaded tables, if any.
    pub fn tables(&self) -> Option<&TableSet> {
        self.tables.as_deref()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_table(&self) -> Option<&Table> {
        let name = self.active.as_deref()?;
        self.tables.as_deref()?.get(name)
    }

    /// Path of the file the tables were loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Summarize the active table.
    ///
    /// Returns [`LoadError::EmptySelection`] when nothing is loaded.
    pub fn summary(&self) -> LoadResult<Summary> {
        self.active_table()
            .map(describe)
            .ok_or(LoadError::EmptySelection)
    }
}
