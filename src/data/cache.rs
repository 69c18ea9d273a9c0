use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};

use super::loader::load_file;
use super::model::SalesDataset;
use crate::config::ColumnMapping;

/// Identity of a loaded source: file, modification time, column mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    mapping: ColumnMapping,
}

impl CacheKey {
    fn for_file(path: &Path, mapping: &ColumnMapping) -> Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("resolving {}", path.display()))?;
        let modified = std::fs::metadata(&path)
            .with_context(|| format!("reading metadata of {}", path.display()))?
            .modified()
            .ok();
        Ok(Self {
            path,
            modified,
            mapping: mapping.clone(),
        })
    }
}

/// Memoizes the last loaded dataset so re-opening an unchanged file skips parsing.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(CacheKey, Arc<SalesDataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset if `path` is unchanged since it was loaded,
    /// otherwise parse it and replace the entry.
    pub fn get_or_load(&mut self, path: &Path, mapping: &ColumnMapping) -> Result<Arc<SalesDataset>> {
        let key = CacheKey::for_file(path, mapping)?;

        if let Some((cached_key, dataset)) = &self.entry {
            if *cached_key == key {
                log::info!("Using cached dataset for {}", key.path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        let dataset = Arc::new(load_file(&key.path, mapping)?);
        log::info!(
            "Loaded {} transactions from {}",
            dataset.len(),
            key.path.display()
        );
        self.entry = Some((key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Forget the cached dataset; the next load parses the file again.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}
