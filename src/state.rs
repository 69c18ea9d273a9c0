use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::StoreColors;
use crate::config::AppConfig;
use crate::data::aggregate::{SalesReport, aggregate};
use crate::data::cache::DatasetCache;
use crate::data::filter::{FilterCriteria, apply};
use crate::data::model::SalesDataset;
use crate::error::ReportError;

/// Filter → aggregate → best month, in one pass.
pub fn build_report(
    dataset: &SalesDataset,
    criteria: &FilterCriteria,
) -> Result<SalesReport, ReportError> {
    let view = apply(dataset, criteria)?;
    let report = aggregate(&view);
    log::debug!(
        "Recomputed report: {} of {} transactions, {} months",
        report.row_count,
        dataset.len(),
        report.monthly.len()
    );
    Ok(report)
}

/// A multiselect column of the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Region,
    Store,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    cache: DatasetCache,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current region / store / period selection.
    pub criteria: FilterCriteria,

    /// Result of the last recompute. `None` while no dataset is loaded.
    pub report: Option<Result<SalesReport, ReportError>>,

    pub store_colors: StoreColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            source: None,
            dataset: None,
            criteria: FilterCriteria::default(),
            report: None,
            store_colors: StoreColors::default(),
            status_message: None,
        }
    }

    /// Load `path` (through the cache) and reset the filters to "everything".
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path, &self.config.columns) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop the cached dataset and read the current source again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        if let Some(path) = self.source.clone() {
            self.open(&path);
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>) {
        self.criteria = FilterCriteria::select_all(&dataset);
        self.store_colors = StoreColors::new(&dataset.stores);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild the report after a criteria change.
    pub fn recompute(&mut self) {
        self.report = self
            .dataset
            .as_deref()
            .map(|ds| build_report(ds, &self.criteria));
    }

    fn selection_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        match dim {
            Dimension::Region => &mut self.criteria.regions,
            Dimension::Store => &mut self.criteria.stores,
        }
    }

    /// Unique values of a dimension, in load order.
    pub fn options(&self, dim: Dimension) -> &[String] {
        match (&self.dataset, dim) {
            (Some(ds), Dimension::Region) => &ds.regions,
            (Some(ds), Dimension::Store) => &ds.stores,
            (None, _) => &[],
        }
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        match dim {
            Dimension::Region => self.criteria.regions.contains(value),
            Dimension::Store => self.criteria.stores.contains(value),
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        let selected = self.selection_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.recompute();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        let all: BTreeSet<String> = self.options(dim).iter().cloned().collect();
        *self.selection_mut(dim) = all;
        self.recompute();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection_mut(dim).clear();
        self.recompute();
    }

    pub fn set_start(&mut self, date: Option<NaiveDate>) {
        self.criteria.period.start = date;
        self.recompute();
    }

    pub fn set_end(&mut self, date: Option<NaiveDate>) {
        self.criteria.period.end = date;
        self.recompute();
    }
}
