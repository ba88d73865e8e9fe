use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::data::export::export_to_path;
use crate::data::filter::{FilterSelection, FilteredView};
use crate::data::insights::InsightSummary;
use crate::data::loader::DatasetCache;
use crate::data::model::{CellValue, RecordTable};
use crate::data::pipeline::{PipelineError, run_pipeline};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Every interaction funnels
/// through `refilter`, which reruns the pure pipeline and replaces the
/// derived view and insights.
pub struct AppState {
    /// Loaded tables memoized per source path.
    pub cache: DatasetCache,

    /// Path of the table currently on screen.
    pub source_path: Option<PathBuf>,

    /// Current record table (None until a file is loaded).
    pub table: Option<Arc<RecordTable>>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached per frame).
    pub visible_indices: Vec<usize>,

    /// Aggregates over the current view; None while a terminal condition
    /// holds.
    pub insights: Option<InsightSummary>,

    /// Why the last pipeline run produced nothing to render.
    pub pipeline_error: Option<PipelineError>,

    pub theme: Theme,

    /// Load/export error shown in the top bar.
    pub status_message: Option<String>,

    /// Row cap for the filtered-table widget.
    pub table_preview_rows: usize,
}

impl AppState {
    pub fn from_config(config: DashboardConfig) -> Self {
        let mut state = Self {
            cache: DatasetCache::default(),
            source_path: None,
            table: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            insights: None,
            pipeline_error: None,
            theme: config.theme,
            status_message: None,
            table_preview_rows: config.table_preview_rows,
        };
        if let Some(path) = &config.data_path {
            state.load_dataset(path);
        }
        state
    }

    /// Load (or fetch from cache) the dataset at `path`. A missing file is
    /// surfaced as a status message and halts everything downstream.
    pub fn load_dataset(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                self.source_path = Some(path.to_path_buf());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("failed to load dataset: {e}");
                self.status_message = Some(e.to_string());
                self.table = None;
                self.visible_indices.clear();
                self.insights = None;
                self.pipeline_error = None;
            }
        }
    }

    /// Ingest a loaded table and reset filters (empty selection = show all).
    pub fn set_table(&mut self, table: Arc<RecordTable>) {
        self.selection = FilterSelection::default();
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Rerun the pipeline after any selection change.
    pub fn refilter(&mut self) {
        let Some(table) = self.table.clone() else {
            return;
        };
        match run_pipeline(&table, &self.selection) {
            Ok((view, summary)) => {
                self.visible_indices = view.into_indices();
                self.insights = Some(summary);
                self.pipeline_error = None;
            }
            Err(err) => {
                self.visible_indices.clear();
                self.insights = None;
                self.pipeline_error = Some(err);
            }
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let chosen = self.selection.entry(column.to_string()).or_default();
        if chosen.contains(value) {
            chosen.remove(value);
        } else {
            chosen.insert(value.clone());
        }
        self.refilter();
    }

    /// Select every value of a column explicitly.
    pub fn select_all(&mut self, column: &str) {
        if let Some(table) = &self.table {
            if let Some(all_values) = table.unique_values.get(column) {
                let all_values = all_values.clone();
                self.selection.insert(column.to_string(), all_values);
                self.refilter();
            }
        }
    }

    /// Drop a column's constraint entirely (back to "show all").
    pub fn clear_filter(&mut self, column: &str) {
        self.selection.remove(column);
        self.refilter();
    }

    /// The current filtered view, rebuilt from the cached indices.
    pub fn filtered_view(&self) -> Option<FilteredView<'_>> {
        self.table
            .as_deref()
            .map(|table| FilteredView::from_indices(table, self.visible_indices.clone()))
    }

    /// Export the current view as CSV to `path`.
    pub fn export_filtered(&self, path: &Path) -> Result<()> {
        let Some(view) = self.filtered_view() else {
            bail!("no dataset loaded");
        };
        if view.is_empty() {
            bail!("nothing to export for the selected filters");
        }
        export_to_path(&view, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn state_with_table() -> AppState {
        let columns = vec!["School".to_string(), "Dropout".to_string()];
        let rows = vec![
            Row::from([
                ("School".to_string(), CellValue::String("A".into())),
                ("Dropout".to_string(), CellValue::String("yes".into())),
            ]),
            Row::from([
                ("School".to_string(), CellValue::String("B".into())),
                ("Dropout".to_string(), CellValue::String("no".into())),
            ]),
        ];
        let mut state = AppState::from_config(DashboardConfig::default());
        state.set_table(Arc::new(RecordTable::from_rows(columns, rows)));
        state
    }

    #[test]
    fn fresh_table_shows_all_rows() {
        let state = state_with_table();
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert!(state.insights.is_some());
        assert!(state.pipeline_error.is_none());
    }

    #[test]
    fn toggling_and_clearing_filters_recomputes_the_view() {
        let mut state = state_with_table();
        let a = CellValue::String("A".into());

        state.toggle_filter_value("School", &a);
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.insights.as_ref().unwrap().total_students, 1);

        state.toggle_filter_value("School", &a);
        // Set is now empty again → no constraint.
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_filter_value("School", &CellValue::String("missing".into()));
        assert_eq!(state.pipeline_error, Some(PipelineError::NoMatchingRows));
        assert!(state.insights.is_none());

        state.clear_filter("School");
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert!(state.pipeline_error.is_none());
    }

    #[test]
    fn missing_dataset_sets_status_and_halts() {
        let mut state = AppState::from_config(DashboardConfig::default());
        state.load_dataset(Path::new("/no/such/students.csv"));
        assert!(state.table.is_none());
        assert!(state.status_message.as_deref().unwrap_or("").contains("not found"));
        assert!(state.insights.is_none());
    }
}
