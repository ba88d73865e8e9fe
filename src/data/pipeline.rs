use thiserror::Error;

use super::filter::{FilterSelection, FilteredView};
use super::insights::{InsightSummary, summarize};
use super::model::RecordTable;

// ---------------------------------------------------------------------------
// Terminal conditions for one render cycle
// ---------------------------------------------------------------------------

/// The two empty-data conditions the UI must tell apart. Either one halts
/// the cycle before aggregation or chart rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The source table itself has no records (e.g. an empty file).
    #[error("The dataset is empty; nothing to explore.")]
    EmptySource,
    /// The active filter selection excluded every record.
    #[error("No data available for the selected filters.")]
    NoMatchingRows,
}

// ---------------------------------------------------------------------------
// The pure pipeline: (RecordTable, FilterSelection) → (view, insights)
// ---------------------------------------------------------------------------

/// Apply the selection and aggregate, independent of any rendering concern.
/// Aggregation never runs on an empty view; the caller decides how to
/// surface the terminal conditions.
pub fn run_pipeline<'a>(
    table: &'a RecordTable,
    selection: &FilterSelection,
) -> Result<(FilteredView<'a>, InsightSummary), PipelineError> {
    if table.is_empty() {
        return Err(PipelineError::EmptySource);
    }

    let view = FilteredView::new(table, selection);
    if view.is_empty() {
        return Err(PipelineError::NoMatchingRows);
    }

    let summary = summarize(&view);
    Ok((view, summary))
}
