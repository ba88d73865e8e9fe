use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, RecordTable, Row};

// ---------------------------------------------------------------------------
// Filter selection: which values are chosen per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of chosen values.
/// A column that is absent, or whose set is empty, imposes no constraint
/// (multiselect semantics: choosing nothing means "show all").
pub type FilterSelection = BTreeMap<String, BTreeSet<CellValue>>;

/// Return indices of records that pass all active filters.
///
/// A record passes a column filter when:
/// * The column is absent from `selection` or its set is empty → passes
/// * The record's value for that column is in the chosen set → passes
/// * The record lacks the column entirely → passes only when Null is chosen
///
/// Columns combine conjunctively: a record must satisfy every active one.
pub fn filtered_indices(table: &RecordTable, selection: &FilterSelection) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, selection))
        .map(|(i, _)| i)
        .collect()
}

fn row_matches(row: &Row, selection: &FilterSelection) -> bool {
    for (col, chosen) in selection {
        if chosen.is_empty() {
            continue;
        }
        match row.get(col) {
            Some(val) => {
                if !chosen.contains(val) {
                    return false;
                }
            }
            None => {
                if !chosen.contains(&CellValue::Null) {
                    return false;
                }
            }
        }
    }
    true
}

// ---------------------------------------------------------------------------
// FilteredView – transient subset of the record table
// ---------------------------------------------------------------------------

/// A read-only view of the records passing the current selection. Owned
/// transiently by a render cycle; rebuilt on every selection change.
#[derive(Debug)]
pub struct FilteredView<'a> {
    table: &'a RecordTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a RecordTable, selection: &FilterSelection) -> Self {
        FilteredView {
            table,
            indices: filtered_indices(table, selection),
        }
    }

    /// Rebuild a view from previously computed indices (e.g. cached in the
    /// UI state between frames).
    pub fn from_indices(table: &'a RecordTable, indices: Vec<usize>) -> Self {
        FilteredView { table, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn table(&self) -> &RecordTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// Iterate the rows of the view in table order.
    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.rows[i])
    }

    /// Cell lookup by position within the view.
    pub fn value(&self, view_row: usize, column: &str) -> Option<&CellValue> {
        self.indices
            .get(view_row)
            .and_then(|&i| self.table.rows[i].get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn string_row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::String(v.to_string())))
            .collect()
    }

    fn sample_table() -> RecordTable {
        let columns = vec!["School".to_string(), "Area".to_string()];
        let rows = vec![
            string_row(&[("School", "A"), ("Area", "Urban")]),
            string_row(&[("School", "A"), ("Area", "Rural")]),
            string_row(&[("School", "B"), ("Area", "Urban")]),
            string_row(&[("School", "C"), ("Area", "Rural")]),
        ];
        RecordTable::from_rows(columns, rows)
    }

    fn choose(col: &str, values: &[&str]) -> FilterSelection {
        let mut selection = FilterSelection::new();
        selection.insert(
            col.to_string(),
            values
                .iter()
                .map(|v| CellValue::String(v.to_string()))
                .collect(),
        );
        selection
    }

    #[test]
    fn empty_selection_keeps_every_row() {
        let table = sample_table();
        assert_eq!(
            filtered_indices(&table, &FilterSelection::new()).len(),
            table.len()
        );
        // An explicit empty set behaves the same as no entry at all.
        let mut selection = FilterSelection::new();
        selection.insert("School".to_string(), BTreeSet::new());
        assert_eq!(filtered_indices(&table, &selection).len(), table.len());
    }

    #[test]
    fn single_column_filter_is_membership() {
        let table = sample_table();
        let selection = choose("School", &["A"]);
        assert_eq!(filtered_indices(&table, &selection), vec![0, 1]);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let table = sample_table();
        let mut selection = choose("School", &["A", "B"]);
        selection.extend(choose("Area", &["Urban"]));
        assert_eq!(filtered_indices(&table, &selection), vec![0, 2]);
    }

    #[test]
    fn filtered_count_never_exceeds_table_count() {
        let table = sample_table();
        for values in [&["A"][..], &["A", "B"], &["C"], &["nope"]] {
            let selection = choose("School", values);
            assert!(filtered_indices(&table, &selection).len() <= table.len());
        }
    }

    #[test]
    fn missing_column_passes_only_with_null_chosen() {
        let columns = vec!["School".to_string(), "Area".to_string()];
        let rows = vec![
            string_row(&[("School", "A"), ("Area", "Urban")]),
            string_row(&[("School", "B")]),
        ];
        let table = RecordTable::from_rows(columns, rows);

        let selection = choose("Area", &["Urban"]);
        assert_eq!(filtered_indices(&table, &selection), vec![0]);

        let mut with_null = choose("Area", &["Urban"]);
        with_null
            .get_mut("Area")
            .unwrap()
            .insert(CellValue::Null);
        assert_eq!(filtered_indices(&table, &with_null), vec![0, 1]);
    }

    #[test]
    fn view_iterates_matching_rows_in_order() {
        let table = sample_table();
        let view = FilteredView::new(&table, &choose("Area", &["Rural"]));
        let schools: Vec<String> = view
            .rows()
            .map(|r| r["School"].to_string())
            .collect();
        assert_eq!(schools, vec!["A", "C"]);
    }
}
