use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::CellValue;

// ---------------------------------------------------------------------------
// Canonical column names and sentinels
// ---------------------------------------------------------------------------

/// Filterable columns, in the order they appear in the sidebar.
pub const FILTER_COLUMNS: [&str; 5] = ["School", "Area", "Gender", "Socialcategory", "Grade"];

/// Grouping dimensions for dropout breakdowns and modal insights.
pub const DIMENSIONS: [&str; 5] = ["School", "Area", "Socialcategory", "Grade", "Gender"];

pub const DROPOUT_COLUMN: &str = "Dropout";
pub const SCORE_COLUMN: &str = "Dropout_score";
pub const GRADE_COLUMN: &str = "Grade";

/// The affirmative dropout flag. Matched case-sensitively.
pub const AFFIRMATIVE: &str = "yes";

/// Reported instead of a modal category when no affirmative rows exist.
pub const NOT_APPLICABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Insight summary types
// ---------------------------------------------------------------------------

/// Affirmative-dropout counts grouped by one dimension's distinct values.
#[derive(Debug, Clone)]
pub struct GroupedCounts {
    pub column: String,
    /// (value, count) pairs, sorted by value. Only values that occur in the
    /// affirmative subset appear.
    pub counts: Vec<(CellValue, usize)>,
}

/// One point of the grade-wise mean dropout-score trend.
#[derive(Debug, Clone)]
pub struct TrendPoint {
    pub grade: CellValue,
    pub mean_score: f64,
}

/// Pairwise Pearson coefficients across the numeric columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Everything derived from one filtered view. Recomputed on every filter
/// change and discarded with the render cycle.
#[derive(Debug, Clone)]
pub struct InsightSummary {
    pub total_students: usize,
    pub dropouts: usize,
    /// dropouts / total × 100, rounded to 2 decimals; 0.0 for an empty view.
    pub dropout_rate: f64,
    pub dropouts_by_dimension: Vec<GroupedCounts>,
    /// Mean `Dropout_score` per grade over the full view; empty when either
    /// column is absent.
    pub grade_trend: Vec<TrendPoint>,
    /// None when the view has no numeric columns.
    pub correlation: Option<CorrelationMatrix>,
    /// (dimension, most frequent value among affirmative rows). The value
    /// is the "N/A" sentinel when the affirmative subset is empty.
    pub modal_categories: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn is_affirmative(val: Option<&CellValue>) -> bool {
    matches!(val, Some(CellValue::String(s)) if s == AFFIRMATIVE)
}

/// Compute the full insight summary over a filtered view.
pub fn summarize(view: &FilteredView<'_>) -> InsightSummary {
    let total_students = view.len();
    let affirmative: Vec<&super::model::Row> = view
        .rows()
        .filter(|row| is_affirmative(row.get(DROPOUT_COLUMN)))
        .collect();
    let dropouts = affirmative.len();

    let dropout_rate = if total_students == 0 {
        0.0
    } else {
        round2(dropouts as f64 / total_students as f64 * 100.0)
    };

    let dropouts_by_dimension = DIMENSIONS
        .iter()
        .filter(|dim| view.table().has_column(dim))
        .map(|dim| {
            let mut groups: BTreeMap<CellValue, usize> = BTreeMap::new();
            for row in &affirmative {
                if let Some(val) = row.get(*dim) {
                    *groups.entry(val.clone()).or_default() += 1;
                }
            }
            GroupedCounts {
                column: (*dim).to_string(),
                counts: groups.into_iter().collect(),
            }
        })
        .collect();

    let modal_categories = DIMENSIONS
        .iter()
        .map(|dim| {
            let top = modal_value(&affirmative, dim);
            ((*dim).to_string(), top)
        })
        .collect();

    InsightSummary {
        total_students,
        dropouts,
        dropout_rate,
        dropouts_by_dimension,
        grade_trend: grade_trend(view),
        correlation: correlation_matrix(view),
        modal_categories,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Most frequent value of `column` among the affirmative rows; ties resolve
/// to the lexically smallest value so the result is deterministic.
fn modal_value(affirmative: &[&super::model::Row], column: &str) -> String {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for row in affirmative {
        if let Some(val) = row.get(column) {
            *counts.entry(val).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
        .map(|(val, _)| val.to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// Mean dropout score per grade over the whole view (not just affirmative
/// rows). Non-numeric or missing scores are skipped; grades with no usable
/// score are omitted.
fn grade_trend(view: &FilteredView<'_>) -> Vec<TrendPoint> {
    if !view.table().has_column(GRADE_COLUMN) || !view.table().has_column(SCORE_COLUMN) {
        return Vec::new();
    }
    let mut groups: BTreeMap<CellValue, (f64, usize)> = BTreeMap::new();
    for row in view.rows() {
        let (Some(grade), Some(score)) = (row.get(GRADE_COLUMN), row.get(SCORE_COLUMN)) else {
            continue;
        };
        let Some(score) = score.as_f64() else {
            continue;
        };
        let entry = groups.entry(grade.clone()).or_insert((0.0, 0));
        entry.0 += score;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(grade, (sum, n))| TrendPoint {
            grade,
            mean_score: sum / n as f64,
        })
        .collect()
}

/// Pairwise Pearson correlation across all numeric columns of the view.
///
/// Returns `None` when there are no numeric columns. A single numeric
/// column yields the degenerate 1×1 matrix `[[1.0]]`. Pairs with undefined
/// correlation (fewer than two complete observations, or zero variance)
/// report 0.0.
fn correlation_matrix(view: &FilteredView<'_>) -> Option<CorrelationMatrix> {
    let columns = view.table().numeric_columns();
    if columns.is_empty() {
        return None;
    }

    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| {
            view.rows()
                .map(|row| {
                    row.get(col)
                        .and_then(CellValue::as_f64)
                        .unwrap_or(f64::NAN)
                })
                .collect()
        })
        .collect();

    let n = columns.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            values[i][j] = if i == j {
                1.0
            } else {
                pearson(&series[i], &series[j])
            };
        }
    }

    Some(CorrelationMatrix { columns, values })
}

/// Pearson coefficient over the complete (non-NaN) pairs of two series.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { 0.0 } else { cov / denom }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSelection;
    use crate::data::model::{RecordTable, Row};

    /// 10 students, 3 dropouts (Schools: A, A, B) – the reference scenario.
    fn reference_table() -> RecordTable {
        let columns = vec![
            "School".to_string(),
            "Area".to_string(),
            "Gender".to_string(),
            "Socialcategory".to_string(),
            "Grade".to_string(),
            "Dropout".to_string(),
            "Dropout_score".to_string(),
        ];
        let spec: [(&str, &str, &str, &str, i64, &str, f64); 10] = [
            ("A", "Urban", "Male", "General", 7, "yes", 0.9),
            ("A", "Urban", "Female", "General", 7, "yes", 0.8),
            ("B", "Rural", "Male", "OBC", 8, "yes", 0.7),
            ("A", "Urban", "Female", "SC", 7, "no", 0.2),
            ("B", "Rural", "Male", "General", 8, "no", 0.1),
            ("B", "Urban", "Female", "OBC", 9, "no", 0.3),
            ("A", "Rural", "Male", "SC", 9, "no", 0.2),
            ("B", "Urban", "Female", "General", 8, "no", 0.1),
            ("A", "Rural", "Male", "OBC", 7, "no", 0.4),
            ("B", "Urban", "Female", "SC", 9, "no", 0.2),
        ];
        let rows = spec
            .iter()
            .map(|(school, area, gender, caste, grade, dropout, score)| {
                Row::from([
                    ("School".to_string(), CellValue::String(school.to_string())),
                    ("Area".to_string(), CellValue::String(area.to_string())),
                    ("Gender".to_string(), CellValue::String(gender.to_string())),
                    (
                        "Socialcategory".to_string(),
                        CellValue::String(caste.to_string()),
                    ),
                    ("Grade".to_string(), CellValue::Integer(*grade)),
                    ("Dropout".to_string(), CellValue::String(dropout.to_string())),
                    ("Dropout_score".to_string(), CellValue::Float(*score)),
                ])
            })
            .collect();
        RecordTable::from_rows(columns, rows)
    }

    fn full_view(table: &RecordTable) -> FilteredView<'_> {
        FilteredView::new(table, &FilterSelection::new())
    }

    #[test]
    fn reference_scenario_totals_and_groups() {
        let table = reference_table();
        let summary = summarize(&full_view(&table));

        assert_eq!(summary.total_students, 10);
        assert_eq!(summary.dropouts, 3);
        assert!((summary.dropout_rate - 30.0).abs() < 1e-9);

        let by_school = summary
            .dropouts_by_dimension
            .iter()
            .find(|g| g.column == "School")
            .unwrap();
        assert_eq!(
            by_school.counts,
            vec![
                (CellValue::String("A".into()), 2),
                (CellValue::String("B".into()), 1),
            ]
        );
    }

    #[test]
    fn grouped_counts_sum_to_dropout_total() {
        let table = reference_table();
        let summary = summarize(&full_view(&table));
        for group in &summary.dropouts_by_dimension {
            let sum: usize = group.counts.iter().map(|(_, n)| n).sum();
            assert_eq!(sum, summary.dropouts, "dimension {}", group.column);
        }
    }

    #[test]
    fn rate_is_bounded_and_zero_for_empty_view() {
        let table = reference_table();
        let summary = summarize(&full_view(&table));
        assert!(summary.dropout_rate >= 0.0 && summary.dropout_rate <= 100.0);

        let empty = FilteredView::from_indices(&table, Vec::new());
        let summary = summarize(&empty);
        assert_eq!(summary.total_students, 0);
        assert_eq!(summary.dropout_rate, 0.0);
    }

    #[test]
    fn modal_categories_fall_back_to_sentinel() {
        let table = reference_table();
        let summary = summarize(&full_view(&table));
        let by_dim: std::collections::BTreeMap<_, _> =
            summary.modal_categories.iter().cloned().collect();
        assert_eq!(by_dim["School"], "A");
        assert_eq!(by_dim["Area"], "Urban");

        // No affirmative rows at all → every dimension reports the sentinel.
        let no_dropouts = FilteredView::from_indices(&table, vec![3, 4, 5]);
        let summary = summarize(&no_dropouts);
        assert_eq!(summary.dropouts, 0);
        for (_, value) in &summary.modal_categories {
            assert_eq!(value, NOT_APPLICABLE);
        }
        // Grouped counts degrade to empty groupings, not errors.
        for group in &summary.dropouts_by_dimension {
            assert!(group.counts.is_empty());
        }
    }

    #[test]
    fn modal_ties_resolve_to_smallest_value() {
        let columns = vec!["School".to_string(), "Dropout".to_string()];
        let rows = vec![
            Row::from([
                ("School".to_string(), CellValue::String("B".into())),
                ("Dropout".to_string(), CellValue::String("yes".into())),
            ]),
            Row::from([
                ("School".to_string(), CellValue::String("A".into())),
                ("Dropout".to_string(), CellValue::String("yes".into())),
            ]),
        ];
        let table = RecordTable::from_rows(columns, rows);
        let summary = summarize(&full_view(&table));
        let by_dim: std::collections::BTreeMap<_, _> =
            summary.modal_categories.iter().cloned().collect();
        assert_eq!(by_dim["School"], "A");
    }

    #[test]
    fn grade_trend_averages_all_rows() {
        let table = reference_table();
        let summary = summarize(&full_view(&table));
        // Grade 7: scores 0.9, 0.8, 0.2, 0.4 → mean 0.575
        let g7 = summary
            .grade_trend
            .iter()
            .find(|p| p.grade == CellValue::Integer(7))
            .unwrap();
        assert!((g7.mean_score - 0.575).abs() < 1e-9);
        assert_eq!(summary.grade_trend.len(), 3);
    }

    #[test]
    fn correlation_single_numeric_column_is_degenerate_identity() {
        let columns = vec!["School".to_string(), "Dropout_score".to_string()];
        let rows = vec![
            Row::from([
                ("School".to_string(), CellValue::String("A".into())),
                ("Dropout_score".to_string(), CellValue::Float(0.5)),
            ]),
            Row::from([
                ("School".to_string(), CellValue::String("B".into())),
                ("Dropout_score".to_string(), CellValue::Float(0.7)),
            ]),
        ];
        let table = RecordTable::from_rows(columns, rows);
        let summary = summarize(&full_view(&table));
        let corr = summary.correlation.unwrap();
        assert_eq!(corr.columns, vec!["Dropout_score".to_string()]);
        assert_eq!(corr.values, vec![vec![1.0]]);
    }

    #[test]
    fn correlation_omitted_without_numeric_columns() {
        let columns = vec!["School".to_string()];
        let rows = vec![Row::from([(
            "School".to_string(),
            CellValue::String("A".into()),
        )])];
        let table = RecordTable::from_rows(columns, rows);
        assert!(summarize(&full_view(&table)).correlation.is_none());
    }

    #[test]
    fn correlation_detects_linear_relationships() {
        let columns = vec!["X".to_string(), "Y".to_string(), "Z".to_string()];
        let rows: Vec<Row> = (0..8)
            .map(|i| {
                Row::from([
                    ("X".to_string(), CellValue::Float(i as f64)),
                    ("Y".to_string(), CellValue::Float(2.0 * i as f64 + 1.0)),
                    ("Z".to_string(), CellValue::Float(-(i as f64))),
                ])
            })
            .collect();
        let table = RecordTable::from_rows(columns, rows);
        let corr = summarize(&full_view(&table)).correlation.unwrap();
        let idx = |name: &str| corr.columns.iter().position(|c| c == name).unwrap();
        assert!((corr.values[idx("X")][idx("Y")] - 1.0).abs() < 1e-9);
        assert!((corr.values[idx("X")][idx("Z")] + 1.0).abs() < 1e-9);
        for i in 0..corr.columns.len() {
            assert_eq!(corr.values[i][i], 1.0);
        }
    }

    #[test]
    fn zero_variance_pair_reports_zero() {
        let columns = vec!["X".to_string(), "Const".to_string()];
        let rows: Vec<Row> = (0..4)
            .map(|i| {
                Row::from([
                    ("X".to_string(), CellValue::Float(i as f64)),
                    ("Const".to_string(), CellValue::Float(5.0)),
                ])
            })
            .collect();
        let table = RecordTable::from_rows(columns, rows);
        let corr = summarize(&full_view(&table)).correlation.unwrap();
        assert_eq!(corr.values[0][1], 0.0);
    }
}
