use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the record table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common tabular dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether the value counts towards a column's numeric typing.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Column-name normalization
// ---------------------------------------------------------------------------

/// Canonicalize a raw header: trim surrounding whitespace, replace internal
/// spaces with underscores, uppercase the first character and lowercase the
/// rest. Applied exactly once at load time; idempotent, so re-normalizing a
/// canonical name is a no-op.
///
/// `"  Social Category "` → `"Social_category"`, `"GRADE"` → `"Grade"`.
pub fn normalize_column_name(raw: &str) -> String {
    let cleaned = raw.trim().replace(' ', "_");
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => cleaned,
    }
}

// ---------------------------------------------------------------------------
// Row / RecordTable – the loaded dataset
// ---------------------------------------------------------------------------

/// One student record: normalized column name → cell value.
pub type Row = BTreeMap<String, CellValue>;

/// The full parsed dataset with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct RecordTable {
    /// All records (rows), in source order.
    pub rows: Vec<Row>,
    /// Normalized column names, in source order.
    pub columns: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl RecordTable {
    /// Build column indices from loaded rows. `columns` preserves the
    /// source header order; names are expected to be normalized already.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for col in &columns {
            unique_values.entry(col.clone()).or_default();
        }
        for row in &rows {
            for (col, val) in row {
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        RecordTable {
            rows,
            columns,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Columns whose non-null cells are all integers or floats (and which
    /// hold at least one such cell). These feed the correlation matrix.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| {
                let mut seen_numeric = false;
                for row in &self.rows {
                    match row.get(col.as_str()) {
                        Some(CellValue::Null) | None => {}
                        Some(v) if v.is_numeric() => seen_numeric = true,
                        Some(_) => return false,
                    }
                }
                seen_numeric
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_underscores() {
        assert_eq!(normalize_column_name("  Social Category "), "Social_category");
        assert_eq!(normalize_column_name("Dropout Score"), "Dropout_score");
        assert_eq!(normalize_column_name("SocialCategory"), "Socialcategory");
        assert_eq!(normalize_column_name("GRADE"), "Grade");
        assert_eq!(normalize_column_name("school"), "School");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["  Social Category ", "Dropout Score", "GRADE", "x", "", "Área rural"] {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once, "raw = {raw:?}");
        }
    }

    #[test]
    fn numeric_column_detection() {
        let columns = vec!["School".to_string(), "Score".to_string(), "Mixed".to_string()];
        let rows = vec![
            Row::from([
                ("School".to_string(), CellValue::String("A".into())),
                ("Score".to_string(), CellValue::Float(0.4)),
                ("Mixed".to_string(), CellValue::Integer(1)),
            ]),
            Row::from([
                ("School".to_string(), CellValue::String("B".into())),
                ("Score".to_string(), CellValue::Null),
                ("Mixed".to_string(), CellValue::String("two".into())),
            ]),
        ];
        let table = RecordTable::from_rows(columns, rows);
        assert_eq!(table.numeric_columns(), vec!["Score".to_string()]);
    }

    #[test]
    fn unique_values_cover_every_column() {
        let columns = vec!["Area".to_string()];
        let rows = vec![
            Row::from([("Area".to_string(), CellValue::String("Urban".into()))]),
            Row::from([("Area".to_string(), CellValue::String("Rural".into()))]),
            Row::from([("Area".to_string(), CellValue::String("Urban".into()))]),
        ];
        let table = RecordTable::from_rows(columns, rows);
        assert_eq!(table.unique_values["Area"].len(), 2);
    }
}
