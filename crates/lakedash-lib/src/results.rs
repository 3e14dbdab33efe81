//! Reshaping of raw engine output into row-object form.

use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::RawResultSet;

/// Tabular query result with one ordered column-to-value mapping per row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<IndexMap<String, Option<String>>>,
}

impl ResultTable {
    /// Build a table from raw engine output.
    ///
    /// The first raw row is column metadata and is dropped. Rows shorter
    /// than the column list are padded with nulls; extra trailing cells are
    /// ignored. Both are the defined contract, not error conditions.
    pub fn from_raw(raw: &RawResultSet) -> Self {
        let rows = raw
            .rows
            .iter()
            .skip(1)
            .map(|cells| {
                raw.columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| (column.clone(), cells.get(i).cloned().flatten()))
                    .collect()
            })
            .collect();

        Self {
            columns: raw.columns.clone(),
            rows,
        }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn header_row_is_excluded() {
        let raw = RawResultSet {
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![
                vec![cell("a"), cell("b")],
                vec![cell("1"), cell("x")],
                vec![cell("2"), cell("y")],
            ],
        };

        let table = ResultTable::from_raw(&raw);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].get("a"), Some(&cell("1")));
        assert_eq!(table.rows[0].get("b"), Some(&cell("x")));
        assert_eq!(table.rows[1].get("a"), Some(&cell("2")));
        assert_eq!(table.rows[1].get("b"), Some(&cell("y")));
    }

    #[test]
    fn short_rows_pad_missing_cells_with_null() {
        let raw = RawResultSet {
            columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            rows: vec![
                vec![cell("a"), cell("b"), cell("c")],
                vec![cell("1")],
            ],
        };

        let table = ResultTable::from_raw(&raw);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].get("a"), Some(&cell("1")));
        assert_eq!(table.rows[0].get("b"), Some(&None));
        assert_eq!(table.rows[0].get("c"), Some(&None));
    }

    #[test]
    fn extra_trailing_cells_are_ignored() {
        let raw = RawResultSet {
            columns: vec!["a".to_string()],
            rows: vec![
                vec![cell("a")],
                vec![cell("1"), cell("stray")],
            ],
        };

        let table = ResultTable::from_raw(&raw);
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[0].get("a"), Some(&cell("1")));
    }

    #[test]
    fn header_only_result_set_yields_no_rows() {
        let raw = RawResultSet {
            columns: vec!["a".to_string()],
            rows: vec![vec![cell("a")]],
        };
        assert_eq!(ResultTable::from_raw(&raw).row_count(), 0);
    }

    #[test]
    fn empty_result_set_yields_no_rows() {
        assert_eq!(ResultTable::from_raw(&RawResultSet::default()).row_count(), 0);
    }

    #[test]
    fn rows_serialize_in_column_order() {
        let raw = RawResultSet {
            columns: vec!["zulu".to_string(), "alpha".to_string()],
            rows: vec![
                vec![cell("zulu"), cell("alpha")],
                vec![cell("1"), None],
            ],
        };

        let json = serde_json::to_string(&ResultTable::from_raw(&raw)).expect("serializes");
        assert_eq!(
            json,
            r#"{"columns":["zulu","alpha"],"rows":[{"zulu":"1","alpha":null}]}"#
        );
    }
}
