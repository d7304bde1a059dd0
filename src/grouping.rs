// Group keys: the canonical string identity for a row's categorical values.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::scalar::{ColumnType, Formatters, Scalar, format_scalar};
use crate::table::Row;

/// Join the formatted groupby values of one row into its group key.
///
/// A column missing from the row counts as a null value, not an error.
/// An empty `groupby` yields the empty-string key.
pub fn group_key(
    row: &Row,
    groupby: &[String],
    coltypes: &HashMap<String, ColumnType>,
    fmt: &Formatters,
    separator: &str,
) -> String {
    groupby
        .iter()
        .map(|col| {
            let value = row.get(col).unwrap_or(&Scalar::Null);
            format_scalar(value, coltypes.get(col).copied(), fmt)
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Group keys for every row, in input order (parallel to `rows`).
pub fn group(
    rows: &[Row],
    groupby: &[String],
    coltypes: &HashMap<String, ColumnType>,
    fmt: &Formatters,
    separator: &str,
) -> Vec<String> {
    rows.iter()
        .map(|row| group_key(row, groupby, coltypes, fmt, separator))
        .collect()
}

/// Distinct group keys in first-seen order.
pub fn unique_labels(
    rows: &[Row],
    groupby: &[String],
    coltypes: &HashMap<String, ColumnType>,
    fmt: &Formatters,
    separator: &str,
) -> Vec<String> {
    let set: IndexSet<String> = rows
        .iter()
        .map(|row| group_key(row, groupby, coltypes, fmt, separator))
        .collect();
    set.into_iter().collect()
}

/// Map each group key back to the raw (unformatted) groupby values of a row
/// that produced it, for downstream cross-filtering. First-seen key order.
pub fn label_map(
    rows: &[Row],
    groupby: &[String],
    coltypes: &HashMap<String, ColumnType>,
    fmt: &Formatters,
    separator: &str,
) -> IndexMap<String, Vec<Scalar>> {
    let mut map = IndexMap::new();
    for row in rows {
        let key = group_key(row, groupby, coltypes, fmt, separator);
        let raw = groupby
            .iter()
            .map(|col| row.get(col).cloned().unwrap_or(Scalar::Null))
            .collect();
        map.insert(key, raw);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::NULL_STRING;

    fn row(pairs: &[(&str, Scalar)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn joins_with_separator() {
        let r = row(&[
            ("a", Scalar::String("x".to_string())),
            ("b", Scalar::Number(2.0)),
        ]);
        let key = group_key(&r, &cols(&["a", "b"]), &HashMap::new(), &Formatters::default(), ", ");
        assert_eq!(key, "x, 2");
        let key = group_key(&r, &cols(&["a", "b"]), &HashMap::new(), &Formatters::default(), "_");
        assert_eq!(key, "x_2");
    }

    #[test]
    fn empty_groupby_yields_empty_key_for_every_row() {
        let rows = vec![row(&[("a", Scalar::Number(1.0))]), row(&[("a", Scalar::Number(2.0))])];
        let keys = group(&rows, &[], &HashMap::new(), &Formatters::default(), ", ");
        assert_eq!(keys, vec!["", ""]);
        let unique = unique_labels(&rows, &[], &HashMap::new(), &Formatters::default(), ", ");
        assert_eq!(unique, vec![""]);
    }

    #[test]
    fn missing_column_formats_as_null_sentinel() {
        let r = row(&[("a", Scalar::String("x".to_string()))]);
        let key = group_key(
            &r,
            &cols(&["a", "gone"]),
            &HashMap::new(),
            &Formatters::default(),
            ", ",
        );
        assert_eq!(key, format!("x, {NULL_STRING}"));
    }

    #[test]
    fn unique_labels_keep_first_seen_order() {
        let rows = vec![
            row(&[("a", Scalar::String("beta".to_string()))]),
            row(&[("a", Scalar::String("alpha".to_string()))]),
            row(&[("a", Scalar::String("beta".to_string()))]),
        ];
        let unique = unique_labels(&rows, &cols(&["a"]), &HashMap::new(), &Formatters::default(), ", ");
        assert_eq!(unique, vec!["beta", "alpha"]);
    }

    #[test]
    fn label_map_keeps_raw_values() {
        let rows = vec![row(&[
            ("a", Scalar::Null),
            ("b", Scalar::Number(3.0)),
        ])];
        let map = label_map(&rows, &cols(&["a", "b"]), &HashMap::new(), &Formatters::default(), ", ");
        let raw = map.get(&format!("{NULL_STRING}, 3")).unwrap();
        assert_eq!(raw, &vec![Scalar::Null, Scalar::Number(3.0)]);
    }
}
