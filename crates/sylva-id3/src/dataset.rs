//! Categorical tables: the input of training and prediction.

use std::collections::HashMap;
use std::fmt;

use crate::error::Id3Error;

/// A categorical value. Two categories are equal when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from its text.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Return the category text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An ordered table of categorical values with named columns.
///
/// `rows[row_index][column_index]`, every row holding exactly one value per
/// column. Column names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Category>>,
}

impl Dataset {
    /// Build a dataset from column names and row-major values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::DuplicateColumn`] | Two columns share a name |
    /// | [`Id3Error::RowLengthMismatch`] | A row does not have one value per column |
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Category>>) -> Result<Self, Id3Error> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (position, name) in columns.iter().enumerate() {
            if let Some(&first) = seen.get(name.as_str()) {
                return Err(Id3Error::DuplicateColumn {
                    name: name.clone(),
                    first,
                    second: position,
                });
            }
            seen.insert(name.as_str(), position);
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Id3Error::RowLengthMismatch {
                    row_index,
                    expected: columns.len(),
                    got: row.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Return the column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Return the rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Category>] {
        &self.rows
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Return `true` if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the position of a column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Return the position of a column.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::UnknownColumn`] if no column has this name.
    pub fn require_column(&self, name: &str) -> Result<usize, Id3Error> {
        self.column_index(name).ok_or_else(|| Id3Error::UnknownColumn {
            name: name.to_string(),
        })
    }

    /// Return all values of one column in row order.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::UnknownColumn`] if no column has this name.
    pub fn column(&self, name: &str) -> Result<Vec<Category>, Id3Error> {
        let col = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[col].clone()).collect())
    }

    /// Return the value at `(row, col)`.
    pub(crate) fn value(&self, row: usize, col: usize) -> &Category {
        &self.rows[row][col]
    }

    /// Return a new dataset with the given rows, in the given order.
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select(&self, row_indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: row_indices.iter().map(|&r| self.rows[r].clone()).collect(),
        }
    }

    /// Return a new dataset without the named column.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::UnknownColumn`] if no column has this name.
    pub fn drop_column(&self, name: &str) -> Result<Dataset, Id3Error> {
        let col = self.require_column(name)?;
        let columns = self
            .columns
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != col)
            .map(|(_, c)| c.clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(i, _)| i != col)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect();
        Ok(Dataset { columns, rows })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a dataset from string literals.
    pub(crate) fn table(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|&v| Category::from(v)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn category_display_and_equality() {
        let a = Category::new("Iris-setosa");
        assert_eq!(format!("{a}"), "Iris-setosa");
        assert_eq!(a, Category::from("Iris-setosa"));
        assert_ne!(a, Category::from("Iris-virginica"));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Dataset::new(vec!["a".into(), "b".into(), "a".into()], vec![]).unwrap_err();
        assert!(matches!(
            err,
            Id3Error::DuplicateColumn { first: 0, second: 2, .. }
        ));
    }

    #[test]
    fn rejects_short_row() {
        let err = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Id3Error::RowLengthMismatch { row_index: 1, expected: 2, got: 1 }
        ));
    }

    #[test]
    fn column_lookup() {
        let ds = table(&["colour", "label"], &[&["red", "A"], &["blue", "B"]]);
        assert_eq!(ds.column_index("label"), Some(1));
        assert_eq!(ds.column_index("size"), None);
        assert_eq!(
            ds.column("colour").unwrap(),
            vec![Category::from("red"), Category::from("blue")]
        );
        assert!(matches!(
            ds.column("size"),
            Err(Id3Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn select_keeps_requested_order() {
        let ds = table(&["v"], &[&["a"], &["b"], &["c"]]);
        let picked = ds.select(&[2, 0]);
        assert_eq!(picked.n_rows(), 2);
        assert_eq!(picked.rows()[0][0].as_str(), "c");
        assert_eq!(picked.rows()[1][0].as_str(), "a");
    }

    #[test]
    fn drop_column_removes_values() {
        let ds = table(&["Id", "v", "label"], &[&["1", "x", "A"], &["2", "y", "B"]]);
        let dropped = ds.drop_column("Id").unwrap();
        assert_eq!(dropped.columns(), &["v".to_string(), "label".to_string()]);
        assert_eq!(dropped.rows()[1], vec![Category::from("y"), Category::from("B")]);
        assert!(ds.drop_column("missing").is_err());
    }
}
