//! Prediction by tree traversal.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::dataset::{Category, Dataset};
use crate::error::Id3Error;
use crate::node::Node;
use crate::tree::Id3Tree;

impl Id3Tree {
    /// Predict the class of every row of `data`, in row order.
    ///
    /// Columns are matched by name, so `data` may omit the target column or
    /// order its columns differently from the training table. A row whose
    /// value at some split has no matching branch gets `None`.
    ///
    /// Rows are traversed in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::MissingFeature`] if `data` lacks a column the
    /// tree splits on.
    #[instrument(skip_all, fields(n_rows = data.n_rows()))]
    pub fn predict(&self, data: &Dataset) -> Result<Vec<Option<Category>>, Id3Error> {
        let resolved = self.resolve_columns(data)?;
        let predictions: Vec<Option<Category>> = data
            .rows()
            .par_iter()
            .map(|row| self.traverse(row, &resolved).cloned())
            .collect();

        debug!(
            n_unknown = predictions.iter().filter(|p| p.is_none()).count(),
            "prediction complete"
        );
        Ok(predictions)
    }

    /// Predict the class of a single row whose values follow `columns`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::MissingFeature`] | `columns` lacks a column the tree splits on |
    /// | [`Id3Error::RowLengthMismatch`] | `row` does not have one value per column |
    pub fn predict_row(
        &self,
        columns: &[String],
        row: &[Category],
    ) -> Result<Option<Category>, Id3Error> {
        let table = Dataset::new(columns.to_vec(), vec![row.to_vec()])?;
        let resolved = self.resolve_columns(&table)?;
        Ok(self.traverse(&table.rows()[0], &resolved).cloned())
    }

    /// Map each training column to its position in `data`.
    ///
    /// Only columns used by a split must be present.
    fn resolve_columns(&self, data: &Dataset) -> Result<Vec<Option<usize>>, Id3Error> {
        let resolved: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|name| data.column_index(name))
            .collect();

        for node in &self.nodes {
            if let Node::Split { feature, .. } = node
                && resolved[feature.index()].is_none()
            {
                return Err(Id3Error::MissingFeature {
                    name: self.feature_name(*feature).to_string(),
                });
            }
        }

        Ok(resolved)
    }

    /// Walk from the root to a leaf; `None` when a value has no branch.
    fn traverse<'a>(&'a self, row: &[Category], resolved: &[Option<usize>]) -> Option<&'a Category> {
        let mut node = self.root();
        loop {
            match node {
                Node::Leaf { class, .. } => return Some(class),
                Node::Split { feature, .. } => {
                    let col = resolved[feature.index()]?;
                    let child = node.child_for(&row[col])?;
                    node = self.node(child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::table;
    use crate::tree::Id3Config;

    fn fitted() -> Id3Tree {
        let train = table(
            &["feature", "target"],
            &[&["x", "A"], &["y", "B"], &["x", "A"]],
        );
        Id3Config::new("target").fit(&train).unwrap()
    }

    #[test]
    fn seen_values_round_trip() {
        let tree = fitted();
        let rows = table(&["feature"], &[&["x"], &["y"]]);
        let predictions = tree.predict(&rows).unwrap();
        assert_eq!(
            predictions,
            vec![Some(Category::from("A")), Some(Category::from("B"))]
        );
    }

    #[test]
    fn unseen_value_has_no_prediction() {
        let tree = fitted();
        let rows = table(&["feature"], &[&["z"]]);
        assert_eq!(tree.predict(&rows).unwrap(), vec![None]);
    }

    #[test]
    fn order_is_preserved() {
        let tree = fitted();
        let rows = table(
            &["feature"],
            &[&["y"], &["z"], &["x"], &["y"], &["x"]],
        );
        let predictions = tree.predict(&rows).unwrap();
        let flat: Vec<Option<&str>> = predictions.iter().map(|p| p.as_ref().map(Category::as_str)).collect();
        assert_eq!(flat, vec![Some("B"), None, Some("A"), Some("B"), Some("A")]);
    }

    #[test]
    fn target_column_is_ignored_and_columns_match_by_name() {
        let tree = fitted();
        let rows = table(&["target", "extra", "feature"], &[&["B", "q", "x"]]);
        assert_eq!(tree.predict(&rows).unwrap(), vec![Some(Category::from("A"))]);
    }

    #[test]
    fn missing_split_column_is_an_error() {
        let tree = fitted();
        let rows = table(&["other"], &[&["x"]]);
        let err = tree.predict(&rows).unwrap_err();
        assert!(matches!(err, Id3Error::MissingFeature { name } if name == "feature"));
    }

    #[test]
    fn leaf_only_tree_needs_no_columns() {
        let train = table(&["f", "label"], &[&["x", "A"], &["y", "A"]]);
        let tree = Id3Config::new("label").fit(&train).unwrap();
        let rows = table(&["unrelated"], &[&["?"], &["!"]]);
        assert_eq!(
            tree.predict(&rows).unwrap(),
            vec![Some(Category::from("A")), Some(Category::from("A"))]
        );
    }

    #[test]
    fn predict_single_row() {
        let tree = fitted();
        let columns = vec!["feature".to_string()];
        let got = tree.predict_row(&columns, &[Category::from("y")]).unwrap();
        assert_eq!(got, Some(Category::from("B")));
        assert!(matches!(
            tree.predict_row(&columns, &[]),
            Err(Id3Error::RowLengthMismatch { .. })
        ));
    }

    #[test]
    fn two_level_traversal() {
        let train = table(
            &["outlook", "windy", "play"],
            &[
                &["sunny", "no", "yes"],
                &["sunny", "yes", "no"],
                &["rain", "no", "yes"],
                &["rain", "yes", "yes"],
                &["sunny", "no", "yes"],
            ],
        );
        // windy separates best; outlook decides among windy rows.
        let tree = Id3Config::new("play").fit(&train).unwrap();
        let rows = table(
            &["outlook", "windy"],
            &[&["sunny", "yes"], &["sunny", "no"], &["rain", "yes"], &["fog", "yes"]],
        );
        let flat: Vec<Option<String>> = tree
            .predict(&rows)
            .unwrap()
            .into_iter()
            .map(|p| p.map(|c| c.to_string()))
            .collect();
        assert_eq!(
            flat,
            vec![Some("no".into()), Some("yes".into()), Some("yes".into()), None]
        );
    }
}
