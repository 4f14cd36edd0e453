//! Confusion matrix and per-class classification metrics.

use std::fmt;

use crate::dataset::Category;
use crate::error::Id3Error;

/// A confusion matrix for multi-class classification over categorical labels.
///
/// Entry `matrix[t][p]` counts test rows whose true class is `classes[t]`
/// and whose predicted class is `classes[p]`. Rows that received no
/// prediction are counted in `unknown[t]` instead. Classes appear in the
/// order they are first seen in the truth labels, then in the predictions.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConfusionMatrix {
    classes: Vec<Category>,
    matrix: Vec<Vec<usize>>,
    unknown: Vec<usize>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassMetrics {
    /// The class label.
    pub class: Category,
    /// Precision: TP / (TP + FP). 0.0 if no predictions for this class.
    pub precision: f64,
    /// Recall: TP / support. 0.0 if no true samples for this class.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of true samples in this class, including unpredicted ones.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from predictions and true labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::LengthMismatch`] | `predicted` and `truth` differ in length |
    /// | [`Id3Error::EmptyDataset`] | Zero labels provided |
    pub fn from_predictions(
        predicted: &[Option<Category>],
        truth: &[Category],
    ) -> Result<Self, Id3Error> {
        if predicted.len() != truth.len() {
            return Err(Id3Error::LengthMismatch {
                predicted: predicted.len(),
                truth: truth.len(),
            });
        }
        if truth.is_empty() {
            return Err(Id3Error::EmptyDataset);
        }

        let mut classes: Vec<Category> = Vec::new();
        for class in truth.iter().chain(predicted.iter().flatten()) {
            if !classes.contains(class) {
                classes.push(class.clone());
            }
        }
        let position = |c: &Category| classes.iter().position(|k| k == c);

        let n = classes.len();
        let mut matrix = vec![vec![0usize; n]; n];
        let mut unknown = vec![0usize; n];
        for (p, t) in predicted.iter().zip(truth) {
            let Some(t) = position(t) else { continue };
            match p.as_ref().and_then(position) {
                Some(p) => matrix[t][p] += 1,
                None => unknown[t] += 1,
            }
        }

        Ok(Self {
            classes,
            matrix,
            unknown,
        })
    }

    /// Overall accuracy: proportion of correct predictions, unpredicted rows included.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes()).map(|i| self.matrix[i][i]).sum();
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.n_classes();
        (0..n)
            .map(|c| {
                let tp = self.matrix[c][c];
                let fp: usize = (0..n).filter(|&i| i != c).map(|i| self.matrix[i][c]).sum();
                let support: usize = self.matrix[c].iter().sum::<usize>() + self.unknown[c];
                let precision = if tp + fp == 0 {
                    0.0
                } else {
                    tp as f64 / (tp + fp) as f64
                };
                let recall = if support == 0 {
                    0.0
                } else {
                    tp as f64 / support as f64
                };
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: self.classes[c].clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the class labels in first-appearance order.
    #[must_use]
    pub fn classes(&self) -> &[Category] {
        &self.classes
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return, per true class, the number of rows with no prediction.
    #[must_use]
    pub fn unknown(&self) -> &[usize] {
        &self.unknown
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    fn total(&self) -> usize {
        self.matrix.iter().flatten().sum::<usize>() + self.unknown.iter().sum::<usize>()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.as_str().len())
            .chain(std::iter::once("unknown".len()))
            .max()
            .unwrap_or(0);

        write!(f, "{:>width$}", "")?;
        for class in &self.classes {
            write!(f, " {:>width$}", class.as_str())?;
        }
        writeln!(f, " {:>width$}", "unknown")?;

        for (i, row) in self.matrix.iter().enumerate() {
            write!(f, "{:>width$}", self.classes[i].as_str())?;
            for val in row {
                write!(f, " {val:>width$}")?;
            }
            writeln!(f, " {:>width$}", self.unknown[i])?;
        }

        Ok(())
    }
}
