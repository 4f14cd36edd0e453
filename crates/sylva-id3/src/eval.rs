//! Accuracy and holdout evaluation for ID3 trees.

use tracing::{info, instrument};

use crate::confusion::ConfusionMatrix;
use crate::dataset::{Category, Dataset};
use crate::error::Id3Error;
use crate::holdout::{Holdout, HoldoutSplit};
use crate::tree::{Id3Config, Id3Tree};

/// Fraction of positions where the prediction equals the true label.
///
/// A missing prediction (`None`) never matches.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`Id3Error::LengthMismatch`] | `predicted` and `truth` differ in length |
/// | [`Id3Error::EmptyDataset`] | Both are empty |
pub fn accuracy(predicted: &[Option<Category>], truth: &[Category]) -> Result<f64, Id3Error> {
    if predicted.len() != truth.len() {
        return Err(Id3Error::LengthMismatch {
            predicted: predicted.len(),
            truth: truth.len(),
        });
    }
    if truth.is_empty() {
        return Err(Id3Error::EmptyDataset);
    }
    let correct = predicted
        .iter()
        .zip(truth)
        .filter(|(p, t)| p.as_ref() == Some(*t))
        .count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Results of a holdout evaluation.
#[derive(Debug)]
pub struct HoldoutResult {
    /// Tree fitted on the train partition.
    pub tree: Id3Tree,
    /// Prediction for each test row.
    pub predicted: Vec<Option<Category>>,
    /// True class of each test row.
    pub truth: Vec<Category>,
    /// Position of each test row in the evaluated dataset.
    pub test_indices: Vec<usize>,
    /// Share of test rows predicted correctly.
    pub accuracy: f64,
    /// Confusion matrix over the test rows.
    pub confusion_matrix: ConfusionMatrix,
    /// Number of training rows.
    pub n_train: usize,
    /// Number of test rows.
    pub n_test: usize,
}

impl Holdout {
    /// Split `data`, fit on the train rows and score on the test rows.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::TestCountTooLarge`] | Row count exceeds the dataset length |
    /// | [`Id3Error::UnknownColumn`] | Target is not a column |
    /// | [`Id3Error::EmptyDataset`] | Train or test partition is empty |
    #[instrument(skip_all, fields(target = %config.target(), n_rows = data.n_rows()))]
    pub fn evaluate(&self, config: &Id3Config, data: &Dataset) -> Result<HoldoutResult, Id3Error> {
        let HoldoutSplit {
            train,
            test,
            test_indices,
        } = self.split(data)?;

        let tree = config.fit(&train)?;
        let truth = test.column(config.target())?;
        let features = test.drop_column(config.target())?;
        let predicted = tree.predict(&features)?;

        let accuracy = accuracy(&predicted, &truth)?;
        let confusion_matrix = ConfusionMatrix::from_predictions(&predicted, &truth)?;

        info!(
            accuracy,
            n_train = train.n_rows(),
            n_test = test.n_rows(),
            n_unknown = predicted.iter().filter(|p| p.is_none()).count(),
            "holdout evaluation complete"
        );

        Ok(HoldoutResult {
            tree,
            predicted,
            truth,
            test_indices,
            accuracy,
            confusion_matrix,
            n_train: train.n_rows(),
            n_test: test.n_rows(),
        })
    }
}
