//! Result writer for holdout evaluations and tree renderings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sylva_id3::{Category, ClassMetrics, HoldoutResult, Id3Tree, TreeStats};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes evaluation results and tree renderings to an output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_evaluate.json`,
/// `{experiment}_tree.txt`, `{experiment}_tree.dot` and
/// `{experiment}_tree.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

/// Paths of the three tree renderings written by [`ResultWriter::write_tree`].
#[derive(Debug, Clone, Serialize)]
pub struct TreeArtifacts {
    /// Indented text rendering.
    pub text: PathBuf,
    /// Graphviz rendering.
    pub dot: PathBuf,
    /// JSON dump of the node arena.
    pub json: PathBuf,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a holdout evaluation to `{experiment}_evaluate.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_evaluation(&self, result: &HoldoutResult) -> Result<PathBuf, IoError> {
        let path = self.path_for("evaluate.json");
        let cm = &result.confusion_matrix;

        let predictions: Vec<PredictionEntry<'_>> = result
            .test_indices
            .iter()
            .zip(&result.truth)
            .zip(&result.predicted)
            .map(|((&row, truth), predicted)| PredictionEntry {
                row,
                truth,
                predicted: predicted.as_ref(),
                correct: predicted.as_ref() == Some(truth),
            })
            .collect();

        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            target: result.tree.target(),
            accuracy: result.accuracy,
            n_train: result.n_train,
            n_test: result.n_test,
            n_unknown: result.predicted.iter().filter(|p| p.is_none()).count(),
            tree: result.tree.stats(),
            classes: cm.classes(),
            confusion_matrix: cm.as_rows(),
            unknown: cm.unknown(),
            class_metrics: cm.class_metrics(),
            predictions,
        };

        self.write_json(&path, &artifact, "evaluation")?;
        info!(path = %path.display(), "evaluation result written");
        Ok(path)
    }

    /// Write the text, DOT and JSON renderings of `tree`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::WriteFile`] | A file cannot be written |
    /// | [`IoError::Serialize`] | The tree cannot be serialized |
    #[instrument(skip_all, fields(n_nodes = tree.n_nodes()))]
    pub fn write_tree(&self, tree: &Id3Tree) -> Result<TreeArtifacts, IoError> {
        let text = self.path_for("tree.txt");
        write_file(&text, &tree.render_text())?;

        let dot = self.path_for("tree.dot");
        write_file(&dot, &tree.render_dot())?;

        let json = self.path_for("tree.json");
        self.write_json(&json, tree, "tree")?;

        info!(dir = %self.output_dir.display(), "tree renderings written");
        Ok(TreeArtifacts { text, dot, json })
    }

    fn path_for(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(self.experiment.file_name(suffix))
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
        what: &'static str,
    ) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| IoError::Serialize { what, source: e })?;
        write_file(path, &json)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), IoError> {
    fs::write(path, contents).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    target: &'a str,
    accuracy: f64,
    n_train: usize,
    n_test: usize,
    n_unknown: usize,
    tree: TreeStats,
    classes: &'a [Category],
    confusion_matrix: &'a [Vec<usize>],
    unknown: &'a [usize],
    class_metrics: Vec<ClassMetrics>,
    predictions: Vec<PredictionEntry<'a>>,
}

#[derive(Serialize)]
struct PredictionEntry<'a> {
    row: usize,
    truth: &'a Category,
    predicted: Option<&'a Category>,
    correct: bool,
}
