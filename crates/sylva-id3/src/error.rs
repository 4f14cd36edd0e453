/// Errors from ID3 training, prediction and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum Id3Error {
    /// Returned when entropy is requested for an empty label sequence.
    #[error("cannot compute entropy of an empty label sequence")]
    EmptyLabels,

    /// Returned when a dataset (or prediction set) has zero rows.
    #[error("dataset has zero rows")]
    EmptyDataset,

    /// Returned when a named column is not part of the dataset.
    #[error("unknown column \"{name}\"")]
    UnknownColumn {
        /// The column name that was looked up.
        name: String,
    },

    /// Returned when two columns share the same name.
    #[error("duplicate column \"{name}\" at positions {first} and {second}")]
    DuplicateColumn {
        /// The duplicated column name.
        name: String,
        /// Zero-based position of the first occurrence.
        first: usize,
        /// Zero-based position of the second occurrence.
        second: usize,
    },

    /// Returned when a row does not have one value per column.
    #[error("row {row_index} has {got} values, expected {expected}")]
    RowLengthMismatch {
        /// Zero-based index of the offending row.
        row_index: usize,
        /// Number of columns in the dataset.
        expected: usize,
        /// Number of values in the row.
        got: usize,
    },

    /// Returned when a feature the tree splits on is absent from the prediction input.
    #[error("prediction input is missing feature column \"{name}\"")]
    MissingFeature {
        /// Name of the missing feature column.
        name: String,
    },

    /// Returned when predictions and true labels have different lengths.
    #[error("got {predicted} predictions for {truth} true labels")]
    LengthMismatch {
        /// Number of predictions.
        predicted: usize,
        /// Number of true labels.
        truth: usize,
    },

    /// Returned when a fractional test size is outside [0.0, 1.0].
    #[error("test fraction must be in [0.0, 1.0], got {fraction}")]
    InvalidTestFraction {
        /// The invalid fraction.
        fraction: f64,
    },

    /// Returned when an absolute test size exceeds the dataset length.
    #[error("test size {count} exceeds dataset length {n_rows}")]
    TestCountTooLarge {
        /// The requested number of test rows.
        count: usize,
        /// Number of rows in the dataset.
        n_rows: usize,
    },

    /// Returned when a test size string is neither a fraction nor a count.
    #[error("cannot parse test size \"{raw}\": expected a fraction like 0.3 or a row count like 45")]
    InvalidTestSize {
        /// The raw input.
        raw: String,
    },
}
