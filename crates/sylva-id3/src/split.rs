use tracing::debug;

use crate::dataset::Dataset;
use crate::entropy::gain_over;
use crate::error::Id3Error;

/// The winning feature of a split search.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSplit {
    /// Name of the feature with the highest information gain.
    pub feature: String,
    /// Information gain of splitting on `feature`.
    pub gain: f64,
}

/// Find the feature with the highest information gain for `target`.
///
/// Candidates are every column except `target`, in column order. On exact
/// ties the earliest candidate wins. Returns `Ok(None)` when `target` is the
/// only column.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`Id3Error::UnknownColumn`] | `target` is not a column |
/// | [`Id3Error::EmptyDataset`] | `data` has no rows |
pub fn find_best_split(data: &Dataset, target: &str) -> Result<Option<BestSplit>, Id3Error> {
    let target_col = data.require_column(target)?;
    if data.is_empty() {
        return Err(Id3Error::EmptyDataset);
    }
    let rows: Vec<usize> = (0..data.n_rows()).collect();
    Ok(best_split_over(data, &rows, target_col).map(|(col, gain)| BestSplit {
        feature: data.columns()[col].clone(),
        gain,
    }))
}

/// Best `(column, gain)` over the subset `rows` (non-empty).
///
/// The running best starts at -1 and is only replaced by a strictly greater
/// gain, so the first column wins ties.
pub(crate) fn best_split_over(
    data: &Dataset,
    rows: &[usize],
    target_col: usize,
) -> Option<(usize, f64)> {
    let mut best: Option<usize> = None;
    let mut best_gain = -1.0;

    for col in (0..data.n_columns()).filter(|&c| c != target_col) {
        let gain = gain_over(data, rows, col, target_col);
        debug!(feature = %data.columns()[col], gain, "feature gain");
        if gain > best_gain {
            best_gain = gain;
            best = Some(col);
        }
    }

    match best {
        Some(col) => {
            debug!(
                feature = %data.columns()[col],
                gain = best_gain,
                n_rows = rows.len(),
                "best split"
            );
            Some((col, best_gain))
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::table;

    #[test]
    fn picks_most_informative_feature() {
        let ds = table(
            &["noise", "signal", "label"],
            &[
                &["a", "x", "A"],
                &["b", "x", "A"],
                &["a", "y", "B"],
                &["b", "y", "B"],
            ],
        );
        let best = find_best_split(&ds, "label").unwrap().unwrap();
        assert_eq!(best.feature, "signal");
        assert!((best.gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tie_goes_to_first_column() {
        // `first` and `second` are identical columns: identical gain.
        let ds = table(
            &["first", "second", "label"],
            &[&["x", "x", "A"], &["y", "y", "B"], &["x", "x", "A"]],
        );
        let best = find_best_split(&ds, "label").unwrap().unwrap();
        assert_eq!(best.feature, "first");

        let swapped = table(
            &["second", "first", "label"],
            &[&["x", "x", "A"], &["y", "y", "B"], &["x", "x", "A"]],
        );
        let best = find_best_split(&swapped, "label").unwrap().unwrap();
        assert_eq!(best.feature, "second");
    }

    #[test]
    fn zero_gain_still_beats_sentinel() {
        let ds = table(&["constant", "label"], &[&["c", "A"], &["c", "B"]]);
        let best = find_best_split(&ds, "label").unwrap().unwrap();
        assert_eq!(best.feature, "constant");
        assert!(best.gain.abs() < 1e-12);
    }

    #[test]
    fn target_only_has_no_split() {
        let ds = table(&["label"], &[&["A"], &["B"]]);
        assert_eq!(find_best_split(&ds, "label").unwrap(), None);
    }

    #[test]
    fn target_may_be_any_column() {
        let ds = table(
            &["label", "f"],
            &[&["A", "x"], &["B", "y"]],
        );
        let best = find_best_split(&ds, "label").unwrap().unwrap();
        assert_eq!(best.feature, "f");
    }

    #[test]
    fn unknown_target() {
        let ds = table(&["f", "label"], &[&["x", "A"]]);
        assert!(matches!(
            find_best_split(&ds, "species"),
            Err(Id3Error::UnknownColumn { .. })
        ));
    }
}
