//! Shannon entropy and ID3 information gain over categorical columns.
//!
//! Row subsets are passed as index slices into a shared [`Dataset`] so the
//! recursion never copies rows. Distinct values are always reported in order
//! of first appearance, which fixes branch order and tie-breaking.

use tracing::trace;

use crate::dataset::{Category, Dataset};
use crate::error::Id3Error;

/// Compute the Shannon entropy, in bits, of a label sequence.
///
/// `-Σ p·log2(p)` over the distinct labels, where `p` is the share of the
/// sequence holding that label. A sequence with a single distinct label has
/// entropy `0.0`.
///
/// # Errors
///
/// Returns [`Id3Error::EmptyLabels`] when `labels` is empty.
pub fn entropy<'a, I>(labels: I) -> Result<f64, Id3Error>
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut counts: Vec<(&Category, usize)> = Vec::new();
    let mut n = 0usize;
    for label in labels {
        tally(&mut counts, label);
        n += 1;
    }
    if n == 0 {
        return Err(Id3Error::EmptyLabels);
    }
    Ok(entropy_of_counts(&counts, n))
}

/// Compute the information gain of partitioning `data` by `feature`.
///
/// `H(target) - Σ_v |S_v| / |S| · H(target | feature = v)` over the distinct
/// values `v` of `feature`. No gain-ratio normalisation is applied, so
/// features with many distinct values are favoured.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`Id3Error::UnknownColumn`] | `feature` or `target` is not a column |
/// | [`Id3Error::EmptyDataset`] | `data` has no rows |
pub fn information_gain(data: &Dataset, feature: &str, target: &str) -> Result<f64, Id3Error> {
    let feature_col = data.require_column(feature)?;
    let target_col = data.require_column(target)?;
    if data.is_empty() {
        return Err(Id3Error::EmptyDataset);
    }
    let rows: Vec<usize> = (0..data.n_rows()).collect();
    Ok(gain_over(data, &rows, feature_col, target_col))
}

/// Information gain of `feature_col` for the subset `rows` (non-empty).
pub(crate) fn gain_over(
    data: &Dataset,
    rows: &[usize],
    feature_col: usize,
    target_col: usize,
) -> f64 {
    let n = rows.len() as f64;
    let initial = entropy_of_counts(&class_counts(data, rows, target_col), rows.len());

    let mut weighted = 0.0;
    for (value, subset) in partition(data, rows, feature_col) {
        let subset_entropy =
            entropy_of_counts(&class_counts(data, &subset, target_col), subset.len());
        trace!(
            feature = %data.columns()[feature_col],
            value = %value,
            n_rows = subset.len(),
            entropy = subset_entropy,
            "subset entropy"
        );
        weighted += (subset.len() as f64 / n) * subset_entropy;
    }

    initial - weighted
}

/// Count each distinct value of `col` over `rows`, in first-appearance order.
pub(crate) fn class_counts<'a>(
    data: &'a Dataset,
    rows: &[usize],
    col: usize,
) -> Vec<(&'a Category, usize)> {
    let mut counts: Vec<(&Category, usize)> = Vec::new();
    for &row in rows {
        tally(&mut counts, data.value(row, col));
    }
    counts
}

/// Group `rows` by their value in `col`, in first-appearance order.
pub(crate) fn partition<'a>(
    data: &'a Dataset,
    rows: &[usize],
    col: usize,
) -> Vec<(&'a Category, Vec<usize>)> {
    let mut groups: Vec<(&Category, Vec<usize>)> = Vec::new();
    for &row in rows {
        let value = data.value(row, col);
        match groups.iter().position(|(v, _)| *v == value) {
            Some(i) => groups[i].1.push(row),
            None => groups.push((value, vec![row])),
        }
    }
    groups
}

/// Entropy from per-class counts summing to `n` (`n > 0`).
pub(crate) fn entropy_of_counts(counts: &[(&Category, usize)], n: usize) -> f64 {
    let total = n as f64;
    counts.iter().fold(0.0, |acc, &(_, count)| {
        let p = count as f64 / total;
        acc - p * p.log2()
    })
}

fn tally<'a>(counts: &mut Vec<(&'a Category, usize)>, label: &'a Category) {
    match counts.iter().position(|(c, _)| *c == label) {
        Some(i) => counts[i].1 += 1,
        None => counts.push((label, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::table;

    fn labels(values: &[&str]) -> Vec<Category> {
        values.iter().map(|&v| Category::from(v)).collect()
    }

    #[test]
    fn single_label_has_zero_entropy() {
        assert_eq!(entropy(&labels(&["A"])).unwrap(), 0.0);
        assert_eq!(entropy(&labels(&["B", "B", "B", "B"])).unwrap(), 0.0);
    }

    #[test]
    fn balanced_pair_is_one_bit() {
        let h = entropy(&labels(&["A", "A", "B", "B"])).unwrap();
        assert!((h - 1.0).abs() < 1e-12, "h = {h}");
    }

    #[test]
    fn four_uniform_classes_are_two_bits() {
        let h = entropy(&labels(&["a", "b", "c", "d"])).unwrap();
        assert!((h - 2.0).abs() < 1e-12, "h = {h}");
    }

    #[test]
    fn three_uniform_classes() {
        let h = entropy(&labels(&["a", "b", "c", "a", "b", "c"])).unwrap();
        assert!((h - 3.0_f64.log2()).abs() < 1e-12, "h = {h}");
    }

    #[test]
    fn empty_labels_error() {
        let empty: Vec<Category> = Vec::new();
        assert!(matches!(entropy(&empty), Err(Id3Error::EmptyLabels)));
    }

    #[test]
    fn perfect_feature_gains_full_entropy() {
        let ds = table(
            &["shape", "label"],
            &[&["round", "A"], &["square", "B"], &["round", "A"], &["square", "B"]],
        );
        let gain = information_gain(&ds, "shape", "label").unwrap();
        assert!((gain - 1.0).abs() < 1e-12, "gain = {gain}");
    }

    #[test]
    fn constant_feature_gains_nothing() {
        let ds = table(
            &["colour", "label"],
            &[&["red", "A"], &["red", "B"], &["red", "A"], &["red", "B"]],
        );
        let gain = information_gain(&ds, "colour", "label").unwrap();
        assert!(gain.abs() < 1e-12, "gain = {gain}");
    }

    #[test]
    fn gain_is_never_negative() {
        let ds = table(
            &["a", "b", "c", "label"],
            &[
                &["x", "1", "p", "A"],
                &["y", "1", "q", "B"],
                &["x", "2", "p", "B"],
                &["z", "2", "q", "A"],
                &["y", "3", "p", "A"],
                &["x", "3", "q", "C"],
                &["z", "1", "p", "C"],
            ],
        );
        for feature in ["a", "b", "c"] {
            let gain = information_gain(&ds, feature, "label").unwrap();
            assert!(gain >= -1e-12, "{feature}: gain = {gain}");
        }
    }

    #[test]
    fn partial_feature_gain() {
        // label: A A B B ; feature: x x x y
        // H = 1; H(x) = H(A,A,B) = 0.9183; weighted = 0.75 * 0.9183
        let ds = table(
            &["f", "label"],
            &[&["x", "A"], &["x", "A"], &["x", "B"], &["y", "B"]],
        );
        let expected = 1.0 - 0.75 * (-(2.0 / 3.0_f64) * (2.0 / 3.0_f64).log2()
            - (1.0 / 3.0_f64) * (1.0 / 3.0_f64).log2());
        let gain = information_gain(&ds, "f", "label").unwrap();
        assert!((gain - expected).abs() < 1e-12, "gain = {gain}");
    }

    #[test]
    fn gain_unknown_column() {
        let ds = table(&["f", "label"], &[&["x", "A"]]);
        assert!(matches!(
            information_gain(&ds, "g", "label"),
            Err(Id3Error::UnknownColumn { .. })
        ));
        assert!(matches!(
            information_gain(&ds, "f", "target"),
            Err(Id3Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn gain_empty_dataset() {
        let ds = table(&["f", "label"], &[]);
        assert!(matches!(
            information_gain(&ds, "f", "label"),
            Err(Id3Error::EmptyDataset)
        ));
    }

    #[test]
    fn partition_preserves_first_appearance() {
        let ds = table(&["v"], &[&["b"], &["a"], &["b"], &["c"], &["a"]]);
        let groups = partition(&ds, &[0, 1, 2, 3, 4], 0);
        let order: Vec<&str> = groups.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(groups[0].1, vec![0, 2]);
        assert_eq!(groups[1].1, vec![1, 4]);
        assert_eq!(groups[2].1, vec![3]);
    }

    #[test]
    fn class_counts_on_subset() {
        let ds = table(&["v"], &[&["b"], &["a"], &["b"], &["c"], &["a"]]);
        let counts = class_counts(&ds, &[2, 3, 4], 0);
        let flat: Vec<(&str, usize)> = counts.iter().map(|(c, n)| (c.as_str(), *n)).collect();
        assert_eq!(flat, vec![("b", 1), ("c", 1), ("a", 1)]);
    }
}
