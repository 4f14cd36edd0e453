//! Seeded train/test partition of a dataset.

use std::str::FromStr;

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Id3Error;

/// Size of the test partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestSize {
    /// Share of the rows, in [0.0, 1.0]; resolves to `round(fraction * n_rows)`.
    Fraction(f64),
    /// Exact number of rows, at most the dataset length.
    Count(usize),
}

impl TestSize {
    fn resolve(self, n_rows: usize) -> Result<usize, Id3Error> {
        match self {
            TestSize::Fraction(fraction) => Ok((fraction * n_rows as f64).round() as usize),
            TestSize::Count(count) if count > n_rows => {
                Err(Id3Error::TestCountTooLarge { count, n_rows })
            }
            TestSize::Count(count) => Ok(count),
        }
    }
}

impl FromStr for TestSize {
    type Err = Id3Error;

    /// `0.3` and `3e-1` are fractions, `45` is a row count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || Id3Error::InvalidTestSize { raw: s.to_string() };
        if raw.contains(['.', 'e', 'E']) {
            raw.parse::<f64>().map(TestSize::Fraction).map_err(|_| invalid())
        } else {
            raw.parse::<usize>().map(TestSize::Count).map_err(|_| invalid())
        }
    }
}

/// Random train/test partition.
///
/// Construct via [`Holdout::new`], then chain `with_seed` for a reproducible
/// split. Without a seed the generator is seeded from OS entropy.
#[derive(Debug, Clone)]
pub struct Holdout {
    test_size: TestSize,
    seed: Option<u64>,
}

/// Train and test tables produced by [`Holdout::split`].
#[derive(Debug, Clone)]
pub struct HoldoutSplit {
    /// Rows not drawn for testing, in original order.
    pub train: Dataset,
    /// Rows drawn for testing, in draw order.
    pub test: Dataset,
    /// Original positions of the test rows, aligned with `test`.
    pub test_indices: Vec<usize>,
}

impl Holdout {
    /// Create a holdout with the given test size.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::InvalidTestFraction`] if a fraction is outside
    /// [0.0, 1.0] or NaN.
    pub fn new(test_size: TestSize) -> Result<Self, Id3Error> {
        if let TestSize::Fraction(fraction) = test_size
            && !(0.0..=1.0).contains(&fraction)
        {
            return Err(Id3Error::InvalidTestFraction { fraction });
        }
        Ok(Self {
            test_size,
            seed: None,
        })
    }

    /// Set the random seed for the draw.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Return the test size.
    #[must_use]
    pub fn test_size(&self) -> TestSize {
        self.test_size
    }

    /// Return the random seed, if set.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Partition `data` into disjoint train and test tables covering every row.
    ///
    /// Test rows are drawn without replacement.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::TestCountTooLarge`] if a row count exceeds the
    /// dataset length.
    pub fn split(&self, data: &Dataset) -> Result<HoldoutSplit, Id3Error> {
        let n_rows = data.n_rows();
        let n_test = self.test_size.resolve(n_rows)?;

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let test_indices = index::sample(&mut rng, n_rows, n_test).into_vec();

        let mut in_test = vec![false; n_rows];
        for &i in &test_indices {
            in_test[i] = true;
        }
        let train_indices: Vec<usize> = (0..n_rows).filter(|&i| !in_test[i]).collect();

        debug!(n_rows, n_train = train_indices.len(), n_test, "holdout split");

        Ok(HoldoutSplit {
            train: data.select(&train_indices),
            test: data.select(&test_indices),
            test_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Category;

    fn ten_rows() -> Dataset {
        let rows: Vec<Vec<Category>> = (0..10)
            .map(|i| {
                vec![
                    Category::new(i.to_string()),
                    Category::new(if i % 2 == 0 { "even" } else { "odd" }),
                ]
            })
            .collect();
        Dataset::new(vec!["n".into(), "parity".into()], rows).unwrap()
    }

    #[test]
    fn fraction_split_sizes() {
        let ds = ten_rows();
        let split = Holdout::new(TestSize::Fraction(0.3))
            .unwrap()
            .with_seed(0)
            .split(&ds)
            .unwrap();
        assert_eq!(split.test.n_rows(), 3);
        assert_eq!(split.train.n_rows(), 7);

        let mut seen: Vec<&str> = split
            .train
            .rows()
            .iter()
            .chain(split.test.rows())
            .map(|r| r[0].as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 10, "train and test must be disjoint and cover the input");
    }

    #[test]
    fn train_keeps_original_order() {
        let ds = ten_rows();
        let split = Holdout::new(TestSize::Count(4)).unwrap().with_seed(7).split(&ds).unwrap();
        let train: Vec<usize> = split
            .train
            .rows()
            .iter()
            .map(|r| r[0].as_str().parse().unwrap())
            .collect();
        assert!(train.windows(2).all(|w| w[0] < w[1]));
        for (row, &i) in split.test.rows().iter().zip(&split.test_indices) {
            assert_eq!(row[0].as_str(), i.to_string());
        }
    }

    #[test]
    fn same_seed_same_split() {
        let ds = ten_rows();
        let holdout = Holdout::new(TestSize::Fraction(0.5)).unwrap().with_seed(42);
        let a = holdout.split(&ds).unwrap();
        let b = holdout.split(&ds).unwrap();
        assert_eq!(a.test_indices, b.test_indices);
    }

    #[test]
    fn invalid_fraction_rejected() {
        assert!(matches!(
            Holdout::new(TestSize::Fraction(1.5)),
            Err(Id3Error::InvalidTestFraction { .. })
        ));
        assert!(Holdout::new(TestSize::Fraction(-0.1)).is_err());
        assert!(Holdout::new(TestSize::Fraction(f64::NAN)).is_err());
    }

    #[test]
    fn count_larger_than_dataset_rejected() {
        let err = Holdout::new(TestSize::Count(11))
            .unwrap()
            .with_seed(0)
            .split(&ten_rows())
            .unwrap_err();
        assert!(matches!(err, Id3Error::TestCountTooLarge { count: 11, n_rows: 10 }));
    }

    #[test]
    fn boundary_fractions() {
        let ds = ten_rows();
        let none = Holdout::new(TestSize::Fraction(0.0)).unwrap().split(&ds).unwrap();
        assert_eq!(none.test.n_rows(), 0);
        let all = Holdout::new(TestSize::Fraction(1.0)).unwrap().split(&ds).unwrap();
        assert_eq!(all.train.n_rows(), 0);
    }

    #[test]
    fn parse_test_size() {
        assert_eq!("0.3".parse::<TestSize>().unwrap(), TestSize::Fraction(0.3));
        assert_eq!("45".parse::<TestSize>().unwrap(), TestSize::Count(45));
        assert_eq!("3e-1".parse::<TestSize>().unwrap(), TestSize::Fraction(0.3));
        assert!(matches!(
            "a third".parse::<TestSize>(),
            Err(Id3Error::InvalidTestSize { .. })
        ));
        assert!("-3".parse::<TestSize>().is_err());
    }
}
