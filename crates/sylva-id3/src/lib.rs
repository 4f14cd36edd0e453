//! ID3 decision trees over categorical tables: train, predict, evaluate.
//!
//! Provides entropy and information-gain scoring, a recursive ID3 learner
//! storing its tree in an arena, parallel batch prediction via rayon, a
//! seeded train/test holdout, accuracy with a confusion matrix, and text,
//! Graphviz and serde renderings of the fitted tree.

mod confusion;
mod dataset;
mod entropy;
mod error;
mod eval;
mod holdout;
mod node;
mod predict;
mod render;
mod split;
mod tree;

pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use dataset::{Category, Dataset};
pub use entropy::{entropy, information_gain};
pub use error::Id3Error;
pub use eval::{HoldoutResult, accuracy};
pub use holdout::{Holdout, HoldoutSplit, TestSize};
pub use node::{Branch, FeatureIndex, LeafKind, Node, NodeIndex};
pub use render::TreeStats;
pub use split::{BestSplit, find_best_split};
pub use tree::{Id3Config, Id3Tree};
