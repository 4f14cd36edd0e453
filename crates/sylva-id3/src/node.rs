use std::fmt;

use crate::dataset::Category;

/// Zero-based position of a feature among the training columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based column position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a `Vec<Node>` arena, identifying a specific node in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One outgoing edge of a split: rows whose feature equals `value` go to `child`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Branch {
    /// Feature value selecting this branch.
    pub value: Category,
    /// Subtree for rows holding `value`.
    pub child: NodeIndex,
}

/// How a leaf came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    /// Every training row reaching the leaf had the same class.
    Pure,
    /// No split could separate the rows; the leaf holds the majority class.
    Majority,
}

/// A node in an ID3 tree arena.
///
/// Children are referenced by [`NodeIndex`]; each child belongs to exactly
/// one branch of one parent. The root is always at index 0.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// An interior node splitting on one categorical feature.
    Split {
        /// Feature used for the split.
        feature: FeatureIndex,
        /// One branch per feature value seen in training, in first-appearance order.
        branches: Vec<Branch>,
        /// Target entropy at this node, in bits.
        entropy: f64,
        /// Number of training rows that reached this node.
        n_samples: usize,
        /// Information gain of the split.
        gain: f64,
    },
    /// A terminal node holding a class.
    Leaf {
        /// Predicted class.
        class: Category,
        /// Purity or majority vote.
        leaf_kind: LeafKind,
        /// Target entropy at this leaf, in bits.
        entropy: f64,
        /// Number of training rows in this leaf.
        n_samples: usize,
    },
}

impl Node {
    /// Return the target entropy at this node.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        match self {
            Node::Split { entropy, .. } | Node::Leaf { entropy, .. } => *entropy,
        }
    }

    /// Return the number of training rows that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the child reached by `value`, if any branch matches.
    #[must_use]
    pub fn child_for(&self, value: &Category) -> Option<NodeIndex> {
        match self {
            Node::Split { branches, .. } => branches
                .iter()
                .find(|b| &b.value == value)
                .map(|b| b.child),
            Node::Leaf { .. } => None,
        }
    }
}
