use tracing::{debug, info, instrument, warn};

use crate::{
    Id3Error,
    dataset::{Category, Dataset},
    entropy::{class_counts, entropy_of_counts, partition},
    node::{Branch, FeatureIndex, LeafKind, Node, NodeIndex},
    split::best_split_over,
};

/// Configuration for ID3 tree induction.
///
/// Construct via [`Id3Config::new`] with the name of the class column. The
/// tree grows until every leaf is pure: there is no depth limit, no
/// minimum leaf size and no pruning.
#[derive(Debug, Clone)]
pub struct Id3Config {
    pub(crate) target: String,
}

impl Id3Config {
    /// Create a config that learns to predict `target`.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Set the class column.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Return the class column name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Grow an ID3 tree on `data`.
    ///
    /// Every column other than the target is a candidate feature, compared
    /// by exact value equality.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---------|------|
    /// | [`Id3Error::EmptyDataset`]  | `data` has no rows               |
    /// | [`Id3Error::UnknownColumn`] | the target is not a column of `data` |
    #[instrument(skip(self, data), fields(target = %self.target, n_rows = data.n_rows()))]
    pub fn fit(&self, data: &Dataset) -> Result<Id3Tree, Id3Error> {
        let target_col = data.require_column(&self.target)?;
        if data.is_empty() {
            return Err(Id3Error::EmptyDataset);
        }

        debug!(
            n_rows = data.n_rows(),
            n_features = data.n_columns() - 1,
            "fitting ID3 tree"
        );

        let rows: Vec<usize> = (0..data.n_rows()).collect();
        let mut arena: Vec<Node> = Vec::new();
        let root = build_tree(data, &rows, target_col, 0, &mut arena);

        let tree = Id3Tree {
            nodes: arena,
            columns: data.columns().to_vec(),
            target: self.target.clone(),
        };

        info!(
            root_index = root.index(),
            n_nodes = tree.n_nodes(),
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            "ID3 tree built"
        );

        Ok(tree)
    }
}

/// Recursively grow the subtree for `rows` (non-empty).
///
/// Returns the [`NodeIndex`] of the node just created in `arena`.
fn build_tree(
    data: &Dataset,
    rows: &[usize],
    target_col: usize,
    depth: usize,
    arena: &mut Vec<Node>,
) -> NodeIndex {
    let n_samples = rows.len();
    let counts = class_counts(data, rows, target_col);

    if let [(class, _)] = counts.as_slice() {
        return push(
            arena,
            Node::Leaf {
                class: (*class).clone(),
                leaf_kind: LeafKind::Pure,
                entropy: 0.0,
                n_samples,
            },
        );
    }

    let entropy = entropy_of_counts(&counts, n_samples);
    let majority_leaf = |arena: &mut Vec<Node>| {
        push(
            arena,
            Node::Leaf {
                class: majority(&counts).clone(),
                leaf_kind: LeafKind::Majority,
                entropy,
                n_samples,
            },
        )
    };

    let Some((feature_col, gain)) = best_split_over(data, rows, target_col) else {
        warn!(depth, n_samples, "no candidate features left, using majority class");
        return majority_leaf(arena);
    };

    let groups = partition(data, rows, feature_col);
    if groups.len() < 2 {
        // Only a zero-gain winner can be constant; one group would recurse on the same rows.
        warn!(
            depth,
            n_samples,
            feature = %data.columns()[feature_col],
            "no feature separates the remaining rows, using majority class"
        );
        return majority_leaf(arena);
    }

    // Reserve the slot so the split is stored before its children.
    let node_idx = arena.len();
    arena.push(Node::Leaf {
        class: majority(&counts).clone(),
        leaf_kind: LeafKind::Majority,
        entropy,
        n_samples,
    });

    let mut branches = Vec::with_capacity(groups.len());
    for (value, subset) in groups {
        if subset.is_empty() {
            warn!(
                feature = %data.columns()[feature_col],
                value = %value,
                "empty subset, skipping branch"
            );
            continue;
        }
        let child = build_tree(data, &subset, target_col, depth + 1, arena);
        branches.push(Branch {
            value: value.clone(),
            child,
        });
    }

    arena[node_idx] = Node::Split {
        feature: FeatureIndex::new(feature_col),
        branches,
        entropy,
        n_samples,
        gain,
    };

    NodeIndex::new(node_idx)
}

fn push(arena: &mut Vec<Node>, node: Node) -> NodeIndex {
    arena.push(node);
    NodeIndex::new(arena.len() - 1)
}

/// Most frequent class; the earliest-seen class wins ties.
fn majority<'a>(counts: &[(&'a Category, usize)]) -> &'a Category {
    let mut best = counts[0];
    for &(class, count) in &counts[1..] {
        if count > best.1 {
            best = (class, count);
        }
    }
    best.0
}

/// A fitted ID3 decision tree.
///
/// Nodes live in an arena (`Vec<Node>`) with the root at index 0. Split
/// features index into the training columns, so the tree can be applied to
/// any table holding those columns by name.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Id3Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) columns: Vec<String>,
    pub(crate) target: String,
}

impl Id3Tree {
    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Return the node stored at `index`.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Return all nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the name of the class column.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Return the columns of the training table.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Return the column name for a split feature.
    #[must_use]
    pub fn feature_name(&self, feature: FeatureIndex) -> &str {
        &self.columns[feature.index()]
    }

    /// Return the total number of nodes (splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-leaf tree has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { branches, .. } => {
                    for branch in branches {
                        queue.push_back((branch.child.index(), d + 1));
                    }
                }
            }
        }

        max_depth
    }
}
