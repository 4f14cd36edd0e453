//! Text and Graphviz renderings of a fitted tree.

use std::fmt::{self, Write};

use crate::node::{Node, NodeIndex};
use crate::tree::Id3Tree;

/// Shape summary of a fitted tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub n_nodes: usize,
    /// Number of leaves.
    pub n_leaves: usize,
    /// Length of the longest root-to-leaf path, in edges.
    pub depth: usize,
}

impl Id3Tree {
    /// Return node count, leaf count and depth.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            n_nodes: self.n_nodes(),
            n_leaves: self.n_leaves(),
            depth: self.depth(),
        }
    }

    /// Render the tree as indented text, one line per node or branch.
    ///
    /// ```text
    /// Feature: outlook
    ///   Value outlook = sunny:
    ///     Class: no
    ///   Value outlook = rain:
    ///     Class: yes
    /// ```
    #[must_use]
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    /// Render the tree as a Graphviz `digraph`.
    ///
    /// Node `node_i` is arena slot `i`. Splits are ellipses labelled with the
    /// feature, leaves are boxes labelled with the class, and every edge is
    /// labelled with its branch value.
    #[must_use]
    pub fn render_dot(&self) -> String {
        let mut out = String::from("digraph id3 {\n\tnode [ fontname = \"Helvetica\" ];\n");
        for (i, node) in self.nodes.iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = match node {
                Node::Split {
                    feature, n_samples, ..
                } => writeln!(
                    out,
                    "\tnode_{i} [ label = \"{}\\nn = {n_samples}\" ];",
                    escape_dot(self.feature_name(*feature)),
                ),
                Node::Leaf {
                    class, n_samples, ..
                } => writeln!(
                    out,
                    "\tnode_{i} [ label = \"{}\\nn = {n_samples}\", shape = box ];",
                    escape_dot(class.as_str()),
                ),
            };
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split { branches, .. } = node {
                for branch in branches {
                    let _ = writeln!(
                        out,
                        "\tnode_{i} -> node_{} [ label = \"{}\" ];",
                        branch.child,
                        escape_dot(branch.value.as_str()),
                    );
                }
            }
        }
        out.push_str("}\n");
        out
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>, index: NodeIndex, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self.node(index) {
            Node::Leaf { class, .. } => writeln!(f, "{pad}Class: {class}"),
            Node::Split {
                feature, branches, ..
            } => {
                let name = self.feature_name(*feature);
                writeln!(f, "{pad}Feature: {name}")?;
                for branch in branches {
                    writeln!(f, "{pad}  Value {name} = {}:", branch.value)?;
                    self.write_text(f, branch.child, indent + 2)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Id3Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f, NodeIndex::new(0), 0)
    }
}

fn escape_dot(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
