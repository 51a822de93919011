//! Phrase-structure trees as produced by the external parser
//!
//! A `PhraseTree` is an arena of labelled nodes. Leaves carry surface words;
//! every internal node is a constituent or part-of-speech label. The builder
//! consumes the tree through [`PhraseTree::nodes`], a pre-order walk that
//! numbers leaves from 1 in yield order.

use crate::key::TokenId;

/// Arena index of a node inside one `PhraseTree`
pub type NodeId = usize;

/// A node in a phrase-structure tree
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseNode {
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl PhraseNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One entry of the parse node walk
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    /// Token position for leaves (1-based); 0 for wrappers
    pub position: TokenId,
    /// Surface value: the word for leaves, the label for wrappers
    pub value: String,
    /// Label of the immediate syntactic parent, if any
    pub parent_label: Option<String>,
    /// Internal tag-bearing node rather than a terminal token
    pub wrapper: bool,
}

/// A phrase-structure tree (root is node 0)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhraseTree {
    nodes: Vec<PhraseNode>,
}

impl PhraseTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a node under `parent` (or as the root) and return its id
    pub fn add_node(&mut self, label: &str, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(PhraseNode {
            label: label.to_string(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id].children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&PhraseNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&PhraseNode> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal of node ids
    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Leaf words in sentence order
    pub fn words(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .map(|id| &self.nodes[id])
            .filter(|node| node.is_leaf())
            .map(|node| node.label.as_str())
            .collect()
    }

    /// The node walk consumed by the index builder
    ///
    /// Nodes come in pre-order. Leaves are numbered 1.. in yield order;
    /// internal nodes are flagged as wrappers. A lone root with no children
    /// counts as a leaf with no parent.
    pub fn nodes(&self) -> Vec<ParseNode> {
        let mut position = 0;
        self.preorder()
            .into_iter()
            .map(|id| {
                let node = &self.nodes[id];
                let parent_label = node.parent.map(|p| self.nodes[p].label.clone());
                if node.is_leaf() {
                    position += 1;
                    ParseNode {
                        position,
                        value: node.label.clone(),
                        parent_label,
                        wrapper: false,
                    }
                } else {
                    ParseNode {
                        position: 0,
                        value: node.label.clone(),
                        parent_label,
                        wrapper: true,
                    }
                }
            })
            .collect()
    }

    /// Bracketed rendering on a single line
    pub fn to_oneline(&self) -> String {
        let mut out = String::new();
        if !self.nodes.is_empty() {
            self.write_oneline(0, &mut out);
        }
        out
    }

    fn write_oneline(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        if node.is_leaf() {
            out.push_str(&node.label);
            return;
        }
        out.push('(');
        out.push_str(&node.label);
        for &child in &node.children {
            out.push(' ');
            self.write_oneline(child, out);
        }
        out.push(')');
    }

    /// Indented Penn Treebank rendering
    ///
    /// A run of preterminals (a label over a single leaf) at the start of a
    /// constituent, or following another preterminal, stays on the current
    /// line; every other child opens a new line indented two spaces per level.
    pub fn to_penn(&self) -> String {
        let mut out = String::new();
        if !self.nodes.is_empty() {
            self.write_penn(0, 0, &mut out);
        }
        out
    }

    fn write_penn(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        if node.is_leaf() || self.is_preterminal(id) {
            self.write_oneline(id, out);
            return;
        }
        out.push('(');
        out.push_str(&node.label);
        for (i, &child) in node.children.iter().enumerate() {
            if self.is_preterminal(child) && (i == 0 || self.is_preterminal(node.children[i - 1]))
            {
                out.push(' ');
            } else {
                out.push('\n');
                out.push_str(&"  ".repeat(depth + 1));
            }
            self.write_penn(child, depth + 1, out);
        }
        out.push(')');
    }

    fn is_preterminal(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.children.len() == 1 && self.nodes[node.children[0]].is_leaf()
    }
}

/// A typed dependency between two token positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Governor position, 0 for the virtual root
    pub governor: TokenId,
    pub dependent: TokenId,
    /// Short relation name, e.g. `nsubj`
    pub label: String,
}

impl Relation {
    pub fn new(governor: TokenId, dependent: TokenId, label: &str) -> Self {
        Self {
            governor,
            dependent,
            label: label.to_string(),
        }
    }
}

/// Everything the external parser hands over for one sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parse {
    pub tree: PhraseTree,
    pub relations: Vec<Relation>,
}

impl Parse {
    pub fn new(tree: PhraseTree, relations: Vec<Relation>) -> Self {
        Self { tree, relations }
    }
}
