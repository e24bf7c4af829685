use log::{debug, trace};

use super::code_table::{Code, CodeTable};
use crate::tools::freq_count::{freqs, FrequencyTable};
use std::cmp::Ordering;

/// Order id of the inert leaf that pads a single-symbol tree. Real leaves use their byte value.
const PLACEHOLDER_ID: u32 = 256;
/// Internal nodes are numbered from here in creation order.
const INTERNAL_BASE_ID: u32 = 257;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u8),
    /// Second leaf of a single-symbol tree. Carries no symbol and never gets a code.
    Placeholder,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub id: u32,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, id: u32, node_data: NodeData) -> Node {
        Node {
            weight,
            id,
            node_data,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.node_data, NodeData::Kids(..))
    }

    /// Number of edges on the longest path below this node.
    pub fn depth(&self) -> usize {
        match &self.node_data {
            NodeData::Kids(left, right) => 1 + left.depth().max(right.depth()),
            _ => 0,
        }
    }
}

impl Ord for Node {
    /// Sort Nodes by decreasing weight and decreasing id, so the two cheapest nodes end up
    /// at the back of a sorted vec. Ids are unique, so the order is total.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Huffman tree built from a frequency table. The root is absent for empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<Node>,
}

impl HuffmanTree {
    /// Greedy minimum-weight merging. The two lightest nodes (ties broken by lower id) are
    /// merged, the lighter becoming the left child, until one node is left.
    pub fn from_freqs(freqs: &FrequencyTable) -> Self {
        // Turn the table into leaves
        let mut tree: Vec<Node> = freqs
            .present()
            .map(|(sym, weight)| Node::new(weight, sym as u32, NodeData::Leaf(sym)))
            .collect();

        // One symbol still needs a one bit code, so give it a sibling.
        if tree.len() == 1 {
            let leaf = tree.remove(0);
            debug!("Single symbol input, padding the tree with a placeholder leaf.");
            let placeholder = Node::new(0, PLACEHOLDER_ID, NodeData::Placeholder);
            return Self {
                root: Some(Node::new(
                    leaf.weight,
                    INTERNAL_BASE_ID,
                    NodeData::Kids(Box::new(leaf), Box::new(placeholder)),
                )),
            };
        }

        // ...then pare it down to one single node with child nodes - keep it sorted.
        let mut seq = 0;
        let root = loop {
            tree.sort_unstable();
            match (tree.pop(), tree.pop()) {
                (Some(left), Some(right)) => {
                    tree.push(Node::new(
                        left.weight.saturating_add(right.weight),
                        INTERNAL_BASE_ID + seq,
                        NodeData::Kids(Box::new(left), Box::new(right)),
                    ));
                    seq += 1;
                }
                (root, _) => break root,
            }
        };

        if let Some(node) = &root {
            debug!(
                "Built huffman tree with {} symbols, depth {}.",
                freqs.distinct(),
                node.depth()
            );
        }
        Self { root }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Longest code length in the tree, 0 when empty.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Walk the tree depth first, left before right, and collect a code for every leaf.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        if let Some(root) = &self.root {
            return_codes(root, &mut Code::new(), &mut table);
        }
        for (sym, code) in table.sorted() {
            trace!("{:#04x}: {}", sym, code);
        }
        table
    }
}

/// Recursively walk the tree, appending 0 going left and 1 going right, and record the path
/// to each leaf.
fn return_codes(node: &Node, code: &mut Code, table: &mut CodeTable) {
    match &node.node_data {
        NodeData::Kids(left, right) => {
            code.push(false);
            return_codes(left, code, table);
            code.pop();
            code.push(true);
            return_codes(right, code, table);
            code.pop();
        }
        NodeData::Leaf(sym) => {
            // A lone root leaf would otherwise get an empty code.
            let leaf_code = if code.is_empty() {
                Code::from_bits(vec![false])
            } else {
                code.clone()
            };
            table.insert(*sym, leaf_code);
        }
        NodeData::Placeholder => {}
    }
}

/// Count the input and build its tree.
pub fn analyze_and_build_tree(data: &[u8]) -> HuffmanTree {
    HuffmanTree::from_freqs(&freqs(data))
}
