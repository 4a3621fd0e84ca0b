//! Arena-backed code tree for adaptive Huffman coding.
//!
//! Nodes live in a single `Vec` and refer to each other by id. The root has
//! id `2 * alphabet_size`; every split of the NYT ("not yet transmitted") leaf
//! creates a symbol leaf with id `nyt - 1` and a new NYT with id `nyt - 2`.
//! Because ids are handed out strictly downward, a node's slot in the arena
//! is `root_id - id`, which keeps lookups O(1) without reserving the whole id
//! range up front.
//!
//! Ids belong to positions, not to contents: a swap exchanges the
//! weight, symbol and subtree of two slots while each slot keeps its id and
//! its place under its parent.

use crate::code::Code;
use std::collections::HashMap;

/// Label a renderer shows for the NYT leaf.
pub const NYT_LABEL: &str = "NYT";

#[derive(Debug, Clone)]
struct Node {
    id: usize,
    weight: u64,
    symbol: Option<char>,
    parent: Option<usize>,
    /// `(left, right)`; a node has both children or none.
    children: Option<(usize, usize)>,
}

impl Node {
    fn new(id: usize, parent: Option<usize>, symbol: Option<char>) -> Self {
        Node {
            id,
            weight: 0,
            symbol,
            parent,
            children: None,
        }
    }
}

/// The adaptive Huffman tree.
///
/// Only the encoder grows or rebalances a tree; everyone else reads it.
///
/// ```compile_fail
/// use adaptive_huffman::Tree;
///
/// let mut tree = Tree::new(8);
/// tree.split_nyt('a');
/// ```
///
/// ```compile_fail
/// use adaptive_huffman::AdaptiveHuffman;
///
/// let mut encoder = AdaptiveHuffman::new(4).unwrap();
/// encoder.encode('a');
/// let mut tree = encoder.tree().clone();
/// tree.swap(4, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: usize,
    nyt: usize,
    /// Symbol -> id of the leaf currently holding it.
    leaves: HashMap<char, usize>,
}

impl Tree {
    /// Creates a tree whose root (which is also the NYT leaf) has id `root_id`.
    pub(crate) fn new(root_id: usize) -> Self {
        Tree {
            nodes: vec![Node::new(root_id, None, None)],
            root: root_id,
            nyt: root_id,
            leaves: HashMap::new(),
        }
    }

    fn index(&self, id: usize) -> Option<usize> {
        let index = self.root.checked_sub(id)?;
        (index < self.nodes.len()).then_some(index)
    }

    fn slot(&self, id: usize) -> &Node {
        match self.index(id) {
            Some(index) => &self.nodes[index],
            None => unreachable!("node {id} is not in the tree"),
        }
    }

    fn slot_mut(&mut self, id: usize) -> &mut Node {
        match self.index(id) {
            Some(index) => &mut self.nodes[index],
            None => unreachable!("node {id} is not in the tree"),
        }
    }

    pub fn root_id(&self) -> usize {
        self.root
    }

    pub fn nyt_id(&self) -> usize {
        self.nyt
    }

    /// Number of nodes, the NYT leaf included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.index(id).is_some()
    }

    /// Id of the leaf holding `symbol`, if the symbol has been inserted.
    pub fn leaf_of(&self, symbol: char) -> Option<usize> {
        self.leaves.get(&symbol).copied()
    }

    pub(crate) fn weight(&self, id: usize) -> u64 {
        self.slot(id).weight
    }

    pub(crate) fn parent(&self, id: usize) -> Option<usize> {
        self.slot(id).parent
    }

    /// Turns the NYT leaf into an internal node with a new NYT on the left and
    /// a leaf for `symbol` on the right. Returns `(new_nyt, symbol_leaf)`.
    pub(crate) fn split_nyt(&mut self, symbol: char) -> (usize, usize) {
        let old = self.nyt;
        debug_assert!(old >= 2, "node id range exhausted");
        debug_assert!(!self.leaves.contains_key(&symbol));

        let leaf = old - 1;
        let nyt = old - 2;
        // Slots follow creation order, so the leaf has to go in first.
        debug_assert_eq!(self.nodes.len(), self.root - old + 1);
        self.nodes.push(Node::new(leaf, Some(old), Some(symbol)));
        self.nodes.push(Node::new(nyt, Some(old), None));

        self.slot_mut(old).children = Some((nyt, leaf));
        self.leaves.insert(symbol, leaf);
        self.nyt = nyt;
        (nyt, leaf)
    }

    /// Id of the highest-id node whose weight is `weight`.
    pub(crate) fn highest_in_block(&self, weight: u64) -> Option<usize> {
        // Slots are ordered by descending id.
        self.nodes
            .iter()
            .find(|node| node.weight == weight)
            .map(|node| node.id)
    }

    /// True when `ancestor` lies on the path from `node` up to the root.
    /// A node is not its own ancestor.
    pub(crate) fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = self.slot(node).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.slot(id).parent;
        }
        false
    }

    /// Exchanges the contents of two slots: weight, symbol and subtree.
    ///
    /// Both slots keep their id and parent. Swapping a node with one of its
    /// own ancestors would detach the subtree, so callers must rule that out.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        debug_assert!(!self.is_ancestor(a, b) && !self.is_ancestor(b, a));

        let (weight_a, symbol_a, children_a) = {
            let node = self.slot(a);
            (node.weight, node.symbol, node.children)
        };
        let (weight_b, symbol_b, children_b) = {
            let node = self.slot(b);
            (node.weight, node.symbol, node.children)
        };

        {
            let node = self.slot_mut(a);
            node.weight = weight_b;
            node.symbol = symbol_b;
            node.children = children_b;
        }
        {
            let node = self.slot_mut(b);
            node.weight = weight_a;
            node.symbol = symbol_a;
            node.children = children_a;
        }

        self.adopt(a);
        self.adopt(b);
        if let Some(symbol) = symbol_a {
            self.leaves.insert(symbol, b);
        }
        if let Some(symbol) = symbol_b {
            self.leaves.insert(symbol, a);
        }
        if self.nyt == a {
            self.nyt = b;
        } else if self.nyt == b {
            self.nyt = a;
        }
    }

    /// Points the children of `id` back at it.
    fn adopt(&mut self, id: usize) {
        if let Some((left, right)) = self.slot(id).children {
            self.slot_mut(left).parent = Some(id);
            self.slot_mut(right).parent = Some(id);
        }
    }

    pub(crate) fn increment(&mut self, id: usize) {
        self.slot_mut(id).weight += 1;
    }

    /// Path code from the root to `id`, or `None` if `id` is not in the tree.
    pub fn code_of(&self, id: usize) -> Option<Code> {
        if !self.contains(id) {
            return None;
        }
        let mut code = Code::new();
        let mut child = id;
        while let Some(parent) = self.slot(child).parent {
            match self.slot(parent).children {
                Some((left, _)) => code.push(left != child),
                None => unreachable!("parent {parent} of node {child} has no children"),
            }
            child = parent;
        }
        code.reverse();
        Some(code)
    }

    /// Recomputes every internal weight from its children, bottom-up.
    pub(crate) fn refresh_weights(&mut self) {
        // Post-order over an explicit stack; `true` marks children as visited.
        let mut stack = vec![(self.root, false)];
        while let Some((id, visited)) = stack.pop() {
            let Some((left, right)) = self.slot(id).children else {
                continue;
            };
            if visited {
                let weight = self.slot(left).weight + self.slot(right).weight;
                self.slot_mut(id).weight = weight;
            } else {
                stack.push((id, true));
                stack.push((right, false));
                stack.push((left, false));
            }
        }
    }

    /// Read-only view of the root.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Read-only view of the NYT leaf.
    pub fn nyt(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.nyt,
        }
    }

    pub fn node(&self, id: usize) -> Option<NodeRef<'_>> {
        self.contains(id).then_some(NodeRef { tree: self, id })
    }

    /// All nodes in pre-order: a node, then its left subtree, then its right.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            tree: self,
            stack: vec![self.root],
        }
    }
}

/// A borrowed, read-only view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: usize,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        self.tree.slot(self.id)
    }

    fn view(&self, id: usize) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn weight(&self) -> u64 {
        self.node().weight
    }

    pub fn symbol(&self) -> Option<char> {
        self.node().symbol
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.view(id))
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.node().children.map(|(left, _)| self.view(left))
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.node().children.map(|(_, right)| self.view(right))
    }

    pub fn is_leaf(&self) -> bool {
        self.node().children.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// A leaf without a symbol is the NYT marker.
    pub fn is_nyt(&self) -> bool {
        self.is_leaf() && self.symbol().is_none()
    }

    /// What a renderer prints inside the node: the symbol, `"NYT"` for the
    /// NYT leaf, nothing for internal nodes.
    pub fn label(&self) -> String {
        match self.symbol() {
            Some(symbol) => symbol.to_string(),
            None if self.is_leaf() => NYT_LABEL.to_string(),
            None => String::new(),
        }
    }

    pub fn code(&self) -> Code {
        self.tree.code_of(self.id).unwrap_or_default()
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("weight", &self.weight())
            .field("label", &self.label())
            .finish()
    }
}

/// Pre-order iterator returned by [`Tree::nodes`].
pub struct Nodes<'a> {
    tree: &'a Tree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some((left, right)) = self.tree.slot(id).children {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}
