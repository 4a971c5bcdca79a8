use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, info, instrument};

use crate::domain::entities::{Answer, Item, Seed, SeedTree};
use crate::domain::error::{DomainError, DomainResult};

/// Handle to a node in a [`QuestionTree`].
///
/// Handles are invalidated by [`QuestionTree::reset`]; using one afterwards
/// yields [`DomainError::StaleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}g{}", slot, generation)
    }
}

/// Payload of a tree node: a yes/no question with two children, or a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Question { text: String, yes: NodeId, no: NodeId },
    Leaf(Item),
}

/// Tree node in the arena-based question tree.
#[derive(Debug)]
pub struct TreeNode {
    /// Question or item carried by this node
    pub kind: NodeKind,
    /// Parent node, None for the root
    pub parent: Option<NodeId>,
}

impl TreeNode {
    fn leaf(item: Item, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Leaf(item),
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn item(&self) -> Option<&Item> {
        match &self.kind {
            NodeKind::Leaf(item) => Some(item),
            NodeKind::Question { .. } => None,
        }
    }

    pub fn question(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Question { text, .. } => Some(text),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Children as `(yes, no)`, None for leaves.
    pub fn branches(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Question { yes, no, .. } => Some((yes, no)),
            NodeKind::Leaf(_) => None,
        }
    }
}

/// Arena-backed binary decision tree.
///
/// Question nodes always own exactly two children and leaves always carry
/// exactly one item; [`NodeKind`] makes any other shape unrepresentable.
/// The only mutations are [`learn`](Self::learn), which splits one leaf, and
/// [`reset`](Self::reset), which replaces the whole tree with the seed.
#[derive(Debug)]
pub struct QuestionTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node
    root: NodeId,
    /// Shape restored by reset
    seed: Seed,
}

impl Default for QuestionTree {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

impl QuestionTree {
    pub fn new(seed: Seed) -> Self {
        let mut arena = Arena::new();
        let root = Self::plant(&mut arena, &seed);
        Self { arena, root, seed }
    }

    /// Build a tree from an unvalidated seed description.
    pub fn from_seed_tree(seed: &SeedTree) -> DomainResult<Self> {
        Ok(Self::new(Seed::try_from(seed)?))
    }

    fn plant(arena: &mut Arena<TreeNode>, seed: &Seed) -> NodeId {
        let root = NodeId(arena.insert_with(|idx| TreeNode {
            kind: NodeKind::Question {
                text: seed.question.clone(),
                yes: NodeId(idx),
                no: NodeId(idx),
            },
            parent: None,
        }));
        let yes = NodeId(arena.insert(TreeNode::leaf(seed.yes.clone(), Some(root))));
        let no = NodeId(arena.insert(TreeNode::leaf(seed.no.clone(), Some(root))));
        if let Some(node) = arena.get_mut(root.0) {
            Self::set_branches(node, yes, no);
        }
        root
    }

    fn set_branches(node: &mut TreeNode, yes_id: NodeId, no_id: NodeId) {
        if let NodeKind::Question { yes, no, .. } = &mut node.kind {
            *yes = yes_id;
            *no = no_id;
        }
    }

    /// Discard every node and rebuild the seed tree.
    ///
    /// Removal bumps the arena generation, so handles taken before the reset
    /// no longer resolve.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        let stale: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in stale {
            self.arena.remove(idx);
        }
        self.root = Self::plant(&mut self.arena, &self.seed);
        info!(nodes = self.arena.len(), "question tree reset to seed");
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, id: NodeId) -> DomainResult<&TreeNode> {
        self.arena.get(id.0).ok_or(DomainError::StaleNode(id))
    }

    pub fn is_leaf(&self, id: NodeId) -> DomainResult<bool> {
        Ok(self.node(id)?.is_leaf())
    }

    pub fn question(&self, id: NodeId) -> DomainResult<&str> {
        self.node(id)?
            .question()
            .ok_or(DomainError::NotAQuestion(id))
    }

    pub fn item(&self, id: NodeId) -> DomainResult<&Item> {
        self.node(id)?.item().ok_or(DomainError::NotALeaf(id))
    }

    /// Follow the branch selected by `answer` from a question node.
    #[instrument(level = "trace", skip(self))]
    pub fn traverse(&self, from: NodeId, answer: Answer) -> DomainResult<NodeId> {
        let (yes, no) = self
            .node(from)?
            .branches()
            .ok_or(DomainError::NotAQuestion(from))?;
        Ok(if answer.is_yes() { yes } else { no })
    }

    /// Split a leaf into a question with two fresh leaves.
    ///
    /// The leaf's current item moves into the branch opposite
    /// `new_item_answer`; `new_item` lands on the `new_item_answer` branch.
    #[instrument(level = "debug", skip(self))]
    pub fn learn(
        &mut self,
        leaf: NodeId,
        new_item: Item,
        question: &str,
        new_item_answer: Answer,
    ) -> DomainResult<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        if !self.node(leaf)?.is_leaf() {
            return Err(DomainError::NotALeaf(leaf));
        }

        let new_id = NodeId(self.arena.insert(TreeNode::leaf(new_item, Some(leaf))));
        let node = self
            .arena
            .get_mut(leaf.0)
            .ok_or(DomainError::StaleNode(leaf))?;
        let previous = std::mem::replace(
            &mut node.kind,
            NodeKind::Question {
                text: question.to_string(),
                yes: new_id,
                no: new_id,
            },
        );
        let old_item = match previous {
            NodeKind::Leaf(item) => item,
            NodeKind::Question { .. } => {
                node.kind = previous;
                self.arena.remove(new_id.0);
                return Err(DomainError::NotALeaf(leaf));
            }
        };

        debug!(old = %old_item, question, "splitting leaf");
        let old_id = NodeId(self.arena.insert(TreeNode::leaf(old_item, Some(leaf))));
        let (yes, no) = if new_item_answer.is_yes() {
            (new_id, old_id)
        } else {
            (old_id, new_id)
        };
        if let Some(node) = self.arena.get_mut(leaf.0) {
            Self::set_branches(node, yes, no);
        }
        Ok(())
    }

    /// Pre-order traversal from the root, yes branch before no branch.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Names of all items, in pre-order with yes before no.
    #[instrument(level = "debug", skip(self))]
    pub fn items(&self) -> Vec<String> {
        self.iter()
            .filter_map(|(_, node)| node.item())
            .map(|item| item.name().to_string())
            .collect()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|(_, node)| node.is_leaf()).count()
    }

    pub fn question_count(&self) -> usize {
        self.iter().filter(|(_, node)| !node.is_leaf()).count()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        match self.node(id).ok().and_then(TreeNode::branches) {
            Some((yes, no)) => 1 + self.calculate_depth(yes).max(self.calculate_depth(no)),
            None => 1,
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a QuestionTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a QuestionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Ok(node) = self.tree.node(current) {
                // no first so that yes is popped first
                if let Some((yes, no)) = node.branches() {
                    self.stack.push(no);
                    self.stack.push(yes);
                }
                return Some((current, node));
            }
        }
        None
    }
}
