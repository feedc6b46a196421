//! Org tree model
//!
//! Nodes live in a flat arena indexed by [`NodeId`]; children are referenced
//! by id. The tree is mutated only through expansion state changes, and the
//! layout engine reads it without writing back.

pub mod source;

use std::collections::HashMap;
use std::fmt;

use crate::error::TreeError;

/// Index of a node inside an [`OrgTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Stable, caller-supplied node key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey(pub String);

impl NodeKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display payload of a node. The layout engine never looks at it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub role: String,
    pub department: String,
    pub email: String,
    /// Avatar color; the stylesheet's depth color is used when absent
    pub color: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Self::default()
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Two-letter initials: first letters of the first two words, or the
    /// first two characters of a single-word name.
    pub fn initials(&self) -> String {
        let mut words = self.name.split_whitespace();
        match (words.next(), words.next()) {
            (Some(first), Some(second)) => first
                .chars()
                .take(1)
                .chain(second.chars().take(1))
                .collect::<String>()
                .to_uppercase(),
            (Some(only), None) => only.chars().take(2).collect::<String>().to_uppercase(),
            _ => String::new(),
        }
    }
}

/// Card footprint of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSize {
    pub width: f64,
    pub height: f64,
}

impl CardSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for CardSize {
    fn default() -> Self {
        Self::new(220.0, 100.0)
    }
}

/// A single entry of the org tree
#[derive(Debug, Clone)]
pub struct Node {
    pub key: NodeKey,
    pub person: Person,
    pub size: CardSize,
    pub expanded: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True when none of this node's children would be laid out
    pub fn is_leaf(&self) -> bool {
        !self.expanded || self.children.is_empty()
    }
}

/// Rooted org tree stored as an arena
#[derive(Debug, Clone)]
pub struct OrgTree {
    nodes: Vec<Node>,
    index: HashMap<NodeKey, NodeId>,
}

impl OrgTree {
    /// Create a tree holding only its root. The root starts expanded.
    pub fn new(key: impl Into<String>, person: Person, size: CardSize) -> Result<Self, TreeError> {
        let key = NodeKey::new(key);
        check_size(&key, size)?;

        let mut index = HashMap::new();
        index.insert(key.clone(), NodeId(0));
        Ok(Self {
            nodes: vec![Node {
                key,
                person,
                size,
                expanded: true,
                children: vec![],
                parent: None,
            }],
            index,
        })
    }

    /// Append a new child at the end of `parent`'s child list. New nodes
    /// start expanded.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        person: Person,
        size: CardSize,
    ) -> Result<NodeId, TreeError> {
        let key = NodeKey::new(key);
        if parent.0 >= self.nodes.len() {
            return Err(TreeError::malformed(format!(
                "parent index {} out of range",
                parent.0
            )));
        }
        if self.index.contains_key(&key) {
            return Err(TreeError::DuplicateKey { key: key.0 });
        }
        check_size(&key, size)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key: key.clone(),
            person,
            size,
            expanded: true,
            children: vec![],
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        self.index.insert(key, id);
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics on an id that did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.index.get(&NodeKey::new(key)).copied()
    }

    /// All node ids in insertion order, visible or not
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// A node is visible when every ancestor is expanded
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            if !self.nodes[parent.0].expanded {
                return false;
            }
            current = self.nodes[parent.0].parent;
        }
        true
    }

    /// Pre-order walk over visible nodes, children left to right
    pub fn visible(&self) -> Visible<'_> {
        Visible {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Flip the expansion state of `key` and return the new state.
    ///
    /// Collapsing forces every descendant to collapsed as well; expanding
    /// again leaves them collapsed.
    pub fn toggle(&mut self, key: &str) -> Result<bool, TreeError> {
        let id = self.require(key)?;
        let expanded = !self.nodes[id.0].expanded;
        self.apply_expanded(id, expanded);
        Ok(expanded)
    }

    /// Set the expansion state of `key`, with the same cascade as [`toggle`](Self::toggle)
    pub fn set_expanded(&mut self, key: &str, expanded: bool) -> Result<(), TreeError> {
        let id = self.require(key)?;
        self.apply_expanded(id, expanded);
        Ok(())
    }

    /// Same as [`set_expanded`](Self::set_expanded), addressed by id
    pub fn set_expanded_at(&mut self, id: NodeId, expanded: bool) {
        self.apply_expanded(id, expanded);
    }

    /// Collapse every node, root included
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
    }

    /// Expand nodes shallower than `depth` and collapse everything else
    pub fn expand_to_depth(&mut self, depth: usize) {
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, level)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.expanded = level < depth;
            stack.extend(node.children.iter().map(|&child| (child, level + 1)));
        }
    }

    fn apply_expanded(&mut self, id: NodeId, expanded: bool) {
        self.nodes[id.0].expanded = expanded;
        if expanded {
            return;
        }
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.clone();
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            node.expanded = false;
            stack.extend_from_slice(&node.children);
        }
    }

    fn require(&self, key: &str) -> Result<NodeId, TreeError> {
        self.find(key).ok_or_else(|| TreeError::UnknownNode {
            key: key.to_string(),
        })
    }

    /// Re-check every structural invariant.
    ///
    /// Trees built through [`OrgTree::new`] and [`OrgTree::add_child`] always
    /// pass; this guards trees that were assembled some other way.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self
            .nodes
            .first()
            .ok_or_else(|| TreeError::malformed("tree has no root"))?;
        if root.parent.is_some() {
            return Err(TreeError::malformed("root has a parent"));
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                return Err(TreeError::malformed(format!(
                    "node '{}' is reachable twice",
                    self.nodes[id.0].key
                )));
            }
            let node = &self.nodes[id.0];
            check_size(&node.key, node.size)?;
            for &child in &node.children {
                let child_node = self.nodes.get(child.0).ok_or_else(|| {
                    TreeError::malformed(format!("child index {} out of range", child.0))
                })?;
                if child_node.parent != Some(id) {
                    return Err(TreeError::malformed(format!(
                        "node '{}' does not point back to parent '{}'",
                        child_node.key, node.key
                    )));
                }
                stack.push(child);
            }
        }

        if let Some(pos) = seen.iter().position(|reached| !reached) {
            return Err(TreeError::malformed(format!(
                "node '{}' is detached from the root",
                self.nodes[pos].key
            )));
        }
        if self.index.len() != self.nodes.len() {
            return Err(TreeError::malformed("node keys are not unique"));
        }
        Ok(())
    }
}

fn check_size(key: &NodeKey, size: CardSize) -> Result<(), TreeError> {
    if size.is_valid() {
        Ok(())
    } else {
        Err(TreeError::InvalidSize {
            key: key.0.clone(),
            width: size.width,
            height: size.height,
        })
    }
}

/// Iterator returned by [`OrgTree::visible`]
pub struct Visible<'a> {
    tree: &'a OrgTree,
    stack: Vec<NodeId>,
}

impl Iterator for Visible<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        if node.expanded {
            self.stack.extend(node.children.iter().rev());
        }
        Some(id)
    }
}
