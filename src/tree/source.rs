//! TOML tree documents
//!
//! ```toml
//! [root]
//! id = "ceo"
//! name = "Ada King"
//! role = "CEO"
//!
//! [[root.children]]
//! id = "vp-eng"
//! name = "Bob Stone"
//! role = "VP"
//! expanded = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CardSize, NodeId, OrgTree, Person};
use crate::error::TreeError;

#[derive(Debug, Serialize, Deserialize)]
struct TreeDocument {
    root: NodeSpec,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeSpec {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    department: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default = "default_expanded")]
    expanded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeSpec>,
}

fn default_expanded() -> bool {
    true
}

impl NodeSpec {
    fn person(&self) -> Person {
        Person {
            name: self.name.clone(),
            role: self.role.clone(),
            department: self.department.clone(),
            email: self.email.clone(),
            color: self.color.clone(),
        }
    }

    fn size(&self, default_size: CardSize) -> CardSize {
        CardSize::new(
            self.width.unwrap_or(default_size.width),
            self.height.unwrap_or(default_size.height),
        )
    }
}

impl OrgTree {
    /// Load a tree document from a TOML file
    pub fn from_file(path: &Path, default_size: CardSize) -> Result<Self, TreeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, default_size)
    }

    /// Parse a tree document. Nodes without `width`/`height` get `default_size`.
    pub fn from_toml_str(content: &str, default_size: CardSize) -> Result<Self, TreeError> {
        let doc: TreeDocument = toml::from_str(content)?;
        let root = &doc.root;

        let mut tree = OrgTree::new(&root.id, root.person(), root.size(default_size))?;
        let root_id = tree.root();
        tree.nodes[root_id.0].expanded = root.expanded;

        let mut pending: Vec<(NodeId, &NodeSpec)> = root
            .children
            .iter()
            .rev()
            .map(|child| (root_id, child))
            .collect();
        while let Some((parent, spec)) = pending.pop() {
            let id = tree.add_child(parent, &spec.id, spec.person(), spec.size(default_size))?;
            tree.nodes[id.0].expanded = spec.expanded;
            pending.extend(spec.children.iter().rev().map(|child| (id, child)));
        }

        log::debug!(nodes = tree.len(); "Loaded tree document");
        Ok(tree)
    }

    /// Serialize the whole tree, collapsed subtrees included
    pub fn to_toml_string(&self) -> Result<String, TreeError> {
        let doc = TreeDocument {
            root: self.to_spec(self.root()),
        };
        Ok(toml::to_string(&doc)?)
    }

    fn to_spec(&self, id: NodeId) -> NodeSpec {
        let node = self.node(id);
        NodeSpec {
            id: node.key.0.clone(),
            name: node.person.name.clone(),
            role: node.person.role.clone(),
            department: node.person.department.clone(),
            email: node.person.email.clone(),
            color: node.person.color.clone(),
            width: Some(node.size.width),
            height: Some(node.size.height),
            expanded: node.expanded,
            children: node.children.iter().map(|&c| self.to_spec(c)).collect(),
        }
    }
}
