use serde::{Deserialize, Serialize};

/// Id shared by the synthetic nodes that never come from the data file.
pub const SYNTHETIC_NODE_ID: i64 = 0;

pub const VIRTUAL_ROOT_NAME: &str = "Entropy Gaming";
pub const VIRTUAL_ROOT_POSITION: &str = "Organisation";

/// One entry of the flat org chart file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub parent_ids: Vec<i64>,
}

impl Person {
    pub fn new(id: i64, name: impl Into<String>, position: impl Into<String>, parent_ids: Vec<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            position: position.into(),
            parent_ids,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }
}

/// A person with their reports attached, as rendered by the org chart view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalNode {
    pub id: i64,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub parent_ids: Vec<i64>,
    #[serde(default)]
    pub children: Vec<HierarchicalNode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_virtual: bool,
    /// Set on the node returned when there is nothing to draw.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_placeholder: bool,
}

impl HierarchicalNode {
    pub fn from_person(person: &Person) -> Self {
        Self {
            id: person.id,
            name: person.name.clone(),
            position: person.position.clone(),
            parent_ids: person.parent_ids.clone(),
            children: Vec::new(),
            is_virtual: false,
            is_placeholder: false,
        }
    }

    pub fn virtual_root(children: Vec<HierarchicalNode>) -> Self {
        Self {
            id: SYNTHETIC_NODE_ID,
            name: VIRTUAL_ROOT_NAME.to_string(),
            position: VIRTUAL_ROOT_POSITION.to_string(),
            parent_ids: Vec::new(),
            children,
            is_virtual: true,
            is_placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            id: SYNTHETIC_NODE_ID,
            name: "No data".to_string(),
            position: String::new(),
            parent_ids: Vec::new(),
            children: Vec::new(),
            is_virtual: false,
            is_placeholder: true,
        }
    }

    /// Number of nodes in this subtree, counting repeated appearances.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(HierarchicalNode::node_count).sum::<usize>()
    }
}
