use std::collections::{HashMap, HashSet};

use crate::models::{HierarchicalNode, Person};

/// Parent → children adjacency over a flat list, keyed by id.
pub(crate) struct Adjacency<'a> {
    pub by_id: HashMap<i64, &'a Person>,
    pub children: HashMap<i64, Vec<i64>>,
    pub roots: Vec<i64>,
}

impl<'a> Adjacency<'a> {
    /// Later entries win when an id is declared twice. Parent ids that do not
    /// resolve are skipped.
    pub fn new(people: &'a [Person]) -> Self {
        let by_id: HashMap<i64, &Person> = people.iter().map(|p| (p.id, p)).collect();
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut roots = Vec::new();

        for person in people {
            if person.is_root() {
                roots.push(person.id);
                continue;
            }
            for parent_id in &person.parent_ids {
                if by_id.contains_key(parent_id) {
                    children.entry(*parent_id).or_default().push(person.id);
                }
            }
        }

        Self {
            by_id,
            children,
            roots,
        }
    }

    pub fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Copies the subtree under `id`. A child already on the current branch is
    /// left out so no node ever becomes its own ancestor.
    fn materialize(&self, id: i64, branch: &mut HashSet<i64>) -> Option<HierarchicalNode> {
        let person = self.by_id.get(&id)?;
        let mut node = HierarchicalNode::from_person(person);

        branch.insert(id);
        for &child_id in self.children_of(id) {
            if branch.contains(&child_id) {
                tracing::debug!(parent = id, child = child_id, "cutting cycle in org chart");
                continue;
            }
            if let Some(child) = self.materialize(child_id, branch) {
                node.children.push(child);
            }
        }
        branch.remove(&id);

        Some(node)
    }
}

/// Turns the flat org chart into a single renderable tree.
///
/// A person with several parents appears under each of them. More than one
/// root yields a virtual root; no root at all (empty input, or every entry
/// citing a parent) yields the placeholder node.
pub fn build_hierarchy(people: &[Person]) -> HierarchicalNode {
    let adjacency = Adjacency::new(people);

    let mut roots: Vec<HierarchicalNode> = adjacency
        .roots
        .iter()
        .filter_map(|&id| adjacency.materialize(id, &mut HashSet::new()))
        .collect();

    match roots.len() {
        0 => HierarchicalNode::placeholder(),
        1 => roots.remove(0),
        _ => HierarchicalNode::virtual_root(roots),
    }
}

/// Flat `(id, name, position)` view of a tree in pre-order, without synthetic
/// nodes. Parent links are not reconstructed.
pub fn flatten(node: &HierarchicalNode) -> Vec<Person> {
    let mut out = Vec::new();
    flatten_into(node, &mut out);
    out
}

fn flatten_into(node: &HierarchicalNode, out: &mut Vec<Person>) {
    if !node.is_virtual && !node.is_placeholder {
        out.push(Person::new(node.id, node.name.clone(), node.position.clone(), Vec::new()));
    }
    for child in &node.children {
        flatten_into(child, out);
    }
}
