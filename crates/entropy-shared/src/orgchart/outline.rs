use std::collections::HashSet;

use crate::models::Person;

use super::hierarchy::Adjacency;

/// Indented text outline of every root subtree, two spaces per level, with a
/// blank line between roots.
pub fn render_outline(people: &[Person]) -> String {
    let adjacency = Adjacency::new(people);
    let mut out = String::new();

    for &root in &adjacency.roots {
        write_subtree(&adjacency, root, 0, &mut HashSet::new(), &mut out);
        out.push('\n');
    }

    out
}

fn write_subtree(
    adjacency: &Adjacency<'_>,
    id: i64,
    depth: usize,
    branch: &mut HashSet<i64>,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    if branch.contains(&id) {
        out.push_str(&format!("{indent}[CIRCULAR REFERENCE: {id}]\n"));
        return;
    }
    let Some(person) = adjacency.by_id.get(&id) else {
        return;
    };

    out.push_str(&format!("{indent}{} ({})\n", person.name, person.position));

    branch.insert(id);
    for &child in adjacency.children_of(id) {
        write_subtree(adjacency, child, depth + 1, branch, out);
    }
    branch.remove(&id);
}
