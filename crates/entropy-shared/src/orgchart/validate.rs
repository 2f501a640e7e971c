use std::collections::{HashMap, HashSet};

use crate::models::Person;

use super::hierarchy::Adjacency;

/// Collects every problem found in the flat org chart. An empty result means
/// the data forms a well-formed forest.
pub fn validate(people: &[Person]) -> Vec<String> {
    let mut errors = Vec::new();

    if people.is_empty() {
        errors.push("No people data loaded".to_string());
        return errors;
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for person in people {
        if !seen.insert(person.id) && reported.insert(person.id) {
            errors.push(format!("Duplicate ID found: {}", person.id));
        }
    }

    for person in people {
        for parent_id in &person.parent_ids {
            if !seen.contains(parent_id) {
                errors.push(format!(
                    "Person {} (ID: {}) references invalid parent ID: {}",
                    person.name, person.id, parent_id
                ));
            }
        }
    }

    if has_cycle(people) {
        errors.push("Circular references detected in hierarchy".to_string());
    }

    let adjacency = Adjacency::new(people);
    if adjacency.roots.is_empty() {
        errors.push("No root nodes found (people with no parents)".to_string());
    }

    let reachable = reachable_from_roots(&adjacency);
    for person in people {
        if !reachable.contains(&person.id) {
            errors.push(format!(
                "Person {} (ID: {}) is not reachable from any root",
                person.name, person.id
            ));
        }
    }

    errors
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnStack,
    Done,
}

/// Depth-first walk along parent links; reaching a node that is still on the
/// stack means it is its own ancestor.
fn has_cycle(people: &[Person]) -> bool {
    let parents: HashMap<i64, &[i64]> = people
        .iter()
        .map(|p| (p.id, p.parent_ids.as_slice()))
        .collect();
    let mut state: HashMap<i64, Visit> = HashMap::new();

    fn visit(id: i64, parents: &HashMap<i64, &[i64]>, state: &mut HashMap<i64, Visit>) -> bool {
        match state.get(&id) {
            Some(Visit::OnStack) => return true,
            Some(Visit::Done) => return false,
            None => {}
        }

        state.insert(id, Visit::OnStack);
        let parent_ids = parents.get(&id).copied().unwrap_or(&[]);
        for &parent_id in parent_ids {
            if visit(parent_id, parents, state) {
                return true;
            }
        }
        state.insert(id, Visit::Done);
        false
    }

    people.iter().any(|p| visit(p.id, &parents, &mut state))
}

fn reachable_from_roots(adjacency: &Adjacency<'_>) -> HashSet<i64> {
    let mut reachable = HashSet::new();
    let mut worklist: Vec<i64> = adjacency.roots.clone();

    while let Some(id) = worklist.pop() {
        if reachable.insert(id) {
            worklist.extend_from_slice(adjacency.children_of(id));
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_chain_is_valid() {
        let people = vec![
            Person::new(1, "CEO", "", vec![]),
            Person::new(2, "CTO", "", vec![1]),
            Person::new(3, "Lead", "", vec![2]),
        ];
        assert!(validate(&people).is_empty());
    }

    #[test]
    fn test_forest_with_shared_report_is_valid() {
        let people = vec![
            Person::new(1, "A", "", vec![]),
            Person::new(2, "B", "", vec![]),
            Person::new(3, "C", "", vec![1, 2]),
        ];
        assert!(validate(&people).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate(&[]), vec!["No people data loaded".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_reported_once() {
        let people = vec![
            Person::new(1, "A", "", vec![]),
            Person::new(1, "B", "", vec![]),
            Person::new(1, "C", "", vec![]),
        ];
        let errors = validate(&people);
        assert_eq!(errors, vec!["Duplicate ID found: 1".to_string()]);
    }

    #[test]
    fn test_dangling_parent() {
        let people = vec![Person::new(1, "A", "", vec![]), Person::new(2, "B", "", vec![7])];
        let errors = validate(&people);
        assert!(errors.contains(&"Person B (ID: 2) references invalid parent ID: 7".to_string()));
        assert!(errors.contains(&"Person B (ID: 2) is not reachable from any root".to_string()));
    }

    #[test]
    fn test_cycle_without_root_accumulates_all_findings() {
        let people = vec![Person::new(1, "A", "", vec![2]), Person::new(2, "B", "", vec![1])];
        let errors = validate(&people);
        assert!(errors.contains(&"Circular references detected in hierarchy".to_string()));
        assert!(errors.contains(&"No root nodes found (people with no parents)".to_string()));
        assert_eq!(
            errors.iter().filter(|e| e.contains("not reachable")).count(),
            2
        );
    }

    #[test]
    fn test_cycle_hanging_off_a_root() {
        let people = vec![
            Person::new(1, "Boss", "", vec![]),
            Person::new(2, "A", "", vec![1, 3]),
            Person::new(3, "B", "", vec![2]),
        ];
        let errors = validate(&people);
        assert_eq!(errors, vec!["Circular references detected in hierarchy".to_string()]);
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let people = vec![Person::new(1, "Boss", "", vec![]), Person::new(2, "A", "", vec![1, 2])];
        assert!(validate(&people).contains(&"Circular references detected in hierarchy".to_string()));
    }

    #[test]
    fn test_sample_data_is_valid() {
        assert!(validate(&crate::orgchart::sample_people()).is_empty());
    }
}
