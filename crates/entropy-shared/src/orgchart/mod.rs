//! Org chart maintenance: the flat people list kept in a JSON file, and the
//! tree, diagnostics and statistics derived from it.

mod file;
mod hierarchy;
mod outline;
mod stats;
mod validate;

pub use file::{load_people, parse_people, sample_people, save_people, to_json_pretty, OrgChartError};
pub use hierarchy::{build_hierarchy, flatten};
pub use outline::render_outline;
pub use stats::{compute_statistics, OrgChartStatistics, TeamSize};
pub use validate::validate;

use std::path::Path;

use crate::models::{HierarchicalNode, Person};

/// Editable org chart loaded from a flat list.
#[derive(Debug, Clone, Default)]
pub struct OrgChart {
    pub people: Vec<Person>,
}

impl OrgChart {
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, OrgChartError> {
        load_people(path).map(Self::new)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OrgChartError> {
        save_people(path, &self.people)
    }

    pub fn get(&self, id: i64) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Appends a person with the next free id and returns that id.
    pub fn add_person(&mut self, name: &str, position: &str, parent_ids: Vec<i64>) -> i64 {
        let id = self.people.iter().map(|p| p.id).max().map_or(1, |max| max + 1);
        self.people.push(Person::new(id, name, position, parent_ids));
        tracing::info!("Added {} ({}) with ID {}", name, position, id);
        id
    }

    /// Removes the person and every reference to them as a parent.
    pub fn remove_person(&mut self, id: i64) -> bool {
        let Some(index) = self.people.iter().position(|p| p.id == id) else {
            tracing::warn!("Person with ID {} not found", id);
            return false;
        };

        let removed = self.people.remove(index);
        for person in &mut self.people {
            person.parent_ids.retain(|&parent| parent != id);
        }
        tracing::info!("Removed {}", removed.name);
        true
    }

    pub fn update_person(
        &mut self,
        id: i64,
        name: Option<String>,
        position: Option<String>,
        parent_ids: Option<Vec<i64>>,
    ) -> bool {
        let Some(person) = self.people.iter_mut().find(|p| p.id == id) else {
            tracing::warn!("Person with ID {} not found", id);
            return false;
        };

        if let Some(name) = name {
            person.name = name;
        }
        if let Some(position) = position {
            person.position = position;
        }
        if let Some(parent_ids) = parent_ids {
            person.parent_ids = parent_ids;
        }
        tracing::info!("Updated {}", person.name);
        true
    }

    pub fn hierarchy(&self) -> HierarchicalNode {
        build_hierarchy(&self.people)
    }

    pub fn validate(&self) -> Vec<String> {
        validate(&self.people)
    }

    pub fn statistics(&self) -> OrgChartStatistics {
        compute_statistics(&self.people)
    }

    pub fn outline(&self) -> String {
        render_outline(&self.people)
    }
}
