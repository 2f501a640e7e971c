use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::Person;

const LARGEST_TEAMS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSize {
    pub id: i64,
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgChartStatistics {
    pub total_people: usize,
    pub total_positions: usize,
    pub position_distribution: BTreeMap<String, usize>,
    /// Level → number of people at that level; roots are level 0.
    pub level_distribution: BTreeMap<u32, usize>,
    pub largest_teams: Vec<TeamSize>,
    pub root_count: usize,
}

pub fn compute_statistics(people: &[Person]) -> OrgChartStatistics {
    if people.is_empty() {
        return OrgChartStatistics::default();
    }

    let mut position_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for person in people {
        *position_distribution.entry(person.position.clone()).or_default() += 1;
    }

    let mut levels = Levels::new(people);
    let mut level_distribution: BTreeMap<u32, usize> = BTreeMap::new();
    for person in people {
        *level_distribution.entry(levels.level_of(person.id)).or_default() += 1;
    }

    OrgChartStatistics {
        total_people: people.len(),
        total_positions: position_distribution.len(),
        position_distribution,
        level_distribution,
        largest_teams: largest_teams(people),
        root_count: people.iter().filter(|p| p.is_root()).count(),
    }
}

/// People ranked by how many entries cite them as a parent. Ties keep input
/// order.
fn largest_teams(people: &[Person]) -> Vec<TeamSize> {
    let mut teams: Vec<TeamSize> = people
        .iter()
        .map(|person| TeamSize {
            id: person.id,
            name: person.name.clone(),
            size: people
                .iter()
                .filter(|p| p.id != person.id && p.parent_ids.contains(&person.id))
                .count(),
        })
        .filter(|team| team.size > 0)
        .collect();

    teams.sort_by(|a, b| b.size.cmp(&a.size));
    teams.truncate(LARGEST_TEAMS_LIMIT);
    teams
}

/// Memoised `1 + min(parent levels)`. A parent already on the current path
/// counts as level 0, so results that reached such a parent depend on the
/// path and are not cached.
struct Levels<'a> {
    parents: HashMap<i64, &'a [i64]>,
    memo: HashMap<i64, u32>,
}

impl<'a> Levels<'a> {
    fn new(people: &'a [Person]) -> Self {
        Self {
            parents: people
                .iter()
                .map(|p| (p.id, p.parent_ids.as_slice()))
                .collect(),
            memo: HashMap::new(),
        }
    }

    fn level_of(&mut self, id: i64) -> u32 {
        self.walk(id, &mut HashSet::new()).0
    }

    /// Level of `id` below the people on `path`, and whether it touched `path`.
    fn walk(&mut self, id: i64, path: &mut HashSet<i64>) -> (u32, bool) {
        if path.contains(&id) {
            return (0, true);
        }
        if let Some(&level) = self.memo.get(&id) {
            return (level, false);
        }

        let parent_ids = match self.parents.get(&id) {
            Some(parent_ids) if !parent_ids.is_empty() => *parent_ids,
            _ => return (0, false),
        };

        path.insert(id);
        let mut min = u32::MAX;
        let mut on_cycle = false;
        for &parent_id in parent_ids {
            let (level, hit_path) = self.walk(parent_id, path);
            min = min.min(level);
            on_cycle |= hit_path;
        }
        path.remove(&id);

        let level = min + 1;
        if !on_cycle {
            self.memo.insert(id, level);
        }
        (level, on_cycle)
    }
}
