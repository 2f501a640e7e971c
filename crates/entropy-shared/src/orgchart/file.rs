use std::fs;
use std::path::Path;

use crate::models::Person;

#[derive(Debug, thiserror::Error)]
pub enum OrgChartError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid org chart JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrgChartError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub fn parse_people(json: &str) -> Result<Vec<Person>, OrgChartError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_people(path: impl AsRef<Path>) -> Result<Vec<Person>, OrgChartError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| OrgChartError::io(path, e))?;
    let people = parse_people(&json)?;
    tracing::debug!("Loaded {} people from {}", people.len(), path.display());
    Ok(people)
}

/// Pretty JSON sorted by id, non-ASCII kept as is.
pub fn to_json_pretty(people: &[Person]) -> Result<String, OrgChartError> {
    let mut sorted = people.to_vec();
    sorted.sort_by_key(|p| p.id);
    Ok(serde_json::to_string_pretty(&sorted)?)
}

pub fn save_people(path: impl AsRef<Path>, people: &[Person]) -> Result<(), OrgChartError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| OrgChartError::io(dir, e))?;
    }
    fs::write(path, to_json_pretty(people)?).map_err(|e| OrgChartError::io(path, e))?;
    tracing::debug!("Saved {} people to {}", people.len(), path.display());
    Ok(())
}

pub fn sample_people() -> Vec<Person> {
    const CLUB_LEADS: [i64; 3] = [10, 11, 12];

    vec![
        Person::new(1, "Michael Decker", "CEO", vec![]),
        Person::new(2, "Jamie Rohner", "Projektleitung", vec![1]),
        Person::new(3, "Fabian \"Evolution\"", "Projektleitung", vec![1]),
        Person::new(4, "Philipp", "Projektleitung", vec![1]),
        Person::new(5, "Roskato", "Projektleitung", vec![1]),
        Person::new(6, "TBD", "Projektleitung", vec![1]),
        Person::new(7, "Marvin", "Mediengestalter", vec![5]),
        Person::new(8, "Paul", "Social Media Manager", vec![5]),
        Person::new(9, "Marcel", "Social Media Manager", vec![5]),
        Person::new(10, "Eric", "Club Leitung", vec![6]),
        Person::new(11, "Mini", "Club Leitung", vec![6]),
        Person::new(12, "Mella", "Club Leitung", vec![6]),
        Person::new(13, "Phyn", "Team Akquise", vec![2]),
        Person::new(14, "Sechseck", "Team Akquise", vec![2]),
        Person::new(15, "Dominik", "Bereichsleitung R6", vec![16]),
        Person::new(16, "Felix", "Bereichsleitung R6", CLUB_LEADS.to_vec()),
        Person::new(17, "Ferrit", "Social Media Manager", vec![5]),
        Person::new(18, "Luca", "Bereichsleitung Rocket League", CLUB_LEADS.to_vec()),
        Person::new(19, "Mario", "Bereichsleitung Rocket League", vec![18]),
        Person::new(20, "Lunarell", "Head of Content Creation", vec![5]),
        Person::new(21, "NYC_1809", "Bereichsleitung Valorant", CLUB_LEADS.to_vec()),
        Person::new(22, "OsirisGCC", "Bereichsleitung R6", vec![16]),
        Person::new(23, "RagzyEntropy", "Bereichsleitung R6", vec![16]),
        Person::new(24, "Salva", "Head of eSports", vec![3]),
        Person::new(25, "Zain", "Eventmanagement", CLUB_LEADS.to_vec()),
    ]
}
