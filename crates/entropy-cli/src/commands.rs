use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use entropy_shared::orgchart::{sample_people, save_people, OrgChart, OrgChartStatistics};

use crate::cli::Commands;

const RULE: &str = "========================================";

pub fn run(file: &Path, command: Commands, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Commands::CreateSample => {
            save_people(file, &sample_people())?;
            writeln!(out, "Created sample orgchart at {}", file.display())?;
        }
        Commands::Validate => {
            let chart = load(file)?;
            let errors = chart.validate();
            if errors.is_empty() {
                writeln!(out, "Validation successful: No errors found")?;
            } else {
                writeln!(out, "Validation errors found:")?;
                for error in &errors {
                    writeln!(out, "  - {}", error)?;
                }
                bail!("{} validation error(s) in {}", errors.len(), file.display());
            }
        }
        Commands::Stats { json } => {
            let stats = load(file)?.statistics();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                write_statistics(&stats, out)?;
            }
        }
        Commands::Hierarchy => {
            let chart = load(file)?;
            writeln!(out, "Organizational Hierarchy:")?;
            writeln!(out, "{RULE}")?;
            write!(out, "{}", chart.outline())?;
        }
        Commands::Add {
            name,
            position,
            parents,
        } => {
            let mut chart = load(file)?;
            for parent in &parents {
                if chart.get(*parent).is_none() {
                    bail!("Parent with ID {} not found", parent);
                }
            }
            let id = chart.add_person(&name, &position, parents);
            chart.save(file)?;
            writeln!(out, "Added: {} ({}) with ID {}", name, position, id)?;
        }
        Commands::Remove { id } => {
            let mut chart = load(file)?;
            let name = match chart.get(id) {
                Some(person) => person.name.clone(),
                None => bail!("Person with ID {} not found", id),
            };
            chart.remove_person(id);
            chart.save(file)?;
            writeln!(out, "Removed: {}", name)?;
        }
        Commands::Update {
            id,
            name,
            position,
            parents,
            no_parents,
        } => {
            let mut chart = load(file)?;
            let parents = if no_parents { Some(Vec::new()) } else { parents };
            if !chart.update_person(id, name, position, parents) {
                bail!("Person with ID {} not found", id);
            }
            chart.save(file)?;
            if let Some(person) = chart.get(id) {
                writeln!(out, "Updated: {}", person.name)?;
            }
        }
    }

    Ok(())
}

fn load(file: &Path) -> anyhow::Result<OrgChart> {
    let chart = OrgChart::load(file)
        .context("Failed to load data. Use `create-sample` to create a sample file.")?;
    tracing::info!("Loaded {} people from {}", chart.people.len(), file.display());
    Ok(chart)
}

fn write_statistics(stats: &OrgChartStatistics, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Organizational Chart Statistics:")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Total People: {}", stats.total_people)?;
    writeln!(out, "Total Positions: {}", stats.total_positions)?;
    writeln!(out, "Root Count: {}", stats.root_count)?;

    writeln!(out, "Position Distribution:")?;
    for (position, count) in &stats.position_distribution {
        writeln!(out, "  {}: {}", position, count)?;
    }

    writeln!(out, "Level Distribution:")?;
    for (level, count) in &stats.level_distribution {
        writeln!(out, "  {}: {}", level, count)?;
    }

    writeln!(out, "Largest Teams:")?;
    for team in &stats.largest_teams {
        writeln!(out, "  {} (ID: {}): {}", team.name, team.id, team.size)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use entropy_shared::orgchart::load_people;
    use tempfile::TempDir;

    use super::*;

    fn run_to_string(file: &Path, command: Commands) -> (anyhow::Result<()>, String) {
        let mut out = Vec::new();
        let result = run(file, command, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn sample_file() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data").join("orgchart.json");
        run_to_string(&file, Commands::CreateSample).0.unwrap();
        (dir, file)
    }

    #[test]
    fn test_create_sample_then_validate() {
        let (_dir, file) = sample_file();
        assert_eq!(load_people(&file).unwrap().len(), 25);

        let (result, output) = run_to_string(&file, Commands::Validate);
        assert!(result.is_ok());
        assert_eq!(output, "Validation successful: No errors found\n");
    }

    #[test]
    fn test_validate_reports_errors() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("orgchart.json");
        std::fs::write(&file, r#"[{"id": 1, "name": "A", "position": "Lead", "parentIds": [7]}]"#)
            .unwrap();

        let (result, output) = run_to_string(&file, Commands::Validate);
        assert!(result.is_err());
        assert!(output.starts_with("Validation errors found:\n"));
        assert!(output.contains("  - Person A (ID: 1) references invalid parent ID: 7"));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let (result, output) = run_to_string(&dir.path().join("nope.json"), Commands::Hierarchy);
        assert!(result.is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_hierarchy_outline() {
        let (_dir, file) = sample_file();
        let (_, output) = run_to_string(&file, Commands::Hierarchy);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Organizational Hierarchy:");
        assert_eq!(lines[2], "Michael Decker (CEO)");
        assert_eq!(lines[3], "  Jamie Rohner (Projektleitung)");
    }

    #[test]
    fn test_stats_output() {
        let (_dir, file) = sample_file();
        let (_, output) = run_to_string(&file, Commands::Stats { json: false });
        assert!(output.contains("Total People: 25\n"));
        assert!(output.contains("  Projektleitung: 5\n"));

        let (_, json) = run_to_string(&file, Commands::Stats { json: true });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["root_count"], 1);
    }

    #[test]
    fn test_add_update_remove() {
        let (_dir, file) = sample_file();

        let (result, output) = run_to_string(
            &file,
            Commands::Add {
                name: "Nova".to_string(),
                position: "Analyst".to_string(),
                parents: vec![24],
            },
        );
        result.unwrap();
        assert_eq!(output, "Added: Nova (Analyst) with ID 26\n");

        let (result, _) = run_to_string(
            &file,
            Commands::Add {
                name: "Ghost".to_string(),
                position: "None".to_string(),
                parents: vec![99],
            },
        );
        assert!(result.is_err());

        let (_, output) = run_to_string(
            &file,
            Commands::Update {
                id: 26,
                name: None,
                position: Some("Coach".to_string()),
                parents: None,
                no_parents: true,
            },
        );
        assert_eq!(output, "Updated: Nova\n");
        let people = load_people(&file).unwrap();
        let nova = people.iter().find(|p| p.id == 26).unwrap();
        assert_eq!(nova.position, "Coach");
        assert!(nova.parent_ids.is_empty());

        let (_, output) = run_to_string(&file, Commands::Remove { id: 24 });
        assert_eq!(output, "Removed: Salva\n");
        assert_eq!(load_people(&file).unwrap().len(), 25);

        let (result, _) = run_to_string(&file, Commands::Remove { id: 24 });
        assert!(result.is_err());
    }
}
