use std::io::ErrorKind;

use anyhow::Context;
use axum::{extract::State, Extension, Json};
use entropy_shared::{
    api::OrgChartResponse,
    orgchart::{build_hierarchy, compute_statistics, parse_people, validate, OrgChartStatistics},
    HierarchicalNode, Person,
};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;

/// Raw contents of the org chart file, `None` when it does not exist yet.
async fn read_orgchart_file(state: &AppState) -> Result<Option<String>, AppError> {
    let path = &state.config.orgchart_file;
    match tokio::fs::read_to_string(path).await {
        Ok(json) => Ok(Some(json)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Org chart file {} not found", path.display());
            Ok(None)
        }
        Err(e) => Err(AppError::Internal(
            anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
        )),
    }
}

async fn load_people(state: &AppState) -> Result<Vec<Person>, AppError> {
    let Some(json) = read_orgchart_file(state).await? else {
        return Ok(Vec::new());
    };
    let people = parse_people(&json)
        .with_context(|| format!("Failed to parse {}", state.config.orgchart_file.display()))?;
    Ok(people)
}

/// GET /api/v1/orgchart
pub async fn get_orgchart(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<OrgChartResponse>, AppError> {
    let Some(json) = read_orgchart_file(&state).await? else {
        return Ok(Json(OrgChartResponse {
            root: HierarchicalNode::placeholder(),
            diagnostics: validate(&[]),
        }));
    };

    // A broken file still renders, with the parse error as the only diagnostic
    let response = match parse_people(&json) {
        Ok(people) => OrgChartResponse {
            root: build_hierarchy(&people),
            diagnostics: validate(&people),
        },
        Err(e) => {
            tracing::error!("Org chart file is invalid: {}", e);
            OrgChartResponse {
                root: HierarchicalNode::placeholder(),
                diagnostics: vec![e.to_string()],
            }
        }
    };

    Ok(Json(response))
}

/// GET /api/v1/orgchart/people
pub async fn list_people(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<Vec<Person>>, AppError> {
    Ok(Json(load_people(&state).await?))
}

/// GET /api/v1/orgchart/stats
pub async fn get_statistics(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<OrgChartStatistics>, AppError> {
    let people = load_people(&state).await?;
    Ok(Json(compute_statistics(&people)))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::http::{Method, StatusCode};
    use entropy_shared::orgchart::{sample_people, save_people};
    use entropy_shared::Person;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::handlers::test_support::TestApp;

    const USER: (i64, &str, &[&str]) = (1, "paul", &[]);

    async fn app_with(people: Option<&[Person]>) -> (TestApp, TempDir) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("orgchart.json");
        if let Some(people) = people {
            save_people(&file, people).unwrap();
        }
        let app = TestApp::with_paths(file, PathBuf::from("missing")).await;
        (app, dir)
    }

    #[tokio::test]
    async fn test_missing_file_gives_placeholder() {
        let (app, _dir) = app_with(None).await;
        let (status, body) = app.request(Method::GET, "/api/v1/orgchart", Some(USER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["root"]["name"], "No data");
        assert_eq!(body["root"]["isPlaceholder"], true);
        assert_eq!(body["diagnostics"], json!(["No people data loaded"]));
    }

    #[tokio::test]
    async fn test_empty_file_matches_missing_file() {
        let (app, _dir) = app_with(Some(&[])).await;
        let (_, body) = app.request(Method::GET, "/api/v1/orgchart", Some(USER), None).await;
        assert_eq!(body["root"]["isPlaceholder"], true);
        assert_eq!(body["diagnostics"], json!(["No people data loaded"]));
    }

    #[tokio::test]
    async fn test_single_root_tree() {
        let (app, _dir) = app_with(Some(&sample_people())).await;
        let (_, body) = app.request(Method::GET, "/api/v1/orgchart", Some(USER), None).await;
        assert_eq!(body["root"]["id"], 1);
        assert!(body["root"].get("isVirtual").is_none());
        assert!(!body["root"]["children"].as_array().unwrap().is_empty());
        assert_eq!(body["diagnostics"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_multiple_roots_and_diagnostics() {
        let people = vec![
            Person::new(1, "A", "Lead", vec![]),
            Person::new(2, "B", "Lead", vec![]),
            Person::new(3, "C", "Member", vec![9]),
        ];
        let (app, _dir) = app_with(Some(&people)).await;
        let (_, body) = app.request(Method::GET, "/api/v1/orgchart", Some(USER), None).await;
        assert_eq!(body["root"]["isVirtual"], true);
        assert_eq!(body["root"]["name"], "Entropy Gaming");
        let diagnostics = body["diagnostics"].as_array().unwrap();
        assert!(diagnostics
            .iter()
            .any(|d| d == "Person C (ID: 3) references invalid parent ID: 9"));
    }

    #[tokio::test]
    async fn test_invalid_json_degrades() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("orgchart.json");
        std::fs::write(&file, "{ not json").unwrap();
        let app = TestApp::with_paths(file, PathBuf::from("missing")).await;

        let (status, body) = app.request(Method::GET, "/api/v1/orgchart", Some(USER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["root"]["isPlaceholder"], true);
        assert_eq!(body["diagnostics"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .request(Method::GET, "/api/v1/orgchart/people", Some(USER), None)
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_people_and_stats() {
        let (app, _dir) = app_with(Some(&sample_people())).await;
        let (_, people) = app
            .request(Method::GET, "/api/v1/orgchart/people", Some(USER), None)
            .await;
        assert_eq!(people.as_array().unwrap().len(), 25);
        assert!(people[0]["parentIds"].is_array());

        let (status, stats) = app
            .request(Method::GET, "/api/v1/orgchart/stats", Some(USER), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_people"], 25);
        assert_eq!(stats["root_count"], 1);
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (app, _dir) = app_with(None).await;
        let (status, _) = app.request(Method::GET, "/api/v1/orgchart", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
