use std::io::ErrorKind;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use entropy_shared::{
    transcript::{annotate, is_transcript_file, is_valid_ticket_id},
    TranscriptMessage,
};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;

/// First export for the ticket in name order, if any.
async fn find_transcript(state: &AppState, ticket_id: &str) -> Result<Option<std::path::PathBuf>, AppError> {
    let dir = &state.config.transcripts_dir;
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Transcripts directory {} not found", dir.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("Failed to list {}", dir.display())),
            ))
        }
    };

    let mut matches = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let name = entry.file_name();
        if name
            .to_str()
            .is_some_and(|name| is_transcript_file(name, ticket_id))
        {
            matches.push(entry.path());
        }
    }

    matches.sort();
    Ok(matches.into_iter().next())
}

/// GET /api/v1/transcripts/:ticket_id
pub async fn get_transcript(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ticket_id): Path<String>,
) -> Result<Json<Vec<TranscriptMessage>>, AppError> {
    if !is_valid_ticket_id(&ticket_id) {
        return Err(AppError::Validation("Invalid ticket id".to_string()));
    }

    let path = find_transcript(&state, &ticket_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let json = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut messages: Vec<TranscriptMessage> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    annotate(&mut messages);
    tracing::debug!(ticket_id, user_id = user.id, "Serving transcript with {} messages", messages.len());

    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tempfile::TempDir;

    use crate::handlers::test_support::TestApp;

    const USER: (i64, &str, &[&str]) = (1, "paul", &["Support"]);

    async fn app_with_transcripts(files: &[(&str, serde_json::Value)]) -> (TestApp, TempDir) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content.to_string()).unwrap();
        }
        let app = TestApp::with_paths(PathBuf::from("missing/orgchart.json"), dir.path().to_path_buf()).await;
        (app, dir)
    }

    #[tokio::test]
    async fn test_transcript_is_annotated() {
        let messages = json!([
            {"userID": "42", "username": "paul", "message": "hi", "timestamp": "2024-03-05T14:07:00Z"},
            {"userID": "42", "username": "paul", "message": "again", "timestamp": "yesterday"}
        ]);
        let (app, _dir) = app_with_transcripts(&[("ticket-7_paul.json", messages)]).await;

        let (status, body) = app
            .request(Method::GET, "/api/v1/transcripts/ticket-7", Some(USER), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["timestamp"], "05.03.2024 14:07");
        assert_eq!(body[1]["timestamp"], "yesterday");
        assert_eq!(body[0]["username"], "paul");
        assert_eq!(body[0]["color"], body[1]["color"]);
    }

    #[tokio::test]
    async fn test_first_match_in_name_order() {
        let first = json!([{"userID": "1", "message": "a", "timestamp": "t"}]);
        let second = json!([{"userID": "1", "message": "b", "timestamp": "t"}]);
        let (app, _dir) =
            app_with_transcripts(&[("9_zed.json", second), ("9_abc.json", first)]).await;

        let (_, body) = app.request(Method::GET, "/api/v1/transcripts/9", Some(USER), None).await;
        assert_eq!(body[0]["message"], "a");
    }

    #[tokio::test]
    async fn test_missing_and_invalid_ids() {
        let (app, _dir) = app_with_transcripts(&[("90_x.json", json!([]))]).await;

        let (status, _) = app.request(Method::GET, "/api/v1/transcripts/9", Some(USER), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .request(Method::GET, "/api/v1/transcripts/a.b", Some(USER), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
