use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::screening::pipeline::run_screening;
use crate::screening::ranker::{RankOptions, RankedResume};
use crate::staging::{stage_batch, UploadedFile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreenQuery {
    /// Overrides the configured shortlist size for this request.
    pub top_n: Option<usize>,
}

/// One shortlist entry on the wire. The extracted text stays server-side;
/// clients get the filename and the score.
#[derive(Debug, Serialize)]
pub struct TopMatch {
    pub filename: String,
    pub score: f32,
}

impl From<RankedResume> for TopMatch {
    fn from(ranked: RankedResume) -> Self {
        TopMatch {
            filename: ranked.filename,
            score: ranked.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Staged paths of the uploaded resumes, in upload order.
    pub resumes: Vec<String>,
    /// Staged path of the uploaded job description.
    pub job_description: String,
    pub top_matches: Vec<TopMatch>,
}

/// POST /upload-resumes
///
/// Multipart form: repeated `resumes` file fields plus exactly one
/// `job_description` file field, all PDF or DOCX. Stages the batch on disk,
/// extracts text, ranks the resumes against the job description, and returns
/// the staged paths together with the top matches.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    Query(query): Query<ScreenQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut resumes: Vec<UploadedFile> = Vec::new();
    let mut job_description: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or("") {
            "resumes" => resumes.push(UploadedFile::from_field(field).await?),
            "job_description" => {
                let file = UploadedFile::from_field(field).await?;
                if job_description.replace(file).is_some() {
                    return Err(AppError::Validation(
                        "Multiple job_description files provided".to_string(),
                    ));
                }
            }
            // Unknown form fields are ignored.
            _ => {}
        }
    }

    if resumes.is_empty() {
        return Err(AppError::Validation("No resume files provided".to_string()));
    }
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("Missing job_description file".to_string()))?;

    let staged = stage_batch(&state.config.upload_dir, &resumes, &job_description).await?;
    info!(
        "Staged batch {} ({} resumes)",
        staged.batch_id,
        staged.resume_paths.len()
    );

    let options = RankOptions {
        top_n: query.top_n.unwrap_or(state.config.default_top_n),
        missing_embedding: state.config.missing_embedding_policy,
    };

    let result = run_screening(
        staged.resume_paths.clone(),
        staged.job_description_path.clone(),
        options,
        state.embedder.as_ref(),
    )
    .await?;
    info!(
        "Batch {}: shortlisted {} of {} resumes",
        staged.batch_id,
        result.top_matches.len(),
        result.considered
    );

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully".to_string(),
        resumes: staged
            .resume_paths
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
        job_description: staged.job_description_path.display().to_string(),
        top_matches: result.top_matches.into_iter().map(TopMatch::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::embedding::{EmbeddingError, EmbeddingProvider, EmbeddingVector};
    use crate::routes::build_router;
    use crate::screening::ranker::MissingEmbeddingPolicy;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use std::collections::HashMap;
    use std::io::Write as _;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubEmbedder {
        mapping: HashMap<String, EmbeddingVector>,
    }

    impl StubEmbedder {
        fn new(entries: &[(&str, &[f32])]) -> Self {
            let mapping = entries
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.to_vec()))
                .collect();
            Self { mapping }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbeddingError> {
            if text.trim().is_empty() {
                return Ok(None);
            }
            Ok(Some(
                self.mapping
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0, 0.0]),
            ))
        }

        fn model_id(&self) -> &str {
            "stub-embedding-model"
        }
    }

    fn make_state(upload_dir: &Path, default_top_n: usize) -> AppState {
        let config = Config {
            openai_api_key: "test-key".to_string(),
            port: 0,
            upload_dir: upload_dir.to_path_buf(),
            default_top_n,
            missing_embedding_policy: MissingEmbeddingPolicy::default(),
            allowed_origin: "http://localhost:5173".to_string(),
            rust_log: "info".to_string(),
        };
        let embedder = Arc::new(StubEmbedder::new(&[
            ("Rust engineer wanted", &[1.0, 0.0]),
            ("Rust systems engineer", &[0.9, 0.1]),
            ("Pastry chef", &[0.1, 0.9]),
        ]));
        AppState { config, embedder }
    }

    fn docx_bytes(paragraph: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p></w:body></w:document>"#
        );
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap();
        cursor.into_inner()
    }

    const BOUNDARY: &str = "shortlist-test-boundary";

    fn multipart_body(parts: &[(&str, &str, Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, filename, bytes) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// Two resumes plus a job description, as the browser form posts them.
    fn screening_request(uri: &str) -> Request<Body> {
        let body = multipart_body(&[
            ("resumes", "alice.docx", docx_bytes("Rust systems engineer")),
            ("resumes", "bob.docx", docx_bytes("Pastry chef")),
            ("job_description", "role.docx", docx_bytes("Rust engineer wanted")),
        ]);
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_top_n_overrides_configured_default() {
        let uploads = tempfile::tempdir().unwrap();
        let app = build_router(make_state(uploads.path(), 5));

        let response = app
            .oneshot(screening_request("/upload-resumes?top_n=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let top_matches = value["top_matches"].as_array().unwrap();
        assert_eq!(top_matches.len(), 1);
        assert_eq!(top_matches[0]["filename"], "alice.docx");
    }

    #[tokio::test]
    async fn test_configured_default_top_n_applies_without_query() {
        let uploads = tempfile::tempdir().unwrap();
        let app = build_router(make_state(uploads.path(), 1));

        let response = app
            .oneshot(screening_request("/upload-resumes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let top_matches = value["top_matches"].as_array().unwrap();
        assert_eq!(top_matches.len(), 1);
        assert_eq!(top_matches[0]["filename"], "alice.docx");
        // Both uploads are staged and reported even when the cut keeps one.
        assert_eq!(value["resumes"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_upload_response_serializes_expected_shape() {
        let response = UploadResponse {
            message: "Files uploaded successfully".to_string(),
            resumes: vec!["uploads/b1/alice.pdf".to_string()],
            job_description: "uploads/b1/role.docx".to_string(),
            top_matches: vec![TopMatch {
                filename: "alice.pdf".to_string(),
                score: 0.87,
            }],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["message"], "Files uploaded successfully");
        assert_eq!(value["resumes"][0], "uploads/b1/alice.pdf");
        assert_eq!(value["job_description"], "uploads/b1/role.docx");
        assert_eq!(value["top_matches"][0]["filename"], "alice.pdf");
        assert!((value["top_matches"][0]["score"].as_f64().unwrap() - 0.87).abs() < 1e-6);
    }

    #[test]
    fn test_top_match_drops_resume_text() {
        let ranked = RankedResume {
            filename: "alice.pdf".to_string(),
            text: "full extracted text".to_string(),
            score: 0.5,
        };

        let value = serde_json::to_value(TopMatch::from(ranked)).unwrap();
        assert!(value.get("text").is_none());
        assert_eq!(value["filename"], "alice.pdf");
    }

    #[test]
    fn test_screen_query_parses_optional_top_n() {
        let query: ScreenQuery = serde_json::from_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(query.top_n, Some(3));

        let query: ScreenQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.top_n, None);
    }
}
