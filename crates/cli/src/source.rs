use std::path::PathBuf;

use async_trait::async_trait;
use salespulse_core::{EmployeeSource, RawEmployeeDocument, SourceError};

/// Reads a JSON array of raw employee documents from disk on every fetch.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EmployeeSource for JsonFileSource {
    async fn fetch_documents(&self) -> Result<Vec<RawEmployeeDocument>, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&raw)
            .map_err(|error| SourceError::Decode(format!("{}: {error}", self.path.display())))
    }

    fn name(&self) -> &str {
        "json_file"
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn reads_documents_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("employees.json");
        fs::write(&path, r#"[{ "id": "emp-1", "location": { "state": "NC" } }]"#).expect("write");

        let documents = JsonFileSource::new(&path).fetch_documents().await.expect("fetch");

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "emp-1");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = TempDir::new().expect("temp dir");
        let source = JsonFileSource::new(dir.path().join("absent.json"));

        assert!(matches!(source.fetch_documents().await, Err(SourceError::Io(_))));
    }

    #[tokio::test]
    async fn malformed_file_names_the_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write");

        match JsonFileSource::new(&path).fetch_documents().await {
            Err(SourceError::Decode(message)) => assert!(message.contains("broken.json")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
