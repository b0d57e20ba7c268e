use async_trait::async_trait;
use thiserror::Error;

use crate::insights::normalizer::RawEmployeeDocument;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read employee documents: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode employee documents: {0}")]
    Decode(String),
    #[error("employee source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies raw employee documents to the insights engine.
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn fetch_documents(&self) -> Result<Vec<RawEmployeeDocument>, SourceError>;

    /// Stable name for log events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>().rsplit("::").next().unwrap_or("employee_source")
    }
}

#[async_trait]
impl<S> EmployeeSource for std::sync::Arc<S>
where
    S: EmployeeSource + ?Sized,
{
    async fn fetch_documents(&self) -> Result<Vec<RawEmployeeDocument>, SourceError> {
        (**self).fetch_documents().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryEmployeeSource {
    documents: Vec<RawEmployeeDocument>,
}

impl InMemoryEmployeeSource {
    pub fn new(documents: Vec<RawEmployeeDocument>) -> Self {
        Self { documents }
    }

    /// Parses a JSON array of documents.
    pub fn from_json(raw: &str) -> Result<Self, SourceError> {
        let documents = serde_json::from_str::<Vec<RawEmployeeDocument>>(raw)
            .map_err(|error| SourceError::Decode(error.to_string()))?;
        Ok(Self::new(documents))
    }
}

#[async_trait]
impl EmployeeSource for InMemoryEmployeeSource {
    async fn fetch_documents(&self) -> Result<Vec<RawEmployeeDocument>, SourceError> {
        Ok(self.documents.clone())
    }
}
