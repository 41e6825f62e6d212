//! Student service coordinating the record store, summary provider, and metrics.

use crate::{
    config::Config,
    metrics::{MetricsSnapshot, RosterMetrics},
    store::{StoreError, StudentPatch, StudentRecord, StudentStore},
    summarization::{
        GenerationRequest, OllamaSummarizationClient, SummarizationClient,
        SummarizationClientError,
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors emitted by [`StudentService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Summary provider failed.
    #[error(transparent)]
    Summarization(#[from] SummarizationClientError),
}

/// Abstraction over the student operations used by the HTTP surface.
#[async_trait]
pub trait StudentApi: Send + Sync {
    /// Store a new record and return the full collection.
    async fn create_student(
        &self,
        record: StudentRecord,
    ) -> Result<Vec<StudentRecord>, ServiceError>;

    /// Fetch a single record.
    async fn get_student(&self, id: i64) -> Result<StudentRecord, ServiceError>;

    /// Fetch every record in insertion order.
    async fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError>;

    /// Apply a partial update to an existing record.
    async fn update_student(
        &self,
        id: i64,
        patch: StudentPatch,
    ) -> Result<StudentRecord, ServiceError>;

    /// Remove a record.
    async fn delete_student(&self, id: i64) -> Result<StudentRecord, ServiceError>;

    /// Ask the provider for a short natural-language summary of a record.
    async fn summarize_student(&self, id: i64) -> Result<String, ServiceError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Owns the record store, the summary client, and the metrics registry.
///
/// Construct one near process start and share it through an `Arc`; tests build isolated
/// instances with [`StudentService::with_client`].
pub struct StudentService {
    store: StudentStore,
    summarizer: Box<dyn SummarizationClient>,
    summary_model: String,
    metrics: Arc<RosterMetrics>,
}

impl StudentService {
    /// Build a service backed by the Ollama runtime described in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let client =
            OllamaSummarizationClient::new(config.ollama_url.clone(), config.summary_timeout())?;
        tracing::info!(
            ollama_url = %config.ollama_url,
            model = %config.summary_model,
            timeout_secs = config.summary_timeout_secs,
            "Summary client initialized"
        );
        Ok(Self::with_client(
            Box::new(client),
            config.summary_model.clone(),
        ))
    }

    /// Build a service with an empty store around an arbitrary summary client.
    pub fn with_client(
        summarizer: Box<dyn SummarizationClient>,
        summary_model: impl Into<String>,
    ) -> Self {
        Self {
            store: StudentStore::new(),
            summarizer,
            summary_model: summary_model.into(),
            metrics: Arc::new(RosterMetrics::new()),
        }
    }

    /// Access the underlying record store.
    pub fn store(&self) -> &StudentStore {
        &self.store
    }
}

#[async_trait]
impl StudentApi for StudentService {
    async fn create_student(
        &self,
        record: StudentRecord,
    ) -> Result<Vec<StudentRecord>, ServiceError> {
        let records = self.store.insert(record).await?;
        self.metrics.record_created();
        Ok(records)
    }

    async fn get_student(&self, id: i64) -> Result<StudentRecord, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    async fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError> {
        Ok(self.store.list().await?)
    }

    async fn update_student(
        &self,
        id: i64,
        patch: StudentPatch,
    ) -> Result<StudentRecord, ServiceError> {
        let record = self.store.update(id, &patch).await?;
        self.metrics.record_updated();
        Ok(record)
    }

    async fn delete_student(&self, id: i64) -> Result<StudentRecord, ServiceError> {
        let record = self.store.delete(id).await?;
        self.metrics.record_deleted();
        Ok(record)
    }

    async fn summarize_student(&self, id: i64) -> Result<String, ServiceError> {
        // Snapshot under the read lock; the provider call runs unlocked and may see stale data.
        let record = self.store.get(id).await?;
        let request = GenerationRequest::for_student(self.summary_model.as_str(), &record);

        match self.summarizer.generate_summary(&request).await {
            Ok(summary) => {
                self.metrics.record_summary(true);
                tracing::debug!(id, chars = summary.len(), "Summary generated");
                Ok(summary)
            }
            Err(error) => {
                self.metrics.record_summary(false);
                tracing::warn!(id, %error, "Summary provider failed");
                Err(error.into())
            }
        }
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingClient {
        calls: Arc<AtomicUsize>,
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl SummarizationClient for CountingClient {
        async fn generate_summary(
            &self,
            request: &GenerationRequest,
        ) -> Result<String, SummarizationClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.model, "test-model");
            assert!(!request.stream);
            self.reply
                .clone()
                .map_err(|()| SummarizationClientError::Timeout(Duration::from_secs(1)))
        }
    }

    fn service(reply: Result<String, ()>) -> (StudentService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = CountingClient {
            calls: Arc::clone(&calls),
            reply,
        };
        (
            StudentService::with_client(Box::new(client), "test-model"),
            calls,
        )
    }

    fn alice() -> StudentRecord {
        StudentRecord {
            id: 1,
            name: "Alice".into(),
            age: 22,
            email: "alice@example.com".into(),
        }
    }

    #[tokio::test]
    async fn summarize_missing_student_skips_provider() {
        let (service, calls) = service(Ok("unused".into()));
        let error = service.summarize_student(9).await.expect_err("missing");
        assert!(matches!(error, ServiceError::Store(StoreError::NotFound(9))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.metrics_snapshot().summary_failures, 0);
    }

    #[tokio::test]
    async fn summarize_returns_provider_text() {
        let (service, calls) = service(Ok("Alice is 22.".into()));
        service.create_student(alice()).await.expect("create");

        let summary = service.summarize_student(1).await.expect("summary");
        assert_eq!(summary, "Alice is 22.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.metrics_snapshot().summaries_generated, 1);
    }

    #[tokio::test]
    async fn summarize_surfaces_provider_errors() {
        let (service, _) = service(Err(()));
        service.create_student(alice()).await.expect("create");

        let error = service.summarize_student(1).await.expect_err("provider error");
        assert!(matches!(
            error,
            ServiceError::Summarization(SummarizationClientError::Timeout(_))
        ));
        assert_eq!(service.metrics_snapshot().summary_failures, 1);
    }

    #[tokio::test]
    async fn failed_mutations_are_not_counted() {
        let (service, _) = service(Ok(String::new()));
        service.create_student(alice()).await.expect("create");
        service.create_student(alice()).await.expect_err("duplicate");
        service.delete_student(5).await.expect_err("missing");
        service
            .update_student(1, StudentPatch::default())
            .await
            .expect("update");

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.records_created, 1);
        assert_eq!(snapshot.records_deleted, 0);
        assert_eq!(snapshot.records_updated, 1);
        assert_eq!(service.store().len().await, 1);
    }
}
