//! Read-only resource repository backed by a search engine index
//!
//! [`SearchRepository`] compiles query layers with the `resq-ir` elastic
//! translator and hands the requests to a [`SearchTransport`]. Writes are
//! rejected; the index is maintained by a separate process.

use async_trait::async_trait;
use resq_dsl::{CountRequest, CountResponse, SearchRequest, SearchResponse};
use resq_ir::elastic::{AssemblerOptions, QueryTranslator, TranslateError};
use resq_ir::{FilterExpr, QueryLayer};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Search engine unreachable: {0}")]
    Unavailable(String),

    #[error("Search engine rejected request ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Malformed search engine response: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("Operation '{0}' is not supported by a search index repository")]
    UnsupportedWriteOperation(&'static str),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl RepositoryError {
    /// The query itself cannot be expressed; retrying will not help
    pub fn is_translation_error(&self) -> bool {
        matches!(self, RepositoryError::Translate(_))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Sends compiled requests to the engine
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> std::result::Result<SearchResponse, TransportError>;

    async fn count(&self, request: &CountRequest) -> std::result::Result<CountResponse, TransportError>;
}

pub struct SearchRepository<T: SearchTransport> {
    transport: T,
    index: String,
    translator: QueryTranslator,
}

impl<T: SearchTransport> SearchRepository<T> {
    pub fn new(transport: T, index: impl Into<String>, options: AssemblerOptions) -> Self {
        Self {
            transport,
            index: index.into(),
            translator: QueryTranslator::with_options(options),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Documents matching the layer's filter, in sort order, within its page window
    pub async fn get(&self, layer: &QueryLayer) -> Result<Vec<JsonValue>> {
        let request = self.translator.translate(&self.index, layer)?;
        let response = self.transport.search(&request).await?;
        let documents = response.into_documents();
        debug!(index = %self.index, resource = %layer.resource, returned = documents.len(), "search completed");
        Ok(documents)
    }

    /// Number of documents matching `filter`, clamped to `i32::MAX`
    pub async fn count(&self, filter: Option<&FilterExpr>) -> Result<i32> {
        let request = self.translator.build_count(&self.index, filter)?;
        let response = self.transport.count(&request).await?;
        if response.is_clamped() {
            warn!(index = %self.index, total = response.count, "count exceeds i32 range, clamping");
        }
        Ok(response.clamped())
    }

    pub async fn get_for_create(&self, _id: &str) -> Result<JsonValue> {
        self.unsupported("get_for_create")
    }

    pub async fn create(&self, _resource: JsonValue) -> Result<JsonValue> {
        self.unsupported("create")
    }

    pub async fn get_for_update(&self, _id: &str) -> Result<JsonValue> {
        self.unsupported("get_for_update")
    }

    pub async fn update(&self, _id: &str, _resource: JsonValue) -> Result<JsonValue> {
        self.unsupported("update")
    }

    pub async fn delete(&self, _id: &str) -> Result<()> {
        self.unsupported("delete")
    }

    pub async fn set_relationship(&self, _id: &str, _relationship: &str, _targets: Vec<JsonValue>) -> Result<()> {
        self.unsupported("set_relationship")
    }

    pub async fn add_to_to_many_relationship(
        &self,
        _id: &str,
        _relationship: &str,
        _targets: Vec<JsonValue>,
    ) -> Result<()> {
        self.unsupported("add_to_to_many_relationship")
    }

    pub async fn remove_from_to_many_relationship(
        &self,
        _id: &str,
        _relationship: &str,
        _targets: Vec<JsonValue>,
    ) -> Result<()> {
        self.unsupported("remove_from_to_many_relationship")
    }

    fn unsupported<R>(&self, operation: &'static str) -> Result<R> {
        debug!(index = %self.index, operation, "write rejected");
        Err(RepositoryError::UnsupportedWriteOperation(operation))
    }
}
