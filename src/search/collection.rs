use crate::config::SolrConfig;
use crate::document::Document;
use crate::error::{SolrError, SolrResult};
use crate::result::{FacetField, QueryResult, ResultBuilderRegistry, ResultKind, Statistic};
use crate::search::builder::RequestBuilder;
use crate::search::parameter::Parameter;
use crate::search::request::RequestPayload;
use crate::search::update::AtomicUpdate;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Sends finished payloads to the engine and returns its JSON response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run a search against `handler`
    async fn search(&self, handler: &str, payload: RequestPayload) -> SolrResult<Value>;

    /// Post an update body to `handler`
    async fn update(&self, handler: &str, body: String) -> SolrResult<Value>;
}

/// Entry point for searching and updating one document type
pub struct DocumentCollection<D: Document> {
    config: SolrConfig,
    registry: Arc<ResultBuilderRegistry<D>>,
    transport: Arc<dyn Transport>,
}

impl<D: Document> DocumentCollection<D> {
    /// Collection using the protocol's default result builders
    pub fn new(config: SolrConfig, transport: Arc<dyn Transport>) -> Self {
        let registry = Arc::new(ResultBuilderRegistry::for_protocol(config.protocol));
        Self::with_registry(config, registry, transport)
    }

    pub fn with_registry(
        config: SolrConfig,
        registry: Arc<ResultBuilderRegistry<D>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            registry,
            transport,
        }
    }

    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ResultBuilderRegistry<D>> {
        &self.registry
    }

    /// Start a new search
    pub fn select(&self) -> SolrSearch<'_, D> {
        SolrSearch {
            collection: self,
            parameters: Vec::new(),
        }
    }

    /// Start a new atomic update
    pub fn update(&self) -> AtomicUpdate<'_, D> {
        AtomicUpdate::new(&self.config, self.transport.as_ref())
    }
}

impl<D: Document> fmt::Debug for DocumentCollection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCollection")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Parameters collected for one search
pub struct SolrSearch<'a, D: Document> {
    collection: &'a DocumentCollection<D>,
    parameters: Vec<Parameter<D>>,
}

impl<'a, D: Document> SolrSearch<'a, D> {
    /// Append a parameter
    ///
    /// A second instance of a single-instance parameter is rejected here, before
    /// anything reaches the request builder.
    pub fn add(&mut self, parameter: impl Into<Parameter<D>>) -> SolrResult<&mut Self> {
        let parameter = parameter.into();
        if !parameter.allows_multiple_instances()
            && self.parameters.iter().any(|p| p.name() == parameter.name())
        {
            return Err(SolrError::DuplicateParameter(parameter.name()));
        }
        self.parameters.push(parameter);
        Ok(self)
    }

    pub fn parameters(&self) -> &[Parameter<D>] {
        &self.parameters
    }

    /// Validate and execute every parameter into a wire payload
    pub fn build(&self) -> SolrResult<RequestPayload> {
        RequestBuilder::from_config(&self.collection.config).build(&self.parameters)
    }

    /// Build the payload, send it and wrap the raw response
    pub async fn execute(self) -> SolrResult<SearchResponse<D>> {
        let payload = self.build()?;
        let collection = self.collection;
        let handler = &collection.config.select_handler;

        tracing::debug!(handler = %handler, protocol = %payload.protocol(), "Sending search request");
        let raw = collection.transport.search(handler, payload).await?;

        Ok(SearchResponse {
            parameters: self.parameters,
            raw,
            registry: Arc::clone(&collection.registry),
        })
    }
}

/// Raw engine response plus the parameters that produced it
///
/// Each accessor resolves its builder from the registry and parses on demand.
pub struct SearchResponse<D: Document> {
    parameters: Vec<Parameter<D>>,
    raw: Value,
    registry: Arc<ResultBuilderRegistry<D>>,
}

impl<D: Document> SearchResponse<D> {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn documents(&self) -> SolrResult<Vec<D>> {
        match self.resolve(ResultKind::Documents)? {
            QueryResult::Documents(documents) => Ok(documents),
            other => Err(mismatch(ResultKind::Documents, other.kind())),
        }
    }

    pub fn facet_queries(&self) -> SolrResult<HashMap<String, u64>> {
        match self.resolve(ResultKind::FacetQueries)? {
            QueryResult::FacetQueries(data) => Ok(data),
            other => Err(mismatch(ResultKind::FacetQueries, other.kind())),
        }
    }

    pub fn facet_fields(&self) -> SolrResult<Vec<FacetField>> {
        match self.resolve(ResultKind::FacetFields)? {
            QueryResult::FacetFields(fields) => Ok(fields),
            other => Err(mismatch(ResultKind::FacetFields, other.kind())),
        }
    }

    pub fn statistics(&self) -> SolrResult<Statistic> {
        match self.resolve(ResultKind::Statistics)? {
            QueryResult::Statistics(statistic) => Ok(statistic),
            other => Err(mismatch(ResultKind::Statistics, other.kind())),
        }
    }

    fn resolve(&self, kind: ResultKind) -> SolrResult<QueryResult<D>> {
        self.registry
            .resolve(kind)?
            .execute(&self.parameters, &self.raw)
    }
}

fn mismatch(expected: ResultKind, actual: ResultKind) -> SolrError {
    SolrError::Configuration(format!(
        "builder registered for {} produced {}",
        expected, actual
    ))
}
