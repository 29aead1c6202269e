//! Result kind to builder mapping

use super::{
    DocumentResult, FacetFieldResult, FacetQueryResult, ResultBuilder, ResultKind, StatisticResult,
};
use crate::document::Document;
use crate::error::{SolrError, SolrResult};
use crate::protocol::Protocol;
use std::collections::HashMap;
use std::fmt;

/// Creates a fresh builder for one result kind
pub type BuilderFactory<D> = fn() -> Box<dyn ResultBuilder<D>>;

/// Maps each [`ResultKind`] to the builder that parses it
///
/// Populated during setup, then shared read-only behind an `Arc`.
pub struct ResultBuilderRegistry<D: Document> {
    factories: HashMap<ResultKind, BuilderFactory<D>>,
}

impl<D: Document> ResultBuilderRegistry<D> {
    /// Empty registry; every lookup fails until something is registered
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Default builders for a protocol
    pub fn for_protocol(protocol: Protocol) -> Self {
        let mut registry = Self::new();
        registry.register(ResultKind::Statistics, statistic::<D>);
        match protocol {
            Protocol::Solr4 => {
                registry.register(ResultKind::Documents, bare_documents::<D>);
                registry.register(ResultKind::FacetQueries, solr4_facet_queries::<D>);
                registry.register(ResultKind::FacetFields, solr4_facet_fields::<D>);
            }
            Protocol::Solr5 => {
                registry.register(ResultKind::Documents, wrapped_documents::<D>);
                registry.register(ResultKind::FacetQueries, solr5_facet_queries::<D>);
                registry.register(ResultKind::FacetFields, solr5_facet_fields::<D>);
            }
        }
        registry
    }

    /// Map `kind` to `factory`, replacing any earlier mapping
    pub fn register(&mut self, kind: ResultKind, factory: BuilderFactory<D>) -> &mut Self {
        if self.factories.insert(kind, factory).is_some() {
            tracing::debug!(kind = %kind, "Replaced result builder");
        }
        self
    }

    /// Builder for `kind`
    pub fn resolve(&self, kind: ResultKind) -> SolrResult<Box<dyn ResultBuilder<D>>> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or(SolrError::UnmappedDependency(kind))?;
        let builder = factory();
        tracing::debug!(kind = %kind, builder = builder.name(), "Resolved result builder");
        Ok(builder)
    }

    pub fn contains(&self, kind: ResultKind) -> bool {
        self.factories.contains_key(&kind)
    }
}

impl<D: Document> Default for ResultBuilderRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> fmt::Debug for ResultBuilderRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultBuilderRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn statistic<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(StatisticResult)
}

fn bare_documents<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(DocumentResult::bare())
}

fn wrapped_documents<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(DocumentResult::wrapped())
}

fn solr4_facet_queries<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(FacetQueryResult::new(Protocol::Solr4))
}

fn solr5_facet_queries<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(FacetQueryResult::new(Protocol::Solr5))
}

fn solr4_facet_fields<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(FacetFieldResult::new(Protocol::Solr4))
}

fn solr5_facet_fields<D: Document>() -> Box<dyn ResultBuilder<D>> {
    Box::new(FacetFieldResult::new(Protocol::Solr5))
}
