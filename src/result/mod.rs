//! Response mapping
//!
//! Each [`ResultBuilder`] turns the engine's raw JSON into one kind of typed
//! output. Builders are pure: the same response always yields the same result,
//! and a structural problem aborts the whole parse with
//! [`SolrError::MalformedResponse`](crate::error::SolrError::MalformedResponse).
//!
//! Which builder handles which [`ResultKind`] is decided by a
//! [`ResultBuilderRegistry`] populated once per protocol.

mod document;
mod facet;
mod registry;
mod statistic;

pub use document::DocumentResult;
pub use facet::{
    parse_facet_fields, parse_facet_queries, FacetField, FacetFieldResult, FacetItem,
    FacetQueryResult,
};
pub use registry::{BuilderFactory, ResultBuilderRegistry};
pub use statistic::{parse_statistic, Statistic, StatisticResult};

use crate::document::Document;
use crate::error::SolrResult;
use crate::search::Parameter;
use serde_json::Value;
use std::collections::HashMap;
use strum::{Display, EnumString};

/// Kind of output a result builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResultKind {
    Documents,
    FacetQueries,
    FacetFields,
    Statistics,
}

/// Typed output of a result builder
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<D> {
    Documents(Vec<D>),
    FacetQueries(HashMap<String, u64>),
    FacetFields(Vec<FacetField>),
    Statistics(Statistic),
}

impl<D> QueryResult<D> {
    pub fn kind(&self) -> ResultKind {
        match self {
            QueryResult::Documents(_) => ResultKind::Documents,
            QueryResult::FacetQueries(_) => ResultKind::FacetQueries,
            QueryResult::FacetFields(_) => ResultKind::FacetFields,
            QueryResult::Statistics(_) => ResultKind::Statistics,
        }
    }
}

/// Parses one kind of output from a search response
pub trait ResultBuilder<D: Document>: Send + Sync {
    /// Builder name, used in logs
    fn name(&self) -> &'static str;

    /// Kind of output produced
    fn kind(&self) -> ResultKind;

    /// Parse the response produced for `parameters`
    fn execute(&self, parameters: &[Parameter<D>], response: &Value) -> SolrResult<QueryResult<D>>;
}
