use super::{QueryResult, ResultBuilder, ResultKind};
use crate::document::Document;
use crate::error::{SolrError, SolrResult};
use crate::search::Parameter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Summary of a search execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    /// Total documents matching the query (before paging)
    pub document_count: u64,

    /// True when nothing matched
    pub is_empty: bool,

    /// Time the engine spent on the query
    pub elapsed_time: Duration,
}

/// Read `response.numFound` and `responseHeader.QTime`
pub fn parse_statistic(response: &Value) -> SolrResult<Statistic> {
    let document_count = response
        .pointer("/response/numFound")
        .and_then(Value::as_u64)
        .ok_or_else(|| SolrError::malformed("missing 'response.numFound'", response))?;
    let qtime = response
        .pointer("/responseHeader/QTime")
        .and_then(Value::as_u64)
        .ok_or_else(|| SolrError::malformed("missing 'responseHeader.QTime'", response))?;

    Ok(Statistic {
        document_count,
        is_empty: document_count == 0,
        elapsed_time: Duration::from_millis(qtime),
    })
}

/// Statistics builder, shared by both protocols
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticResult;

impl<D: Document> ResultBuilder<D> for StatisticResult {
    fn name(&self) -> &'static str {
        "statistic"
    }

    fn kind(&self) -> ResultKind {
        ResultKind::Statistics
    }

    fn execute(&self, _parameters: &[Parameter<D>], response: &Value) -> SolrResult<QueryResult<D>> {
        parse_statistic(response).map(QueryResult::Statistics)
    }
}
