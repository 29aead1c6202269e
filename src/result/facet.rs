use super::{QueryResult, ResultBuilder, ResultKind};
use crate::document::Document;
use crate::error::{SolrError, SolrResult};
use crate::protocol::Protocol;
use crate::search::Parameter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One bucket of a field facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetItem {
    pub value: String,
    pub count: u64,
}

/// Buckets of one field facet, in engine order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetField {
    pub name: String,
    pub items: Vec<FacetItem>,
}

/// Alias → count for query and spatial facets
pub fn parse_facet_queries(protocol: Protocol, response: &Value) -> SolrResult<HashMap<String, u64>> {
    let mut data = HashMap::new();

    match protocol {
        Protocol::Solr4 => {
            let section = response
                .get("facet_counts")
                .ok_or_else(|| SolrError::malformed("missing 'facet_counts'", response))?;
            if let Some(queries) = section.get("facet_queries").and_then(Value::as_object) {
                for (alias, count) in queries {
                    match count.as_u64() {
                        Some(count) => {
                            data.insert(alias.clone(), count);
                        }
                        None => skip(alias),
                    }
                }
            }
        }
        Protocol::Solr5 => {
            let section = response
                .get("facets")
                .and_then(Value::as_object)
                .ok_or_else(|| SolrError::malformed("missing 'facets'", response))?;
            // The section also holds the top-level "count" and bucketed field facets
            for (alias, entry) in section {
                let Some(entry) = entry.as_object() else {
                    continue;
                };
                if entry.contains_key("buckets") {
                    continue;
                }
                match entry.get("count").and_then(Value::as_u64) {
                    Some(count) => {
                        data.insert(alias.clone(), count);
                    }
                    None => skip(alias),
                }
            }
        }
    }

    tracing::debug!(facets = data.len(), "Parsed facet query counts");
    Ok(data)
}

/// Field facets with their buckets
pub fn parse_facet_fields(protocol: Protocol, response: &Value) -> SolrResult<Vec<FacetField>> {
    let mut fields = Vec::new();

    match protocol {
        Protocol::Solr4 => {
            let section = response
                .get("facet_counts")
                .ok_or_else(|| SolrError::malformed("missing 'facet_counts'", response))?;
            if let Some(facet_fields) = section.get("facet_fields").and_then(Value::as_object) {
                for (name, values) in facet_fields {
                    let Some(values) = values.as_array() else {
                        skip(name);
                        continue;
                    };
                    // Flat list alternating value and count
                    let items = values
                        .chunks(2)
                        .filter_map(|pair| match pair {
                            [value, count] => Some(FacetItem {
                                value: scalar_to_string(value)?,
                                count: count.as_u64()?,
                            }),
                            _ => None,
                        })
                        .collect();
                    fields.push(FacetField {
                        name: name.clone(),
                        items,
                    });
                }
            }
        }
        Protocol::Solr5 => {
            let section = response
                .get("facets")
                .and_then(Value::as_object)
                .ok_or_else(|| SolrError::malformed("missing 'facets'", response))?;
            for (name, entry) in section {
                let Some(buckets) = entry.get("buckets").and_then(Value::as_array) else {
                    continue;
                };
                let items = buckets
                    .iter()
                    .filter_map(|bucket| {
                        Some(FacetItem {
                            value: scalar_to_string(bucket.get("val")?)?,
                            count: bucket.get("count")?.as_u64()?,
                        })
                    })
                    .collect();
                fields.push(FacetField {
                    name: name.clone(),
                    items,
                });
            }
        }
    }

    tracing::debug!(facets = fields.len(), "Parsed facet field buckets");
    Ok(fields)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn skip(alias: &str) {
    tracing::warn!(alias = %alias, "Skipping facet entry without a count");
}

/// Query/spatial facet counts builder
#[derive(Debug, Clone, Copy)]
pub struct FacetQueryResult {
    protocol: Protocol,
}

impl FacetQueryResult {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }
}

impl<D: Document> ResultBuilder<D> for FacetQueryResult {
    fn name(&self) -> &'static str {
        "facet_query"
    }

    fn kind(&self) -> ResultKind {
        ResultKind::FacetQueries
    }

    fn execute(&self, _parameters: &[Parameter<D>], response: &Value) -> SolrResult<QueryResult<D>> {
        parse_facet_queries(self.protocol, response).map(QueryResult::FacetQueries)
    }
}

/// Field facet buckets builder
#[derive(Debug, Clone, Copy)]
pub struct FacetFieldResult {
    protocol: Protocol,
}

impl FacetFieldResult {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }
}

impl<D: Document> ResultBuilder<D> for FacetFieldResult {
    fn name(&self) -> &'static str {
        "facet_field"
    }

    fn kind(&self) -> ResultKind {
        ResultKind::FacetFields
    }

    fn execute(&self, _parameters: &[Parameter<D>], response: &Value) -> SolrResult<QueryResult<D>> {
        parse_facet_fields(self.protocol, response).map(QueryResult::FacetFields)
    }
}
