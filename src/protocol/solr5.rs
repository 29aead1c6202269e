//! JSON request body syntax

use crate::document::{field_meta, Document};
use crate::error::{SolrError, SolrResult};
use crate::protocol::local_params::{with_excludes, with_tag};
use crate::search::{FacetOptions, Parameter};
use serde_json::{json, Map, Value};

/// Apply one parameter to the JSON body
pub fn execute<D: Document>(
    parameter: &Parameter<D>,
    body: &mut Map<String, Value>,
) -> SolrResult<()> {
    match parameter {
        Parameter::Query(p) => {
            body.insert("query".to_string(), Value::String(p.value.render()?));
        }
        Parameter::Sort(p) => {
            let value = p.fragment()?;
            match body.get_mut("sort") {
                Some(Value::String(existing)) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                _ => {
                    body.insert("sort".to_string(), Value::String(value));
                }
            }
        }
        Parameter::Offset(p) => {
            body.insert("offset".to_string(), json!(p.value));
        }
        Parameter::Limit(p) => {
            body.insert("limit".to_string(), json!(p.value));
        }
        Parameter::Fields(p) => {
            body.insert("fields".to_string(), json!(p.wire_names()?));
        }
        Parameter::Filter(p) => {
            let expression = with_tag(p.tag.as_deref(), &p.value.render()?);
            section_array(body, "filter")?.push(Value::String(expression));
        }
        Parameter::FacetField(p) => {
            let mut terms = Map::new();
            terms.insert("field".to_string(), json!(field_meta(p.field)?.wire()));
            terms.insert("mincount".to_string(), json!(1));
            if let Some(sort) = sort_object(&p.options) {
                terms.insert("sort".to_string(), sort);
            }
            if let Some(limit) = p.limit {
                terms.insert("limit".to_string(), json!(limit));
            }
            if !p.options.excludes.is_empty() {
                terms.insert(
                    "domain".to_string(),
                    json!({ "excludeTags": p.options.excludes }),
                );
            }
            section_object(body, "facet")?
                .insert(p.options.alias.clone(), json!({ "terms": terms }));
        }
        Parameter::FacetQuery(p) => {
            let query = p.query.render()?;
            insert_facet_query(body, &p.options, &query)?;
        }
        Parameter::FacetSpatial(p) => {
            let formula = p.formula()?;
            insert_facet_query(body, &p.options, &formula)?;
        }
        Parameter::Any(p) => {
            section_object(body, "params")?.insert(p.name.clone(), json!(p.value));
        }
    }
    Ok(())
}

fn sort_object(options: &FacetOptions) -> Option<Value> {
    options.sort_type.map(|sort_type| {
        let (type_name, direction) = sort_type.parts();
        json!({ type_name: direction })
    })
}

fn insert_facet_query(
    body: &mut Map<String, Value>,
    options: &FacetOptions,
    expression: &str,
) -> SolrResult<()> {
    let mut query = Map::new();
    query.insert(
        "q".to_string(),
        json!(with_excludes(&options.excludes, None, expression)),
    );
    query.insert("mincount".to_string(), json!(1));
    if let Some(sort) = sort_object(options) {
        query.insert("sort".to_string(), sort);
    }
    section_object(body, "facet")?.insert(options.alias.clone(), json!({ "query": query }));
    Ok(())
}

/// Object under `key`, created on first use so later parameters merge into it
fn section_object<'a>(
    body: &'a mut Map<String, Value>,
    key: &str,
) -> SolrResult<&'a mut Map<String, Value>> {
    match body
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(section) => Ok(section),
        _ => Err(SolrError::InvalidArgument(format!(
            "request body already holds a non-object '{}'",
            key
        ))),
    }
}

fn section_array<'a>(body: &'a mut Map<String, Value>, key: &str) -> SolrResult<&'a mut Vec<Value>> {
    match body.entry(key).or_insert_with(|| Value::Array(Vec::new())) {
        Value::Array(section) => Ok(section),
        _ => Err(SolrError::InvalidArgument(format!(
            "request body already holds a non-array '{}'",
            key
        ))),
    }
}
