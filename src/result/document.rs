use super::{QueryResult, ResultBuilder, ResultKind};
use crate::document::{Document, FieldKind, FieldMeta, GeoCoordinate};
use crate::error::{SolrError, SolrResult};
use crate::search::Parameter;
use serde_json::{Map, Value};

/// Materializes `response.docs` into typed documents
///
/// Engines differ in whether returned fields keep their plain name or come back
/// wrapped in underscores (`_id_`). Both spellings are accepted; the preferred
/// one is tried first.
#[derive(Debug, Clone, Copy)]
pub struct DocumentResult {
    prefer_wrapped: bool,
}

impl DocumentResult {
    /// Plain names first (flat parameter protocol)
    pub fn bare() -> Self {
        Self {
            prefer_wrapped: false,
        }
    }

    /// Underscore-wrapped names first (JSON body protocol)
    pub fn wrapped() -> Self {
        Self {
            prefer_wrapped: true,
        }
    }

    fn candidates(&self, key: &str) -> [String; 2] {
        let wrapped = format!("_{}_", key);
        if self.prefer_wrapped {
            [wrapped, key.to_string()]
        } else {
            [key.to_string(), wrapped]
        }
    }

    fn lookup<'a>(&self, item: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
        self.candidates(key)
            .iter()
            .find_map(|candidate| item.get(candidate.as_str()))
            .filter(|value| !value.is_null())
    }

    /// Build one document from a raw `docs` entry
    pub fn map_document<D: Document>(&self, item: &Value) -> SolrResult<D> {
        let raw = item
            .as_object()
            .ok_or_else(|| SolrError::malformed("document entry is not an object", item))?;

        let mut mapped = Map::new();
        for meta in D::fields() {
            if let Some(value) = self.read_field(meta, raw, item)? {
                mapped.insert(meta.name.to_string(), value);
            }
        }

        serde_json::from_value(Value::Object(mapped)).map_err(|e| {
            SolrError::malformed(
                format!(
                    "cannot build {}: {}",
                    std::any::type_name::<D>(),
                    e
                ),
                item,
            )
        })
    }

    fn read_field(
        &self,
        meta: &FieldMeta,
        raw: &Map<String, Value>,
        item: &Value,
    ) -> SolrResult<Option<Value>> {
        match meta.kind {
            FieldKind::Score => Ok(self.lookup(raw, "score").cloned()),
            FieldKind::Value => Ok(self.lookup(raw, meta.wire()).cloned()),
            FieldKind::Geo => {
                let Some(value) = self.lookup(raw, meta.wire()) else {
                    return Ok(None);
                };
                let text = value.as_str().ok_or_else(|| {
                    SolrError::malformed(
                        format!("field '{}' must be a 'lat,lng' string", meta.wire()),
                        item,
                    )
                })?;
                let coordinate: GeoCoordinate = text.parse().map_err(|e: String| {
                    SolrError::malformed(format!("field '{}': {}", meta.wire(), e), item)
                })?;
                Ok(Some(Value::String(coordinate.to_string())))
            }
        }
    }
}

impl<D: Document> ResultBuilder<D> for DocumentResult {
    fn name(&self) -> &'static str {
        "document"
    }

    fn kind(&self) -> ResultKind {
        ResultKind::Documents
    }

    fn execute(&self, _parameters: &[Parameter<D>], response: &Value) -> SolrResult<QueryResult<D>> {
        let docs = response
            .pointer("/response/docs")
            .and_then(Value::as_array)
            .ok_or_else(|| SolrError::malformed("missing 'response.docs'", response))?;

        let documents = docs
            .iter()
            .map(|item| self.map_document::<D>(item))
            .collect::<SolrResult<Vec<D>>>()?;

        tracing::debug!(documents = documents.len(), "Mapped search documents");
        Ok(QueryResult::Documents(documents))
    }
}
