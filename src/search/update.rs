use crate::config::SolrConfig;
use crate::document::{Document, FieldKind};
use crate::error::{require_non_blank, SolrError, SolrResult};
use crate::search::collection::Transport;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::marker::PhantomData;

/// Batch of additions and deletions sent as one update command
///
/// The body uses the engine's JSON command syntax, which repeats the `add` key
/// once per document, so it is assembled as text rather than as a `Map`.
pub struct AtomicUpdate<'a, D> {
    config: &'a SolrConfig,
    transport: &'a dyn Transport,
    additions: Vec<Map<String, Value>>,
    deletions: Vec<String>,
    commit: bool,
    _document: PhantomData<fn() -> D>,
}

impl<'a, D: Document> AtomicUpdate<'a, D> {
    pub(crate) fn new(config: &'a SolrConfig, transport: &'a dyn Transport) -> Self {
        Self {
            config,
            transport,
            additions: Vec::new(),
            deletions: Vec::new(),
            commit: false,
            _document: PhantomData,
        }
    }

    /// Queue a document for indexing
    ///
    /// Properties are written under their wire names. Score fields and null
    /// values are left out.
    pub fn add(&mut self, document: &D) -> SolrResult<&mut Self>
    where
        D: Serialize,
    {
        let Value::Object(mut properties) = serde_json::to_value(document)? else {
            return Err(SolrError::Serialization(format!(
                "{} does not serialize to a JSON object",
                std::any::type_name::<D>()
            )));
        };

        let mut wire = Map::new();
        for meta in D::fields() {
            if meta.kind == FieldKind::Score {
                continue;
            }
            match properties.remove(meta.name) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    wire.insert(meta.wire().to_string(), value);
                }
            }
        }

        self.additions.push(wire);
        Ok(self)
    }

    /// Queue a deletion by unique key
    pub fn delete(&mut self, id: impl Into<String>) -> SolrResult<&mut Self> {
        let id = id.into();
        require_non_blank("id", &id)?;
        self.deletions.push(id);
        Ok(self)
    }

    /// Ask for a hard commit after the other commands
    pub fn commit(&mut self) -> &mut Self {
        self.commit = true;
        self
    }

    /// Update command body
    pub fn body(&self) -> SolrResult<String> {
        if self.additions.is_empty() && self.deletions.is_empty() && !self.commit {
            return Err(SolrError::InvalidArgument(
                "update carries no documents, deletions or commit".to_string(),
            ));
        }

        let mut commands = Vec::with_capacity(self.additions.len() + self.deletions.len() + 1);
        for document in &self.additions {
            let mut add = json!({ "doc": document });
            if let Some(ms) = self.config.commit_within_ms {
                add["commitWithin"] = json!(ms);
            }
            commands.push(format!("\"add\":{}", serde_json::to_string(&add)?));
        }
        for id in &self.deletions {
            commands.push(format!(
                "\"delete\":{}",
                serde_json::to_string(&json!({ "id": id }))?
            ));
        }
        if self.commit {
            commands.push("\"commit\":{}".to_string());
        }

        Ok(format!("{{{}}}", commands.join(",")))
    }

    /// Send the update to the configured handler
    pub async fn execute(&self) -> SolrResult<Value> {
        let body = self.body()?;
        tracing::debug!(
            handler = %self.config.update_handler,
            additions = self.additions.len(),
            deletions = self.deletions.len(),
            commit = self.commit,
            "Sending update"
        );
        self.transport.update(&self.config.update_handler, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FieldMeta, GeoCoordinate};
    use crate::search::RequestPayload;
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Store {
        id: Option<String>,
        name: Option<String>,
        score: Option<f64>,
        location: Option<GeoCoordinate>,
    }

    impl Document for Store {
        fn fields() -> &'static [FieldMeta] {
            static FIELDS: [FieldMeta; 4] = [
                FieldMeta::new("id"),
                FieldMeta::new("name").wire_name("name_s"),
                FieldMeta::new("score").score(),
                FieldMeta::new("location").geo(),
            ];
            &FIELDS
        }
    }

    #[derive(Default)]
    struct Recorder {
        bodies: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn search(&self, _handler: &str, _payload: RequestPayload) -> SolrResult<Value> {
            Ok(json!({}))
        }

        async fn update(&self, handler: &str, body: String) -> SolrResult<Value> {
            self.bodies.lock().unwrap().push((handler.to_string(), body));
            Ok(json!({ "responseHeader": { "status": 0 } }))
        }
    }

    #[test]
    fn test_body_uses_wire_names_and_skips_score() {
        let config = SolrConfig::default();
        let transport = Recorder::default();
        let mut update = AtomicUpdate::<Store>::new(&config, &transport);

        update
            .add(&Store {
                id: Some("S1".into()),
                name: Some("Corner".into()),
                score: Some(3.0),
                location: Some(GeoCoordinate::new(-1.5, 2.5)),
            })
            .unwrap()
            .add(&Store {
                id: Some("S2".into()),
                ..Default::default()
            })
            .unwrap()
            .delete("S0")
            .unwrap()
            .commit();

        assert_eq!(
            update.body().unwrap(),
            concat!(
                "{\"add\":{\"doc\":{\"id\":\"S1\",\"location\":\"-1.5,2.5\",\"name_s\":\"Corner\"}},",
                "\"add\":{\"doc\":{\"id\":\"S2\"}},",
                "\"delete\":{\"id\":\"S0\"},",
                "\"commit\":{}}"
            )
        );
    }

    #[test]
    fn test_commit_within_is_attached_to_additions() {
        let config = SolrConfig::builder().commit_within_ms(500).build();
        let transport = Recorder::default();
        let mut update = AtomicUpdate::<Store>::new(&config, &transport);
        update
            .add(&Store {
                id: Some("S1".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(
            update.body().unwrap(),
            "{\"add\":{\"commitWithin\":500,\"doc\":{\"id\":\"S1\"}}}"
        );
    }

    #[test]
    fn test_empty_update_and_blank_id_are_rejected() {
        let config = SolrConfig::default();
        let transport = Recorder::default();
        let mut update = AtomicUpdate::<Store>::new(&config, &transport);

        assert!(matches!(update.body(), Err(SolrError::InvalidArgument(_))));
        assert!(matches!(update.delete("  "), Err(SolrError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_execute_posts_to_update_handler() {
        let config = SolrConfig::builder().update_handler("/stores/update").build();
        let transport = Recorder::default();
        let mut update = AtomicUpdate::<Store>::new(&config, &transport);
        update.delete("S9").unwrap();

        update.execute().await.unwrap();

        let bodies = transport.bodies.lock().unwrap();
        assert_eq!(
            bodies[0],
            (
                "/stores/update".to_string(),
                "{\"delete\":{\"id\":\"S9\"}}".to_string()
            )
        );
    }
}
