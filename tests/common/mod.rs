//! Common test utilities for search integration tests
//!
//! Provides a document type covering every field kind and an in-memory
//! transport that records requests and replays canned responses.

#![allow(dead_code)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use typed_solr::document::{Document, Field, FieldMeta, GeoCoordinate};
use typed_solr::error::{SolrError, SolrResult};
use typed_solr::search::{RequestPayload, Transport};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDocument {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    pub score: Option<f64>,
    pub dummy: Option<String>,
    pub spatial: Option<GeoCoordinate>,
    pub category: Option<String>,
    pub body: Option<String>,
}

impl TestDocument {
    pub const ID: Field<Self> = Field::new("Id");
    pub const SCORE: Field<Self> = Field::new("score");
    pub const DUMMY: Field<Self> = Field::new("dummy");
    pub const SPATIAL: Field<Self> = Field::new("spatial");
    pub const CATEGORY: Field<Self> = Field::new("category");
    pub const BODY: Field<Self> = Field::new("body");
}

impl Document for TestDocument {
    fn fields() -> &'static [FieldMeta] {
        static FIELDS: [FieldMeta; 6] = [
            FieldMeta::new("Id"),
            FieldMeta::new("score").score(),
            FieldMeta::new("dummy").wire_name("dummy_s"),
            FieldMeta::new("spatial").geo(),
            FieldMeta::new("category").wire_name("category_s"),
            FieldMeta::new("body").indexed(false),
        ];
        &FIELDS
    }
}

/// Request captured by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub enum Captured {
    Search { handler: String, payload: RequestPayload },
    Update { handler: String, body: String },
}

/// Replays one response for every call and records what was sent
pub struct MockTransport {
    response: Value,
    captured: Mutex<Vec<Captured>>,
}

impl MockTransport {
    pub fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            captured: Mutex::new(Vec::new()),
        })
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn search(&self, handler: &str, payload: RequestPayload) -> SolrResult<Value> {
        self.captured.lock().unwrap().push(Captured::Search {
            handler: handler.to_string(),
            payload,
        });
        Ok(self.response.clone())
    }

    async fn update(&self, handler: &str, body: String) -> SolrResult<Value> {
        self.captured.lock().unwrap().push(Captured::Update {
            handler: handler.to_string(),
            body,
        });
        Ok(self.response.clone())
    }
}

/// Transport whose every call fails
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn search(&self, _handler: &str, _payload: RequestPayload) -> SolrResult<Value> {
        Err(SolrError::Transport("connection refused".to_string()))
    }

    async fn update(&self, _handler: &str, _body: String) -> SolrResult<Value> {
        Err(SolrError::Transport("connection refused".to_string()))
    }
}
