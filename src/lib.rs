//! Typed query construction and result mapping for Solr-style search engines
//!
//! Requests are assembled from strongly typed parameters over a caller's
//! document type and rendered into the wire syntax of the engine's protocol
//! version. Responses are parsed back into typed documents, facet counts and
//! statistics by result builders looked up per protocol.
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use typed_solr::document::{Document, Field, FieldMeta};
//! use typed_solr::protocol::Protocol;
//! use typed_solr::search::{
//!     FacetFieldParameter, Parameter, QueryParameter, RequestBuilder, SearchValue,
//!     SortParameter,
//! };
//!
//! #[derive(Debug, Deserialize)]
//! struct Product {
//!     id: Option<String>,
//!     category: Option<String>,
//! }
//!
//! impl Product {
//!     const ID: Field<Self> = Field::new("id");
//!     const CATEGORY: Field<Self> = Field::new("category");
//! }
//!
//! impl Document for Product {
//!     fn fields() -> &'static [FieldMeta] {
//!         static FIELDS: [FieldMeta; 2] = [
//!             FieldMeta::new("id"),
//!             FieldMeta::new("category").wire_name("category_s"),
//!         ];
//!         &FIELDS
//!     }
//! }
//!
//! # fn main() -> typed_solr::error::SolrResult<()> {
//! let parameters: Vec<Parameter<Product>> = vec![
//!     QueryParameter::configure(SearchValue::single(Product::ID, "ITEM01"))?.into(),
//!     SortParameter::configure(Product::CATEGORY, true)?.into(),
//!     FacetFieldParameter::configure("categories", Product::CATEGORY)?.into(),
//! ];
//!
//! let payload = RequestBuilder::new(Protocol::Solr4).build(&parameters)?;
//! assert_eq!(
//!     payload.to_wire_string(),
//!     "q=id:ITEM01&sort=category_s asc&facet=true&facet.field={!key=categories}category_s\
//!      &f.categories.facet.mincount=1&wt=json"
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod protocol;
pub mod result;
pub mod search;

pub use config::SolrConfig;
pub use document::{Document, Field, FieldMeta, GeoCoordinate};
pub use error::{SolrError, SolrResult};
pub use protocol::Protocol;
pub use result::{QueryResult, ResultBuilder, ResultBuilderRegistry, ResultKind};
pub use search::{DocumentCollection, Parameter, RequestBuilder, SearchResponse, Transport};
