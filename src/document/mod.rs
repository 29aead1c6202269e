//! Typed document model
//!
//! A document type describes its searchable properties once, in a static
//! [`FieldMeta`] table. Requests reference properties through [`Field`] handles
//! declared as associated constants on the document type, so a field can never
//! be mistyped into a different document's request.
//!
//! ```
//! use serde::Deserialize;
//! use typed_solr::document::{Document, Field, FieldMeta};
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct Product {
//!     id: Option<String>,
//!     score: Option<f64>,
//!     title: Option<String>,
//! }
//!
//! impl Product {
//!     const ID: Field<Self> = Field::new("id");
//!     const TITLE: Field<Self> = Field::new("title");
//! }
//!
//! impl Document for Product {
//!     fn fields() -> &'static [FieldMeta] {
//!         static FIELDS: [FieldMeta; 3] = [
//!             FieldMeta::new("id"),
//!             FieldMeta::new("score").score(),
//!             FieldMeta::new("title").wire_name("title_t"),
//!         ];
//!         &FIELDS
//!     }
//! }
//!
//! assert_eq!(typed_solr::document::resolve_field_name(Product::TITLE).unwrap(), "title_t");
//! assert_eq!(typed_solr::document::resolve_field_name(Product::ID).unwrap(), "id");
//! ```

mod geo;
mod resolver;

pub use geo::GeoCoordinate;
pub use resolver::{field_meta, resolve_field_name};

use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// How the result mapper treats a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain value read from the document's own field
    Value,
    /// Relevance score read from the `score` pseudo-field
    Score,
    /// Coordinate stored as a single `"lat,lng"` string
    Geo,
}

/// Static metadata for one document property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Property name, also the serde name used when materializing the document
    pub name: &'static str,

    /// Rename applied on the wire, if any
    pub wire_name: Option<&'static str>,

    /// Whether the engine indexes the field (required for queries and facets)
    pub indexed: bool,

    /// Whether the engine stores the field (required to return it)
    pub stored: bool,

    /// Mapping behavior
    pub kind: FieldKind,
}

impl FieldMeta {
    /// Indexed, stored value field without a rename
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: None,
            indexed: true,
            stored: true,
            kind: FieldKind::Value,
        }
    }

    pub const fn wire_name(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    pub const fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub const fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    pub const fn score(mut self) -> Self {
        self.kind = FieldKind::Score;
        self
    }

    pub const fn geo(mut self) -> Self {
        self.kind = FieldKind::Geo;
        self
    }

    /// Name used for this property inside request and response payloads
    pub fn wire(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }
}

/// A document type that can be searched and materialized from responses
pub trait Document: DeserializeOwned + Send + Sync + 'static {
    /// Metadata for every mapped property
    fn fields() -> &'static [FieldMeta];
}

/// Symbolic handle to one property of `D`
pub struct Field<D> {
    name: &'static str,
    _document: PhantomData<fn() -> D>,
}

impl<D> Field<D> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _document: PhantomData,
        }
    }

    /// Property name this handle refers to
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<D> Clone for Field<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Field<D> {}

impl<D> PartialEq for Field<D> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<D> Eq for Field<D> {}

impl<D> fmt::Debug for Field<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}
