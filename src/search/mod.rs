//! Typed search requests
//!
//! A search is an ordered list of [`Parameter`]s over one document type. The
//! [`RequestBuilder`] validates the whole list, then executes each parameter
//! against a protocol-specific [`RequestPayload`]. [`DocumentCollection`] ties
//! the builder to a [`Transport`] and the result registry.
//!
//! ```text
//! Field<D> ─▶ Parameter<D> ─▶ validate ─▶ RequestBuilder ─▶ Transport
//!                                                              │
//!                         SearchResponse<D> ◀─ ResultBuilder ◀─┘
//! ```

mod builder;
mod collection;
mod parameter;
mod request;
mod update;
mod value;

pub use builder::{check_instances, validate_parameters, RequestBuilder};
pub use collection::{DocumentCollection, SearchResponse, SolrSearch, Transport};
pub use parameter::{
    AnyParameter, FacetFieldParameter, FacetOptions, FacetQueryParameter, FacetSortType,
    FacetSpatialParameter, FieldsParameter, FilterParameter, LimitParameter, OffsetParameter,
    Parameter, QueryParameter, SortParameter, Validation,
};
pub use request::RequestPayload;
pub use update::AtomicUpdate;
pub use value::{date_value, spatial_formula, Operator, SearchValue, SpatialFunction};
