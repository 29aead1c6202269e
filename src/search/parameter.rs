//! Search parameters
//!
//! Every parameter is configured once, then validated and executed against a
//! [`RequestPayload`]. Execution is dispatched on the payload variant to the
//! protocol module that knows its wire syntax.

use crate::document::{field_meta, Document, Field, GeoCoordinate};
use crate::error::{require_local_param_safe, require_non_blank, SolrResult};
use crate::protocol::{solr4, solr5};
use crate::search::request::RequestPayload;
use crate::search::value::{require_distance, SearchValue, SpatialFunction};
use strum::{Display, EnumString};

/// Outcome of a parameter's semantic check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: String,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Ordering of facet buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FacetSortType {
    CountAsc,
    CountDesc,
    IndexAsc,
    IndexDesc,
}

impl FacetSortType {
    /// `(type, direction)` pair, e.g. `("count", "desc")`
    pub fn parts(self) -> (&'static str, &'static str) {
        match self {
            FacetSortType::CountAsc => ("count", "asc"),
            FacetSortType::CountDesc => ("count", "desc"),
            FacetSortType::IndexAsc => ("index", "asc"),
            FacetSortType::IndexDesc => ("index", "desc"),
        }
    }
}

/// Main query (`q`)
#[derive(Debug, Clone)]
pub struct QueryParameter<D> {
    pub value: SearchValue<D>,
}

impl<D: Document> QueryParameter<D> {
    pub fn configure(value: SearchValue<D>) -> SolrResult<Self> {
        value.check("query")?;
        Ok(Self { value })
    }
}

/// Sort by one field; repeated sorts accumulate in declaration order
#[derive(Debug, Clone)]
pub struct SortParameter<D> {
    pub field: Field<D>,
    pub ascending: bool,
}

impl<D: Document> SortParameter<D> {
    pub fn configure(field: Field<D>, ascending: bool) -> SolrResult<Self> {
        field_meta(field)?;
        Ok(Self { field, ascending })
    }

    pub(crate) fn fragment(&self) -> SolrResult<String> {
        Ok(format!(
            "{} {}",
            field_meta(self.field)?.wire(),
            if self.ascending { "asc" } else { "desc" }
        ))
    }
}

/// Pagination start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetParameter {
    pub value: u64,
}

impl OffsetParameter {
    pub fn configure(value: u64) -> SolrResult<Self> {
        Ok(Self { value })
    }
}

/// Page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitParameter {
    pub value: u64,
}

impl LimitParameter {
    pub fn configure(value: u64) -> SolrResult<Self> {
        Ok(Self { value })
    }
}

/// Fields to return
#[derive(Debug, Clone)]
pub struct FieldsParameter<D> {
    pub fields: Vec<Field<D>>,
}

impl<D: Document> FieldsParameter<D> {
    pub fn configure(fields: Vec<Field<D>>) -> SolrResult<Self> {
        if fields.is_empty() {
            return Err(crate::error::SolrError::InvalidArgument(
                "'fields' must name at least one field".to_string(),
            ));
        }
        Ok(Self { fields })
    }

    pub(crate) fn wire_names(&self) -> SolrResult<Vec<&'static str>> {
        self.fields
            .iter()
            .map(|field| field_meta(*field).map(|meta| meta.wire()))
            .collect()
    }
}

/// Filter query (`fq`), optionally tagged so facets can exclude it
#[derive(Debug, Clone)]
pub struct FilterParameter<D> {
    pub value: SearchValue<D>,
    pub tag: Option<String>,
}

impl<D: Document> FilterParameter<D> {
    pub fn configure(value: SearchValue<D>) -> SolrResult<Self> {
        value.check("filter")?;
        Ok(Self { value, tag: None })
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> SolrResult<Self> {
        let tag = tag.into();
        require_local_param_safe("tag", &tag)?;
        self.tag = Some(tag);
        Ok(self)
    }
}

/// Options shared by every facet variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub alias: String,
    pub sort_type: Option<FacetSortType>,
    pub excludes: Vec<String>,
}

impl FacetOptions {
    fn configure(alias: impl Into<String>) -> SolrResult<Self> {
        let alias = alias.into();
        require_local_param_safe("alias", &alias)?;
        Ok(Self {
            alias,
            sort_type: None,
            excludes: Vec::new(),
        })
    }

    fn set_excludes<I, S>(&mut self, excludes: I) -> SolrResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let excludes: Vec<String> = excludes.into_iter().map(Into::into).collect();
        for tag in &excludes {
            require_local_param_safe("exclude tag", tag)?;
        }
        self.excludes = excludes;
        Ok(())
    }
}

/// Count distinct values of one field
#[derive(Debug, Clone)]
pub struct FacetFieldParameter<D> {
    pub options: FacetOptions,
    pub field: Field<D>,
    pub limit: Option<u64>,
}

impl<D: Document> FacetFieldParameter<D> {
    pub fn configure(alias: impl Into<String>, field: Field<D>) -> SolrResult<Self> {
        field_meta(field)?;
        Ok(Self {
            options: FacetOptions::configure(alias)?,
            field,
            limit: None,
        })
    }

    pub fn with_sort_type(mut self, sort_type: FacetSortType) -> Self {
        self.options.sort_type = Some(sort_type);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> SolrResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.set_excludes(excludes)?;
        Ok(self)
    }
}

/// Count documents matching an arbitrary query
#[derive(Debug, Clone)]
pub struct FacetQueryParameter<D> {
    pub options: FacetOptions,
    pub query: SearchValue<D>,
}

impl<D: Document> FacetQueryParameter<D> {
    pub fn configure(alias: impl Into<String>, query: SearchValue<D>) -> SolrResult<Self> {
        query.check("facet query")?;
        Ok(Self {
            options: FacetOptions::configure(alias)?,
            query,
        })
    }

    pub fn with_sort_type(mut self, sort_type: FacetSortType) -> Self {
        self.options.sort_type = Some(sort_type);
        self
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> SolrResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.set_excludes(excludes)?;
        Ok(self)
    }
}

/// Count documents within a distance of a point
#[derive(Debug, Clone)]
pub struct FacetSpatialParameter<D> {
    pub options: FacetOptions,
    pub function: SpatialFunction,
    pub field: Field<D>,
    pub center_point: GeoCoordinate,
    pub distance: f64,
}

impl<D: Document> FacetSpatialParameter<D> {
    pub fn configure(
        alias: impl Into<String>,
        function: SpatialFunction,
        field: Field<D>,
        center_point: GeoCoordinate,
        distance: f64,
    ) -> SolrResult<Self> {
        field_meta(field)?;
        require_distance(distance)?;
        Ok(Self {
            options: FacetOptions::configure(alias)?,
            function,
            field,
            center_point,
            distance,
        })
    }

    pub fn with_sort_type(mut self, sort_type: FacetSortType) -> Self {
        self.options.sort_type = Some(sort_type);
        self
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> SolrResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.set_excludes(excludes)?;
        Ok(self)
    }

    pub(crate) fn formula(&self) -> SolrResult<String> {
        Ok(crate::search::value::spatial_formula(
            self.function,
            field_meta(self.field)?.wire(),
            &self.center_point,
            self.distance,
        ))
    }
}

/// Pass-through request parameter not otherwise modelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyParameter {
    pub name: String,
    pub value: String,
}

impl AnyParameter {
    pub fn configure(name: impl Into<String>, value: impl Into<String>) -> SolrResult<Self> {
        let name = name.into();
        let value = value.into();
        require_non_blank("name", &name)?;
        require_non_blank("value", &value)?;
        Ok(Self { name, value })
    }
}

/// Closed set of parameters a search can carry
#[derive(Debug, Clone)]
pub enum Parameter<D> {
    Query(QueryParameter<D>),
    Sort(SortParameter<D>),
    Offset(OffsetParameter),
    Limit(LimitParameter),
    Fields(FieldsParameter<D>),
    Filter(FilterParameter<D>),
    FacetField(FacetFieldParameter<D>),
    FacetQuery(FacetQueryParameter<D>),
    FacetSpatial(FacetSpatialParameter<D>),
    Any(AnyParameter),
}

impl<D: Document> Parameter<D> {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Query(_) => "query",
            Parameter::Sort(_) => "sort",
            Parameter::Offset(_) => "offset",
            Parameter::Limit(_) => "limit",
            Parameter::Fields(_) => "fields",
            Parameter::Filter(_) => "filter",
            Parameter::FacetField(_) => "facet_field",
            Parameter::FacetQuery(_) => "facet_query",
            Parameter::FacetSpatial(_) => "facet_spatial",
            Parameter::Any(_) => "any",
        }
    }

    /// Whether a search may carry more than one parameter of this variant
    pub fn allows_multiple_instances(&self) -> bool {
        !matches!(
            self,
            Parameter::Query(_) | Parameter::Offset(_) | Parameter::Limit(_) | Parameter::Fields(_)
        )
    }

    /// Semantic checks that must pass before the parameter is executed
    pub fn validate(&self) -> Validation {
        match self {
            Parameter::Query(p) => p.value.validate(),
            Parameter::Filter(p) => p.value.validate(),
            Parameter::FacetQuery(p) => p.query.validate(),
            Parameter::FacetField(p) => require_indexed_for_facet(p.field),
            Parameter::FacetSpatial(p) => require_indexed_for_facet(p.field),
            Parameter::Fields(p) => {
                for field in &p.fields {
                    match field_meta(*field) {
                        Ok(meta) if meta.stored => {}
                        Ok(meta) => {
                            return Validation::invalid(format!(
                                "field '{}' must be stored to be returned in fields",
                                meta.name
                            ))
                        }
                        Err(e) => return Validation::invalid(e.to_string()),
                    }
                }
                Validation::valid()
            }
            Parameter::Sort(_)
            | Parameter::Offset(_)
            | Parameter::Limit(_)
            | Parameter::Any(_) => Validation::valid(),
        }
    }

    /// Apply the parameter to the request in the payload's protocol syntax
    pub fn execute(&self, request: &mut RequestPayload) -> SolrResult<()> {
        tracing::debug!(parameter = self.name(), protocol = %request.protocol(), "Executing parameter");
        match request {
            RequestPayload::Params(container) => solr4::execute(self, container),
            RequestPayload::Json(body) => solr5::execute(self, body),
        }
    }
}

fn require_indexed_for_facet<D: Document>(field: Field<D>) -> Validation {
    match field_meta(field) {
        Ok(meta) if meta.indexed => Validation::valid(),
        Ok(meta) => Validation::invalid(format!(
            "field '{}' must be indexed to be used in a facet",
            meta.name
        )),
        Err(e) => Validation::invalid(e.to_string()),
    }
}

macro_rules! impl_from_parameter {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl<D: Document> From<$ty> for Parameter<D> {
                fn from(parameter: $ty) -> Self {
                    Parameter::$variant(parameter)
                }
            }
        )*
    };
}

impl_from_parameter! {
    Query => QueryParameter<D>,
    Sort => SortParameter<D>,
    Offset => OffsetParameter,
    Limit => LimitParameter,
    Fields => FieldsParameter<D>,
    Filter => FilterParameter<D>,
    FacetField => FacetFieldParameter<D>,
    FacetQuery => FacetQueryParameter<D>,
    FacetSpatial => FacetSpatialParameter<D>,
    Any => AnyParameter,
}
