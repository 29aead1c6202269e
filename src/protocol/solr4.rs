//! Flat `key=value` request syntax
//!
//! Fragments are produced unencoded; percent-encoding belongs to the transport.

use crate::document::{field_meta, Document};
use crate::error::{SolrError, SolrResult};
use crate::protocol::local_params::{with_excludes, with_tag};
use crate::search::{FacetOptions, FacetSortType, Parameter};

const FACET_ENABLED: &str = "facet=true";
const SORT_PREFIX: &str = "sort=";

/// Apply one parameter to the fragment list
pub fn execute<D: Document>(parameter: &Parameter<D>, container: &mut Vec<String>) -> SolrResult<()> {
    match parameter {
        Parameter::Query(p) => {
            container.push(format!("q={}", p.value.render()?));
        }
        Parameter::Sort(p) => {
            let value = p.fragment()?;
            match container.iter_mut().find(|f| f.starts_with(SORT_PREFIX)) {
                Some(existing) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                None => container.push(format!("{}{}", SORT_PREFIX, value)),
            }
        }
        Parameter::Offset(p) => {
            container.push(format!("start={}", p.value));
        }
        Parameter::Limit(p) => {
            container.push(format!("rows={}", p.value));
        }
        Parameter::Fields(p) => {
            container.push(format!("fl={}", p.wire_names()?.join(",")));
        }
        Parameter::Filter(p) => {
            let expression = p.value.render()?;
            container.push(format!("fq={}", with_tag(p.tag.as_deref(), &expression)));
        }
        Parameter::FacetField(p) => {
            let sort = facet_sort_name(&p.options)?;
            let field_name = field_meta(p.field)?.wire();
            enable_facets(container);
            container.push(format!(
                "facet.field={}",
                with_excludes(&p.options.excludes, Some(&p.options.alias), field_name)
            ));
            push_facet_options(container, &p.options.alias, sort);
            if let Some(limit) = p.limit {
                container.push(format!("f.{}.facet.limit={}", p.options.alias, limit));
            }
        }
        Parameter::FacetQuery(p) => {
            let sort = facet_sort_name(&p.options)?;
            let query = p.query.render()?;
            push_facet_query(container, &p.options, &query, sort);
        }
        Parameter::FacetSpatial(p) => {
            let sort = facet_sort_name(&p.options)?;
            let formula = p.formula()?;
            push_facet_query(container, &p.options, &formula, sort);
        }
        Parameter::Any(p) => {
            container.push(format!("{}={}", p.name, p.value));
        }
    }
    Ok(())
}

/// Adds `facet=true` unless an earlier facet parameter already did
fn enable_facets(container: &mut Vec<String>) {
    if !container.iter().any(|f| f == FACET_ENABLED) {
        container.push(FACET_ENABLED.to_string());
    }
}

/// Only descending orders exist in this protocol, named by type alone
fn facet_sort_name(options: &FacetOptions) -> SolrResult<Option<&'static str>> {
    match options.sort_type {
        None => Ok(None),
        Some(FacetSortType::CountDesc) => Ok(Some("count")),
        Some(FacetSortType::IndexDesc) => Ok(Some("index")),
        Some(other) => Err(SolrError::UnsupportedSortType(other)),
    }
}

fn push_facet_query(
    container: &mut Vec<String>,
    options: &FacetOptions,
    expression: &str,
    sort: Option<&'static str>,
) {
    enable_facets(container);
    container.push(format!(
        "facet.query={}",
        with_excludes(&options.excludes, Some(&options.alias), expression)
    ));
    push_facet_options(container, &options.alias, sort);
}

fn push_facet_options(container: &mut Vec<String>, alias: &str, sort: Option<&'static str>) {
    if let Some(sort) = sort {
        container.push(format!("f.{}.facet.sort={}", alias, sort));
    }
    container.push(format!("f.{}.facet.mincount=1", alias));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Field, FieldMeta, GeoCoordinate};
    use crate::search::{
        AnyParameter, FacetFieldParameter, FacetQueryParameter, FacetSpatialParameter,
        FieldsParameter, FilterParameter, LimitParameter, OffsetParameter, QueryParameter,
        SearchValue, SortParameter, SpatialFunction,
    };
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Debug, Deserialize)]
    struct TestDocument {
        #[serde(rename = "Id")]
        id: Option<String>,
        category: Option<String>,
        spatial: Option<GeoCoordinate>,
    }

    impl TestDocument {
        const ID: Field<Self> = Field::new("Id");
        const CATEGORY: Field<Self> = Field::new("category");
        const SPATIAL: Field<Self> = Field::new("spatial");
    }

    impl Document for TestDocument {
        fn fields() -> &'static [FieldMeta] {
            static FIELDS: [FieldMeta; 3] = [
                FieldMeta::new("Id"),
                FieldMeta::new("category").wire_name("category_s"),
                FieldMeta::new("spatial").geo(),
            ];
            &FIELDS
        }
    }

    fn run(parameters: Vec<Parameter<TestDocument>>) -> SolrResult<Vec<String>> {
        let mut container = Vec::new();
        for parameter in &parameters {
            execute(parameter, &mut container)?;
        }
        Ok(container)
    }

    #[test]
    fn test_query_fragment() {
        let container = run(vec![QueryParameter::configure(SearchValue::single(
            TestDocument::ID,
            "ITEM01",
        ))
        .unwrap()
        .into()])
        .unwrap();

        assert_eq!(container, vec!["q=Id:ITEM01"]);
    }

    #[test]
    fn test_sort_accumulates_in_place() {
        let container = run(vec![
            SortParameter::configure(TestDocument::ID, true).unwrap().into(),
            OffsetParameter::configure(10).unwrap().into(),
            SortParameter::configure(TestDocument::CATEGORY, false)
                .unwrap()
                .into(),
        ])
        .unwrap();

        assert_eq!(container, vec!["sort=Id asc, category_s desc", "start=10"]);
    }

    #[test]
    fn test_paging_and_fields() {
        let container = run(vec![
            OffsetParameter::configure(20).unwrap().into(),
            LimitParameter::configure(5).unwrap().into(),
            FieldsParameter::configure(vec![TestDocument::ID, TestDocument::CATEGORY])
                .unwrap()
                .into(),
        ])
        .unwrap();

        assert_eq!(container, vec!["start=20", "rows=5", "fl=Id,category_s"]);
    }

    #[test]
    fn test_filter_with_tag() {
        let container = run(vec![FilterParameter::configure(SearchValue::single(
            TestDocument::CATEGORY,
            "books",
        ))
        .unwrap()
        .with_tag("cat")
        .unwrap()
        .into()])
        .unwrap();

        assert_eq!(container, vec!["fq={!tag=cat}category_s:books"]);
    }

    #[test]
    fn test_facets_enable_once() {
        let container = run(vec![
            FacetFieldParameter::configure("categories", TestDocument::CATEGORY)
                .unwrap()
                .with_sort_type(FacetSortType::CountDesc)
                .with_limit(5)
                .into(),
            FacetQueryParameter::configure(
                "cheap",
                SearchValue::range(TestDocument::ID, None, Some("M".into())),
            )
            .unwrap()
            .with_excludes(["cat"])
            .unwrap()
            .into(),
        ])
        .unwrap();

        assert_eq!(
            container,
            vec![
                "facet=true",
                "facet.field={!key=categories}category_s",
                "f.categories.facet.sort=count",
                "f.categories.facet.mincount=1",
                "f.categories.facet.limit=5",
                "facet.query={!ex=cat key=cheap}Id:[* TO M]",
                "f.cheap.facet.mincount=1",
            ]
        );
        assert_eq!(container.iter().filter(|f| *f == "facet=true").count(), 1);
    }

    #[test]
    fn test_facet_spatial() {
        let container = run(vec![FacetSpatialParameter::configure(
            "nearby",
            SpatialFunction::Geofilt,
            TestDocument::SPATIAL,
            GeoCoordinate::new(-1.5, 2.5),
            10.0,
        )
        .unwrap()
        .with_sort_type(FacetSortType::IndexDesc)
        .with_excludes(["t1", "t2"])
        .unwrap()
        .into()])
        .unwrap();

        assert_eq!(
            container,
            vec![
                "facet=true",
                "facet.query={!ex=t1,t2 key=nearby}{!geofilt sfield=spatial pt=-1.5,2.5 d=10}",
                "f.nearby.facet.sort=index",
                "f.nearby.facet.mincount=1",
            ]
        );
    }

    #[test]
    fn test_unsupported_facet_sort() {
        for sort_type in [FacetSortType::CountAsc, FacetSortType::IndexAsc] {
            let result = run(vec![FacetFieldParameter::configure(
                "categories",
                TestDocument::CATEGORY,
            )
            .unwrap()
            .with_sort_type(sort_type)
            .into()]);

            match result {
                Err(SolrError::UnsupportedSortType(reported)) => assert_eq!(reported, sort_type),
                other => panic!("expected UnsupportedSortType, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_any_parameter() {
        let container = run(vec![AnyParameter::configure("defType", "edismax")
            .unwrap()
            .into()])
        .unwrap();
        assert_eq!(container, vec!["defType=edismax"]);
    }
}
