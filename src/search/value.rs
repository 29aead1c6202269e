//! Search values rendered into query, filter and facet-query expressions

use crate::document::{field_meta, Document, Field, GeoCoordinate};
use crate::error::{require_non_blank, SolrError, SolrResult};
use crate::search::parameter::Validation;
use chrono::{DateTime, SecondsFormat, Utc};
use strum::{Display, EnumString};

/// Spatial filter function
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SpatialFunction {
    /// Exact great-circle distance
    Geofilt,
    /// Bounding box around the circle
    Bbox,
}

/// Boolean operator joining the members of a [`SearchValue::Multi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

/// A query expression over fields of `D`
#[derive(Debug, Clone)]
pub enum SearchValue<D> {
    /// `field:value`
    Single { field: Field<D>, value: String },

    /// `field:[from TO to]`, open ends rendered as `*`
    Range {
        field: Field<D>,
        from: Option<String>,
        to: Option<String>,
    },

    /// `{!geofilt sfield=field pt=lat,lng d=distance}`
    Spatial {
        function: SpatialFunction,
        field: Field<D>,
        center: GeoCoordinate,
        distance: f64,
    },

    /// Members joined with an operator and wrapped in parentheses
    Multi {
        operator: Operator,
        values: Vec<SearchValue<D>>,
    },

    /// Expression passed through untouched
    Raw(String),
}

impl<D: Document> SearchValue<D> {
    pub fn single(field: Field<D>, value: impl Into<String>) -> Self {
        SearchValue::Single {
            field,
            value: value.into(),
        }
    }

    /// `field:value` with the date in canonical UTC form
    pub fn single_date(field: Field<D>, value: &DateTime<Utc>) -> Self {
        Self::single(field, date_value(value))
    }

    pub fn range(field: Field<D>, from: Option<String>, to: Option<String>) -> Self {
        SearchValue::Range { field, from, to }
    }

    pub fn spatial(
        function: SpatialFunction,
        field: Field<D>,
        center: GeoCoordinate,
        distance: f64,
    ) -> Self {
        SearchValue::Spatial {
            function,
            field,
            center,
            distance,
        }
    }

    pub fn all(values: Vec<SearchValue<D>>) -> Self {
        SearchValue::Multi {
            operator: Operator::And,
            values,
        }
    }

    pub fn any(values: Vec<SearchValue<D>>) -> Self {
        SearchValue::Multi {
            operator: Operator::Or,
            values,
        }
    }

    pub fn raw(expression: impl Into<String>) -> Self {
        SearchValue::Raw(expression.into())
    }

    /// Structural checks run when a parameter is configured
    ///
    /// Rejects blank values and raw expressions, ranges open at both ends,
    /// empty groups and unusable distances. `argument` names the parameter in
    /// the error.
    pub fn check(&self, argument: &str) -> SolrResult<()> {
        match self {
            SearchValue::Single { value, .. } => require_non_blank(argument, value),
            SearchValue::Range { from, to, .. } => {
                if from.is_none() && to.is_none() {
                    return Err(SolrError::InvalidArgument(format!(
                        "'{}' range needs at least one bound",
                        argument
                    )));
                }
                for bound in from.iter().chain(to.iter()) {
                    require_non_blank(argument, bound)?;
                }
                Ok(())
            }
            SearchValue::Spatial { distance, .. } => require_distance(*distance),
            SearchValue::Multi { values, .. } => {
                if values.is_empty() {
                    return Err(SolrError::InvalidArgument(format!(
                        "'{}' must combine at least one value",
                        argument
                    )));
                }
                values.iter().try_for_each(|value| value.check(argument))
            }
            SearchValue::Raw(expression) => require_non_blank(argument, expression),
        }
    }

    /// Render the expression with wire field names
    pub fn render(&self) -> SolrResult<String> {
        match self {
            SearchValue::Single { field, value } => {
                Ok(format!("{}:{}", field_meta(*field)?.wire(), value))
            }
            SearchValue::Range { field, from, to } => Ok(format!(
                "{}:[{} TO {}]",
                field_meta(*field)?.wire(),
                from.as_deref().unwrap_or("*"),
                to.as_deref().unwrap_or("*")
            )),
            SearchValue::Spatial {
                function,
                field,
                center,
                distance,
            } => Ok(spatial_formula(
                *function,
                field_meta(*field)?.wire(),
                center,
                *distance,
            )),
            SearchValue::Multi { operator, values } => {
                let rendered = values
                    .iter()
                    .map(SearchValue::render)
                    .collect::<SolrResult<Vec<_>>>()?;
                Ok(format!("({})", rendered.join(&format!(" {} ", operator))))
            }
            SearchValue::Raw(expression) => Ok(expression.clone()),
        }
    }

    /// Every field the expression touches must be indexed
    pub fn validate(&self) -> Validation {
        match self {
            SearchValue::Single { field, .. }
            | SearchValue::Range { field, .. }
            | SearchValue::Spatial { field, .. } => match field_meta(*field) {
                Ok(meta) if meta.indexed => Validation::valid(),
                Ok(meta) => Validation::invalid(format!(
                    "field '{}' must be indexed to be used in a query",
                    meta.name
                )),
                Err(e) => Validation::invalid(e.to_string()),
            },
            SearchValue::Multi { values, .. } => values
                .iter()
                .map(SearchValue::validate)
                .find(|validation| !validation.is_valid)
                .unwrap_or_else(Validation::valid),
            SearchValue::Raw(_) => Validation::valid(),
        }
    }
}

/// Distance must be a finite, non-negative number
pub(crate) fn require_distance(distance: f64) -> SolrResult<()> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(SolrError::InvalidArgument(format!(
            "'distance' must be a non-negative number (got {})",
            distance
        )));
    }
    Ok(())
}

/// Spatial local-params formula, e.g. `{!geofilt sfield=location pt=-1.5,2.5 d=10}`
pub fn spatial_formula(
    function: SpatialFunction,
    field_name: &str,
    center: &GeoCoordinate,
    distance: f64,
) -> String {
    format!(
        "{{!{} sfield={} pt={} d={}}}",
        function, field_name, center, distance
    )
}

/// Date literal in the engine's canonical UTC form
pub fn date_value(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldMeta;
    use chrono::TimeZone;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Debug, Deserialize)]
    struct Place {
        id: Option<String>,
        name: Option<String>,
        location: Option<GeoCoordinate>,
        notes: Option<String>,
    }

    impl Place {
        const ID: Field<Self> = Field::new("id");
        const NAME: Field<Self> = Field::new("name");
        const LOCATION: Field<Self> = Field::new("location");
        const NOTES: Field<Self> = Field::new("notes");
    }

    impl Document for Place {
        fn fields() -> &'static [FieldMeta] {
            static FIELDS: [FieldMeta; 4] = [
                FieldMeta::new("id"),
                FieldMeta::new("name").wire_name("name_s"),
                FieldMeta::new("location").geo(),
                FieldMeta::new("notes").indexed(false),
            ];
            &FIELDS
        }
    }

    #[test]
    fn test_render_single() {
        let value = SearchValue::single(Place::ID, "ITEM01");
        assert_eq!(value.render().unwrap(), "id:ITEM01");

        let renamed = SearchValue::single(Place::NAME, "Lisbon");
        assert_eq!(renamed.render().unwrap(), "name_s:Lisbon");
    }

    #[test]
    fn test_render_range() {
        let bounded = SearchValue::range(Place::ID, Some("A".into()), Some("M".into()));
        assert_eq!(bounded.render().unwrap(), "id:[A TO M]");

        let open = SearchValue::range(Place::ID, None, Some("M".into()));
        assert_eq!(open.render().unwrap(), "id:[* TO M]");
    }

    #[test]
    fn test_render_spatial() {
        let value = SearchValue::spatial(
            SpatialFunction::Geofilt,
            Place::LOCATION,
            GeoCoordinate::new(-1.5, 2.5),
            10.0,
        );
        assert_eq!(
            value.render().unwrap(),
            "{!geofilt sfield=location pt=-1.5,2.5 d=10}"
        );
    }

    #[test]
    fn test_render_multi() {
        let value = SearchValue::any(vec![
            SearchValue::single(Place::ID, "A"),
            SearchValue::all(vec![
                SearchValue::single(Place::NAME, "x"),
                SearchValue::raw("*:*"),
            ]),
        ]);
        assert_eq!(value.render().unwrap(), "(id:A OR (name_s:x AND *:*))");
    }

    #[test]
    fn test_validate_requires_indexed_fields() {
        assert!(SearchValue::single(Place::ID, "A").validate().is_valid);

        let invalid = SearchValue::single(Place::NOTES, "x").validate();
        assert!(!invalid.is_valid);
        assert!(invalid.message.contains("notes"));

        let nested = SearchValue::all(vec![
            SearchValue::single(Place::ID, "A"),
            SearchValue::single(Place::NOTES, "x"),
        ]);
        assert!(!nested.validate().is_valid);
    }

    #[test]
    fn test_check_rejects_empty_values() {
        assert!(SearchValue::single(Place::ID, "A").check("query").is_ok());
        assert!(SearchValue::range(Place::ID, None, Some("M".into()))
            .check("query")
            .is_ok());

        let rejected = [
            SearchValue::single(Place::ID, "   "),
            SearchValue::range(Place::ID, None, None),
            SearchValue::range(Place::ID, Some(" ".into()), None),
            SearchValue::all(vec![]),
            SearchValue::any(vec![SearchValue::single(Place::ID, "A"), SearchValue::raw("")]),
            SearchValue::spatial(
                SpatialFunction::Geofilt,
                Place::LOCATION,
                GeoCoordinate::new(0.0, 0.0),
                f64::NAN,
            ),
            SearchValue::spatial(
                SpatialFunction::Bbox,
                Place::LOCATION,
                GeoCoordinate::new(0.0, 0.0),
                -1.0,
            ),
        ];
        for value in rejected {
            assert!(
                matches!(value.check("query"), Err(SolrError::InvalidArgument(_))),
                "accepted {:?}",
                value
            );
        }
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(SpatialFunction::Geofilt.to_string(), "geofilt");
        assert_eq!("bbox".parse::<SpatialFunction>().unwrap(), SpatialFunction::Bbox);
        assert_eq!(Operator::Or.to_string(), "OR");
    }

    #[test]
    fn test_single_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let value = SearchValue::single_date(Place::ID, &date);
        assert_eq!(value.render().unwrap(), "id:2024-03-01T12:30:00Z");
    }

    #[test]
    fn test_date_value() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(date_value(&date), "2024-03-01T12:30:00Z");
    }
}
