use super::{Document, Field, FieldMeta};
use crate::error::{SolrError, SolrResult};

/// Look up the metadata entry a field handle refers to
///
/// A handle naming a property that is missing from `D::fields()` is a
/// programming error and fails immediately instead of producing an empty name.
pub fn field_meta<D: Document>(field: Field<D>) -> SolrResult<&'static FieldMeta> {
    D::fields()
        .iter()
        .find(|meta| meta.name == field.name())
        .ok_or_else(|| {
            SolrError::InvalidArgument(format!(
                "property '{}' is not declared in the field table of {}",
                field.name(),
                std::any::type_name::<D>()
            ))
        })
}

/// Wire field name for a property: the rename if one is declared, else the property name
pub fn resolve_field_name<D: Document>(field: Field<D>) -> SolrResult<&'static str> {
    field_meta(field).map(FieldMeta::wire)
}
