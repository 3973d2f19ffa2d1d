use crate::{ArgDef, ArgDefs, FieldKind, SimplifiedField, SimplifiedType};
use gqlvis_introspect::{type_string, RawField, RawType, TypeKind, UNKNOWN_TYPE};
use indexmap::IndexMap;

/// Converts an introspected type into its simplified form.
///
/// Returns `None` when the type is absent, is not an object or interface, or
/// has no field list. `None` means "unusable" and must not be cached. This
/// never fails: fields with missing type data get [`UNKNOWN_TYPE`] as their
/// leaf type name instead.
#[must_use]
pub fn simplify(raw: Option<&RawType>) -> Option<SimplifiedType> {
    let raw = raw?;

    let kind = match raw.kind {
        Some(kind @ (TypeKind::Object | TypeKind::Interface)) => kind,
        other => {
            tracing::debug!(name = ?raw.name, kind = ?other, "Type is not an object or interface");
            return None;
        }
    };

    let Some(raw_fields) = raw.fields.as_deref() else {
        tracing::debug!(name = ?raw.name, "Type has no field list");
        return None;
    };

    let fields: IndexMap<String, SimplifiedField> = raw_fields
        .iter()
        .map(|field| (field.name.clone(), simplify_field(field)))
        .collect();

    Some(SimplifiedType {
        name: raw.name.clone().unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        kind,
        fields,
        possible_types: raw.possible_types.clone().unwrap_or_default(),
    })
}

fn simplify_field(field: &RawField) -> SimplifiedField {
    let (kind, leaf_type_name) = field.type_ref.as_ref().map_or_else(
        || (FieldKind::Scalar, UNKNOWN_TYPE.to_string()),
        |type_ref| {
            let unwrapped = type_ref.unwrap_wrappers();
            (
                FieldKind::classify(&unwrapped),
                unwrapped.leaf_name_or_unknown().to_string(),
            )
        },
    );

    let args: ArgDefs = field
        .args
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|arg| {
            (
                arg.name.clone(),
                ArgDef {
                    type_signature: type_string(arg.type_ref.as_ref()),
                    description: arg.description.clone(),
                },
            )
        })
        .collect();

    SimplifiedField {
        kind,
        leaf_type_name,
        description: field.description.clone(),
        args,
    }
}
