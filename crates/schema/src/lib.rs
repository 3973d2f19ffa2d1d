//! Simplified type model for schema-driven query construction.
//!
//! Introspection payloads describe fields through chains of `NON_NULL` and
//! `LIST` wrappers. For building selections only three facts matter: the leaf
//! type, whether it needs a sub-selection, and whether it is a list. This
//! crate reduces a [`RawType`](gqlvis_introspect::RawType) to exactly that,
//! keeping argument signatures verbatim so required arguments can be
//! recognised later.
//!
//! ```
//! use gqlvis_introspect::{RawField, RawType, RawTypeRef, TypeKind};
//! use gqlvis_schema::{simplify, FieldKind};
//!
//! let raw = RawType {
//!     kind: Some(TypeKind::Object),
//!     name: Some("Query".into()),
//!     fields: Some(vec![RawField {
//!         name: "countries".into(),
//!         description: None,
//!         args: None,
//!         type_ref: Some(RawTypeRef::list(RawTypeRef::named(TypeKind::Object, "Country"))),
//!     }]),
//!     possible_types: None,
//! };
//!
//! let query = simplify(Some(&raw)).unwrap();
//! assert_eq!(query.fields["countries"].kind, FieldKind::ListObject);
//! ```

mod model;
mod simplify;

pub use model::{ArgDef, ArgDefs, FieldKind, SimplifiedField, SimplifiedType};
pub use simplify::simplify;
