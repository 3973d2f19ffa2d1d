//! Canned introspection payloads.
//!
//! Each fixture maps type names to the JSON a server returns for
//! `__type(name:)`, in the shape the type query asks for. Use these when a
//! test just needs a realistic schema; build raw types inline when the
//! schema shape is the point of the test.

use serde_json::{json, Value};
use std::collections::HashMap;

/// A schema served by [`crate::FakeTransport`].
#[derive(Debug, Clone)]
pub struct Schema {
    pub query_type: Option<String>,
    pub types: HashMap<String, Value>,
}

impl Schema {
    #[must_use]
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            query_type: Some(query_type.into()),
            types: HashMap::new(),
        }
    }

    /// A schema whose `__schema` reports no query type.
    #[must_use]
    pub fn without_query_type() -> Self {
        Self {
            query_type: None,
            types: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, raw: Value) -> Self {
        if let Some(name) = raw.get("name").and_then(Value::as_str) {
            self.types.insert(name.to_string(), raw);
        }
        self
    }
}

/// `{kind, name, ofType: null}`
#[must_use]
pub fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

#[must_use]
pub fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

#[must_use]
pub fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

#[must_use]
pub fn field(name: &str, type_ref: Value) -> Value {
    json!({ "name": name, "description": null, "args": [], "type": type_ref })
}

#[must_use]
pub fn field_with_args(name: &str, type_ref: Value, args: Vec<Value>) -> Value {
    json!({ "name": name, "description": null, "args": args, "type": type_ref })
}

#[must_use]
pub fn arg(name: &str, type_ref: Value) -> Value {
    json!({ "name": name, "description": null, "type": type_ref })
}

#[must_use]
pub fn object(name: &str, fields: Vec<Value>) -> Value {
    json!({ "kind": "OBJECT", "name": name, "fields": fields, "possibleTypes": null })
}

#[must_use]
pub fn interface(name: &str, fields: Vec<Value>, possible: &[&str]) -> Value {
    let possible: Vec<Value> = possible
        .iter()
        .map(|name| json!({ "kind": "OBJECT", "name": name }))
        .collect();
    json!({ "kind": "INTERFACE", "name": name, "fields": fields, "possibleTypes": possible })
}

/// Countries and continents, with a required `code` argument on `country`.
///
/// ```text
/// type Query {
///   countries(filter: CountryFilterInput): [Country!]!
///   country(code: ID!): Country
///   continents: [Continent!]!
/// }
/// type Country { code: ID!  name: String!  capital: String  continent: Continent!  languages: [Language!]! }
/// type Continent { code: ID!  name: String!  countries: [Country!]! }
/// type Language { code: ID!  name: String! }
/// ```
#[must_use]
pub fn countries() -> Schema {
    let id = || non_null(named("SCALAR", "ID"));
    let string = || non_null(named("SCALAR", "String"));

    Schema::new("Query")
        .with_type(object(
            "Query",
            vec![
                field_with_args(
                    "countries",
                    non_null(list(non_null(named("OBJECT", "Country")))),
                    vec![arg("filter", named("INPUT_OBJECT", "CountryFilterInput"))],
                ),
                field_with_args("country", named("OBJECT", "Country"), vec![arg("code", id())]),
                field(
                    "continents",
                    non_null(list(non_null(named("OBJECT", "Continent")))),
                ),
            ],
        ))
        .with_type(object(
            "Country",
            vec![
                field("code", id()),
                field("name", string()),
                field("capital", named("SCALAR", "String")),
                field("continent", non_null(named("OBJECT", "Continent"))),
                field(
                    "languages",
                    non_null(list(non_null(named("OBJECT", "Language")))),
                ),
            ],
        ))
        .with_type(object(
            "Continent",
            vec![
                field("code", id()),
                field("name", string()),
                field(
                    "countries",
                    non_null(list(non_null(named("OBJECT", "Country")))),
                ),
            ],
        ))
        .with_type(object(
            "Language",
            vec![field("code", id()), field("name", string())],
        ))
}

/// An interface with two implementations.
///
/// ```text
/// type Query { pets(limit: Int): [Pet!]!  owner(id: ID!): Owner }
/// interface Pet { name: String! }   # Dog, Cat
/// type Dog implements Pet { name: String!  bark: String! }
/// type Cat implements Pet { name: String!  meow: String! }
/// type Owner { name: String!  pets(limit: Int): [Pet!]! }
/// ```
#[must_use]
pub fn pets() -> Schema {
    let string = || non_null(named("SCALAR", "String"));
    let pet_list = || non_null(list(non_null(named("INTERFACE", "Pet"))));
    let limit = || arg("limit", named("SCALAR", "Int"));

    Schema::new("Query")
        .with_type(object(
            "Query",
            vec![
                field_with_args("pets", pet_list(), vec![limit()]),
                field_with_args(
                    "owner",
                    named("OBJECT", "Owner"),
                    vec![arg("id", non_null(named("SCALAR", "ID")))],
                ),
            ],
        ))
        .with_type(interface("Pet", vec![field("name", string())], &["Dog", "Cat"]))
        .with_type(object(
            "Dog",
            vec![field("name", string()), field("bark", string())],
        ))
        .with_type(object(
            "Cat",
            vec![field("name", string()), field("meow", string())],
        ))
        .with_type(object(
            "Owner",
            vec![
                field("name", string()),
                field_with_args("pets", pet_list(), vec![limit()]),
            ],
        ))
}
