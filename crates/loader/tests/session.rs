use gqlvis_cache::{Cache, MemoryCache};
use gqlvis_introspect::Endpoint;
use gqlvis_loader::{LoaderError, Segment, Session, TypeLoader};
use gqlvis_selection::SelectionError;
use gqlvis_test_utils::{fixtures, FakeTransport, Request};
use std::sync::Arc;

fn session(schema: fixtures::Schema) -> (Arc<FakeTransport>, Session<Arc<FakeTransport>>) {
    let transport = Arc::new(FakeTransport::new(schema));
    let cache: MemoryCache = MemoryCache::new();
    let cache: Arc<dyn Cache> = Arc::new(cache);
    let endpoint = Endpoint::parse("https://api.example.com/graphql").unwrap();
    let loader = TypeLoader::new(endpoint, transport.clone(), cache);
    (transport, Session::new(loader))
}

fn path(raw: &str) -> Vec<Segment> {
    Segment::parse_path(raw).unwrap()
}

#[tokio::test]
async fn test_introspect_selects_first_composite_root_field() {
    let (_, session) = session(fixtures::countries());
    let root = session.introspect().await.unwrap();
    assert_eq!(root.name, "Query");

    assert_eq!(
        session.root_fields().unwrap(),
        vec!["countries", "country", "continents"]
    );
    let state = session.snapshot();
    assert_eq!(state.root_field(), Some("countries"));
    assert_eq!(state.tree().unwrap().type_name(), "Country");
}

#[tokio::test]
async fn test_interface_root_field_can_be_the_default() {
    let (_, session) = session(fixtures::pets());
    session.introspect().await.unwrap();

    let state = session.snapshot();
    assert_eq!(state.root_field(), Some("pets"));
    let tree = state.tree().unwrap();
    assert_eq!(tree.type_name(), "Pet");
    assert!(tree.type_kind().is_abstract());
}

#[tokio::test]
async fn test_build_country_query() {
    let (_, session) = session(fixtures::countries());
    session.introspect().await.unwrap();
    session.choose_root_field("country").unwrap();

    session.select_field(&path("name")).await.unwrap();
    session.select_field(&path("capital")).await.unwrap();
    session.select_field(&path("languages.name")).await.unwrap();

    insta::assert_snapshot!(session.build().unwrap().text(), @r"
    query($code: ID!) {
      country(code: $code) {
        name
        capital
        languages {
          name
        }
      }
    }
    ");
}

#[tokio::test]
async fn test_types_load_once() {
    let (transport, session) = session(fixtures::countries());
    session.introspect().await.unwrap();
    session.choose_root_field("country").unwrap();

    session.select_field(&path("continent.name")).await.unwrap();
    session.select_field(&path("continent.code")).await.unwrap();

    assert_eq!(
        transport.requests_since(0),
        vec![
            Request::Root,
            Request::Type("Query".to_string()),
            Request::Type("Country".to_string()),
            Request::Type("Continent".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_interface_fragments_and_nested_arguments() {
    let (_, session) = session(fixtures::pets());
    session.introspect().await.unwrap();
    session.choose_root_field("owner").unwrap();

    session.select_field(&path("name")).await.unwrap();
    session.select_argument(&path("pets"), "limit").await.unwrap();
    session.select_field(&path("pets.name")).await.unwrap();
    session.select_field(&path("pets.@Cat.meow")).await.unwrap();

    let built = session.build().unwrap();
    let names: Vec<&str> = built.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["id", "pets_limit"]);

    insta::assert_snapshot!(built.text(), @r"
    query($id: ID!, $pets_limit: Int) {
      owner(id: $id) {
        name
        pets(limit: $pets_limit) {
          name
          ... on Cat {
            meow
          }
        }
      }
    }
    ");
}

#[tokio::test]
async fn test_unknown_names_are_reported() {
    let (_, session) = session(fixtures::pets());
    session.introspect().await.unwrap();

    let err = session.choose_root_field("pet").unwrap_err();
    assert_eq!(
        err,
        LoaderError::UnknownRootField {
            type_name: "Query".to_string(),
            field: "pet".to_string(),
            suggestion: Some("pets".to_string()),
        }
    );

    let err = session.select_field(&path("nmae")).await.unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Selection(SelectionError::UnknownField { .. })
    ));

    let err = session.select_field(&path("@Fish.name")).await.unwrap_err();
    assert!(matches!(err, LoaderError::InvalidPath { .. }));

    let err = session.select_argument(&path(""), "first").await.unwrap_err();
    assert!(matches!(err, LoaderError::InvalidPath { .. }));
}

#[tokio::test]
async fn test_operations_before_introspection() {
    let (_, session) = session(fixtures::countries());
    assert_eq!(session.root_fields(), Err(LoaderError::NotIntrospected));
    assert_eq!(session.build(), Err(LoaderError::NoRootField));
}
