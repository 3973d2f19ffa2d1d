use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gqlvis_introspect::{RawType, TypeKind};
use gqlvis_query::{format_document, QueryBuilder};
use gqlvis_schema::{simplify, ArgDef, ArgDefs, FieldKind, SimplifiedField, SimplifiedType};
use gqlvis_selection::{suggest, SelectionNode};
use gqlvis_test_utils::fixtures::{arg, field, field_with_args, list, named, non_null, object};
use indexmap::IndexMap;
use std::hint::black_box;

const WIDE_FIELDS: usize = 200;
const TREE_DEPTH: usize = 12;
const SCALARS_PER_LEVEL: usize = 8;

/// An object type with many scalar, list and nested fields, as a server returns it.
fn wide_raw_type() -> RawType {
    let fields = (0..WIDE_FIELDS)
        .map(|i| match i % 4 {
            0 => field(&format!("name{i}"), non_null(named("SCALAR", "String"))),
            1 => field(
                &format!("tags{i}"),
                non_null(list(non_null(named("SCALAR", "String")))),
            ),
            2 => field_with_args(
                &format!("children{i}"),
                list(named("OBJECT", "Node")),
                vec![
                    arg("first", named("SCALAR", "Int")),
                    arg("after", non_null(named("SCALAR", "ID"))),
                ],
            ),
            _ => field(&format!("owner{i}"), named("INTERFACE", "Actor")),
        })
        .collect();

    serde_json::from_value(object("Node", fields)).unwrap()
}

/// `Node { s0..s7, child(first: Int!, after: ID): Node }`
fn recursive_type() -> SimplifiedType {
    let mut fields = IndexMap::new();
    for i in 0..SCALARS_PER_LEVEL {
        fields.insert(
            format!("s{i}"),
            SimplifiedField {
                kind: FieldKind::Scalar,
                leaf_type_name: "String".to_string(),
                description: Some(format!("Scalar number {i}")),
                args: ArgDefs::new(),
            },
        );
    }
    let mut args = ArgDefs::new();
    args.insert("first".to_string(), ArgDef::new("Int!"));
    args.insert("after".to_string(), ArgDef::new("ID"));
    fields.insert(
        "child".to_string(),
        SimplifiedField {
            kind: FieldKind::Object,
            leaf_type_name: "Node".to_string(),
            description: None,
            args,
        },
    );

    SimplifiedType {
        name: "Node".to_string(),
        kind: TypeKind::Object,
        fields,
        possible_types: Vec::new(),
    }
}

/// A chain of `child` selections `depth` levels deep, every level selecting
/// all scalars and both arguments.
fn deep_tree(ty: &SimplifiedType, depth: usize) -> SelectionNode {
    let mut node = SelectionNode::for_field(&ty.fields["child"]).add_argument("after");
    for (name, _) in ty.scalar_fields() {
        node = node.add_scalar(name);
    }
    if depth == 0 {
        return node;
    }
    let below = deep_tree(ty, depth - 1);
    node.add_child("child", ty)
        .and_then(|node| node.update_child_at(0, below))
        .unwrap()
}

fn bench_simplify(c: &mut Criterion) {
    let raw = wide_raw_type();
    c.bench_function("simplify_wide_type", |b| {
        b.iter(|| {
            let simplified = simplify(black_box(Some(&raw)));
            black_box(simplified);
        });
    });
}

fn bench_build(c: &mut Criterion) {
    let ty = recursive_type();
    let tree = deep_tree(&ty, TREE_DEPTH);
    let builder = QueryBuilder::new();

    c.bench_function("build_deep_tree", |b| {
        b.iter(|| {
            let built = builder.build(black_box("node"), black_box(&tree)).unwrap();
            black_box(built);
        });
    });

    let compact = builder.build("node", &tree).unwrap().compact;
    c.bench_function("format_document", |b| {
        b.iter(|| black_box(format_document(black_box(&compact))));
    });
}

fn bench_edit(c: &mut Criterion) {
    let ty = recursive_type();
    let tree = deep_tree(&ty, TREE_DEPTH);
    let path = vec![0; TREE_DEPTH];

    c.bench_function("edit_leaf_of_deep_tree", |b| {
        b.iter_batched(
            || tree.clone(),
            |tree| {
                let edited = tree
                    .edit_at(black_box(&path), |node| Ok(node.remove_scalar("s0")))
                    .unwrap();
                black_box(edited);
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_suggest(c: &mut Criterion) {
    let simplified = simplify(Some(&wide_raw_type())).unwrap();
    let node = SelectionNode::new("Node", TypeKind::Object, ArgDefs::new());

    c.bench_function("suggest_scalars", |b| {
        b.iter(|| black_box(suggest::scalars(&node, &simplified, black_box("tags1"))));
    });
}

criterion_group!(benches, bench_simplify, bench_build, bench_edit, bench_suggest);
criterion_main!(benches);
