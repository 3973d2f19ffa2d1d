//! `gqlvis type NAME`

use crate::{context, progress, OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use gqlvis_loader::LoaderError;
use gqlvis_schema::{SimplifiedField, SimplifiedType};
use gqlvis_selection::suggest::{self, Suggestion};

pub async fn run(
    globals: &context::GlobalArgs,
    name: &str,
    format: OutputFormat,
    search: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let session = context::session(globals)?;

    let spinner = progress::spinner(&format!("Loading type {name}..."), output);
    let loaded = session.loader().load_type(name).await;
    spinner.finish_and_clear();

    let ty = loaded
        .with_context(|| format!("Failed to introspect type '{name}'"))?
        .ok_or_else(|| LoaderError::TypeUnavailable(name.to_string()))?;
    let ty = match search {
        Some(query) => filter_fields(&ty, query),
        None => ty,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ty)?),
        OutputFormat::Human => print_human(&ty),
    }
    Ok(())
}

/// Keeps the fields the typeahead would match for `query`, without its result limit.
fn filter_fields(ty: &SimplifiedType, query: &str) -> SimplifiedType {
    let mut filtered = ty.clone();
    filtered.fields.retain(|name, field| {
        let candidate = Suggestion {
            name,
            description: field.description.as_deref(),
        };
        suggest::is_match(&candidate, query)
    });
    filtered
}

fn print_human(ty: &SimplifiedType) {
    println!("{} {}", ty.name.bold(), format!("({})", ty.kind).dimmed());

    let scalars: Vec<_> = ty.scalar_fields().collect();
    if !scalars.is_empty() {
        println!("\n{}", "Scalars".cyan().bold());
        for (name, field) in scalars {
            print_field(name, field);
        }
    }

    let composites: Vec<_> = ty.composite_fields().collect();
    if !composites.is_empty() {
        println!("\n{}", "Fields".cyan().bold());
        for (name, field) in composites {
            print_field(name, field);
        }
    }

    if ty.has_possible_types() {
        println!("\n{}", "Possible types".cyan().bold());
        for possible in &ty.possible_types {
            println!("  ... on {}", possible.name.green());
        }
    }
}

fn print_field(name: &str, field: &SimplifiedField) {
    let args: Vec<String> = field
        .args
        .iter()
        .map(|(arg, def)| format!("{arg}: {}", def.type_signature))
        .collect();
    let args = if args.is_empty() {
        String::new()
    } else {
        format!("({})", args.join(", "))
    };
    let type_name = if field.kind.is_list() {
        format!("[{}]", field.leaf_type_name)
    } else {
        field.leaf_type_name.clone()
    };

    println!("  {}{args}: {type_name}", name.green());
    if let Some(description) = &field.description {
        println!("      {}", description.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlvis_introspect::TypeKind;
    use gqlvis_schema::{ArgDefs, FieldKind};

    fn country(entries: &[(&str, Option<&str>)]) -> SimplifiedType {
        let fields = entries
            .iter()
            .map(|(name, description)| {
                let field = SimplifiedField {
                    kind: FieldKind::Scalar,
                    leaf_type_name: "String".to_string(),
                    description: description.map(str::to_string),
                    args: ArgDefs::new(),
                };
                ((*name).to_string(), field)
            })
            .collect();
        SimplifiedType {
            name: "Country".to_string(),
            kind: TypeKind::Object,
            fields,
            possible_types: Vec::new(),
        }
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let ty = country(&[
            ("name", None),
            ("capital", Some("Seat of government")),
            ("currency", None),
        ]);
        let filtered = filter_fields(&ty, "GOV");
        assert_eq!(filtered.fields.keys().collect::<Vec<_>>(), vec!["capital"]);

        let filtered = filter_fields(&ty, " c ");
        assert_eq!(
            filtered.fields.keys().collect::<Vec<_>>(),
            vec!["capital", "currency"]
        );
    }

    #[test]
    fn test_search_is_not_truncated() {
        let names: Vec<String> = (0..25).map(|i| format!("field{i}")).collect();
        let entries: Vec<(&str, Option<&str>)> =
            names.iter().map(|name| (name.as_str(), None)).collect();
        assert_eq!(filter_fields(&country(&entries), "field").fields.len(), 25);
    }
}
