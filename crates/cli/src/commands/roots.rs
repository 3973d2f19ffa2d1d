//! `gqlvis roots`

use crate::{context, progress, OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use gqlvis_loader::LoaderError;
use gqlvis_schema::SimplifiedField;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RootField<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_name: &'a str,
    list: bool,
    args: Vec<Argument<'a>>,
    default: bool,
}

#[derive(Debug, Serialize)]
struct Argument<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_signature: &'a str,
}

impl<'a> RootField<'a> {
    fn new(name: &'a str, field: &'a SimplifiedField, default: bool) -> Self {
        Self {
            name,
            type_name: &field.leaf_type_name,
            list: field.kind.is_list(),
            args: field
                .args
                .iter()
                .map(|(name, arg)| Argument {
                    name,
                    type_signature: &arg.type_signature,
                })
                .collect(),
            default,
        }
    }

    fn signature(&self) -> String {
        let args = if self.args.is_empty() {
            String::new()
        } else {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|arg| format!("{}: {}", arg.name, arg.type_signature))
                .collect();
            format!("({})", args.join(", "))
        };
        let type_name = if self.list {
            format!("[{}]", self.type_name)
        } else {
            self.type_name.to_string()
        };
        format!("{}{args}: {type_name}", self.name.green())
    }
}

pub async fn run(
    globals: &context::GlobalArgs,
    format: OutputFormat,
    output: OutputOptions,
) -> Result<()> {
    let session = context::session(globals)?;

    let spinner = progress::spinner("Introspecting root type...", output);
    let root = session.introspect().await;
    spinner.finish_and_clear();
    let root = root.context("Failed to introspect the query root")?;

    let root_type = session
        .loader()
        .get_type(&root.name)
        .ok_or_else(|| LoaderError::TypeUnavailable(root.name.clone()))?;
    let fields: Vec<RootField<'_>> = root_type
        .composite_fields()
        .enumerate()
        .map(|(i, (name, field))| RootField::new(name, field, i == 0))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        OutputFormat::Human => {
            println!("{} {}", root.name.bold(), format!("({})", root.kind).dimmed());
            for field in &fields {
                let marker = if field.default {
                    " (default)".dimmed().to_string()
                } else {
                    String::new()
                };
                println!("  {}{marker}", field.signature());
            }
            if output.show_info && fields.is_empty() {
                eprintln!("{}", "No selectable root fields".yellow());
            }
        }
    }
    Ok(())
}
