//! `gqlvis build`

use crate::{context, progress, BuildFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use gqlvis_introspect::Transport;
use gqlvis_loader::{Segment, Session};

/// Selections requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub root: Option<String>,
    pub select: Vec<String>,
    pub field: Vec<String>,
    pub arg: Vec<String>,
}

/// Splits `PATH.ARG` into the field path and the argument name. A bare
/// `ARG` belongs to the root field.
fn split_argument(raw: &str) -> Result<(Vec<Segment>, &str)> {
    let (path, arg) = raw.trim().rsplit_once('.').unwrap_or(("", raw.trim()));
    if arg.is_empty() || arg.starts_with('@') {
        anyhow::bail!("Invalid argument '{raw}': expected PATH.ARG");
    }
    Ok((Segment::parse_path(path)?, arg))
}

/// Applies `request` to an introspected session: nested fields first, then
/// field selections, then arguments.
pub async fn apply<T: Transport>(session: &Session<T>, request: &BuildRequest) -> Result<()> {
    if let Some(root) = &request.root {
        session.choose_root_field(root)?;
    }

    for raw in &request.field {
        let segments = Segment::parse_path(raw)?;
        session
            .ensure_path(&segments)
            .await
            .with_context(|| format!("Failed to add '{raw}'"))?;
    }
    for raw in &request.select {
        let segments = Segment::parse_path(raw)?;
        session
            .select_field(&segments)
            .await
            .with_context(|| format!("Failed to select '{raw}'"))?;
    }
    for raw in &request.arg {
        let (segments, arg) = split_argument(raw)?;
        session
            .select_argument(&segments, arg)
            .await
            .with_context(|| format!("Failed to select argument '{raw}'"))?;
    }
    Ok(())
}

pub async fn run(
    globals: &context::GlobalArgs,
    request: &BuildRequest,
    format: BuildFormat,
    output: OutputOptions,
) -> Result<()> {
    let session = context::session(globals)?;

    let spinner = progress::spinner("Loading schema...", output);
    let applied = async {
        session
            .introspect()
            .await
            .context("Failed to introspect the query root")?;
        apply(&session, request).await
    }
    .await;
    spinner.finish_and_clear();
    applied?;

    let built = session.build()?;
    if output.show_info {
        if let Some(root_field) = session.snapshot().root_field() {
            eprintln!("{} {}", "Root field:".dimmed(), root_field);
        }
    }

    match format {
        BuildFormat::Text => println!("{}", built.text()),
        BuildFormat::Json => {
            let document = serde_json::json!({
                "query": built.text(),
                "variables": built.variables,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}
