//! Command rendering
//!
//! Renders the commands each selected catalog entry needs, so an external
//! collector knows what to run on every device. The JSON form also carries
//! the de-duplicated command list in first-use order.
//!
//! # Graceful Degradation
//!
//! - Entry with invalid inputs: reported in place, other entries still rendered
//! - Unknown check name: the whole command fails before anything is rendered

use crate::catalog::Catalog;
use crate::cli::args::{OutputFormat, RenderArgs};
use crate::engine::orchestrator::RenderedCheck;
use crate::engine::template::Command;
use crate::{engine, CheckCategory, NetVerifyConfig, NetVerifyError, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RenderedEntry<'a> {
    name: &'static str,
    category: CheckCategory,
    commands: &'a [Command],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RenderedCatalog<'a> {
    checks: Vec<RenderedEntry<'a>>,
    commands: Vec<&'a Command>,
}

/// Run the commands command
pub fn run(args: &RenderArgs) -> Result<String> {
    let catalog = Catalog::load(&args.catalog)?;
    let config = NetVerifyConfig::from_args(&args.selection);
    let rendered = engine(&config).render(&catalog)?;

    match args.format {
        OutputFormat::Json => format_json(&rendered),
        _ => Ok(format_text(&rendered)),
    }
}

/// Unique commands across all entries, in first-use order.
fn unique_commands(rendered: &[RenderedCheck]) -> Vec<&Command> {
    let mut unique: Vec<&Command> = Vec::new();
    for command in rendered.iter().filter_map(|r| r.commands.as_ref().ok()).flatten() {
        if !unique.contains(&command) {
            unique.push(command);
        }
    }
    unique
}

fn format_json(rendered: &[RenderedCheck]) -> Result<String> {
    let document = RenderedCatalog {
        checks: rendered
            .iter()
            .map(|r| RenderedEntry {
                name: r.name,
                category: r.category,
                commands: r.commands.as_deref().unwrap_or(&[]),
                error: r.commands.as_ref().err().map(ToString::to_string),
            })
            .collect(),
        commands: unique_commands(rendered),
    };

    serde_json::to_string_pretty(&document).map_err(|e| NetVerifyError::Serialize {
        context: "rendered commands".to_string(),
        message: e.to_string(),
    })
}

fn format_text(rendered: &[RenderedCheck]) -> String {
    let mut output = String::new();

    for check in rendered {
        output.push_str(&format!("{} ({})\n", check.name, check.category));
        match &check.commands {
            Ok(commands) => {
                for command in commands {
                    output.push_str(&format!("  {} [{}]\n", command, command.format));
                }
            }
            Err(e) => output.push_str(&format!("  error: {}\n", e)),
        }
    }

    let unique = unique_commands(rendered);
    output.push_str(&format!("\n{} unique command(s) for {} check(s)", unique.len(), rendered.len()));
    output
}
