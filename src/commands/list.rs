//! Check listing command
//!
//! Prints every registered check with its category and description.

use crate::cli::args::{CategoryFilter, ListArgs, OutputFormat};
use crate::engine::orchestrator::CheckDescriptor;
use crate::{checks, CheckCategory, NetVerifyError, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ListedCheck {
    name: &'static str,
    category: CheckCategory,
    description: &'static str,
    skip_on_platforms: &'static [&'static str],
}

impl From<&CheckDescriptor> for ListedCheck {
    fn from(descriptor: &CheckDescriptor) -> Self {
        ListedCheck {
            name: descriptor.name,
            category: descriptor.category,
            description: descriptor.description,
            skip_on_platforms: descriptor.skip_on_platforms,
        }
    }
}

fn categories(filter: CategoryFilter) -> Vec<CheckCategory> {
    match filter {
        CategoryFilter::All => CheckCategory::ALL.to_vec(),
        CategoryFilter::Interfaces => vec![CheckCategory::Interfaces],
        CategoryFilter::Vlan => vec![CheckCategory::Vlan],
        CategoryFilter::Services => vec![CheckCategory::Services],
        CategoryFilter::Stun => vec![CheckCategory::Stun],
        CategoryFilter::Bfd => vec![CheckCategory::Bfd],
        CategoryFilter::Security => vec![CheckCategory::Security],
    }
}

/// Run the list command
pub fn run(args: &ListArgs) -> Result<String> {
    let selected = categories(args.category);

    match args.format {
        OutputFormat::Json => {
            let listed: Vec<ListedCheck> = selected
                .iter()
                .flat_map(|c| checks::by_category(*c))
                .map(ListedCheck::from)
                .collect();
            serde_json::to_string_pretty(&listed).map_err(|e| NetVerifyError::Serialize {
                context: "check list".to_string(),
                message: e.to_string(),
            })
        }
        _ => Ok(format_text(&selected)),
    }
}

fn format_text(selected: &[CheckCategory]) -> String {
    let mut output = String::from("Available checks:\n");
    let width = checks::all().iter().map(|d| d.name.len()).max().unwrap_or(0);

    for category in selected {
        let descriptors = checks::by_category(*category);
        if descriptors.is_empty() {
            continue;
        }
        output.push_str(&format!("\n{} CHECKS:\n", category.to_string().to_uppercase()));
        for descriptor in descriptors {
            output.push_str(&format!("  {:width$}  {}", descriptor.name, descriptor.description, width = width));
            if !descriptor.skip_on_platforms.is_empty() {
                output.push_str(&format!(" (skipped on {})", descriptor.skip_on_platforms.join(", ")));
            }
            output.push('\n');
        }
    }

    output
}
