//! Catalog validation command
//!
//! Resolves every catalog entry and checks its declared inputs, without
//! reading any device output.

use crate::catalog::Catalog;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::engine::ConfigError;
use crate::{engine, NetVerifyConfig, NetVerifyError, Result};
use serde::Serialize;

/// Outcome of validating a catalog.
#[derive(Debug)]
pub struct CatalogValidation {
    /// Formatted report
    pub output: String,
    /// Entries whose inputs were rejected
    pub invalid: usize,
}

#[derive(Debug, Serialize)]
struct EntryOutcome {
    name: &'static str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Run the validate command
pub fn run(args: &ValidateArgs) -> Result<CatalogValidation> {
    let catalog = Catalog::load(&args.catalog)?;
    let outcomes = engine(&NetVerifyConfig::default()).validate(&catalog)?;
    format_outcomes(&outcomes, args.format)
}

fn format_outcomes(outcomes: &[(&'static str, std::result::Result<(), ConfigError>)], format: OutputFormat) -> Result<CatalogValidation> {
    let invalid = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();

    let output = match format {
        OutputFormat::Json => {
            let entries: Vec<EntryOutcome> = outcomes
                .iter()
                .map(|(name, outcome)| EntryOutcome {
                    name: *name,
                    valid: outcome.is_ok(),
                    reason: outcome.as_ref().err().map(ToString::to_string),
                })
                .collect();
            serde_json::to_string_pretty(&entries).map_err(|e| NetVerifyError::Serialize {
                context: "validation results".to_string(),
                message: e.to_string(),
            })?
        }
        _ => {
            let mut output = String::new();
            for (name, outcome) in outcomes {
                match outcome {
                    Ok(()) => output.push_str(&format!("[OK]      {}\n", name)),
                    Err(e) => output.push_str(&format!("[INVALID] {}: {}\n", name, e)),
                }
            }
            output.push_str(&format!("\n{} entries, {} invalid", outcomes.len(), invalid));
            output
        }
    };

    Ok(CatalogValidation { output, invalid })
}
