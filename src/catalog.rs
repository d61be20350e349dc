//! Test catalog loading.
//!
//! A catalog is a YAML mapping from category to a list of single-key
//! records, each naming a check and carrying its declared inputs:
//!
//! ```yaml
//! interfaces:
//!   - VerifyInterfaceUtilization:
//!   - VerifyL3MTU:
//!       mtu: 1500
//!       specific_mtu:
//!         - Ethernet5: 9000
//! vlan:
//!   - VerifyVlanInternalPolicy:
//!       policy: ascending
//!       start_vlan_id: 1006
//!       end_vlan_id: 4094
//! ```
//!
//! Entries keep file order. Inputs stay untyped here and are checked when the
//! engine prepares each check.

use crate::{NetVerifyError, Result};
use serde_json::Value;
use std::path::Path;

/// One check declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Category key the entry was listed under
    pub category: String,
    /// Registered check name
    pub name: String,
    /// Declared inputs (`null` when none were given)
    pub inputs: Value,
}

/// Ordered list of check declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Catalog { entries }
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| NetVerifyError::Io {
            context: format!("reading catalog {}", path.display()),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading catalog");
        Self::from_yaml(&text)
    }

    /// Parse a catalog document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Catalog::default());
        }
        let document: Value = serde_yaml::from_str(text).map_err(|e| catalog_error(e.to_string()))?;

        let categories = match document {
            Value::Null => return Ok(Catalog::default()),
            Value::Object(map) => map,
            _ => return Err(catalog_error("top level must be a mapping of category to checks")),
        };

        let mut entries = Vec::new();
        for (category, checks) in categories {
            let checks = match checks {
                Value::Null => continue,
                Value::Array(checks) => checks,
                _ => {
                    return Err(catalog_error(format!(
                        "category '{}' must hold a list of checks",
                        category
                    )))
                }
            };

            for check in checks {
                entries.push(parse_entry(&category, check)?);
            }
        }

        Ok(Catalog { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(category: &str, check: Value) -> Result<CatalogEntry> {
    let record = match check {
        // A bare name is a check with no inputs.
        Value::String(name) => {
            return Ok(CatalogEntry {
                category: category.to_string(),
                name,
                inputs: Value::Null,
            })
        }
        Value::Object(record) => record,
        other => {
            return Err(catalog_error(format!(
                "entry under '{}' must be a check name or a single-key mapping, found {}",
                category, other
            )))
        }
    };

    if record.len() != 1 {
        return Err(catalog_error(format!(
            "entry under '{}' must name exactly one check, found {}",
            category,
            record.len()
        )));
    }

    let (name, inputs) = record
        .into_iter()
        .next()
        .ok_or_else(|| catalog_error(format!("empty entry under '{}'", category)))?;

    Ok(CatalogEntry {
        category: category.to_string(),
        name,
        inputs,
    })
}

fn catalog_error(message: impl Into<String>) -> NetVerifyError {
    NetVerifyError::Catalog {
        message: message.into(),
    }
}
