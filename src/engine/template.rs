//! Command descriptors and template rendering.
//!
//! Some checks need one command per target (`show ip interface {intf}` for
//! each interface). A [`CommandTemplate`] renders once per parameter binding
//! and every rendered [`Command`] keeps the binding that produced it, so the
//! evaluation step can tell which interface a given output belongs to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Format a command's output is requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Parameter binding for one rendered command.
pub type Params = BTreeMap<String, String>;

/// A concrete command to run on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub text: String,
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Command {
    /// A fixed command with JSON output.
    pub fn json(text: impl Into<String>) -> Self {
        Command {
            text: text.into(),
            format: OutputFormat::Json,
            params: None,
        }
    }

    /// A fixed command with plain text output.
    pub fn text(text: impl Into<String>) -> Self {
        Command {
            text: text.into(),
            format: OutputFormat::Text,
            params: None,
        }
    }

    /// Value bound to `name` when this command was rendered.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.as_ref()?.get(name).map(String::as_str)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Template rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{template}' references '{{{name}}}' but no value was bound")]
    MissingParameter { template: String, name: String },

    #[error("template '{template}' has an unterminated placeholder")]
    Malformed { template: String },
}

/// A command with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub template: String,
    pub format: OutputFormat,
}

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        CommandTemplate {
            template: template.into(),
            format: OutputFormat::Json,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Render one command per binding, in binding order.
    pub fn render(&self, bindings: &[Params]) -> Result<Vec<Command>, TemplateError> {
        bindings
            .iter()
            .map(|params| {
                let text = substitute(&self.template, params)?;
                tracing::trace!(template = %self.template, command = %text, "rendered command");
                Ok(Command {
                    text,
                    format: self.format,
                    params: Some(params.clone()),
                })
            })
            .collect()
    }

    /// Render a single binding.
    pub fn render_one(&self, params: Params) -> Result<Command, TemplateError> {
        let text = substitute(&self.template, &params)?;
        Ok(Command {
            text,
            format: self.format,
            params: Some(params),
        })
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Result<Vec<String>, TemplateError> {
        let mut names: Vec<String> = Vec::new();
        for segment in segments(&self.template)? {
            if let Segment::Placeholder(name) = segment {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}

/// Build a binding from name/value pairs.
pub fn params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let malformed = || TemplateError::Malformed {
        template: template.to_string(),
    };

    let mut out = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
        if pos > 0 {
            out.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push(Segment::Brace('{'));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push(Segment::Brace('}'));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(malformed());
        } else {
            let close = tail.find('}').ok_or_else(malformed)?;
            let name = &tail[1..close];
            if name.is_empty() || name.contains('{') {
                return Err(malformed());
            }
            out.push(Segment::Placeholder(name));
            rest = &tail[close + 1..];
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    Ok(out)
}

fn substitute(template: &str, params: &Params) -> Result<String, TemplateError> {
    let mut text = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Literal(s) => text.push_str(s),
            Segment::Brace(c) => text.push(c),
            Segment::Placeholder(name) => {
                let value = params.get(name).ok_or_else(|| TemplateError::MissingParameter {
                    template: template.to_string(),
                    name: name.to_string(),
                })?;
                text.push_str(value);
            }
        }
    }
    Ok(text)
}
