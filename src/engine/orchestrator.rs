//! Check registration, preparation and execution.
//!
//! A check is a [`DeviceCheck`] implementation: a typed input record, the
//! commands it needs, and a pure evaluation body. The registry holds
//! type-erased [`CheckDescriptor`]s keyed by check name; the engine resolves
//! catalog entries against it and runs each prepared check over the output a
//! device [`OutputSource`] already holds.
//!
//! # Graceful Degradation
//!
//! - Unknown check name in the catalog: the whole run is rejected up front
//! - Invalid declared inputs: that check is reported with status `error`
//! - Missing command output: that check is reported with status `error`
//! - Evaluation error returned by a check body: appended as a failure
//! - Check panics: caught via `catch_unwind`, reported with status `error`
//!
//! Sibling checks and other devices always run, unless `fail_fast` is set.

use crate::catalog::{Catalog, CatalogEntry};
use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::engine::template::{Command, TemplateError};
use crate::engine::{ConfigError, EvalError};
use crate::platform::{Output, OutputSource};
use crate::{CheckCategory, CheckRecord, CheckResult, NetVerifyError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// A rendered command together with the output collected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub command: Command,
    pub output: Output,
}

impl CommandOutput {
    pub fn new(command: Command, output: Output) -> Self {
        CommandOutput { command, output }
    }

    /// Structured output, or an error if the device returned text.
    pub fn json(&self) -> Result<&Value, EvalError> {
        match &self.output {
            Output::Json(value) => Ok(value),
            Output::Text(_) => Err(EvalError::WrongFormat {
                command: self.command.text.clone(),
                expected: "json",
            }),
        }
    }

    /// Plain text output, or an error if the device returned JSON.
    pub fn text(&self) -> Result<&str, EvalError> {
        match &self.output {
            Output::Text(text) => Ok(text),
            Output::Json(_) => Err(EvalError::WrongFormat {
                command: self.command.text.clone(),
                expected: "text",
            }),
        }
    }

    /// Parameter the command was rendered with.
    pub fn param(&self, name: &str) -> Result<&str, EvalError> {
        self.command.param(name).ok_or_else(|| EvalError::MissingParameter {
            command: self.command.text.clone(),
            name: name.to_string(),
        })
    }
}

/// Constraints on declared inputs that the type system does not carry.
pub trait ValidateInput {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// One declarative verification unit.
pub trait DeviceCheck: 'static {
    /// Declared inputs, deserialized from the catalog.
    type Input: DeserializeOwned + ValidateInput + Send + Sync + 'static;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const CATEGORY: CheckCategory;
    /// Hardware models on which the check is reported as skipped.
    const SKIP_ON_PLATFORMS: &'static [&'static str] = &[];

    /// Commands whose output the check evaluates.
    fn commands(input: &Self::Input) -> Result<Vec<Command>, TemplateError>;

    /// Evaluate collected output, appending failures to `result`.
    fn test(input: &Self::Input, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError>;
}

type Evaluator = Box<dyn Fn(&[CommandOutput]) -> CheckResult + Send + Sync>;

/// A check whose inputs are validated and whose commands are rendered.
pub struct PreparedCheck {
    name: &'static str,
    commands: Vec<Command>,
    evaluate: Evaluator,
}

impl PreparedCheck {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Commands the transport must run before evaluation.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Evaluate outputs, one per command, in command order.
    pub fn evaluate(&self, outputs: &[CommandOutput]) -> CheckResult {
        (self.evaluate)(outputs)
    }
}

impl fmt::Debug for PreparedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedCheck")
            .field("name", &self.name)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

/// Registry entry for a check.
#[derive(Debug, Clone, Copy)]
pub struct CheckDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CheckCategory,
    pub skip_on_platforms: &'static [&'static str],
    prepare: fn(&Value) -> Result<PreparedCheck, ConfigError>,
}

impl CheckDescriptor {
    /// Descriptor for a check implementation.
    pub fn of<C: DeviceCheck>() -> Self {
        CheckDescriptor {
            name: C::NAME,
            description: C::DESCRIPTION,
            category: C::CATEGORY,
            skip_on_platforms: C::SKIP_ON_PLATFORMS,
            prepare: prepare_check::<C>,
        }
    }

    /// Deserialize and validate inputs, then render commands.
    pub fn prepare(&self, inputs: &Value) -> Result<PreparedCheck, ConfigError> {
        (self.prepare)(inputs)
    }

    pub fn skips_platform(&self, hw_model: &str) -> bool {
        self.skip_on_platforms.contains(&hw_model)
    }
}

fn prepare_check<C: DeviceCheck>(inputs: &Value) -> Result<PreparedCheck, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        check: C::NAME.to_string(),
        reason,
    };

    // A check with no inputs may be declared with a null value.
    let raw = match inputs {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };

    let input: C::Input = serde_json::from_value(raw).map_err(|e| invalid(e.to_string()))?;
    input.validate().map_err(invalid)?;

    let commands = C::commands(&input).map_err(|source| ConfigError::Template {
        check: C::NAME.to_string(),
        source,
    })?;
    tracing::debug!(check = C::NAME, commands = commands.len(), "prepared check");

    Ok(PreparedCheck {
        name: C::NAME,
        commands,
        evaluate: Box::new(move |outputs| {
            let mut result = CheckResult::new();
            if let Err(e) = C::test(&input, outputs, &mut result) {
                result.mark_failure(e.to_string());
            }
            result
        }),
    })
}

/// Engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Categories to run (None = all)
    pub categories: Option<Vec<CheckCategory>>,
    /// Check names to skip
    pub skip_checks: Vec<String>,
    /// Check names to run exclusively
    pub only_checks: Vec<String>,
    /// Stop after the first failing check
    pub fail_fast: bool,
}

impl EngineConfig {
    fn selects(&self, descriptor: &CheckDescriptor) -> bool {
        if !self.only_checks.is_empty() && !self.only_checks.iter().any(|n| n == descriptor.name) {
            return false;
        }
        if self.skip_checks.iter().any(|n| n == descriptor.name) {
            return false;
        }
        match &self.categories {
            Some(categories) => categories.contains(&descriptor.category),
            None => true,
        }
    }
}

/// A catalog entry resolved against the registry.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEntry<'c> {
    pub descriptor: CheckDescriptor,
    pub entry: &'c CatalogEntry,
}

/// Commands rendered for one catalog entry.
#[derive(Debug)]
pub struct RenderedCheck {
    pub name: &'static str,
    pub category: CheckCategory,
    pub commands: Result<Vec<Command>, ConfigError>,
}

/// Check engine
pub struct CheckEngine {
    config: EngineConfig,
    registry: Vec<CheckDescriptor>,
}

impl CheckEngine {
    /// Create an engine over every registered check
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, crate::checks::all().to_vec())
    }

    /// Create an engine over a custom set of checks
    pub fn with_registry(config: EngineConfig, registry: Vec<CheckDescriptor>) -> Self {
        CheckEngine { config, registry }
    }

    pub fn find(&self, name: &str) -> Option<&CheckDescriptor> {
        self.registry.iter().find(|d| d.name == name)
    }

    pub fn registry(&self) -> &[CheckDescriptor] {
        &self.registry
    }

    /// Resolve every catalog entry, then apply the configured filters.
    ///
    /// An unknown check name fails the whole resolution, filtered out or not.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> Result<Vec<ResolvedEntry<'c>>, NetVerifyError> {
        let mut resolved = Vec::with_capacity(catalog.len());

        for entry in catalog.entries() {
            let descriptor = *self.find(&entry.name).ok_or_else(|| NetVerifyError::UnknownCheck {
                name: entry.name.clone(),
            })?;

            if !entry.category.eq_ignore_ascii_case(&descriptor.category.to_string()) {
                tracing::warn!(
                    check = descriptor.name,
                    declared = %entry.category,
                    actual = %descriptor.category,
                    "check listed under a different category"
                );
            }

            if self.config.selects(&descriptor) {
                resolved.push(ResolvedEntry { descriptor, entry });
            }
        }

        Ok(resolved)
    }

    /// Run the catalog against each device in turn.
    pub fn run(&self, catalog: &Catalog, devices: &[&dyn OutputSource]) -> Result<ValidationReport, NetVerifyError> {
        let start = Instant::now();
        let entries = self.resolve(catalog)?;
        let mut aggregator = ResultAggregator::new();

        'devices: for source in devices {
            let device = source.device();
            tracing::info!(device = %device.name, checks = entries.len(), "running checks");

            for resolved in &entries {
                let check_start = Instant::now();
                let result = self.run_entry(resolved, *source);
                let failed = result.is_failure();

                aggregator.add_result(CheckRecord {
                    device: device.name.clone(),
                    name: resolved.descriptor.name.to_string(),
                    category: resolved.descriptor.category,
                    description: resolved.descriptor.description.to_string(),
                    result,
                    duration_ms: check_start.elapsed().as_millis() as u64,
                });

                if self.config.fail_fast && failed {
                    tracing::info!(check = resolved.descriptor.name, "stopping after first failure");
                    break 'devices;
                }
            }
        }

        Ok(aggregator.into_report(start.elapsed().as_millis() as u64))
    }

    /// Run one resolved entry against one device.
    pub fn run_entry(&self, resolved: &ResolvedEntry<'_>, source: &dyn OutputSource) -> CheckResult {
        let descriptor = &resolved.descriptor;

        if let Some(model) = source.device().hw_model.as_deref() {
            if descriptor.skips_platform(model) {
                return CheckResult::skipped(format!("{} test is not supported on {}.", descriptor.name, model));
            }
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            execute(descriptor, &resolved.entry.inputs, source)
        }));

        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                let mut result = CheckResult::new();
                result.mark_error("Check panicked during evaluation");
                result
            }
        };

        tracing::debug!(
            device = %source.device().name,
            check = descriptor.name,
            status = %result.status,
            "check finished"
        );
        result
    }

    /// Render the commands every selected catalog entry needs.
    pub fn render(&self, catalog: &Catalog) -> Result<Vec<RenderedCheck>, NetVerifyError> {
        Ok(self
            .resolve(catalog)?
            .into_iter()
            .map(|resolved| RenderedCheck {
                name: resolved.descriptor.name,
                category: resolved.descriptor.category,
                commands: resolved
                    .descriptor
                    .prepare(&resolved.entry.inputs)
                    .map(|prepared| prepared.commands().to_vec()),
            })
            .collect())
    }

    /// Validate declared inputs without evaluating anything.
    pub fn validate(&self, catalog: &Catalog) -> Result<Vec<(&'static str, Result<(), ConfigError>)>, NetVerifyError> {
        Ok(self
            .resolve(catalog)?
            .into_iter()
            .map(|resolved| {
                let outcome = resolved.descriptor.prepare(&resolved.entry.inputs).map(|_| ());
                (resolved.descriptor.name, outcome)
            })
            .collect())
    }
}

fn execute(descriptor: &CheckDescriptor, inputs: &Value, source: &dyn OutputSource) -> CheckResult {
    let prepared = match descriptor.prepare(inputs) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::warn!(check = descriptor.name, error = %e, "rejected inputs");
            let mut result = CheckResult::new();
            result.mark_error(e.to_string());
            return result;
        }
    };

    let mut outputs = Vec::with_capacity(prepared.commands().len());
    for command in prepared.commands() {
        match source.output(command) {
            Some(output) => outputs.push(CommandOutput::new(command.clone(), output)),
            None => {
                tracing::warn!(check = descriptor.name, command = %command, "no output collected");
                let mut result = CheckResult::new();
                result.mark_error(format!("No output collected for command '{}'", command));
                return result;
            }
        }
    }

    prepared.evaluate(&outputs)
}
