//! Step-level metadata and its validation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{MetadataError, StepConfigError};
use crate::StepResult;

use super::descriptor::ParameterDescriptor;

/// Immutable description of one step command and its parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct StepMetadata {
    name: String,
    aliases: Vec<String>,
    description: String,
    parameters: Vec<ParameterDescriptor>,
    order: Vec<usize>,
}

impl StepMetadata {
    /// Starts a builder for a step called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> StepMetadataBuilder {
        StepMetadataBuilder::new(name)
    }

    /// Validates a declaration and freezes it.
    ///
    /// # Errors
    ///
    /// Returns [`StepConfigError::Metadata`] when two parameters share a
    /// name, a vault template is malformed, a default does not match its
    /// parameter's type, or references between parameters form a cycle.
    pub fn new(
        name: impl Into<String>,
        aliases: Vec<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> StepResult<Self> {
        let step = name.into();
        let order = validate(&parameters)
            .map_err(|source| Arc::new(StepConfigError::metadata(step.clone(), source)))?;
        Ok(Self {
            name: step,
            aliases,
            description: description.into(),
            parameters,
            order,
        })
    }

    /// Step name, used as the subcommand and the `steps.<name>` section.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternate subcommand names.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// One-line description of the step.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Looks up a declared parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// Parameters in resolution order.
    ///
    /// Declaration order, except that every parameter referenced by another
    /// parameter's placeholders or credential id is moved ahead of it.
    pub fn resolution_order(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.order
            .iter()
            .filter_map(|index| self.parameters.get(*index))
    }
}

/// Incremental builder for [`StepMetadata`].
#[derive(Clone, Debug)]
#[must_use]
pub struct StepMetadataBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    parameters: Vec<ParameterDescriptor>,
}

impl StepMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Adds an alternate subcommand name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the step description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Appends a parameter.
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several parameters.
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Validates and builds the metadata.
    ///
    /// # Errors
    ///
    /// See [`StepMetadata::new`].
    pub fn build(self) -> StepResult<StepMetadata> {
        StepMetadata::new(self.name, self.aliases, self.description, self.parameters)
    }
}

fn validate(parameters: &[ParameterDescriptor]) -> Result<Vec<usize>, MetadataError> {
    let mut seen = HashSet::new();
    for parameter in parameters {
        if !seen.insert(parameter.name()) {
            return Err(MetadataError::DuplicateParameter(parameter.name().to_owned()));
        }
        check_templates(parameter)?;
        check_default(parameter)?;
    }
    resolution_order(parameters)
}

fn check_templates(parameter: &ParameterDescriptor) -> Result<(), MetadataError> {
    for template in parameter.references().iter().flat_map(|r| r.templates()) {
        template
            .validate()
            .map_err(|source| MetadataError::InvalidTemplate {
                parameter: parameter.name().to_owned(),
                template: template.as_str().to_owned(),
                source,
            })?;
    }
    Ok(())
}

fn check_default(parameter: &ParameterDescriptor) -> Result<(), MetadataError> {
    match parameter.declared_default() {
        Some(default) if default.param_type() != parameter.param_type() => {
            Err(MetadataError::DefaultTypeMismatch {
                parameter: parameter.name().to_owned(),
                expected: parameter.param_type(),
                found: default.param_type(),
            })
        }
        _ => Ok(()),
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first ordering over declared dependencies.
///
/// Names that are not declared parameters are ambient values looked up at
/// resolution time and add no edge.
fn resolution_order(parameters: &[ParameterDescriptor]) -> Result<Vec<usize>, MetadataError> {
    let index: HashMap<&str, usize> = parameters
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name(), i))
        .collect();
    let mut marks: HashMap<usize, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(parameters.len());
    let mut stack = Vec::new();
    for start in 0..parameters.len() {
        visit(start, parameters, &index, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}

fn visit(
    node: usize,
    parameters: &[ParameterDescriptor],
    index: &HashMap<&str, usize>,
    marks: &mut HashMap<usize, Mark>,
    stack: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> Result<(), MetadataError> {
    match marks.get(&node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(cycle_error(node, parameters, stack)),
        None => {}
    }
    let Some(parameter) = parameters.get(node) else {
        return Ok(());
    };
    marks.insert(node, Mark::Visiting);
    stack.push(node);
    for dependency in parameter.dependencies() {
        if let Some(&next) = index.get(dependency) {
            visit(next, parameters, index, marks, stack, order)?;
        }
    }
    stack.pop();
    marks.insert(node, Mark::Done);
    order.push(node);
    Ok(())
}

fn cycle_error(node: usize, parameters: &[ParameterDescriptor], stack: &[usize]) -> MetadataError {
    let start = stack.iter().position(|&i| i == node).unwrap_or_default();
    let mut names: Vec<&str> = stack
        .iter()
        .skip(start)
        .filter_map(|&i| parameters.get(i).map(ParameterDescriptor::name))
        .collect();
    if let Some(parameter) = parameters.get(node) {
        names.push(parameter.name());
    }
    MetadataError::PlaceholderCycle {
        cycle: names.join(" -> "),
    }
}
