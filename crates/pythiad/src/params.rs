//! Parameter extraction and call-snippet shaping.
//!
//! The engine hands back raw parameter declaration strings such as `"a"`,
//! `"b=5"`, `"*args"`, or `"self"`. This module shapes them into the forms
//! the editor consumes: `(name, default)` pairs, completion entries, and the
//! funcargs snippet.

use pythia_engine::CallSignature;
use pythia_protocol::CompletionItem;

use crate::config::ParamsMode;

/// One extracted parameter: its name and optional default expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    name: String,
    default: Option<String>,
}

impl ParameterSpec {
    /// Creates a spec from a name and optional default expression.
    #[must_use]
    pub fn new(name: impl Into<String>, default: Option<String>) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the default expression, when the parameter has one.
    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// Extracts `(name, default)` pairs from a signature's raw parameters.
///
/// Starred parameters (`*args`, `**kwargs`, the bare `*` separator) and
/// `self` are dropped; declaration order is preserved. A raw string splits
/// once at its first `=`, so defaults containing `=` stay intact.
#[must_use]
pub fn extract_parameters(signature: &CallSignature) -> Vec<ParameterSpec> {
    signature
        .params()
        .iter()
        .filter_map(|raw| parse_parameter(raw))
        .collect()
}

fn parse_parameter(raw: &str) -> Option<ParameterSpec> {
    let cleaned = raw.trim();
    if cleaned.contains('*') || cleaned == "self" {
        return None;
    }
    let spec = match cleaned.split_once('=') {
        Some((name, default)) => ParameterSpec::new(name.trim(), Some(default.trim().to_owned())),
        None => ParameterSpec::new(cleaned, None),
    };
    Some(spec)
}

/// Shapes extracted parameters into autocomplete entries.
///
/// Entries always bind placeholder 1 so the editor drops the cursor onto the
/// inserted value: a required parameter becomes `${1:name}` and a defaulted
/// one becomes `name=${1:default}`.
#[must_use]
pub fn parameter_completions(parameters: &[ParameterSpec]) -> Vec<CompletionItem> {
    parameters
        .iter()
        .map(|parameter| match parameter.default() {
            None => CompletionItem::new(
                parameter.name(),
                format!("${{1:{name}}}", name = parameter.name()),
            ),
            Some(default) => CompletionItem::new(
                format!("{name}\t{default}", name = parameter.name()),
                format!("{name}=${{1:{default}}}", name = parameter.name()),
            ),
        })
        .collect()
}

/// Builds the funcargs snippet for the given mode.
///
/// Placeholder numbers follow each parameter's 1-based position in the
/// extracted list, not a counter over emitted entries, so parameters skipped
/// in `required` mode leave gaps. Entries are joined with `", "`.
#[must_use]
pub fn call_snippet(parameters: &[ParameterSpec], mode: ParamsMode) -> String {
    if mode == ParamsMode::Disabled {
        return String::new();
    }

    let mut entries = Vec::new();
    for (position, parameter) in parameters.iter().enumerate() {
        let index = position + 1;
        match parameter.default() {
            None => entries.push(format!("${{{index}:{name}}}", name = parameter.name())),
            Some(default) if mode == ParamsMode::All => {
                entries.push(format!("{name}=${{{index}:{default}}}", name = parameter.name()));
            }
            Some(_) => {}
        }
    }
    entries.join(", ")
}
