//! Options controlling how fixes are rendered.
//!
//! Options are read from a small JSON document:
//!
//! ```json
//! {
//!   "emitFixIts": true,
//!   "warningsAsErrors": "false",
//!   "maxGenericArgumentNotes": 4
//! }
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tyfix_common::limits;

/// Upper bound accepted for the note limits, to catch typos like `4000`.
const MAX_NOTE_LIMIT: usize = 64;

/// Accepts `true`, `"true"`, `"yes"`, `1`-style strings for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Options as written in the JSON document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FixConfig {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub emit_fix_its: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub warnings_as_errors: Option<bool>,
    #[serde(default)]
    pub max_generic_argument_notes: Option<usize>,
    #[serde(default)]
    pub max_missing_arguments_listed: Option<usize>,
}

/// Resolved rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOptions {
    /// Attach suggested edits to emitted diagnostics.
    pub emit_fix_its: bool,
    /// Render warning-level fixes as errors.
    pub warnings_as_errors: bool,
    pub max_generic_argument_notes: usize,
    pub max_missing_arguments_listed: usize,
}

impl Default for FixOptions {
    fn default() -> Self {
        FixOptions {
            emit_fix_its: true,
            warnings_as_errors: false,
            max_generic_argument_notes: limits::MAX_GENERIC_ARGUMENT_NOTES,
            max_missing_arguments_listed: limits::MAX_MISSING_ARGUMENTS_LISTED,
        }
    }
}

impl FixOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(source: &str) -> Result<FixOptions> {
        let config: FixConfig =
            serde_json::from_str(source).context("failed to parse fix options JSON")?;
        resolve_fix_options(&config)
    }

    /// Read and parse options from a file.
    pub fn load(path: &Path) -> Result<FixOptions> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fix options from {}", path.display()))?;
        Self::from_json_str(&source)
            .with_context(|| format!("invalid fix options in {}", path.display()))
    }
}

/// Apply defaults and validate limits.
pub fn resolve_fix_options(config: &FixConfig) -> Result<FixOptions> {
    let mut resolved = FixOptions::default();

    if let Some(emit_fix_its) = config.emit_fix_its {
        resolved.emit_fix_its = emit_fix_its;
    }

    if let Some(warnings_as_errors) = config.warnings_as_errors {
        resolved.warnings_as_errors = warnings_as_errors;
    }

    if let Some(notes) = config.max_generic_argument_notes {
        if notes > MAX_NOTE_LIMIT {
            bail!("maxGenericArgumentNotes must be at most {MAX_NOTE_LIMIT}, got {notes}");
        }
        resolved.max_generic_argument_notes = notes;
    }

    if let Some(listed) = config.max_missing_arguments_listed {
        if listed == 0 || listed > MAX_NOTE_LIMIT {
            bail!("maxMissingArgumentsListed must be between 1 and {MAX_NOTE_LIMIT}, got {listed}");
        }
        resolved.max_missing_arguments_listed = listed;
    }

    Ok(resolved)
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;
