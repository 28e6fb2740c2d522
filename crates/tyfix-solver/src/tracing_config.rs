//! Subscriber setup for watching fixes being recorded and rendered.
//!
//! `TYFIX_LOG` takes ordinary `EnvFilter` directives plus three presets,
//! which may be mixed with directives in one comma-separated list:
//!
//! - `fixes`: `trace!` from the fix factories (why an `attempt` declined)
//! - `branches`: `debug!` from the session (recording, commit, discard)
//! - `diagnose`: the `diagnose_solution` span and everything under it
//!
//! ```bash
//! TYFIX_LOG=fixes,branches TYFIX_LOG_FORMAT=tree cargo test -p tyfix-solver
//! ```
//!
//! Without `TYFIX_LOG` the subscriber falls back to `RUST_LOG`; with neither
//! set nothing is installed. `TYFIX_LOG_FORMAT` picks `text` (default),
//! `tree` or `json` output, always on stderr.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Output layer selected by `TYFIX_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// Indented span tree via `tracing-tree`; easiest way to follow one
    /// diagnostic pass.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unknown names fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Directive a `TYFIX_LOG` preset stands for.
fn preset(name: &str) -> Option<&'static str> {
    match name {
        "fixes" => Some("tyfix_solver::fix=trace"),
        "branches" => Some("tyfix_solver::system=debug"),
        "diagnose" => Some("[diagnose_solution]=trace"),
        _ => None,
    }
}

/// Filter directives for the given `TYFIX_LOG` and `RUST_LOG` values.
///
/// `TYFIX_LOG` wins when both are set; presets in it are expanded and other
/// entries are passed through. `None` means tracing stays off.
pub fn filter_directives(tyfix_log: Option<&str>, rust_log: Option<&str>) -> Option<String> {
    let Some(tyfix_log) = tyfix_log else {
        return rust_log.map(str::to_string);
    };
    let directives: Vec<&str> = tyfix_log
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| preset(entry).unwrap_or(entry))
        .collect();
    Some(directives.join(","))
}

/// Install the global subscriber described by the environment.
///
/// Repeated calls are harmless; only the first install takes effect.
pub fn init_tracing() {
    let tyfix_log = std::env::var("TYFIX_LOG").ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let Some(directives) = filter_directives(tyfix_log.as_deref(), rust_log.as_deref()) else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);
    let format = LogFormat::parse(&std::env::var("TYFIX_LOG_FORMAT").unwrap_or_default());

    let _ = match format {
        LogFormat::Tree => {
            let layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true)
                .with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init()
        }
        LogFormat::Json => {
            let layer = fmt::layer().json().with_current_span(true).with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init()
        }
    };
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tracing_config_tests;
