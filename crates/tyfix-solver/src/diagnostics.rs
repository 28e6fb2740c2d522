//! Lazy diagnostics emitted by constraint fixes.
//!
//! Fixes never format strings themselves. They push `PendingDiagnostic`s
//! carrying a message code plus structured arguments (`TypeId`, `Atom`,
//! plain strings, numbers) into a `DiagnosticCollector`. Rendering to text
//! happens once, after the diagnostic pass, through `TypeFormatter`.

use crate::decl::DeclStore;
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::types::TypeId;
use std::sync::Arc;
use tyfix_common::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticFixIt, format_message, get_message_template,
};
use tyfix_common::interner::Atom;
use tyfix_common::span::Span;

// =============================================================================
// Severity and Arguments
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Note,
}

impl DiagnosticSeverity {
    pub const fn category(self) -> DiagnosticCategory {
        match self {
            DiagnosticSeverity::Error => DiagnosticCategory::Error,
            DiagnosticSeverity::Warning => DiagnosticCategory::Warning,
            DiagnosticSeverity::Note => DiagnosticCategory::Message,
        }
    }
}

/// Argument substituted into a message template at render time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticArg {
    Type(TypeId),
    Atom(Atom),
    String(Arc<str>),
    Number(usize),
}

macro_rules! impl_from_diagnostic_arg {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for DiagnosticArg {
            fn from(value: $source) -> Self {
                DiagnosticArg::$variant(value.into())
            }
        })*
    };
}

impl_from_diagnostic_arg! {
    TypeId => Type,
    Atom => Atom,
    Arc<str> => String,
    &str => String,
    String => String,
    usize => Number,
}

impl From<u32> for DiagnosticArg {
    fn from(value: u32) -> Self {
        DiagnosticArg::Number(value as usize)
    }
}

// =============================================================================
// Fix-its
// =============================================================================

/// Suggested source edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixIt {
    pub span: Span,
    pub text: String,
}

impl FixIt {
    pub fn insert(at: Span, text: impl Into<String>) -> Self {
        FixIt {
            span: at.start_point(),
            text: text.into(),
        }
    }

    pub fn insert_after(span: Span, text: impl Into<String>) -> Self {
        FixIt {
            span: span.end_point(),
            text: text.into(),
        }
    }

    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        FixIt {
            span,
            text: text.into(),
        }
    }

    pub fn remove(span: Span) -> Self {
        FixIt {
            span,
            text: String::new(),
        }
    }
}

// =============================================================================
// PendingDiagnostic
// =============================================================================

/// A diagnostic whose message has not been formatted yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDiagnostic {
    pub code: u32,
    pub args: Vec<DiagnosticArg>,
    /// Filled with the fix's anchor span when left empty.
    pub span: Option<Span>,
    pub severity: DiagnosticSeverity,
    pub related: Vec<PendingDiagnostic>,
    pub fix_its: Vec<FixIt>,
}

impl PendingDiagnostic {
    pub fn new(code: u32, severity: DiagnosticSeverity, args: Vec<DiagnosticArg>) -> Self {
        PendingDiagnostic {
            code,
            args,
            span: None,
            severity,
            related: Vec::new(),
            fix_its: Vec::new(),
        }
    }

    pub fn error(code: u32, args: Vec<DiagnosticArg>) -> Self {
        Self::new(code, DiagnosticSeverity::Error, args)
    }

    pub fn note(code: u32, args: Vec<DiagnosticArg>) -> Self {
        Self::new(code, DiagnosticSeverity::Note, args)
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_related(mut self, note: PendingDiagnostic) -> Self {
        self.related.push(note);
        self
    }

    #[must_use]
    pub fn with_fix_it(mut self, fix_it: FixIt) -> Self {
        self.fix_its.push(fix_it);
        self
    }

    #[must_use]
    pub fn with_fix_its(mut self, fix_its: impl IntoIterator<Item = FixIt>) -> Self {
        self.fix_its.extend(fix_its);
        self
    }

    /// Drop fix-its from this diagnostic and its notes.
    pub fn strip_fix_its(&mut self) {
        self.fix_its.clear();
        for note in &mut self.related {
            note.strip_fix_its();
        }
    }
}

// =============================================================================
// DiagnosticCollector
// =============================================================================

/// Sink the diagnostic pass writes into.
#[derive(Default, Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<PendingDiagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: PendingDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get the collected diagnostics.
    pub fn diagnostics(&self) -> &[PendingDiagnostic] {
        &self.diagnostics
    }

    /// Take the collected diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<PendingDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Format every collected diagnostic.
    pub fn render(&self, types: &TypeInterner, decls: &DeclStore) -> Vec<Diagnostic> {
        let formatter = TypeFormatter::new(types, decls);
        self.diagnostics
            .iter()
            .map(|pending| render_diagnostic(&formatter, types, pending))
            .collect()
    }

    /// Render and serialize as a JSON array.
    pub fn to_json(&self, types: &TypeInterner, decls: &DeclStore) -> serde_json::Result<String> {
        Diagnostic::to_json(&self.render(types, decls))
    }
}

fn render_message(formatter: &TypeFormatter<'_>, types: &TypeInterner, pending: &PendingDiagnostic) -> String {
    let Some(template) = get_message_template(pending.code) else {
        return format!("unknown diagnostic {}", pending.code);
    };
    let args: Vec<String> = pending
        .args
        .iter()
        .map(|arg| match arg {
            DiagnosticArg::Type(ty) => formatter.format(*ty),
            DiagnosticArg::Atom(atom) => types.resolve_atom(*atom).to_string(),
            DiagnosticArg::String(s) => s.to_string(),
            DiagnosticArg::Number(n) => n.to_string(),
        })
        .collect();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    format_message(template, &arg_refs)
}

fn render_diagnostic(
    formatter: &TypeFormatter<'_>,
    types: &TypeInterner,
    pending: &PendingDiagnostic,
) -> Diagnostic {
    let span = pending.span.unwrap_or(Span::DUMMY);
    let mut diagnostic = Diagnostic::error(
        span.start,
        span.len(),
        render_message(formatter, types, pending),
        pending.code,
    );
    diagnostic.category = pending.severity.category();
    diagnostic.fix_its = pending.fix_its.iter().map(render_fix_it).collect();
    for note in &pending.related {
        let note_span = note.span.unwrap_or(span);
        diagnostic = diagnostic.with_related(
            note_span.start,
            note_span.len(),
            render_message(formatter, types, note),
            note.code,
        );
        diagnostic
            .fix_its
            .extend(note.fix_its.iter().map(render_fix_it));
    }
    diagnostic
}

fn render_fix_it(fix_it: &FixIt) -> DiagnosticFixIt {
    DiagnosticFixIt {
        start: fix_it.span.start,
        length: fix_it.span.len(),
        replacement: fix_it.text.clone(),
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
