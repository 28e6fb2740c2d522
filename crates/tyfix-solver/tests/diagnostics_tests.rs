use super::*;
use crate::decl::{DeclInfo, DeclKind};
use tyfix_common::diagnostics::diagnostic_codes;

#[test]
fn test_fix_it_constructors() {
    let span = Span::new(4, 9);
    assert_eq!(FixIt::insert(span, "&").span, Span::at(4));
    assert_eq!(FixIt::insert_after(span, "!").span, Span::at(9));
    assert_eq!(FixIt::replace(span, "S").span, span);
    let removal = FixIt::remove(span);
    assert_eq!(removal.span, span);
    assert!(removal.text.is_empty());
}

#[test]
fn test_argument_conversions() {
    let types = TypeInterner::new();
    let atom = types.intern_string("a");
    assert_eq!(DiagnosticArg::from(TypeId::INT), DiagnosticArg::Type(TypeId::INT));
    assert_eq!(DiagnosticArg::from(atom), DiagnosticArg::Atom(atom));
    assert_eq!(DiagnosticArg::from("x"), DiagnosticArg::String(Arc::from("x")));
    assert_eq!(DiagnosticArg::from(String::from("y")), DiagnosticArg::String(Arc::from("y")));
    assert_eq!(DiagnosticArg::from(3usize), DiagnosticArg::Number(3));
    assert_eq!(DiagnosticArg::from(7u32), DiagnosticArg::Number(7));
}

#[test]
fn test_strip_fix_its_is_recursive() {
    let mut diagnostic = PendingDiagnostic::error(diagnostic_codes::EXTRANEOUS_ADDRESS_OF, Vec::new())
        .with_fix_it(FixIt::remove(Span::new(0, 1)))
        .with_related(
            PendingDiagnostic::note(diagnostic_codes::FORCE_UNWRAP_OPTIONAL, Vec::new())
                .with_fix_it(FixIt::insert_after(Span::new(0, 1), "!")),
        );
    diagnostic.strip_fix_its();
    assert!(diagnostic.fix_its.is_empty());
    assert!(diagnostic.related[0].fix_its.is_empty());
}

#[test]
fn test_severity_categories() {
    assert_eq!(DiagnosticSeverity::Error.category(), DiagnosticCategory::Error);
    assert_eq!(DiagnosticSeverity::Warning.category(), DiagnosticCategory::Warning);
    assert_eq!(DiagnosticSeverity::Note.category(), DiagnosticCategory::Message);
}

#[test]
fn test_render_formats_types_and_names() {
    let types = TypeInterner::new();
    let mut decls = DeclStore::new();
    let s_decl = decls.register(DeclInfo::new(DeclKind::Struct, types.intern_string("S")));
    let s = types.nominal(s_decl);
    let missing = types.intern_string("missing");

    let mut sink = DiagnosticCollector::new();
    sink.push(
        PendingDiagnostic::error(diagnostic_codes::NO_MEMBER, vec![types.optional(s).into(), missing.into()])
            .with_span(Span::new(2, 9)),
    );
    let rendered = sink.render(&types, &decls);
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].message_text, "value of type 'S?' has no member 'missing'");
    assert_eq!(rendered[0].start, 2);
    assert_eq!(rendered[0].length, 7);
    assert_eq!(rendered[0].code, diagnostic_codes::NO_MEMBER);
    assert_eq!(rendered[0].category, DiagnosticCategory::Error);
}

#[test]
fn test_render_notes_and_fix_its() {
    let types = TypeInterner::new();
    let decls = DeclStore::new();
    let mut sink = DiagnosticCollector::new();
    sink.push(
        PendingDiagnostic::error(
            diagnostic_codes::OPTIONAL_NOT_UNWRAPPED,
            vec![types.optional(TypeId::INT).into(), TypeId::INT.into()],
        )
        .with_span(Span::new(10, 11))
        .with_severity(DiagnosticSeverity::Warning)
        .with_related(
            PendingDiagnostic::note(diagnostic_codes::FORCE_UNWRAP_OPTIONAL, Vec::new())
                .with_fix_it(FixIt::insert_after(Span::new(10, 11), "!")),
        )
        .with_related(
            PendingDiagnostic::note(diagnostic_codes::DECLARED_HERE, vec!["x".into()]).with_span(Span::new(0, 1)),
        ),
    );
    let rendered = sink.render(&types, &decls);
    let diagnostic = &rendered[0];
    assert_eq!(diagnostic.category, DiagnosticCategory::Warning);
    assert_eq!(diagnostic.message_text, "value of optional type 'Int?' must be unwrapped to a value of type 'Int'");

    assert_eq!(diagnostic.related_information.len(), 2);
    // A note without a span sits on the main diagnostic.
    assert_eq!(diagnostic.related_information[0].start, 10);
    assert_eq!(diagnostic.related_information[1].message_text, "'x' declared here");
    assert_eq!(diagnostic.related_information[1].start, 0);

    assert_eq!(
        diagnostic.fix_its,
        vec![DiagnosticFixIt {
            start: 11,
            length: 0,
            replacement: "!".to_string(),
        }]
    );
}

#[test]
fn test_render_unknown_code() {
    let types = TypeInterner::new();
    let decls = DeclStore::new();
    let mut sink = DiagnosticCollector::new();
    sink.push(PendingDiagnostic::error(9999, Vec::new()));
    let rendered = sink.render(&types, &decls);
    assert_eq!(rendered[0].message_text, "unknown diagnostic 9999");
    assert_eq!(rendered[0].start, 0);
    assert_eq!(rendered[0].length, 0);
}

#[test]
fn test_collector_take() {
    let mut sink = DiagnosticCollector::new();
    assert!(sink.is_empty());
    sink.push(PendingDiagnostic::error(diagnostic_codes::PARTIAL_APPLY_MUTATING, Vec::new()));
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.diagnostics()[0].severity, DiagnosticSeverity::Error);
    let taken = sink.take_diagnostics();
    assert_eq!(taken.len(), 1);
    assert!(sink.is_empty());
}

#[test]
fn test_to_json() {
    let types = TypeInterner::new();
    let decls = DeclStore::new();
    let mut sink = DiagnosticCollector::new();
    sink.push(
        PendingDiagnostic::error(diagnostic_codes::EXTRANEOUS_ADDRESS_OF, Vec::new()).with_span(Span::new(3, 4)),
    );
    let json = sink.to_json(&types, &decls).expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value[0]["message_text"], "use of extraneous '&'");
    assert_eq!(value[0]["code"], diagnostic_codes::EXTRANEOUS_ADDRESS_OF);
    assert_eq!(value[0]["start"], 3);
    assert!(value[0].get("fix_its").is_none());
}
