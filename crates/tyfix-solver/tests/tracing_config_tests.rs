use super::*;

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
}

#[test]
fn test_unknown_log_format_falls_back_to_text() {
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
}

#[test]
fn test_init_tracing_can_run_twice() {
    init_tracing();
    init_tracing();
}

#[test]
fn test_tracing_off_without_variables() {
    assert_eq!(filter_directives(None, None), None);
}

#[test]
fn test_rust_log_used_when_tyfix_log_unset() {
    assert_eq!(filter_directives(None, Some("warn")), Some("warn".to_string()));
}

#[test]
fn test_presets_expand_to_fix_targets() {
    assert_eq!(
        filter_directives(Some("fixes"), Some("warn")),
        Some("tyfix_solver::fix=trace".to_string())
    );
    assert_eq!(
        filter_directives(Some("fixes, branches,diagnose"), None),
        Some("tyfix_solver::fix=trace,tyfix_solver::system=debug,[diagnose_solution]=trace".to_string())
    );
}

#[test]
fn test_plain_directives_pass_through() {
    assert_eq!(
        filter_directives(Some("info,branches,tyfix_common=debug,"), None),
        Some("info,tyfix_solver::system=debug,tyfix_common=debug".to_string())
    );
}
