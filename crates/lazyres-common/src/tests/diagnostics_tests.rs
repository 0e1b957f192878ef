use super::*;
use crate::span::Anchor;

#[test]
fn test_format_message_fills_placeholders() {
    assert_eq!(
        format_message("'{0}' inherits '{1}'", &["A", "B"]),
        "'A' inherits 'B'"
    );
    assert_eq!(format_message("no args", &[]), "no args");
}

#[test]
fn test_every_code_has_a_unique_message() {
    let mut seen = std::collections::HashSet::new();
    for message in DIAGNOSTIC_MESSAGES {
        assert!(seen.insert(message.code), "duplicate code {}", message.code);
        assert!(get_message_template(message.code).is_some());
    }
}

#[test]
fn test_diagnostic_at_anchor() {
    let anchor = Anchor::new("a.src", 10, 3);
    let diag = Diagnostic::at(
        &anchor,
        diagnostic_codes::CYCLIC_INHERITANCE_HIERARCHY,
        &["A", "B"],
    );
    assert_eq!(diag.file, "a.src");
    assert_eq!(diag.start, 10);
    assert_eq!(diag.length, 3);
    assert_eq!(diag.category, DiagnosticCategory::Error);
    assert!(diag.message_text.contains("'A' inherits 'B'"));
}

#[test]
fn test_related_information_is_serialized_only_when_present() {
    let anchor = Anchor::new("a.src", 0, 1);
    let plain = Diagnostic::at(&anchor, diagnostic_codes::UNRESOLVED_REFERENCE, &["X"]);
    let json = serde_json::to_string(&plain).unwrap();
    assert!(!json.contains("related_information"));

    let related = plain.with_related(&Anchor::new("b.src", 4, 2), "declared here".into());
    let json = serde_json::to_string(&related).unwrap();
    assert!(json.contains("declared here"));
}
