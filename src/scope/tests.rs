/// Test suite for the scope module
///
/// Tests cover:
/// - Parsing and validation
/// - Prefix chain construction
/// - Custom separators
/// - Edge cases

use super::*;

#[test]
fn test_scope_parsing() {
    let scope = Scope::parse("admin::user::create", "::").unwrap();
    assert_eq!(scope.segments().len(), 3);
    assert_eq!(scope.depth(), 3);
    assert_eq!(scope.as_str(), "admin::user::create");
}

#[test]
fn test_single_segment() {
    let scope = Scope::parse("admin", "::").unwrap();
    assert_eq!(scope.depth(), 1);
    assert_eq!(scope.prefix_chain(), vec!["admin"]);
}

#[test]
fn test_empty_scope() {
    assert!(matches!(Scope::parse("", "::"), Err(ScopeError::EmptyScope)));
}

#[test]
fn test_leading_separator() {
    assert!(matches!(
        Scope::parse("::admin", "::"),
        Err(ScopeError::LeadingSeparator { .. })
    ));
}

#[test]
fn test_prefix_chain_order() {
    let scope = Scope::parse("a::b::c", "::").unwrap();
    let chain = scope.prefix_chain();

    assert_eq!(chain, vec!["a", "a::b", "a::b::c"]);
    // Full scope is always the last prefix
    assert_eq!(chain.last().map(String::as_str), Some("a::b::c"));
}

#[test]
fn test_prefix_chain_no_recombination() {
    // "food" shares a prefix of characters with "foo" but not of segments
    let scope = Scope::parse("food::court", "::").unwrap();
    let chain = scope.prefix_chain();

    assert_eq!(chain, vec!["food", "food::court"]);
    assert!(!chain.contains(&"foo".to_string()));
}

#[test]
fn test_custom_separator() {
    let scope = Scope::parse("foo|bar|baz", "|").unwrap();
    assert_eq!(scope.depth(), 3);
    assert_eq!(scope.prefix_chain(), vec!["foo", "foo|bar", "foo|bar|baz"]);

    // Default-separator strings are a single opaque segment under "|"
    let opaque = Scope::parse("foo::bar", "|").unwrap();
    assert_eq!(opaque.depth(), 1);

    // Leading-separator validation follows the configured separator
    assert!(matches!(
        Scope::parse("|foo", "|"),
        Err(ScopeError::LeadingSeparator { .. })
    ));
    assert!(Scope::parse("::foo", "|").is_ok());
}

#[test]
fn test_scope_display() {
    let scope = Scope::parse("admin::user", "::").unwrap();
    assert_eq!(format!("{}", scope), "admin::user");
}
