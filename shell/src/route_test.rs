use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum P {
    Home,
    Team,
    Item,
    Parent,
    ParentHome,
    Child,
    Missing,
}

fn table() -> RouteTable<P> {
    RouteTable::new(vec![
        RouteEntry::new("/", P::Home),
        RouteEntry::new("/team", P::Team),
        RouteEntry::new("/items/:id?", P::Item),
        RouteEntry::new("/parent", P::Parent)
            .with_children(vec![RouteEntry::index(P::ParentHome), RouteEntry::new("child/:slug", P::Child)]),
        RouteEntry::fallback(P::Missing),
    ])
    .unwrap()
}

fn pages(m: &RouteMatch<P>) -> Vec<P> {
    m.pages().copied().collect()
}

// =============================================================================
// Static and parameter matching
// =============================================================================

#[test]
fn root_matches_home() {
    let m = table().resolve("/");
    assert_eq!(pages(&m), vec![P::Home]);
    assert!(!m.is_fallback());
}

#[test]
fn static_match_ignores_ascii_case() {
    assert_eq!(pages(&table().resolve("/TEAM")), vec![P::Team]);
}

#[test]
fn optional_param_absent_and_present_hit_same_page() {
    let table = table();
    let bare = table.resolve("/items");
    let with_id = table.resolve("/items/42");

    assert_eq!(pages(&bare), vec![P::Item]);
    assert_eq!(pages(&with_id), vec![P::Item]);
    assert_eq!(bare.leaf().map(|l| l.key.clone()), with_id.leaf().map(|l| l.key.clone()));
    assert_eq!(bare.params().get("id"), None);
    assert_eq!(with_id.params().get("id"), Some("42"));
}

#[test]
fn params_are_percent_decoded() {
    let table = table();
    assert_eq!(table.resolve("/items/%34%32").params().get("id"), Some("42"));
    assert_eq!(table.resolve("/parent/child/a%20b").params().get("slug"), Some("a b"));
    assert_eq!(pages(&table.resolve("/te%61m")), vec![P::Team]);
}

#[test]
fn extra_segment_after_optional_param_falls_back() {
    assert!(table().resolve("/items/42/extra").is_fallback());
}

// =============================================================================
// Nesting
// =============================================================================

#[test]
fn parent_alone_resolves_index_child() {
    let m = table().resolve("/parent");
    assert_eq!(pages(&m), vec![P::Parent, P::ParentHome]);
    assert_eq!(m.levels()[1].key.as_str(), "/parent (index)");
}

#[test]
fn nested_child_captures_params() {
    let m = table().resolve("/parent/child/abc");
    assert_eq!(pages(&m), vec![P::Parent, P::Child]);
    assert_eq!(m.params().get("slug"), Some("abc"));
    assert_eq!(m.levels()[1].key.as_str(), "/parent/child/:slug");
}

#[test]
fn unknown_child_falls_back() {
    let m = table().resolve("/parent/nope");
    assert!(m.is_fallback());
    assert_eq!(pages(&m), vec![P::Missing]);
}

#[test]
fn parent_without_index_mounts_alone() {
    let table = RouteTable::new(vec![
        RouteEntry::new("/parent", P::Parent).with_children(vec![RouteEntry::new("child", P::Child)]),
        RouteEntry::fallback(P::Missing),
    ])
    .unwrap();
    assert_eq!(pages(&table.resolve("/parent")), vec![P::Parent]);
}

// =============================================================================
// Fallback
// =============================================================================

#[test]
fn unmatched_paths_hit_fallback_once_at_any_depth() {
    let table = table();
    for path in ["/nope", "/a/b", "/a/b/c/d/e/f", "/team/extra", "/parent/child"] {
        let m = table.resolve(path);
        assert!(m.is_fallback(), "{path} should fall back");
        assert_eq!(pages(&m), vec![P::Missing], "{path} should mount the not-found page once");
    }
}

#[test]
fn fallback_captures_rest_of_path() {
    let m = table().resolve("/a/b/c");
    assert_eq!(m.params().get("*"), Some("a/b/c"));
}

#[test]
fn pages_lists_every_entry() {
    let table = table();
    let all = table.pages();
    assert_eq!(all.len(), 7);
    assert!(all.contains(&&P::ParentHome));
    assert!(all.contains(&&P::Missing));
}

// =============================================================================
// Construction invariants
// =============================================================================

#[test]
fn missing_fallback_is_rejected() {
    let err = RouteTable::new(vec![RouteEntry::new("/", P::Home)]).unwrap_err();
    assert_eq!(err, RouteTableError::MissingFallback);
}

#[test]
fn second_fallback_is_rejected() {
    let err = RouteTable::new(vec![RouteEntry::fallback(P::Missing), RouteEntry::fallback(P::Home)]).unwrap_err();
    assert_eq!(err, RouteTableError::MultipleFallbacks);
}

#[test]
fn fallback_must_be_last() {
    let err = RouteTable::new(vec![RouteEntry::fallback(P::Missing), RouteEntry::new("/", P::Home)]).unwrap_err();
    assert_eq!(err, RouteTableError::FallbackNotLast);
}

#[test]
fn nested_fallback_is_rejected() {
    let err = RouteTable::new(vec![
        RouteEntry::new("/parent", P::Parent).with_children(vec![RouteEntry::fallback(P::Missing)]),
        RouteEntry::new("/", P::Home),
    ])
    .unwrap_err();
    assert_eq!(err, RouteTableError::FallbackNotLast);
}

#[test]
fn duplicate_pattern_is_rejected() {
    let err = RouteTable::new(vec![
        RouteEntry::new("/team", P::Team),
        RouteEntry::new("/Team/", P::Home),
        RouteEntry::fallback(P::Missing),
    ])
    .unwrap_err();
    assert!(matches!(err, RouteTableError::DuplicatePath { .. }));
}

#[test]
fn patterns_differing_only_in_param_names_are_duplicates() {
    let err = RouteTable::new(vec![
        RouteEntry::new("/t/:a?", P::Item),
        RouteEntry::new("/T/:b?", P::Team),
        RouteEntry::fallback(P::Missing),
    ])
    .unwrap_err();
    assert_eq!(err, RouteTableError::DuplicatePath { parent: "/".into(), pattern: "/T/:b?".into() });
}

#[test]
fn required_and_optional_params_are_distinct_patterns() {
    let table = RouteTable::new(vec![
        RouteEntry::new("/t/:a", P::Item),
        RouteEntry::new("/t/:b?", P::Team),
        RouteEntry::fallback(P::Missing),
    ]);
    assert!(table.is_ok());
}

#[test]
fn same_child_pattern_under_different_parents_is_allowed() {
    let table = RouteTable::new(vec![
        RouteEntry::new("/a", P::Parent).with_children(vec![RouteEntry::new("x", P::Child)]),
        RouteEntry::new("/b", P::Parent).with_children(vec![RouteEntry::new("x", P::Child)]),
        RouteEntry::fallback(P::Missing),
    ]);
    assert!(table.is_ok());
}

#[test]
fn duplicate_index_is_rejected() {
    let err = RouteTable::new(vec![
        RouteEntry::new("/parent", P::Parent)
            .with_children(vec![RouteEntry::index(P::ParentHome), RouteEntry::index(P::Child)]),
        RouteEntry::fallback(P::Missing),
    ])
    .unwrap_err();
    assert_eq!(err, RouteTableError::DuplicateIndex { parent: "/parent".into() });
}

#[test]
fn index_with_children_is_rejected() {
    let nested_index = RouteEntry::index(P::ParentHome).with_children(vec![RouteEntry::new("child", P::Child)]);
    let err = RouteTable::new(vec![
        RouteEntry::new("/parent", P::Parent).with_children(vec![nested_index]),
        RouteEntry::fallback(P::Missing),
    ])
    .unwrap_err();
    assert_eq!(err, RouteTableError::IndexWithChildren { parent: "/parent".into() });
}

#[test]
fn malformed_patterns_are_rejected() {
    for pattern in ["/items/:", "/items/:id?/more", "/files/*/more"] {
        let err = RouteTable::new(vec![RouteEntry::new(pattern, P::Item), RouteEntry::fallback(P::Missing)])
            .unwrap_err();
        assert!(matches!(err, RouteTableError::InvalidPattern { .. }), "{pattern}");
    }
}
