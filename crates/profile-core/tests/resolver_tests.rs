//! Tests for dependency ordering of profile batches

use pretty_assertions::assert_eq;
use profile_core::entry::{Entry, ProfileKind};
use profile_core::resolver::{UnresolvedPolicy, UnresolvedReason, resolve};
use rstest::rstest;

fn filament(name: &str, inherits: Option<&str>) -> Entry {
    let entry = Entry::new(name, ProfileKind::Filament, format!("filament/{name}.json"));
    match inherits {
        Some(parent) => entry.inheriting(parent),
        None => entry,
    }
}

#[test]
fn test_chain_given_out_of_order() {
    let entries = vec![
        filament("C", Some("B")),
        filament("A", None),
        filament("B", Some("A")),
    ];

    let resolution = resolve(&entries, UnresolvedPolicy::AppendAtEnd);

    assert_eq!(resolution.names(), ["A", "B", "C"]);
    assert!(resolution.is_complete());
}

#[test]
fn test_roots_first_then_dependents() {
    // Two independent families; roots are emitted in name order and each
    // child follows as soon as its parent is placed.
    let entries = vec![
        filament("fdm_filament_pla", Some("fdm_filament_common")),
        filament("Bambu PLA Basic @base", Some("fdm_filament_pla")),
        filament("fdm_filament_common", None),
        filament("Generic ABS", Some("fdm_filament_abs")),
        filament("fdm_filament_abs", Some("fdm_filament_common")),
    ];

    let resolution = resolve(&entries, UnresolvedPolicy::AppendAtEnd);

    assert_eq!(
        resolution.names(),
        [
            "fdm_filament_common",
            "fdm_filament_abs",
            "Generic ABS",
            "fdm_filament_pla",
            "Bambu PLA Basic @base",
        ]
    );
}

#[test]
fn test_tie_break_is_bytewise() {
    // Uppercase sorts before lowercase
    let entries = vec![filament("b", None), filament("B", None), filament("a", None)];
    let resolution = resolve(&entries, UnresolvedPolicy::AppendAtEnd);
    assert_eq!(resolution.names(), ["B", "a", "b"]);
}

#[rstest]
#[case(UnresolvedPolicy::AppendAtEnd, vec!["X"])]
#[case(UnresolvedPolicy::Exclude, vec![])]
fn test_single_missing_parent(#[case] policy: UnresolvedPolicy, #[case] expected: Vec<&str>) {
    let entries = vec![filament("X", Some("Y"))];

    let resolution = resolve(&entries, policy);

    assert_eq!(resolution.names(), expected);
    assert_eq!(resolution.unresolved.len(), 1);
    assert_eq!(resolution.unresolved[0].name, "X");
    assert_eq!(resolution.unresolved[0].sub_path, "filament/X.json");
    assert_eq!(
        resolution.unresolved[0].reason,
        UnresolvedReason::MissingParent {
            parent: "Y".to_string()
        }
    );
}

#[rstest]
#[case(UnresolvedPolicy::AppendAtEnd, vec!["A", "B"])]
#[case(UnresolvedPolicy::Exclude, vec![])]
fn test_two_cycle_terminates(#[case] policy: UnresolvedPolicy, #[case] expected: Vec<&str>) {
    let entries = vec![filament("A", Some("B")), filament("B", Some("A"))];

    let resolution = resolve(&entries, policy);

    assert_eq!(resolution.names(), expected);
    assert_eq!(resolution.unresolved_names(), ["A", "B"]);
    assert!(resolution.has_cycles());
}

#[test]
fn test_cycle_members_appended_after_resolved() {
    let entries = vec![
        filament("loop_b", Some("loop_a")),
        filament("root", None),
        filament("loop_a", Some("loop_b")),
        filament("leaf", Some("root")),
    ];

    let resolution = resolve(&entries, UnresolvedPolicy::AppendAtEnd);

    assert_eq!(resolution.names(), ["root", "leaf", "loop_a", "loop_b"]);
}

#[test]
fn test_exclude_keeps_unrelated_entries() {
    let entries = vec![
        filament("orphan", Some("gone")),
        filament("orphan child", Some("orphan")),
        filament("base", None),
        filament("child", Some("base")),
    ];

    let resolution = resolve(&entries, UnresolvedPolicy::Exclude);

    assert_eq!(resolution.names(), ["base", "child"]);
    assert_eq!(resolution.unresolved_names(), ["orphan", "orphan child"]);
    assert!(!resolution.has_cycles());
}

#[test]
fn test_input_is_not_modified() {
    let entries = vec![filament("B", Some("A")), filament("A", None)];
    let copy = entries.clone();
    let _ = resolve(&entries, UnresolvedPolicy::AppendAtEnd);
    assert_eq!(entries, copy);
}

#[test]
fn test_records_follow_order() {
    let entries = vec![filament("B", Some("A")), filament("A", None)];
    let records = resolve(&entries, UnresolvedPolicy::AppendAtEnd).records();
    assert_eq!(records[0].name, "A");
    assert_eq!(records[0].sub_path, "filament/A.json");
    assert_eq!(records[1].name, "B");
}
