//! Tests for vendor discovery and profile scanning

use pretty_assertions::assert_eq;
use profile_core::entry::ProfileKind;
use profile_core::scan::scan_vendor;
use profile_core::tree::ProfileTree;
use profile_test_utils::TestProfiles;
use profile_test_utils::profiles::{manifest, profile, without};

#[test]
fn test_vendors_lists_manifest_with_directory() {
    let fixture = TestProfiles::new();
    fixture.write_manifest("Creality", manifest("Creality", "1.0"));
    fixture.write_manifest("BBL", manifest("BBL", "1.0"));
    fixture.write_raw("blacklist.json", "{}");
    fixture.write_raw(".hidden.json", "{}");

    let tree = ProfileTree::open(fixture.root()).unwrap();
    assert_eq!(tree.vendors().unwrap(), vec!["BBL", "Creality"]);
}

#[test]
fn test_scan_walks_nested_directories_sorted() {
    let fixture = TestProfiles::new();
    fixture.write_manifest("BBL", manifest("BBL", "1.0"));
    fixture.write_profile(
        "BBL",
        "filament/Generic/Generic PLA.json",
        profile("filament", "Generic PLA", None),
    );
    fixture.write_profile(
        "BBL",
        "filament/Bambu PLA.json",
        profile("filament", "Bambu PLA", None),
    );
    fixture.write_profile(
        "BBL",
        "machine/X1C.json",
        profile("machine_model", "Bambu Lab X1 Carbon", None),
    );
    fixture.write_profile(
        "BBL",
        "process/0.20mm.json",
        profile("process", "0.20mm Standard", None),
    );
    fixture.write_raw("BBL/filament/notes.txt", "not a profile");
    fixture.write_raw("BBL/cover/X1C_cover.json", "{}");

    let tree = ProfileTree::new(fixture.root());
    let scan = scan_vendor(&tree, "BBL").unwrap();

    let sub_paths: Vec<&str> = scan
        .profiles
        .iter()
        .map(|p| p.entry.sub_path.as_str())
        .collect();
    assert_eq!(
        sub_paths,
        [
            "filament/Bambu PLA.json",
            "filament/Generic/Generic PLA.json",
            "machine/X1C.json",
            "process/0.20mm.json",
        ]
    );
    assert!(scan.failures.is_empty());
    assert_eq!(scan.count(ProfileKind::Filament), 2);
    assert_eq!(scan.count(ProfileKind::MachineModel), 1);
    assert_eq!(scan.count(ProfileKind::Machine), 0);
    assert!(scan.find(ProfileKind::Process, "0.20mm Standard").is_some());
}

#[test]
fn test_scan_records_failures_and_continues() {
    let fixture = TestProfiles::new();
    fixture.write_manifest("BBL", manifest("BBL", "1.0"));
    fixture.write_raw("BBL/process/broken.json", "{ not json");
    fixture.write_profile(
        "BBL",
        "process/nameless.json",
        without(profile("process", "x", None), "name"),
    );
    fixture.write_profile("BBL", "process/ok.json", profile("process", "ok", None));

    let tree = ProfileTree::new(fixture.root());
    let scan = scan_vendor(&tree, "BBL").unwrap();

    assert_eq!(scan.profiles.len(), 1);
    let failed: Vec<&str> = scan.failures.iter().map(|f| f.sub_path.as_str()).collect();
    assert_eq!(failed, ["process/broken.json", "process/nameless.json"]);
    assert!(scan.failures[0].reason.starts_with("invalid JSON"));
    assert!(scan.failed("process/broken.json"));
}

#[test]
fn test_entries_for_kind() {
    let fixture = TestProfiles::new();
    fixture.write_profile("Voron", "process/a.json", profile("process", "a", None));
    fixture.write_profile("Voron", "process/b.json", profile("process", "b", Some("a")));
    fixture.write_profile("Voron", "filament/c.json", profile("filament", "c", None));

    let tree = ProfileTree::new(fixture.root());
    let scan = scan_vendor(&tree, "Voron").unwrap();
    let entries = scan.entries(ProfileKind::Process);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].inherits.as_deref(), Some("a"));
    assert_eq!(scan.by_sub_path("filament/c.json").unwrap().name(), "c");
}
