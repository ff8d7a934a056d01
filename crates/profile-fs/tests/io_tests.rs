use pretty_assertions::assert_eq;
use profile_fs::{NormalizedPath, io, json};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("BBL.json"));

    io::write_atomic(&path, b"{}\n").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}\n");
}

#[test]
fn test_write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("BBL/filament/PLA.json");

    io::write_atomic(&path, b"{}").unwrap();

    assert!(path.is_file());
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("BBL.json");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("BBL.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/BBL.json");
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_read_text_if_exists_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.json"));
    assert_eq!(io::read_text_if_exists(&path).unwrap(), None);
}

#[test]
fn test_files_with_extension_recurses_and_sorts() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("filament");
    fs::create_dir_all(root.join("Polymaker")).unwrap();
    fs::write(root.join("b.json"), "{}").unwrap();
    fs::write(root.join("a.json"), "{}").unwrap();
    fs::write(root.join("Polymaker/c.json"), "{}").unwrap();
    fs::write(root.join("notes.txt"), "").unwrap();
    fs::write(root.join(".hidden.json"), "{}").unwrap();

    let dir = NormalizedPath::new(&root);
    let files = io::files_with_extension(&dir, "json").unwrap();
    let relative: Vec<String> = files
        .iter()
        .map(|f| f.relative_to(&dir).unwrap())
        .collect();

    assert_eq!(relative, vec!["Polymaker/c.json", "a.json", "b.json"]);
}

#[rstest]
#[case("json", &["a.JSON", "b.json"])]
#[case("JSON", &["a.JSON", "b.json"])]
#[case("txt", &["notes.txt"])]
#[case("toml", &[])]
fn test_files_with_extension_matches_case_insensitively(
    #[case] extension: &str,
    #[case] expected: &[&str],
) {
    let temp = TempDir::new().unwrap();
    for name in ["a.JSON", "b.json", "notes.txt", ".hidden.txt"] {
        fs::write(temp.path().join(name), "").unwrap();
    }

    let dir = NormalizedPath::new(temp.path());
    let names: Vec<String> = io::files_with_extension(&dir, extension)
        .unwrap()
        .iter()
        .filter_map(|f| f.file_name().map(str::to_string))
        .collect();

    assert_eq!(names, expected);
}

#[test]
fn test_files_with_extension_missing_dir_is_empty() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path().join("process"));
    assert!(io::files_with_extension(&dir, "json").unwrap().is_empty());
}

#[test]
fn test_json_save_then_load_value() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("Custom.json"));
    let value = serde_json::json!({"name": "Custom", "version": "01.00.00.00"});

    json::save(&path, &value).unwrap();

    let raw = fs::read_to_string(path.to_native()).unwrap();
    assert!(raw.starts_with("{\n    \"name\""));
    assert_eq!(json::load_value(&path).unwrap(), value);
}
