//! Integration tests for parser module

#[path = "common/mod.rs"]
mod common;

use common::*;
use tabular_etl::errors::AppError;
use tabular_etl::models::ParseMode;
use tabular_etl::parser;
use tempfile::TempDir;

#[test]
fn test_load_json_file_object_and_array() {
    let temp_dir = TempDir::new().unwrap();
    let array_path = temp_dir.path().join("people.json");
    let object_path = temp_dir.path().join("one.json");
    create_test_file(&array_path, SAMPLE_JSON);
    create_test_file(&object_path, SINGLE_JSON);

    let array = parser::load_json_file(&array_path).unwrap();
    assert_eq!(array.as_array().unwrap().len(), 2);

    let object = parser::load_json_file(&object_path).unwrap();
    assert_eq!(object["Name"], "Carol");
}

#[test]
fn test_load_json_file_error_kinds() {
    let temp_dir = TempDir::new().unwrap();
    let empty = temp_dir.path().join("empty.json");
    let broken = temp_dir.path().join("broken.json");
    create_test_file(&empty, "  \n ");
    create_test_file(&broken, "{\"Name\": ");

    assert!(matches!(
        parser::load_json_file(temp_dir.path().join("missing.json")),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        parser::load_json_file(&empty),
        Err(AppError::EmptyInput(_))
    ));
    assert!(matches!(
        parser::load_json_file(&broken),
        Err(AppError::MalformedInput { .. })
    ));

    assert!(parser::load_json_file_safe(&empty).is_none());
    assert!(parser::load_json_file_safe(&broken).is_none());
}

#[test]
fn test_json_with_bom_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bom.json");
    create_test_file(&path, "\u{feff}{\"a\": 1}");

    let value = parser::load_json_file(&path).unwrap();
    assert_eq!(value["a"], 1);
}

#[test]
fn test_load_multiple_json_safe_skips_failures() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.json");
    let bad = temp_dir.path().join("bad.json");
    create_test_file(&good, SAMPLE_JSON);
    create_test_file(&bad, "not json");
    let missing = temp_dir.path().join("missing.json");

    let paths = vec![good.clone(), bad.clone(), missing];
    let docs = parser::load_multiple_json(&paths, ParseMode::Safe).unwrap();
    assert_eq!(docs.len(), 1);

    let strict = parser::load_multiple_json(&paths, ParseMode::Strict);
    assert!(matches!(strict, Err(AppError::MalformedInput { .. })));
}

#[test]
fn test_load_xml_file_builds_tree() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.xml");
    create_test_file(&path, SAMPLE_XML);

    let root = parser::load_xml_file(&path).unwrap();
    assert_eq!(root.tag, "People");

    let people = root.find_all("Person");
    assert_eq!(people.len(), 2);
    assert_eq!(
        people[1].child("Name").and_then(|n| n.text.as_deref()),
        Some("Bob & Co")
    );
    assert_eq!(people[1].child("Age").and_then(|n| n.text.clone()), None);
}

#[test]
fn test_load_xml_file_error_kinds() {
    let temp_dir = TempDir::new().unwrap();
    let mismatched = temp_dir.path().join("mismatched.xml");
    let unclosed = temp_dir.path().join("unclosed.xml");
    let empty = temp_dir.path().join("empty.xml");
    create_test_file(&mismatched, "<a><b></a>");
    create_test_file(&unclosed, "<a><b></b>");
    create_test_file(&empty, "");

    assert!(matches!(
        parser::load_xml_file(&mismatched),
        Err(AppError::MalformedInput { .. })
    ));
    assert!(matches!(
        parser::load_xml_file(&unclosed),
        Err(AppError::MalformedInput { .. })
    ));
    assert!(matches!(
        parser::load_xml_file(&empty),
        Err(AppError::EmptyInput(_))
    ));
    assert!(parser::load_xml_file_safe(temp_dir.path().join("nope.xml")).is_none());
}

#[test]
fn test_load_multiple_xml_keeps_order() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("a.xml");
    let second = temp_dir.path().join("b.xml");
    create_test_file(&first, "<First/>");
    create_test_file(&second, "<Second/>");

    let roots = parser::load_multiple_xml(&[&first, &second], ParseMode::Strict).unwrap();
    let tags: Vec<&str> = roots.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["First", "Second"]);
}

#[test]
fn test_find_input_files_recurses() {
    let temp_dir = TempDir::new().unwrap();
    create_test_file(&temp_dir.path().join("b.json"), "{}");
    create_test_file(&temp_dir.path().join("nested/a.json"), "{}");
    create_test_file(&temp_dir.path().join("nested/skip.xml"), "<a/>");

    let found = parser::find_input_files(temp_dir.path(), &["json"]).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap() == "json"));

    assert!(matches!(
        parser::find_input_files(&temp_dir.path().join("missing"), &["json"]),
        Err(AppError::NotFound(_))
    ));
}
