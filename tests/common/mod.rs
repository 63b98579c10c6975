//! Common test utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test file, creating parent directories
#[allow(dead_code)]
pub fn create_test_file(path: &Path, content: &str) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::File::create(path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
}

/// Two nested JSON records; the second lacks `Details.Age`
#[allow(dead_code)]
pub const SAMPLE_JSON: &str = r#"[
  {"Name": "Alice", "Details": {"Age": 25, "City": "Lyon"}},
  {"Name": "Bob", "Details": {"City": "Porto"}}
]"#;

/// Single JSON object
#[allow(dead_code)]
pub const SINGLE_JSON: &str = r#"{"Name": "Carol", "Details": {"Age": 41, "City": "Oslo"}}"#;

/// XML document with records nested one level below the root
#[allow(dead_code)]
pub const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<People>
  <Group>
    <Person>
      <Name>Alice</Name>
      <Age>25</Age>
    </Person>
    <Person>
      <Name>Bob &amp; Co</Name>
      <Age/>
    </Person>
  </Group>
</People>"#;
