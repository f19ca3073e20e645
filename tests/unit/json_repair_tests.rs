/*!
 * Tests for the JSON description repair utility
 */

use anyhow::Result;
use yadtwai::json_repair::{RepairOutcome, repair_file};
use crate::common;

/// Test that a valid file is left byte-for-byte untouched
#[test]
fn test_repairFile_withValidJson_shouldNotWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = "{\"description\":\"fine\",   \"n\": 1}";
    let path = common::create_test_file(temp_dir.path(), "tools.json", original)?;

    assert_eq!(repair_file(&path)?, RepairOutcome::AlreadyValid);
    assert_eq!(std::fs::read_to_string(&path)?, original);
    Ok(())
}

/// Test that stray quotes inside the description are escaped
#[test]
fn test_repairFile_withRawQuotes_shouldRewritePretty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = "{\"name\": \"phase\", \"description\": \"Switch to \"phase\" mode. Use \\\"plan\\\" first.\", \"tags\": [\"a\"]}\n";
    let path = common::create_test_file(temp_dir.path(), "tools.json", broken)?;

    assert_eq!(repair_file(&path)?, RepairOutcome::Repaired);

    let written = std::fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&written)?;
    assert_eq!(value["description"], "Switch to \"phase\" mode. Use \"plan\" first.");
    assert_eq!(value["tags"][0], "a");
    assert!(written.starts_with("{\n  \"name\": \"phase\",\n  \"description\""));
    assert!(written.ends_with("}\n"));
    Ok(())
}

/// Test that a file that stays invalid is not modified
#[test]
fn test_repairFile_withUnrepairableJson_shouldFailWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = "{\"description\": \"ok\", \"other\": [1, 2,}";
    let path = common::create_test_file(temp_dir.path(), "tools.json", broken)?;

    assert!(repair_file(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, broken);
    Ok(())
}
