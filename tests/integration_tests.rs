//! Integration tests for the inv CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an inv command running inside `tmp`
fn inv(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("inv").unwrap();
    cmd.current_dir(tmp.path())
        .env_remove("INV_DATA_DIR")
        .env_remove("INV_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to add an item, creating its location on the way
fn add_item(tmp: &TempDir, number: &str, name: &str, quantity: &str, location: &str) {
    inv(tmp)
        .args([
            "add",
            "--inventory-number",
            number,
            "--name",
            name,
            "--quantity",
            quantity,
            "--location",
            location,
            "--create-location",
        ])
        .assert()
        .success();
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("labels"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("inv"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp).arg("frobnicate").assert().failure();
}

// ============================================================================
// Item Tests
// ============================================================================

#[test]
fn test_list_empty_inventory() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No items found."));
}

#[test]
fn test_add_writes_data_files() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args([
            "add",
            "--inventory-number",
            "A-1",
            "--name",
            "Widget",
            "--quantity",
            "5",
            "--location",
            "Shelf1",
            "--create-location",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added item 1"));

    let items = fs::read_to_string(tmp.path().join("inventory.json")).unwrap();
    assert!(items.contains("\"InventoryNumber\": \"A-1\""));
    assert!(items.contains("\"Name\": \"Widget\""));

    let locations = fs::read_to_string(tmp.path().join("locations.json")).unwrap();
    assert!(locations.contains("Shelf1"));
}

#[test]
fn test_add_unknown_location_requires_flag() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args([
            "add",
            "--inventory-number",
            "A-1",
            "--name",
            "Widget",
            "--location",
            "Nowhere",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!tmp.path().join("inventory.json").exists());
}

#[test]
fn test_add_rejects_negative_quantity() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args([
            "add",
            "--inventory-number",
            "A-1",
            "--name",
            "Widget",
            "--quantity",
            "-3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative"));
}

#[test]
fn test_add_requires_name() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["add", "--inventory-number", "A-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is required"));
}

#[test]
fn test_ids_are_sequential() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf1");

    let out = stdout_of(inv(&tmp).args(["list", "--format", "id"]));
    assert_eq!(out, "1\n2\n");
}

#[test]
fn test_list_shows_items_and_count() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf2");

    inv(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget"))
        .stdout(predicate::str::contains("Gadget"))
        .stdout(predicate::str::contains("2 item(s) found."));

    inv(&tmp)
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_list_search_filters_by_text() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf1");

    let out = stdout_of(inv(&tmp).args(["list", "--search", "wid", "--format", "id"]));
    assert_eq!(out, "1\n");

    inv(&tmp)
        .args(["list", "--search", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Displaying 0 of 2 items."));
}

#[test]
fn test_list_location_filter() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf2");

    let out = stdout_of(inv(&tmp).args(["list", "--location", "shelf2", "--format", "id"]));
    assert_eq!(out, "2\n");
}

#[test]
fn test_list_descending_inventory_number() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf1");

    let out = stdout_of(inv(&tmp).args([
        "list",
        "--sort",
        "inventory-number",
        "-r",
        "--format",
        "csv",
        "--columns",
        "inventory-number",
    ]));
    assert_eq!(out, "inventory-number\nA-2\nA-1\n");
}

#[test]
fn test_list_json_output() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");

    let out = stdout_of(inv(&tmp).args(["list", "--format", "json"]));
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["Name"], "Widget");
    assert_eq!(parsed[0]["Quantity"], 5);
}

#[test]
fn test_show_item() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");

    inv(&tmp)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget"))
        .stdout(predicate::str::contains("Shelf1"));
}

#[test]
fn test_show_missing_item_fails() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("42"));
}

#[test]
fn test_edit_item() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");

    inv(&tmp)
        .args(["edit", "1", "--quantity", "9", "--name", "Big Widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated item 1"));

    let out = stdout_of(inv(&tmp).args(["show", "1", "--format", "json"]));
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["Quantity"], 9);
    assert_eq!(parsed["Name"], "Big Widget");
}

#[test]
fn test_edit_with_same_values_is_no_change() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    let before = fs::read_to_string(tmp.path().join("inventory.json")).unwrap();

    inv(&tmp)
        .args(["edit", "1", "--quantity", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));

    let after = fs::read_to_string(tmp.path().join("inventory.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_edit_without_fields_fails() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    inv(&tmp).args(["edit", "1"]).assert().failure();
}

#[test]
fn test_delete_item() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf1");

    inv(&tmp)
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted item 1"));

    let out = stdout_of(inv(&tmp).args(["list", "--format", "id"]));
    assert_eq!(out, "2\n");

    inv(&tmp).args(["delete", "1", "--yes"]).assert().failure();
}

#[test]
fn test_find_by_name_and_number() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "ASSET-001", "Laptop", "1", "Office");
    add_item(&tmp, "ASSET-001", "Monitor", "2", "Office");
    add_item(&tmp, "TOOL-9", "Drill", "1", "Garage");

    let out = stdout_of(inv(&tmp).args(["find", "name", "LAP", "--format", "id"]));
    assert_eq!(out, "1\n");

    let out = stdout_of(inv(&tmp).args(["find", "number", "asset", "--format", "id"]));
    assert_eq!(out, "1\n2\n");

    inv(&tmp)
        .args(["find", "name", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items"));
}

// ============================================================================
// Location Tests
// ============================================================================

#[test]
fn test_location_add_and_list() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp).args(["location", "add", "Shelf2"]).assert().success();
    inv(&tmp).args(["location", "add", "bin"]).assert().success();

    let out = stdout_of(inv(&tmp).args(["location", "list", "--format", "id"]));
    assert_eq!(out, "bin\nShelf2\n");
}

#[test]
fn test_location_add_duplicate_fails() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp).args(["location", "add", "Shelf1"]).assert().success();
    inv(&tmp)
        .args(["location", "add", "shelf1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_location_remove_keeps_item_text() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");

    inv(&tmp)
        .args(["location", "remove", "SHELF1", "--yes"])
        .assert()
        .success();

    let out = stdout_of(inv(&tmp).args(["location", "list", "--format", "id"]));
    assert_eq!(out, "");

    let out = stdout_of(inv(&tmp).args(["show", "1", "--format", "json"]));
    assert!(out.contains("Shelf1"));
}

// ============================================================================
// CSV Tests
// ============================================================================

#[test]
fn test_export_and_import_csv() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    add_item(&tmp, "A-2", "Gadget", "2", "Shelf2");

    inv(&tmp)
        .args(["export", "out.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 item(s)"));

    let csv = fs::read_to_string(tmp.path().join("out.csv")).unwrap();
    assert!(csv.starts_with("Id,InventoryNumber,Name,Description,Quantity,Location,LastUpdated"));
    assert!(csv.contains("A-2,Gadget"));

    let other = TempDir::new().unwrap();
    fs::copy(tmp.path().join("out.csv"), other.path().join("in.csv")).unwrap();
    inv(&other)
        .args(["import", "in.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Items imported:   2"));

    let out = stdout_of(inv(&other).args(["location", "list", "--format", "id"]));
    assert_eq!(out, "Shelf1\nShelf2\n");
}

#[test]
fn test_import_appends_with_new_ids() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    fs::write(
        tmp.path().join("more.csv"),
        "inventory_number,name,quantity,location\nB-1,Bolt,100,Bin\n",
    )
    .unwrap();

    inv(&tmp).args(["import", "more.csv"]).assert().success();

    let out = stdout_of(inv(&tmp).args(["list", "--format", "id"]));
    assert_eq!(out, "1\n2\n");
}

#[test]
fn test_import_bad_row_aborts() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.csv"),
        "InventoryNumber,Name,Quantity\nA-1,Widget,5\nA-2,Gadget,lots\n",
    )
    .unwrap();

    inv(&tmp)
        .args(["import", "bad.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 3"));

    assert!(!tmp.path().join("inventory.json").exists());
}

#[test]
fn test_import_skip_errors() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.csv"),
        "InventoryNumber,Name,Quantity\nA-1,Widget,5\nA-2,Gadget,lots\n",
    )
    .unwrap();

    inv(&tmp)
        .args(["import", "bad.csv", "--skip-errors"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Row 3"));

    let out = stdout_of(inv(&tmp).args(["list", "--count"]));
    assert_eq!(out, "1\n");
}

#[test]
fn test_import_dry_run_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("in.csv"),
        "InventoryNumber,Name\nA-1,Widget\n",
    )
    .unwrap();

    inv(&tmp)
        .args(["import", "in.csv", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"));

    assert!(!tmp.path().join("inventory.json").exists());
}

// ============================================================================
// Label Tests
// ============================================================================

#[test]
fn test_labels_to_stdout() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "ASSET-001", "Laptop", "1", "Office");
    add_item(&tmp, "TOOL-9", "Drill", "1", "Garage");

    inv(&tmp)
        .args(["labels", "--location", "office"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Laptop"))
        .stdout(predicate::str::contains("Drill").not())
        .stdout(predicate::str::contains("1 label(s)"));
}

#[test]
fn test_labels_to_file() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "ASSET-001", "Laptop", "1", "Office");

    inv(&tmp)
        .args(["labels", "--pattern", "asset", "--output", "labels.txt"])
        .assert()
        .success();

    let sheet = fs::read_to_string(tmp.path().join("labels.txt")).unwrap();
    assert!(sheet.contains("ASSET-001"));
}

#[test]
fn test_labels_empty_selection_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["labels", "--location", "Nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items to label"));
}

#[test]
fn test_labels_location_conflicts_with_pattern() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["labels", "--location", "a", "--pattern", "b"])
        .assert()
        .failure();
}

// ============================================================================
// Config / Data Dir Tests
// ============================================================================

#[test]
fn test_data_dir_flag() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args([
            "--data-dir",
            "store",
            "location",
            "add",
            "Shelf1",
        ])
        .assert()
        .success();

    assert!(tmp.path().join("store").join("locations.json").exists());
}

#[test]
fn test_local_config_file_sets_format() {
    let tmp = TempDir::new().unwrap();
    add_item(&tmp, "A-1", "Widget", "5", "Shelf1");
    fs::write(tmp.path().join("inv.yaml"), "default_format: id\n").unwrap();

    let out = stdout_of(inv(&tmp).arg("list"));
    assert_eq!(out, "1\n");
}

#[test]
fn test_config_keys() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("data_dir"))
        .stdout(predicate::str::contains("default_sort"))
        .stdout(predicate::str::contains("theme"));
}

#[test]
fn test_config_show_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["config", "show", "author"])
        .assert()
        .failure();
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    inv(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inv"));
}

// ============================================================================
// Damaged Data File Tests
// ============================================================================

const DAMAGED_INVENTORY: &str = r#"[
  {"Id": 1, "InventoryNumber": "A-1", "Name": "Widget", "Quantity": 5, "Location": "Shelf1", "LastUpdated": "2024-05-02T09:30:00Z"},
  {"Id": 2, "InventoryNumber": "A-2", "Name": "Gadget", "Quantity": 1, "Location": "Shelf1", "LastUpdated": "not-a-date"}
]"#;

#[test]
fn test_add_refuses_to_overwrite_malformed_inventory() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventory.json");
    fs::write(&path, DAMAGED_INVENTORY).unwrap();

    inv(&tmp)
        .args([
            "add",
            "--inventory-number",
            "B-1",
            "--name",
            "New",
            "--location",
            "Shelf1",
            "--create-location",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("degraded_load"));

    let after = fs::read_to_string(&path).unwrap();
    assert_eq!(after, DAMAGED_INVENTORY);
    assert!(after.contains("Widget"));
    assert!(!tmp.path().join("locations.json").exists());
}

#[test]
fn test_delete_and_import_refuse_malformed_inventory() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventory.json");
    fs::write(&path, DAMAGED_INVENTORY).unwrap();
    fs::write(
        tmp.path().join("in.csv"),
        "InventoryNumber,Name\nC-1,Clamp\n",
    )
    .unwrap();

    inv(&tmp).args(["delete", "1", "--yes"]).assert().failure();
    inv(&tmp).args(["import", "in.csv"]).assert().failure();

    assert_eq!(fs::read_to_string(&path).unwrap(), DAMAGED_INVENTORY);
}

#[test]
fn test_read_only_commands_survive_malformed_inventory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("inventory.json"), DAMAGED_INVENTORY).unwrap();

    inv(&tmp).arg("list").assert().success();
}
