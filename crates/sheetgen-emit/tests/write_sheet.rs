//! End-to-end tests for writing decoded sheets to disk

use std::fs;

use pretty_assertions::assert_eq;
use sheetgen_core::{decode_sheet, Sheet, Value};
use sheetgen_emit::{json, EmitError, EmitOptions, OutputWriter};

fn items_sheet() -> Sheet {
    Sheet::from_rows(
        "Items",
        vec![
            vec!["desc", "", "", ""],
            vec!["", "id", "price", ""],
            vec!["", "id", "", "icon"],
            vec!["", "number", "number", "string"],
            vec!["START"],
            vec!["", "1", "9.5", "sword.png"],
            vec!["", "2", "12", "shield.png"],
            vec!["END"],
        ],
    )
}

#[test]
fn test_writes_both_views_in_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let json_root = dir.path().join("json");
    let lua_root = dir.path().join("lua");
    let writer = OutputWriter::new(EmitOptions::new(&json_root, &lua_root));

    let views = decode_sheet("items.xlsx", &items_sheet()).unwrap();
    let written = writer.write_sheet("items", "Items", &views).unwrap();
    assert_eq!(written.len(), 4);

    let client_lua = fs::read_to_string(lua_root.join("client/Items.lua")).unwrap();
    assert_eq!(
        client_lua,
        concat!(
            "return {\n",
            "{\n",
            "\t[\"icon\"] = \"sword.png\",\n",
            "\t[\"id\"] = 1,\n",
            "},\n",
            "{\n",
            "\t[\"icon\"] = \"shield.png\",\n",
            "\t[\"id\"] = 2,\n",
            "},\n",
            "}"
        )
    );

    let server_lua = fs::read_to_string(lua_root.join("server/Items.lua")).unwrap();
    assert!(server_lua.contains("[\"price\"] = 9.5,"));
    assert!(server_lua.contains("[\"price\"] = 12,"));
    assert!(!server_lua.contains("icon"));

    let server_json = fs::read_to_string(json_root.join("server/Items.json")).unwrap();
    let records = json::from_str(&server_json).unwrap();
    assert_eq!(records, views.server);
    assert_eq!(records[0]["price"], Value::Float(9.5));
    assert_eq!(records[1]["price"], Value::Int(12));

    let client_json = fs::read_to_string(json_root.join("client/Items.json")).unwrap();
    assert_eq!(
        client_json,
        r#"[{"icon":"sword.png","id":1},{"icon":"shield.png","id":2}]"#
    );
}

#[test]
fn test_disabled_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let lua_root = dir.path().join("lua");
    let writer = OutputWriter::new(EmitOptions::new("", &lua_root));

    let views = decode_sheet("items.xlsx", &items_sheet()).unwrap();
    let written = writer.write_sheet("items", "Items", &views).unwrap();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|p| p.starts_with(&lua_root)));
    assert!(!dir.path().join("json").exists());
}

#[test]
fn test_rewrite_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(EmitOptions::new(
        dir.path().join("json"),
        dir.path().join("lua"),
    ));
    let views = decode_sheet("items.xlsx", &items_sheet()).unwrap();

    let first: Vec<Vec<u8>> = writer
        .write_sheet("items", "Items", &views)
        .unwrap()
        .iter()
        .map(|p| fs::read(p).unwrap())
        .collect();
    let second: Vec<Vec<u8>> = writer
        .write_sheet("items", "Items", &views)
        .unwrap()
        .iter()
        .map(|p| fs::read(p).unwrap())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_create_dir_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("json");
    fs::write(&blocker, b"not a directory").unwrap();

    let writer = OutputWriter::new(EmitOptions::new(&blocker, ""));
    let views = decode_sheet("items.xlsx", &items_sheet()).unwrap();
    let err = writer.write_sheet("items", "Items", &views).unwrap_err();
    assert!(matches!(err, EmitError::CreateDir { .. }));
}
