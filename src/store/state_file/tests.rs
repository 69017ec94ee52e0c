// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{decode_table, encode_table, StateFile, StoreError, WriteDurability, STATE_FILE_NAME};
use crate::model::fixtures::maturity_table;
use crate::model::{SelectionState, StateSlot, TableData};

struct StateFileTestCtx {
    _tmp: TempDir,
    file: StateFile,
}

#[fixture]
fn ctx() -> StateFileTestCtx {
    let tmp = tempfile::tempdir().expect("temp dir");
    let file = StateFile::new(tmp.path().join(STATE_FILE_NAME));
    StateFileTestCtx { _tmp: tmp, file }
}

fn populated_table() -> TableData {
    let mut table = maturity_table();
    table.set_slot(0, StateSlot::Current, SelectionState::new(310.5, 80.0, 1));
    table.set_slot(0, StateSlot::Aspirational, SelectionState::new(670.0, 80.0, 3));
    table.set_slot(4, StateSlot::Current, SelectionState::new(490.25, 360.0, 2));
    table
}

#[rstest]
fn save_then_load_round_trips(ctx: StateFileTestCtx) {
    let table = populated_table();
    ctx.file.save(&table).expect("save");
    let loaded = ctx.file.load().expect("load");
    assert_eq!(loaded, table);
}

#[rstest]
fn resaving_a_loaded_document_is_a_fixed_point(ctx: StateFileTestCtx) {
    let handwritten = r#"{
  "headers": ["A", "B"],
  "rows": [
    { "label": "One", "data": ["a", "b"], "currentState": { "x": 350, "y": 300, "cellIndex": 1 } },
    { "label": "Two", "data": ["c", "d"] }
  ]
}"#;
    std::fs::write(ctx.file.path(), handwritten).expect("write");

    let first = ctx.file.load().expect("load");
    ctx.file.save(&first).expect("save");
    let resaved_text = std::fs::read_to_string(ctx.file.path()).expect("read");

    let original: serde_json::Value = serde_json::from_str(handwritten).expect("json");
    let resaved: serde_json::Value = serde_json::from_str(&resaved_text).expect("json");
    assert_eq!(
        serde_json::from_value::<TableData>(original).expect("decode"),
        serde_json::from_value::<TableData>(resaved).expect("decode"),
    );
}

#[rstest]
fn saved_document_is_pretty_printed(ctx: StateFileTestCtx) {
    ctx.file.save(&populated_table()).expect("save");
    let text = std::fs::read_to_string(ctx.file.path()).expect("read");
    assert!(text.starts_with("{\n  \"headers\": ["));
    assert!(text.contains("\"currentState\""));
    assert!(text.contains("\"cellIndex\": 1"));
    assert!(text.ends_with("}\n"));
}

#[rstest]
fn durable_writes_replace_existing_files(ctx: StateFileTestCtx) {
    let file = ctx.file.clone().with_durability(WriteDurability::Durable);
    file.save(&maturity_table()).expect("first save");
    file.save(&populated_table()).expect("second save");
    assert_eq!(file.load().expect("load"), populated_table());

    let leftovers = std::fs::read_dir(file.path().parent().expect("parent"))
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".capmap.tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[rstest]
fn missing_file_reports_io_error(ctx: StateFileTestCtx) {
    let err = ctx.file.load().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[rstest]
fn malformed_file_and_text_report_the_same_decode_error(ctx: StateFileTestCtx) {
    std::fs::write(ctx.file.path(), "{ not json").expect("write");
    let from_file = ctx.file.load().unwrap_err();
    match &from_file {
        StoreError::Decode { path, .. } => assert_eq!(path.as_deref(), Some(ctx.file.path())),
        other => panic!("expected decode error, got {other:?}"),
    }
    assert!(from_file.to_string().contains(STATE_FILE_NAME));

    let from_text = decode_table("{ not json").unwrap_err();
    assert!(matches!(from_text, StoreError::Decode { path: None, .. }));
}

#[rstest]
fn wrongly_typed_document_is_a_decode_error(ctx: StateFileTestCtx) {
    std::fs::write(ctx.file.path(), r#"{"headers":"Strategy","rows":[]}"#).expect("write");
    assert!(matches!(ctx.file.load(), Err(StoreError::Decode { path: Some(_), .. })));
}

#[test]
fn structurally_odd_documents_still_decode() {
    let table = decode_table(r#"{"rows":[{"label":"Only"}],"extra":true}"#).expect("decode");
    assert!(table.headers.is_empty());
    assert_eq!(table.rows[0].label, "Only");
    assert!(table.rows[0].data.is_empty());
}

#[test]
fn encode_then_decode_preserves_states() {
    let table = populated_table();
    let text = encode_table(&table).expect("encode");
    assert_eq!(decode_table(&text).expect("decode"), table);
}
