use super::*;
use crate::model::{Dimension, Parameter, ReturnSpec};
use crate::parser::SkipReason;
use crate::source::{InputUnavailable, SourceFragment};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const API_DOC: &str = "\
■図面のメソッド
〇線を作成
返り値：作成した要素IDの配列
CreateLines(
  Points, // 点(2D)(配列)：通過点
  Closed) // bool：閉じる（空欄可）
〇再描画
Redraw()
";

const TYPE_DOC: &str = "\
■点
座標を指定。例 10,20
■bool
真偽値。
";

fn sample_report() -> BundleReport {
    parse_texts("api.txt", API_DOC, "api_arg.txt", TYPE_DOC)
}

#[test]
fn test_checklist_and_order() {
    let report = sample_report();
    let bundle = &report.bundle;

    assert_eq!(bundle.checklist, vec!["parsed_api_doc", "parsed_api_arg"]);
    let types: Vec<&str> = bundle.type_definitions.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(types, vec!["点", "点(2D)", "点(3D)", "bool"]);
    let entries: Vec<&str> = bundle.api_entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(entries, vec!["CreateLines", "Redraw"]);
    assert!(report.is_clean());
}

#[test]
fn test_array_parameter_and_return() {
    let bundle = sample_report().bundle;
    let entry = bundle.api_entry("CreateLines").unwrap();

    assert_eq!(entry.params[0].type_name, "点(2D)[]");
    assert!(entry.params[0].is_array());
    assert_eq!(entry.params[0].dimension, Some(Dimension::TwoD));
    assert_eq!(entry.returns.type_name, "ID");
    assert!(entry.returns.is_array);
}

#[test]
fn test_round_trip_parsed_bundle() {
    let bundle = sample_report().bundle;
    let json = bundle.to_json().unwrap();
    let restored = Bundle::from_json(&json).unwrap();
    assert_eq!(restored, bundle);
}

#[test]
fn test_round_trip_full_metadata() {
    let mut entry = ApiEntry::function("SetValue");
    entry.notes = Some("注意".to_string());
    entry.properties.push(Parameter {
        name: "Visible".to_string(),
        type_name: "bool".to_string(),
        ..Parameter::default()
    });
    entry.params.push(Parameter {
        name: "Value".to_string(),
        type_name: "長さ".to_string(),
        description: "値（空欄不可）".to_string(),
        is_required: true,
        default_value: Some("10".to_string()),
        position: 0,
        raw_type: "長さ".to_string(),
        dimension: None,
    });
    entry.returns = ReturnSpec {
        type_name: "文字列".to_string(),
        description: "名前".to_string(),
        is_array: true,
        raw_type: Some("文字列(配列)".to_string()),
        void_locked: false,
    };
    entry.source = SourceFragment::from_lines("api.txt", &["SetValue(", "  Value)"], 0, 1);

    let mut type_def = TypeDefinition::new("長さ", "長さの値。");
    type_def.examples = vec!["10".to_string()];
    type_def.canonical_type = Some("length".to_string());
    type_def.py_type = Some("str".to_string());
    type_def.one_of = Some(vec!["millimeter_literal".to_string()]);

    let bundle = Bundle {
        checklist: vec!["parsed_api_doc".to_string()],
        type_definitions: vec![type_def],
        api_entries: vec![entry],
    };

    let restored = Bundle::from_json(&bundle.to_json().unwrap()).unwrap();
    assert_eq!(restored, bundle);
}

#[test]
fn test_optional_fields_omitted() {
    let bundle = Bundle {
        api_entries: vec![ApiEntry::function("Quit")],
        ..Bundle::default()
    };
    let json = bundle.to_json().unwrap();

    assert!(!json.contains("notes"));
    assert!(!json.contains("object_name"));
    assert!(!json.contains("void_locked"));
    assert!(!json.contains("source"));
    assert!(json.contains("\"type\": \"void\""));
}

#[test]
fn test_defaults_restored_on_load() {
    let json = r#"{"api_entries": [{"name": "Quit", "title_jp": "終了"}]}"#;
    let bundle = Bundle::from_json(json).unwrap();

    assert_eq!(bundle.checklist, vec!["parsed_api_doc", "parsed_api_arg"]);
    let entry = &bundle.api_entries[0];
    assert_eq!(entry.title.as_deref(), Some("終了"));
    assert_eq!(entry.entry_type, "function");
    assert_eq!(entry.implementation_status, "implemented");
    assert!(entry.returns.is_void());
    assert!(entry.source.is_empty());
}

#[test]
fn test_dump_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("structured_api.json");
    let bundle = sample_report().bundle;

    dump_bundle(&bundle, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    // Non-ASCII text is written verbatim
    assert!(written.contains("点(2D)"));

    assert_eq!(load_bundle(&path).unwrap(), bundle);
}

#[test]
fn test_load_missing_bundle_fails() {
    let dir = TempDir::new().unwrap();
    let err = load_bundle(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read bundle"));
}

#[test]
fn test_parse_documents_from_disk() {
    let dir = TempDir::new().unwrap();
    let api = dir.path().join("api.txt");
    let arg = dir.path().join("api_arg.txt");
    std::fs::write(&api, API_DOC).unwrap();
    std::fs::write(&arg, TYPE_DOC).unwrap();

    let report = parse_documents(&api, &arg).unwrap();
    assert_eq!(report.bundle.api_entries.len(), 2);
    let source = &report.bundle.api_entries[0].source;
    assert_eq!(source.path, api.to_string_lossy());
}

#[test]
fn test_parse_documents_missing_input() {
    let dir = TempDir::new().unwrap();
    let arg = dir.path().join("api_arg.txt");
    std::fs::write(&arg, TYPE_DOC).unwrap();

    let err = parse_documents(&dir.path().join("api.txt"), &arg).unwrap_err();
    assert!(matches!(err, InputUnavailable::NotFound { .. }));
}

#[test]
fn test_diagnostics_from_both_documents() {
    let report = parse_texts("api.txt", "Foo(\n  ???\n)\n", "api_arg.txt", "前書き\n■点\n");

    let reasons: Vec<SkipReason> = report.diagnostics.iter().map(|d| d.reason).collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::OutsideTypeBlock,
            SkipReason::EmptyTypeBlock,
            SkipReason::UnparsedParameter,
        ]
    );
    assert_eq!(report.diagnostics[2].path, "api.txt");
}

#[test]
fn test_entries_per_object() {
    let bundle = sample_report().bundle;
    let counts = bundle.entries_per_object();
    assert_eq!(counts.get("図面"), Some(&2));
}
