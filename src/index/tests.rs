use super::*;
use crate::bundle::{parse_texts, Bundle};
use crate::model::{ApiEntry, Parameter};
use tempfile::TempDir;

const API_DOC: &str = "\
■シートのメソッド
〇押し出しを作成
返り値：作成した要素IDの配列
CreateExtrude(
  Profile, // 要素：断面（空欄不可）
  Depth, // 長さ：押し出し量
  Points) // 点(2D)(配列)：参照点
〇閉じる
Close()
";

const TYPE_DOC: &str = "\
■長さ
長さの値。
■要素
要素。
";

fn sample_bundle() -> Bundle {
    parse_texts("api.txt", API_DOC, "api_arg.txt", TYPE_DOC).bundle
}

fn entry_with_params(count: usize) -> ApiEntry {
    let mut entry = ApiEntry::function("Many");
    for i in 0..count {
        entry.params.push(Parameter {
            name: format!("p{}", i),
            type_name: "整数".to_string(),
            description: if i == 0 { String::new() } else { format!("値{}", i) },
            position: i,
            ..Parameter::default()
        });
    }
    entry
}

// ============================================================================
// Graph Payload Tests
// ============================================================================

#[test]
fn test_graph_node_labels() {
    let payload = build_graph_payload(&sample_bundle());

    assert_eq!(payload.count_label(NodeLabel::Object), 1);
    assert_eq!(payload.count_label(NodeLabel::Method), 2);
    assert_eq!(payload.count_label(NodeLabel::Parameter), 3);
    assert_eq!(payload.node("シート").unwrap().label, NodeLabel::Object);
    assert_eq!(payload.node("CreateExtrude:Depth").unwrap().label, NodeLabel::Parameter);
}

#[test]
fn test_graph_nodes_are_unique_in_first_insertion_order() {
    let payload = build_graph_payload(&sample_bundle());
    let ids: Vec<&str> = payload.nodes.iter().map(|n| n.id.as_str()).collect();

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());

    assert_eq!(ids[0], "シート");
    assert_eq!(ids[1], "CreateExtrude");
    // "長さ" and "要素" already exist as Type nodes, so no TypeDef duplicates
    assert_eq!(payload.node("長さ").unwrap().label, NodeLabel::Type);
    assert_eq!(payload.count_label(NodeLabel::TypeDef), 0);
}

#[test]
fn test_graph_type_nodes_strip_array_suffix() {
    let payload = build_graph_payload(&sample_bundle());
    assert!(payload.node("点(2D)").is_some());
    assert!(payload.node("点(2D)[]").is_none());

    let has_type = payload
        .relationships
        .iter()
        .find(|r| r.kind == RelationshipType::HasType && r.start == "CreateExtrude:Points")
        .unwrap();
    assert_eq!(has_type.end, "点(2D)");
}

#[test]
fn test_graph_relationships() {
    let payload = build_graph_payload(&sample_bundle());
    let of_kind = |kind| payload.relationships.iter().filter(|r| r.kind == kind).count();

    assert_eq!(of_kind(RelationshipType::BelongsTo), 2);
    assert_eq!(of_kind(RelationshipType::Returns), 2);
    assert_eq!(of_kind(RelationshipType::HasParameter), 3);
    assert_eq!(of_kind(RelationshipType::HasType), 3);

    let returns = payload
        .relationships
        .iter()
        .find(|r| r.kind == RelationshipType::Returns && r.start == "Close")
        .unwrap();
    assert_eq!(returns.end, "void");
    assert_eq!(returns.properties["raw_type"], "void");
}

#[test]
fn test_graph_type_definition_nodes() {
    let mut bundle = sample_bundle();
    bundle.api_entries.clear();
    let payload = build_graph_payload(&bundle);

    assert_eq!(payload.count_label(NodeLabel::TypeDef), 2);
    assert_eq!(payload.node("長さ").unwrap().properties["description"], "長さの値。");
    assert!(payload.relationships.is_empty());
}

#[test]
fn test_graph_serialized_shape() {
    let payload = build_graph_payload(&sample_bundle());
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["relationships"][0]["type"], "BELONGS_TO");
    assert_eq!(json["nodes"][0]["label"], "Object");
    assert!(json["relationships"][0].get("properties").is_none());
}

// ============================================================================
// Vector Chunk Tests
// ============================================================================

#[test]
fn test_vector_chunk_content() {
    let bundle = sample_bundle();
    let chunks = vector_chunks(&bundle.api_entries);
    assert_eq!(chunks.len(), 2);

    let chunk = &chunks[0];
    assert_eq!(chunk.id, "CreateExtrude");
    assert_eq!(chunk.object.as_deref(), Some("シート"));
    assert_eq!(chunk.title.as_deref(), Some("押し出しを作成"));
    assert_eq!(
        chunk.content,
        "Description: 押し出しを作成\n\
         Category: シート\n\
         Return: 作成した要素IDの配列\n\
         - Profile (要素): 断面（空欄不可）\n\
         - Depth (長さ): 押し出し量\n\
         - Points (点(2D)[]): 参照点"
    );
    assert_eq!(chunk.checksum.as_deref(), Some(bundle.api_entries[0].source.checksum.as_str()));
}

#[test]
fn test_vector_chunk_truncates_parameters() {
    let chunks = vector_chunks(&[entry_with_params(8)]);
    let lines: Vec<&str> = chunks[0].content.lines().collect();

    assert_eq!(lines.len(), VECTOR_PARAM_LIMIT + 1);
    assert_eq!(lines[0], "- p0 (整数): No description provided");
    assert_eq!(lines[5], "- p5 (整数): 値5");
    assert_eq!(lines[6], "... (2 more parameters)");
    assert_eq!(chunks[0].checksum, None);
}

#[test]
fn test_write_chunks_jsonl() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("vector_chunks.jsonl");
    let chunks = vector_chunks(&sample_bundle().api_entries);

    write_chunks(&chunks, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    let restored: Vec<VectorChunk> = written
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(restored, chunks);
}
