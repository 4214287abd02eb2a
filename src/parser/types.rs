//! Type Catalog Parser: `■<name>` blocks -> [`TypeDefinition`] records.

use super::result::{DiagnosticSink, Parsed, SkipReason};
use super::CatalogParser;
use crate::model::{Dimension, TypeDefinition};
use crate::source::{normalize_text, SourceFragment};
use regex::Regex;
use std::sync::LazyLock;

const SECTION_MARKER: char = '■';

pub const POINT_TYPE: &str = "点";
pub const ELEMENT_TYPE: &str = "要素";
pub const BOOL_TYPE: &str = "bool";

/// Boilerplate that follows the bool block in the catalog; not part of it
const BOOL_BOILERPLATE: &str = "以下のタイプは全てPythonの型としては文字列。文字列の書式の仕様";

const ENUM_SUFFIX: &str = "のいずれか";
const PERIOD: char = '。';

/// Types whose first description line introduces a list of alternatives
const ENUM_DESCRIPTION_NAMES: [&str; 3] = ["長さ", "角度", "数値"];

/// name -> (canonical_type, py_type)
const TYPE_CANONICAL: &[(&str, &str, &str)] = &[
    ("文字列", "string", "str"),
    ("浮動小数点", "float", "float"),
    ("bool", "bool", "bool"),
    ("整数", "integer", "int"),
    ("長さ", "length", "str"),
    ("角度", "angle", "str"),
    ("数値", "number", "str"),
    ("範囲", "range", "str"),
    ("点", "point", "str"),
    ("方向", "direction", "str"),
    ("平面", "plane", "str"),
    ("変数単位", "unit", "str"),
    ("要素グループ", "element_group", "str"),
    ("材料", "material", "str"),
    ("スイープ方向", "direction", "str"),
    ("厚み付けタイプ", "thicken_type", "str"),
    ("モールド位置", "mold_position", "str"),
    ("オペレーションタイプ （ボディ）", "operation_body", "str"),
    ("関連設定", "relationship", "str"),
    ("形状タイプ", "shape_type", "str"),
    ("形状パラメータ", "shape_parameter", "str"),
    ("要素", "element", "str"),
];

const TYPE_ONE_OF: &[(&str, &[&str])] = &[
    ("長さ", &["millimeter_literal", "variable_reference", "expression"]),
    ("角度", &["degree_literal", "variable_reference", "expression"]),
    ("数値", &["numeric_literal", "variable_reference", "expression"]),
    ("点", &["cartesian_point", "variable_reference", "expression"]),
    ("範囲", &["comma_delimited_range", "variable_reference", "expression"]),
    (
        "要素",
        &["element_id", "element_group", "element_reference", "element_array"],
    ),
];

const ELEMENT_DESCRIPTION: &str = "モデル内の要素を参照する識別子を受け取ります。\n\
- element_id: 既存要素を一意に識別する ID（例: ID@...）。\n\
- element_group: 要素グループ名。複数要素をまとめて参照します。\n\
- element_reference: 操作対象の単一要素を指すラベルや名称。\n\
- element_array: 面リストや辺リストなど、複数要素を配列で指定するケース。";

const POINT_DESCRIPTION: &str =
    "モデル座標系の点を表す値を指定します。数値リテラルのほか、変数参照や式を利用できます。";

/// Used when the point block shows no usable example tuple
const DEFAULT_POINT_EXAMPLES: [&str; 2] = ["0,0,0", "100,200,0"];

static RE_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?[0-9A-Za-z_.]+(?:\s*,\s*-?[0-9A-Za-z_.]+)+").unwrap()
});

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").unwrap());

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Parser for the type catalog document
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeCatalogParser;

impl CatalogParser for TypeCatalogParser {
    type Item = TypeDefinition;

    fn parse(&self, path: &str, text: &str) -> Parsed<TypeDefinition> {
        parse_type_definitions(path, text)
    }
}

/// A `■` block while it is being collected
struct TypeBlock {
    name: String,
    /// 0-based line of the marker
    start: usize,
    /// (0-based line, trimmed text)
    lines: Vec<(usize, String)>,
}

struct TypeCatalogState<'a> {
    path: &'a str,
    lines: Vec<&'a str>,
    current: Option<TypeBlock>,
    definitions: Vec<TypeDefinition>,
    sink: DiagnosticSink,
}

impl<'a> TypeCatalogState<'a> {
    fn new(path: &'a str, text: &'a str) -> Self {
        Self {
            path,
            lines: text.split('\n').collect(),
            current: None,
            definitions: Vec::new(),
            sink: DiagnosticSink::new(path),
        }
    }

    fn process_line(&mut self, index: usize) {
        let line = self.lines[index];
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(name) = line.strip_prefix(SECTION_MARKER) {
            self.flush();
            self.current = Some(TypeBlock {
                name: name.trim().to_string(),
                start: index,
                lines: Vec::new(),
            });
            return;
        }

        match self.current.as_mut() {
            Some(block) => {
                if block.name == BOOL_TYPE && line == BOOL_BOILERPLATE {
                    return;
                }
                block.lines.push((index, line.to_string()));
            }
            None => self.sink.push(index, SkipReason::OutsideTypeBlock, line),
        }
    }

    fn flush(&mut self) {
        let Some(block) = self.current.take() else {
            return;
        };
        let marker = self.lines[block.start].trim();
        if block.name.is_empty() {
            self.sink.push(block.start, SkipReason::UnnamedTypeBlock, marker);
            return;
        }
        let Some(&(end, _)) = block.lines.last() else {
            self.sink.push(block.start, SkipReason::EmptyTypeBlock, marker);
            return;
        };
        if self.definitions.iter().any(|d| d.name == block.name) {
            self.sink.push(block.start, SkipReason::DuplicateTypeBlock, marker);
            return;
        }

        let raw: Vec<String> = block.lines.into_iter().map(|(_, text)| text).collect();
        let mut definition = TypeDefinition::new(block.name, raw.join("\n"));
        definition.source = SourceFragment::from_lines(self.path, &self.lines, block.start, end);
        self.definitions.push(definition);
    }
}

/// Parse the type catalog into definitions, derived point variants included.
pub fn parse_type_definitions(path: &str, text: &str) -> Parsed<TypeDefinition> {
    let normalized = normalize_text(text);
    let mut state = TypeCatalogState::new(path, &normalized);

    for index in 0..state.lines.len() {
        state.process_line(index);
    }
    state.flush();

    let line_count = state.lines.len();
    let mut definitions = Vec::with_capacity(state.definitions.len() + 2);
    for mut definition in state.definitions {
        apply_type_metadata(&mut definition);
        let is_point = definition.name == POINT_TYPE;
        let variants = if is_point {
            build_point_variants(&definition)
        } else {
            Vec::new()
        };
        definitions.push(definition);
        definitions.extend(variants);
    }

    log::info!(
        "[types] {}: {} type definitions, {} diagnostics",
        path,
        definitions.len(),
        state.sink.len()
    );

    Parsed {
        items: definitions,
        diagnostics: state.sink.into_vec(),
        line_count,
    }
}

/// Normalize the description and attach table metadata
pub fn apply_type_metadata(definition: &mut TypeDefinition) {
    let raw = std::mem::take(&mut definition.description);
    definition.description = normalize_description(&definition.name, &raw);

    if let Some((_, canonical, py)) = TYPE_CANONICAL.iter().find(|(n, _, _)| *n == definition.name) {
        definition.canonical_type = Some(canonical.to_string());
        definition.py_type = Some(py.to_string());
    }
    if let Some((_, variants)) = TYPE_ONE_OF.iter().find(|(n, _)| *n == definition.name) {
        definition.one_of = Some(variants.iter().map(|v| v.to_string()).collect());
    }

    if definition.name == ELEMENT_TYPE {
        definition.description = ELEMENT_DESCRIPTION.to_string();
    }
    if definition.name == POINT_TYPE {
        definition.examples = extract_point_examples(&raw);
        definition.description = POINT_DESCRIPTION.to_string();
    }
}

fn normalize_description(name: &str, description: &str) -> String {
    let mut lines: Vec<String> = description
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if ENUM_DESCRIPTION_NAMES.contains(&name) {
        if let Some(first) = lines.first_mut() {
            let mut head = first.trim_end_matches(PERIOD).to_string();
            if !head.contains(ENUM_SUFFIX) {
                head.push_str(ENUM_SUFFIX);
            }
            head.push(PERIOD);
            *first = head;
        }
    }

    lines.join("\n")
}

/// Comma-separated coordinate tuples found in the block text.
///
/// Every component must be a plain number or a bare identifier; tuples with
/// two or three components are kept, in order, without duplicates.
pub fn extract_point_examples(text: &str) -> Vec<String> {
    let mut examples: Vec<String> = Vec::new();
    for m in RE_TUPLE.find_iter(text) {
        let components: Vec<&str> = m.as_str().split(',').map(str::trim).collect();
        if !(2..=3).contains(&components.len()) {
            continue;
        }
        let valid = components
            .iter()
            .all(|c| RE_NUMBER.is_match(c) || RE_IDENT.is_match(c));
        if !valid {
            continue;
        }
        let example = components.join(",");
        if !examples.contains(&example) {
            examples.push(example);
        }
    }

    if examples.is_empty() {
        DEFAULT_POINT_EXAMPLES.iter().map(|e| e.to_string()).collect()
    } else {
        examples
    }
}

/// Examples cut down to `dim` components; 3D drops tuples that are too short
fn examples_for_dimension(examples: &[String], dim: Dimension) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for example in examples {
        let components: Vec<&str> = example.split(',').collect();
        if components.len() < dim.components() {
            continue;
        }
        let truncated = components[..dim.components()].join(",");
        if !out.contains(&truncated) {
            out.push(truncated);
        }
    }
    if out.is_empty() {
        return examples_for_dimension(
            &DEFAULT_POINT_EXAMPLES.map(String::from),
            dim,
        );
    }
    out
}

/// The `(2D)` and `(3D)` variants that follow the base point type
pub fn build_point_variants(base: &TypeDefinition) -> Vec<TypeDefinition> {
    let summary = base
        .description
        .split('\n')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("座標を表す点")
        .trim_end_matches(PERIOD);

    [(Dimension::TwoD, "cartesian_2d"), (Dimension::ThreeD, "cartesian_3d")]
        .into_iter()
        .map(|(dim, token)| TypeDefinition {
            name: format!("{}({})", base.name, dim),
            description: format!("{}（{} 座標）。", summary, dim),
            examples: examples_for_dimension(&base.examples, dim),
            canonical_type: Some("point".to_string()),
            py_type: Some("str".to_string()),
            one_of: Some(vec![
                token.to_string(),
                "variable_reference".to_string(),
                "expression".to_string(),
            ]),
            source: base.source.clone(),
        })
        .collect()
}
