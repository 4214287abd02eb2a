use crate::bundle::Bundle;
use crate::model::ApiEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Object,
    Method,
    Parameter,
    Type,
    TypeDef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    BelongsTo,
    Returns,
    HasParameter,
    HasType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: NodeLabel,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelationship {
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

/// Nodes and relationships ready for a graph store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<GraphRelationship>,
}

impl GraphPayload {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn count_label(&self, label: NodeLabel) -> usize {
        self.nodes.iter().filter(|n| n.label == label).count()
    }
}

/// Node list unique by id; the first insertion wins
#[derive(Default)]
struct NodeSet {
    seen: HashSet<String>,
    nodes: Vec<GraphNode>,
}

impl NodeSet {
    fn insert(&mut self, id: &str, label: NodeLabel, properties: Map<String, Value>) {
        if self.seen.insert(id.to_string()) {
            self.nodes.push(GraphNode {
                id: id.to_string(),
                label,
                properties,
            });
        }
    }

    fn insert_type(&mut self, type_name: &str) {
        if type_name.is_empty() {
            return;
        }
        let id = strip_array(type_name);
        self.insert(id, NodeLabel::Type, props([("name", id.into())]));
    }
}

fn strip_array(type_name: &str) -> &str {
    type_name.strip_suffix("[]").unwrap_or(type_name)
}

fn props<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn relationship(kind: RelationshipType, start: &str, end: &str) -> GraphRelationship {
    GraphRelationship {
        kind,
        start: start.to_string(),
        end: end.to_string(),
        properties: Map::new(),
    }
}

/// Build the graph payload of a bundle.
///
/// Per entry: an `Object` node for its object, a `Method` node, `Type` nodes
/// for the return and parameter types, and a `Parameter` node per parameter
/// (id `<method>:<param>`). Type definitions follow as `TypeDef` nodes.
pub fn build_graph_payload(bundle: &Bundle) -> GraphPayload {
    let mut nodes = NodeSet::default();
    let mut relationships = Vec::new();

    for entry in &bundle.api_entries {
        add_entry(entry, &mut nodes, &mut relationships);
    }

    for type_def in &bundle.type_definitions {
        if type_def.name.is_empty() {
            continue;
        }
        nodes.insert(
            &type_def.name,
            NodeLabel::TypeDef,
            props([
                ("name", type_def.name.as_str().into()),
                ("description", type_def.description.as_str().into()),
            ]),
        );
    }

    log::info!(
        "[index] graph payload: {} nodes, {} relationships",
        nodes.nodes.len(),
        relationships.len()
    );

    GraphPayload {
        nodes: nodes.nodes,
        relationships,
    }
}

fn add_entry(entry: &ApiEntry, nodes: &mut NodeSet, relationships: &mut Vec<GraphRelationship>) {
    let object = entry.object_name.as_deref().filter(|o| !o.is_empty());

    if let Some(object) = object {
        nodes.insert(object, NodeLabel::Object, props([("name", object.into())]));
    }
    nodes.insert(
        &entry.name,
        NodeLabel::Method,
        props([
            ("name", entry.name.as_str().into()),
            ("description", entry.description.as_str().into()),
            ("category", entry.category.as_str().into()),
        ]),
    );
    if let Some(object) = object {
        relationships.push(relationship(RelationshipType::BelongsTo, &entry.name, object));
    }

    nodes.insert_type(&entry.returns.type_name);
    for param in entry.params.iter().chain(&entry.properties) {
        nodes.insert_type(&param.type_name);
    }

    if !entry.returns.type_name.is_empty() {
        let raw_type = entry
            .returns
            .raw_type
            .as_deref()
            .unwrap_or(&entry.returns.type_name);
        let mut returns = relationship(
            RelationshipType::Returns,
            &entry.name,
            strip_array(&entry.returns.type_name),
        );
        returns.properties = props([("raw_type", raw_type.into())]);
        relationships.push(returns);
    }

    for param in &entry.params {
        let param_id = format!("{}:{}", entry.name, param.name);
        let mut properties = props([
            ("name", param.name.as_str().into()),
            ("type", param.type_name.as_str().into()),
            ("position", param.position.into()),
            ("is_required", param.is_required.into()),
        ]);
        if !param.description.is_empty() {
            properties.insert("description".to_string(), param.description.as_str().into());
        }
        if let Some(dim) = param.dimension {
            properties.insert("dimension".to_string(), dim.as_str().into());
        }
        nodes.insert(&param_id, NodeLabel::Parameter, properties);

        relationships.push(relationship(RelationshipType::HasParameter, &entry.name, &param_id));
        relationships.push(relationship(
            RelationshipType::HasType,
            &param_id,
            strip_array(&param.type_name),
        ));
    }
}
