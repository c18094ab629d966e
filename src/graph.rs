use crate::catalog::{PredicateEdge, TableSchema};
use serde::Serialize;

/// Focal table used when the catalog has no tables at all.
pub const FALLBACK_FOCAL: &str = "event";

/// Node/edge list in the element shape the renderer consumes:
/// `{"nodes": [{"data": {...}}], "edges": [{"data": {...}}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<Element<NodeData>>,
    pub edges: Vec<Element<EdgeData>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub source_field: String,
    pub target_field: String,
}

impl GraphData {
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.data.id.as_str())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One node per schema and one edge per predicate, both in input order.
/// Endpoints are not checked against the node list.
pub fn build_graph_data(schemas: &[TableSchema], edges: &[PredicateEdge]) -> GraphData {
    let nodes = schemas
        .iter()
        .map(|s| Element {
            data: NodeData { id: s.name.clone() },
        })
        .collect();

    let edges = edges
        .iter()
        .enumerate()
        .map(|(index, p)| Element {
            data: EdgeData {
                id: format!(
                    "{}_{}_{}_{}_{}",
                    p.subject_table, p.subject_field, p.related_table, p.related_field, index
                ),
                source: p.subject_table.clone(),
                target: p.related_table.clone(),
                label: p.predicate.clone(),
                source_field: format!("{}.{}", p.subject_table, p.subject_field),
                target_field: format!("{}.{}", p.related_table, p.related_field),
            },
        })
        .collect();

    GraphData { nodes, edges }
}

pub fn focal_table(schemas: &[TableSchema]) -> String {
    schemas
        .first()
        .map(|s| s.name.clone())
        .unwrap_or_else(|| FALLBACK_FOCAL.to_string())
}
