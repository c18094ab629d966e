use dwcdp_explorer::catalog::Dataset;
use dwcdp_explorer::datapackage::{ImportError, ImportMode};
use dwcdp_explorer::graph::FALLBACK_FOCAL;
use dwcdp_explorer::session::Session;
use dwcdp_explorer::ui::Category;
use pretty_assertions::assert_eq;

fn session(mode: ImportMode) -> Session {
    Session::new(Dataset::bundled().unwrap(), mode)
}

#[test]
fn bundled_graph_has_only_renderable_edges() {
    let s = session(ImportMode::Filter);
    let graph = s.graph();
    let ids: std::collections::HashSet<&str> = graph.node_ids().collect();

    assert_eq!(graph.nodes.len(), s.dataset().schemas.len());
    assert!(!graph.edges.is_empty());
    assert!(graph
        .edges
        .iter()
        .all(|e| ids.contains(e.data.source.as_str()) && ids.contains(e.data.target.as_str())));
    assert_eq!(s.focal(), "agent");
}

#[test]
fn filter_upload_keeps_curated_predicates() {
    let mut s = session(ImportMode::Filter);
    s.upload(r#"{"resources": [{"name": "event"}, {"name": "agent"}, {"name": "unknown-table"}]}"#)
        .unwrap();

    let names: Vec<&str> = s.dataset().schemas.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["agent", "event"]);
    assert_eq!(s.focal(), "agent");

    let graph = s.graph();
    let labels: Vec<&str> = graph.edges.iter().map(|e| e.data.label.as_str()).collect();
    assert_eq!(labels, vec!["happened during", "conducted by", "georeferenced by"]);
}

#[test]
fn filter_upload_keeps_documentation() {
    let mut s = session(ImportMode::Filter);
    s.upload(r#"{"resources": [{"name": "agent"}]}"#).unwrap();

    let agent = s.describe("agent").unwrap();
    assert_eq!(agent.title, "Agent");
    assert!(agent.url.ends_with("#Agent"));
}

#[test]
fn malformed_upload_leaves_graph_unchanged() {
    let mut s = session(ImportMode::Filter);
    let before = s.graph();

    let err = s.upload(r#"{"foo": 1}"#).unwrap_err();
    assert!(matches!(err, ImportError::MissingResources));
    assert_eq!(err.to_string(), "Invalid datapackage.json: missing 'resources'");

    assert_eq!(s.graph(), before);
    assert_eq!(s.focal(), "agent");
}

#[test]
fn empty_upload_falls_back() {
    let mut s = session(ImportMode::Resynthesize);
    s.upload(r#"{"resources": []}"#).unwrap();

    let graph = s.graph();
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
    assert_eq!(s.focal(), FALLBACK_FOCAL);
}

#[test]
fn ui_state_after_upload() {
    let mut s = session(ImportMode::Resynthesize);
    s.upload(r#"{"resources": [{"name": "agent-identifier"}, {"name": "survey"}]}"#)
        .unwrap();

    let links = s.bundled_links();
    let state = s.ui_state(&links);

    assert_eq!(state.enabled_categories(), vec![Category::Agent, Category::Identifier]);
    assert_eq!(state.link_enabled("survey"), Some(true));
    assert_eq!(state.link_enabled("event"), Some(false));
    assert_eq!(state.links.len(), s.bundled().schemas.len());
}

#[test]
fn resynthesized_graph_json() {
    let mut s = session(ImportMode::Resynthesize);
    s.upload(
        r#"{"resources": [
            {"name": "event", "schema": {"foreignKeys": [
                {"fields": "parentEventID", "reference": {"resource": "event", "fields": "eventID"}}
            ]}}
        ]}"#,
    )
    .unwrap();

    let json: serde_json::Value = serde_json::from_str(&s.graph().to_json().unwrap()).unwrap();
    let expected = serde_json::json!({
        "nodes": [{"data": {"id": "event"}}],
        "edges": [{"data": {
            "id": "event_parentEventID_event_eventID_0",
            "source": "event",
            "target": "event",
            "label": "parentEventID → eventID",
            "source_field": "event.parentEventID",
            "target_field": "event.eventID"
        }}]
    });
    assert_eq!(json, expected);
}

#[test]
fn null_and_external_schema_members_are_tolerated() {
    let raw = r#"{"resources": [
        {"name": "event", "schema": {"fields": null, "foreignKeys": null}},
        {"name": "agent", "schema": "https://example.org/agent.json"},
        {"name": "event", "schema": {"title": "Duplicate"}}
    ]}"#;

    let mut filtered = session(ImportMode::Filter);
    filtered.upload(raw).unwrap();
    let names: Vec<&str> = filtered.dataset().schemas.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["agent", "event"]);

    let mut rebuilt = session(ImportMode::Resynthesize);
    rebuilt.upload(raw).unwrap();
    let graph = rebuilt.graph();
    let ids: Vec<&str> = graph.node_ids().collect();
    assert_eq!(ids, vec!["event", "agent"]);
    assert!(graph.edges.is_empty());
    assert_eq!(rebuilt.describe("event").unwrap().title, "event");
}
