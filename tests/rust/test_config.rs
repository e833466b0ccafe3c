use super::*;
use crate::model::types::EdgeStyle;

#[test]
fn test_defaults() {
    let c = EditorConfig::new();
    assert_eq!(c.store.node_offset, 100.0);
    assert!(!c.store.validate_edges);
    assert_eq!(c.layout.node_sep, 50.0);
    assert_eq!(c.layout.rank_sep, 50.0);
    assert_eq!(c.view.windowed_width, 800);
    assert_eq!(c.view.windowed_height, 400);
    assert_eq!(c.view.delete_key, "Delete");
}

#[test]
fn test_partial_json_keeps_defaults() {
    let c = EditorConfig::from_json_str(r#"{"layout": {"rank_sep": 80}}"#).unwrap();
    assert_eq!(c.layout.rank_sep, 80.0);
    assert_eq!(c.layout.node_sep, 50.0);
    assert_eq!(c.store.node_offset, 100.0);
}

#[test]
fn test_edge_style_is_not_configurable() {
    let c = EditorConfig::from_json_str(
        r#"{"store": {"node_offset": 60, "edge_style": {"curve": "bezier", "strokeWidth": 3}}}"#,
    )
    .unwrap();
    assert_eq!(c.store.node_offset, 60.0);

    let mut store = crate::store::GraphStore::new(c.store);
    let id = store.add_edge("1", "2");
    assert_eq!(store.edge(&id).unwrap().style, EdgeStyle::default());
}

#[test]
fn test_rejects_non_positive_node_box() {
    let err = EditorConfig::from_json_str(r#"{"layout": {"node_width": 0}}"#).unwrap_err();
    assert!(matches!(err, EditorError::Config(_)));
}

#[test]
fn test_rejects_malformed_json() {
    let err = EditorConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, EditorError::Json(_)));
}

#[test]
fn test_load_missing_file() {
    let err = EditorConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, EditorError::Io(_)));
}
