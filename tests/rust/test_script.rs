use super::*;
use crate::config::EditorConfig;

fn commands(src: &str) -> Vec<Command> {
    parse(src).unwrap().into_iter().map(|l| l.command).collect()
}

// ── parsing ──────────────────────────────────────────────────────────────

#[test]
fn test_parse_skips_comments_and_blanks() {
    let lines = parse("# header\n\nadd A\n   \n# trailing").unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].number, 3);
    assert_eq!(lines[0].command, Command::Add("A".into()));
}

#[test]
fn test_parse_add_keeps_spaces_and_unquotes() {
    assert_eq!(
        commands("add the slopes are the same\nadd \"quoted text\""),
        vec![
            Command::Add("the slopes are the same".into()),
            Command::Add("quoted text".into()),
        ]
    );
}

#[test]
fn test_parse_connect_forms() {
    assert_eq!(
        commands("connect 1 2\nconnect 2 -> 3"),
        vec![
            Command::Connect("1".into(), "2".into()),
            Command::Connect("2".into(), "3".into()),
        ]
    );
}

#[test]
fn test_parse_selection() {
    assert_eq!(
        commands("delete nodes 1 2 edges e3-4\nselect edges e1-2"),
        vec![
            Command::Delete {
                nodes: vec!["1".into(), "2".into()],
                edges: vec!["e3-4".into()],
            },
            Command::Select {
                nodes: vec![],
                edges: vec!["e1-2".into()],
            },
        ]
    );
}

#[test]
fn test_parse_selection_errors() {
    assert!(parse("delete 1").is_err());
    assert!(parse("select nodes 1 nodes 2").is_err());
}

#[test]
fn test_parse_move_layout_key_toggle_fit() {
    assert_eq!(
        commands("move 2 -40 12.5\nlayout lr\nkey Delete\ntoggle minimap\nfit"),
        vec![
            Command::Move("2".into(), Position::new(-40.0, 12.5)),
            Command::Layout(Direction::LeftToRight),
            Command::Key("Delete".into()),
            Command::Toggle(Toggle::Minimap),
            Command::Fit,
        ]
    );
}

#[test]
fn test_parse_error_carries_line_number() {
    let err = parse("add A\nfrobnicate\n").unwrap_err();
    match err {
        EditorError::Script { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("frobnicate"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_bad_direction() {
    let err = parse("layout RL").unwrap_err();
    assert!(matches!(err, EditorError::Script { line: 1, .. }));
}

// ── replay ───────────────────────────────────────────────────────────────

#[test]
fn test_run_builds_graph() {
    let mut editor = DiagramEditor::new(EditorConfig::default());
    let lines = parse("add A\nadd B\nadd C\nconnect 1 2\nconnect 2 3\nlayout TB\nfit").unwrap();
    let replay = run(&mut editor, &lines).unwrap();
    assert_eq!(replay.commands, 7);
    assert_eq!(replay.layouts, 1);
    assert_eq!(replay.fits.len(), 1);
    assert_eq!(editor.store().node_count(), 3);
    assert_eq!(editor.store().edge_count(), 2);
    assert_eq!(editor.store().node("3").unwrap().position.y, 172.0);
}

#[test]
fn test_run_fit_without_layout_records_nothing() {
    let mut editor = DiagramEditor::new(EditorConfig::default());
    let replay = run(&mut editor, &parse("add A\nfit").unwrap()).unwrap();
    assert!(replay.fits.is_empty());
}

#[test]
fn test_run_select_then_delete_key() {
    let mut editor = DiagramEditor::sample(EditorConfig::default());
    let lines = parse("select nodes 2\nkey Delete").unwrap();
    run(&mut editor, &lines).unwrap();
    assert_eq!(editor.store().node_count(), 2);
    assert_eq!(editor.store().edge_count(), 0);
}

#[test]
fn test_run_delete_command() {
    let mut editor = DiagramEditor::sample(EditorConfig::default());
    run(&mut editor, &parse("delete edges e1-2").unwrap()).unwrap();
    assert_eq!(editor.store().edge_count(), 1);
    assert_eq!(editor.store().node_count(), 3);
}

#[test]
fn test_run_empty_label_fails() {
    let mut editor = DiagramEditor::new(EditorConfig::default());
    let err = run(&mut editor, &parse("add \"\"").unwrap()).unwrap_err();
    assert!(matches!(err, EditorError::Script { line: 1, .. }));
    assert!(editor.store().is_empty());
}

#[test]
fn test_run_toggles() {
    let mut editor = DiagramEditor::new(EditorConfig::default());
    run(&mut editor, &parse("toggle fullscreen\ntoggle controls").unwrap()).unwrap();
    assert!(editor.view().fullscreen);
    assert!(!editor.view().show_controls);
}

#[test]
fn test_replay_script_entry_point() {
    let (editor, replay) =
        crate::replay_script("layout LR\nfit", EditorConfig::default(), true).unwrap();
    assert_eq!(replay.layouts, 1);
    let x = |id: &str| editor.store().node(id).unwrap().position.x;
    assert!(x("1") < x("2"));
    assert!(x("2") < x("3"));
}
