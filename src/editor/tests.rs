// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::DiagramStore;
use crate::format::mermaid::export_flowchart;
use crate::model::{fixtures, Diagram, EdgeId, NodeId, NodeKind, Position, Viewport};
use crate::ops::{ApplyError, Op};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

struct RecordingStore {
    store: DiagramStore,
    seen: Arc<Mutex<Vec<Diagram>>>,
}

impl RecordingStore {
    fn notifications(&self) -> usize {
        self.seen.lock().expect("seen lock").len()
    }

    fn last_seen(&self) -> Option<Diagram> {
        self.seen.lock().expect("seen lock").last().cloned()
    }
}

fn recording(diagram: Diagram) -> RecordingStore {
    let mut store = DiagramStore::new(diagram);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |diagram| sink.lock().expect("seen lock").push(diagram.clone()));
    RecordingStore { store, seen }
}

#[fixture]
fn empty() -> RecordingStore {
    recording(Diagram::default())
}

#[fixture]
fn example() -> RecordingStore {
    recording(fixtures::action_to_state())
}

#[rstest]
fn add_node_defaults_label_from_current_kind_count(mut empty: RecordingStore) {
    let first = empty.store.add_node(NodeKind::Action, Position::default(), None);
    let state = empty.store.add_node(NodeKind::State, Position::default(), None);
    let second = empty.store.add_node(NodeKind::Action, Position::default(), None);

    let diagram = empty.store.diagram();
    assert_eq!(diagram.node(&first).expect("first").label(), "Action 1");
    assert_eq!(diagram.node(&state).expect("state").label(), "State 1");
    assert_eq!(diagram.node(&second).expect("second").label(), "Action 2");
    assert_eq!(empty.notifications(), 3);
    assert_eq!(empty.store.rev(), 3);
}

#[rstest]
fn default_label_ordinals_repeat_after_deletion(mut empty: RecordingStore) {
    let first = empty.store.add_node(NodeKind::Choice, Position::default(), None);
    let second = empty.store.add_node(NodeKind::Choice, Position::default(), None);
    assert!(empty.store.remove_node(&first));

    let third = empty.store.add_node(NodeKind::Choice, Position::default(), None);

    let diagram = empty.store.diagram();
    assert_eq!(diagram.node(&second).expect("second").label(), "Choice 2");
    assert_eq!(diagram.node(&third).expect("third").label(), "Choice 2");
    assert_ne!(second, third);
}

#[rstest]
fn explicit_label_is_used_verbatim(mut empty: RecordingStore) {
    let node_id = empty
        .store
        .add_node(NodeKind::State, Position::new(4.0, 2.0), Some("Waiting".to_owned()));
    let node = empty.store.diagram().node(&node_id).expect("node");
    assert_eq!(node.label(), "Waiting");
    assert_eq!(node.position(), Position::new(4.0, 2.0));
}

#[rstest]
fn duplicate_add_edge_is_a_silent_no_op(mut example: RecordingStore) {
    assert!(example.store.rename_edge(&eid("n1-n2"), "first"));
    let before = example.notifications();

    let edge_id = example
        .store
        .add_edge(&nid("n1"), &nid("n2"))
        .expect("duplicate add_edge");

    assert_eq!(edge_id, eid("n1-n2"));
    assert_eq!(example.store.diagram().edges().len(), 1);
    assert_eq!(example.store.diagram().edges()[0].label(), Some("first"));
    assert_eq!(example.notifications(), before);
}

#[test]
fn add_edge_reuses_an_existing_edge_for_the_pair_under_any_id() {
    let mut diagram = fixtures::action_to_state();
    diagram.edges_mut()[0] = crate::model::Edge::new(eid("loaded"), nid("n1"), nid("n2"));
    let mut loaded = recording(diagram);

    let edge_id = loaded
        .store
        .add_edge(&nid("n1"), &nid("n2"))
        .expect("duplicate add_edge");

    assert_eq!(edge_id, eid("loaded"));
    assert_eq!(loaded.store.diagram().edges().len(), 1);
    assert_eq!(loaded.notifications(), 0);
}

#[rstest]
fn add_edge_to_missing_node_is_rejected_without_notifying(mut example: RecordingStore) {
    let err = example.store.add_edge(&nid("n1"), &nid("ghost")).unwrap_err();
    assert_eq!(err, ApplyError::MissingNode { node_id: nid("ghost") });
    assert_eq!(example.notifications(), 0);
}

#[rstest]
fn rename_unknown_ids_is_a_no_op(mut example: RecordingStore) {
    assert!(!example.store.rename_node(&nid("missing"), "x"));
    assert!(!example.store.rename_edge(&eid("missing"), "x"));
    assert!(!example.store.move_node(&nid("missing"), Position::default()));
    assert!(!example.store.remove_edge(&eid("missing")));
    assert_eq!(example.notifications(), 0);
    assert_eq!(example.store.rev(), 0);
}

#[rstest]
fn rename_edge_with_empty_label_clears_it(mut example: RecordingStore) {
    assert!(example.store.rename_edge(&eid("n1-n2"), "yes"));
    assert!(export_flowchart(example.store.diagram()).contains("-->|yes|"));

    assert!(example.store.rename_edge(&eid("n1-n2"), ""));
    assert_eq!(example.store.diagram().edges()[0].label(), None);
}

#[rstest]
fn removing_an_endpoint_drops_its_edge_lines(mut example: RecordingStore) {
    assert!(example.store.remove_node(&nid("n2")));

    let mermaid = export_flowchart(example.store.diagram());
    assert!(!mermaid.contains("-->"));
    assert!(example.store.diagram().edges().is_empty());
    assert_eq!(example.notifications(), 1);
}

#[rstest]
fn split_edge_inserts_node_between_endpoints(mut example: RecordingStore) {
    let node_count = example.store.diagram().nodes().len();

    let new_id = example
        .store
        .split_edge(&eid("n1-n2"), NodeKind::State, Position::new(0.0, 60.0))
        .expect("split");

    let diagram = example.store.diagram();
    assert_eq!(diagram.nodes().len(), node_count + 1);
    assert_eq!(diagram.node(&new_id).expect("new node").label(), "State 2");
    let edge_ids = diagram
        .edges()
        .iter()
        .map(|edge| edge.edge_id().clone())
        .collect::<Vec<_>>();
    assert_eq!(
        edge_ids,
        vec![
            EdgeId::between(&nid("n1"), &new_id),
            EdgeId::between(&new_id, &nid("n2")),
        ]
    );
    assert!(!diagram.contains_edge(&eid("n1-n2")));
    assert_eq!(example.notifications(), 1);
}

#[rstest]
fn split_unknown_edge_returns_none(mut example: RecordingStore) {
    let result = example
        .store
        .split_edge(&eid("nope"), NodeKind::Action, Position::default());
    assert_eq!(result, None);
    assert_eq!(example.store.diagram(), &fixtures::action_to_state());
    assert_eq!(example.notifications(), 0);
}

#[rstest]
fn batch_apply_notifies_once(mut empty: RecordingStore) {
    empty
        .store
        .apply(&[
            Op::AddNode {
                node_id: nid("a"),
                kind: NodeKind::Action,
                label: "A".to_owned(),
                position: Position::default(),
            },
            Op::AddNode {
                node_id: nid("b"),
                kind: NodeKind::State,
                label: "B".to_owned(),
                position: Position::default(),
            },
        ])
        .expect("apply");

    assert_eq!(empty.notifications(), 1);
    assert_eq!(empty.last_seen().expect("seen").nodes().len(), 2);
}

#[rstest]
fn set_viewport_and_clear_notify_only_on_change(mut example: RecordingStore) {
    example.store.set_viewport(0.0, 0.0, 1.0);
    assert_eq!(example.notifications(), 0);

    example.store.set_viewport(10.0, -5.0, 2.0);
    assert_eq!(example.notifications(), 1);
    assert_eq!(
        example.last_seen().expect("seen").viewport(),
        Viewport::new(10.0, -5.0, 2.0)
    );

    example.store.clear();
    example.store.clear();
    assert_eq!(example.notifications(), 2);
    assert!(example.store.diagram().is_empty());
    assert_eq!(example.store.diagram().viewport(), Viewport::new(10.0, -5.0, 2.0));
}

#[test]
fn subscribers_run_in_registration_order_and_can_unsubscribe() {
    let mut store = DiagramStore::default();
    let order = Arc::new(Mutex::new(Vec::<&'static str>::new()));

    let first_sink = order.clone();
    let first = store.subscribe(move |_| first_sink.lock().expect("order").push("first"));
    let second_sink = order.clone();
    store.subscribe(move |_| second_sink.lock().expect("order").push("second"));

    store.add_node(NodeKind::Action, Position::default(), None);
    assert!(store.unsubscribe(first));
    assert!(!store.unsubscribe(first));
    store.add_node(NodeKind::Action, Position::default(), None);

    assert_eq!(*order.lock().expect("order"), vec!["first", "second", "second"]);
}
