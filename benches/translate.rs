// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use workchart::format::mermaid::{export_flowchart, export_flowchart_with, MermaidOptions, NodeKeying};
use workchart::model::{Diagram, Edge, Node, NodeId, NodeKind, Position, Viewport};
use workchart::store::{decode_snapshot, encode_snapshot};

// Case ids after the `/` stay stable so results remain comparable across refactors.

fn chain(node_count: usize, fan_out: usize, label_len: usize) -> Diagram {
    let kinds = [NodeKind::State, NodeKind::Action, NodeKind::Choice];
    let nodes = (0..node_count)
        .map(|idx| {
            let kind = kinds[idx % kinds.len()];
            let node_id = NodeId::new(format!("{}-{idx}", kind.as_str())).expect("node id");
            let mut label = format!("{} {idx}", kind.display_name());
            while label.len() < label_len {
                label.push_str(" step");
            }
            let position = Position::new((idx % 8) as f64 * 160.0, (idx / 8) as f64 * 120.0);
            Node::new(node_id, kind, label, position)
        })
        .collect::<Vec<_>>();

    let mut edges = Vec::new();
    for idx in 0..node_count {
        for hop in 1..=fan_out {
            let target = idx + hop;
            if target >= node_count {
                break;
            }
            let edge = Edge::between(nodes[idx].node_id().clone(), nodes[target].node_id().clone());
            let label = (hop > 1).then(|| format!("branch {hop}"));
            edges.push(edge.with_label(label));
        }
    }

    Diagram::new(nodes, edges, Viewport::default())
}

fn cases() -> [(&'static str, Diagram); 3] {
    [
        ("small", chain(12, 1, 0)),
        ("medium_dense", chain(200, 3, 0)),
        ("large_long_labels", chain(1_000, 2, 80)),
    ]
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("mermaid.export");
    for (case, diagram) in cases() {
        group.throughput(Throughput::Elements(
            (diagram.nodes().len() + diagram.edges().len()) as u64,
        ));
        group.bench_function(format!("label/{case}"), |b| {
            b.iter(|| black_box(export_flowchart(black_box(&diagram))))
        });
        let options = MermaidOptions {
            keying: NodeKeying::StableId,
        };
        group.bench_function(format!("id/{case}"), |b| {
            b.iter(|| black_box(export_flowchart_with(black_box(&diagram), options)))
        });
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.snapshot");
    for (case, diagram) in cases() {
        let raw = encode_snapshot(&diagram).expect("encode");
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_function(format!("encode/{case}"), |b| {
            b.iter(|| black_box(encode_snapshot(black_box(&diagram)).expect("encode")))
        });
        group.bench_function(format!("decode/{case}"), |b| {
            b.iter(|| black_box(decode_snapshot(black_box(&raw)).expect("decode")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_export, bench_snapshot);
criterion_main!(benches);
