//! Stresses C8 (Brandes-Kopf placement): deep chains of varying-height
//! nodes sharing layers with wide siblings, so every layer needs real
//! vertical compaction work and block alignment has long chains to walk.
//! As with `crossing_count.rs`, the placer itself is crate-private, so this
//! measures the full `talus::pipeline::layout` run.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;
use talus::{Graph, LayoutConfig, NodeType, PortDirection, PortSide, Size};

#[derive(Clone)]
struct GraphSpec {
    layer_width: usize,
    layer_count: usize,
}

impl GraphSpec {
    fn build(&self) -> Graph {
        let mut g = Graph::new(LayoutConfig::default());

        let mut nodes_per_layer = Vec::with_capacity(self.layer_count);
        for li in 0..self.layer_count {
            let layer = g.push_layer();
            let mut nodes = Vec::with_capacity(self.layer_width);
            for wi in 0..self.layer_width {
                let n = g.add_node(NodeType::Normal);
                // Varying heights so alignment can't trivially agree on a
                // shared row and compaction has to resolve real conflicts.
                let height = 10.0 + ((li * 7 + wi * 3) % 5) as f64 * 8.0;
                g.node_mut(n).size = Size { width: 20.0, height };
                g.push_node_to_layer(n, layer);
                nodes.push(n);
            }
            nodes_per_layer.push(nodes);
        }

        for gap in 0..self.layer_count.saturating_sub(1) {
            let left = &nodes_per_layer[gap];
            let right = &nodes_per_layer[gap + 1];
            let width = left.len().max(right.len());
            for i in 0..width {
                let ln = left[i % left.len()];
                let rn = right[i % right.len()];
                let p = g.add_port(ln, PortSide::East, PortDirection::Output);
                let q = g.add_port(rn, PortSide::West, PortDirection::Input);
                g.add_edge(p, q).unwrap();
            }
        }

        g
    }
}

fn bench_node_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_placement");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("w8_l20", 8usize, 20usize), ("w16_l30", 16usize, 30usize), ("w24_l40", 24usize, 40usize)];

    for (name, width, depth) in cases {
        let spec = GraphSpec { layer_width: width, layer_count: depth };
        group.bench_with_input(BenchmarkId::new("pipeline::layout", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut g| {
                    talus::layout(black_box(&mut g)).unwrap();
                    black_box(g.node_count());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_node_placement);
criterion_main!(benches);
