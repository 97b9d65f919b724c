//! S2 (simple cross) and S5 (dual-port cross on the east side).

use talus::{NodeType, PhaseKind, Pipeline, PortConstraints, PortDirection, PortSide};

#[test]
fn simple_cross_uncrosses_to_reverse_order() {
    let mut g = talus::Graph::new(talus::LayoutConfig::default());
    let a0 = g.add_node(NodeType::Normal);
    let a1 = g.add_node(NodeType::Normal);
    let b0 = g.add_node(NodeType::Normal);
    let b1 = g.add_node(NodeType::Normal);

    let pa0 = g.add_port(a0, PortSide::East, PortDirection::Output);
    let pa1 = g.add_port(a1, PortSide::East, PortDirection::Output);
    let qb1 = g.add_port(b1, PortSide::West, PortDirection::Input);
    let qb0 = g.add_port(b0, PortSide::West, PortDirection::Input);
    g.add_edge(pa0, qb1).unwrap();
    g.add_edge(pa1, qb0).unwrap();

    Pipeline::default().run_until(&mut g, PhaseKind::NodeOrdering).unwrap();

    let la = g.layer_index_of(a0).unwrap();
    let lb = g.layer_index_of(b0).unwrap();
    assert_eq!(g.layer(talus::LayerId(la as u32)).nodes(), &[a0, a1]);
    assert_eq!(g.layer(talus::LayerId(lb as u32)).nodes(), &[b1, b0]);
}

/// Builds `n` with two EAST ports crossed against `m0`/`m1` in the next
/// layer, returning the node/port ids the two sub-tests below share.
fn build_dual_port_cross(
    g: &mut talus::Graph,
) -> (talus::NodeId, talus::PortId, talus::PortId, talus::NodeId, talus::NodeId) {
    let n = g.add_node(NodeType::Normal);
    let m0 = g.add_node(NodeType::Normal);
    let m1 = g.add_node(NodeType::Normal);

    let p0 = g.add_port(n, PortSide::East, PortDirection::Output);
    let p1 = g.add_port(n, PortSide::East, PortDirection::Output);
    let q0 = g.add_port(m0, PortSide::West, PortDirection::Input);
    let q1 = g.add_port(m1, PortSide::West, PortDirection::Input);
    // p0 (first port) feeds m1, p1 (second port) feeds m0: crossed relative
    // to creation order either way the next layer settles.
    g.add_edge(p0, q1).unwrap();
    g.add_edge(p1, q0).unwrap();

    (n, p0, p1, m0, m1)
}

#[test]
fn fixed_port_order_is_left_untouched() {
    let mut g = talus::Graph::new(talus::LayoutConfig::default());
    let (n, p0, p1, _m0, _m1) = build_dual_port_cross(&mut g);
    g.node_mut(n).port_constraints = PortConstraints::FixedOrder;

    Pipeline::default().run_until(&mut g, PhaseKind::NodeOrdering).unwrap();

    // The distributor (§4.6.3) skips any node whose port order is pinned,
    // no matter how the neighbouring layer ends up ordered.
    assert_eq!(g.node(n).ports_on(PortSide::East), &[p0, p1]);
}

#[test]
fn free_port_order_ends_up_consistent_with_the_neighbor_layer() {
    let mut g = talus::Graph::new(talus::LayoutConfig::default());
    let (n, _p0, _p1, m0, m1) = build_dual_port_cross(&mut g);

    Pipeline::default().run_until(&mut g, PhaseKind::NodeOrdering).unwrap();

    let m_layer = talus::LayerId(g.layer_index_of(m0).unwrap() as u32);
    let order = g.layer(m_layer).nodes();
    let pos_of = |node: talus::NodeId| order.iter().position(|&x| x == node).unwrap();

    // Whichever order the neighbour layer settled into, the distributor
    // (free to move) re-sorts N's ports to match it: the port feeding the
    // earlier neighbour comes first.
    let ports = g.node(n).ports_on(PortSide::East);
    assert_eq!(ports.len(), 2);
    let target_of = |p: talus::PortId| {
        let e = g.port(p).outgoing()[0];
        g.edge(e).target_node()
    };
    assert!(pos_of(target_of(ports[0])) <= pos_of(target_of(ports[1])));
    let _ = m1;
}
