use talus_graph::{Graph, LayoutConfig, NodeType, PortDirection, PortSide};

fn two_node_edge(g: &mut Graph) -> (talus_graph::NodeId, talus_graph::NodeId, talus_graph::EdgeId) {
    let a = g.add_node(NodeType::Normal);
    let b = g.add_node(NodeType::Normal);
    let pa = g.add_port(a, PortSide::East, PortDirection::Output);
    let pb = g.add_port(b, PortSide::West, PortDirection::Input);
    let e = g.add_edge(pa, pb).unwrap();
    (a, b, e)
}

#[test]
fn layering_moves_nodes_between_layers() {
    let mut g = Graph::new(LayoutConfig::default());
    let (a, b, _e) = two_node_edge(&mut g);

    let l0 = g.push_layer();
    let l1 = g.push_layer();
    g.push_node_to_layer(a, l0);
    g.push_node_to_layer(b, l1);
    assert_eq!(g.layer(l0).nodes(), &[a]);
    assert_eq!(g.layer(l1).nodes(), &[b]);

    // Moving b into l0 removes it from l1.
    g.push_node_to_layer(b, l0);
    assert_eq!(g.layer(l0).nodes(), &[a, b]);
    assert!(g.layer(l1).is_empty());
}

#[test]
fn insert_node_in_layer_respects_index() {
    let mut g = Graph::new(LayoutConfig::default());
    let l0 = g.push_layer();
    let a = g.add_node(NodeType::Normal);
    let b = g.add_node(NodeType::Normal);
    let c = g.add_node(NodeType::Normal);
    g.push_node_to_layer(a, l0);
    g.push_node_to_layer(b, l0);
    g.insert_node_in_layer(c, l0, 1);
    assert_eq!(g.layer(l0).nodes(), &[a, c, b]);
}

#[test]
fn reverse_edge_swaps_ports_and_reverses_bends() {
    let mut g = Graph::new(LayoutConfig::default());
    let (_a, _b, e) = two_node_edge(&mut g);
    g.edge_mut(e).bend_points = vec![
        talus_graph::Point::new(1.0, 1.0),
        talus_graph::Point::new(2.0, 2.0),
    ];
    let original_source = g.edge(e).source();
    let original_target = g.edge(e).target();

    g.reverse_edge(e);

    assert!(g.edge(e).reversed);
    assert_eq!(g.edge(e).source(), original_target);
    assert_eq!(g.edge(e).target(), original_source);
    assert_eq!(
        g.edge(e).bend_points,
        vec![talus_graph::Point::new(2.0, 2.0), talus_graph::Point::new(1.0, 1.0)]
    );
}

#[test]
fn remove_edge_detaches_from_both_ports() {
    let mut g = Graph::new(LayoutConfig::default());
    let (a, b, e) = two_node_edge(&mut g);
    let pa = g.node(a).ports_on(PortSide::East)[0];
    let pb = g.node(b).ports_on(PortSide::West)[0];

    g.remove_edge(e);

    assert!(g.port(pa).outgoing().is_empty());
    assert!(g.port(pb).incoming().is_empty());
    assert!(!g.is_edge_alive(e));
    assert_eq!(g.edges().count(), 0);
}

#[test]
fn origin_lookup_round_trips() {
    let mut g = Graph::new(LayoutConfig::default());
    let a = g.add_node(NodeType::Normal);
    g.bind_origin(42, a);
    assert_eq!(g.find_by_origin(42), Some(a));
    assert_eq!(g.find_by_origin(7), None);
}

#[test]
fn spacings_table_honors_individual_override() {
    let mut g = Graph::new(LayoutConfig::default());
    let a = g.add_node(NodeType::Normal);
    let b = g.add_node(NodeType::Normal);
    g.node_mut(a).spacing_override = Some(talus_graph::SpacingOverride {
        horizontal: 100.0,
        vertical: 100.0,
    });

    let spacing = g.config.spacings.effective(g.node(a), g.node(b));
    assert_eq!(spacing.horizontal, 100.0);
    assert_eq!(spacing.vertical, 100.0);
}
