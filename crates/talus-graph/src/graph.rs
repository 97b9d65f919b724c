//! The arena graph: owns every node, port, edge, and layer, and is the sole
//! place invariants I1-I4 are enforced.
//!
//! Modeled on `dugong-graphlib`'s split between storage (`entries`-style
//! flat `Vec`s) and a CSR-like adjacency cache, adapted to a concrete
//! (non-generic) node/port/edge shape per the C1 deviation recorded in
//! `DESIGN.md`: this domain has one node shape, not an arbitrary generic
//! label, so indices address concrete structs directly instead of going
//! through a type parameter.

use rustc_hash::FxHashMap;

use crate::config::LayoutConfig;
use crate::edge::Edge;
use crate::enums::{NodeType, PortDirection, PortSide};
use crate::error::GraphError;
use crate::ids::{EdgeId, LayerId, NodeId, PortId};
use crate::layer::Layer;
use crate::node::Node;
use crate::port::Port;
use crate::rng::Rng;

/// Graph-level flags declaring presence of various special-case features,
/// consulted by C6/C9 to skip machinery a given graph doesn't need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphProperties {
    pub has_external_ports: bool,
    pub has_hyperedges: bool,
    pub has_hypernodes: bool,
    pub has_non_free_ports: bool,
    pub has_north_south_ports: bool,
    pub has_self_loops: bool,
    pub has_comments: bool,
    pub has_center_labels: bool,
    pub has_end_labels: bool,
    pub has_partitions: bool,
}

pub struct Graph {
    nodes: Vec<Node>,
    node_alive: Vec<bool>,
    ports: Vec<Port>,
    edges: Vec<Edge>,
    edge_alive: Vec<bool>,
    layers: Vec<Layer>,

    origins: FxHashMap<u64, NodeId>,

    pub config: LayoutConfig,
    pub rng: Rng,
    pub properties: GraphProperties,
}

impl Graph {
    pub fn new(config: LayoutConfig) -> Self {
        let seed = config.random_seed;
        Self {
            nodes: Vec::new(),
            node_alive: Vec::new(),
            ports: Vec::new(),
            edges: Vec::new(),
            edge_alive: Vec::new(),
            layers: Vec::new(),
            origins: FxHashMap::default(),
            config,
            rng: Rng::new(seed),
            properties: GraphProperties::default(),
        }
    }

    // ---- node -----------------------------------------------------------

    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(id, node_type));
        self.node_alive.push(true);
        if node_type == NodeType::ExternalPort {
            self.properties.has_external_ports = true;
        }
        if node_type == NodeType::NorthSouthPort {
            self.properties.has_north_south_ports = true;
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn is_node_alive(&self, id: NodeId) -> bool {
        self.node_alive[id.index()]
    }

    /// Tombstones the node (it is never returned by `nodes()`/`node_ids()`
    /// again), removing it from its layer first if it has one. Used by the
    /// long-edge joiner (C10) to drop spent LONG_EDGE dummies.
    pub fn remove_node(&mut self, id: NodeId) {
        if let Some(layer) = self.nodes[id.index()].layer {
            self.layers[layer.index()].nodes.retain(|&n| n != id);
            self.nodes[id.index()].layer = None;
        }
        self.node_alive[id.index()] = false;
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(NodeId::from_index)
            .filter(move |&id| self.node_alive[id.index()])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_ids().map(move |id| self.node(id))
    }

    pub fn node_count(&self) -> usize {
        self.node_alive.iter().filter(|&&a| a).count()
    }

    pub fn bind_origin(&mut self, origin: u64, node: NodeId) {
        self.origins.insert(origin, node);
    }

    pub fn find_by_origin(&self, origin: u64) -> Option<NodeId> {
        self.origins.get(&origin).copied()
    }

    // ---- port -------------------------------------------------------------

    pub fn add_port(&mut self, node: NodeId, side: PortSide, direction: PortDirection) -> PortId {
        let id = PortId::from_index(self.ports.len());
        self.ports.push(Port::new(id, node, side, direction));
        self.nodes[node.index()].ports[side.index()].push(id);
        if self.nodes[node.index()].port_constraints.is_side_fixed() {
            self.properties.has_non_free_ports = true;
        }
        id
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.index()]
    }

    pub fn port_mut(&mut self, id: PortId) -> &mut Port {
        &mut self.ports[id.index()]
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Moves a port to a different side of its own node, e.g. the port
    /// distributor (§4.6.3) relocating a north/south port. Appends at the
    /// end of the new side's list; callers that need a specific order
    /// follow with [`Graph::reorder_ports_on_side`].
    pub fn move_port_to_side(&mut self, port: PortId, new_side: PortSide) {
        let node = self.ports[port.index()].node;
        let old_side = self.ports[port.index()].side;
        if old_side == new_side {
            return;
        }
        self.nodes[node.index()].ports[old_side.index()].retain(|&p| p != port);
        self.nodes[node.index()].ports[new_side.index()].push(port);
        self.ports[port.index()].side = new_side;
    }

    pub fn reorder_ports_on_side(&mut self, node: NodeId, side: PortSide, order: Vec<PortId>) {
        self.nodes[node.index()].ports[side.index()] = order;
    }

    // ---- edge ---------------------------------------------------------

    pub fn add_edge(&mut self, source: PortId, target: PortId) -> Result<EdgeId, GraphError> {
        let source_node = self.ports[source.index()].node;
        let target_node = self.ports[target.index()].node;
        let id = EdgeId::from_index(self.edges.len());
        let edge = Edge::new(id, source, target, source_node, target_node);
        if edge.self_loop {
            self.properties.has_self_loops = true;
        }
        self.edges.push(edge);
        self.edge_alive.push(true);
        self.ports[source.index()].outgoing.push(id);
        self.ports[target.index()].incoming.push(id);

        // §3: a hyperedge is the transitive closure of edges sharing a port;
        // a port now carrying more than one incident edge is the first such
        // link, so the graph as a whole has at least one hyperedge/hypernode
        // for C6/C9 to account for.
        if self.ports[source.index()].incoming.len() + self.ports[source.index()].outgoing.len() > 1
            || self.ports[target.index()].incoming.len() + self.ports[target.index()].outgoing.len() > 1
        {
            self.properties.has_hyperedges = true;
            self.properties.has_hypernodes = true;
        }

        Ok(id)
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }

    /// Validated thickness mutator (§7: non-positive thickness is a
    /// configuration error). `Edge::new`'s own default (`1.0`) never needs
    /// this, since it's a compile-time constant; external callers (the
    /// input binder) and internal copies (the long-edge splitter, which
    /// reuses an already-validated value) both go through here.
    pub fn set_edge_thickness(&mut self, id: EdgeId, thickness: f64) -> Result<(), GraphError> {
        if !(thickness > 0.0) {
            return Err(GraphError::NonPositiveThickness { edge: id, thickness });
        }
        self.edges[id.index()].thickness = thickness;
        Ok(())
    }

    pub fn is_edge_alive(&self, id: EdgeId) -> bool {
        self.edge_alive[id.index()]
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len())
            .map(EdgeId::from_index)
            .filter(move |&id| self.edge_alive[id.index()])
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edge_ids().map(move |id| self.edge(id))
    }

    /// Removes the edge from both ports' lists and tombstones it. Used by
    /// the long-edge joiner (C10) to drop the EAST half of a spliced pair.
    pub fn remove_edge(&mut self, id: EdgeId) {
        let (src, dst) = {
            let e = &self.edges[id.index()];
            (e.source, e.target)
        };
        self.ports[src.index()].outgoing.retain(|&e| e != id);
        self.ports[dst.index()].incoming.retain(|&e| e != id);
        self.edge_alive[id.index()] = false;
    }

    /// Core reversal primitive (§4.1): swaps endpoints, moves the edge
    /// between the corresponding incoming/outgoing lists, flips `reversed`,
    /// swaps HEAD/TAIL label placement, and reverses the bend-point order so
    /// a later un-reversal (C10) restores the user-visible direction with
    /// bends intact.
    pub fn reverse_edge(&mut self, id: EdgeId) {
        let (old_src, old_dst, old_src_node, old_dst_node) = {
            let e = &self.edges[id.index()];
            (e.source, e.target, e.source_node, e.target_node)
        };

        self.ports[old_src.index()].outgoing.retain(|&e| e != id);
        self.ports[old_dst.index()].incoming.retain(|&e| e != id);

        self.ports[old_dst.index()].outgoing.push(id);
        self.ports[old_src.index()].incoming.push(id);

        let e = &mut self.edges[id.index()];
        e.source = old_dst;
        e.target = old_src;
        e.source_node = old_dst_node;
        e.target_node = old_src_node;
        e.reversed = !e.reversed;
        e.bend_points.reverse();
        for label in &mut e.labels {
            label.placement = label.placement.reversed();
        }
    }

    /// Like [`Graph::reverse_edge`], but the edge's target-port incoming
    /// list receives it at a specific index rather than appended, preserving
    /// the correspondence of parallel edges through a long-edge dummy (§4.1,
    /// needed by the long-edge joiner).
    pub fn set_target_at_index(&mut self, id: EdgeId, new_target: PortId, index: usize) {
        let old_target = self.edges[id.index()].target;
        self.ports[old_target.index()].incoming.retain(|&e| e != id);

        let new_target_node = self.ports[new_target.index()].node;
        let incoming = &mut self.ports[new_target.index()].incoming;
        let index = index.min(incoming.len());
        incoming.insert(index, id);

        let e = &mut self.edges[id.index()];
        e.target = new_target;
        e.target_node = new_target_node;
        e.self_loop = e.source_node == e.target_node;
    }

    // ---- layer ------------------------------------------------------------

    pub fn push_layer(&mut self) -> LayerId {
        let id = LayerId::from_index(self.layers.len());
        self.layers.push(Layer::default());
        id
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.index()]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Removes `node` from its current layer (if any) without placing it
    /// anywhere new.
    pub fn clear_node_layer(&mut self, node: NodeId) {
        if let Some(layer) = self.nodes[node.index()].layer {
            self.layers[layer.index()].nodes.retain(|&n| n != node);
        }
        self.nodes[node.index()].layer = None;
    }

    /// Appends `node` to the end of `layer`, first removing it from any
    /// layer it currently belongs to (I4).
    pub fn push_node_to_layer(&mut self, node: NodeId, layer: LayerId) {
        self.clear_node_layer(node);
        self.layers[layer.index()].nodes.push(node);
        self.nodes[node.index()].layer = Some(layer);
    }

    /// Inserts `node` at `index` within `layer`, first removing it from any
    /// layer it currently belongs to.
    pub fn insert_node_in_layer(&mut self, node: NodeId, layer: LayerId, index: usize) {
        self.clear_node_layer(node);
        let nodes = &mut self.layers[layer.index()].nodes;
        let index = index.min(nodes.len());
        nodes.insert(index, node);
        self.nodes[node.index()].layer = Some(layer);
    }

    /// Replaces a layer's node order wholesale (same member set, new
    /// sequence) - the primitive C6/C7 sort passes use once they've computed
    /// a new order.
    pub fn reorder_layer(&mut self, layer: LayerId, order: Vec<NodeId>) {
        debug_assert_eq!(
            {
                let mut a = self.layers[layer.index()].nodes.clone();
                let mut b = order.clone();
                a.sort_by_key(|n| n.0);
                b.sort_by_key(|n| n.0);
                a
            },
            {
                let mut b = order.clone();
                b.sort_by_key(|n| n.0);
                b
            },
        );
        self.layers[layer.index()].nodes = order;
    }

    pub fn layer_index_of(&self, node: NodeId) -> Option<usize> {
        self.nodes[node.index()].layer.map(LayerId::index)
    }
}
