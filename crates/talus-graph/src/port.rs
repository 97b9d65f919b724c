use crate::enums::{PortDirection, PortSide};
use crate::geometry::{Point, Size};
use crate::ids::{EdgeId, NodeId, PortId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub(crate) id: PortId,
    pub(crate) node: NodeId,
    pub side: PortSide,
    pub direction: PortDirection,

    pub position: Point,
    pub size: Size,
    pub anchor: Point,

    pub(crate) incoming: Vec<EdgeId>,
    pub(crate) outgoing: Vec<EdgeId>,

    /// A collector port merges several parallel edges so a reversed edge
    /// with a collector endpoint can be rerouted through the opposite
    /// collector instead of literally swapping one port (see C2/C10).
    pub input_collect: bool,

    /// Back-pointer to the `ExternalPort` dummy node this port was split
    /// off into, if any.
    pub external_port_dummy: Option<NodeId>,
}

impl Port {
    pub(crate) fn new(id: PortId, node: NodeId, side: PortSide, direction: PortDirection) -> Self {
        Self {
            id,
            node,
            side,
            direction,
            position: Point::ZERO,
            size: Size::default(),
            anchor: Point::ZERO,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            input_collect: false,
            external_port_dummy: None,
        }
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }

    pub fn degree(&self) -> usize {
        self.incoming.len() + self.outgoing.len()
    }

    /// Incoming minus outgoing edge count.
    pub fn net_flow(&self) -> i64 {
        self.incoming.len() as i64 - self.outgoing.len() as i64
    }
}
