use crate::ids::{LayerId, NodeId};
use serde::{Deserialize, Serialize};

/// An ordered partition of nodes sharing the same x-bucket. A layer's
/// identity (its `LayerId`, i.e. its position in the graph's layer sequence)
/// is distinct from its contents: reordering nodes within it never changes
/// that identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) nodes: Vec<NodeId>,
}

impl Layer {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }
}

/// Convenience pairing of a layer with its own id, returned by iteration
/// helpers on `Graph`.
#[derive(Debug, Clone, Copy)]
pub struct LayerRef<'a> {
    pub id: LayerId,
    pub layer: &'a Layer,
}
