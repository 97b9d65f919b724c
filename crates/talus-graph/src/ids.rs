//! Typed arena indices.
//!
//! Nodes, ports, edges and layers all live in flat `Vec`s on [`crate::Graph`],
//! addressed by the newtypes below instead of pointers or `Rc`. Per the data
//! model's lifecycle, entities are never reclaimed mid-run (dummies removed by
//! the joiner are tombstoned, not swap-removed), so a plain `u32` index stays
//! valid for the life of a `Graph`.

use std::fmt;

macro_rules! index_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(i: usize) -> Self {
                Self(i as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", stringify!($name), self.0)
            }
        }
    };
}

index_type!(NodeId);
index_type!(PortId);
index_type!(EdgeId);

/// A layer's identity is its position in the graph's layer sequence. Layer
/// count is fixed from C4 onward (no later phase inserts or removes whole
/// layers), so no generation counter is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct LayerId(pub u32);

impl LayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer{}", self.0)
    }
}
