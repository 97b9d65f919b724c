//! Enumerations shared by the graph model and the pipeline.
//!
//! Values and helper semantics are ported 1:1 from the reference layout
//! engine's `containers/constants.py`, including the quirky-but-intentional
//! `PortConstraints::is_side_fixed` (true for everything except `Undefined`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Normal,
    LongEdge,
    ExternalPort,
    NorthSouthPort,
    Label,
    BigNode,
    BreakingPoint,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Normal,
        NodeType::LongEdge,
        NodeType::ExternalPort,
        NodeType::NorthSouthPort,
        NodeType::Label,
        NodeType::BigNode,
        NodeType::BreakingPoint,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Default for NodeType {
    fn default() -> Self {
        NodeType::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    pub fn opposite(self) -> PortDirection {
        match self {
            PortDirection::Input => PortDirection::Output,
            PortDirection::Output => PortDirection::Input,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortSide {
    North,
    East,
    South,
    West,
}

impl PortSide {
    /// Clockwise order starting at North, matching the node model's
    /// N -> E -> S -> W port iteration order.
    pub const CLOCKWISE: [PortSide; 4] =
        [PortSide::North, PortSide::East, PortSide::South, PortSide::West];

    pub fn opposite(self) -> PortSide {
        match self {
            PortSide::North => PortSide::South,
            PortSide::South => PortSide::North,
            PortSide::East => PortSide::West,
            PortSide::West => PortSide::East,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PortSide::North => 0,
            PortSide::East => 1,
            PortSide::South => 2,
            PortSide::West => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortConstraints {
    Undefined,
    Free,
    FixedSide,
    FixedOrder,
    FixedRatio,
    FixedPos,
}

impl PortConstraints {
    pub fn is_pos_fixed(self) -> bool {
        matches!(self, PortConstraints::FixedPos)
    }

    pub fn is_ratio_fixed(self) -> bool {
        matches!(self, PortConstraints::FixedRatio)
    }

    pub fn is_order_fixed(self) -> bool {
        matches!(
            self,
            PortConstraints::FixedOrder | PortConstraints::FixedRatio | PortConstraints::FixedPos
        )
    }

    /// True for everything except `Undefined` - intentionally, per the
    /// reference semantics: once a side is declared in any fixed/free way,
    /// the side itself is considered settled.
    pub fn is_side_fixed(self) -> bool {
        !matches!(self, PortConstraints::Undefined)
    }
}

impl Default for PortConstraints {
    fn default() -> Self {
        PortConstraints::Undefined
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerConstraint {
    None,
    First,
    FirstSeparate,
    Last,
    LastSeparate,
}

impl Default for LayerConstraint {
    fn default() -> Self {
        LayerConstraint::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InLayerConstraint {
    None,
    Top,
    Bottom,
}

impl InLayerConstraint {
    /// Sort key used by the in-layer constraint processor (C7): TOP first,
    /// then unconstrained, then BOTTOM.
    pub fn sort_key(self) -> u8 {
        match self {
            InLayerConstraint::Top => 0,
            InLayerConstraint::None => 1,
            InLayerConstraint::Bottom => 2,
        }
    }
}

impl Default for InLayerConstraint {
    fn default() -> Self {
        InLayerConstraint::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeRouting {
    Undefined,
    Polyline,
    Orthogonal,
    Splines,
}

impl Default for EdgeRouting {
    fn default() -> Self {
        EdgeRouting::Orthogonal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HierarchyHandling {
    Inherit,
    IncludeChildren,
    SeparateChildren,
}

impl Default for HierarchyHandling {
    fn default() -> Self {
        HierarchyHandling::Inherit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedAlignment {
    None,
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
    Balanced,
}

impl Default for FixedAlignment {
    fn default() -> Self {
        FixedAlignment::None
    }
}

/// End-label placement. Reversing an edge swaps `Head` and `Tail`; `Center`
/// is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelPlacement {
    Head,
    Tail,
    Center,
}

impl LabelPlacement {
    pub fn reversed(self) -> LabelPlacement {
        match self {
            LabelPlacement::Head => LabelPlacement::Tail,
            LabelPlacement::Tail => LabelPlacement::Head,
            LabelPlacement::Center => LabelPlacement::Center,
        }
    }
}
