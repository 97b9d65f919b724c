//! Per-graph layout configuration: the tuning knobs of §6 gathered into a
//! single record, following `dugong`'s `GraphLabel`-on-the-graph idiom
//! rather than module-level global option tables (§9).

use crate::enums::{EdgeRouting, FixedAlignment, HierarchyHandling};
use crate::spacings::{SpacingDefaults, SpacingsTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub edge_routing: EdgeRouting,
    pub hierarchy_handling: HierarchyHandling,
    pub random_seed: u64,

    /// Repeat count for randomized crossing minimization.
    pub thoroughness: u32,

    /// In `[-inf, 1]`; controls the sweep-type decider's bottom-up
    /// threshold (§4.6.5).
    pub hierarchical_sweepiness: f64,

    pub fixed_alignment: FixedAlignment,
    pub favor_straight_edges: bool,
    pub unnecessary_bendpoints: bool,

    /// `None` means "try the whole range" (negative sentinel in the
    /// reference), matching §6's "negative = try the whole range".
    pub upper_bound_on_width: Option<u32>,
    pub compensator: Option<u32>,

    pub spacings: SpacingsTable,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            edge_routing: EdgeRouting::default(),
            hierarchy_handling: HierarchyHandling::default(),
            random_seed: 0,
            thoroughness: 1,
            hierarchical_sweepiness: 1.0,
            fixed_alignment: FixedAlignment::default(),
            favor_straight_edges: true,
            unnecessary_bendpoints: false,
            upper_bound_on_width: None,
            compensator: None,
            spacings: SpacingsTable::new(SpacingDefaults::default()),
        }
    }
}

impl LayoutConfig {
    /// The `(ubw, c)` ranges MinWidth (C4) iterates: the configured single
    /// value if set, else the documented default range.
    pub fn upper_bound_on_width_range(&self) -> std::ops::RangeInclusive<u32> {
        match self.upper_bound_on_width {
            Some(v) => v..=v,
            None => 1..=4,
        }
    }

    pub fn compensator_range(&self) -> std::ops::RangeInclusive<u32> {
        match self.compensator {
            Some(v) => v..=v,
            None => 1..=2,
        }
    }
}
