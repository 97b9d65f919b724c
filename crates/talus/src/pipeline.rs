//! C11: pipeline controller.
//!
//! Composes C2-C10 into the five phases named in the component table
//! (cycle-breaking, layering, node-ordering, node-placement, edge-routing),
//! each with a `before`/`main`/`after` processor list a caller can extend.
//! This lifts dugong's `pipeline.rs` top-level function (a straight-line
//! sequence of stage calls) into data, so processors can be inserted around
//! the crate's own stages without editing the controller itself.

use tracing::debug;

use talus_graph::{Graph, LayoutConfig};

use crate::error::LayoutError;
use crate::{cycle_breaker, in_layer, layerer, normalize, order, position, reverser, routing};

pub type Processor = fn(&mut Graph) -> Result<(), LayoutError>;

/// A processor's static hook for contributing defaults to the root
/// configuration before the run starts (§4.11: "each processor advertises
/// its own nested configuration via a static method taking the graph").
pub type ConfigLoader = fn(&Graph, &mut LayoutConfig);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    CycleBreaking,
    Layering,
    NodeOrdering,
    NodePlacement,
    EdgeRouting,
}

impl PhaseKind {
    fn name(self) -> &'static str {
        match self {
            PhaseKind::CycleBreaking => "cycle-breaking",
            PhaseKind::Layering => "layering",
            PhaseKind::NodeOrdering => "node-ordering",
            PhaseKind::NodePlacement => "node-placement",
            PhaseKind::EdgeRouting => "edge-routing",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Before,
    After,
}

#[derive(Default)]
struct Phase {
    before: Vec<Processor>,
    main: Vec<Processor>,
    after: Vec<Processor>,
}

impl Phase {
    fn main(main: Processor) -> Self {
        Self { before: Vec::new(), main: vec![main], after: Vec::new() }
    }

    fn run(&self, g: &mut Graph) -> Result<(), LayoutError> {
        for p in &self.before {
            p(g)?;
        }
        for p in &self.main {
            p(g)?;
        }
        for p in &self.after {
            p(g)?;
        }
        Ok(())
    }
}

/// Cooperative step budget (§4.11 supplemental), checked only at phase
/// boundaries since phases themselves are strict and non-preemptible.
pub struct Budget {
    pub steps_remaining: u32,
}

/// The controller. Construct with [`Pipeline::default`] for the crate's
/// stock five-phase run, then [`Pipeline::register`] extra processors and
/// [`Pipeline::register_config_loader`] nested config contributors before
/// calling [`Pipeline::run`].
pub struct Pipeline {
    cycle_breaking: Phase,
    layering: Phase,
    node_ordering: Phase,
    node_placement: Phase,
    edge_routing: Phase,
    config_loaders: Vec<ConfigLoader>,
    loaded: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            cycle_breaking: Phase::main(|g| {
                reverser::run(g)?;
                cycle_breaker::run(g);
                Ok(())
            }),
            layering: Phase::main(|g| {
                layerer::run(g);
                normalize::split_long_edges(g);
                Ok(())
            }),
            node_ordering: Phase::main(|g| {
                order::minimize_crossings(g);
                in_layer::run(g);
                Ok(())
            }),
            node_placement: Phase::main(|g| {
                position::run(g);
                Ok(())
            }),
            edge_routing: Phase::main(|g| {
                routing::run(g);
                normalize::join_long_edges_and_restore(g);
                Ok(())
            }),
            config_loaders: Vec::new(),
            loaded: false,
        }
    }
}

impl Pipeline {
    fn phase_mut(&mut self, kind: PhaseKind) -> &mut Phase {
        match kind {
            PhaseKind::CycleBreaking => &mut self.cycle_breaking,
            PhaseKind::Layering => &mut self.layering,
            PhaseKind::NodeOrdering => &mut self.node_ordering,
            PhaseKind::NodePlacement => &mut self.node_placement,
            PhaseKind::EdgeRouting => &mut self.edge_routing,
        }
    }

    fn phase(&self, kind: PhaseKind) -> &Phase {
        match kind {
            PhaseKind::CycleBreaking => &self.cycle_breaking,
            PhaseKind::Layering => &self.layering,
            PhaseKind::NodeOrdering => &self.node_ordering,
            PhaseKind::NodePlacement => &self.node_placement,
            PhaseKind::EdgeRouting => &self.edge_routing,
        }
    }

    pub fn register(&mut self, phase: PhaseKind, slot: Slot, processor: Processor) {
        let p = self.phase_mut(phase);
        match slot {
            Slot::Before => p.before.push(processor),
            Slot::After => p.after.push(processor),
        }
    }

    pub fn register_config_loader(&mut self, loader: ConfigLoader) {
        self.config_loaders.push(loader);
    }

    /// Merges every registered loader's contribution into `g.config`.
    /// Idempotent: a second call is a no-op.
    pub fn load_configs(&mut self, g: &mut Graph) {
        if self.loaded {
            return;
        }
        let loaders = std::mem::take(&mut self.config_loaders);
        for loader in &loaders {
            let mut config = g.config.clone();
            loader(g, &mut config);
            g.config = config;
        }
        self.config_loaders = loaders;
        self.loaded = true;
    }

    const ORDER: [PhaseKind; 5] = [
        PhaseKind::CycleBreaking,
        PhaseKind::Layering,
        PhaseKind::NodeOrdering,
        PhaseKind::NodePlacement,
        PhaseKind::EdgeRouting,
    ];

    /// Runs every phase exactly once in order, loading nested configs first.
    /// `budget`, if given, is decremented once per phase boundary; running
    /// out stops the run and returns `LayoutError::BudgetExhausted` with
    /// whatever phases already ran left in the graph (no rollback).
    pub fn run(&mut self, g: &mut Graph, mut budget: Option<&mut Budget>) -> Result<(), LayoutError> {
        self.load_configs(g);

        for kind in Self::ORDER {
            if let Some(b) = budget.as_deref_mut() {
                if b.steps_remaining == 0 {
                    return Err(LayoutError::BudgetExhausted { phase: kind.name() });
                }
                b.steps_remaining -= 1;
            }
            debug!(phase = kind.name(), "running layout phase");
            self.phase(kind).run(g)?;
        }

        Ok(())
    }

    /// Runs every phase up to and including `upto`, then stops, leaving the
    /// graph in whatever intermediate state that phase produces. Later
    /// phases can undo earlier bookkeeping (C10 restores the `reversed`
    /// flags C3 sets), so inspecting a mid-pipeline invariant requires
    /// stopping here rather than calling [`Pipeline::run`] to completion.
    pub fn run_until(&mut self, g: &mut Graph, upto: PhaseKind) -> Result<(), LayoutError> {
        self.load_configs(g);

        for kind in Self::ORDER {
            debug!(phase = kind.name(), "running layout phase");
            self.phase(kind).run(g)?;
            if kind == upto {
                break;
            }
        }

        Ok(())
    }
}

/// The crate's public entry point: runs the stock five-phase pipeline with
/// no extra processors, no nested config, and no budget.
pub fn layout(g: &mut Graph) -> Result<(), LayoutError> {
    Pipeline::default().run(g, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{NodeType, PortDirection, PortSide, Size};

    #[test]
    fn stock_pipeline_places_every_node() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        g.node_mut(a).size = Size { width: 20.0, height: 20.0 };
        g.node_mut(b).size = Size { width: 20.0, height: 20.0 };
        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let qb = g.add_port(b, PortSide::West, PortDirection::Input);
        g.add_edge(pa, qb).unwrap();

        layout(&mut g).unwrap();

        assert!(g.node(a).position.x.is_finite());
        assert!(g.node(b).position.x.is_finite());
        assert!(g.node(b).position.x > g.node(a).position.x);
    }

    #[test]
    fn exhausted_budget_stops_early_without_error_panic() {
        let mut g = Graph::new(LayoutConfig::default());
        g.add_node(NodeType::Normal);

        let mut pipeline = Pipeline::default();
        let mut budget = Budget { steps_remaining: 0 };
        let result = pipeline.run(&mut g, Some(&mut budget));
        assert!(matches!(result, Err(LayoutError::BudgetExhausted { phase: "cycle-breaking" })));
    }

    #[test]
    fn unnormalisable_layering_constraint_surfaces_configuration_error() {
        use talus_graph::LayerConstraint;

        let mut g = Graph::new(LayoutConfig::default());
        let last = g.add_node(NodeType::Normal);
        g.node_mut(last).layering_constraint = LayerConstraint::Last;
        let p_out = g.add_port(last, PortSide::East, PortDirection::Output);
        let p_in = g.add_port(last, PortSide::West, PortDirection::Input);
        g.add_edge(p_out, p_in).unwrap();

        let result = layout(&mut g);
        assert!(matches!(result, Err(LayoutError::Configuration(_))));
    }

    #[test]
    fn config_loader_runs_exactly_once() {
        let mut g = Graph::new(LayoutConfig::default());
        let mut pipeline = Pipeline::default();
        pipeline.register_config_loader(|_g, config| {
            config.thoroughness += 1;
        });

        pipeline.load_configs(&mut g);
        pipeline.load_configs(&mut g);

        assert_eq!(g.config.thoroughness, LayoutConfig::default().thoroughness + 1);
    }
}
