/*
 * Lifecycle Protocol Model
 *
 * A protocol is a partial order over the lifecycle methods the framework
 * invokes on one component kind:
 * - Phase edges (implicit): every Create step precedes every Active step,
 *   which precedes every Teardown step
 * - Chain edges (explicit): `onCreate → onStart → onPostCreate`
 *
 * The driver only needs one linearization. `canonical_order()` breaks ties
 * by (phase, declaration index) so the same protocol always yields the same
 * order.
 */

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::features::facts::ComponentKind;
use crate::shared::models::MethodSignature;

/// Coarse lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Create,
    Active,
    Teardown,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Active => "active",
            Self::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One framework-invoked lifecycle method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleStep {
    pub method: MethodSignature,
    pub phase: Phase,
}

/// A component override placed in the protocol's order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOverride {
    /// The component's own signature
    pub method: MethodSignature,
    pub phase: Phase,
    /// Matched no protocol step; placed as a trailing Active step
    pub unmatched: bool,
}

/// Partial order over lifecycle steps of one component kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleProtocol {
    pub kind: ComponentKind,
    steps: Vec<LifecycleStep>,
    /// Explicit happens-before edges (step indices)
    edges: Vec<(usize, usize)>,
}

impl LifecycleProtocol {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            steps: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a step, returning its index
    pub fn add_step(&mut self, phase: Phase, method: MethodSignature) -> usize {
        self.steps.push(LifecycleStep { method, phase });
        self.steps.len() - 1
    }

    /// Add a happens-before edge between step indices
    pub fn add_edge(&mut self, before: usize, after: usize) {
        self.edges.push((before, after));
    }

    /// Chain steps by name: each named step happens before the next
    ///
    /// Returns the first name with no step.
    pub fn chain(&mut self, names: &[&str]) -> Result<(), String> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .index_of(name)
                .ok_or_else(|| format!("no lifecycle step named '{}'", name))?;
            indices.push(idx);
        }
        for pair in indices.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
        Ok(())
    }

    pub fn steps(&self) -> &[LifecycleStep] {
        &self.steps
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the first step named `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.method.name == name)
    }

    /// Step matching `method` exactly, else the first step of the same name
    pub fn lookup(&self, method: &MethodSignature) -> Option<&LifecycleStep> {
        self.steps
            .iter()
            .find(|step| step.method.matches(method))
            .or_else(|| self.steps.iter().find(|step| step.method.name == method.name))
    }

    /// Reject dangling edges, duplicate signatures, backward phase edges and cycles
    pub fn validate(&self) -> Result<(), String> {
        for (i, step) in self.steps.iter().enumerate() {
            if step.method.name.is_empty() {
                return Err(format!("{} protocol: step {} has an empty name", self.kind, i));
            }
            if self.steps[..i].iter().any(|s| s.method.matches(&step.method)) {
                return Err(format!(
                    "{} protocol: duplicate step {}",
                    self.kind, step.method
                ));
            }
        }

        for &(before, after) in &self.edges {
            if before >= self.steps.len() || after >= self.steps.len() {
                return Err(format!(
                    "{} protocol: edge {} -> {} references a missing step",
                    self.kind, before, after
                ));
            }
            let (from, to) = (&self.steps[before], &self.steps[after]);
            if from.phase > to.phase {
                return Err(format!(
                    "{} protocol: {} ({}) cannot happen before {} ({})",
                    self.kind, from.method, from.phase, to.method, to.phase
                ));
            }
        }

        if is_cyclic_directed(&self.graph()) {
            return Err(format!("{} protocol: happens-before cycle", self.kind));
        }
        Ok(())
    }

    /// Deterministic linearization of the partial order
    ///
    /// Kahn's algorithm over the explicit and phase edges; among ready steps
    /// the smallest (phase, declaration index) goes first. Steps on a cycle
    /// (rejected by `validate`) are appended in declaration order.
    pub fn canonical_order(&self) -> Vec<&LifecycleStep> {
        let graph = self.graph();
        let mut in_degree: Vec<usize> = graph
            .node_indices()
            .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<(Phase, usize)>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| Reverse((self.steps[i].phase, i)))
            .collect();

        let mut emitted = vec![false; self.steps.len()];
        let mut order = Vec::with_capacity(self.steps.len());
        while let Some(Reverse((_, idx))) = ready.pop() {
            emitted[idx] = true;
            order.push(&self.steps[idx]);
            for next in graph.neighbors_directed(NodeIndex::new(idx), Direction::Outgoing) {
                let n = next.index();
                in_degree[n] -= 1;
                if in_degree[n] == 0 {
                    ready.push(Reverse((self.steps[n].phase, n)));
                }
            }
        }

        for (idx, done) in emitted.iter().enumerate() {
            if !done {
                order.push(&self.steps[idx]);
            }
        }
        order
    }

    /// Order a component's overrides along the protocol
    ///
    /// Exact signature matches take the step's slot; otherwise the first
    /// step with the same name. Overrides matching nothing run as Active
    /// steps right before the first Teardown step. Nothing is dropped.
    pub fn place(&self, overrides: &[MethodSignature]) -> Vec<PlacedOverride> {
        let order = self.canonical_order();
        let position = |m: &MethodSignature| {
            order
                .iter()
                .position(|step| step.method.matches(m))
                .or_else(|| order.iter().position(|step| step.method.name == m.name))
        };
        let first_teardown = order
            .iter()
            .position(|step| step.phase == Phase::Teardown)
            .unwrap_or(order.len());

        let mut keyed: Vec<(usize, usize, PlacedOverride)> = overrides
            .iter()
            .enumerate()
            .map(|(i, method)| match position(method) {
                Some(pos) => (
                    pos * 2 + 1,
                    i,
                    PlacedOverride {
                        method: method.clone(),
                        phase: order[pos].phase,
                        unmatched: false,
                    },
                ),
                None => (
                    first_teardown * 2,
                    i,
                    PlacedOverride {
                        method: method.clone(),
                        phase: Phase::Active,
                        unmatched: true,
                    },
                ),
            })
            .collect();

        keyed.sort_by_key(|(slot, i, _)| (*slot, *i));
        keyed.into_iter().map(|(_, _, placed)| placed).collect()
    }

    fn graph(&self) -> DiGraph<usize, ()> {
        let mut graph = DiGraph::with_capacity(self.steps.len(), self.edges.len());
        let nodes: Vec<NodeIndex> = (0..self.steps.len()).map(|i| graph.add_node(i)).collect();

        for &(before, after) in &self.edges {
            if before < nodes.len() && after < nodes.len() {
                graph.add_edge(nodes[before], nodes[after], ());
            }
        }

        // Phase edges between adjacent phase groups
        for (a, from) in self.steps.iter().enumerate() {
            for (b, to) in self.steps.iter().enumerate() {
                if phase_successor(from.phase) == Some(to.phase) {
                    graph.add_edge(nodes[a], nodes[b], ());
                }
            }
        }
        graph
    }
}

fn phase_successor(phase: Phase) -> Option<Phase> {
    match phase {
        Phase::Create => Some(Phase::Active),
        Phase::Active => Some(Phase::Teardown),
        Phase::Teardown => None,
    }
}
