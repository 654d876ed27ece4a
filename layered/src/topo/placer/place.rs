//! This module contains the placer, the entry point of the node placement
//! phase. The surrounding pipeline hands in a graph with layers and in-layer
//! order fixed; the placer assigns the cross-layer coordinate.

use crate::topo::graph::LayeredGraph;
use crate::topo::placer::linear_segments::LinearSegmentsPlacer;
use crate::topo::placer::network_simplex::NetworkSimplexPlacer;

/// The available node placement algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStrategy {
    /// Weighted-constraint placement via the network simplex. The slowest
    /// strategy, and the one producing the straightest edges.
    NetworkSimplex,
    /// Sander's linear-segments heuristic.
    LinearSegments,
}

pub struct Placer<'a> {
    graph: &'a mut LayeredGraph,
}

impl<'a> Placer<'a> {
    pub fn new(graph: &'a mut LayeredGraph) -> Self {
        Self { graph }
    }

    pub fn place(&mut self, strategy: PlacementStrategy) {
        #[cfg(feature = "log")]
        log::info!(
            "Starting node placement of {} nodes with {:?}.",
            self.graph.num_nodes(),
            strategy
        );

        if self.graph.layers.is_empty() {
            return;
        }

        match strategy {
            PlacementStrategy::NetworkSimplex => {
                NetworkSimplexPlacer::new(self.graph).do_it();
            }
            PlacementStrategy::LinearSegments => {
                LinearSegmentsPlacer::new(self.graph).do_it();
            }
        }

        // Track the graph extent; the surrounding pipeline relies on it.
        let mut bottom = 0.0f64;
        for n in self.graph.iter_nodes() {
            let node = self.graph.node(n);
            bottom = bottom.max(node.pos.y + node.size.y + node.margin.bottom);
        }
        self.graph.size.y = self.graph.size.y.max(bottom);
    }
}
