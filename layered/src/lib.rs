/*!
This crate provides the placement core of a layered ("Sugiyama-style") graph
drawing engine: given a graph whose nodes have already been assigned to
layers and ordered within them, it computes concrete coordinates. Two node
placement algorithms assign the cross-layer axis -- a network-simplex based
placer that straightens edges by weighted optimization, and a linear-segments
placer based on Sander's force heuristic. A component packer combines the
drawings of disconnected subgraphs into one coordinate space, grouping them
by the external port sides they connect to and optionally compacting the
result along their rectilinear hulls.

The crate does not parse graphs, assign layers, minimize crossings or route
edges; those phases belong to the surrounding pipeline.

# Example: place a small layered graph

```rust
use layered::core::base::{NodeKind, PortSide};
use layered::core::geometry::Point;
use layered::core::options::LayoutOptions;
use layered::topo::graph::LayeredGraph;
use layered::topo::placer::{PlacementStrategy, Placer};

// Create a new graph:
let mut graph = LayeredGraph::new(LayoutOptions::default());

// Two nodes on the left, one on the right:
let l0 = graph.add_node(NodeKind::Normal);
let l1 = graph.add_node(NodeKind::Normal);
let r0 = graph.add_node(NodeKind::Normal);
for &n in &[l0, l1, r0] {
    graph.node_mut(n).size = Point::new(10., 10.);
}

// Connect them through ports.
let p0 = graph.add_port(l0, PortSide::East);
let p1 = graph.add_port(l1, PortSide::East);
let p2 = graph.add_port(r0, PortSide::West);
graph.add_edge(p0, p2);
graph.add_edge(p1, p2);

// The pipeline has already decided on layers and the order within them.
graph.set_layers(vec![vec![l0, l1], vec![r0]]);

// Assign the vertical coordinates.
Placer::new(&mut graph).place(PlacementStrategy::NetworkSimplex);

// Nodes in the left layer keep their spacing.
let gap = graph.node(l1).pos.y - (graph.node(l0).pos.y + 10.);
assert!(gap >= graph.options.spacing_node_node);
```
*/

pub mod adt;
pub mod core;
pub mod pack;
pub mod topo;
