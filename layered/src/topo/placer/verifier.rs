//! Checks that a placement satisfies the separation invariant: within each
//! layer, consecutive nodes keep their order and the configured spacing.

use crate::topo::graph::LayeredGraph;
use crate::topo::placer::EPSILON;

pub fn do_it(graph: &LayeredGraph) {
    for layer in &graph.layers {
        for pair in layer.windows(2) {
            let first = graph.node(pair[0]);
            let second = graph.node(pair[1]);
            let spacing = graph.vertical_spacing(pair[0], pair[1]);

            let first_extent = first.pos.y + first.size.y + first.margin.bottom;
            let second_start = second.pos.y - second.margin.top;
            assert!(
                second_start - first_extent >= spacing - EPSILON,
                "nodes in a layer must keep their spacing"
            );
        }
    }
}
