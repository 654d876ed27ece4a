//! Deterministic ordering of self loops. Edge routing draws a node's self
//! loops as nested arcs; this pass decides the order in which the loops are
//! routed and how deeply each one nests, so that shorter loops end up inside
//! longer ones and the result does not depend on insertion order.

use crate::topo::graph::{EdgeHandle, LayeredGraph, NodeHandle};

/// One self loop of a node, with its routing order resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfLoop {
    pub edge: EdgeHandle,
    /// Nesting depth among the loops that share the same side pair; the
    /// innermost loop has level zero.
    pub nesting: usize,
}

/// Collect and order the self loops of \p node.
///
/// Loops are grouped by the pair of sides their ports sit on, groups are
/// ordered clockwise starting at north, and within a group the loop
/// spanning fewer ports nests further inside.
pub fn order_self_loops(graph: &LayeredGraph, node: NodeHandle) -> Vec<SelfLoop> {
    let mut loops: Vec<(usize, usize, EdgeHandle)> = Vec::new();

    for e in graph.connected_edges(node) {
        if !graph.is_self_loop(e) {
            continue;
        }
        // A self loop shows up at both of its ports; keep one copy.
        if loops.iter().any(|&(_, _, other)| other == e) {
            continue;
        }
        let edge = graph.edge(e);

        let src = graph.port(edge.source);
        let tgt = graph.port(edge.target);
        let class = src.side.index() * 4 + tgt.side.index();
        let span = port_distance(graph, node, edge.source, edge.target);
        loops.push((class, span, e));
    }

    loops.sort_by_key(|&(class, span, e)| (class, span, e));

    let mut res = Vec::with_capacity(loops.len());
    let mut i = 0;
    while i < loops.len() {
        let class = loops[i].0;
        let mut nesting = 0;
        while i < loops.len() && loops[i].0 == class {
            res.push(SelfLoop {
                edge: loops[i].2,
                nesting,
            });
            nesting += 1;
            i += 1;
        }
    }
    res
}

/// The number of ports between the two endpoints in the node's port list.
fn port_distance(
    graph: &LayeredGraph,
    node: NodeHandle,
    a: crate::topo::graph::PortHandle,
    b: crate::topo::graph::PortHandle,
) -> usize {
    let ports = &graph.node(node).ports;
    let ia = ports.iter().position(|&p| p == a).unwrap_or(0);
    let ib = ports.iter().position(|&p| p == b).unwrap_or(0);
    ia.max(ib) - ia.min(ib)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::base::{NodeKind, PortSide};
    use crate::core::options::LayoutOptions;

    #[test]
    fn loops_nest_by_span() {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let n = g.add_node(NodeKind::Normal);
        let p0 = g.add_port(n, PortSide::East);
        let p1 = g.add_port(n, PortSide::East);
        let p2 = g.add_port(n, PortSide::East);

        // A wide loop and a narrow one on the same side pair.
        let wide = g.add_edge(p0, p2);
        let narrow = g.add_edge(p1, p2);

        let loops = order_self_loops(&g, n);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].edge, narrow);
        assert_eq!(loops[0].nesting, 0);
        assert_eq!(loops[1].edge, wide);
        assert_eq!(loops[1].nesting, 1);
    }

    #[test]
    fn side_pairs_group_independently() {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let n = g.add_node(NodeKind::Normal);
        let pn = g.add_port(n, PortSide::North);
        let pe = g.add_port(n, PortSide::East);
        let pw = g.add_port(n, PortSide::West);

        let ne = g.add_edge(pn, pe);
        let nw = g.add_edge(pn, pw);

        let loops = order_self_loops(&g, n);
        assert_eq!(loops.len(), 2);
        // Both start a fresh group, so neither nests.
        assert!(loops.iter().all(|l| l.nesting == 0));
        // North-east sorts before north-west.
        assert_eq!(loops[0].edge, ne);
        assert_eq!(loops[1].edge, nw);
    }
}
