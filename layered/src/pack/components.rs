//! Splitting a graph into its connected components and combining the
//! independently laid out components back into one target graph.
//!
//! Splitting happens before layout: every component becomes its own graph
//! carrying a copy of the parent's options and the set of external port
//! sides it connects to. Combination happens after layout: a placer
//! computes non-overlapping offsets for the components, optionally followed
//! by compaction, and finally every node is moved into the target graph.

use crate::core::base::{ComponentOrdering, EdgeRouting, NodeKind, SideSet};
use crate::core::geometry::Point;
use crate::pack::row;
use crate::pack::sectors;
use crate::topo::graph::{LayeredGraph, NodeHandle};

/// Split \p graph into its connected components. Each component is a fresh
/// graph with the parent's options; node, port and edge data is copied over
/// with remapped handles. The component's `ext_port_sides` records the
/// boundary sides of the external-port dummies it contains.
pub fn split(graph: &LayeredGraph) -> Vec<LayeredGraph> {
    let n = graph.num_nodes();
    let mut component_of = vec![usize::MAX; n];
    let mut num_components = 0;

    // DFS over node adjacency with an explicit stack.
    for start in graph.iter_nodes() {
        if component_of[start.get_index()] != usize::MAX {
            continue;
        }
        let comp = num_components;
        num_components += 1;
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if component_of[node.get_index()] != usize::MAX {
                continue;
            }
            component_of[node.get_index()] = comp;
            for e in graph.connected_edges(node) {
                stack.push(graph.other_end(e, node));
            }
        }
    }

    let mut members: Vec<Vec<NodeHandle>> = vec![Vec::new(); num_components];
    for node in graph.iter_nodes() {
        members[component_of[node.get_index()]].push(node);
    }

    members
        .into_iter()
        .map(|nodes| extract_component(graph, &nodes))
        .collect()
}

/// Copy the given nodes (with their ports and edges) out of \p graph into a
/// fresh graph. All edges of a connected component are internal to it, so
/// the copy is self-contained.
fn extract_component(graph: &LayeredGraph, nodes: &[NodeHandle]) -> LayeredGraph {
    let mut component = LayeredGraph::new(graph.options.clone());
    component.padding = graph.padding;

    let mut node_map = vec![usize::MAX; graph.num_nodes()];
    for (i, &n) in nodes.iter().enumerate() {
        node_map[n.get_index()] = i;
    }

    let mut ext_sides = SideSet::NONE;
    let mut port_map = std::collections::HashMap::new();
    for &n in nodes {
        let node = graph.node(n);
        let new_node = component.add_node(node.kind);
        {
            let copy = component.node_mut(new_node);
            copy.pos = node.pos;
            copy.size = node.size;
            copy.margin = node.margin;
            copy.labels = node.labels.clone();
            copy.flexibility = node.flexibility;
            copy.port_constraints = node.port_constraints;
            copy.ext_port_side = node.ext_port_side;
        }
        if node.kind == NodeKind::ExternalPort {
            if let Some(side) = node.ext_port_side {
                ext_sides = ext_sides.with(side);
            }
        }
        for &p in &node.ports {
            let port = graph.port(p);
            let new_port = component.add_port(new_node, port.side);
            component.port_mut(new_port).pos = port.pos;
            component.port_mut(new_port).anchor = port.anchor;
            port_map.insert(p, new_port);
        }
    }
    component.ext_port_sides = ext_sides;

    for e in graph.iter_edges() {
        let edge = graph.edge(e);
        let src_owner = graph.port_owner(edge.source);
        if node_map[src_owner.get_index()] == usize::MAX {
            continue;
        }
        let new_edge =
            component.add_edge(port_map[&edge.source], port_map[&edge.target]);
        let copy = component.edge_mut(new_edge);
        copy.bends = edge.bends.clone();
        copy.priority = edge.priority;
        copy.thickness = edge.thickness;
        copy.labels = edge.labels.clone();
    }

    component
}

/// Combine the laid-out components into \p target: compute non-overlapping
/// offsets for all of them, optionally compact, and move every node into
/// the target graph. The target must be empty; an empty component list
/// yields a zero-size target.
pub fn combine(mut components: Vec<LayeredGraph>, target: &mut LayeredGraph) {
    assert!(
        target.num_nodes() == 0,
        "the target graph must start out empty"
    );

    if components.is_empty() {
        target.size = Point::zero();
        return;
    }

    target.options = components[0].options.clone();
    target.padding = components[0].padding;

    let model_order = matches!(
        target.options.component_ordering,
        ComponentOrdering::ModelOrder
    );
    let external_ports = components
        .iter()
        .any(|c| !c.ext_port_sides.is_empty());

    if external_ports {
        sectors::place_component_groups(&mut components, target, model_order);
    } else {
        row::place_component_rows(&mut components, target, model_order);
    }

    for component in components.iter_mut() {
        target.absorb(component);
    }
}

/// \returns True if the options allow running the components compactor:
/// the caller asked for it and edges are routed orthogonally.
pub fn compaction_allowed(graph: &LayeredGraph) -> bool {
    graph.options.compact_components
        && graph.options.edge_routing == EdgeRouting::Orthogonal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::base::PortSide;
    use crate::core::options::LayoutOptions;

    fn box_node(
        g: &mut LayeredGraph,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> NodeHandle {
        let n = g.add_node(NodeKind::Normal);
        g.node_mut(n).pos = Point::new(x, y);
        g.node_mut(n).size = Point::new(w, h);
        n
    }

    #[test]
    fn split_finds_components() {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let a = box_node(&mut g, 0., 0., 10., 10.);
        let b = box_node(&mut g, 30., 0., 10., 10.);
        let _lonely = box_node(&mut g, 60., 0., 10., 10.);
        let pa = g.add_port(a, PortSide::East);
        let pb = g.add_port(b, PortSide::West);
        g.add_edge(pa, pb);

        let components = split(&g);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].num_nodes(), 2);
        assert_eq!(components[0].num_edges(), 1);
        assert_eq!(components[1].num_nodes(), 1);
    }

    #[test]
    fn combine_of_nothing_is_empty() {
        let mut target = LayeredGraph::new(LayoutOptions::default());
        combine(Vec::new(), &mut target);
        assert_eq!(target.num_nodes(), 0);
        assert_eq!(target.size, Point::zero());
    }

    #[test]
    fn combine_singleton_keeps_geometry() {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        box_node(&mut g, 0., 0., 40., 30.);
        g.size = Point::new(40., 30.);

        let mut target = LayeredGraph::new(LayoutOptions::default());
        combine(vec![g], &mut target);
        assert_eq!(target.num_nodes(), 1);
        assert_eq!(target.size, Point::new(40., 30.));
    }
}
