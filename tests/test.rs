use layered::core::geometry::Point;

#[cfg(test)]
mod tests {

    use layered::core::base::{
        NodeFlexibility, NodeKind, PortConstraints, PortSide, SideSet,
    };
    use layered::core::geometry::{Margins, Point};
    use layered::core::options::LayoutOptions;
    use layered::pack;
    use layered::pack::{ComponentGroup, ComponentsCompactor};
    use layered::topo::graph::{LayeredGraph, NodeHandle};
    use layered::topo::placer::{verifier, PlacementStrategy, Placer};

    fn box_node(g: &mut LayeredGraph, w: f64, h: f64) -> NodeHandle {
        let n = g.add_node(NodeKind::Normal);
        g.node_mut(n).size = Point::new(w, h);
        n
    }

    fn connect(g: &mut LayeredGraph, from: NodeHandle, to: NodeHandle) {
        let p = g.add_port(from, PortSide::East);
        let q = g.add_port(to, PortSide::West);
        g.port_mut(p).pos = Point::new(g.node(from).size.x, g.node(from).size.y / 2.);
        g.port_mut(q).pos = Point::new(0., g.node(to).size.y / 2.);
        g.add_edge(p, q);
    }

    /// Three layers with a fan-in, a long edge dummy and a sink.
    fn build_fan_graph() -> LayeredGraph {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let a0 = box_node(&mut g, 20., 20.);
        let a1 = box_node(&mut g, 20., 20.);
        let a2 = box_node(&mut g, 20., 20.);
        let b0 = box_node(&mut g, 30., 30.);
        let b1 = box_node(&mut g, 20., 20.);
        let dummy = g.add_node(NodeKind::LongEdge);
        let c0 = box_node(&mut g, 25., 25.);

        connect(&mut g, a0, b0);
        connect(&mut g, a1, b0);
        connect(&mut g, a2, b1);
        connect(&mut g, b0, c0);
        connect(&mut g, b1, dummy);
        connect(&mut g, dummy, c0);

        g.set_layers(vec![vec![a0, a1, a2], vec![b0, b1], vec![dummy], vec![c0]]);
        g
    }

    fn anchor_ys(g: &LayeredGraph) -> Vec<f64> {
        g.iter_nodes().map(|n| g.node(n).pos.y).collect()
    }

    #[test]
    fn network_simplex_keeps_separation() {
        let mut g = build_fan_graph();
        Placer::new(&mut g).place(PlacementStrategy::NetworkSimplex);
        verifier::do_it(&g);
    }

    #[test]
    fn linear_segments_keeps_separation() {
        let mut g = build_fan_graph();
        Placer::new(&mut g).place(PlacementStrategy::LinearSegments);
        verifier::do_it(&g);
    }

    #[test]
    fn network_simplex_is_idempotent() {
        let mut g = build_fan_graph();
        Placer::new(&mut g).place(PlacementStrategy::NetworkSimplex);
        let first = anchor_ys(&g);
        Placer::new(&mut g).place(PlacementStrategy::NetworkSimplex);
        assert_eq!(first, anchor_ys(&g));
    }

    #[test]
    fn network_simplex_favor_straight_keeps_separation() {
        let mut g = build_fan_graph();
        g.options.favor_straight_edges = true;
        Placer::new(&mut g).place(PlacementStrategy::NetworkSimplex);
        verifier::do_it(&g);
    }

    /// Two left nodes feeding one right node: the sink's anchor must end up
    /// within the corridor spanned by the two source anchors, for both
    /// placement strategies.
    fn fan_in_pair(strategy: PlacementStrategy) {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let l0 = box_node(&mut g, 10., 10.);
        let l1 = box_node(&mut g, 10., 10.);
        let r0 = box_node(&mut g, 10., 10.);
        connect(&mut g, l0, r0);
        connect(&mut g, l1, r0);
        g.set_layers(vec![vec![l0, l1], vec![r0]]);

        Placer::new(&mut g).place(strategy);
        verifier::do_it(&g);

        let y0 = g.node(l0).pos.y + 5.;
        let y1 = g.node(l1).pos.y + 5.;
        let yr = g.node(r0).pos.y + 5.;
        assert!(y0 < y1);
        assert!(yr >= y0 - 0.001 && yr <= y1 + 0.001, "sink outside corridor");
    }

    #[test]
    fn fan_in_stays_within_corridor() {
        fan_in_pair(PlacementStrategy::NetworkSimplex);
        fan_in_pair(PlacementStrategy::LinearSegments);
    }

    #[test]
    fn flexible_ports_make_both_edges_straight() {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let l0 = box_node(&mut g, 10., 10.);
        let l1 = box_node(&mut g, 10., 10.);
        let r0 = box_node(&mut g, 10., 40.);
        g.node_mut(r0).flexibility = NodeFlexibility::PortPosition;
        g.node_mut(r0).port_constraints = PortConstraints::Free;

        let p0 = g.add_port(l0, PortSide::East);
        g.port_mut(p0).pos = Point::new(10., 5.);
        let p1 = g.add_port(l1, PortSide::East);
        g.port_mut(p1).pos = Point::new(10., 5.);
        let q0 = g.add_port(r0, PortSide::West);
        g.port_mut(q0).pos = Point::new(0., 0.);
        let q1 = g.add_port(r0, PortSide::West);
        g.port_mut(q1).pos = Point::new(0., 10.);
        let e0 = g.add_edge(p0, q0);
        let e1 = g.add_edge(p1, q1);

        g.set_layers(vec![vec![l0, l1], vec![r0]]);
        Placer::new(&mut g).place(PlacementStrategy::NetworkSimplex);

        // Both edges can be drawn straight by moving the ports, so the
        // optimum does exactly that. The node itself must not be resized.
        for e in [e0, e1] {
            let edge_src = g.edge(e).source;
            let edge_tgt = g.edge(e).target;
            let sy = g.absolute_anchor(edge_src).y;
            let ty = g.absolute_anchor(edge_tgt).y;
            assert!((sy - ty).abs() < 0.001, "edge is not straight");
        }
        assert_eq!(g.node(r0).size.y, 40.);
    }

    #[test]
    fn elastic_nodes_grow_but_never_shrink() {
        let mut g = LayeredGraph::new(LayoutOptions::default());
        let l0 = box_node(&mut g, 10., 10.);
        let l1 = box_node(&mut g, 10., 10.);
        let r0 = box_node(&mut g, 10., 20.);
        g.node_mut(r0).flexibility = NodeFlexibility::NodeSizeWhereSpacePermits;
        g.node_mut(r0).port_constraints = PortConstraints::Free;

        let p0 = g.add_port(l0, PortSide::East);
        g.port_mut(p0).pos = Point::new(10., 5.);
        let p1 = g.add_port(l1, PortSide::East);
        g.port_mut(p1).pos = Point::new(10., 5.);
        let q0 = g.add_port(r0, PortSide::West);
        g.port_mut(q0).pos = Point::new(0., 0.);
        let q1 = g.add_port(r0, PortSide::West);
        g.port_mut(q1).pos = Point::new(0., 10.);
        g.add_edge(p0, q0);
        g.add_edge(p1, q1);

        g.set_layers(vec![vec![l0, l1], vec![r0]]);
        Placer::new(&mut g).place(PlacementStrategy::NetworkSimplex);

        // The node grows to host both port anchors and to fill the space
        // down to the lower source, but it never shrinks.
        assert!(g.node(r0).size.y >= 20.);
        assert!((g.node(r0).pos.y + g.node(r0).size.y - 35.).abs() < 0.001);
    }

    #[test]
    fn component_group_scenario() {
        // A component with no external connections, one connecting west,
        // and one connecting on all four sides.
        let mut group = ComponentGroup::new(false);
        assert!(group.add(0, SideSet::NONE));
        assert!(group.add(1, SideSet::WEST));
        assert!(!group.add(2, SideSet::NORTH_EAST_SOUTH_WEST));

        // The rejected component starts a new group.
        let second = ComponentGroup::with_component(
            2,
            SideSet::NORTH_EAST_SOUTH_WEST,
            false,
        );
        assert_eq!(second.components(), &[2]);
    }

    fn margin_box(g: &LayeredGraph, n: NodeHandle) -> (Point, Point) {
        let node = g.node(n);
        (
            Point::new(node.pos.x - node.margin.left, node.pos.y - node.margin.top),
            Point::new(
                node.pos.x + node.size.x + node.margin.right,
                node.pos.y + node.size.y + node.margin.bottom,
            ),
        )
    }

    fn assert_spaced_apart(g: &LayeredGraph, spacing: f64) {
        let nodes: Vec<NodeHandle> = g.iter_nodes().collect();
        for i in 0..nodes.len() {
            for j in i + 1..nodes.len() {
                let (min_a, max_a) = margin_box(g, nodes[i]);
                let (min_b, max_b) = margin_box(g, nodes[j]);
                let half = spacing / 2. - 0.001;
                let overlap_x = min_a.x - half < max_b.x + half
                    && min_b.x - half < max_a.x + half;
                let overlap_y = min_a.y - half < max_b.y + half
                    && min_b.y - half < max_a.y + half;
                assert!(
                    !(overlap_x && overlap_y),
                    "components {} and {} packed too close",
                    i,
                    j
                );
            }
        }
    }

    fn single_box_component(
        options: &LayoutOptions,
        w: f64,
        h: f64,
        margin: f64,
        sides: SideSet,
    ) -> LayeredGraph {
        let mut component = LayeredGraph::new(options.clone());
        let n = component.add_node(NodeKind::Normal);
        component.node_mut(n).pos = Point::new(margin, margin);
        component.node_mut(n).size = Point::new(w - 2. * margin, h - 2. * margin);
        component.node_mut(n).margin = Margins::uniform(margin);
        component.size = Point::new(w, h);
        component.ext_port_sides = sides;
        component
    }

    #[test]
    fn row_packing_keeps_components_apart() {
        let options = LayoutOptions::default();
        let spacing = options.spacing_component_component;
        let components = vec![
            single_box_component(&options, 60., 40., 5., SideSet::NONE),
            single_box_component(&options, 30., 30., 5., SideSet::NONE),
            single_box_component(&options, 80., 20., 5., SideSet::NONE),
            single_box_component(&options, 25., 55., 5., SideSet::NONE),
        ];

        let mut target = LayeredGraph::new(options);
        pack::combine(components, &mut target);

        assert_eq!(target.num_nodes(), 4);
        assert!(target.size.x > 0. && target.size.y > 0.);
        assert_spaced_apart(&target, spacing);
    }

    #[test]
    fn sector_packing_keeps_components_apart() {
        let options = LayoutOptions::default();
        let spacing = options.spacing_component_component;
        let components = vec![
            single_box_component(&options, 40., 40., 0., SideSet::NONE),
            single_box_component(&options, 30., 50., 0., SideSet::WEST),
            single_box_component(&options, 50., 30., 0., SideSet::NORTH_EAST_SOUTH_WEST),
        ];

        let mut target = LayeredGraph::new(options);
        pack::combine(components, &mut target);

        assert_eq!(target.num_nodes(), 3);
        assert_spaced_apart(&target, spacing);
    }

    #[test]
    fn combine_singleton_keeps_size_and_padding() {
        let mut options = LayoutOptions::default();
        options.thoroughness = 3;
        let mut component = single_box_component(&options, 40., 30., 0., SideSet::NONE);
        component.padding = Margins::new(1., 2., 3., 4.);

        let mut target = LayeredGraph::new(LayoutOptions::default());
        pack::combine(vec![component], &mut target);

        assert_eq!(target.num_nodes(), 1);
        assert_eq!(target.size, Point::new(40., 30.));
        assert_eq!(target.padding, Margins::new(1., 2., 3., 4.));
        assert_eq!(target.options.thoroughness, 3);
    }

    #[test]
    fn compactor_slides_components_together() {
        let options = LayoutOptions::default();
        let mut components = vec![
            single_box_component(&options, 10., 10., 0., SideSet::NONE),
            single_box_component(&options, 10., 10., 0., SideSet::NONE),
        ];
        // Put the second component far to the right.
        components[1].translate(Point::new(100., 0.));

        let mut compactor = ComponentsCompactor::new();
        compactor.compact(&mut components, Point::new(110., 10.), 20.);

        let n = components[1].iter_nodes().next().unwrap();
        assert_eq!(components[1].node(n).pos.x, 30.);
        assert_eq!(compactor.graph_size(), Point::new(40., 10.));
        assert_eq!(compactor.offset(), Point::zero());
    }
}

#[test]
fn point_arithmetic() {
    let p = Point::new(3., 4.);
    let q = p.add(Point::new(1., -1.)).scale(2.);
    assert_eq!(q, Point::new(8., 6.));
    assert_eq!(q.sub(q), Point::zero());
}
