//! This module implements the node placement strategy described by Gansner
//! et al. in "A technique for drawing directed graphs" (1993): the vertical
//! placement problem is converted into an auxiliary constraint graph which
//! is then layered by the network simplex solver.
//!
//! Node positions become integral layer values, so all port positions and
//! margins are discretized before the auxiliary graph is built.
//!
//! The plain auxiliary graph admits symmetric optimal solutions that show up
//! as edge stair-cases:
//!
//! ```text
//!   __
//!  |  |
//!  |n1|--.   __
//!  |__|  ^--|n2|--.   ____
//!                 ^--|    |
//!   __               | n3 |
//!  |n4|--------------|____|
//! ```
//!
//! With the favor-straight-edges option we additionally chain the dummy
//! vertices of edges that form junction-free paths, which trades a little
//! slack for fewer bends:
//!
//! ```text
//!   __
//!  |  |      __
//!  |n1|-----|n2|--.
//!  |__|           |   ____
//!                 ^--|    |
//!   __               | n3 |
//!  |n4|--------------|____|
//! ```

use crate::adt::ns::{NetworkSimplex, NsGraph, VertexHandle};
use crate::core::base::{NodeKind, PortConstraints, PortSide};
use crate::core::base::{NodeFlexibility, VerticalLabelPlacement};
use crate::topo::graph::{EdgeHandle, LayeredGraph, NodeHandle, PortHandle};

/// Smaller weight than the straightening weights, used for ties that matter
/// less than horizontal straightness.
const SMALL_EDGE_WEIGHT: f64 = 0.1;
/// Weight of the size edge of a flexible node that must not change its
/// height. Heavier than any straightening weight so the node stays rigid.
const RIGID_SIZE_WEIGHT: f64 = 400.;
/// Weight of the size edge of a node that may be resized freely.
const FREE_SIZE_WEIGHT: f64 = 1.;
/// Weight of the straightening chains inserted along junction-free paths.
const PATH_STRAIGHTNESS_WEIGHT: f64 = 1.;
/// Weight that pins a rigid node to its first-pass position during the
/// elastic second pass.
const PIN_WEIGHT: f64 = 1000.;

/// Node states used while identifying junction-free paths.
const STATE_OTHER: i8 = 0;
/// A leaf has exactly one incident edge.
const STATE_LEAF: i8 = 1;
/// A junction has an incoming or outgoing degree larger than one.
const STATE_JUNCTION: i8 = 2;
const STATE_VISITED: i8 = -1;

pub struct NetworkSimplexPlacer<'a> {
    graph: &'a mut LayeredGraph,

    aux: NsGraph,
    /// Auxiliary vertex of each node's top border, indexed by node.
    head: Vec<VertexHandle>,
    /// Auxiliary vertex of each node's bottom border. Equal to the head for
    /// nodes that are not flexible.
    tail: Vec<VertexHandle>,
    /// Whether a node's ports and size take part in the optimization.
    flexible: Vec<bool>,
    /// The discretized margin-box height of each node.
    extent: Vec<i32>,
    /// Auxiliary vertex per west/east port of a flexible node.
    port_vertex: Vec<Option<VertexHandle>>,
    /// The shared dummy vertex of each converted edge.
    edge_vertex: Vec<Option<VertexHandle>>,
    /// Edges that cross another edge between the same pair of layers.
    crossing: Vec<bool>,
    /// Junction-free paths of exactly two edges, kept for local repair as
    /// (center node, first edge, second edge).
    two_paths: Vec<(NodeHandle, EdgeHandle, EdgeHandle)>,
}

impl<'a> NetworkSimplexPlacer<'a> {
    pub fn new(graph: &'a mut LayeredGraph) -> Self {
        let nodes = graph.num_nodes();
        let ports = graph.iter_nodes().map(|n| graph.node(n).ports.len()).sum();
        let edges = graph.num_edges();
        Self {
            graph,
            aux: NsGraph::new(),
            head: vec![VertexHandle::default(); nodes],
            tail: vec![VertexHandle::default(); nodes],
            flexible: vec![false; nodes],
            extent: vec![0; nodes],
            port_vertex: vec![None; ports],
            edge_vertex: vec![None; edges],
            crossing: vec![false; edges],
            two_paths: Vec::new(),
        }
    }

    pub fn do_it(&mut self) {
        #[cfg(feature = "log")]
        log::info!(
            "Network simplex placement of {} nodes.",
            self.graph.num_nodes()
        );

        self.discretize();
        self.mark_flexible_nodes();
        self.mark_crossing_edges();

        self.build_aux_graph(None);
        if self.graph.options.favor_straight_edges {
            self.insert_straightening_chains();
        }
        let (head_vals, tail_vals) = self.solve();

        // Nodes with the resize-where-space-permits mode get a second pass
        // in which rigid nodes are pinned and the size edges are relaxed.
        let elastic = self
            .graph
            .iter_nodes()
            .any(|n| self.flexible[n.get_index()]
                && self.graph.node(n).flexibility.allows_resize());
        let (head_vals, tail_vals) = if elastic {
            self.build_aux_graph(Some((&head_vals, &tail_vals)));
            if self.graph.options.favor_straight_edges {
                self.insert_straightening_chains();
            }
            self.solve()
        } else {
            (head_vals, tail_vals)
        };

        self.apply_positions(&head_vals, &tail_vals);
        self.repair_two_paths();
    }

    /// The solver works with integral layer values, so port anchors and top
    /// margins are forced onto the integer grid first.
    fn discretize(&mut self) {
        for n in self.graph.iter_nodes() {
            let margin_top = self.graph.node(n).margin.top.ceil();
            self.graph.node_mut(n).margin.top = margin_top;
            let ports = self.graph.node(n).ports.clone();
            for p in ports {
                let port = self.graph.port(p);
                let y = port.pos.y + port.anchor.y;
                if y != y.floor() {
                    let offset = y - y.round();
                    self.graph.port_mut(p).pos.y -= offset;
                }
            }
        }
    }

    /// A node is flexible if it is a normal node with several ports whose
    /// positions are not fixed, flexibility is enabled for it, and -- when
    /// no resizing is permitted -- its height already suffices to host its
    /// west and east ports at the configured port spacing.
    fn mark_flexible_nodes(&mut self) {
        for n in self.graph.iter_nodes() {
            let node = self.graph.node(n);
            let mut flexible = node.kind.is_normal()
                && node.ports.len() > 1
                && node.port_constraints != PortConstraints::FixedPos
                && node.flexibility != NodeFlexibility::None;
            if flexible && !node.flexibility.allows_resize() {
                let west = self.graph.ports_on_side(n, PortSide::West).len();
                let east = self.graph.ports_on_side(n, PortSide::East).len();
                let stacked = west.max(east).saturating_sub(1) as f64;
                flexible =
                    node.size.y >= stacked * self.graph.options.spacing_port_port;
            }
            self.flexible[n.get_index()] = flexible;
        }
    }

    /// Detect edges that cross another edge between the same two layers. A
    /// straightening chain must not span such an edge, because the crossing
    /// makes the path impossible to draw straight anyway.
    fn mark_crossing_edges(&mut self) {
        for li in 0..self.graph.layers.len().saturating_sub(1) {
            let mut between: Vec<(EdgeHandle, usize, usize)> = Vec::new();
            for &n in &self.graph.layers[li] {
                for e in self.graph.connected_edges(n) {
                    if !self.is_handled_edge(e) {
                        continue;
                    }
                    let src = self.graph.port_owner(self.graph.edge(e).source);
                    let tgt = self.graph.port_owner(self.graph.edge(e).target);
                    if src == n && self.graph.node(tgt).layer == li + 1 {
                        between.push((
                            e,
                            self.graph.node(src).index_in_layer,
                            self.graph.node(tgt).index_in_layer,
                        ));
                    }
                }
            }
            for i in 0..between.len() {
                for j in i + 1..between.len() {
                    let (_, a0, a1) = between[i];
                    let (_, b0, b1) = between[j];
                    let crossing =
                        (a0 < b0 && a1 > b1) || (a0 > b0 && a1 < b1);
                    if crossing {
                        self.crossing[between[i].0.get_index()] = true;
                        self.crossing[between[j].0.get_index()] = true;
                    }
                }
            }
        }
    }

    /// \returns True if the edge is neither a self loop nor an in-layer
    /// edge.
    fn is_handled_edge(&self, e: EdgeHandle) -> bool {
        !self.graph.is_self_loop(e) && !self.graph.is_in_layer(e)
    }

    /// \returns True if the two nodes are connected by an in-layer edge.
    fn connected_by_in_layer_edge(&self, a: NodeHandle, b: NodeHandle) -> bool {
        // Two normal nodes never are; this avoids scanning edges in the
        // common case.
        if self.graph.node(a).kind.is_normal() && self.graph.node(b).kind.is_normal() {
            return false;
        }
        for e in self.graph.connected_edges(a) {
            if self.graph.is_in_layer(e)
                && !self.graph.is_self_loop(e)
                && self.graph.other_end(e, a) == b
            {
                return true;
            }
        }
        false
    }

    /// Build the auxiliary constraint graph. When \p pins holds the result
    /// of a previous run, the elastic variant is built instead: rigid nodes
    /// are pinned to their solved positions and the size edges of freely
    /// resizable nodes are relaxed so they can grow into available space.
    fn build_aux_graph(&mut self, pins: Option<(&Vec<i32>, &Vec<i32>)>) {
        self.aux = NsGraph::new();
        for v in self.port_vertex.iter_mut() {
            *v = None;
        }
        for v in self.edge_vertex.iter_mut() {
            *v = None;
        }
        self.two_paths.clear();

        // #1 per-node vertices, size edges, and in-layer separation edges
        for li in 0..self.graph.layers.len() {
            let layer = self.graph.layers[li].clone();
            let mut prev: Option<NodeHandle> = None;
            for &n in &layer {
                let ni = n.get_index();
                let node = self.graph.node(n);
                let mbox = (node.margin.top + node.size.y + node.margin.bottom)
                    .ceil() as i32;
                self.extent[ni] = mbox;

                if self.flexible[ni] {
                    let head = self.aux.new_vertex();
                    let tail = self.aux.new_vertex();
                    let resizable = node.flexibility.allows_resize();
                    let weight = match (resizable, pins.is_some()) {
                        // Relaxed entirely in the elastic pass.
                        (true, true) => 0.,
                        (true, false) => FREE_SIZE_WEIGHT,
                        (false, _) => RIGID_SIZE_WEIGHT,
                    };
                    self.aux.add_edge(head, tail, mbox, weight);
                    self.head[ni] = head;
                    self.tail[ni] = tail;
                    self.chain_flexible_ports(n, head, tail);
                } else {
                    let v = self.aux.new_vertex();
                    self.head[ni] = v;
                    self.tail[ni] = v;
                }

                if let Some(p) = prev {
                    let pi = p.get_index();
                    let spacing = self.graph.vertical_spacing(p, n);
                    let delta = if self.flexible[pi] {
                        spacing.ceil() as i32
                    } else {
                        (self.extent[pi] as f64 + spacing).floor() as i32
                    };
                    let weight = if self.connected_by_in_layer_edge(p, n) {
                        SMALL_EDGE_WEIGHT
                    } else {
                        0.
                    };
                    self.aux.add_edge(self.tail[pi], self.head[ni], delta, weight);
                }
                prev = Some(n);
            }
        }

        // #2 straightening constraints for the real edges
        for e in self.graph.iter_edges() {
            if !self.is_handled_edge(e) {
                continue;
            }
            let (sv, soff) = self.attachment(self.graph.edge(e).source);
            let (tv, toff) = self.attachment(self.graph.edge(e).target);

            let delta = toff - soff;
            assert!(
                delta == delta.floor(),
                "port positions must be integral before the transformation"
            );
            let port_offset = delta as i32;

            let weight = self.edge_weight(e);
            let dummy = self.aux.new_vertex();
            self.edge_vertex[e.get_index()] = Some(dummy);
            self.aux.add_edge(dummy, sv, port_offset.max(0), weight);
            self.aux.add_edge(dummy, tv, (-port_offset).max(0), weight);
        }

        // #3 ties that keep north/south port stubs short
        for n in self.graph.iter_nodes() {
            let ni = n.get_index();
            for p in self.graph.ports_on_side(n, PortSide::South) {
                if let Some(dummy) = self.graph.port(p).ns_dummy {
                    self.aux.add_edge(
                        self.tail[ni],
                        self.head[dummy.get_index()],
                        0,
                        SMALL_EDGE_WEIGHT,
                    );
                }
            }
            for p in self.graph.ports_on_side(n, PortSide::North) {
                if let Some(dummy) = self.graph.port(p).ns_dummy {
                    self.aux.add_edge(
                        self.tail[dummy.get_index()],
                        self.head[ni],
                        0,
                        SMALL_EDGE_WEIGHT,
                    );
                }
            }
        }

        // #4 pins for the elastic pass
        if let Some((head_vals, tail_vals)) = pins {
            let source = self.aux.new_vertex();
            let sink = self.aux.new_vertex();
            let top = head_vals
                .iter()
                .zip(tail_vals.iter())
                .map(|(h, t)| (*h).max(*t))
                .max()
                .unwrap_or(0);
            self.aux.add_edge(source, sink, top, SMALL_EDGE_WEIGHT);

            for n in self.graph.iter_nodes() {
                let ni = n.get_index();
                let elastic = self.flexible[ni]
                    && self.graph.node(n).flexibility.allows_resize();
                if elastic {
                    // Keep the top in place with a soft floor, and pull the
                    // bottom towards the sink so the node grows.
                    self.aux.add_edge(source, self.head[ni], head_vals[ni], 0.);
                    self.aux.add_edge(self.tail[ni], sink, 0, FREE_SIZE_WEIGHT);
                } else {
                    self.aux.add_edge(
                        source,
                        self.head[ni],
                        head_vals[ni],
                        PIN_WEIGHT,
                    );
                    self.aux.add_edge(
                        self.tail[ni],
                        sink,
                        top - tail_vals[ni],
                        PIN_WEIGHT,
                    );
                }
            }
        }
    }

    /// Give every west and east port of a flexible node its own vertex and
    /// chain them top-to-bottom between the node's border vertices.
    fn chain_flexible_ports(
        &mut self,
        n: NodeHandle,
        head: VertexHandle,
        tail: VertexHandle,
    ) {
        let node = self.graph.node(n);
        let margin_top = node.margin.top.ceil() as i32;
        let margin_bottom = node.margin.bottom.ceil() as i32;
        let port_spacing = self.graph.options.spacing_port_port.ceil() as i32;

        for side in [PortSide::West, PortSide::East] {
            let mut ports = self.graph.ports_on_side(n, side);
            ports.sort_by(|&a, &b| {
                let ya = self.graph.port(a).pos.y + self.graph.port(a).anchor.y;
                let yb = self.graph.port(b).pos.y + self.graph.port(b).anchor.y;
                ya.partial_cmp(&yb).unwrap()
            });

            let mut prev = head;
            let mut prev_delta = margin_top;
            for p in ports {
                let v = self.aux.new_vertex();
                self.port_vertex[p.get_index()] = Some(v);
                self.aux.add_edge(prev, v, prev_delta, 0.);
                prev = v;
                prev_delta = port_spacing;
            }
            if prev != head {
                self.aux.add_edge(prev, tail, margin_bottom, 0.);
            }
        }
    }

    /// \returns the auxiliary vertex an edge endpoint attaches to, together
    /// with the integral offset of the anchor from that vertex.
    fn attachment(&self, p: PortHandle) -> (VertexHandle, f64) {
        if let Some(v) = self.port_vertex[p.get_index()] {
            return (v, 0.);
        }
        let port = self.graph.port(p);
        let n = port.owner;
        let node = self.graph.node(n);
        let offset = node.margin.top + port.pos.y + port.anchor.y;
        if self.flexible[n.get_index()] && port.side == PortSide::South {
            let mbox = self.extent[n.get_index()] as f64;
            (self.tail[n.get_index()], offset - mbox)
        } else {
            (self.head[n.get_index()], offset)
        }
    }

    /// The straightness weight of an edge: long-edge dummies must stay
    /// straighter than ordinary edges to avoid visible bends, so edges
    /// between dummies weigh the most.
    fn edge_weight(&self, e: EdgeHandle) -> f64 {
        let edge = self.graph.edge(e);
        let src = self.graph.node(self.graph.port_owner(edge.source));
        let tgt = self.graph.node(self.graph.port_owner(edge.target));

        let type_weight = match (src.kind.is_normal(), tgt.kind.is_normal()) {
            (true, true) => 4.,
            (true, false) | (false, true) => 8.,
            (false, false) => 32.,
        };
        edge.priority.max(1) as f64 * type_weight
    }

    /// Run the solver and read back the head and tail values per node.
    fn solve(&mut self) -> (Vec<i32>, Vec<i32>) {
        self.aux.make_connected();
        let limit =
            self.graph.options.thoroughness.max(1) as usize * self.aux.num_vertices();
        NetworkSimplex::new(&mut self.aux)
            .with_iteration_limit(limit)
            .with_balancing(false)
            .solve();

        let mut head_vals = vec![0; self.graph.num_nodes()];
        let mut tail_vals = vec![0; self.graph.num_nodes()];
        for n in self.graph.iter_nodes() {
            head_vals[n.get_index()] = self.aux.layer(self.head[n.get_index()]);
            tail_vals[n.get_index()] = self.aux.layer(self.tail[n.get_index()]);
        }
        (head_vals, tail_vals)
    }

    /// Write the solved values back into the graph: positions for everyone,
    /// height growth and new port positions for flexible nodes.
    fn apply_positions(&mut self, head_vals: &[i32], tail_vals: &[i32]) {
        for n in self.graph.iter_nodes() {
            let ni = n.get_index();
            let head = head_vals[ni];
            let margin_top = self.graph.node(n).margin.top;
            self.graph.node_mut(n).pos.y = head as f64 + margin_top;

            if !self.flexible[ni] {
                continue;
            }

            // Height growth. The size edge guarantees tail - head >= extent,
            // so a node can only ever grow here, never shrink.
            let growth = (tail_vals[ni] - head) - self.extent[ni];
            assert!(growth >= 0, "the solver violated a size constraint");
            if growth > 0 && self.graph.node(n).flexibility.allows_resize() {
                let growth = growth as f64;
                self.graph.node_mut(n).size.y += growth;
                for label in self.graph.node_mut(n).labels.iter_mut() {
                    match label.placement {
                        VerticalLabelPlacement::Top => {}
                        VerticalLabelPlacement::Center => {
                            label.pos.y += growth / 2.
                        }
                        VerticalLabelPlacement::Bottom => label.pos.y += growth,
                    }
                }
                for p in self.graph.ports_on_side(n, PortSide::South) {
                    self.graph.port_mut(p).pos.y += growth;
                }
            }

            // Reposition the ports that took part in the optimization.
            let ports = self.graph.node(n).ports.clone();
            for p in ports {
                if let Some(v) = self.port_vertex[p.get_index()] {
                    let value = self.aux.layer(v);
                    let anchor_y = self.graph.port(p).anchor.y;
                    self.graph.port_mut(p).pos.y =
                        (value - head) as f64 - margin_top - anchor_y;
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Favor straight edges: path detection
    // ---------------------------------------------------------------------

    /// Chain the edge dummies of junction-free paths so the solver prefers
    /// drawing the whole path at one vertical position. Two-edge paths are
    /// merely recorded; they are handled by local repair after solving.
    fn insert_straightening_chains(&mut self) {
        let mut state = vec![STATE_OTHER; self.graph.num_nodes()];
        for n in self.graph.iter_nodes() {
            state[n.get_index()] = self.node_state(n);
        }

        let paths = self.identify_paths(&mut state);
        for (first_inner, path) in paths {
            if path.len() == 2 {
                self.two_paths.push((first_inner, path[0], path[1]));
                continue;
            }
            if !self.straightenable(&path) {
                continue;
            }
            for pair in path.windows(2) {
                let one = self.edge_vertex[pair[0].get_index()].unwrap();
                let two = self.edge_vertex[pair[1].get_index()].unwrap();
                let dummy = self.aux.new_vertex();
                self.aux.add_edge(dummy, one, 0, PATH_STRAIGHTNESS_WEIGHT);
                self.aux.add_edge(dummy, two, 0, PATH_STRAIGHTNESS_WEIGHT);
            }
        }
    }

    /// Paths through long-edge dummies are already heavily weighted, and
    /// freely resizable nodes make the anchor offsets unreliable.
    fn straightenable(&self, path: &[EdgeHandle]) -> bool {
        for &e in path {
            for n in [
                self.graph.port_owner(self.graph.edge(e).source),
                self.graph.port_owner(self.graph.edge(e).target),
            ] {
                let node = self.graph.node(n);
                if node.kind == NodeKind::LongEdge {
                    return false;
                }
                if node.flexibility.allows_resize() {
                    return false;
                }
            }
        }
        true
    }

    fn node_state(&self, n: NodeHandle) -> i8 {
        let mut incoming = 0;
        let mut outgoing = 0;
        for &p in &self.graph.node(n).ports {
            incoming += self.graph.port(p).incoming.len();
            outgoing += self.graph.port(p).outgoing.len();
            if incoming > 1 || outgoing > 1 {
                return STATE_JUNCTION;
            }
        }
        if incoming + outgoing == 1 {
            return STATE_LEAF;
        }
        STATE_OTHER
    }

    /// Collect maximal paths that start and end at junctions and only pass
    /// through plain degree-two nodes. Crossing edges break paths. Each path
    /// comes with its first inner node, the pivot of two-edge paths.
    fn identify_paths(
        &self,
        state: &mut [i8],
    ) -> Vec<(NodeHandle, Vec<EdgeHandle>)> {
        let mut paths = Vec::new();
        for li in 0..self.graph.layers.len() {
            for idx in 0..self.graph.layers[li].len() {
                let n = self.graph.layers[li][idx];
                if state[n.get_index()] != STATE_JUNCTION {
                    continue;
                }
                for e in self.graph.connected_edges(n) {
                    if !self.is_path_edge(e) {
                        continue;
                    }
                    let other = self.graph.other_end(e, n);
                    let os = state[other.get_index()];
                    if os != STATE_VISITED && os != STATE_JUNCTION {
                        let mut seq = vec![e];
                        let valid = self.follow(other, n, &mut seq, state);
                        if valid && seq.len() >= 2 {
                            paths.push((other, seq));
                        }
                        state[other.get_index()] = STATE_VISITED;
                    }
                }
            }
        }
        paths
    }

    fn is_path_edge(&self, e: EdgeHandle) -> bool {
        self.is_handled_edge(e) && !self.crossing[e.get_index()]
    }

    /// Walk from \p curr away from \p prev until a junction ends the path.
    /// \returns True if the path ended in a junction.
    fn follow(
        &self,
        mut curr: NodeHandle,
        mut prev: NodeHandle,
        seq: &mut Vec<EdgeHandle>,
        state: &mut [i8],
    ) -> bool {
        loop {
            if state[curr.get_index()] == STATE_JUNCTION {
                return true;
            }
            let mut advanced = false;
            for e in self.graph.connected_edges(curr) {
                if !self.is_path_edge(e) {
                    continue;
                }
                let next = self.graph.other_end(e, curr);
                if next == prev {
                    continue;
                }
                seq.push(e);
                if state[next.get_index()] == STATE_VISITED {
                    return false;
                }
                state[curr.get_index()] = STATE_VISITED;
                prev = curr;
                curr = next;
                advanced = true;
                break;
            }
            if !advanced {
                return false;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Two-path local repair
    // ---------------------------------------------------------------------

    /// For each recorded two-edge path, nudge the center node so that one of
    /// the two edges becomes exactly straight, provided its layer neighbors
    /// leave enough room. This is a best-effort local repair, not a global
    /// reoptimization.
    fn repair_two_paths(&mut self) {
        let two_paths = std::mem::take(&mut self.two_paths);
        for (center, e1, e2) in two_paths {
            if self.flexible[center.get_index()] {
                continue;
            }

            let d1 = self.straightening_displacement(e1, center);
            let d2 = self.straightening_displacement(e2, center);
            if d1 == 0. && d2 == 0. {
                continue;
            }

            let (room_above, room_below) = self.free_room(center);
            let mut candidates = [d1, d2];
            candidates.sort_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap());
            for d in candidates {
                if d == 0. {
                    continue;
                }
                let fits = if d < 0. { -d <= room_above } else { d <= room_below };
                if fits {
                    self.graph.node_mut(center).pos.y += d;
                    break;
                }
            }
        }
    }

    /// \returns the displacement of \p node that would make \p e straight.
    fn straightening_displacement(&self, e: EdgeHandle, node: NodeHandle) -> f64 {
        let edge = self.graph.edge(e);
        let (near, far) = if self.graph.port_owner(edge.source) == node {
            (edge.source, edge.target)
        } else {
            (edge.target, edge.source)
        };
        self.graph.absolute_anchor(far).y - self.graph.absolute_anchor(near).y
    }

    /// \returns how far the node can move up and down within its layer.
    fn free_room(&self, n: NodeHandle) -> (f64, f64) {
        let node = self.graph.node(n);
        let layer = &self.graph.layers[node.layer];
        let idx = node.index_in_layer;

        let above = if idx > 0 {
            let neighbor = self.graph.node(layer[idx - 1]);
            let spacing = self.graph.vertical_spacing(layer[idx - 1], n);
            (node.pos.y - node.margin.top)
                - (neighbor.pos.y + neighbor.size.y + neighbor.margin.bottom + spacing)
        } else {
            f64::INFINITY
        };
        let below = if idx + 1 < layer.len() {
            let neighbor = self.graph.node(layer[idx + 1]);
            let spacing = self.graph.vertical_spacing(n, layer[idx + 1]);
            (neighbor.pos.y - neighbor.margin.top)
                - (node.pos.y + node.size.y + node.margin.bottom + spacing)
        } else {
            f64::INFINITY
        };
        (above.max(0.), below.max(0.))
    }
}
