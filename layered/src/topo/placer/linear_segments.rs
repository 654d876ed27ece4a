//! Node placement that aligns long edges using linear segments, following
//! Section 4 of
//! "A fast heuristic for hierarchical Manhattan layout", Georg Sander, 1996.
//!
//! A linear segment contains a single regular node or all dummy nodes of one
//! long edge. Segments are ordered topologically, placed greedily, and then
//! balanced with alternating pendulum and rubber iterations until the total
//! deflection stops improving.

use crate::core::base::NodeKind;
use crate::topo::graph::{LayeredGraph, NodeHandle};

/// Factor for the threshold after which balancing is aborted.
const THRESHOLD_FACTOR: f64 = 20.0;
/// The minimal number of iterations in pendulum mode.
const PENDULUM_ITERS: i32 = 4;
/// The number of additional iterations after the abort condition was met.
const FINAL_ITERS: i32 = 3;
/// Factor for the threshold within which node overlapping is detected.
const OVERLAP_DETECT: f64 = 0.0001;

/// A linear segment: one regular node, or the dummy chain of a long edge.
#[derive(Debug, Default)]
struct Segment {
    nodes: Vec<NodeHandle>,
    /// Index in the previous layer a member was seen at; used for cycle
    /// avoidance. `usize::MAX` when the segment was not seen yet.
    index_in_last_layer: usize,
    /// The last layer where a member of this segment was discovered.
    last_layer: usize,
    /// The accumulated force of the contained nodes.
    deflection: f64,
    /// The current weight of the contained nodes.
    weight: i32,
    /// The segment this one was merged into, if any.
    ref_segment: Option<usize>,
    kind: Option<NodeKind>,
}

impl Segment {
    fn new() -> Self {
        Segment {
            index_in_last_layer: usize::MAX,
            last_layer: usize::MAX,
            ..Default::default()
        }
    }
}

/// Balancing modes.
#[derive(PartialEq, Clone, Copy)]
enum Mode {
    ForwPendulum,
    BackwPendulum,
    Rubber,
}

pub struct LinearSegmentsPlacer<'a> {
    graph: &'a mut LayeredGraph,
    /// The segment each node belongs to; replaces the original node ids.
    segment_of: Vec<usize>,
    /// Maximal straightness priority over the incoming/outgoing edges.
    input_prio: Vec<i32>,
    output_prio: Vec<i32>,
}

impl<'a> LinearSegmentsPlacer<'a> {
    pub fn new(graph: &'a mut LayeredGraph) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            segment_of: vec![usize::MAX; n],
            input_prio: vec![i32::MIN; n],
            output_prio: vec![i32::MIN; n],
        }
    }

    pub fn do_it(&mut self) {
        #[cfg(feature = "log")]
        log::info!(
            "Linear segments placement of {} nodes.",
            self.graph.num_nodes()
        );

        let mut segments = self.sort_linear_segments();
        self.create_unbalanced_placement(&segments);
        self.balance_placement(&mut segments);
        self.post_process(&segments);
    }

    // -----------------------------------------------------------------
    // Segment creation and ordering
    // -----------------------------------------------------------------

    /// Group the nodes into linear segments and sort the segments by a
    /// topological ordering of the segment dependency graph.
    fn sort_linear_segments(&mut self) -> Vec<Segment> {
        for n in self.graph.iter_nodes() {
            let ni = n.get_index();
            for &p in &self.graph.node(n).ports {
                for &e in &self.graph.port(p).incoming {
                    let prio = self.graph.edge(e).priority;
                    self.input_prio[ni] = self.input_prio[ni].max(prio);
                }
                for &e in &self.graph.port(p).outgoing {
                    let prio = self.graph.edge(e).priority;
                    self.output_prio[ni] = self.output_prio[ni].max(prio);
                }
            }
        }

        // Form the segments. Calls to fill_segment may have assigned nodes
        // of later layers already.
        let mut segments: Vec<Segment> = Vec::new();
        for li in 0..self.graph.layers.len() {
            for idx in 0..self.graph.layers[li].len() {
                let n = self.graph.layers[li][idx];
                if self.segment_of[n.get_index()] == usize::MAX {
                    let id = segments.len();
                    let mut segment = Segment::new();
                    self.fill_segment(n, id, &mut segment);
                    segments.push(segment);
                }
            }
        }

        // Build the dependency graph between segments, splitting segments
        // whenever a dependency would introduce a cycle.
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); segments.len()];
        let mut incoming_count: Vec<usize> = vec![0; segments.len()];
        self.create_dependencies(&mut segments, &mut outgoing, &mut incoming_count);

        // Kahn's topological sort over the resulting DAG.
        let mut no_incoming: Vec<usize> = (0..segments.len())
            .filter(|&i| incoming_count[i] == 0)
            .collect();
        let mut new_ranks = vec![0usize; segments.len()];
        let mut next_rank = 0;
        let mut i = 0;
        while i < no_incoming.len() {
            let seg = no_incoming[i];
            i += 1;
            new_ranks[seg] = next_rank;
            next_rank += 1;
            for &target in &outgoing[seg] {
                incoming_count[target] -= 1;
                if incoming_count[target] == 0 {
                    no_incoming.push(target);
                }
            }
        }
        assert_eq!(next_rank, segments.len(), "segment ordering has a cycle");

        // Apply the new ordering.
        let mut sorted: Vec<Segment> = Vec::with_capacity(segments.len());
        for _ in 0..segments.len() {
            sorted.push(Segment::new());
        }
        for (old_id, segment) in segments.into_iter().enumerate() {
            let rank = new_ranks[old_id];
            for &n in &segment.nodes {
                self.segment_of[n.get_index()] = rank;
            }
            sorted[rank] = segment;
        }
        sorted
    }

    /// Put \p start into the segment \p id and keep absorbing the single
    /// compatible successor dummy in a different layer, if there is one.
    /// Runs with an explicit cursor instead of recursion so that very long
    /// edge chains cannot exhaust the stack.
    fn fill_segment(&mut self, start: NodeHandle, id: usize, segment: &mut Segment) {
        let mut current = start;
        loop {
            let kind = self.graph.node(current).kind;
            self.segment_of[current.get_index()] = id;
            segment.nodes.push(current);
            segment.kind = Some(kind);

            if !matches!(
                kind,
                NodeKind::LongEdge | NodeKind::NorthSouthPort | NodeKind::BigNode
            ) {
                return;
            }

            // Look for a successor of a compatible type. Long edges and
            // north/south dummies may share a segment; big node dummies only
            // chain with other big node dummies. Successors in the same
            // layer never continue a vertical chain.
            let mut next = None;
            'search: for &p in &self.graph.node(current).ports {
                for &e in &self.graph.port(p).outgoing {
                    let target = self.graph.port_owner(self.graph.edge(e).target);
                    if self.graph.node(target).layer == self.graph.node(current).layer {
                        continue;
                    }
                    if self.segment_of[target.get_index()] != usize::MAX {
                        continue;
                    }
                    let tkind = self.graph.node(target).kind;
                    let compatible = if kind == NodeKind::BigNode {
                        tkind == NodeKind::BigNode
                    } else {
                        matches!(
                            tkind,
                            NodeKind::LongEdge | NodeKind::NorthSouthPort
                        )
                    };
                    if compatible {
                        next = Some(target);
                        break 'search;
                    }
                }
            }

            match next {
                Some(n) => current = n,
                None => return,
            }
        }
    }

    /// Walk the layers left to right and record, for each neighboring node
    /// pair, a dependency between their segments. A segment that reappears
    /// in a layer in an order inconsistent with the previous layer would
    /// close a cycle; such a segment is split at the current layer, so the
    /// dependency targets the fresh second half instead.
    fn create_dependencies(
        &mut self,
        segments: &mut Vec<Segment>,
        outgoing: &mut Vec<Vec<usize>>,
        incoming_count: &mut Vec<usize>,
    ) {
        for li in 0..self.graph.layers.len() {
            let layer = self.graph.layers[li].clone();
            let mut previous: Option<NodeHandle> = None;

            for (index_in_layer, &node) in layer.iter().enumerate() {
                let mut current_seg = self.segment_of[node.get_index()];

                if segments[current_seg].index_in_last_layer != usize::MAX {
                    // The segment was seen before. If some node later in
                    // this layer belongs to a segment that preceded it in
                    // the shared previous layer, adding the dependency would
                    // close a cycle.
                    let mut cycle = false;
                    for &later in layer.iter().skip(index_in_layer + 1) {
                        let later_seg = self.segment_of[later.get_index()];
                        if segments[later_seg].last_layer
                            == segments[current_seg].last_layer
                            && segments[later_seg].index_in_last_layer
                                < segments[current_seg].index_in_last_layer
                        {
                            cycle = true;
                            break;
                        }
                    }

                    if cycle {
                        // Undo the dependency the left neighbor added onto
                        // the segment that is about to be split.
                        if let Some(prev) = previous {
                            let prev_seg = self.segment_of[prev.get_index()];
                            incoming_count[current_seg] -= 1;
                            if let Some(pos) = outgoing[prev_seg]
                                .iter()
                                .position(|&s| s == current_seg)
                            {
                                outgoing[prev_seg].remove(pos);
                            }
                        }

                        let new_id = segments.len();
                        let split = self.split_segment(
                            &mut segments[current_seg],
                            node,
                            new_id,
                        );
                        segments.push(split);
                        outgoing.push(Vec::new());
                        if let Some(prev) = previous {
                            let prev_seg = self.segment_of[prev.get_index()];
                            outgoing[prev_seg].push(new_id);
                            incoming_count.push(1);
                        } else {
                            incoming_count.push(0);
                        }
                        current_seg = new_id;
                    }
                }

                // Add a dependency to the right neighbor's segment.
                if index_in_layer + 1 < layer.len() {
                    let next = layer[index_in_layer + 1];
                    let next_seg = self.segment_of[next.get_index()];
                    outgoing[current_seg].push(next_seg);
                    incoming_count[next_seg] += 1;
                }

                segments[current_seg].last_layer = li;
                segments[current_seg].index_in_last_layer = index_in_layer;
                previous = Some(node);
            }
        }
    }

    /// Split \p segment before \p node; the returned segment receives all
    /// nodes from \p node onward.
    fn split_segment(
        &mut self,
        segment: &mut Segment,
        node: NodeHandle,
        new_id: usize,
    ) -> Segment {
        let at = segment
            .nodes
            .iter()
            .position(|&n| n == node)
            .expect("node not in segment");
        let mut new_segment = Segment::new();
        new_segment.kind = segment.kind;
        new_segment.nodes = segment.nodes.split_off(at);
        for &n in &new_segment.nodes {
            self.segment_of[n.get_index()] = new_id;
        }
        new_segment
    }

    // -----------------------------------------------------------------
    // Unbalanced placement
    // -----------------------------------------------------------------

    /// Process the segments in topological order and place each one at the
    /// lowest position that clears all previously placed nodes in every
    /// layer it touches.
    fn create_unbalanced_placement(&mut self, segments: &[Segment]) {
        let num_layers = self.graph.layers.len();
        let mut layer_extent = vec![0.0f64; num_layers];
        let mut recent_node: Vec<Option<NodeHandle>> = vec![None; num_layers];

        for segment in segments {
            let mut uppermost = 0.0f64;
            for &node in &segment.nodes {
                let li = self.graph.node(node).layer;
                let spacing = match recent_node[li] {
                    Some(recent) => self.graph.vertical_spacing(recent, node),
                    None => self.graph.options.spacing_edge_edge,
                };
                uppermost = uppermost.max(layer_extent[li] + spacing);
            }

            for &node in &segment.nodes {
                let li = self.graph.node(node).layer;
                let margin = self.graph.node(node).margin;
                self.graph.node_mut(node).pos.y = uppermost + margin.top;
                layer_extent[li] = uppermost
                    + margin.top
                    + self.graph.node(node).size.y
                    + margin.bottom;
                recent_node[li] = Some(node);
            }
        }
    }

    // -----------------------------------------------------------------
    // Balancing
    // -----------------------------------------------------------------

    /// Balance the initial placement by force-based movement of regions.
    /// Pendulum iterations consider only one direction of edges, rubber
    /// iterations both. Each iteration computes per-segment deflections,
    /// merges segments into regions where applying them would overlap, and
    /// moves every region by its final deflection.
    fn balance_placement(&mut self, segments: &mut Vec<Segment>) {
        let dampening = self.graph.options.deflection_dampening;
        let thoroughness = self.graph.options.thoroughness.max(1);
        let threshold = THRESHOLD_FACTOR / thoroughness as f64;
        let mut pendulum_iters = PENDULUM_ITERS;
        let mut final_iters = FINAL_ITERS;

        let mut ready = false;
        let mut mode = Mode::ForwPendulum;
        let mut last_total_deflection = i32::MAX as f64;
        loop {
            let incoming = mode != Mode::BackwPendulum;
            let outgoing = mode != Mode::ForwPendulum;
            let mut total_deflection = 0.;
            for i in 0..segments.len() {
                segments[i].ref_segment = None;
                self.calc_deflection(segments, i, incoming, outgoing, dampening);
                total_deflection += segments[i].deflection.abs();
            }

            loop {
                if !self.merge_regions(segments) {
                    break;
                }
            }

            for i in 0..segments.len() {
                let region = Self::region(segments, i);
                let deflection = segments[region].deflection;
                if deflection != 0. {
                    for &node in segments[i].nodes.clone().iter() {
                        self.graph.node_mut(node).pos.y += deflection;
                    }
                }
            }

            match mode {
                Mode::ForwPendulum | Mode::BackwPendulum => {
                    pendulum_iters -= 1;
                    if pendulum_iters <= 0
                        && (total_deflection < last_total_deflection
                            || -pendulum_iters > thoroughness)
                    {
                        mode = Mode::Rubber;
                        last_total_deflection = i32::MAX as f64;
                    } else if mode == Mode::ForwPendulum {
                        mode = Mode::BackwPendulum;
                        last_total_deflection = total_deflection;
                    } else {
                        mode = Mode::ForwPendulum;
                        last_total_deflection = total_deflection;
                    }
                }
                Mode::Rubber => {
                    ready = total_deflection >= last_total_deflection
                        || last_total_deflection - total_deflection < threshold;
                    last_total_deflection = total_deflection;
                    if ready {
                        final_iters -= 1;
                    }
                }
            }

            if ready && final_iters <= 0 {
                break;
            }
        }
    }

    /// Resolve the region a segment currently belongs to.
    fn region(segments: &[Segment], mut i: usize) -> usize {
        while let Some(next) = segments[i].ref_segment {
            i = next;
        }
        i
    }

    /// Calculate the force acting on segment \p i: the weighted average
    /// offset that would best straighten its incident edges, ignoring edges
    /// into the segment itself and edges whose priority loses against the
    /// involved nodes' priorities.
    fn calc_deflection(
        &self,
        segments: &mut [Segment],
        i: usize,
        incoming: bool,
        outgoing: bool,
        dampening: f64,
    ) {
        let mut segment_deflection = 0.;
        let mut node_weight_sum = 0;

        for &node in &segments[i].nodes {
            let ni = node.get_index();
            let mut node_deflection = 0.;
            let mut edge_weight_sum = 0;
            let input_prio = if incoming { self.input_prio[ni] } else { i32::MIN };
            let output_prio = if outgoing { self.output_prio[ni] } else { i32::MIN };
            let min_prio = input_prio.max(output_prio);

            for &p in &self.graph.node(node).ports {
                let portpos = self.graph.absolute_anchor(p).y;
                if outgoing {
                    for &e in &self.graph.port(p).outgoing {
                        let other_port = self.graph.edge(e).target;
                        let other = self.graph.port_owner(other_port);
                        if self.segment_of[other.get_index()] == i {
                            continue;
                        }
                        let oi = other.get_index();
                        let other_prio =
                            self.input_prio[oi].max(self.output_prio[oi]);
                        let prio = self.graph.edge(e).priority;
                        if prio >= min_prio && prio >= other_prio {
                            node_deflection +=
                                self.graph.absolute_anchor(other_port).y - portpos;
                            edge_weight_sum += 1;
                        }
                    }
                }
                if incoming {
                    for &e in &self.graph.port(p).incoming {
                        let other_port = self.graph.edge(e).source;
                        let other = self.graph.port_owner(other_port);
                        if self.segment_of[other.get_index()] == i {
                            continue;
                        }
                        let oi = other.get_index();
                        let other_prio =
                            self.input_prio[oi].max(self.output_prio[oi]);
                        let prio = self.graph.edge(e).priority;
                        if prio >= min_prio && prio >= other_prio {
                            node_deflection +=
                                self.graph.absolute_anchor(other_port).y - portpos;
                            edge_weight_sum += 1;
                        }
                    }
                }
            }

            if edge_weight_sum > 0 {
                segment_deflection += node_deflection / edge_weight_sum as f64;
                node_weight_sum += 1;
            }
        }

        if node_weight_sum > 0 {
            segments[i].deflection =
                dampening * segment_deflection / node_weight_sum as f64;
            segments[i].weight = node_weight_sum;
        } else {
            segments[i].deflection = 0.;
            segments[i].weight = 0;
        }
    }

    /// Merge regions that would overlap after applying their deflections.
    /// The merged region's deflection is the weighted average of its parts.
    /// \returns True if any two regions were merged.
    fn merge_regions(&self, segments: &mut [Segment]) -> bool {
        let mut changed = false;
        let threshold = OVERLAP_DETECT * self.graph.options.spacing_node_node;

        for layer in &self.graph.layers {
            if layer.is_empty() {
                continue;
            }
            let mut node1 = layer[0];
            let mut region1 = Self::region(segments, self.segment_of[node1.get_index()]);

            for &node2 in layer.iter().skip(1) {
                let region2 =
                    Self::region(segments, self.segment_of[node2.get_index()]);

                if region1 != region2 {
                    let spacing = self.graph.vertical_spacing(node1, node2);
                    let n1 = self.graph.node(node1);
                    let n2 = self.graph.node(node2);
                    let node1_extent = n1.pos.y
                        + n1.size.y
                        + n1.margin.bottom
                        + segments[region1].deflection
                        + spacing;
                    let node2_extent =
                        n2.pos.y - n2.margin.top + segments[region2].deflection;

                    if node1_extent > node2_extent + threshold {
                        let weight_sum = segments[region1].weight
                            + segments[region2].weight;
                        assert!(weight_sum > 0, "merged regions carry no weight");
                        segments[region2].deflection = (segments[region2].weight
                            as f64
                            * segments[region2].deflection
                            + segments[region1].weight as f64
                                * segments[region1].deflection)
                            / weight_sum as f64;
                        segments[region2].weight = weight_sum;
                        segments[region1].ref_segment = Some(region2);
                        changed = true;
                    }
                }

                node1 = node2;
                region1 = region2;
            }
        }
        changed
    }

    // -----------------------------------------------------------------
    // Post-processing
    // -----------------------------------------------------------------

    /// Move segments where obvious improvements can be made: the smallest
    /// displacement that makes the first incoming or last outgoing edge
    /// exactly straight, as far as the layer neighbors leave room.
    fn post_process(&mut self, segments: &[Segment]) {
        for segment in segments {
            if segment.nodes.is_empty() {
                continue;
            }
            let mut min_room_above = f64::from(i32::MAX);
            let mut min_room_below = f64::from(i32::MAX);

            for &node in &segment.nodes {
                let n = self.graph.node(node);
                let layer = &self.graph.layers[n.layer];
                let index = n.index_in_layer;

                let room_above = if index > 0 {
                    let neighbor = self.graph.node(layer[index - 1]);
                    let spacing = self.graph.vertical_spacing(layer[index - 1], node);
                    n.pos.y
                        - n.margin.top
                        - (neighbor.pos.y
                            + neighbor.size.y
                            + neighbor.margin.bottom
                            + spacing)
                } else {
                    n.pos.y - n.margin.top
                };
                min_room_above = min_room_above.min(room_above);

                let room_below = if index + 1 < layer.len() {
                    let neighbor = self.graph.node(layer[index + 1]);
                    let spacing = self.graph.vertical_spacing(node, layer[index + 1]);
                    neighbor.pos.y
                        - neighbor.margin.top
                        - (n.pos.y + n.size.y + n.margin.bottom + spacing)
                } else {
                    2. * n.pos.y
                };
                min_room_below = min_room_below.min(room_below);
            }

            let mut min_displacement = f64::from(i32::MAX);
            let mut found_place = false;

            // The smallest displacement that makes an incoming edge of the
            // first node straight ...
            let first = segment.nodes[0];
            for &p in &self.graph.node(first).ports {
                let pos = self.graph.absolute_anchor(p).y;
                for &e in &self.graph.port(p).incoming {
                    let source = self.graph.edge(e).source;
                    let d = self.graph.absolute_anchor(source).y - pos;
                    if d.abs() < min_displacement.abs()
                        && d.abs() < if d < 0. { min_room_above } else { min_room_below }
                    {
                        min_displacement = d;
                        found_place = true;
                    }
                }
            }

            // ... or an outgoing edge of the last node.
            let last = *segment.nodes.last().unwrap();
            for &p in &self.graph.node(last).ports {
                let pos = self.graph.absolute_anchor(p).y;
                for &e in &self.graph.port(p).outgoing {
                    let target = self.graph.edge(e).target;
                    let d = self.graph.absolute_anchor(target).y - pos;
                    if d.abs() < min_displacement.abs()
                        && d.abs() < if d < 0. { min_room_above } else { min_room_below }
                    {
                        min_displacement = d;
                        found_place = true;
                    }
                }
            }

            if found_place && min_displacement != 0. {
                for &node in &segment.nodes {
                    self.graph.node_mut(node).pos.y += min_displacement;
                }
            }
        }
    }
}
