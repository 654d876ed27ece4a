//! This module implements the layered graph model that the placement and
//! packing phases operate on. The graph owns all nodes, ports and edges in
//! arenas and hands out typed handles; the handles double as indices into
//! the per-run scratch tables of the algorithms, so no transient state ever
//! lives on the domain objects themselves.

use crate::core::base::{
    NodeFlexibility, NodeKind, PortConstraints, PortSide, SideSet,
    VerticalLabelPlacement,
};
use crate::core::geometry::{Margins, Point};
use crate::core::options::LayoutOptions;

/// Used to keep track of nodes that are stored in a graph.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeHandle {
    idx: usize,
}

impl NodeHandle {
    pub fn new(x: usize) -> Self {
        NodeHandle { idx: x }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

impl From<usize> for NodeHandle {
    fn from(idx: usize) -> Self {
        NodeHandle { idx }
    }
}

/// Used to keep track of ports.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PortHandle {
    idx: usize,
}

impl PortHandle {
    pub fn new(x: usize) -> Self {
        PortHandle { idx: x }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

/// Used to keep track of edges.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeHandle {
    idx: usize,
}

impl EdgeHandle {
    pub fn new(x: usize) -> Self {
        EdgeHandle { idx: x }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

/// A text label that belongs to a node or an edge. The text itself is
/// irrelevant to placement; only the box and the placement rule matter.
#[derive(Debug, Clone)]
pub struct Label {
    pub pos: Point,
    pub size: Point,
    pub placement: VerticalLabelPlacement,
}

impl Label {
    pub fn new(size: Point, placement: VerticalLabelPlacement) -> Self {
        Self {
            pos: Point::zero(),
            size,
            placement,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Top-left corner, relative to the owning graph's coordinate frame.
    pub pos: Point,
    pub size: Point,
    pub margin: Margins,
    pub ports: Vec<PortHandle>,
    pub labels: Vec<Label>,
    pub flexibility: NodeFlexibility,
    pub port_constraints: PortConstraints,
    /// For `ExternalPort` dummies: the boundary side they represent.
    pub ext_port_side: Option<PortSide>,
    /// The index of the layer this node lives in, or `usize::MAX` while the
    /// node is layerless.
    pub layer: usize,
    /// The position of this node within its layer.
    pub index_in_layer: usize,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub side: PortSide,
    /// Position relative to the owning node's top-left corner.
    pub pos: Point,
    /// The point, relative to the position, where edges attach.
    pub anchor: Point,
    pub owner: NodeHandle,
    pub incoming: Vec<EdgeHandle>,
    pub outgoing: Vec<EdgeHandle>,
    /// For north/south ports: the same-layer dummy node that carries the
    /// vertical stub of this port's edges.
    pub ns_dummy: Option<NodeHandle>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub source: PortHandle,
    pub target: PortHandle,
    pub bends: Vec<Point>,
    /// Straightness priority; higher values pull harder.
    pub priority: i32,
    pub thickness: f64,
    pub labels: Vec<Label>,
}

/// The layered graph. Before layering (and after component combination) all
/// nodes live in the `layerless` list; a layered graph stores its nodes in
/// the ordered `layers` instead. The `offset` vector tracks the translation
/// into the parent coordinate frame and is applied lazily.
#[derive(Debug)]
pub struct LayeredGraph {
    nodes: Vec<Node>,
    ports: Vec<Port>,
    edges: Vec<Edge>,
    pub layers: Vec<Vec<NodeHandle>>,
    pub layerless: Vec<NodeHandle>,
    pub size: Point,
    pub offset: Point,
    pub padding: Margins,
    pub options: LayoutOptions,
    /// The sides of the enclosing graph this (sub-)graph connects to via
    /// external-port dummies.
    pub ext_port_sides: SideSet,
    /// Priority for the ordering of packed components.
    pub priority: i32,
}

impl LayeredGraph {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            nodes: Vec::new(),
            ports: Vec::new(),
            edges: Vec::new(),
            layers: Vec::new(),
            layerless: Vec::new(),
            size: Point::zero(),
            offset: Point::zero(),
            padding: Margins::default(),
            options,
            ext_port_sides: SideSet::NONE,
            priority: 0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = NodeHandle> {
        (0..self.nodes.len()).map(NodeHandle::new)
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = EdgeHandle> {
        (0..self.edges.len()).map(EdgeHandle::new)
    }

    pub fn node(&self, n: NodeHandle) -> &Node {
        &self.nodes[n.idx]
    }

    pub fn node_mut(&mut self, n: NodeHandle) -> &mut Node {
        &mut self.nodes[n.idx]
    }

    pub fn port(&self, p: PortHandle) -> &Port {
        &self.ports[p.idx]
    }

    pub fn port_mut(&mut self, p: PortHandle) -> &mut Port {
        &mut self.ports[p.idx]
    }

    pub fn edge(&self, e: EdgeHandle) -> &Edge {
        &self.edges[e.idx]
    }

    pub fn edge_mut(&mut self, e: EdgeHandle) -> &mut Edge {
        &mut self.edges[e.idx]
    }

    /// Add a node to the graph's layerless list.
    /// \returns a handle to the node.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeHandle {
        let handle = NodeHandle::new(self.nodes.len());
        self.nodes.push(Node {
            kind,
            pos: Point::zero(),
            size: Point::zero(),
            margin: Margins::default(),
            ports: Vec::new(),
            labels: Vec::new(),
            flexibility: NodeFlexibility::None,
            port_constraints: PortConstraints::FixedPos,
            ext_port_side: None,
            layer: usize::MAX,
            index_in_layer: usize::MAX,
        });
        self.layerless.push(handle);
        handle
    }

    /// Add a port on the border of \p node.
    /// \returns a handle to the port.
    pub fn add_port(&mut self, node: NodeHandle, side: PortSide) -> PortHandle {
        let handle = PortHandle::new(self.ports.len());
        self.ports.push(Port {
            side,
            pos: Point::zero(),
            anchor: Point::zero(),
            owner: node,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            ns_dummy: None,
        });
        self.nodes[node.idx].ports.push(handle);
        handle
    }

    /// Add an edge between two ports.
    pub fn add_edge(&mut self, from: PortHandle, to: PortHandle) -> EdgeHandle {
        assert!(from.idx < self.ports.len(), "Invalid handle");
        assert!(to.idx < self.ports.len(), "Invalid handle");
        let handle = EdgeHandle::new(self.edges.len());
        self.edges.push(Edge {
            source: from,
            target: to,
            bends: Vec::new(),
            priority: 0,
            thickness: 1.,
            labels: Vec::new(),
        });
        self.ports[from.idx].outgoing.push(handle);
        self.ports[to.idx].incoming.push(handle);
        handle
    }

    /// Install the layer structure and stamp each node with its layer index
    /// and position. Nodes in layers leave the layerless list.
    pub fn set_layers(&mut self, layers: Vec<Vec<NodeHandle>>) {
        for (li, layer) in layers.iter().enumerate() {
            for (ni, &n) in layer.iter().enumerate() {
                self.nodes[n.idx].layer = li;
                self.nodes[n.idx].index_in_layer = ni;
            }
        }
        self.layers = layers;
        self.layerless.clear();
    }

    /// \returns the anchor point of \p port in graph coordinates.
    pub fn absolute_anchor(&self, port: PortHandle) -> Point {
        let p = &self.ports[port.idx];
        let n = &self.nodes[p.owner.idx];
        n.pos.add(p.pos).add(p.anchor)
    }

    /// \returns the node that owns the given port.
    pub fn port_owner(&self, port: PortHandle) -> NodeHandle {
        self.ports[port.idx].owner
    }

    /// \returns True if both endpoints of \p edge sit on the same node.
    pub fn is_self_loop(&self, edge: EdgeHandle) -> bool {
        let e = &self.edges[edge.idx];
        self.ports[e.source.idx].owner == self.ports[e.target.idx].owner
    }

    /// \returns True if both endpoints of \p edge sit in the same layer.
    pub fn is_in_layer(&self, edge: EdgeHandle) -> bool {
        let e = &self.edges[edge.idx];
        let src = self.ports[e.source.idx].owner;
        let tgt = self.ports[e.target.idx].owner;
        self.nodes[src.idx].layer == self.nodes[tgt.idx].layer
    }

    /// \returns the node at the far end of \p edge, seen from \p node.
    pub fn other_end(&self, edge: EdgeHandle, node: NodeHandle) -> NodeHandle {
        let e = &self.edges[edge.idx];
        let src = self.ports[e.source.idx].owner;
        let tgt = self.ports[e.target.idx].owner;
        if src == node {
            tgt
        } else {
            src
        }
    }

    /// Collect all edges incident to \p node, incoming and outgoing.
    pub fn connected_edges(&self, node: NodeHandle) -> Vec<EdgeHandle> {
        let mut res = Vec::new();
        for &p in &self.nodes[node.idx].ports {
            res.extend_from_slice(&self.ports[p.idx].incoming);
            res.extend_from_slice(&self.ports[p.idx].outgoing);
        }
        res
    }

    /// The ports of \p node on the given side, in storage order.
    pub fn ports_on_side(&self, node: NodeHandle, side: PortSide) -> Vec<PortHandle> {
        self.nodes[node.idx]
            .ports
            .iter()
            .copied()
            .filter(|&p| self.ports[p.idx].side == side)
            .collect()
    }

    /// The minimum vertical distance between two nodes in a layer. Pairs
    /// involving a dummy use the tighter edge spacing.
    pub fn vertical_spacing(&self, a: NodeHandle, b: NodeHandle) -> f64 {
        if self.nodes[a.idx].kind.is_normal() && self.nodes[b.idx].kind.is_normal() {
            self.options.spacing_node_node
        } else {
            self.options.spacing_edge_edge
        }
    }

    /// Translate every node position and edge bend point by \p d.
    pub fn translate(&mut self, d: Point) {
        for node in self.nodes.iter_mut() {
            node.pos.shift(d);
        }
        for edge in self.edges.iter_mut() {
            for bend in edge.bends.iter_mut() {
                bend.shift(d);
            }
        }
    }

    /// Move all nodes, ports and edges of \p source into this graph,
    /// applying the source's accumulated offset. The source is left empty.
    /// \returns the handles of the moved nodes.
    pub fn absorb(&mut self, source: &mut LayeredGraph) -> Vec<NodeHandle> {
        let offset = source.offset;
        source.translate(offset);
        source.offset = Point::zero();

        let node_base = self.nodes.len();
        let port_base = self.ports.len();
        let edge_base = self.edges.len();

        let mut moved = Vec::with_capacity(source.nodes.len());
        for mut node in source.nodes.drain(..) {
            for p in node.ports.iter_mut() {
                *p = PortHandle::new(p.idx + port_base);
            }
            node.layer = usize::MAX;
            node.index_in_layer = usize::MAX;
            let handle = NodeHandle::new(self.nodes.len());
            self.nodes.push(node);
            self.layerless.push(handle);
            moved.push(handle);
        }
        for mut port in source.ports.drain(..) {
            port.owner = NodeHandle::new(port.owner.idx + node_base);
            for e in port.incoming.iter_mut().chain(port.outgoing.iter_mut()) {
                *e = EdgeHandle::new(e.idx + edge_base);
            }
            port.ns_dummy = port.ns_dummy.map(|n| NodeHandle::new(n.idx + node_base));
            self.ports.push(port);
        }
        for mut edge in source.edges.drain(..) {
            edge.source = PortHandle::new(edge.source.idx + port_base);
            edge.target = PortHandle::new(edge.target.idx + port_base);
            self.edges.push(edge);
        }
        source.layers.clear();
        source.layerless.clear();
        moved
    }
}

#[test]
fn test_graph_construction() {
    let mut g = LayeredGraph::new(LayoutOptions::default());
    let a = g.add_node(NodeKind::Normal);
    let b = g.add_node(NodeKind::Normal);
    let pa = g.add_port(a, PortSide::East);
    let pb = g.add_port(b, PortSide::West);
    let e = g.add_edge(pa, pb);

    assert_eq!(g.num_nodes(), 2);
    assert_eq!(g.port_owner(pa), a);
    assert_eq!(g.other_end(e, a), b);
    assert!(!g.is_self_loop(e));

    g.node_mut(a).pos = Point::new(0., 10.);
    g.port_mut(pa).pos = Point::new(20., 5.);
    assert_eq!(g.absolute_anchor(pa), Point::new(20., 15.));
}

#[test]
fn test_absorb_remaps_handles() {
    let mut target = LayeredGraph::new(LayoutOptions::default());
    let t = target.add_node(NodeKind::Normal);
    let _ = t;

    let mut source = LayeredGraph::new(LayoutOptions::default());
    let a = source.add_node(NodeKind::Normal);
    let b = source.add_node(NodeKind::Normal);
    let pa = source.add_port(a, PortSide::East);
    let pb = source.add_port(b, PortSide::West);
    source.add_edge(pa, pb);
    source.node_mut(a).pos = Point::new(1., 2.);
    source.offset = Point::new(10., 10.);

    let moved = target.absorb(&mut source);
    assert_eq!(moved.len(), 2);
    assert_eq!(target.num_nodes(), 3);
    assert_eq!(source.num_nodes(), 0);
    // The offset was applied on the way over.
    assert_eq!(target.node(moved[0]).pos, Point::new(11., 12.));
    // Edges survived the move with consistent handles.
    let e = EdgeHandle::new(0);
    assert_eq!(target.other_end(e, moved[0]), moved[1]);
}
