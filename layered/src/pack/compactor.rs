//! Compacts placed components to remove the artificial gaps the sector
//! placement leaves behind. Every component is represented by its
//! rectilinear convex hull plus one "external extension" rectangle per
//! boundary side it connects to; the extensions reach to the border of the
//! original drawing so that no component ever slides into the corridor of
//! another component's external edges. Horizontal and vertical compaction
//! alternate until nothing moves anymore.

use crate::core::base::{NodeKind, PortSide};
use crate::core::geometry::{BoundingBox, Point, Rect};
use crate::pack::oned::{compact_left, compact_up, CElement};
use crate::pack::recthull::hull_rectangles;
use crate::topo::graph::{LayeredGraph, PortHandle};

const MAX_ITERATION: usize = 10;
const EPSILON: f64 = 0.0001;

/// The hull and extension geometry of one component, in the shared
/// coordinate system.
struct ComponentShape {
    hull: Vec<Rect>,
    extensions: Vec<(PortSide, Rect)>,
}

pub struct ComponentsCompactor {
    offset: Point,
    graph_size: Point,
}

impl ComponentsCompactor {
    pub fn new() -> Self {
        Self {
            offset: Point::zero(),
            graph_size: Point::zero(),
        }
    }

    /// Compact \p components, which must already live in one common
    /// coordinate system. Components are moved in place; afterwards
    /// [`offset`](Self::offset) holds the global shift that moves the
    /// drawing back to the origin and [`graph_size`](Self::graph_size) the
    /// new overall size.
    pub fn compact(
        &mut self,
        components: &mut [LayeredGraph],
        original_size: Point,
        spacing: f64,
    ) {
        #[cfg(feature = "log")]
        log::info!(
            "Compacting {} components of a {} drawing.",
            components.len(),
            original_size
        );
        let _ = original_size;

        // The frame of the current drawing; external extensions always
        // reach this border.
        let mut frame = BoundingBox::empty();
        for component in components.iter() {
            add_node_boxes(component, &mut frame);
        }
        if frame.is_empty() {
            return;
        }

        let mut round = 0;
        loop {
            let mut delta = 0.;

            // Horizontal compaction; the vertical extensions take part so
            // that components keep clear of north/south edge corridors.
            let shapes: Vec<ComponentShape> = components
                .iter()
                .map(|c| component_shape(c, &frame))
                .collect();
            let mut elements = collect_elements(&shapes, |side| {
                matches!(side, PortSide::North | PortSide::South)
            });
            let dx = compact_left(&mut elements, components.len(), spacing);
            for (i, component) in components.iter_mut().enumerate() {
                component.translate(Point::new(dx[i], 0.));
                delta += dx[i].abs();
            }

            // Vertical compaction with the horizontal extensions.
            let shapes: Vec<ComponentShape> = components
                .iter()
                .map(|c| component_shape(c, &frame))
                .collect();
            let mut elements = collect_elements(&shapes, |side| {
                matches!(side, PortSide::East | PortSide::West)
            });
            let dy = compact_up(&mut elements, components.len(), spacing);
            for (i, component) in components.iter_mut().enumerate() {
                component.translate(Point::new(0., dy[i]));
                delta += dy[i].abs();
            }

            round += 1;
            if (round >= 2 && delta < EPSILON) || round >= MAX_ITERATION {
                break;
            }
        }

        // Pull the external port dummies back onto the frame border.
        for component in components.iter_mut() {
            for n in component.iter_nodes().collect::<Vec<_>>() {
                if component.node(n).kind != NodeKind::ExternalPort {
                    continue;
                }
                if let Some(side) = component.node(n).ext_port_side {
                    let pos = component.node(n).pos;
                    component.node_mut(n).pos = clamp_to_frame(pos, side, &frame);
                }
            }
        }

        // The new size spans all nodes plus the axis-aligned segments of
        // the external edges.
        let mut bb = BoundingBox::empty();
        for component in components.iter() {
            add_node_boxes(component, &mut bb);
            for e in component.iter_edges() {
                if !is_external_edge(component, e) {
                    continue;
                }
                let chain = external_edge_chain(component, e, &frame);
                for pair in chain.windows(2) {
                    if (pair[0].x - pair[1].x).abs() < EPSILON
                        || (pair[0].y - pair[1].y).abs() < EPSILON
                    {
                        bb.add_point(pair[0]);
                        bb.add_point(pair[1]);
                    }
                }
            }
        }

        self.offset = bb.min.neg();
        self.graph_size = bb.size();
    }

    /// The shift that moves the compacted drawing's top-left corner to the
    /// origin. Applied lazily via the components' offset vectors.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn graph_size(&self) -> Point {
        self.graph_size
    }
}

impl Default for ComponentsCompactor {
    fn default() -> Self {
        Self::new()
    }
}

fn add_node_boxes(component: &LayeredGraph, bb: &mut BoundingBox) {
    for n in component.iter_nodes() {
        let node = component.node(n);
        bb.add_point(Point::new(
            node.pos.x - node.margin.left,
            node.pos.y - node.margin.top,
        ));
        bb.add_point(Point::new(
            node.pos.x + node.size.x + node.margin.right,
            node.pos.y + node.size.y + node.margin.bottom,
        ));
    }
}

/// Flatten the hulls and the selected extensions into compaction elements,
/// one group per component.
fn collect_elements(
    shapes: &[ComponentShape],
    take_extension: impl Fn(PortSide) -> bool,
) -> Vec<CElement> {
    let mut elements = Vec::new();
    for (i, shape) in shapes.iter().enumerate() {
        for &r in &shape.hull {
            elements.push(CElement::new(r, i));
        }
        for &(side, r) in &shape.extensions {
            if take_extension(side) {
                elements.push(CElement::new(r, i));
            }
        }
    }
    elements
}

/// Compute a component's rectilinear hull and external extensions.
fn component_shape(component: &LayeredGraph, frame: &BoundingBox) -> ComponentShape {
    let mut pts: Vec<Point> = Vec::new();
    let mut outer_min = [f64::INFINITY; 4];
    let mut outer_max = [f64::NEG_INFINITY; 4];

    // Node boxes; external port dummies stay out of the hull unless the
    // component consists of nothing else.
    for n in component.iter_nodes() {
        let node = component.node(n);
        if node.kind == NodeKind::ExternalPort {
            continue;
        }
        push_box_corners(
            &mut pts,
            node.pos.x - node.margin.left,
            node.pos.y - node.margin.top,
            node.size.x + node.margin.left + node.margin.right,
            node.size.y + node.margin.top + node.margin.bottom,
        );
    }
    if pts.is_empty() {
        for n in component.iter_nodes() {
            let node = component.node(n);
            push_box_corners(
                &mut pts,
                node.pos.x,
                node.pos.y,
                node.size.x.max(1.),
                node.size.y.max(1.),
            );
        }
    }

    // Edge contributions: bend points of internal edges, segments of
    // external edges.
    for e in component.iter_edges() {
        let thickness = component.edge(e).thickness.max(1.);
        if !is_external_edge(component, e) {
            for &bend in &component.edge(e).bends {
                pts.push(bend);
            }
            continue;
        }

        let source_external = component
            .node(component.port_owner(component.edge(e).source))
            .kind
            == NodeKind::ExternalPort;
        let chain = external_edge_chain(component, e, frame);
        let side = external_edge_side(component, e);

        for (i, pair) in chain.windows(2).enumerate() {
            let outer = if source_external {
                i == 0
            } else {
                i == chain.len() - 2
            };
            let rect = Rect::around_segment(pair[0], pair[1], thickness);
            if outer {
                // The outer segment joins the per-side union extension.
                let si = side.index();
                if side.is_horizontal() {
                    outer_min[si] = outer_min[si].min(rect.y);
                    outer_max[si] = outer_max[si].max(rect.y + rect.height);
                } else {
                    outer_min[si] = outer_min[si].min(rect.x);
                    outer_max[si] = outer_max[si].max(rect.x + rect.width);
                }
            } else {
                push_box_corners(&mut pts, rect.x, rect.y, rect.width, rect.height);
            }
        }
    }

    // The bounds of the hull points decide where extensions start.
    let mut hull_bb = BoundingBox::empty();
    for p in &pts {
        hull_bb.add_point(*p);
    }

    let mut extensions = Vec::new();
    for side in [PortSide::North, PortSide::East, PortSide::South, PortSide::West] {
        if !component.ext_port_sides.contains(side) {
            continue;
        }
        let si = side.index();
        if outer_min[si] > outer_max[si] {
            continue;
        }
        let (min, max) = (outer_min[si], outer_max[si]);
        let rect = match side {
            PortSide::West => Rect::new(
                frame.min.x,
                min,
                hull_bb.min.x - frame.min.x,
                max - min,
            ),
            PortSide::East => Rect::new(
                hull_bb.max.x,
                min,
                frame.max.x - hull_bb.max.x,
                max - min,
            ),
            PortSide::North => Rect::new(
                min,
                frame.min.y,
                max - min,
                hull_bb.min.y - frame.min.y,
            ),
            PortSide::South => Rect::new(
                min,
                hull_bb.max.y,
                max - min,
                frame.max.y - hull_bb.max.y,
            ),
        };
        // The hull must reach its extensions.
        pts.push(rect.top_left());
        pts.push(rect.bottom_right());
        extensions.push((side, rect));
    }

    ComponentShape {
        hull: hull_rectangles(&pts),
        extensions,
    }
}

fn push_box_corners(pts: &mut Vec<Point>, x: f64, y: f64, w: f64, h: f64) {
    pts.push(Point::new(x, y));
    pts.push(Point::new(x + w, y));
    pts.push(Point::new(x, y + h));
    pts.push(Point::new(x + w, y + h));
}

fn is_external_edge(component: &LayeredGraph, e: crate::topo::graph::EdgeHandle) -> bool {
    let edge = component.edge(e);
    component.node(component.port_owner(edge.source)).kind == NodeKind::ExternalPort
        || component.node(component.port_owner(edge.target)).kind
            == NodeKind::ExternalPort
}

fn external_edge_side(
    component: &LayeredGraph,
    e: crate::topo::graph::EdgeHandle,
) -> PortSide {
    let edge = component.edge(e);
    for p in [edge.source, edge.target] {
        let owner = component.port_owner(p);
        if component.node(owner).kind == NodeKind::ExternalPort {
            return component
                .node(owner)
                .ext_port_side
                .expect("external port dummy without a side");
        }
    }
    unreachable!("edge is not an external edge");
}

/// The point chain of an external edge: the external endpoint is stretched
/// to the frame border, the other endpoint to its node's margin border.
fn external_edge_chain(
    component: &LayeredGraph,
    e: crate::topo::graph::EdgeHandle,
    frame: &BoundingBox,
) -> Vec<Point> {
    let edge = component.edge(e);
    let source_owner = component.port_owner(edge.source);
    let source_external =
        component.node(source_owner).kind == NodeKind::ExternalPort;

    let mut p1 = component.absolute_anchor(edge.source);
    let mut p2 = component.absolute_anchor(edge.target);
    if source_external {
        let side = external_edge_side(component, e);
        p1 = clamp_to_frame(p1, side, frame);
        p2 = port_position_on_margin(component, edge.target);
    } else {
        let side = external_edge_side(component, e);
        p1 = port_position_on_margin(component, edge.source);
        p2 = clamp_to_frame(p2, side, frame);
    }

    let mut chain = Vec::with_capacity(edge.bends.len() + 2);
    chain.push(p1);
    chain.extend_from_slice(&edge.bends);
    chain.push(p2);
    chain
}

fn clamp_to_frame(p: Point, side: PortSide, frame: &BoundingBox) -> Point {
    match side {
        PortSide::North => Point::new(p.x, p.y.min(frame.min.y)),
        PortSide::East => Point::new(p.x.max(frame.max.x), p.y),
        PortSide::South => Point::new(p.x, p.y.max(frame.max.y)),
        PortSide::West => Point::new(p.x.min(frame.min.x), p.y),
    }
}

/// Move a port's anchor outward to the margin border of its node, so that
/// the edge segment next to the node is fully covered.
fn port_position_on_margin(component: &LayeredGraph, port: PortHandle) -> Point {
    let mut pos = component.absolute_anchor(port);
    let margin = component.node(component.port_owner(port)).margin;
    match component.port(port).side {
        PortSide::North => pos.y -= margin.top,
        PortSide::East => pos.x += margin.right,
        PortSide::South => pos.y += margin.bottom,
        PortSide::West => pos.x -= margin.left,
    }
    pos
}
