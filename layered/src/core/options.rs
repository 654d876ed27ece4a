//! The configuration surface of the layout core. The surrounding pipeline
//! stores one `LayoutOptions` value per graph; components split off a graph
//! carry a copy of their parent's options.

use crate::core::base::{ComponentOrdering, EdgeRouting};

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Scales solver iteration budgets and balancing thresholds. Larger
    /// values trade time for straighter drawings.
    pub thoroughness: i32,
    /// Enables the path-detection pass of the network-simplex placer that
    /// removes edge stair-cases.
    pub favor_straight_edges: bool,
    /// Scales the balancing forces of the linear-segments placer.
    pub deflection_dampening: f64,
    /// Minimum vertical distance between two normal nodes in a layer.
    pub spacing_node_node: f64,
    /// Minimum vertical distance involving at least one dummy node.
    pub spacing_edge_edge: f64,
    /// Minimum distance between two ports on the same node border.
    pub spacing_port_port: f64,
    /// Minimum distance between two packed components.
    pub spacing_component_component: f64,
    /// Target width/height ratio for row packing.
    pub aspect_ratio: f64,
    /// Whether packed components should be compacted afterwards.
    pub compact_components: bool,
    /// Whether grouping and packing respect the input order of components.
    pub component_ordering: ComponentOrdering,
    /// The routing style of the surrounding pipeline.
    pub edge_routing: EdgeRouting,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            thoroughness: 7,
            favor_straight_edges: false,
            deflection_dampening: 1.0,
            spacing_node_node: 20.0,
            spacing_edge_edge: 10.0,
            spacing_port_port: 10.0,
            spacing_component_component: 20.0,
            aspect_ratio: 1.6,
            compact_components: false,
            component_ordering: ComponentOrdering::None,
            edge_routing: EdgeRouting::Orthogonal,
        }
    }
}
