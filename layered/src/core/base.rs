//! Contains enums, constants and simple data structures that are shared
//! across the placement and packing algorithms.

/// The four sides of a node on which a port may sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSide {
    North,
    East,
    South,
    West,
}

impl PortSide {
    pub fn index(&self) -> usize {
        match self {
            PortSide::North => 0,
            PortSide::East => 1,
            PortSide::South => 2,
            PortSide::West => 3,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, PortSide::East | PortSide::West)
    }
}

/// A set of port sides, packed into a bit set. The sixteen possible
/// combinations are named below; they key the component-group conflict
/// tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SideSet(u8);

impl SideSet {
    pub const NONE: SideSet = SideSet(0);
    pub const NORTH: SideSet = SideSet(1);
    pub const EAST: SideSet = SideSet(2);
    pub const SOUTH: SideSet = SideSet(4);
    pub const WEST: SideSet = SideSet(8);
    pub const NORTH_EAST: SideSet = SideSet(1 | 2);
    pub const NORTH_SOUTH: SideSet = SideSet(1 | 4);
    pub const NORTH_WEST: SideSet = SideSet(1 | 8);
    pub const EAST_SOUTH: SideSet = SideSet(2 | 4);
    pub const EAST_WEST: SideSet = SideSet(2 | 8);
    pub const SOUTH_WEST: SideSet = SideSet(4 | 8);
    pub const NORTH_EAST_SOUTH: SideSet = SideSet(1 | 2 | 4);
    pub const NORTH_EAST_WEST: SideSet = SideSet(1 | 2 | 8);
    pub const NORTH_SOUTH_WEST: SideSet = SideSet(1 | 4 | 8);
    pub const EAST_SOUTH_WEST: SideSet = SideSet(2 | 4 | 8);
    pub const NORTH_EAST_SOUTH_WEST: SideSet = SideSet(1 | 2 | 4 | 8);

    fn bit(side: PortSide) -> u8 {
        match side {
            PortSide::North => 1,
            PortSide::East => 2,
            PortSide::South => 4,
            PortSide::West => 8,
        }
    }

    pub fn with(self, side: PortSide) -> SideSet {
        SideSet(self.0 | Self::bit(side))
    }

    pub fn contains(&self, side: PortSide) -> bool {
        self.0 & Self::bit(side) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Distinguishes the nodes of the original graph from the various dummy
/// nodes that earlier phases insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A node of the original graph.
    Normal,
    /// A dummy standing in for one segment of an edge that spans more than
    /// two layers.
    LongEdge,
    /// A same-layer dummy carrying the vertical stub of a north or south
    /// port edge.
    NorthSouthPort,
    /// A dummy that is part of a node spanning several layers.
    BigNode,
    /// A dummy representing a port on the boundary of the enclosing graph.
    ExternalPort,
}

impl NodeKind {
    pub fn is_normal(&self) -> bool {
        matches!(self, NodeKind::Normal)
    }
}

/// How much the network-simplex placer may change a node's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFlexibility {
    /// The node is kept exactly as-is.
    None,
    /// Ports may be moved along the node border, the size is kept.
    PortPosition,
    /// Ports may move and the node may grow to fill available space.
    NodeSizeWhereSpacePermits,
}

impl NodeFlexibility {
    pub fn allows_resize(&self) -> bool {
        matches!(self, NodeFlexibility::NodeSizeWhereSpacePermits)
    }
}

/// Restrictions on the placement of a node's ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortConstraints {
    Free,
    FixedSide,
    FixedOrder,
    FixedPos,
}

/// The edge routing style the surrounding pipeline will use. Component
/// compaction relies on orthogonal segments and is skipped otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRouting {
    Polyline,
    Orthogonal,
    Splines,
}

/// Where a node label sits vertically; decides how the label tracks a node
/// that grows during placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalLabelPlacement {
    Top,
    Center,
    Bottom,
}

/// Whether the order of components in the input model restricts how they may
/// be grouped and packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentOrdering {
    /// Components may be grouped and placed freely.
    None,
    /// Grouping additionally respects the input order of the components.
    ModelOrder,
}

#[test]
fn test_side_set() {
    let s = SideSet::NONE.with(PortSide::North).with(PortSide::West);
    assert_eq!(s, SideSet::NORTH_WEST);
    assert!(s.contains(PortSide::North));
    assert!(!s.contains(PortSide::East));
    assert!(SideSet::NONE.is_empty());
    assert_eq!(
        SideSet::NORTH_EAST_SOUTH_WEST,
        SideSet::NORTH_SOUTH.with(PortSide::East).with(PortSide::West)
    );
}
