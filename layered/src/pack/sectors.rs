//! A graph placer that takes connections to external ports into account.
//!
//! Components are greedily gathered into [`ComponentGroup`]s: each
//! component goes into the first group that can hold it. Within a group,
//! every external-port-side combination gets its own bucket with its own
//! little layout (rows for the center, horizontal or vertical strips for
//! the rest), and the buckets are then arranged around the center. The
//! groups themselves are placed along a diagonal from top-left to
//! bottom-right, unless model order restricts a group to one axis.

use crate::core::base::SideSet;
use crate::core::geometry::Point;
use crate::pack::compactor::ComponentsCompactor;
use crate::pack::components::compaction_allowed;
use crate::pack::group::ComponentGroup;
use crate::pack::row::place_in_rows;
use crate::topo::graph::LayeredGraph;

pub fn place_component_groups(
    components: &mut Vec<LayeredGraph>,
    target: &mut LayeredGraph,
    model_order: bool,
) {
    let spacing = target.options.spacing_component_component;

    // Greedy group building: the first group with space wins.
    let mut groups: Vec<ComponentGroup> = Vec::new();
    for i in 0..components.len() {
        let sides = components[i].ext_port_sides;
        if !groups.iter_mut().any(|g| g.add(i, sides)) {
            groups.push(ComponentGroup::with_component(i, sides, model_order));
        }
    }
    #[cfg(feature = "log")]
    log::info!(
        "Packing {} components in {} groups.",
        components.len(),
        groups.len()
    );

    let mut offset = Point::zero();
    for group in &groups {
        let group_size = place_components(components, group, spacing, target);
        offset_components(components, group.components(), offset.x, offset.y);

        if model_order {
            // Offset only along the axes implied by the group's external
            // connections: south pushes the next group down, east pushes it
            // to the right. A group with neither moves diagonally.
            let south = group_sides_contain(components, group, |s| {
                s.contains(crate::core::base::PortSide::South)
            });
            let east = group_sides_contain(components, group, |s| {
                s.contains(crate::core::base::PortSide::East)
            });
            match (south, east) {
                (true, false) => offset.y += group_size.y,
                (false, true) => offset.x += group_size.x,
                _ => {
                    offset.x += group_size.x;
                    offset.y += group_size.y;
                }
            }
        } else {
            offset.x += group_size.x;
            offset.y += group_size.y;
        }
    }

    // The group sizes include spacing on the right and bottom.
    target.size = Point::new(offset.x - spacing, offset.y - spacing);

    if compaction_allowed(target) {
        for component in components.iter_mut() {
            let component_offset = component.offset;
            component.translate(component_offset);
            component.offset = Point::zero();
        }
        let mut compactor = ComponentsCompactor::new();
        compactor.compact(components, target.size, spacing);
        for component in components.iter_mut() {
            component.offset = compactor.offset();
        }
        target.size = compactor.graph_size();
    }
}

fn group_sides_contain(
    components: &[LayeredGraph],
    group: &ComponentGroup,
    pred: impl Fn(SideSet) -> bool,
) -> bool {
    group
        .components()
        .iter()
        .any(|&i| pred(components[i].ext_port_sides))
}

/// Compute a placement for all buckets of one group.
/// \returns the group's size, including spacing on the right and bottom.
fn place_components(
    components: &mut [LayeredGraph],
    group: &ComponentGroup,
    spacing: f64,
    target: &LayeredGraph,
) -> Point {
    use crate::core::base::SideSet as S;

    // Place each bucket as if it were alone in the group.
    let size_c = {
        let order: Vec<usize> = group.components_with(S::NONE).to_vec();
        place_in_rows(components, &order, spacing, target.options.aspect_ratio)
    };
    let size_n = place_horizontally(components, group.components_with(S::NORTH), spacing);
    let size_s = place_horizontally(components, group.components_with(S::SOUTH), spacing);
    let size_w = place_vertically(components, group.components_with(S::WEST), spacing);
    let size_e = place_vertically(components, group.components_with(S::EAST), spacing);
    let size_nw = place_horizontally(components, group.components_with(S::NORTH_WEST), spacing);
    let size_ne = place_horizontally(components, group.components_with(S::NORTH_EAST), spacing);
    let size_sw = place_horizontally(components, group.components_with(S::SOUTH_WEST), spacing);
    let size_se = place_horizontally(components, group.components_with(S::EAST_SOUTH), spacing);
    let size_we = place_vertically(components, group.components_with(S::EAST_WEST), spacing);
    let size_ns = place_horizontally(components, group.components_with(S::NORTH_SOUTH), spacing);
    let size_nwe = place_horizontally(components, group.components_with(S::NORTH_EAST_WEST), spacing);
    let size_swe = place_horizontally(components, group.components_with(S::EAST_SOUTH_WEST), spacing);
    let size_wns = place_vertically(components, group.components_with(S::NORTH_SOUTH_WEST), spacing);
    let size_ens = place_vertically(components, group.components_with(S::NORTH_EAST_SOUTH), spacing);
    let size_nesw =
        place_horizontally(components, group.components_with(S::NORTH_EAST_SOUTH_WEST), spacing);

    // The three columns and rows of the sector grid, plus an extra column
    // for north-south components and an extra row for west-east ones.
    let col_left = size_nw.x.max(size_w.x).max(size_sw.x).max(size_wns.x);
    let col_mid = size_n.x.max(size_c.x).max(size_s.x).max(size_nesw.x);
    let col_ns = size_ns.x;
    let col_right = size_ne.x.max(size_e.x).max(size_se.x).max(size_ens.x);
    let row_top = size_nw.y.max(size_n.y).max(size_ne.y).max(size_nwe.y);
    let row_mid = size_w.y.max(size_c.y).max(size_e.y).max(size_nesw.y);
    let row_we = size_we.y;
    let row_bottom = size_sw.y.max(size_s.y).max(size_se.y).max(size_swe.y);

    // Move each bucket to its final place. The NW, NWE and WNS buckets
    // stay at the origin.
    offset_components(
        components,
        group.components_with(S::NONE),
        col_left + col_ns,
        row_top + row_we,
    );
    offset_components(
        components,
        group.components_with(S::NORTH_EAST_SOUTH_WEST),
        col_left + col_ns,
        row_top + row_we,
    );
    offset_components(
        components,
        group.components_with(S::NORTH),
        col_left + col_ns,
        0.,
    );
    offset_components(
        components,
        group.components_with(S::SOUTH),
        col_left + col_ns,
        row_top + row_we + row_mid,
    );
    offset_components(
        components,
        group.components_with(S::WEST),
        0.,
        row_top + row_we,
    );
    offset_components(
        components,
        group.components_with(S::EAST),
        col_left + col_ns + col_mid,
        row_top + row_we,
    );
    offset_components(
        components,
        group.components_with(S::NORTH_EAST),
        col_left + col_ns + col_mid,
        0.,
    );
    offset_components(
        components,
        group.components_with(S::SOUTH_WEST),
        0.,
        row_top + row_we + row_mid,
    );
    offset_components(
        components,
        group.components_with(S::EAST_SOUTH),
        col_left + col_ns + col_mid,
        row_top + row_we + row_mid,
    );
    offset_components(components, group.components_with(S::EAST_WEST), 0., row_top);
    offset_components(components, group.components_with(S::NORTH_SOUTH), col_left, 0.);
    offset_components(
        components,
        group.components_with(S::EAST_SOUTH_WEST),
        0.,
        row_top + row_we + row_mid,
    );
    offset_components(
        components,
        group.components_with(S::NORTH_EAST_SOUTH),
        col_left + col_ns + col_mid,
        0.,
    );

    Point::new(
        (col_left + col_mid + col_ns + col_right)
            .max(size_we.x)
            .max(size_nwe.x)
            .max(size_swe.x),
        (row_top + row_mid + row_we + row_bottom)
            .max(size_ns.y)
            .max(size_wns.y)
            .max(size_ens.y),
    )
}

/// Place the selected components along a horizontal line.
/// \returns the space used, including spacing right and below.
fn place_horizontally(
    components: &mut [LayeredGraph],
    bucket: &[usize],
    spacing: f64,
) -> Point {
    let mut size = Point::zero();
    for &i in bucket {
        components[i].offset.shift(Point::new(size.x, 0.));
        size.x += components[i].size.x + spacing;
        size.y = size.y.max(components[i].size.y);
    }
    if size.y > 0. {
        size.y += spacing;
    }
    size
}

/// Place the selected components along a vertical line.
fn place_vertically(
    components: &mut [LayeredGraph],
    bucket: &[usize],
    spacing: f64,
) -> Point {
    let mut size = Point::zero();
    for &i in bucket {
        components[i].offset.shift(Point::new(0., size.y));
        size.y += components[i].size.y + spacing;
        size.x = size.x.max(components[i].size.x);
    }
    if size.x > 0. {
        size.x += spacing;
    }
    size
}

fn offset_components(
    components: &mut [LayeredGraph],
    bucket: &[usize],
    dx: f64,
    dy: f64,
) {
    for &i in bucket {
        components[i].offset.shift(Point::new(dx, dy));
    }
}
