//! A graph placer that arranges components in rows, for graphs whose
//! components connect to no external ports. Components are sorted by
//! priority and size and packed into rows whose width is derived from the
//! total component area and the desired aspect ratio.

use crate::core::geometry::Point;
use crate::pack::compactor::ComponentsCompactor;
use crate::pack::components::compaction_allowed;
use crate::topo::graph::LayeredGraph;

/// Place \p components into rows and record the result in \p target's size.
/// Offsets are accumulated on the components and applied when they are
/// moved into the target.
pub fn place_component_rows(
    components: &mut Vec<LayeredGraph>,
    target: &mut LayeredGraph,
    keep_model_order: bool,
) {
    let spacing = target.options.spacing_component_component;

    // Sort by descending priority, then descending area. In model-order
    // mode the input order is the order.
    let mut order: Vec<usize> = (0..components.len()).collect();
    if !keep_model_order {
        order.sort_by(|&a, &b| {
            let ca = &components[a];
            let cb = &components[b];
            cb.priority
                .cmp(&ca.priority)
                .then_with(|| {
                    let area_a = ca.size.x * ca.size.y;
                    let area_b = cb.size.x * cb.size.y;
                    area_b.partial_cmp(&area_a).unwrap()
                })
        });
    }

    let size = place_in_rows(
        components,
        &order,
        spacing,
        target.options.aspect_ratio,
    );
    target.size = Point::new(size.x - spacing, size.y - spacing);

    if compaction_allowed(target) {
        for component in components.iter_mut() {
            let offset = component.offset;
            component.translate(offset);
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

/// Place the selected components iteratively into rows. The maximal row
/// width follows from the widest component and the total area scaled by the
/// aspect ratio.
/// \returns the space used, including spacing to the right and bottom.
pub(crate) fn place_in_rows(
    components: &mut [LayeredGraph],
    order: &[usize],
    spacing: f64,
    aspect_ratio: f64,
) -> Point {
    if order.is_empty() {
        return Point::zero();
    }

    let mut max_row_width = 0.0f64;
    let mut total_area = 0.0f64;
    for &i in order {
        let size = components[i].size;
        max_row_width = max_row_width.max(size.x);
        total_area += size.x * size.y;
    }
    max_row_width = max_row_width.max(total_area.sqrt() * aspect_ratio);

    let mut xpos = 0.0f64;
    let mut ypos = 0.0f64;
    let mut highest_box = 0.0f64;
    let mut broadest_row = spacing;
    for &i in order {
        let size = components[i].size;
        if xpos + size.x > max_row_width {
            // Start the next row.
            xpos = 0.;
            ypos += highest_box + spacing;
            highest_box = 0.;
        }
        components[i].offset.shift(Point::new(xpos, ypos));
        broadest_row = broadest_row.max(xpos + size.x);
        highest_box = highest_box.max(size.y);
        xpos += size.x + spacing;
    }

    Point::new(broadest_row + spacing, ypos + highest_box + spacing)
}
