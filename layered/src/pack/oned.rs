//! Generic one-dimensional compaction of grouped hitboxes. All elements of
//! a group move rigidly together; the compactor slides every group as far
//! towards the top-left as the other groups' hitboxes and the configured
//! spacing allow. Hulls never overlap afterwards, and groups that were
//! separated stay separated by at least the spacing.

use crate::core::geometry::Rect;

/// One rectangle taking part in the compaction, belonging to a rigidly
/// moving group.
#[derive(Debug, Clone)]
pub struct CElement {
    pub hitbox: Rect,
    pub group: usize,
}

impl CElement {
    pub fn new(hitbox: Rect, group: usize) -> Self {
        Self { hitbox, group }
    }
}

/// Slide all groups leftwards as far as possible.
/// \returns the offset applied to each group (all offsets are <= 0 unless
/// a spacing violation had to be repaired).
pub fn compact_left(
    elements: &mut [CElement],
    num_groups: usize,
    spacing: f64,
) -> Vec<f64> {
    compact(elements, num_groups, spacing, true)
}

/// Slide all groups upwards as far as possible.
pub fn compact_up(
    elements: &mut [CElement],
    num_groups: usize,
    spacing: f64,
) -> Vec<f64> {
    compact(elements, num_groups, spacing, false)
}

fn compact(
    elements: &mut [CElement],
    num_groups: usize,
    spacing: f64,
    horizontal: bool,
) -> Vec<f64> {
    let lead = |r: &Rect| if horizontal { r.x } else { r.y };
    let extent = |r: &Rect| {
        if horizontal {
            r.x + r.width
        } else {
            r.y + r.height
        }
    };
    let blocks = |a: &Rect, b: &Rect| {
        if horizontal {
            a.overlaps_vertically(b)
        } else {
            a.overlaps_horizontally(b)
        }
    };

    // The leading edge of each group and the global minimum.
    let mut group_lead = vec![f64::INFINITY; num_groups];
    for e in elements.iter() {
        let g = e.group;
        group_lead[g] = group_lead[g].min(lead(&e.hitbox));
    }
    let global_min = group_lead
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);

    // Process the groups in the order of their leading edges; every group
    // before the current one has its final offset already.
    let mut order: Vec<usize> = (0..num_groups)
        .filter(|&g| group_lead[g].is_finite())
        .collect();
    order.sort_by(|&a, &b| group_lead[a].partial_cmp(&group_lead[b]).unwrap());

    let mut offsets = vec![0.0f64; num_groups];
    for pos in 0..order.len() {
        let g = order[pos];
        // Start out at the far border, then back off for every hitbox of
        // an earlier group that blocks the way.
        let mut target = global_min - group_lead[g];
        for &p in order.iter().take(pos) {
            for a in elements.iter().filter(|e| e.group == p) {
                for b in elements.iter().filter(|e| e.group == g) {
                    if !blocks(&a.hitbox, &b.hitbox) {
                        continue;
                    }
                    if extent(&a.hitbox) + offsets[p] <= lead(&b.hitbox) + spacing {
                        let required = extent(&a.hitbox) + offsets[p] + spacing
                            - lead(&b.hitbox);
                        target = target.max(required);
                    }
                }
            }
        }
        offsets[g] = target;
    }

    // Apply the offsets.
    for e in elements.iter_mut() {
        if horizontal {
            e.hitbox.x += offsets[e.group];
        } else {
            e.hitbox.y += offsets[e.group];
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_slide_left_until_spacing() {
        let mut elements = vec![
            CElement::new(Rect::new(0., 0., 10., 10.), 0),
            CElement::new(Rect::new(100., 0., 10., 10.), 1),
        ];
        let offsets = compact_left(&mut elements, 2, 5.);
        assert_eq!(offsets[0], 0.);
        // The second group stops 5 units right of the first.
        assert_eq!(elements[1].hitbox.x, 15.);
        assert_eq!(offsets[1], -85.);
    }

    #[test]
    fn disjoint_rows_pass_each_other() {
        // No vertical overlap, so the right group slides all the way to
        // the border.
        let mut elements = vec![
            CElement::new(Rect::new(0., 0., 10., 10.), 0),
            CElement::new(Rect::new(100., 50., 10., 10.), 1),
        ];
        compact_left(&mut elements, 2, 5.);
        assert_eq!(elements[1].hitbox.x, 0.);
    }

    #[test]
    fn multi_hitbox_groups_move_rigidly() {
        // Group 1 has two boxes; only the lower one is blocked.
        let mut elements = vec![
            CElement::new(Rect::new(0., 0., 20., 10.), 0),
            CElement::new(Rect::new(100., 0., 10., 10.), 1),
            CElement::new(Rect::new(100., 40., 10., 10.), 1),
        ];
        compact_left(&mut elements, 2, 5.);
        // Both boxes of group 1 moved by the same amount.
        assert_eq!(elements[1].hitbox.x, 25.);
        assert_eq!(elements[2].hitbox.x, 25.);
    }

    #[test]
    fn compact_up_mirrors_compact_left() {
        let mut elements = vec![
            CElement::new(Rect::new(0., 0., 10., 10.), 0),
            CElement::new(Rect::new(0., 80., 10., 10.), 1),
        ];
        compact_up(&mut elements, 2, 4.);
        assert_eq!(elements[1].hitbox.y, 14.);
    }
}
