//! Represents a group of connected components packed together.
//!
//! A component group is conceptually divided into nine sectors:
//!
//! ```text
//!   +----+----+----+
//!   | nw | n  | ne |
//!   +----+----+----+
//!   | w  | c  | e  |
//!   +----+----+----+
//!   | sw | s  | se |
//!   +----+----+----+
//! ```
//!
//! The external port sides a component connects to determine which sectors
//! it occupies: a component connected to a northern port goes into `n`, one
//! connected to a southern and an eastern port into `se`, one with no
//! connections into `c`, and a component connected to both a western and an
//! eastern port spans `w`, `c` and `e`. For a component to claim its
//! sectors, no earlier component may occupy a conflicting combination; the
//! static table below is the oracle for these conflicts. A component that
//! does not fit must go into a fresh group.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::base::SideSet;

/// For a candidate's side set, the side sets that must not already be
/// present in a group for the candidate to be added.
static CONSTRAINTS: Lazy<HashMap<SideSet, Vec<SideSet>>> = Lazy::new(|| {
    use crate::core::base::SideSet as S;
    let mut m = HashMap::new();
    m.insert(S::NONE, vec![S::NORTH_EAST_SOUTH_WEST]);
    m.insert(S::WEST, vec![S::NORTH_EAST_SOUTH_WEST, S::NORTH_SOUTH_WEST]);
    m.insert(S::EAST, vec![S::NORTH_EAST_SOUTH, S::NORTH_EAST_SOUTH_WEST]);
    m.insert(S::NORTH, vec![S::NORTH_EAST_SOUTH_WEST, S::NORTH_EAST_WEST]);
    m.insert(S::SOUTH, vec![S::EAST_SOUTH_WEST, S::NORTH_EAST_SOUTH_WEST]);
    m.insert(
        S::NORTH_SOUTH,
        vec![
            S::EAST_WEST,
            S::NORTH_EAST_SOUTH_WEST,
            S::NORTH_EAST_WEST,
            S::EAST_SOUTH_WEST,
        ],
    );
    m.insert(
        S::EAST_WEST,
        vec![
            S::NORTH_SOUTH,
            S::NORTH_SOUTH_WEST,
            S::NORTH_EAST_SOUTH,
            S::NORTH_EAST_SOUTH_WEST,
        ],
    );
    m.insert(
        S::NORTH_WEST,
        vec![S::NORTH_WEST, S::NORTH_EAST_WEST, S::NORTH_SOUTH_WEST],
    );
    m.insert(
        S::NORTH_EAST,
        vec![S::NORTH_EAST, S::NORTH_EAST_WEST, S::NORTH_EAST_SOUTH],
    );
    m.insert(
        S::SOUTH_WEST,
        vec![S::SOUTH_WEST, S::EAST_SOUTH_WEST, S::NORTH_SOUTH_WEST],
    );
    m.insert(
        S::EAST_SOUTH,
        vec![S::EAST_SOUTH, S::EAST_SOUTH_WEST, S::NORTH_EAST_SOUTH],
    );
    m.insert(
        S::NORTH_EAST_WEST,
        vec![
            S::NORTH,
            S::NORTH_SOUTH,
            S::NORTH_WEST,
            S::NORTH_EAST,
            S::NORTH_EAST_SOUTH_WEST,
            S::NORTH_EAST_WEST,
            S::NORTH_SOUTH_WEST,
            S::NORTH_EAST_SOUTH,
        ],
    );
    m.insert(
        S::EAST_SOUTH_WEST,
        vec![
            S::SOUTH,
            S::NORTH_SOUTH,
            S::SOUTH_WEST,
            S::EAST_SOUTH,
            S::EAST_SOUTH_WEST,
            S::NORTH_SOUTH_WEST,
            S::NORTH_EAST_SOUTH,
            S::NORTH_EAST_SOUTH_WEST,
        ],
    );
    m.insert(
        S::NORTH_SOUTH_WEST,
        vec![
            S::WEST,
            S::EAST_WEST,
            S::NORTH_WEST,
            S::SOUTH_WEST,
            S::NORTH_EAST_WEST,
            S::EAST_SOUTH_WEST,
            S::NORTH_SOUTH_WEST,
            S::NORTH_EAST_SOUTH_WEST,
        ],
    );
    m.insert(
        S::NORTH_EAST_SOUTH,
        vec![
            S::EAST,
            S::EAST_WEST,
            S::NORTH_EAST,
            S::EAST_SOUTH,
            S::NORTH_EAST_WEST,
            S::EAST_SOUTH_WEST,
            S::NORTH_EAST_SOUTH,
            S::NORTH_EAST_SOUTH_WEST,
        ],
    );
    m.insert(
        S::NORTH_EAST_SOUTH_WEST,
        vec![
            S::NONE,
            S::WEST,
            S::EAST,
            S::NORTH,
            S::SOUTH,
            S::NORTH_SOUTH,
            S::EAST_WEST,
            S::NORTH_EAST_WEST,
            S::EAST_SOUTH_WEST,
            S::NORTH_SOUTH_WEST,
            S::NORTH_EAST_SOUTH,
            S::NORTH_EAST_SOUTH_WEST,
        ],
    );
    m
});

/// Additional conflicts that apply when the input model order must be
/// respected: the sectors are filled in the fixed slot order c, e, s, w, n
/// (with their corner and edge combinations), so a candidate may not claim
/// a slot that lies before an already occupied one.
///
/// The EAST_WEST vs EAST pairing below was flagged as questionable in the
/// source material; the table is a best-effort oracle, not a complete
/// constraint system.
static MODEL_ORDER_CONSTRAINTS: Lazy<HashMap<SideSet, Vec<SideSet>>> =
    Lazy::new(|| {
        use crate::core::base::SideSet as S;
        let mut m = HashMap::new();
        m.insert(
            S::NONE,
            vec![
                S::EAST,
                S::SOUTH,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_SOUTH_WEST,
                S::NORTH_EAST_SOUTH,
            ],
        );
        m.insert(
            S::NORTH,
            vec![
                S::NONE,
                S::EAST,
                S::SOUTH,
                S::WEST,
                S::NORTH_EAST,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_WEST,
                S::EAST_SOUTH_WEST,
                S::NORTH_SOUTH_WEST,
                S::NORTH_EAST_SOUTH,
            ],
        );
        m.insert(
            S::EAST,
            vec![
                S::SOUTH,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::NORTH_SOUTH_WEST,
                S::EAST_SOUTH_WEST,
            ],
        );
        m.insert(
            S::SOUTH,
            vec![S::EAST_SOUTH, S::NORTH_SOUTH_WEST, S::NORTH_EAST_SOUTH],
        );
        m.insert(
            S::WEST,
            vec![
                S::NONE,
                S::EAST,
                S::SOUTH,
                S::NORTH_EAST,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_WEST,
                S::EAST_SOUTH_WEST,
                S::NORTH_EAST_SOUTH,
            ],
        );
        m.insert(
            S::NORTH_EAST,
            vec![
                S::NONE,
                S::EAST,
                S::SOUTH,
                S::WEST,
                S::NORTH_EAST,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_WEST,
                S::EAST_SOUTH_WEST,
                S::NORTH_SOUTH_WEST,
                S::NORTH_EAST_SOUTH,
                S::NORTH_EAST_SOUTH_WEST,
            ],
        );
        m.insert(
            S::NORTH_WEST,
            vec![
                S::NONE,
                S::NORTH,
                S::EAST,
                S::SOUTH,
                S::WEST,
                S::NORTH_EAST,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_WEST,
                S::EAST_SOUTH_WEST,
                S::NORTH_EAST_SOUTH,
                S::NORTH_EAST_SOUTH_WEST,
            ],
        );
        m.insert(
            S::SOUTH_WEST,
            vec![S::SOUTH, S::EAST_SOUTH, S::EAST_WEST],
        );
        m.insert(
            S::NORTH_SOUTH,
            vec![
                S::NONE,
                S::NORTH,
                S::EAST,
                S::SOUTH,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_SOUTH_WEST,
                S::NORTH_EAST_SOUTH,
            ],
        );
        m.insert(
            S::EAST_WEST,
            vec![
                S::NONE,
                S::WEST,
                S::EAST,
                S::SOUTH,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_SOUTH_WEST,
            ],
        );
        m.insert(
            S::NORTH_EAST_WEST,
            vec![
                S::NONE,
                S::EAST,
                S::SOUTH,
                S::WEST,
                S::EAST_SOUTH,
                S::SOUTH_WEST,
                S::EAST_WEST,
                S::EAST_SOUTH_WEST,
            ],
        );
        m.insert(
            S::NORTH_SOUTH_WEST,
            vec![
                S::NONE,
                S::EAST,
                S::SOUTH,
                S::NORTH_EAST,
                S::EAST_SOUTH,
                S::EAST_WEST,
            ],
        );
        m.insert(
            S::NORTH_EAST_SOUTH,
            vec![S::SOUTH, S::SOUTH_WEST],
        );
        m.insert(
            S::NORTH_EAST_SOUTH_WEST,
            vec![S::EAST_SOUTH, S::SOUTH_WEST],
        );
        m
    });

fn conflicts_of(sides: SideSet) -> &'static [SideSet] {
    CONSTRAINTS.get(&sides).map(|v| &v[..]).unwrap_or(&[])
}

fn model_order_conflicts_of(sides: SideSet) -> &'static [SideSet] {
    MODEL_ORDER_CONSTRAINTS
        .get(&sides)
        .map(|v| &v[..])
        .unwrap_or(&[])
}

/// A group of components that can be packed into one sector grid. The group
/// stores indices into the caller's component list, keyed by side set.
#[derive(Debug)]
pub struct ComponentGroup {
    components: HashMap<SideSet, Vec<usize>>,
    /// The components in insertion order.
    order: Vec<usize>,
    /// Whether the additional model-order constraints apply.
    model_order: bool,
}

impl ComponentGroup {
    pub fn new(model_order: bool) -> Self {
        Self {
            components: HashMap::new(),
            order: Vec::new(),
            model_order,
        }
    }

    /// Construct a group holding the given initial component.
    pub fn with_component(
        component: usize,
        sides: SideSet,
        model_order: bool,
    ) -> Self {
        let mut group = Self::new(model_order);
        let added = group.add(component, sides);
        assert!(added, "a fresh group accepts any component");
        group
    }

    /// Try to add a component connecting to \p sides.
    /// \returns True if the group had space for it.
    pub fn add(&mut self, component: usize, sides: SideSet) -> bool {
        if !self.can_add(sides) {
            return false;
        }
        self.components.entry(sides).or_insert_with(Vec::new).push(component);
        self.order.push(component);
        true
    }

    fn can_add(&self, sides: SideSet) -> bool {
        let occupied = |s: &SideSet| {
            self.components.get(s).map(|v| !v.is_empty()).unwrap_or(false)
        };
        if conflicts_of(sides).iter().any(occupied) {
            return false;
        }
        if self.model_order && model_order_conflicts_of(sides).iter().any(occupied) {
            return false;
        }
        true
    }

    /// All components of the group, in insertion order.
    pub fn components(&self) -> &[usize] {
        &self.order
    }

    /// The components connecting to exactly the given side combination.
    pub fn components_with(&self, sides: SideSet) -> &[usize] {
        self.components.get(&sides).map(|v| &v[..]).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::base::SideSet as S;

    #[test]
    fn none_west_accepts_but_full_side_conflicts() {
        let mut group = ComponentGroup::new(false);
        assert!(group.add(0, S::NONE));
        assert!(group.add(1, S::WEST));
        // A four-sided component wants the whole grid and must open a new
        // group.
        assert!(!group.add(2, S::NORTH_EAST_SOUTH_WEST));
    }

    #[test]
    fn conflict_symmetry() {
        // Wherever the table lists B as conflicting with A and vice versa,
        // insertion order must not matter.
        let pairs = [
            (S::NORTH_WEST, S::NORTH_WEST),
            (S::EAST_WEST, S::NORTH_SOUTH),
            (S::WEST, S::NORTH_SOUTH_WEST),
        ];
        for (a, b) in pairs {
            let mut group = ComponentGroup::new(false);
            assert!(group.add(0, a));
            assert!(!group.add(1, b), "{:?} then {:?}", a, b);

            let mut group = ComponentGroup::new(false);
            assert!(group.add(0, b));
            assert!(!group.add(1, a), "{:?} then {:?}", b, a);
        }
    }

    #[test]
    fn model_order_is_stricter() {
        // NORTH after NONE is fine spatially but violates model order.
        let mut free = ComponentGroup::new(false);
        assert!(free.add(0, S::NONE));
        assert!(free.add(1, S::NORTH));

        let mut ordered = ComponentGroup::new(true);
        assert!(ordered.add(0, S::NONE));
        assert!(!ordered.add(1, S::NORTH));
    }

    #[test]
    fn groups_track_side_sets() {
        let mut group = ComponentGroup::new(false);
        assert!(group.add(7, S::NONE));
        assert!(group.add(8, S::NONE));
        assert!(group.add(9, S::WEST));
        assert_eq!(group.components(), &[7, 8, 9]);
        assert_eq!(group.components_with(S::NONE), &[7, 8]);
        assert_eq!(group.components_with(S::EAST), &[] as &[usize]);
    }
}
