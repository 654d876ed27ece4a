//! The rectilinear convex hull of a point cloud, represented as a set of
//! non-overlapping rectangles.
//!
//! The hull is bounded by four staircases:
//!
//! ```text
//!   q1 | q2
//!  ---------
//!   q4 | q3
//! ```
//!
//! The staircases are the maximal points under the four diagonal orders;
//! they are computed here as prefix and suffix minima/maxima of y over the
//! points sorted by x. Splitting into rectangles walks the distinct x
//! coordinates left to right and emits one rectangle per interval on which
//! the upper and lower staircase values are constant.

use crate::core::geometry::{Point, Rect};

/// Compute the rectilinear convex hull of \p points and split it into
/// non-overlapping rectangles, ordered left to right.
pub fn hull_rectangles(points: &[Point]) -> Vec<Rect> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap()
            .then(a.y.partial_cmp(&b.y).unwrap())
    });

    // Group by distinct x and track the y-range per abscissa.
    let mut xs: Vec<f64> = Vec::new();
    let mut min_y: Vec<f64> = Vec::new();
    let mut max_y: Vec<f64> = Vec::new();
    for p in &sorted {
        if xs.last() == Some(&p.x) {
            let last = xs.len() - 1;
            min_y[last] = min_y[last].min(p.y);
            max_y[last] = max_y[last].max(p.y);
        } else {
            xs.push(p.x);
            min_y.push(p.y);
            max_y.push(p.y);
        }
    }

    let k = xs.len();
    if k == 1 {
        return vec![Rect::new(xs[0], min_y[0], 0., max_y[0] - min_y[0])];
    }

    // The four staircases: q1 = prefix minima, q2 = suffix minima,
    // q4 = prefix maxima, q3 = suffix maxima.
    let mut pref_min = min_y.clone();
    let mut pref_max = max_y.clone();
    for i in 1..k {
        pref_min[i] = pref_min[i].min(pref_min[i - 1]);
        pref_max[i] = pref_max[i].max(pref_max[i - 1]);
    }
    let mut suf_min = min_y.clone();
    let mut suf_max = max_y.clone();
    for i in (0..k - 1).rev() {
        suf_min[i] = suf_min[i].min(suf_min[i + 1]);
        suf_max[i] = suf_max[i].max(suf_max[i + 1]);
    }

    // One rectangle per x interval; adjacent intervals with the same
    // bounds merge into one.
    let mut rects: Vec<Rect> = Vec::new();
    for i in 0..k - 1 {
        let top = pref_min[i].max(suf_min[i + 1]);
        let bottom = pref_max[i].min(suf_max[i + 1]);
        if top > bottom {
            // The hull has no area over this interval.
            continue;
        }
        if let Some(last) = rects.last_mut() {
            if last.y == top
                && last.y + last.height == bottom
                && last.x + last.width == xs[i]
            {
                last.width += xs[i + 1] - xs[i];
                continue;
            }
        }
        rects.push(Rect::new(xs[i], top, xs[i + 1] - xs[i], bottom - top));
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_points(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x, y + h),
            Point::new(x + w, y + h),
        ]
    }

    #[test]
    fn hull_of_one_box() {
        let rects = hull_rectangles(&rect_points(10., 20., 30., 40.));
        assert_eq!(rects, vec![Rect::new(10., 20., 30., 40.)]);
    }

    #[test]
    fn hull_of_l_shape() {
        // Two boxes forming an L: a tall one on the left, a short one to
        // its right along the bottom.
        let mut pts = rect_points(0., 0., 10., 30.);
        pts.extend(rect_points(10., 20., 20., 10.));
        let rects = hull_rectangles(&pts);

        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], Rect::new(0., 0., 10., 30.));
        assert_eq!(rects[1], Rect::new(10., 20., 20., 10.));
    }

    #[test]
    fn hull_fills_concave_gaps_between_stairs() {
        // Two boxes stacked like stairs; the hull contains the staircase
        // interior, so the middle column spans both boxes.
        let mut pts = rect_points(0., 0., 10., 20.);
        pts.extend(rect_points(5., 10., 15., 20.));
        let rects = hull_rectangles(&pts);

        // Middle interval [5, 10] spans from the top of the first box to
        // the bottom of the second.
        assert!(rects.contains(&Rect::new(5., 0., 5., 30.)));
    }

    #[test]
    fn hull_of_diagonal_points_has_no_bridge() {
        // Two isolated points on a diagonal enclose no area.
        let pts = vec![Point::new(0., 0.), Point::new(10., 10.)];
        let rects = hull_rectangles(&pts);
        assert!(rects.is_empty());
    }
}
