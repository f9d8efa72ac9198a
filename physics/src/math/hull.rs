use glam::Vec2;

// signed distance of pt to the right of the directed line a -> b, scaled by |b - a|
fn distance_right_of_line(a: Vec2, b: Vec2, pt: Vec2) -> f32 {
    -(b - a).perp_dot(pt - a)
}

fn find_extreme_points(pts: &[Vec2]) -> (Vec2, Vec2) {
    let mut min = pts[0];
    let mut max = pts[0];
    for &pt in &pts[1..] {
        if pt.x < min.x || (pt.x == min.x && pt.y < min.y) {
            min = pt;
        }
        if pt.x > max.x || (pt.x == max.x && pt.y > max.y) {
            max = pt;
        }
    }
    (min, max)
}

fn points_right_of_line(pts: &[Vec2], a: Vec2, b: Vec2, tolerance: f32) -> Vec<Vec2> {
    pts.iter()
        .copied()
        .filter(|&pt| distance_right_of_line(a, b, pt) > tolerance)
        .collect()
}

fn find_point_furthest_from_line(pts: &[Vec2], a: Vec2, b: Vec2) -> Option<Vec2> {
    pts.iter().copied().max_by(|&lhs, &rhs| {
        distance_right_of_line(a, b, lhs).total_cmp(&distance_right_of_line(a, b, rhs))
    })
}

// every point in pts is right of a -> b, push the hull points strictly between a and b
fn reduce(pts: &[Vec2], a: Vec2, b: Vec2, tolerance: f32, hull: &mut Vec<Vec2>) {
    let pivot = match find_point_furthest_from_line(pts, a, b) {
        Some(pivot) => pivot,
        None => return,
    };

    let left = points_right_of_line(pts, a, pivot, tolerance);
    reduce(&left, a, pivot, tolerance, hull);

    hull.push(pivot);

    let right = points_right_of_line(pts, pivot, b, tolerance);
    reduce(&right, pivot, b, tolerance, hull);
}

/// Counter-clockwise convex hull of `pts` starting at the left-most point.
///
/// Points within `tolerance` of a hull edge (including collinear points) are dropped.
pub fn convex_hull(pts: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    if pts.is_empty() {
        return Vec::new();
    }

    let (start, end) = find_extreme_points(pts);
    if start == end {
        return vec![start];
    }

    let mut hull = vec![start];

    let lower = points_right_of_line(pts, start, end, tolerance);
    reduce(&lower, start, end, tolerance, &mut hull);

    hull.push(end);

    let upper = points_right_of_line(pts, end, start, tolerance);
    reduce(&upper, end, start, tolerance, &mut hull);

    hull
}

pub fn is_counter_clockwise_convex(verts: &[Vec2]) -> bool {
    let count = verts.len();
    if count < 3 {
        return true;
    }
    (0..count).all(|i| {
        let a = verts[i];
        let b = verts[(i + 1) % count];
        let c = verts[(i + 2) % count];
        (b - a).perp_dot(c - b) >= 0.0
    })
}
