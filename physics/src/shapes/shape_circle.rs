use super::{PointQueryInfo, SegmentQueryInfo, ShapeTrait};
use crate::{
    bounds::Bounds,
    math::{
        mass::{area_for_circle, moment_for_circle},
        Transform, MAGIC_EPSILON,
    },
    shape::ShapeMassInfo,
};
use glam::Vec2;

#[derive(Copy, Clone, Debug)]
pub struct CircleShape {
    center: Vec2,
    radius: f32,
    // center in world space, refreshed by cache_data
    tc: Vec2,
}

impl CircleShape {
    pub fn new(radius: f32, offset: Vec2) -> Self {
        Self {
            center: offset,
            radius,
            tc: offset,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn transformed_center(&self) -> Vec2 {
        self.tc
    }
}

/// First hit of a swept circle of radius `r2` travelling from `a` to `b` against a circle
/// of radius `r1` at `center`.
pub(super) fn circle_segment_query(
    center: Vec2,
    r1: f32,
    a: Vec2,
    b: Vec2,
    r2: f32,
) -> Option<SegmentQueryInfo> {
    let da = a - center;
    let db = b - center;
    let rsum = r1 + r2;

    let qa = da.dot(da) - 2.0 * da.dot(db) + db.dot(db);
    let qb = da.dot(db) - da.dot(da);
    let det = qb * qb - qa * (da.dot(da) - rsum * rsum);

    // qa is zero for a zero length query
    if det < 0.0 || qa == 0.0 {
        return None;
    }

    let t = (-qb - det.sqrt()) / qa;
    if (0.0..=1.0).contains(&t) {
        let n = da.lerp(db, t).normalize_or_zero();
        Some(SegmentQueryInfo {
            point: a.lerp(b, t) - n * r2,
            normal: n,
            alpha: t,
        })
    } else {
        None
    }
}

impl ShapeTrait for CircleShape {
    fn cache_data(&mut self, transform: &Transform) -> Bounds {
        self.tc = transform.transform_point2(self.center);
        Bounds::from_circle(self.tc, self.radius)
    }

    fn point_query(&self, p: Vec2) -> PointQueryInfo {
        let delta = p - self.tc;
        let d = delta.length();
        let gradient = if d > MAGIC_EPSILON { delta / d } else { Vec2::Y };

        PointQueryInfo {
            point: self.tc + gradient * self.radius,
            distance: d - self.radius,
            gradient,
        }
    }

    fn segment_query(&self, a: Vec2, b: Vec2, radius: f32) -> Option<SegmentQueryInfo> {
        circle_segment_query(self.tc, self.radius, a, b, radius)
    }

    fn mass_info(&self, mass: f32) -> ShapeMassInfo {
        ShapeMassInfo {
            m: mass,
            i: moment_for_circle(1.0, 0.0, self.radius, Vec2::ZERO),
            cog: self.center,
            area: area_for_circle(0.0, self.radius),
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::ShapeTrait;
    use super::CircleShape;
    use crate::math::Transform;
    use glam::Vec2;

    #[test]
    fn test_identity_bounds() {
        let r = 1.5;
        let mut circle = CircleShape::new(r, Vec2::ZERO);
        let bounds = circle.cache_data(&Transform::IDENTITY);
        assert_eq!(Vec2::splat(-r), bounds.mins);
        assert_eq!(Vec2::splat(r), bounds.maxs);
    }

    #[test]
    fn test_offset_is_transformed() {
        let mut circle = CircleShape::new(1.0, Vec2::new(2.0, 0.0));
        let transform =
            Transform::from_angle_translation(std::f32::consts::FRAC_PI_2, Vec2::new(10.0, 0.0));
        let bounds = circle.cache_data(&transform);
        assert!(circle
            .transformed_center()
            .abs_diff_eq(Vec2::new(10.0, 2.0), 1e-5));
        assert!(bounds.mins.abs_diff_eq(Vec2::new(9.0, 1.0), 1e-5));
        assert!(bounds.maxs.abs_diff_eq(Vec2::new(11.0, 3.0), 1e-5));
        // local geometry is untouched
        assert_eq!(Vec2::new(2.0, 0.0), circle.center());
    }

    #[test]
    fn test_point_query() {
        let circle = CircleShape::new(2.0, Vec2::ZERO);

        let outside = circle.point_query(Vec2::new(5.0, 0.0));
        assert_eq!(Vec2::new(2.0, 0.0), outside.point);
        assert_eq!(3.0, outside.distance);
        assert_eq!(Vec2::X, outside.gradient);

        let inside = circle.point_query(Vec2::new(0.0, -1.0));
        assert_eq!(-1.0, inside.distance);
        assert_eq!(Vec2::new(0.0, -2.0), inside.point);

        // the center has no well defined gradient
        let center = circle.point_query(Vec2::ZERO);
        assert_eq!(-2.0, center.distance);
        assert_eq!(Vec2::Y, center.gradient);
    }

    #[test]
    fn test_segment_query() {
        let circle = CircleShape::new(1.0, Vec2::ZERO);

        let hit = circle
            .segment_query(Vec2::new(-4.0, 0.0), Vec2::new(4.0, 0.0), 0.0)
            .unwrap();
        assert!((hit.alpha - 0.375).abs() < 1e-5);
        assert!(hit.point.abs_diff_eq(Vec2::new(-1.0, 0.0), 1e-5));
        assert!(hit.normal.abs_diff_eq(-Vec2::X, 1e-5));

        // a thick ray hits earlier
        let thick = circle
            .segment_query(Vec2::new(-4.0, 0.0), Vec2::new(4.0, 0.0), 1.0)
            .unwrap();
        assert!((thick.alpha - 0.25).abs() < 1e-5);
        assert!(thick.point.abs_diff_eq(Vec2::new(-1.0, 0.0), 1e-5));

        assert!(circle
            .segment_query(Vec2::new(-4.0, 2.0), Vec2::new(4.0, 2.0), 0.0)
            .is_none());
        assert!(circle
            .segment_query(Vec2::new(-4.0, 0.0), Vec2::new(-3.0, 0.0), 0.0)
            .is_none());
    }

    #[test]
    fn test_mass_info() {
        let circle = CircleShape::new(2.0, Vec2::new(1.0, 1.0));
        let info = circle.mass_info(3.0);
        assert_eq!(3.0, info.m);
        // 0.5 r² about the centre, the offset is not included
        assert_eq!(2.0, info.i);
        assert_eq!(Vec2::new(1.0, 1.0), info.cog);
        assert!((info.area - 4.0 * std::f32::consts::PI).abs() < 1e-5);
    }
}
