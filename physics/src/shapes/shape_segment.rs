use super::{
    closest_hit, shape_circle::circle_segment_query, PointQueryInfo, SegmentQueryInfo, ShapeTrait,
};
use crate::{
    bounds::Bounds,
    math::{
        closest_point_on_segment,
        mass::{area_for_segment, moment_for_box},
        Transform, Vec2Ext, MAGIC_EPSILON,
    },
    shape::ShapeMassInfo,
};
use glam::Vec2;

/// A capsule swept between `a` and `b`.
#[derive(Copy, Clone, Debug)]
pub struct SegmentShape {
    a: Vec2,
    b: Vec2,
    n: Vec2,
    radius: f32,

    ta: Vec2,
    tb: Vec2,
    tn: Vec2,
}

impl SegmentShape {
    pub fn new(a: Vec2, b: Vec2, radius: f32) -> Self {
        let n = (b - a).normalize_or_zero().rperp();
        Self {
            a,
            b,
            n,
            radius,
            ta: a,
            tb: b,
            tn: n,
        }
    }

    pub fn a(&self) -> Vec2 {
        self.a
    }

    pub fn b(&self) -> Vec2 {
        self.b
    }

    pub fn normal(&self) -> Vec2 {
        self.n
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn transformed_a(&self) -> Vec2 {
        self.ta
    }

    pub fn transformed_b(&self) -> Vec2 {
        self.tb
    }

    pub fn transformed_normal(&self) -> Vec2 {
        self.tn
    }
}

impl ShapeTrait for SegmentShape {
    fn cache_data(&mut self, transform: &Transform) -> Bounds {
        self.ta = transform.transform_point2(self.a);
        self.tb = transform.transform_point2(self.b);
        self.tn = transform.transform_vector2(self.n);

        Bounds {
            mins: self.ta.min(self.tb),
            maxs: self.ta.max(self.tb),
        }
        .expand(self.radius)
    }

    fn point_query(&self, p: Vec2) -> PointQueryInfo {
        let closest = closest_point_on_segment(p, self.ta, self.tb);

        let delta = p - closest;
        let d = delta.length();
        let r = self.radius;
        let g = if d > 0.0 { delta / d } else { Vec2::ZERO };

        PointQueryInfo {
            point: if d > 0.0 { closest + g * r } else { closest },
            distance: d - r,
            // use the segment's normal when the distance is very small
            gradient: if d > MAGIC_EPSILON { g } else { self.tn },
        }
    }

    fn segment_query(&self, a: Vec2, b: Vec2, radius: f32) -> Option<SegmentQueryInfo> {
        let n = self.tn;
        let d = (self.ta - a).dot(n);
        let r = self.radius + radius;

        let flipped_n = if d > 0.0 { -n } else { n };
        let seg_offset = flipped_n * r - a;

        // make the endpoints relative to 'a' and move them by the thickness of the segment
        let seg_a = self.ta + seg_offset;
        let seg_b = self.tb + seg_offset;
        let delta = b - a;

        if delta.perp_dot(seg_a) * delta.perp_dot(seg_b) <= 0.0 {
            let d_offset = d + if d > 0.0 { -r } else { r };
            let ad = -d_offset;
            let bd = delta.dot(n) - d_offset;

            if ad * bd < 0.0 {
                let t = ad / (ad - bd);
                return Some(SegmentQueryInfo {
                    point: a.lerp(b, t) - flipped_n * radius,
                    normal: flipped_n,
                    alpha: t,
                });
            }
        } else if r != 0.0 {
            // the rounded endcaps
            return closest_hit(
                circle_segment_query(self.ta, self.radius, a, b, radius),
                circle_segment_query(self.tb, self.radius, a, b, radius),
            );
        }

        None
    }

    fn mass_info(&self, mass: f32) -> ShapeMassInfo {
        let length = self.a.distance(self.b);
        ShapeMassInfo {
            m: mass,
            i: moment_for_box(1.0, length + 2.0 * self.radius, 2.0 * self.radius),
            cog: self.a.lerp(self.b, 0.5),
            area: area_for_segment(self.a, self.b, self.radius),
        }
    }
}
