use super::{
    closest_hit, shape_circle::circle_segment_query, PointQueryInfo, SegmentQueryInfo, ShapeTrait,
};
use crate::{
    bounds::Bounds,
    error::PhysicsError,
    math::{
        closest_point_on_segment,
        hull::convex_hull,
        mass::{area_for_poly, centroid_for_poly, moment_for_poly},
        Transform, Vec2Ext, MAGIC_EPSILON,
    },
    shape::ShapeMassInfo,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A polygon vertex paired with the outward normal of the edge ending at it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplittingPlane {
    pub v0: Vec2,
    pub n: Vec2,
}

fn set_up_verts(verts: &[Vec2]) -> Vec<SplittingPlane> {
    let count = verts.len();
    verts
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            let a = verts[(i + count - 1) % count];
            SplittingPlane {
                v0: b,
                n: (b - a).normalize_or_zero().rperp(),
            }
        })
        .collect()
}

/// Convex polygon with optionally rounded corners.
///
/// The vertex count is not fixed for the lifetime of the shape, `set_verts` may change it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PolyShapeDef", into = "PolyShapeDef")]
pub struct PolyShape {
    radius: f32,
    // local space
    verts: Vec<SplittingPlane>,
    // world space, refreshed by cache_data
    planes: Vec<SplittingPlane>,
}

#[derive(Serialize, Deserialize)]
struct PolyShapeDef {
    verts: Vec<Vec2>,
    #[serde(default)]
    radius: f32,
}

impl TryFrom<PolyShapeDef> for PolyShape {
    type Error = PhysicsError;

    fn try_from(def: PolyShapeDef) -> Result<Self, Self::Error> {
        PolyShape::new_raw(&def.verts, def.radius)
    }
}

impl From<PolyShape> for PolyShapeDef {
    fn from(poly: PolyShape) -> Self {
        PolyShapeDef {
            verts: poly.local_verts().collect(),
            radius: poly.radius,
        }
    }
}

impl PolyShape {
    /// Builds the convex hull of `verts` after applying `transform` to them.
    pub fn new(verts: &[Vec2], transform: &Transform, radius: f32) -> Result<Self, PhysicsError> {
        let hull = Self::transformed_hull(verts, transform);
        Self::new_raw(&hull, radius)
    }

    /// `verts` must already be convex and wound counter-clockwise.
    pub fn new_raw(verts: &[Vec2], radius: f32) -> Result<Self, PhysicsError> {
        if verts.is_empty() {
            return Err(PhysicsError::EmptyPolygon);
        }

        let planes = set_up_verts(verts);
        Ok(Self {
            radius,
            verts: planes.clone(),
            planes,
        })
    }

    pub fn box_shape(width: f32, height: f32, radius: f32) -> Self {
        let half = Vec2::new(width, height) * 0.5;
        Self::box_from_bounds(
            &Bounds {
                mins: -half,
                maxs: half,
            },
            radius,
        )
    }

    pub fn box_from_bounds(bounds: &Bounds, radius: f32) -> Self {
        let verts = [
            Vec2::new(bounds.maxs.x, bounds.mins.y),
            Vec2::new(bounds.maxs.x, bounds.maxs.y),
            Vec2::new(bounds.mins.x, bounds.maxs.y),
            Vec2::new(bounds.mins.x, bounds.mins.y),
        ];
        let planes = set_up_verts(&verts);
        Self {
            radius,
            verts: planes.clone(),
            planes,
        }
    }

    fn transformed_hull(verts: &[Vec2], transform: &Transform) -> Vec<Vec2> {
        let transformed: Vec<Vec2> = verts
            .iter()
            .map(|&v| transform.transform_point2(v))
            .collect();
        convex_hull(&transformed, 0.0)
    }

    /// Replaces the vertex set. Transformed data is stale until the next `cache_data`.
    pub fn set_verts(&mut self, verts: &[Vec2], transform: &Transform) -> Result<(), PhysicsError> {
        let hull = Self::transformed_hull(verts, transform);
        self.set_verts_raw(&hull)
    }

    pub fn set_verts_raw(&mut self, verts: &[Vec2]) -> Result<(), PhysicsError> {
        if verts.is_empty() {
            return Err(PhysicsError::EmptyPolygon);
        }
        self.verts = set_up_verts(verts);
        self.planes = self.verts.clone();
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.verts.len()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn vert(&self, index: usize) -> Option<Vec2> {
        self.verts.get(index).map(|plane| plane.v0)
    }

    pub fn local_verts(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.verts.iter().map(|plane| plane.v0)
    }

    pub fn planes(&self) -> &[SplittingPlane] {
        &self.planes
    }
}

impl ShapeTrait for PolyShape {
    fn cache_data(&mut self, transform: &Transform) -> Bounds {
        self.planes.clear();
        self.planes.extend(self.verts.iter().map(|plane| SplittingPlane {
            v0: transform.transform_point2(plane.v0),
            n: transform.transform_vector2(plane.n),
        }));

        let mut bounds = Bounds::new();
        for plane in &self.planes {
            bounds.expand_by_point(plane.v0);
        }
        bounds.expand(self.radius)
    }

    fn point_query(&self, p: Vec2) -> PointQueryInfo {
        let planes = &self.planes;
        let r = self.radius;

        let mut v0 = match planes.last() {
            Some(plane) => plane.v0,
            None => {
                return PointQueryInfo {
                    point: p,
                    distance: f32::INFINITY,
                    gradient: Vec2::Y,
                }
            }
        };

        let mut min_dist = f32::INFINITY;
        let mut closest_point = v0;
        let mut closest_normal = Vec2::ZERO;
        // points and lines have no inside
        let mut outside = planes.len() < 3;

        for plane in planes {
            let v1 = plane.v0;
            outside = outside || plane.n.dot(p - v1) > 0.0;

            let closest = closest_point_on_segment(p, v0, v1);
            let dist = p.distance(closest);
            if dist < min_dist {
                min_dist = dist;
                closest_point = closest;
                closest_normal = plane.n;
            }

            v0 = v1;
        }

        let dist = if outside { min_dist } else { -min_dist };
        let g = if min_dist > 0.0 {
            (p - closest_point) / dist
        } else {
            closest_normal
        };

        PointQueryInfo {
            point: closest_point + g * r,
            distance: dist - r,
            gradient: if min_dist > MAGIC_EPSILON { g } else { closest_normal },
        }
    }

    fn segment_query(&self, a: Vec2, b: Vec2, radius: f32) -> Option<SegmentQueryInfo> {
        let planes = &self.planes;
        let count = planes.len();
        let r = self.radius + radius;

        let mut best: Option<SegmentQueryInfo> = None;
        for (i, plane) in planes.iter().enumerate() {
            let n = plane.n;
            let an = a.dot(n);
            let d = an - plane.v0.dot(n) - r;
            if d < 0.0 {
                continue;
            }

            let bn = b.dot(n);
            let t = d / (an - bn);
            if !(0.0..=1.0).contains(&t) {
                continue;
            }

            let point = a.lerp(b, t);
            let dt = n.perp_dot(point);
            let dt_min = n.perp_dot(planes[(i + count - 1) % count].v0);
            let dt_max = n.perp_dot(plane.v0);

            if dt_min <= dt && dt <= dt_max && best.map_or(true, |best| t < best.alpha) {
                best = Some(SegmentQueryInfo {
                    point: point - n * radius,
                    normal: n,
                    alpha: t,
                });
            }
        }

        // also check against the beveled vertices
        if r > 0.0 {
            for plane in planes {
                best = closest_hit(
                    best,
                    circle_segment_query(plane.v0, self.radius, a, b, radius),
                );
            }
        }

        best
    }

    fn mass_info(&self, mass: f32) -> ShapeMassInfo {
        let verts: Vec<Vec2> = self.local_verts().collect();
        let centroid = centroid_for_poly(&verts);
        ShapeMassInfo {
            m: mass,
            i: moment_for_poly(1.0, &verts, -centroid, self.radius),
            cog: centroid,
            area: area_for_poly(&verts, self.radius),
        }
    }
}
