mod shape_circle;
mod shape_poly;
mod shape_segment;

use crate::{bounds::Bounds, math::Transform, shape::ShapeMassInfo};
use glam::Vec2;

pub use shape_circle::CircleShape;
pub use shape_poly::{PolyShape, SplittingPlane};
pub use shape_segment::SegmentShape;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointQueryInfo {
    /// Closest point on the shape's surface.
    pub point: Vec2,
    /// Negative when the query point is inside the shape.
    pub distance: f32,
    /// Gradient of the signed distance field at the query point.
    pub gradient: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentQueryInfo {
    pub point: Vec2,
    pub normal: Vec2,
    /// Normalized distance along the query segment, in `[0, 1]`.
    pub alpha: f32,
}

trait ShapeTrait {
    fn cache_data(&mut self, transform: &Transform) -> Bounds;
    fn point_query(&self, p: Vec2) -> PointQueryInfo;
    fn segment_query(&self, a: Vec2, b: Vec2, radius: f32) -> Option<SegmentQueryInfo>;
    fn mass_info(&self, mass: f32) -> ShapeMassInfo;
}

/// The geometry of a shape. Transformed data is only refreshed by `cache_data`.
#[derive(Clone, Debug)]
pub enum ShapeClass {
    Circle(CircleShape),
    Segment(SegmentShape),
    Poly(PolyShape),
}

impl From<CircleShape> for ShapeClass {
    fn from(circle: CircleShape) -> Self {
        ShapeClass::Circle(circle)
    }
}

impl From<SegmentShape> for ShapeClass {
    fn from(segment: SegmentShape) -> Self {
        ShapeClass::Segment(segment)
    }
}

impl From<PolyShape> for ShapeClass {
    fn from(poly: PolyShape) -> Self {
        ShapeClass::Poly(poly)
    }
}

impl ShapeClass {
    fn shape_trait(&self) -> &dyn ShapeTrait {
        match self {
            ShapeClass::Circle(data) => data,
            ShapeClass::Segment(data) => data,
            ShapeClass::Poly(data) => data,
        }
    }

    fn shape_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            ShapeClass::Circle(data) => data,
            ShapeClass::Segment(data) => data,
            ShapeClass::Poly(data) => data,
        }
    }

    pub fn cache_data(&mut self, transform: &Transform) -> Bounds {
        self.shape_trait_mut().cache_data(transform)
    }

    pub fn point_query(&self, p: Vec2) -> PointQueryInfo {
        self.shape_trait().point_query(p)
    }

    pub fn segment_query(&self, a: Vec2, b: Vec2, radius: f32) -> Option<SegmentQueryInfo> {
        self.shape_trait().segment_query(a, b, radius)
    }

    pub fn mass_info(&self, mass: f32) -> ShapeMassInfo {
        self.shape_trait().mass_info(mass)
    }
}

// keep the closest of two segment query hits
fn closest_hit(
    lhs: Option<SegmentQueryInfo>,
    rhs: Option<SegmentQueryInfo>,
) -> Option<SegmentQueryInfo> {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Some(if rhs.alpha < lhs.alpha { rhs } else { lhs }),
        (lhs, None) => lhs,
        (None, rhs) => rhs,
    }
}
