use crate::{
    body::{BodyArena, BodyHandle},
    bounds::Bounds,
    config::{Material, PhysicsConfig},
    error::PhysicsError,
    hash_set::HashValue,
    math::Transform,
    shapes::{
        CircleShape, PointQueryInfo, PolyShape, SegmentQueryInfo, SegmentShape, ShapeClass,
    },
    space::SpaceHandle,
};
use glam::Vec2;
use log::{trace, warn};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeMassInfo {
    pub m: f32,
    /// Moment of inertia for a unit mass about the centre of gravity.
    pub i: f32,
    pub cog: Vec2,
    pub area: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeFilter {
    /// Shapes sharing a non-zero group never collide.
    pub group: u32,
    pub categories: u32,
    pub mask: u32,
}

impl ShapeFilter {
    pub const NO_GROUP: u32 = 0;
    pub const ALL_CATEGORIES: u32 = !0;

    pub const ALL: Self = Self {
        group: Self::NO_GROUP,
        categories: Self::ALL_CATEGORIES,
        mask: Self::ALL_CATEGORIES,
    };

    pub const NONE: Self = Self {
        group: Self::NO_GROUP,
        categories: !Self::ALL_CATEGORIES,
        mask: !Self::ALL_CATEGORIES,
    };

    pub fn new(group: u32, categories: u32, mask: u32) -> Self {
        Self {
            group,
            categories,
            mask,
        }
    }

    pub fn reject(&self, other: &Self) -> bool {
        (self.group != Self::NO_GROUP && self.group == other.group)
            || (self.categories & other.mask) == 0
            || (other.categories & self.mask) == 0
    }
}

impl Default for ShapeFilter {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SupportPoint {
    pub p: Vec2,
    pub index: usize,
}

impl SupportPoint {
    pub fn new(p: Vec2, index: usize) -> Self {
        Self { p, index }
    }
}

#[derive(Clone, Debug)]
pub struct Shape {
    class: ShapeClass,
    space: Option<SpaceHandle>,
    body: BodyHandle,
    mass_info: ShapeMassInfo,
    bb: Bounds,

    sensor: bool,
    pub elasticity: f32,
    pub friction: f32,
    pub surface_velocity: Vec2,

    pub collision_type: usize,
    pub filter: ShapeFilter,

    hashid: HashValue,
}

impl Shape {
    pub fn new(class: impl Into<ShapeClass>, body: BodyHandle, mass_info: ShapeMassInfo) -> Self {
        Self {
            class: class.into(),
            space: None,
            body,
            mass_info,
            bb: Bounds::new(),

            sensor: false,
            elasticity: 0.0,
            friction: 0.0,
            surface_velocity: Vec2::ZERO,

            collision_type: 0,
            filter: ShapeFilter::ALL,

            hashid: 0,
        }
    }

    /// Massless shape using the configured default material.
    pub fn from_config(
        class: impl Into<ShapeClass>,
        body: BodyHandle,
        config: &PhysicsConfig,
    ) -> Self {
        let mut shape = Self::from_class(class, body);
        shape.set_material(config.default_material);
        shape
    }

    /// Massless shape with the mass info derived from its geometry.
    pub fn from_class(class: impl Into<ShapeClass>, body: BodyHandle) -> Self {
        let class = class.into();
        let mass_info = class.mass_info(0.0);
        Self::new(class, body, mass_info)
    }

    pub fn new_circle(body: BodyHandle, radius: f32, offset: Vec2) -> Self {
        Self::from_class(CircleShape::new(radius, offset), body)
    }

    pub fn new_segment(body: BodyHandle, a: Vec2, b: Vec2, radius: f32) -> Self {
        Self::from_class(SegmentShape::new(a, b, radius), body)
    }

    pub fn new_poly(
        body: BodyHandle,
        verts: &[Vec2],
        transform: &Transform,
        radius: f32,
    ) -> Result<Self, PhysicsError> {
        let poly = PolyShape::new(verts, transform, radius)?;
        Ok(Self::from_class(poly, body))
    }

    pub fn new_box(body: BodyHandle, width: f32, height: f32, radius: f32) -> Self {
        Self::from_class(PolyShape::box_shape(width, height, radius), body)
    }

    pub fn class(&self) -> &ShapeClass {
        &self.class
    }

    /// Rank used to order the shapes of a collision pair, circle < segment < poly.
    pub fn order(&self) -> u32 {
        match self.class {
            ShapeClass::Circle(_) => 0,
            ShapeClass::Segment(_) => 1,
            ShapeClass::Poly(_) => 2,
        }
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn mass_info(&self) -> &ShapeMassInfo {
        &self.mass_info
    }

    pub fn hash_id(&self) -> HashValue {
        self.hashid
    }

    pub fn set_hash_id(&mut self, hashid: HashValue) {
        self.hashid = hashid;
    }

    pub fn space(&self) -> Option<SpaceHandle> {
        self.space
    }

    pub fn set_space(&mut self, space: Option<SpaceHandle>) {
        self.space = space;
    }

    /// Last bounding box computed by `update`, stale once the body moves.
    pub fn bb(&self) -> Bounds {
        self.bb
    }

    pub fn set_bb(&mut self, bb: Bounds) {
        self.bb = bb;
    }

    pub fn sensor(&self) -> bool {
        self.sensor
    }

    /// Changing the sensor flag wakes the owning body.
    pub fn set_sensor(&mut self, bodies: &mut BodyArena, sensor: bool) {
        bodies.activate(self.body);
        self.sensor = sensor;
    }

    pub fn material(&self) -> Material {
        Material {
            elasticity: self.elasticity,
            friction: self.friction,
        }
    }

    pub fn set_material(&mut self, material: Material) {
        self.elasticity = material.elasticity;
        self.friction = material.friction;
    }

    pub fn cache_bb(&mut self, bodies: &BodyArena) -> Bounds {
        match bodies.get(self.body) {
            Some(body) => self.update(body.transform()),
            None => {
                warn!(
                    "shape {} has no body at {:?}, keeping its cached bounds",
                    self.hashid, self.body
                );
                self.bb
            }
        }
    }

    pub fn update(&mut self, transform: &Transform) -> Bounds {
        self.bb = self.class.cache_data(transform);
        self.bb
    }

    /// Support point `i` of the shape's transformed geometry.
    pub fn point(&self, i: usize) -> SupportPoint {
        match &self.class {
            ShapeClass::Circle(circle) => SupportPoint::new(circle.transformed_center(), 0),
            ShapeClass::Segment(segment) => {
                if i == 0 {
                    SupportPoint::new(segment.transformed_a(), 0)
                } else {
                    SupportPoint::new(segment.transformed_b(), 1)
                }
            }
            ShapeClass::Poly(poly) => {
                // poly shapes may change vertex count
                let planes = poly.planes();
                let index = if i < planes.len() {
                    i
                } else {
                    trace!(
                        "support index {} out of range for {} vertices, using 0",
                        i,
                        planes.len()
                    );
                    0
                };
                let p = planes.get(index).map_or(Vec2::ZERO, |plane| plane.v0);
                SupportPoint::new(p, index)
            }
        }
    }

    pub fn point_query(&self, p: Vec2) -> PointQueryInfo {
        self.class.point_query(p)
    }

    pub fn segment_query(&self, a: Vec2, b: Vec2, radius: f32) -> Option<SegmentQueryInfo> {
        let nearest = self.class.point_query(a);
        if nearest.distance <= radius {
            // the query starts inside the shape
            Some(SegmentQueryInfo {
                point: a,
                normal: (a - nearest.point).normalize_or_zero(),
                alpha: 0.0,
            })
        } else {
            self.class.segment_query(a, b, radius)
        }
    }

    pub fn set_poly_verts(
        &mut self,
        verts: &[Vec2],
        transform: &Transform,
    ) -> Result<(), PhysicsError> {
        match &mut self.class {
            ShapeClass::Poly(poly) => poly.set_verts(verts, transform)?,
            _ => return Err(PhysicsError::NotAPolygon),
        }
        self.mass_info = self.class.mass_info(self.mass_info.m);
        Ok(())
    }

    pub fn mass(&self) -> f32 {
        self.mass_info.m
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass_info.m = mass;
    }

    pub fn density(&self) -> f32 {
        if self.mass_info.area == 0.0 {
            0.0
        } else {
            self.mass_info.m / self.mass_info.area
        }
    }

    pub fn set_density(&mut self, density: f32) {
        self.mass_info.m = density * self.mass_info.area;
    }

    pub fn moment(&self) -> f32 {
        self.mass_info.m * self.mass_info.i
    }

    pub fn area(&self) -> f32 {
        self.mass_info.area
    }

    pub fn center_of_gravity(&self) -> Vec2 {
        self.mass_info.cog
    }
}
