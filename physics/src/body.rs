use crate::math::Transform;
use glam::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

impl Default for BodyHandle {
    // default to invalid value
    fn default() -> Self {
        Self(u32::MAX)
    }
}

#[derive(Debug, Default)]
pub struct BodyArena {
    bodies: Vec<Body>,
}

impl BodyArena {
    pub fn new() -> Self {
        BodyArena { bodies: Vec::new() }
    }

    pub fn add(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(body);
        handle
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize)
    }

    /// Wakes the body if the handle resolves.
    pub fn activate(&mut self, handle: BodyHandle) {
        if let Some(body) = self.get_mut(handle) {
            body.activate();
        }
    }
}

/// The parts of a rigid body the shape layer reads: its pose and whether it is asleep.
#[derive(Clone, Debug)]
pub struct Body {
    position: Vec2,
    angle: f32,
    transform: Transform,
    sleeping: bool,
    idle_time: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }
}

impl Body {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            angle,
            transform: Transform::from_angle_translation(angle, position),
            sleeping: false,
            idle_time: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_transform();
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.update_transform();
    }

    fn update_transform(&mut self) {
        self.transform = Transform::from_angle_translation(self.angle, self.position);
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }

    pub fn add_idle_time(&mut self, dt: f32) {
        self.idle_time += dt;
    }

    pub fn activate(&mut self) {
        self.sleeping = false;
        self.idle_time = 0.0;
    }

    pub fn sleep(&mut self) {
        self.sleeping = true;
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}
