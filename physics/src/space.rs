use crate::{
    body::{BodyArena, BodyHandle},
    hash_set::HashValue,
    shape::Shape,
};
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceHandle(pub u32);

impl Default for SpaceHandle {
    // default to invalid value
    fn default() -> Self {
        Self(u32::MAX)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u32);

impl Default for ShapeHandle {
    // default to invalid value
    fn default() -> Self {
        Self(u32::MAX)
    }
}

/// The shapes attached to one space, kept in insertion order.
#[derive(Debug)]
pub struct ShapeArena {
    space: SpaceHandle,
    shapes: BTreeMap<ShapeHandle, Shape>,
    next_id: u32,
}

impl ShapeArena {
    pub fn new(space: SpaceHandle) -> Self {
        Self {
            space,
            shapes: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn space(&self) -> SpaceHandle {
        self.space
    }

    /// Takes ownership of `shape`, giving it a fresh hash id and attaching it to this space.
    pub fn add(&mut self, mut shape: Shape) -> ShapeHandle {
        let handle = ShapeHandle(self.next_id);
        self.next_id += 1;

        shape.set_hash_id(handle.0 as HashValue);
        shape.set_space(Some(self.space));
        self.shapes.insert(handle, shape);
        handle
    }

    pub fn remove(&mut self, handle: ShapeHandle) -> Option<Shape> {
        let mut shape = self.shapes.remove(&handle)?;
        shape.set_space(None);
        Some(shape)
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(&handle)
    }

    pub fn get_mut(&mut self, handle: ShapeHandle) -> Option<&mut Shape> {
        self.shapes.get_mut(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> + '_ {
        self.shapes.iter().map(|(&handle, shape)| (handle, shape))
    }

    pub fn body_shapes(&self, body: BodyHandle) -> impl Iterator<Item = ShapeHandle> + '_ {
        self.iter()
            .filter(move |(_, shape)| shape.body() == body)
            .map(|(handle, _)| handle)
    }

    pub fn cache_bbs(&mut self, bodies: &BodyArena) {
        for shape in self.shapes.values_mut() {
            shape.cache_bb(bodies);
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
